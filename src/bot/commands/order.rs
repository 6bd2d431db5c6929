//! Service order Discord commands - `/order new|list|show|status|print|delete`.
//!
//! Parts, labor and diagnosis are edited through `/draft`, not here.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context, actor,
            commands::unknown_choice,
            handlers::autocomplete::{self, parse_record_id},
            reply_error, views,
        },
        core::{
            order::{self, NewOrder},
            print,
            storage::CollectionKey,
        },
        errors::Result,
        models::OrderStatus,
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;
    use tracing::info;

    /// Order status as offered in slash command choices.
    #[derive(Debug, Clone, Copy, PartialEq, Eq, poise::ChoiceParameter)]
    pub enum StatusChoice {
        #[name = "Pending"]
        Pending,
        #[name = "Diagnosing"]
        Diagnosing,
        #[name = "Waiting Approval"]
        WaitingApproval,
        #[name = "In Repair"]
        InRepair,
        #[name = "Ready"]
        Ready,
        #[name = "Delivered"]
        Delivered,
    }

    impl From<StatusChoice> for OrderStatus {
        fn from(choice: StatusChoice) -> Self {
            match choice {
                StatusChoice::Pending => Self::Pending,
                StatusChoice::Diagnosing => Self::Diagnosing,
                StatusChoice::WaitingApproval => Self::WaitingApproval,
                StatusChoice::InRepair => Self::InRepair,
                StatusChoice::Ready => Self::Ready,
                StatusChoice::Delivered => Self::Delivered,
            }
        }
    }

    /// Parent command for service orders.
    #[poise::command(
        slash_command,
        subcommands(
            "order_new",
            "order_list",
            "order_show",
            "order_status",
            "order_print",
            "order_delete"
        )
    )]
    pub async fn order(ctx: Context<'_>) -> Result<()> {
        let help_text = "Service order commands. Available subcommands:\n\
            `/order new` - Open a service order for a client\n\
            `/order list` - List orders, optionally by status or search text\n\
            `/order show` - Order details and history\n\
            `/order status` - Move an order to another status\n\
            `/order print` - Printable order receipt\n\
            `/order delete` - Delete an order\n\
            Use `/draft open` to edit parts, labor and diagnosis.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Opens a new service order in Pending.
    #[poise::command(slash_command, rename = "new")]
    pub async fn order_new(
        ctx: Context<'_>,
        #[description = "Client who brought the equipment"]
        #[autocomplete = "autocomplete::autocomplete_client"]
        client: String,
        #[description = "Equipment make and model"] equipment_model: String,
        #[description = "Problem reported by the client"] problem: String,
        #[description = "Serial number"] serial_number: Option<String>,
    ) -> Result<()> {
        let Some(client_id) = parse_record_id(&client) else {
            return unknown_choice(ctx, "client", &client).await;
        };
        let new_order = NewOrder {
            client_id,
            equipment_model,
            serial_number: serial_number.unwrap_or_default(),
            problem_description: problem,
        };
        let author = actor(ctx);

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let created = match order::create_order(&mut state, new_order, &author) {
            Ok(o) => o,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Orders).await?;
        let summary = views::order_line(&state, &created);
        drop(state);

        ctx.say(format!("✅ Service order opened:\n{summary}")).await?;
        Ok(())
    }

    /// Lists service orders, newest first.
    #[poise::command(slash_command, rename = "list")]
    pub async fn order_list(
        ctx: Context<'_>,
        #[description = "Only orders in this status"] status: Option<StatusChoice>,
        #[description = "Order id, equipment, serial number or client name"] search: Option<
            String,
        >,
    ) -> Result<()> {
        let status = status.map(OrderStatus::from);
        let text = {
            let state = ctx.data().state.lock().await;
            let orders: Vec<_> = order::search_orders(&state, search.as_deref().unwrap_or_default())
                .into_iter()
                .filter(|o| status.is_none_or(|s| o.status == s))
                .collect();
            let mut out = String::new();
            if !orders.is_empty() {
                let _ = writeln!(out, "**Service orders ({})**", orders.len());
                for o in orders {
                    let _ = writeln!(out, "{}", views::order_line(&state, o));
                }
            }
            out
        };

        if text.is_empty() {
            ctx.say("🧾 No service orders found.").await?;
        } else {
            ctx.say(views::truncate_message(&text, views::MAX_MESSAGE_LEN))
                .await?;
        }
        Ok(())
    }

    /// Shows an order with its parts, costs and latest history.
    #[poise::command(slash_command, rename = "show")]
    pub async fn order_show(
        ctx: Context<'_>,
        #[description = "Service order"]
        #[autocomplete = "autocomplete::autocomplete_order"]
        order: String,
    ) -> Result<()> {
        let Some(order_id) = parse_record_id(&order) else {
            return unknown_choice(ctx, "order", &order).await;
        };

        let detail = {
            let state = ctx.data().state.lock().await;
            state.order(order_id).map(|o| views::order_detail(&state, o))
        };

        match detail {
            Some(detail) => {
                ctx.say(views::truncate_message(&detail, views::MAX_MESSAGE_LEN))
                    .await?;
            }
            None => {
                ctx.say(format!("❌ Service order #{order_id} not found")).await?;
            }
        }
        Ok(())
    }

    /// Moves an order to another status. Moving to Ready also drafts a
    /// notification for the client.
    #[poise::command(slash_command, rename = "status")]
    pub async fn order_status(
        ctx: Context<'_>,
        #[description = "Service order"]
        #[autocomplete = "autocomplete::autocomplete_order"]
        order: String,
        #[description = "New status"] status: StatusChoice,
    ) -> Result<()> {
        let Some(order_id) = parse_record_id(&order) else {
            return unknown_choice(ctx, "order", &order).await;
        };
        let author = actor(ctx);

        // Text generation can take a few seconds
        ctx.defer().await?;

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let (updated, notice) =
            match order::apply_status(&mut state, order_id, status.into(), &author, Utc::now()) {
                Ok(updated) => {
                    let notice = order::client_notice(&state, &updated);
                    (updated, notice)
                }
                Err(e) => {
                    drop(state);
                    return reply_error(ctx, e).await;
                }
            };
        state.persist(&data.database, CollectionKey::Orders).await?;
        drop(state);

        // The assistant is called without holding the shop state
        let client_message = match notice {
            Some(notice) => Some(notice.compose(data.assistant.as_ref()).await),
            None => None,
        };

        let mut reply = format!(
            "✅ Order **#{}** is now **{}**.",
            updated.id, updated.status
        );
        if let Some(message) = client_message {
            info!("Drafted pickup message for order #{}", updated.id);
            let _ = write!(reply, "\n\n📨 **Message for the client:**\n>>> {message}");
        }
        ctx.say(views::truncate_message(&reply, views::MAX_MESSAGE_LEN))
            .await?;
        Ok(())
    }

    /// Sends a printable service order receipt.
    #[poise::command(slash_command, rename = "print")]
    pub async fn order_print(
        ctx: Context<'_>,
        #[description = "Service order"]
        #[autocomplete = "autocomplete::autocomplete_order"]
        order: String,
    ) -> Result<()> {
        let Some(order_id) = parse_record_id(&order) else {
            return unknown_choice(ctx, "order", &order).await;
        };

        let document = {
            let state = ctx.data().state.lock().await;
            state
                .order(order_id)
                .map(|o| print::render_order(&state, &ctx.data().config.shop, o))
        };

        let Some(document) = document else {
            ctx.say(format!("❌ Service order #{order_id} not found")).await?;
            return Ok(());
        };

        let attachment =
            serenity::CreateAttachment::bytes(document.into_bytes(), format!("order_{order_id}.txt"));
        ctx.send(
            poise::CreateReply::default()
                .content(format!("🖨️ Service order #{order_id}"))
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }

    /// Deletes an order and discards any open drafts of it. Parts it used are
    /// not returned to stock.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn order_delete(
        ctx: Context<'_>,
        #[description = "Service order"]
        #[autocomplete = "autocomplete::autocomplete_order"]
        order: String,
        #[description = "Set to true to confirm the deletion"] confirm: bool,
    ) -> Result<()> {
        let Some(order_id) = parse_record_id(&order) else {
            return unknown_choice(ctx, "order", &order).await;
        };
        if !confirm {
            ctx.say(format!(
                "⚠️ Order #{order_id} was not deleted. Run the command again with `confirm: True`."
            ))
            .await?;
            return Ok(());
        }

        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let mut state = data.state.lock().await;
        let removed = match order::delete_order(&mut state, order_id) {
            Ok(o) => o,
            Err(e) => {
                drop(state);
                drop(drafts);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Orders).await?;
        drafts.retain(|_, draft| draft.order_id() != order_id);
        drop(state);
        drop(drafts);

        ctx.say(format!(
            "🗑️ Service order #{} ({}) deleted.",
            removed.id, removed.equipment_model
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::OrderStatus;

    #[test]
    fn test_status_choice_covers_every_status() {
        let choices = [
            StatusChoice::Pending,
            StatusChoice::Diagnosing,
            StatusChoice::WaitingApproval,
            StatusChoice::InRepair,
            StatusChoice::Ready,
            StatusChoice::Delivered,
        ];
        let mapped: Vec<OrderStatus> = choices.into_iter().map(OrderStatus::from).collect();
        assert_eq!(mapped, OrderStatus::ALL.to_vec());
    }
}
