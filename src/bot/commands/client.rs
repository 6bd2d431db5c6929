//! Client Discord commands - `/client add|list|show|print|delete`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{
            Context,
            commands::unknown_choice,
            handlers::autocomplete::{self, parse_record_id},
            reply_error, views,
        },
        core::{client, print, storage::CollectionKey},
        errors::Result,
    };
    use poise::serenity_prelude as serenity;
    use std::fmt::Write;

    /// Parent command for client records.
    #[poise::command(
        slash_command,
        subcommands("client_add", "client_list", "client_show", "client_print", "client_delete")
    )]
    pub async fn client(ctx: Context<'_>) -> Result<()> {
        let help_text = "Client commands. Available subcommands:\n\
            `/client add` - Register a new client\n\
            `/client list` - List or search clients\n\
            `/client show` - Show a client and their orders\n\
            `/client print` - Printable client sheet\n\
            `/client delete` - Delete a client";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Registers a new client.
    #[poise::command(slash_command, rename = "add")]
    pub async fn client_add(
        ctx: Context<'_>,
        #[description = "Client name"] name: String,
        #[description = "Phone number"] phone: Option<String>,
        #[description = "Email address"] email: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let mut state = data.state.lock().await;

        let created = match client::create_client(
            &mut state,
            &name,
            phone.as_deref(),
            email.as_deref(),
        ) {
            Ok(c) => c,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Clients).await?;
        drop(state);

        ctx.say(format!("✅ Client **#{}** '{}' registered.", created.id, created.name))
            .await?;
        Ok(())
    }

    /// Lists clients, optionally filtered by name, phone or email.
    #[poise::command(slash_command, rename = "list")]
    pub async fn client_list(
        ctx: Context<'_>,
        #[description = "Text to search for"] search: Option<String>,
    ) -> Result<()> {
        let text = {
            let state = ctx.data().state.lock().await;
            let clients = client::search_clients(&state, search.as_deref().unwrap_or_default());
            if clients.is_empty() {
                None
            } else {
                let mut out = format!("**Clients ({})**\n", clients.len());
                for c in clients {
                    let _ = writeln!(out, "{}", views::client_line(c));
                }
                Some(out)
            }
        };

        match text {
            Some(text) => {
                ctx.say(views::truncate_message(&text, views::MAX_MESSAGE_LEN))
                    .await?;
            }
            None => {
                ctx.say("📋 No clients found. Register one with `/client add`.")
                    .await?;
            }
        }
        Ok(())
    }

    /// Shows a client's details and service history.
    #[poise::command(slash_command, rename = "show")]
    pub async fn client_show(
        ctx: Context<'_>,
        #[description = "Client"]
        #[autocomplete = "autocomplete::autocomplete_client"]
        client: String,
    ) -> Result<()> {
        let Some(client_id) = parse_record_id(&client) else {
            return unknown_choice(ctx, "client", &client).await;
        };

        let embed = {
            let state = ctx.data().state.lock().await;
            state.client(client_id).map(|found| {
                let orders = client::orders_for_client(&state, client_id);
                let mut history = String::new();
                for order in &orders {
                    let _ = writeln!(history, "{}", views::order_line(&state, order));
                }
                if history.is_empty() {
                    history.push_str("No service orders yet.");
                }

                serenity::CreateEmbed::default()
                    .title(format!("👤 #{} {}", found.id, found.name))
                    .color(0x0058_65F2)
                    .field("Phone", non_empty(&found.phone), true)
                    .field("Email", non_empty(&found.email), true)
                    .field(
                        "Client since",
                        found.created_at.format("%Y-%m-%d").to_string(),
                        true,
                    )
                    .field(
                        format!("Service orders ({})", orders.len()),
                        views::truncate_message(&history, 1000),
                        false,
                    )
            })
        };

        match embed {
            Some(embed) => {
                ctx.send(poise::CreateReply::default().embed(embed)).await?;
            }
            None => {
                ctx.say(format!("❌ Client #{client_id} not found")).await?;
            }
        }
        Ok(())
    }

    /// Sends a printable client sheet with the client's order history.
    #[poise::command(slash_command, rename = "print")]
    pub async fn client_print(
        ctx: Context<'_>,
        #[description = "Client"]
        #[autocomplete = "autocomplete::autocomplete_client"]
        client: String,
    ) -> Result<()> {
        let Some(client_id) = parse_record_id(&client) else {
            return unknown_choice(ctx, "client", &client).await;
        };

        let document = {
            let state = ctx.data().state.lock().await;
            state
                .client(client_id)
                .map(|c| print::render_client(&state, &ctx.data().config.shop, c))
        };

        let Some(document) = document else {
            ctx.say(format!("❌ Client #{client_id} not found")).await?;
            return Ok(());
        };

        let attachment =
            serenity::CreateAttachment::bytes(document.into_bytes(), format!("client_{client_id}.txt"));
        ctx.send(
            poise::CreateReply::default()
                .content(format!("🖨️ Client sheet for #{client_id}"))
                .attachment(attachment),
        )
        .await?;
        Ok(())
    }

    /// Deletes a client. Their service orders are kept.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn client_delete(
        ctx: Context<'_>,
        #[description = "Client"]
        #[autocomplete = "autocomplete::autocomplete_client"]
        client: String,
        #[description = "Set to true to confirm the deletion"] confirm: bool,
    ) -> Result<()> {
        let Some(client_id) = parse_record_id(&client) else {
            return unknown_choice(ctx, "client", &client).await;
        };
        if !confirm {
            ctx.say(format!(
                "⚠️ Client #{client_id} was not deleted. Run the command again with `confirm: True`."
            ))
            .await?;
            return Ok(());
        }

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let removed = match client::delete_client(&mut state, client_id) {
            Ok(c) => c,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        let orphaned = client::orders_for_client(&state, client_id).len();
        state.persist(&data.database, CollectionKey::Clients).await?;
        drop(state);

        let mut message = format!("🗑️ Client #{} '{}' deleted.", removed.id, removed.name);
        if orphaned > 0 {
            let _ = write!(
                message,
                " {orphaned} service order(s) still reference this client and will show N/A."
            );
        }
        ctx.say(message).await?;
        Ok(())
    }

    fn non_empty(value: &str) -> String {
        if value.is_empty() {
            "-".to_string()
        } else {
            value.to_string()
        }
    }
}

// Re-export all commands
pub use inner::*;
