//! Order draft Discord commands - `/draft open|show|add_part|remove_part|labor|diagnosis|suggest|save|close`.
//!
//! Each operator has at most one open draft. Nothing reaches stored orders or
//! inventory until `/draft save`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        assistant::{FALLBACK_MESSAGE, TextGenerator},
        bot::{
            Context, actor,
            commands::unknown_choice,
            handlers::autocomplete::{self, parse_record_id},
            reply_error, views,
        },
        core::{draft::OrderDraft, report::format_currency, storage::CollectionKey},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use std::fmt::Write;
    use tracing::info;

    fn author_key(ctx: Context<'_>) -> u64 {
        ctx.author().id.get()
    }

    /// Parent command for editing an order's parts, labor and diagnosis.
    #[poise::command(
        slash_command,
        subcommands(
            "draft_open",
            "draft_show",
            "draft_add_part",
            "draft_remove_part",
            "draft_labor",
            "draft_diagnosis",
            "draft_suggest",
            "draft_save",
            "draft_close"
        )
    )]
    pub async fn draft(ctx: Context<'_>) -> Result<()> {
        let help_text = "Order draft commands. Available subcommands:\n\
            `/draft open` - Start editing an order\n\
            `/draft show` - Show your open draft\n\
            `/draft add_part` - Use parts from inventory\n\
            `/draft remove_part` - Drop a part line\n\
            `/draft labor` - Set the labor charge\n\
            `/draft diagnosis` - Set the technical diagnosis\n\
            `/draft suggest` - Ask the assistant for a diagnosis\n\
            `/draft save` - Commit the draft\n\
            `/draft close` - Discard the draft";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Starts editing an order. Replaces any draft you already had open.
    #[poise::command(slash_command, rename = "open")]
    pub async fn draft_open(
        ctx: Context<'_>,
        #[description = "Service order"]
        #[autocomplete = "autocomplete::autocomplete_order"]
        order: String,
    ) -> Result<()> {
        let Some(order_id) = parse_record_id(&order) else {
            return unknown_choice(ctx, "order", &order).await;
        };

        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let state = data.state.lock().await;
        let opened = match OrderDraft::open(&state, order_id) {
            Ok(d) => d,
            Err(e) => {
                drop(state);
                drop(drafts);
                return reply_error(ctx, e).await;
            }
        };
        let view = views::draft_detail(&state, &opened);
        drop(state);

        let mut reply = String::new();
        if let Some(previous) = drafts.insert(author_key(ctx), opened) {
            let _ = writeln!(
                reply,
                "⚠️ Your unsaved draft of order #{} was discarded.",
                previous.order_id()
            );
        }
        drop(drafts);

        reply.push_str(&view);
        ctx.say(views::truncate_message(&reply, views::MAX_MESSAGE_LEN))
            .await?;
        Ok(())
    }

    /// Shows your open draft.
    #[poise::command(slash_command, rename = "show")]
    pub async fn draft_show(ctx: Context<'_>) -> Result<()> {
        let data = ctx.data();
        let drafts = data.drafts.lock().await;
        let Some(current) = drafts.get(&author_key(ctx)) else {
            drop(drafts);
            return reply_error(ctx, Error::NoOpenDraft).await;
        };
        let view = {
            let state = data.state.lock().await;
            views::draft_detail(&state, current)
        };
        drop(drafts);

        ctx.say(views::truncate_message(&view, views::MAX_MESSAGE_LEN))
            .await?;
        Ok(())
    }

    /// Adds parts from inventory to your draft.
    #[poise::command(slash_command, rename = "add_part")]
    pub async fn draft_add_part(
        ctx: Context<'_>,
        #[description = "Part"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        item: String,
        #[description = "Units to use. Defaults to 1."] quantity: Option<u32>,
    ) -> Result<()> {
        let Some(item_id) = parse_record_id(&item) else {
            return unknown_choice(ctx, "part", &item).await;
        };

        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let Some(current) = drafts.get_mut(&author_key(ctx)) else {
            drop(drafts);
            return reply_error(ctx, Error::NoOpenDraft).await;
        };
        let state = data.state.lock().await;
        let view = match current.add_part(&state.inventory, item_id, quantity.unwrap_or(1)) {
            Ok(()) => views::draft_detail(&state, current),
            Err(e) => {
                drop(state);
                drop(drafts);
                return reply_error(ctx, e).await;
            }
        };
        drop(state);
        drop(drafts);

        ctx.say(views::truncate_message(&view, views::MAX_MESSAGE_LEN))
            .await?;
        Ok(())
    }

    /// Removes a part line from your draft.
    #[poise::command(slash_command, rename = "remove_part")]
    pub async fn draft_remove_part(
        ctx: Context<'_>,
        #[description = "Part"]
        #[autocomplete = "autocomplete::autocomplete_item"]
        item: String,
    ) -> Result<()> {
        let Some(item_id) = parse_record_id(&item) else {
            return unknown_choice(ctx, "part", &item).await;
        };

        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let Some(current) = drafts.get_mut(&author_key(ctx)) else {
            drop(drafts);
            return reply_error(ctx, Error::NoOpenDraft).await;
        };
        current.remove_part(item_id);
        let view = {
            let state = data.state.lock().await;
            views::draft_detail(&state, current)
        };
        drop(drafts);

        ctx.say(views::truncate_message(&view, views::MAX_MESSAGE_LEN))
            .await?;
        Ok(())
    }

    /// Sets the labor charge on your draft.
    #[poise::command(slash_command, rename = "labor")]
    pub async fn draft_labor(
        ctx: Context<'_>,
        #[description = "Labor charge (e.g., 80.00)"] amount: f64,
    ) -> Result<()> {
        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let Some(current) = drafts.get_mut(&author_key(ctx)) else {
            drop(drafts);
            return reply_error(ctx, Error::NoOpenDraft).await;
        };
        if let Err(e) = current.set_labor_cost(amount) {
            drop(drafts);
            return reply_error(ctx, e).await;
        }
        let total = current.current().total_cost;
        drop(drafts);

        ctx.say(format!(
            "✅ Labor set to {}. Draft total: {}.",
            format_currency(amount),
            format_currency(total)
        ))
        .await?;
        Ok(())
    }

    /// Sets the technical diagnosis on your draft. Leave empty to clear it.
    #[poise::command(slash_command, rename = "diagnosis")]
    pub async fn draft_diagnosis(
        ctx: Context<'_>,
        #[description = "Diagnosis text"] text: Option<String>,
    ) -> Result<()> {
        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let Some(current) = drafts.get_mut(&author_key(ctx)) else {
            drop(drafts);
            return reply_error(ctx, Error::NoOpenDraft).await;
        };
        current.set_diagnosis(text.as_deref().unwrap_or_default());
        let cleared = current.current().diagnosis.is_none();
        drop(drafts);

        if cleared {
            ctx.say("✅ Diagnosis cleared.").await?;
        } else {
            ctx.say("✅ Diagnosis updated.").await?;
        }
        Ok(())
    }

    /// Asks the assistant for a diagnosis from the equipment and reported problem.
    #[poise::command(slash_command, rename = "suggest")]
    pub async fn draft_suggest(ctx: Context<'_>) -> Result<()> {
        let key = author_key(ctx);
        let data = ctx.data();
        let request = data
            .drafts
            .lock()
            .await
            .get(&key)
            .map(|d| (d.order_id(), d.diagnosis_request()));
        let Some((order_id, (equipment_model, problem))) = request else {
            return reply_error(ctx, Error::NoOpenDraft).await;
        };

        ctx.defer().await?;

        // No lock is held while the assistant works
        let suggestion = data.assistant.diagnose(&equipment_model, &problem).await;

        let applied = {
            let mut drafts = data.drafts.lock().await;
            match drafts.get_mut(&key) {
                Some(current) if current.order_id() == order_id => {
                    current.accept_suggestion(&suggestion)
                }
                _ => false,
            }
        };

        let reply = if suggestion == FALLBACK_MESSAGE {
            format!("⚠️ {suggestion}")
        } else if applied {
            format!("🤖 **Suggested diagnosis** (added to your draft):\n>>> {suggestion}")
        } else {
            format!(
                "🤖 **Suggested diagnosis** (your draft of order #{order_id} was closed, nothing was saved):\n>>> {suggestion}"
            )
        };
        ctx.say(views::truncate_message(&reply, views::MAX_MESSAGE_LEN))
            .await?;
        Ok(())
    }

    /// Commits your draft: updates the order and adjusts inventory together.
    #[poise::command(slash_command, rename = "save")]
    pub async fn draft_save(ctx: Context<'_>) -> Result<()> {
        let author = actor(ctx);
        let key = author_key(ctx);

        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let Some(pending) = drafts.get(&key).cloned() else {
            drop(drafts);
            return reply_error(ctx, Error::NoOpenDraft).await;
        };

        let mut state = data.state.lock().await;
        let saved = match pending.commit(&mut state, &author, Utc::now()) {
            Ok(order) => order,
            Err(e) => {
                drop(state);
                drop(drafts);
                return reply_error(ctx, e).await;
            }
        };
        drafts.remove(&key);
        state
            .persist_many(
                &data.database,
                &[CollectionKey::Inventory, CollectionKey::Orders],
            )
            .await?;
        drop(state);
        drop(drafts);

        info!("{author} saved draft of order #{}", saved.id);
        ctx.say(format!(
            "💾 Order **#{}** saved. Total: **{}**.",
            saved.id,
            format_currency(saved.total_cost)
        ))
        .await?;
        Ok(())
    }

    /// Discards your draft without changing anything.
    #[poise::command(slash_command, rename = "close")]
    pub async fn draft_close(ctx: Context<'_>) -> Result<()> {
        let removed = ctx.data().drafts.lock().await.remove(&author_key(ctx));
        match removed {
            Some(discarded) => {
                ctx.say(format!(
                    "🚪 Draft of order #{} discarded.",
                    discarded.order_id()
                ))
                .await?;
            }
            None => return reply_error(ctx, Error::NoOpenDraft).await,
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
