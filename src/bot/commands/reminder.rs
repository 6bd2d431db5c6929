//! Part reminder Discord commands - `/reminder add|list|advance|edit|delete`.

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
        core::{
            reminder::{self, ReminderInput},
            storage::CollectionKey,
        },
        errors::Result,
        models::ReminderStatus,
    };
    use std::fmt::Write;

    /// Parent command for parts that need to be bought.
    #[poise::command(
        slash_command,
        subcommands(
            "reminder_add",
            "reminder_list",
            "reminder_advance",
            "reminder_edit",
            "reminder_delete"
        )
    )]
    pub async fn reminder(ctx: Context<'_>) -> Result<()> {
        let help_text = "Part reminder commands. Available subcommands:\n\
            `/reminder add` - Note a part to buy\n\
            `/reminder list` - Open reminders first\n\
            `/reminder advance` - Pending → Ordered → Received\n\
            `/reminder edit` - Change part, quantity or notes\n\
            `/reminder delete` - Delete a reminder";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Notes a part that needs to be bought.
    #[poise::command(slash_command, rename = "add")]
    pub async fn reminder_add(
        ctx: Context<'_>,
        #[description = "Part to buy"] part_name: String,
        #[description = "Units to buy. Defaults to 1."] quantity: Option<u32>,
        #[description = "Supplier, order number or other notes"] notes: Option<String>,
    ) -> Result<()> {
        let input = ReminderInput {
            part_name,
            quantity: quantity.unwrap_or(1),
            notes: notes.unwrap_or_default(),
        };

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let created = match reminder::create_reminder(&mut state, input) {
            Ok(r) => r,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Reminders).await?;
        drop(state);

        ctx.say(format!("📝 Reminder added:\n{}", views::reminder_line(&created)))
            .await?;
        Ok(())
    }

    /// Lists reminders: pending, then ordered, then received.
    #[poise::command(slash_command, rename = "list")]
    pub async fn reminder_list(
        ctx: Context<'_>,
        #[description = "Also show received reminders. Defaults to false."] show_received: Option<
            bool,
        >,
    ) -> Result<()> {
        let show_received = show_received.unwrap_or(false);
        let text = {
            let state = ctx.data().state.lock().await;
            let mut out = String::new();
            for r in reminder::sorted_reminders(&state.reminders) {
                if show_received || r.status != ReminderStatus::Received {
                    let _ = writeln!(out, "{}", views::reminder_line(r));
                }
            }
            out
        };

        if text.is_empty() {
            ctx.say("✅ Nothing to buy.").await?;
        } else {
            ctx.say(views::truncate_message(
                &format!("**Part reminders**\n{text}"),
                views::MAX_MESSAGE_LEN,
            ))
            .await?;
        }
        Ok(())
    }

    /// Moves a reminder to its next status.
    #[poise::command(slash_command, rename = "advance")]
    pub async fn reminder_advance(
        ctx: Context<'_>,
        #[description = "Reminder"]
        #[autocomplete = "autocomplete::autocomplete_reminder"]
        reminder: String,
    ) -> Result<()> {
        let Some(reminder_id) = parse_record_id(&reminder) else {
            return unknown_choice(ctx, "reminder", &reminder).await;
        };

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let updated = match reminder::advance_reminder(&mut state, reminder_id) {
            Ok(r) => r,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Reminders).await?;
        drop(state);

        ctx.say(format!(
            "✅ Reminder #{} ({}) is now **{}**.",
            updated.id, updated.part_name, updated.status
        ))
        .await?;
        Ok(())
    }

    /// Edits a reminder's part, quantity or notes. Its status is kept.
    #[poise::command(slash_command, rename = "edit")]
    pub async fn reminder_edit(
        ctx: Context<'_>,
        #[description = "Reminder"]
        #[autocomplete = "autocomplete::autocomplete_reminder"]
        reminder: String,
        #[description = "New part name"] part_name: Option<String>,
        #[description = "New quantity"] quantity: Option<u32>,
        #[description = "New notes"] notes: Option<String>,
    ) -> Result<()> {
        let Some(reminder_id) = parse_record_id(&reminder) else {
            return unknown_choice(ctx, "reminder", &reminder).await;
        };

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let Some(current) = state.reminder(reminder_id).cloned() else {
            drop(state);
            ctx.say(format!("❌ Part reminder #{reminder_id} not found"))
                .await?;
            return Ok(());
        };

        let input = ReminderInput {
            part_name: part_name.unwrap_or(current.part_name),
            quantity: quantity.unwrap_or(current.quantity),
            notes: notes.unwrap_or(current.notes),
        };
        let updated = match reminder::update_reminder(&mut state, reminder_id, input) {
            Ok(r) => r,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Reminders).await?;
        drop(state);

        ctx.say(format!("✅ Reminder updated:\n{}", views::reminder_line(&updated)))
            .await?;
        Ok(())
    }

    /// Deletes a reminder.
    #[poise::command(slash_command, rename = "delete")]
    pub async fn reminder_delete(
        ctx: Context<'_>,
        #[description = "Reminder"]
        #[autocomplete = "autocomplete::autocomplete_reminder"]
        reminder: String,
        #[description = "Set to true to confirm the deletion"] confirm: bool,
    ) -> Result<()> {
        let Some(reminder_id) = parse_record_id(&reminder) else {
            return unknown_choice(ctx, "reminder", &reminder).await;
        };
        if !confirm {
            ctx.say(format!(
                "⚠️ Reminder #{reminder_id} was not deleted. Run the command again with `confirm: True`."
            ))
            .await?;
            return Ok(());
        }

        let data = ctx.data();
        let mut state = data.state.lock().await;
        let removed = match reminder::delete_reminder(&mut state, reminder_id) {
            Ok(r) => r,
            Err(e) => {
                drop(state);
                return reply_error(ctx, e).await;
            }
        };
        state.persist(&data.database, CollectionKey::Reminders).await?;
        drop(state);

        ctx.say(format!(
            "🗑️ Reminder #{} ({}) deleted.",
            removed.id, removed.part_name
        ))
        .await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
