//! Backup Discord commands - `/backup export|import`.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, reply_error},
        core::{backup, storage::CollectionKey},
        errors::{Error, Result},
    };
    use chrono::Utc;
    use poise::serenity_prelude as serenity;
    use tracing::{info, warn};

    /// Parent command for full-data backups.
    #[poise::command(slash_command, subcommands("backup_export", "backup_import"))]
    pub async fn backup(ctx: Context<'_>) -> Result<()> {
        let help_text = "Backup commands. Available subcommands:\n\
            `/backup export` - Download every client, part, order and reminder as JSON\n\
            `/backup import` - Replace all data with an uploaded backup";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Sends all shop data as a JSON attachment.
    #[poise::command(slash_command, rename = "export")]
    pub async fn backup_export(ctx: Context<'_>) -> Result<()> {
        let now = Utc::now();
        let document = {
            let state = ctx.data().state.lock().await;
            backup::export_backup(&state, now)?
        };

        let attachment =
            serenity::CreateAttachment::bytes(document.into_bytes(), backup::backup_file_name(now));
        ctx.send(
            poise::CreateReply::default()
                .content("💾 Backup of all shop data")
                .attachment(attachment),
        )
        .await?;
        info!("Backup exported by {}", ctx.author().name);
        Ok(())
    }

    /// Replaces all shop data with an uploaded backup. Open drafts are discarded.
    #[poise::command(slash_command, rename = "import")]
    pub async fn backup_import(
        ctx: Context<'_>,
        #[description = "Backup file produced by /backup export"] file: serenity::Attachment,
        #[description = "Set to true to confirm replacing all data"] confirm: bool,
    ) -> Result<()> {
        if !confirm {
            ctx.say(
                "⚠️ Nothing was imported. Importing replaces every client, part, order and \
                 reminder. Run the command again with `confirm: True`.",
            )
            .await?;
            return Ok(());
        }

        ctx.defer().await?;

        let bytes = file.download().await?;
        let contents = match String::from_utf8(bytes) {
            Ok(text) => text,
            Err(e) => {
                warn!("Backup upload '{}' is not UTF-8: {e}", file.filename);
                return reply_error(
                    ctx,
                    Error::Backup {
                        message: "Invalid backup file: not a text document".to_string(),
                    },
                )
                .await;
            }
        };

        let data = ctx.data();
        let mut drafts = data.drafts.lock().await;
        let mut state = data.state.lock().await;
        if let Err(e) = backup::import_backup(&mut state, &contents) {
            drop(state);
            drop(drafts);
            return reply_error(ctx, e).await;
        }
        let discarded = drafts.len();
        drafts.clear();
        state.persist_many(&data.database, &CollectionKey::ALL).await?;
        let summary = format!(
            "✅ Backup imported: {} clients, {} parts, {} orders, {} reminders.",
            state.clients.len(),
            state.inventory.len(),
            state.orders.len(),
            state.reminders.len()
        );
        drop(state);
        drop(drafts);

        if discarded > 0 {
            ctx.say(format!("{summary}\n⚠️ {discarded} open draft(s) were discarded."))
                .await?;
        } else {
            ctx.say(summary).await?;
        }
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
