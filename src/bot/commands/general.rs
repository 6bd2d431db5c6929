//! General Discord commands - ping, help and the dashboard.

// Inner module to suppress missing_docs warnings for poise macro-generated code
mod inner {
    #![allow(missing_docs)]

    use crate::{
        bot::{Context, views},
        core::report,
        errors::Result,
    };
    use poise::serenity_prelude as serenity;

    /// Responds with "Pong!" to test bot connectivity.
    #[poise::command(slash_command, prefix_command)]
    pub async fn ping(ctx: Context<'_>) -> Result<()> {
        ctx.say("Pong!").await?;
        Ok(())
    }

    /// Displays help information about available commands.
    #[poise::command(slash_command, prefix_command)]
    pub async fn help(ctx: Context<'_>) -> Result<()> {
        let help_text = "**Repair Desk Help**\n\
        Commands for running the repair counter.\n\n\
        **Records**\n\
        • `/client <add|list|show|print|delete>` - Manage clients.\n\
        • `/inventory <add|list|edit|delete|low>` - Manage parts on hand.\n\
        • `/order <new|list|show|status|print|delete>` - Manage service orders.\n\
        • `/reminder <add|list|advance|edit|delete>` - Track parts to buy.\n\n\
        **Editing an order**\n\
        • `/draft open <order>` - Start editing parts, labor and diagnosis.\n\
        • `/draft add_part`, `/draft remove_part`, `/draft labor`, `/draft diagnosis`, `/draft suggest`\n\
        • `/draft save` commits the changes, `/draft close` discards them.\n\n\
        **Other**\n\
        • `/dashboard` - Revenue, active orders and stock warnings.\n\
        • `/backup <export|import>` - Download or restore all data.\n\
        • `/ping` - Checks if the bot is responsive.";

        ctx.say(help_text).await?;
        Ok(())
    }

    /// Shows revenue, open work and stock warnings.
    #[poise::command(slash_command)]
    pub async fn dashboard(ctx: Context<'_>) -> Result<()> {
        let text = {
            let state = ctx.data().state.lock().await;
            report::format_dashboard(&state)
        };

        let embed = serenity::CreateEmbed::default()
            .title(ctx.data().config.shop.name.clone())
            .description(views::truncate_message(&text, views::MAX_MESSAGE_LEN))
            .color(0x0034_98DB);

        ctx.send(poise::CreateReply::default().embed(embed)).await?;
        Ok(())
    }
}

// Re-export all commands
pub use inner::*;
