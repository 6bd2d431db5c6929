//! Bot layer - Discord-specific interface and command handlers
//!
//! This module provides the Discord dashboard for the repair shop: slash
//! commands, autocomplete handlers, shared bot state and framework setup.

/// Discord command implementations (clients, inventory, orders, drafts, reminders, backup, general)
pub mod commands;
/// Discord interaction handlers (autocomplete, etc.)
pub mod handlers;
/// Text rendering of records for Discord messages
pub mod views;

use crate::{
    assistant::TextGenerator,
    config::{shop::AppConfig, users::operator_label},
    core::{draft::OrderDraft, state::ShopState},
    errors::{Error, Result},
};
use poise::serenity_prelude as serenity;
use sea_orm::DatabaseConnection;
use std::{collections::HashMap, sync::Arc};
use tokio::sync::Mutex;
use tracing::{error, info};

/// Poise context used by every command.
pub type Context<'a> = poise::Context<'a, BotData, Error>;

/// Shared data available to all bot commands.
///
/// Lock order: `drafts` before `state` whenever both are needed.
pub struct BotData {
    /// Database connection for collection persistence
    pub database: DatabaseConnection,
    /// The four shop collections
    pub state: Mutex<ShopState>,
    /// Open order drafts, one per operator (keyed by Discord user id)
    pub drafts: Mutex<HashMap<u64, OrderDraft>>,
    /// Text-generation collaborator
    pub assistant: Arc<dyn TextGenerator>,
    /// Settings from config.toml
    pub config: AppConfig,
    /// Discord user id to operator label
    pub nicknames: HashMap<String, String>,
}

impl BotData {
    /// Creates a new `BotData` instance from loaded state and configuration.
    #[must_use]
    pub fn new(
        database: DatabaseConnection,
        state: ShopState,
        assistant: Arc<dyn TextGenerator>,
        config: AppConfig,
        nicknames: HashMap<String, String>,
    ) -> Self {
        Self {
            database,
            state: Mutex::new(state),
            drafts: Mutex::new(HashMap::new()),
            assistant,
            config,
            nicknames,
        }
    }
}

/// Label recorded in order history for the command author.
#[must_use]
pub fn actor(ctx: Context<'_>) -> String {
    let author = ctx.author();
    operator_label(&ctx.data().nicknames, &author.id.to_string(), &author.name)
}

/// Replies with the error if the operator can act on it, otherwise propagates it
/// to the framework error handler.
pub async fn reply_error(ctx: Context<'_>, error: Error) -> Result<()> {
    if error.is_user_facing() {
        ctx.say(format!("❌ {error}")).await?;
        Ok(())
    } else {
        Err(error)
    }
}

async fn on_error(error: poise::FrameworkError<'_, BotData, Error>) {
    match error {
        poise::FrameworkError::Setup { error, .. } => {
            error!("Failed to start bot: {error:?}");
        }
        poise::FrameworkError::Command { error, ctx, .. } => {
            error!("Error in command `{}`: {error:?}", ctx.command().name);
            if let Err(e) = ctx.say(format!("An error occurred: {error}")).await {
                error!("Failed to send error message: {e}");
            }
        }
        error => {
            if let Err(e) = poise::builtins::on_error(error).await {
                error!("Error while handling error: {e}");
            }
        }
    }
}

/// Registers commands and runs the Discord client until it stops.
///
/// Commands are registered in `dev_guild` when given (instant updates),
/// globally otherwise.
pub async fn run_bot(token: String, data: BotData, dev_guild: Option<u64>) -> Result<()> {
    let framework = poise::Framework::builder()
        .options(poise::FrameworkOptions {
            commands: commands::all(),
            on_error: |error| Box::pin(on_error(error)),
            ..Default::default()
        })
        .setup(move |ctx, ready, framework| {
            Box::pin(async move {
                info!("Logged in as {}", ready.user.name);
                if let Some(guild_id) = dev_guild {
                    let guild_id = serenity::GuildId::new(guild_id);
                    poise::builtins::register_in_guild(ctx, &framework.options().commands, guild_id)
                        .await?;
                    info!("Registered commands in guild {guild_id}");
                } else {
                    poise::builtins::register_globally(ctx, &framework.options().commands).await?;
                    info!("Registered commands globally");
                }
                Ok(data)
            })
        })
        .build();

    let intents = serenity::GatewayIntents::non_privileged();

    info!("Setting up Serenity client for Poise framework...");
    let mut client = serenity::ClientBuilder::new(token, intents)
        .framework(framework)
        .await?;

    info!("Starting bot client...");
    client.start().await?;
    Ok(())
}

pub use commands::*;
pub use handlers::*;
