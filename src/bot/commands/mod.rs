//! Discord command implementations organized by record type.

#![allow(clippy::too_long_first_doc_paragraph)]

/// Full-data export and import
pub mod backup;

/// Client commands
pub mod client;

/// Order draft commands
pub mod draft;

/// General utility commands
pub mod general;

/// Inventory commands
pub mod inventory;

/// Service order commands
pub mod order;

/// Part reminder commands
pub mod reminder;

use crate::{
    bot::{BotData, Context},
    errors::{Error, Result},
};

// Export commands
pub use backup::*;
pub use client::*;
pub use draft::*;
pub use general::*;
pub use inventory::*;
pub use order::*;
pub use reminder::*;

/// Every command the bot registers.
#[must_use]
pub fn all() -> Vec<poise::Command<BotData, Error>> {
    vec![
        ping(),
        help(),
        dashboard(),
        client(),
        inventory(),
        order(),
        draft(),
        reminder(),
        backup(),
    ]
}

/// Replies that a record parameter did not name a record.
pub(crate) async fn unknown_choice(ctx: Context<'_>, kind: &str, value: &str) -> Result<()> {
    ctx.say(format!(
        "❌ Could not find a {kind} matching '{value}'. Pick one from the suggestions."
    ))
    .await?;
    Ok(())
}
