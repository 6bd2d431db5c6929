//! Unified error types for Repair Desk.
//!
//! Every fallible operation in the crate returns [`Result`]. Variants carry
//! structured fields so the bot layer can render precise messages to the
//! operator.

use thiserror::Error;

/// Crate-wide error type.
#[derive(Debug, Error)]
pub enum Error {
    /// Invalid configuration or invalid user input that is not a money amount
    #[error("Configuration error: {message}")]
    Config {
        /// Human-readable description
        message: String,
    },

    /// Underlying database failure
    #[error("Database error: {0}")]
    Database(#[from] sea_orm::DbErr),

    /// JSON (de)serialization failure outside of backup import
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Filesystem failure
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Missing or malformed environment variable
    #[error("Environment variable error: {0}")]
    EnvVar(#[from] std::env::VarError),

    /// No client with this id
    #[error("Client #{id} not found")]
    ClientNotFound {
        /// Requested client id
        id: i64,
    },

    /// No inventory item with this id
    #[error("Inventory item #{id} not found")]
    ItemNotFound {
        /// Requested item id
        id: i64,
    },

    /// No service order with this id
    #[error("Service order #{id} not found")]
    OrderNotFound {
        /// Requested order id
        id: i64,
    },

    /// No part reminder with this id
    #[error("Part reminder #{id} not found")]
    ReminderNotFound {
        /// Requested reminder id
        id: i64,
    },

    /// Not enough stock on hand for the requested part usage
    #[error("Insufficient stock for '{item}': {available} available, {requested} requested")]
    InsufficientStock {
        /// Item name
        item: String,
        /// Units currently available
        available: u32,
        /// Units the operation needs
        requested: u32,
    },

    /// Money amount that is negative, NaN or infinite
    #[error("Invalid amount: {amount}")]
    InvalidAmount {
        /// Offending value
        amount: f64,
    },

    /// Quantity of zero where at least one unit is required
    #[error("Invalid quantity: {quantity}")]
    InvalidQuantity {
        /// Offending value
        quantity: u32,
    },

    /// Reminder already at its final state
    #[error("Reminder #{id} has already been received")]
    ReminderAlreadyReceived {
        /// Reminder id
        id: i64,
    },

    /// Largest identifier already in use, no new record can be numbered
    #[error("No identifiers left for new {collection} records")]
    IdsExhausted {
        /// Collection key
        collection: &'static str,
    },

    /// Operator has no open order draft
    #[error("No open draft. Use `/draft open` first")]
    NoOpenDraft,

    /// Backup import could not parse the uploaded document
    #[error("Backup error: {message}")]
    Backup {
        /// Human-readable description
        message: String,
    },

    /// Text-generation collaborator failure (never surfaced to operators)
    #[error("Text generation error: {message}")]
    TextGeneration {
        /// Human-readable description
        message: String,
    },

    /// Serenity/Poise framework error
    #[error("Discord framework error: {0}")]
    Framework(Box<poise::serenity_prelude::Error>),
}

impl Error {
    /// Whether the operator can act on this error (bad input, missing record,
    /// not enough stock). Other errors are infrastructure failures.
    #[must_use]
    pub const fn is_user_facing(&self) -> bool {
        matches!(
            self,
            Self::Config { .. }
                | Self::ClientNotFound { .. }
                | Self::ItemNotFound { .. }
                | Self::OrderNotFound { .. }
                | Self::ReminderNotFound { .. }
                | Self::InsufficientStock { .. }
                | Self::InvalidAmount { .. }
                | Self::InvalidQuantity { .. }
                | Self::ReminderAlreadyReceived { .. }
                | Self::IdsExhausted { .. }
                | Self::NoOpenDraft
                | Self::Backup { .. }
        )
    }
}

impl From<poise::serenity_prelude::Error> for Error {
    fn from(value: poise::serenity_prelude::Error) -> Self {
        Self::Framework(Box::new(value))
    }
}

impl From<reqwest::Error> for Error {
    fn from(value: reqwest::Error) -> Self {
        Self::TextGeneration {
            message: value.to_string(),
        }
    }
}

/// Convenience `Result` type
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_facing_classification() {
        assert!(Error::NoOpenDraft.is_user_facing());
        assert!(
            Error::InsufficientStock {
                item: "Toner".to_string(),
                available: 1,
                requested: 2,
            }
            .is_user_facing()
        );
        assert!(!Error::Database(sea_orm::DbErr::Custom("boom".to_string())).is_user_facing());
    }

    #[test]
    fn test_insufficient_stock_message() {
        let err = Error::InsufficientStock {
            item: "Toner".to_string(),
            available: 1,
            requested: 2,
        };
        assert_eq!(
            err.to_string(),
            "Insufficient stock for 'Toner': 1 available, 2 requested"
        );
    }
}
