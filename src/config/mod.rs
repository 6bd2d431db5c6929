/// Database configuration and connection management
pub mod database;

/// Shop and assistant settings loaded from config.toml
pub mod shop;

/// Operator nickname configuration from environment variables
pub mod users;
