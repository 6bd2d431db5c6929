//! Discord interaction handlers
//!
//! This module provides handlers for Discord interactions such as autocomplete.

/// Autocomplete handlers for clients, inventory items, orders and reminders
pub mod autocomplete;
