//! Autocomplete handlers for Discord slash command parameters.
//!
//! Record parameters are plain strings whose suggestions start with the record
//! id (`#12 ...`). Commands turn the chosen string back into an id with
//! [`parse_record_id`], so an operator may also type a bare id.

use crate::{
    bot::{Context, views},
    core::{client, inventory, order, reminder},
};

/// Discord autocomplete limit
const MAX_CHOICES: usize = 25;

/// Extracts the record id from an autocomplete choice such as `#12 Ana Souza`
/// or from a bare number.
#[must_use]
pub fn parse_record_id(value: &str) -> Option<i64> {
    let digits: String = value
        .trim()
        .trim_start_matches('#')
        .chars()
        .take_while(char::is_ascii_digit)
        .collect();
    digits.parse().ok()
}

/// Suggests clients whose name, phone or email matches the partial input.
pub async fn autocomplete_client(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let state = ctx.data().state.lock().await;
    client::search_clients(&state, partial)
        .into_iter()
        .map(views::client_choice)
        .take(MAX_CHOICES)
        .collect()
}

/// Suggests inventory items by name, with their stock on hand.
pub async fn autocomplete_item(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let state = ctx.data().state.lock().await;
    inventory::search_items(&state, partial)
        .into_iter()
        .map(views::item_choice)
        .take(MAX_CHOICES)
        .collect()
}

/// Suggests orders by id, equipment, serial number or client name.
pub async fn autocomplete_order(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let state = ctx.data().state.lock().await;
    order::search_orders(&state, partial)
        .into_iter()
        .map(|o| views::order_choice(&state, o))
        .take(MAX_CHOICES)
        .collect()
}

/// Suggests reminders, open ones first.
pub async fn autocomplete_reminder(ctx: Context<'_>, partial: &str) -> Vec<String> {
    let state = ctx.data().state.lock().await;
    let partial = partial.trim().trim_start_matches('#').to_lowercase();
    reminder::sorted_reminders(&state.reminders)
        .into_iter()
        .filter(|r| {
            r.id.to_string().starts_with(&partial) || r.part_name.to_lowercase().contains(&partial)
        })
        .map(views::reminder_choice)
        .take(MAX_CHOICES)
        .collect()
}
