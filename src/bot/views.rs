//! Text rendering of shop records for Discord replies.
//!
//! Discord caps messages at 2000 characters, so list views go through
//! [`truncate_message`].

use crate::{
    core::{draft::OrderDraft, report::format_currency, state::ShopState},
    models::{Client, InventoryItem, PartReminder, ServiceOrder},
};
use std::fmt::Write;

/// Longest reply body we send, leaving room for Discord formatting.
pub const MAX_MESSAGE_LEN: usize = 1900;

/// Cuts `text` so it fits in one message, preferring line boundaries.
///
/// A line too long to fit is cut inside, at a character boundary, so the
/// start of a long paragraph is kept.
#[must_use]
pub fn truncate_message(text: &str, max_len: usize) -> String {
    if text.len() <= max_len {
        return text.to_string();
    }
    let budget = max_len.saturating_sub('…'.len_utf8());
    let mut out = String::new();
    for line in text.lines() {
        if out.len() + line.len() + 1 > budget {
            let room = budget.saturating_sub(out.len());
            let mut cut = room.min(line.len());
            while !line.is_char_boundary(cut) {
                cut -= 1;
            }
            out.push_str(&line[..cut]);
            break;
        }
        out.push_str(line);
        out.push('\n');
    }
    out.push('…');
    out
}

/// Autocomplete label for a client, e.g. `#3 Ana Souza`.
#[must_use]
pub fn client_choice(client: &Client) -> String {
    format!("#{} {}", client.id, client.name)
}

/// Autocomplete label for an item, e.g. `#2 Toner (5 in stock)`.
#[must_use]
pub fn item_choice(item: &InventoryItem) -> String {
    format!("#{} {} ({} in stock)", item.id, item.name, item.quantity)
}

/// Autocomplete label for an order.
#[must_use]
pub fn order_choice(state: &ShopState, order: &ServiceOrder) -> String {
    format!(
        "#{} {} - {} [{}]",
        order.id,
        state.client_name(order.client_id),
        order.equipment_model,
        order.status
    )
}

/// Autocomplete label for a reminder.
#[must_use]
pub fn reminder_choice(reminder: &PartReminder) -> String {
    format!(
        "#{} {} x{} [{}]",
        reminder.id, reminder.part_name, reminder.quantity, reminder.status
    )
}

/// One-line summary of a client.
#[must_use]
pub fn client_line(client: &Client) -> String {
    let mut line = format!("• **#{}** {}", client.id, client.name);
    if !client.phone.is_empty() {
        let _ = write!(line, " · 📞 {}", client.phone);
    }
    if !client.email.is_empty() {
        let _ = write!(line, " · ✉️ {}", client.email);
    }
    line
}

/// One-line summary of an inventory item.
#[must_use]
pub fn item_line(item: &InventoryItem) -> String {
    let warning = if item.is_low_stock() { " ⚠️" } else { "" };
    format!(
        "• **#{}** {} - {} on hand (min {}){warning} · cost {} · sell {}",
        item.id,
        item.name,
        item.quantity,
        item.min_stock,
        format_currency(item.cost_price),
        format_currency(item.sell_price)
    )
}

/// One-line summary of an order.
#[must_use]
pub fn order_line(state: &ShopState, order: &ServiceOrder) -> String {
    format!(
        "• **#{}** {} · {} · {} · {}",
        order.id,
        state.client_name(order.client_id),
        order.equipment_model,
        order.status,
        format_currency(order.total_cost)
    )
}

/// One-line summary of a reminder.
#[must_use]
pub fn reminder_line(reminder: &PartReminder) -> String {
    let mut line = format!(
        "• **#{}** {} x{} - {}",
        reminder.id, reminder.part_name, reminder.quantity, reminder.status
    );
    if !reminder.notes.is_empty() {
        let _ = write!(line, " · {}", reminder.notes);
    }
    line
}

fn write_costs(out: &mut String, order: &ServiceOrder) {
    if order.parts_used.is_empty() {
        out.push_str("Parts: none\n");
    } else {
        out.push_str("Parts:\n");
        for part in &order.parts_used {
            let _ = writeln!(
                out,
                "  • {} x{} @ {} = {} (item #{})",
                part.name,
                part.quantity,
                format_currency(part.unit_price),
                format_currency(part.subtotal()),
                part.item_id
            );
        }
    }
    let _ = writeln!(
        out,
        "Labor {} + Parts {} = **Total {}**",
        format_currency(order.labor_cost),
        format_currency(order.parts_cost),
        format_currency(order.total_cost)
    );
}

/// Detailed view of an order with its latest history.
#[must_use]
pub fn order_detail(state: &ShopState, order: &ServiceOrder) -> String {
    let mut out = format!(
        "**Service order #{}** - {}\n\
         Client: {}\n\
         Equipment: {} (S/N {})\n\
         Problem: {}\n\
         Diagnosis: {}\n",
        order.id,
        order.status,
        state.client_name(order.client_id),
        order.equipment_model,
        if order.serial_number.is_empty() { "-" } else { order.serial_number.as_str() },
        order.problem_description,
        order.diagnosis.as_deref().unwrap_or("(pending)"),
    );
    write_costs(&mut out, order);

    if !order.history.is_empty() {
        out.push_str("History:\n");
        for entry in order.history.iter().take(5) {
            let _ = writeln!(
                out,
                "  • {} [{}] {}: {}",
                entry.timestamp.format("%Y-%m-%d %H:%M"),
                entry.status,
                entry.user,
                entry.description
            );
        }
    }
    out
}

/// View of an open draft.
#[must_use]
pub fn draft_detail(state: &ShopState, draft: &OrderDraft) -> String {
    let order = draft.current();
    let mut out = format!(
        "**Draft of order #{}** (unsaved) - {} · {}\n\
         Diagnosis: {}\n",
        order.id,
        state.client_name(order.client_id),
        order.equipment_model,
        order.diagnosis.as_deref().unwrap_or("(pending)"),
    );
    write_costs(&mut out, order);
    out.push_str("Use `/draft save` to commit or `/draft close` to discard.");
    out
}
