//! Dashboard statistics and chart data.
//!
//! Everything here is a pure recomputation over the current collections and
//! returns structured data or preformatted text for the bot layer.

use crate::{
    core::state::ShopState,
    models::{InventoryItem, OrderStatus, ReminderStatus},
};

/// Headline numbers shown on the dashboard.
#[derive(Debug, Clone, PartialEq)]
pub struct DashboardStats {
    /// Sum of `total_cost` over Ready and Delivered orders
    pub revenue: f64,
    /// Orders not yet delivered
    pub active_orders: usize,
    /// Items at or below their minimum stock
    pub low_stock_items: usize,
    /// Reminders still pending
    pub pending_reminders: usize,
    /// Number of registered clients
    pub total_clients: usize,
}

/// Computes the dashboard numbers.
#[must_use]
pub fn compute_stats(state: &ShopState) -> DashboardStats {
    DashboardStats {
        revenue: state
            .orders
            .iter()
            .filter(|o| o.status.is_billable())
            .map(|o| o.total_cost)
            .sum(),
        active_orders: state
            .orders
            .iter()
            .filter(|o| o.status != OrderStatus::Delivered)
            .count(),
        low_stock_items: state.inventory.iter().filter(|i| i.is_low_stock()).count(),
        pending_reminders: state
            .reminders
            .iter()
            .filter(|r| r.status == ReminderStatus::Pending)
            .count(),
        total_clients: state.clients.len(),
    }
}

/// Order count per status, every status present, in lifecycle order.
#[must_use]
pub fn status_chart(state: &ShopState) -> Vec<(OrderStatus, usize)> {
    OrderStatus::ALL
        .iter()
        .map(|status| {
            let count = state.orders.iter().filter(|o| o.status == *status).count();
            (*status, count)
        })
        .collect()
}

/// Formats a money amount, e.g. `$1234.50`.
#[must_use]
pub fn format_currency(amount: f64) -> String {
    if amount < 0.0 {
        format!("-${:.2}", amount.abs())
    } else {
        format!("${amount:.2}")
    }
}

/// Text bar for chart rows, e.g. `██████░░░░`.
///
/// `count` is scaled against `max`; a zero `max` yields an empty bar.
#[must_use]
pub fn format_bar(count: usize, max: usize, bar_length: usize) -> String {
    let filled = if max == 0 {
        0
    } else {
        (count * bar_length).div_ceil(max).min(bar_length)
    };
    let empty = bar_length.saturating_sub(filled);
    format!("{}{}", "█".repeat(filled), "░".repeat(empty))
}

/// Renders the whole dashboard as Discord markdown.
#[must_use]
pub fn format_dashboard(state: &ShopState) -> String {
    use std::fmt::Write;

    let stats = compute_stats(state);
    let chart = status_chart(state);
    let max = chart.iter().map(|(_, c)| *c).max().unwrap_or(0);

    let mut out = format!(
        "**📊 Dashboard**\n\
         Revenue (ready + delivered): **{}**\n\
         Active orders: **{}**\n\
         Low-stock items: **{}**\n\
         Pending reminders: **{}**\n\
         Clients: **{}**\n\n\
         **Orders by status**\n```\n",
        format_currency(stats.revenue),
        stats.active_orders,
        stats.low_stock_items,
        stats.pending_reminders,
        stats.total_clients,
    );

    for (status, count) in &chart {
        let _ = writeln!(out, "{:<17}{} {count}", status.label(), format_bar(*count, max, 10));
    }
    out.push_str("```");

    let low: Vec<&InventoryItem> = state.inventory.iter().filter(|i| i.is_low_stock()).collect();
    if !low.is_empty() {
        out.push_str("\n**⚠️ Low stock**\n");
        for item in low {
            let _ = writeln!(
                out,
                "• #{} {} - {} on hand (min {})",
                item.id, item.name, item.quantity, item.min_stock
            );
        }
    }

    out
}
