//! Printable documents for a single order or client.
//!
//! Output is plain monospaced text, suitable for a code block or a `.txt`
//! attachment.

use crate::{
    config::shop::ShopConfig,
    core::{client::orders_for_client, report::format_currency, state::ShopState},
    models::{Client, ServiceOrder},
};
use std::fmt::Write;

const RULE: &str = "------------------------------------------------------------";
const DATE_FORMAT: &str = "%Y-%m-%d %H:%M";

fn write_header(out: &mut String, shop: &ShopConfig, title: &str) {
    let _ = writeln!(out, "{}", shop.name);
    if !shop.address.is_empty() {
        let _ = writeln!(out, "{}", shop.address);
    }
    if !shop.phone.is_empty() {
        let _ = writeln!(out, "Phone: {}", shop.phone);
    }
    let _ = writeln!(out, "{RULE}");
    let _ = writeln!(out, "{title}");
    let _ = writeln!(out, "{RULE}");
}

/// Renders a service order receipt.
#[must_use]
pub fn render_order(state: &ShopState, shop: &ShopConfig, order: &ServiceOrder) -> String {
    let mut out = String::new();
    write_header(&mut out, shop, &format!("SERVICE ORDER #{}", order.id));

    let client = state.client(order.client_id);
    let _ = writeln!(out, "Date:      {}", order.created_at.format(DATE_FORMAT));
    let _ = writeln!(out, "Status:    {}", order.status);
    let _ = writeln!(out, "Client:    {}", client.map_or("N/A", |c| c.name.as_str()));
    if let Some(client) = client {
        let _ = writeln!(out, "Phone:     {}", client.phone);
        let _ = writeln!(out, "Email:     {}", client.email);
    }
    let _ = writeln!(out, "Equipment: {}", order.equipment_model);
    let _ = writeln!(out, "Serial:    {}", order.serial_number);
    let _ = writeln!(out, "\nProblem reported:\n  {}", order.problem_description);
    let _ = writeln!(
        out,
        "\nDiagnosis:\n  {}",
        order.diagnosis.as_deref().unwrap_or("(pending)")
    );

    if !order.parts_used.is_empty() {
        let _ = writeln!(out, "\nParts used:");
        let _ = writeln!(out, "  {:<30}{:>5}{:>11}{:>12}", "Item", "Qty", "Unit", "Subtotal");
        for part in &order.parts_used {
            let _ = writeln!(
                out,
                "  {:<30}{:>5}{:>11}{:>12}",
                part.name,
                part.quantity,
                format_currency(part.unit_price),
                format_currency(part.subtotal())
            );
        }
    }

    let _ = writeln!(out, "\n{RULE}");
    let _ = writeln!(out, "Labor: {:>20}", format_currency(order.labor_cost));
    let _ = writeln!(out, "Parts: {:>20}", format_currency(order.parts_cost));
    let _ = writeln!(out, "TOTAL: {:>20}", format_currency(order.total_cost));

    if !order.history.is_empty() {
        let _ = writeln!(out, "\nHistory:");
        for entry in &order.history {
            let _ = writeln!(
                out,
                "  {} [{}] {} - {}",
                entry.timestamp.format(DATE_FORMAT),
                entry.status,
                entry.user,
                entry.description
            );
        }
    }

    let _ = writeln!(out, "\n\nClient signature: ______________________________");
    out
}

/// Renders a client record with their orders.
#[must_use]
pub fn render_client(state: &ShopState, shop: &ShopConfig, client: &Client) -> String {
    let mut out = String::new();
    write_header(&mut out, shop, &format!("CLIENT #{}", client.id));

    let _ = writeln!(out, "Name:  {}", client.name);
    let _ = writeln!(out, "Phone: {}", client.phone);
    let _ = writeln!(out, "Email: {}", client.email);
    let _ = writeln!(out, "Since: {}", client.created_at.format("%Y-%m-%d"));

    let orders = orders_for_client(state, client.id);
    let _ = writeln!(out, "\nService orders ({}):", orders.len());
    for order in orders {
        let _ = writeln!(
            out,
            "  #{:<5}{:<28}{:<18}{:>12}",
            order.id,
            order.equipment_model,
            order.status.label(),
            format_currency(order.total_cost)
        );
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::UsedPart;
    use crate::test_utils::{sample_client, sample_order};

    fn shop() -> ShopConfig {
        ShopConfig {
            name: "Fix-It Printers".to_string(),
            phone: "555-0100".to_string(),
            address: "12 Main St".to_string(),
        }
    }

    #[test]
    fn test_render_order_includes_parts_and_totals() {
        let mut order = sample_order(7, 1);
        order.labor_cost = 40.0;
        order.parts_used.push(UsedPart {
            item_id: 1,
            name: "Pickup roller".to_string(),
            quantity: 2,
            unit_price: 15.0,
        });
        order.recompute_costs();
        let state = ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            orders: vec![order.clone()],
            ..Default::default()
        };

        let text = render_order(&state, &shop(), &order);

        assert!(text.starts_with("Fix-It Printers"));
        assert!(text.contains("SERVICE ORDER #7"));
        assert!(text.contains("Ana Souza"));
        assert!(text.contains("Pickup roller"));
        assert!(text.contains("$70.00"));
    }

    #[test]
    fn test_render_order_for_deleted_client_shows_na() {
        let order = sample_order(1, 99);
        let state = ShopState {
            orders: vec![order.clone()],
            ..Default::default()
        };
        let text = render_order(&state, &shop(), &order);
        assert!(text.contains("Client:    N/A"));
    }

    #[test]
    fn test_render_client_lists_orders() {
        let client = sample_client(1, "Ana Souza");
        let state = ShopState {
            clients: vec![client.clone()],
            orders: vec![sample_order(1, 1), sample_order(2, 2)],
            ..Default::default()
        };

        let text = render_client(&state, &shop(), &client);
        assert!(text.contains("CLIENT #1"));
        assert!(text.contains("Service orders (1):"));
    }
}
