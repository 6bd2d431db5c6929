//! Domain records for the repair shop.
//!
//! These are plain serde structs; they are what gets stored in the JSON
//! collections and what backups contain. Field names serialize as camelCase.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;

/// A customer of the shop.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Client {
    /// Unique identifier
    pub id: i64,
    /// Full name
    pub name: String,
    /// Contact phone, free text
    #[serde(default)]
    pub phone: String,
    /// Contact e-mail, free text
    #[serde(default)]
    pub email: String,
    /// When the client was registered
    pub created_at: DateTime<Utc>,
}

/// A part or consumable kept in stock.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InventoryItem {
    /// Unique identifier
    pub id: i64,
    /// Part name (e.g., "Fuser unit HP M402")
    pub name: String,
    /// Units on hand
    pub quantity: u32,
    /// Purchase price per unit
    pub cost_price: f64,
    /// Price charged to clients per unit
    pub sell_price: f64,
    /// Stock at or below this level counts as low
    pub min_stock: u32,
}

impl InventoryItem {
    /// Whether the item is at or below its minimum-stock threshold.
    #[must_use]
    pub const fn is_low_stock(&self) -> bool {
        self.quantity <= self.min_stock
    }
}

/// Lifecycle state of a service order.
///
/// The declaration order is the nominal lifecycle order, but any status may be
/// set from any other.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum OrderStatus {
    /// Received, not yet looked at
    Pending,
    /// Technician is diagnosing
    Diagnosing,
    /// Quote sent, waiting for the client
    WaitingApproval,
    /// Approved and being repaired
    InRepair,
    /// Repaired, waiting for pickup
    Ready,
    /// Handed back to the client
    Delivered,
}

impl OrderStatus {
    /// All statuses in lifecycle order.
    pub const ALL: [Self; 6] = [
        Self::Pending,
        Self::Diagnosing,
        Self::WaitingApproval,
        Self::InRepair,
        Self::Ready,
        Self::Delivered,
    ];

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Diagnosing => "Diagnosing",
            Self::WaitingApproval => "Waiting Approval",
            Self::InRepair => "In Repair",
            Self::Ready => "Ready",
            Self::Delivered => "Delivered",
        }
    }

    /// Whether orders in this status count toward revenue.
    #[must_use]
    pub const fn is_billable(self) -> bool {
        matches!(self, Self::Ready | Self::Delivered)
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// One entry of an order's audit trail.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryEntry {
    /// Status of the order when the entry was written
    pub status: OrderStatus,
    /// When it happened
    pub timestamp: DateTime<Utc>,
    /// Who did it
    pub user: String,
    /// What happened
    pub description: String,
}

/// A part consumed by an order, snapshotted at the time it was added.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UsedPart {
    /// Inventory item this part was taken from
    pub item_id: i64,
    /// Item name at the time of use
    pub name: String,
    /// Units used
    pub quantity: u32,
    /// Price charged per unit
    pub unit_price: f64,
}

impl UsedPart {
    /// Line total
    #[must_use]
    pub fn subtotal(&self) -> f64 {
        f64::from(self.quantity) * self.unit_price
    }
}

/// A repair ticket.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ServiceOrder {
    /// Unique identifier
    pub id: i64,
    /// Owning client; may dangle after the client is deleted
    pub client_id: i64,
    /// Equipment make/model
    pub equipment_model: String,
    /// Equipment serial number
    #[serde(default)]
    pub serial_number: String,
    /// Problem reported by the client
    pub problem_description: String,
    /// Technician's diagnosis
    #[serde(default)]
    pub diagnosis: Option<String>,
    /// Current status
    pub status: OrderStatus,
    /// Audit trail, newest first
    #[serde(default)]
    pub history: Vec<HistoryEntry>,
    /// When the order was opened
    pub created_at: DateTime<Utc>,
    /// When the order last changed
    pub updated_at: DateTime<Utc>,
    /// Labor charge
    #[serde(default)]
    pub labor_cost: f64,
    /// Sum of part line totals
    #[serde(default)]
    pub parts_cost: f64,
    /// `labor_cost + parts_cost`
    #[serde(default)]
    pub total_cost: f64,
    /// Parts consumed by the repair
    #[serde(default)]
    pub parts_used: Vec<UsedPart>,
}

impl ServiceOrder {
    /// Recomputes `parts_cost` and `total_cost` from the part list and labor.
    pub fn recompute_costs(&mut self) {
        self.parts_cost = self.parts_used.iter().map(UsedPart::subtotal).sum();
        self.total_cost = self.labor_cost + self.parts_cost;
    }

    /// Units of `item_id` listed on this order.
    #[must_use]
    pub fn reserved_quantity(&self, item_id: i64) -> u32 {
        self.parts_used
            .iter()
            .filter(|p| p.item_id == item_id)
            .map(|p| p.quantity)
            .sum()
    }
}

/// State of a part reorder reminder.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum ReminderStatus {
    /// Needs to be ordered
    Pending,
    /// Ordered from a supplier
    Ordered,
    /// Arrived at the shop
    Received,
}

impl ReminderStatus {
    /// Next step in the lifecycle, `None` once received.
    #[must_use]
    pub const fn next(self) -> Option<Self> {
        match self {
            Self::Pending => Some(Self::Ordered),
            Self::Ordered => Some(Self::Received),
            Self::Received => None,
        }
    }

    /// Human-readable label
    #[must_use]
    pub const fn label(self) -> &'static str {
        match self {
            Self::Pending => "Pending",
            Self::Ordered => "Ordered",
            Self::Received => "Received",
        }
    }
}

impl fmt::Display for ReminderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// A note to reorder a part.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PartReminder {
    /// Unique identifier
    pub id: i64,
    /// Part to order
    pub part_name: String,
    /// Units to order
    pub quantity: u32,
    /// Free-text notes (supplier, reference, ...)
    #[serde(default)]
    pub notes: String,
    /// Lifecycle state
    pub status: ReminderStatus,
    /// When the reminder was written
    pub created_at: DateTime<Utc>,
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;

    #[test]
    fn test_reminder_status_steps_forward_only() {
        assert_eq!(ReminderStatus::Pending.next(), Some(ReminderStatus::Ordered));
        assert_eq!(ReminderStatus::Ordered.next(), Some(ReminderStatus::Received));
        assert_eq!(ReminderStatus::Received.next(), None);
    }

    #[test]
    fn test_order_deserializes_with_missing_optional_fields() {
        let json = r#"{
            "id": 3,
            "clientId": 1,
            "equipmentModel": "Epson L3150",
            "problemDescription": "Paper jam",
            "status": "Pending",
            "createdAt": "2024-03-01T10:00:00Z",
            "updatedAt": "2024-03-01T10:00:00Z"
        }"#;

        let order: ServiceOrder = serde_json::from_str(json).unwrap();
        assert_eq!(order.client_id, 1);
        assert!(order.diagnosis.is_none());
        assert!(order.parts_used.is_empty());
        assert_eq!(order.total_cost, 0.0);
    }

    #[test]
    fn test_reserved_quantity_sums_matching_lines() {
        let now = Utc::now();
        let mut order = ServiceOrder {
            id: 1,
            client_id: 1,
            equipment_model: "HP 1102".to_string(),
            serial_number: String::new(),
            problem_description: "Streaks".to_string(),
            diagnosis: None,
            status: OrderStatus::InRepair,
            history: Vec::new(),
            created_at: now,
            updated_at: now,
            labor_cost: 40.0,
            parts_cost: 0.0,
            total_cost: 0.0,
            parts_used: vec![
                UsedPart {
                    item_id: 7,
                    name: "Drum".to_string(),
                    quantity: 2,
                    unit_price: 30.0,
                },
                UsedPart {
                    item_id: 8,
                    name: "Roller".to_string(),
                    quantity: 1,
                    unit_price: 5.5,
                },
            ],
        };

        order.recompute_costs();
        assert_eq!(order.reserved_quantity(7), 2);
        assert_eq!(order.reserved_quantity(99), 0);
        assert_eq!(order.parts_cost, 65.5);
        assert_eq!(order.total_cost, 105.5);
    }
}
