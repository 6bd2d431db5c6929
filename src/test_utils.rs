//! Shared test utilities for Repair Desk.
//!
//! Helpers for setting up an in-memory database, building records with
//! sensible defaults, and fake text generators that count their calls.

use crate::{
    assistant::{FALLBACK_MESSAGE, TextGenerator},
    errors::Result,
    models::{Client, InventoryItem, OrderStatus, PartReminder, ReminderStatus, ServiceOrder},
};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sea_orm::DatabaseConnection;
use std::sync::atomic::{AtomicUsize, Ordering};

/// Creates an in-memory `SQLite` database with all tables initialized.
pub async fn setup_test_db() -> Result<DatabaseConnection> {
    let db = sea_orm::Database::connect("sqlite::memory:").await?;
    crate::config::database::create_tables(&db).await?;
    Ok(db)
}

/// Client with empty contact details.
#[must_use]
pub fn sample_client(id: i64, name: &str) -> Client {
    Client {
        id,
        name: name.to_string(),
        phone: String::new(),
        email: String::new(),
        created_at: Utc::now(),
    }
}

/// Item priced at 10.0 cost / 25.0 sell with a threshold of 1.
#[must_use]
pub fn sample_item(id: i64, name: &str, quantity: u32) -> InventoryItem {
    InventoryItem {
        id,
        name: name.to_string(),
        quantity,
        cost_price: 10.0,
        sell_price: 25.0,
        min_stock: 1,
    }
}

/// Pending order with no history, no parts and zero costs.
#[must_use]
pub fn sample_order(id: i64, client_id: i64) -> ServiceOrder {
    let now = Utc::now();
    ServiceOrder {
        id,
        client_id,
        equipment_model: "HP LaserJet P1102".to_string(),
        serial_number: String::new(),
        problem_description: "Paper jam".to_string(),
        diagnosis: None,
        status: OrderStatus::Pending,
        history: Vec::new(),
        created_at: now,
        updated_at: now,
        labor_cost: 0.0,
        parts_cost: 0.0,
        total_cost: 0.0,
        parts_used: Vec::new(),
    }
}

/// Reminder for two units of a generic part.
#[must_use]
pub fn sample_reminder(id: i64, status: ReminderStatus, created_at: DateTime<Utc>) -> PartReminder {
    PartReminder {
        id,
        part_name: format!("Part {id}"),
        quantity: 2,
        notes: String::new(),
        status,
        created_at,
    }
}

/// Text generator that records how often it is called.
pub struct CountingGenerator {
    fail: bool,
    diagnose_calls: AtomicUsize,
    message_calls: AtomicUsize,
}

impl CountingGenerator {
    /// Always answers with the fallback message, like an unconfigured assistant.
    #[must_use]
    pub const fn failing() -> Self {
        Self {
            fail: true,
            diagnose_calls: AtomicUsize::new(0),
            message_calls: AtomicUsize::new(0),
        }
    }

    /// Answers by echoing its inputs.
    #[must_use]
    pub const fn echoing() -> Self {
        Self {
            fail: false,
            diagnose_calls: AtomicUsize::new(0),
            message_calls: AtomicUsize::new(0),
        }
    }

    /// Number of `diagnose` calls so far
    pub fn diagnose_calls(&self) -> usize {
        self.diagnose_calls.load(Ordering::SeqCst)
    }

    /// Number of `compose_client_message` calls so far
    pub fn message_calls(&self) -> usize {
        self.message_calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl TextGenerator for CountingGenerator {
    async fn diagnose(&self, equipment_model: &str, problem: &str) -> String {
        self.diagnose_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            FALLBACK_MESSAGE.to_string()
        } else {
            format!("Diagnosis for {equipment_model}: {problem}")
        }
    }

    async fn compose_client_message(
        &self,
        client_name: &str,
        equipment_model: &str,
        status: &str,
        details: &str,
    ) -> String {
        self.message_calls.fetch_add(1, Ordering::SeqCst);
        if self.fail {
            FALLBACK_MESSAGE.to_string()
        } else {
            format!("{client_name} | {equipment_model} | {status} | {details}")
        }
    }
}
