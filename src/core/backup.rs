//! Backup export and import.
//!
//! A backup is one JSON document holding all four collections, an RFC 3339
//! export timestamp and a version tag. Import replaces every collection
//! wholesale. Only the text has to be valid JSON: a missing, `null` or
//! non-array key becomes an empty collection, and records that do not match
//! the record shape are skipped with a warning.

use crate::{
    core::state::ShopState,
    errors::{Error, Result},
    models::{Client, InventoryItem, PartReminder, ServiceOrder},
};
use chrono::{DateTime, Utc};
use serde::{Serialize, de::DeserializeOwned};
use serde_json::Value;
use tracing::{info, warn};

/// Version tag written into every export.
pub const BACKUP_VERSION: &str = "1.0";

/// On-disk backup document.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Backup {
    /// Client records
    pub clients: Vec<Client>,
    /// Inventory items
    pub inventory: Vec<InventoryItem>,
    /// Service orders
    pub orders: Vec<ServiceOrder>,
    /// Part reminders
    pub reminders: Vec<PartReminder>,
    /// When the export was made
    pub export_date: Option<DateTime<Utc>>,
    /// Informational version tag
    pub version: Option<String>,
}

/// Serializes the whole shop into a pretty-printed backup document.
///
/// # Errors
/// Returns `Error::Serialization` if serialization fails.
pub fn export_backup(state: &ShopState, now: DateTime<Utc>) -> Result<String> {
    let backup = Backup {
        clients: state.clients.clone(),
        inventory: state.inventory.clone(),
        orders: state.orders.clone(),
        reminders: state.reminders.clone(),
        export_date: Some(now),
        version: Some(BACKUP_VERSION.to_string()),
    };
    Ok(serde_json::to_string_pretty(&backup)?)
}

/// File name offered for an export, e.g. `backup_printer_shop_2024-05-01.json`.
#[must_use]
pub fn backup_file_name(now: DateTime<Utc>) -> String {
    format!("backup_printer_shop_{}.json", now.format("%Y-%m-%d"))
}

/// Reads one collection out of a backup document.
fn lenient_collection<T: DeserializeOwned>(document: &Value, key: &str) -> Vec<T> {
    match document.get(key) {
        None | Some(Value::Null) => Vec::new(),
        Some(Value::Array(records)) => {
            let mut skipped = 0_usize;
            let parsed: Vec<T> = records
                .iter()
                .filter_map(|record| {
                    serde_json::from_value(record.clone())
                        .inspect_err(|e| {
                            skipped += 1;
                            warn!("Skipping malformed '{key}' record in backup: {e}");
                        })
                        .ok()
                })
                .collect();
            if skipped > 0 {
                warn!("Skipped {skipped} of {} '{key}' records", records.len());
            }
            parsed
        }
        Some(other) => {
            warn!("Backup key '{key}' is not a list ({other}), importing it as empty");
            Vec::new()
        }
    }
}

/// Parses a backup document into a fresh shop state.
///
/// # Errors
/// Returns `Error::Backup` if the text is not valid JSON.
pub fn parse_backup(contents: &str) -> Result<ShopState> {
    let document: Value = serde_json::from_str(contents).map_err(|e| Error::Backup {
        message: format!("Invalid backup file: {e}"),
    })?;
    if !document.is_object() {
        warn!("Backup document is not a JSON object, importing empty collections");
    }

    Ok(ShopState {
        clients: lenient_collection(&document, "clients"),
        inventory: lenient_collection(&document, "inventory"),
        orders: lenient_collection(&document, "orders"),
        reminders: lenient_collection(&document, "reminders"),
    })
}

/// Replaces `state` with the backup contents. `state` is untouched on error.
///
/// # Errors
/// Returns `Error::Backup` if the document is not valid backup JSON.
pub fn import_backup(state: &mut ShopState, contents: &str) -> Result<()> {
    let imported = parse_backup(contents)?;
    info!(
        "Imported backup: {} clients, {} items, {} orders, {} reminders",
        imported.clients.len(),
        imported.inventory.len(),
        imported.orders.len(),
        imported.reminders.len()
    );
    *state = imported;
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::models::ReminderStatus;
    use crate::test_utils::{sample_client, sample_item, sample_order, sample_reminder};
    use chrono::TimeZone;

    fn populated_state() -> ShopState {
        ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            inventory: vec![sample_item(1, "Toner", 3)],
            orders: vec![sample_order(1, 1)],
            reminders: vec![sample_reminder(1, ReminderStatus::Ordered, Utc::now())],
        }
    }

    #[test]
    fn test_export_then_import_reproduces_state() {
        let state = populated_state();
        let json = export_backup(&state, Utc::now()).unwrap();

        let mut restored = ShopState::default();
        import_backup(&mut restored, &json).unwrap();

        assert_eq!(restored, state);
    }

    #[test]
    fn test_export_contains_version_and_date() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 12, 0, 0).unwrap();
        let json = export_backup(&ShopState::default(), now).unwrap();
        let value: serde_json::Value = serde_json::from_str(&json).unwrap();

        assert_eq!(value["version"], BACKUP_VERSION);
        assert_eq!(value["exportDate"], "2024-05-01T12:00:00Z");
        assert!(value["clients"].as_array().unwrap().is_empty());
    }

    #[test]
    fn test_missing_keys_become_empty() {
        let mut state = populated_state();
        import_backup(&mut state, r#"{"clients": []}"#).unwrap();
        assert_eq!(state, ShopState::default());
    }

    #[test]
    fn test_null_keys_become_empty() {
        let mut state = populated_state();
        import_backup(
            &mut state,
            r#"{"clients": null, "inventory": null, "orders": [], "reminders": null}"#,
        )
        .unwrap();
        assert_eq!(state, ShopState::default());
    }

    #[test]
    fn test_malformed_records_are_skipped() {
        let good = serde_json::to_value(sample_client(4, "Bruno Lima")).unwrap();
        let contents = serde_json::json!({
            "clients": [{"name": "Ana"}, good],
            "inventory": "not a list",
        })
        .to_string();

        let imported = parse_backup(&contents).unwrap();

        assert_eq!(imported.clients.len(), 1);
        assert_eq!(imported.clients[0].name, "Bruno Lima");
        assert!(imported.inventory.is_empty());
    }

    #[test]
    fn test_non_object_document_imports_empty() {
        assert_eq!(parse_backup("[1, 2, 3]").unwrap(), ShopState::default());
    }

    #[test]
    fn test_invalid_json_leaves_state_untouched() {
        let mut state = populated_state();
        let before = state.clone();

        let err = import_backup(&mut state, "this is not json").unwrap_err();

        assert!(matches!(err, Error::Backup { message: _ }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_backup_file_name() {
        let now = Utc.with_ymd_and_hms(2024, 5, 1, 23, 59, 0).unwrap();
        assert_eq!(backup_file_name(now), "backup_printer_shop_2024-05-01.json");
    }
}
