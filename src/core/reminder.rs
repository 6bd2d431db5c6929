//! Part reminder business logic.
//!
//! Reminders move Pending → Ordered → Received one explicit step at a time.
//! Editing a reminder never changes its status.

use crate::{
    core::{
        state::{ShopState, next_id},
        storage::CollectionKey,
    },
    errors::{Error, Result},
    models::{PartReminder, ReminderStatus},
};
use chrono::Utc;
use tracing::info;

/// Editable reminder fields.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ReminderInput {
    /// Part to order
    pub part_name: String,
    /// Units to order
    pub quantity: u32,
    /// Free-text notes
    pub notes: String,
}

fn validate(input: &ReminderInput) -> Result<()> {
    if input.part_name.trim().is_empty() {
        return Err(Error::Config {
            message: "Part name cannot be empty".to_string(),
        });
    }
    if input.quantity == 0 {
        return Err(Error::InvalidQuantity {
            quantity: input.quantity,
        });
    }
    Ok(())
}

/// Creates a reminder in `Pending`.
///
/// # Errors
/// Returns an error for a blank part name or zero quantity.
pub fn create_reminder(state: &mut ShopState, input: ReminderInput) -> Result<PartReminder> {
    validate(&input)?;

    let reminder = PartReminder {
        id: next_id(state.reminders.iter().map(|r| r.id), CollectionKey::Reminders)?,
        part_name: input.part_name.trim().to_string(),
        quantity: input.quantity,
        notes: input.notes.trim().to_string(),
        status: ReminderStatus::Pending,
        created_at: Utc::now(),
    };

    let mut reminders = state.reminders.clone();
    reminders.push(reminder.clone());
    state.reminders = reminders;

    info!("Created reminder #{} for '{}'", reminder.id, reminder.part_name);
    Ok(reminder)
}

/// Edits a reminder's part name, quantity and notes.
///
/// # Errors
/// Returns an error on invalid input or an unknown reminder.
pub fn update_reminder(state: &mut ShopState, reminder_id: i64, input: ReminderInput) -> Result<PartReminder> {
    validate(&input)?;

    let current = state
        .reminder(reminder_id)
        .cloned()
        .ok_or(Error::ReminderNotFound { id: reminder_id })?;

    let updated = PartReminder {
        part_name: input.part_name.trim().to_string(),
        quantity: input.quantity,
        notes: input.notes.trim().to_string(),
        ..current
    };
    replace_reminder(state, &updated);
    Ok(updated)
}

/// Moves a reminder one step forward.
///
/// # Errors
/// Returns `Error::ReminderAlreadyReceived` for a received reminder and
/// `Error::ReminderNotFound` for an unknown one.
pub fn advance_reminder(state: &mut ShopState, reminder_id: i64) -> Result<PartReminder> {
    let current = state
        .reminder(reminder_id)
        .cloned()
        .ok_or(Error::ReminderNotFound { id: reminder_id })?;

    let next = current
        .status
        .next()
        .ok_or(Error::ReminderAlreadyReceived { id: reminder_id })?;

    let updated = PartReminder {
        status: next,
        ..current
    };
    replace_reminder(state, &updated);

    info!("Reminder #{reminder_id} is now {next}");
    Ok(updated)
}

/// Deletes a reminder.
///
/// # Errors
/// Returns `Error::ReminderNotFound` for an unknown reminder.
pub fn delete_reminder(state: &mut ShopState, reminder_id: i64) -> Result<PartReminder> {
    let removed = state
        .reminder(reminder_id)
        .cloned()
        .ok_or(Error::ReminderNotFound { id: reminder_id })?;

    state.reminders = state
        .reminders
        .iter()
        .filter(|r| r.id != reminder_id)
        .cloned()
        .collect();
    Ok(removed)
}

/// Reminders in display order: Pending, Ordered, Received; newest first within each.
#[must_use]
pub fn sorted_reminders(reminders: &[PartReminder]) -> Vec<&PartReminder> {
    let mut sorted: Vec<&PartReminder> = reminders.iter().collect();
    sorted.sort_by(|a, b| {
        a.status
            .cmp(&b.status)
            .then_with(|| b.created_at.cmp(&a.created_at))
    });
    sorted
}

fn replace_reminder(state: &mut ShopState, reminder: &PartReminder) {
    state.reminders = state
        .reminders
        .iter()
        .map(|r| if r.id == reminder.id { reminder.clone() } else { r.clone() })
        .collect();
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::sample_reminder;
    use chrono::Duration;

    fn input(name: &str) -> ReminderInput {
        ReminderInput {
            part_name: name.to_string(),
            quantity: 2,
            notes: "Supplier: PrintParts".to_string(),
        }
    }

    #[test]
    fn test_create_reminder_starts_pending() {
        let mut state = ShopState::default();
        let reminder = create_reminder(&mut state, input("Fuser film")).unwrap();
        assert_eq!(reminder.status, ReminderStatus::Pending);
        assert_eq!(reminder.id, 1);
    }

    #[test]
    fn test_create_reminder_validation() {
        let mut state = ShopState::default();
        assert!(matches!(
            create_reminder(&mut state, input(" ")).unwrap_err(),
            Error::Config { message: _ }
        ));
        let mut zero = input("Belt");
        zero.quantity = 0;
        assert!(matches!(
            create_reminder(&mut state, zero).unwrap_err(),
            Error::InvalidQuantity { quantity: 0 }
        ));
    }

    #[test]
    fn test_advance_walks_lifecycle_then_stops() {
        let mut state = ShopState {
            reminders: vec![sample_reminder(1, ReminderStatus::Pending, Utc::now())],
            ..Default::default()
        };

        assert_eq!(advance_reminder(&mut state, 1).unwrap().status, ReminderStatus::Ordered);
        assert_eq!(advance_reminder(&mut state, 1).unwrap().status, ReminderStatus::Received);
        assert!(matches!(
            advance_reminder(&mut state, 1).unwrap_err(),
            Error::ReminderAlreadyReceived { id: 1 }
        ));
        assert_eq!(state.reminder(1).unwrap().status, ReminderStatus::Received);
    }

    #[test]
    fn test_update_keeps_status() {
        let mut state = ShopState {
            reminders: vec![sample_reminder(1, ReminderStatus::Ordered, Utc::now())],
            ..Default::default()
        };

        let updated = update_reminder(&mut state, 1, input("Drum unit")).unwrap();
        assert_eq!(updated.status, ReminderStatus::Ordered);
        assert_eq!(updated.part_name, "Drum unit");
    }

    #[test]
    fn test_sort_groups_by_status_newest_first() {
        let now = Utc::now();
        let reminders = vec![
            sample_reminder(1, ReminderStatus::Received, now),
            sample_reminder(2, ReminderStatus::Pending, now - Duration::hours(2)),
            sample_reminder(3, ReminderStatus::Ordered, now),
            sample_reminder(4, ReminderStatus::Pending, now - Duration::hours(1)),
        ];

        let ids: Vec<i64> = sorted_reminders(&reminders).iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![4, 2, 3, 1]);
    }

    #[test]
    fn test_delete_reminder() {
        let mut state = ShopState {
            reminders: vec![sample_reminder(1, ReminderStatus::Pending, Utc::now())],
            ..Default::default()
        };
        delete_reminder(&mut state, 1).unwrap();
        assert!(state.reminders.is_empty());
        assert!(matches!(
            delete_reminder(&mut state, 1).unwrap_err(),
            Error::ReminderNotFound { id: 1 }
        ));
    }
}
