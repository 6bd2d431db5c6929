//! Order draft reconciliation - editing labor, diagnosis and parts of one order
//! without touching stored data until the operator saves.
//!
//! A draft is a deep copy of the order taken when it is opened. Part additions
//! are checked against the stock currently stored. On commit, inventory is
//! recomputed as `stored + originally reserved - drafted`, so only the final
//! draft state affects stock, never the intermediate edits.
//!
//! Two drafts built from the same stock snapshot could each pass the add-time
//! check. Commit therefore re-checks every touched item and rejects the whole
//! save if any quantity would go negative.

use crate::{
    assistant::{FALLBACK_MESSAGE, TextGenerator},
    core::{
        order::{history_entry, replace_order},
        report::format_currency,
        state::ShopState,
    },
    errors::{Error, Result},
    models::{InventoryItem, ServiceOrder, UsedPart},
};
use chrono::{DateTime, Utc};
use std::collections::BTreeSet;
use tracing::{info, warn};

/// An uncommitted copy of a service order.
#[derive(Clone, Debug, PartialEq)]
pub struct OrderDraft {
    original: ServiceOrder,
    draft: ServiceOrder,
}

impl OrderDraft {
    /// Opens a draft of a stored order.
    ///
    /// # Errors
    /// Returns `Error::OrderNotFound` if the order does not exist.
    pub fn open(state: &ShopState, order_id: i64) -> Result<Self> {
        let order = state
            .order(order_id)
            .cloned()
            .ok_or(Error::OrderNotFound { id: order_id })?;
        Ok(Self::from_order(order))
    }

    /// Wraps an order snapshot.
    #[must_use]
    pub fn from_order(order: ServiceOrder) -> Self {
        Self {
            draft: order.clone(),
            original: order,
        }
    }

    /// Order as it was when the draft was opened
    #[must_use]
    pub const fn original(&self) -> &ServiceOrder {
        &self.original
    }

    /// Order with the pending edits applied
    #[must_use]
    pub const fn current(&self) -> &ServiceOrder {
        &self.draft
    }

    /// Id of the order being edited
    #[must_use]
    pub const fn order_id(&self) -> i64 {
        self.original.id
    }

    /// Adds `quantity` units of an inventory item, merging with an existing line.
    ///
    /// # Errors
    /// - `Error::InvalidQuantity` for zero units
    /// - `Error::ItemNotFound` if the item does not exist
    /// - `Error::InsufficientStock` if already-drafted plus requested units
    ///   exceed the stored quantity
    pub fn add_part(&mut self, inventory: &[InventoryItem], item_id: i64, quantity: u32) -> Result<()> {
        if quantity == 0 {
            return Err(Error::InvalidQuantity { quantity });
        }

        let item = inventory
            .iter()
            .find(|i| i.id == item_id)
            .ok_or(Error::ItemNotFound { id: item_id })?;

        let drafted = self.draft.reserved_quantity(item_id);
        let requested = drafted.saturating_add(quantity);
        if requested > item.quantity {
            return Err(Error::InsufficientStock {
                item: item.name.clone(),
                available: item.quantity,
                requested,
            });
        }

        if let Some(line) = self.draft.parts_used.iter_mut().find(|p| p.item_id == item_id) {
            line.quantity += quantity;
        } else {
            self.draft.parts_used.push(UsedPart {
                item_id,
                name: item.name.clone(),
                quantity,
                unit_price: item.sell_price,
            });
        }

        self.draft.recompute_costs();
        Ok(())
    }

    /// Removes the line for `item_id`, if any.
    pub fn remove_part(&mut self, item_id: i64) {
        self.draft.parts_used.retain(|p| p.item_id != item_id);
        self.draft.recompute_costs();
    }

    /// Sets the labor charge.
    ///
    /// # Errors
    /// Returns `Error::InvalidAmount` for negative or non-finite amounts.
    pub fn set_labor_cost(&mut self, amount: f64) -> Result<()> {
        if !amount.is_finite() || amount < 0.0 {
            return Err(Error::InvalidAmount { amount });
        }
        self.draft.labor_cost = amount;
        self.draft.recompute_costs();
        Ok(())
    }

    /// Sets the diagnosis text; blank text clears it.
    pub fn set_diagnosis(&mut self, text: &str) {
        let text = text.trim();
        self.draft.diagnosis = if text.is_empty() {
            None
        } else {
            Some(text.to_string())
        };
    }

    /// Equipment model and reported problem to ask the assistant about.
    #[must_use]
    pub fn diagnosis_request(&self) -> (String, String) {
        (
            self.draft.equipment_model.clone(),
            self.draft.problem_description.clone(),
        )
    }

    /// Puts generated diagnosis text in the draft. The fallback message is
    /// ignored. Returns whether the diagnosis was set.
    pub fn accept_suggestion(&mut self, text: &str) -> bool {
        if text == FALLBACK_MESSAGE {
            return false;
        }
        self.set_diagnosis(text);
        true
    }

    /// Asks the assistant for a diagnosis and, if one was generated, puts it
    /// in the draft. Returns the assistant's text either way.
    pub async fn suggest_diagnosis(&mut self, assistant: &dyn TextGenerator) -> String {
        let (equipment_model, problem) = self.diagnosis_request();
        let text = assistant.diagnose(&equipment_model, &problem).await;
        self.accept_suggestion(&text);
        text
    }

    /// Saves the draft: reconciles inventory, appends audit entries and
    /// replaces the stored order and inventory together.
    ///
    /// Nothing is changed if an error is returned.
    ///
    /// # Errors
    /// Returns `Error::InsufficientStock` if the reconciled quantity of any
    /// item would be negative, `Error::OrderNotFound` if the order was deleted.
    pub fn commit(
        self,
        state: &mut ShopState,
        actor: &str,
        now: DateTime<Utc>,
    ) -> Result<ServiceOrder> {
        let stored = state
            .order(self.draft.id)
            .ok_or(Error::OrderNotFound { id: self.draft.id })?;
        // Status and history may have changed since the draft was opened
        let (status, history) = (stored.status, stored.history.clone());

        let inventory = reconcile_inventory(&state.inventory, &self.original, &self.draft)?;

        let Self { original, mut draft } = self;
        draft.status = status;
        draft.history = history;

        if (draft.labor_cost - original.labor_cost).abs() > f64::EPSILON {
            draft.history.insert(
                0,
                history_entry(
                    draft.status,
                    now,
                    actor,
                    format!(
                        "Labor cost changed from {} to {}",
                        format_currency(original.labor_cost),
                        format_currency(draft.labor_cost)
                    ),
                ),
            );
        }
        if draft.diagnosis != original.diagnosis {
            draft.history.insert(
                0,
                history_entry(draft.status, now, actor, "Technical diagnosis updated"),
            );
        }

        draft.recompute_costs();
        draft.updated_at = now;

        replace_order(state, &draft);
        state.inventory = inventory;

        info!(
            "Committed draft for order #{}: {} part lines, total {}",
            draft.id,
            draft.parts_used.len(),
            format_currency(draft.total_cost)
        );
        Ok(draft)
    }
}

/// New inventory after moving from `original`'s part list to `draft`'s.
///
/// Items that no longer exist are skipped.
///
/// # Errors
/// Returns `Error::InsufficientStock` if any item would end below zero.
pub fn reconcile_inventory(
    inventory: &[InventoryItem],
    original: &ServiceOrder,
    draft: &ServiceOrder,
) -> Result<Vec<InventoryItem>> {
    let touched: BTreeSet<i64> = original
        .parts_used
        .iter()
        .chain(draft.parts_used.iter())
        .map(|p| p.item_id)
        .collect();

    let mut updated = inventory.to_vec();
    for item_id in touched {
        let Some(item) = updated.iter_mut().find(|i| i.id == item_id) else {
            warn!("Order #{} references missing item #{item_id}", draft.id);
            continue;
        };

        let restored = i64::from(item.quantity) + i64::from(original.reserved_quantity(item_id));
        let requested = draft.reserved_quantity(item_id);
        let remaining = restored - i64::from(requested);

        if remaining < 0 {
            return Err(Error::InsufficientStock {
                item: item.name.clone(),
                available: u32::try_from(restored).unwrap_or(u32::MAX),
                requested,
            });
        }
        item.quantity = u32::try_from(remaining).unwrap_or(u32::MAX);
    }

    Ok(updated)
}
