//! Inventory business logic - stock items and their prices.
//!
//! Quantities are set when an item is created and afterwards change only when
//! an order draft is committed (see [`crate::core::draft`]). Editing an item
//! touches its name, prices and threshold, never its quantity.

use crate::{
    core::{
        state::{ShopState, next_id},
        storage::CollectionKey,
    },
    errors::{Error, Result},
    models::InventoryItem,
};
use tracing::info;

/// Fields accepted when creating or editing an item.
#[derive(Clone, Debug, PartialEq)]
pub struct ItemInput {
    /// Part name
    pub name: String,
    /// Purchase price per unit
    pub cost_price: f64,
    /// Price charged per unit
    pub sell_price: f64,
    /// Low-stock threshold
    pub min_stock: u32,
}

fn validate_price(amount: f64) -> Result<()> {
    if !amount.is_finite() || amount < 0.0 {
        return Err(Error::InvalidAmount { amount });
    }
    Ok(())
}

fn validate_input(input: &ItemInput) -> Result<()> {
    if input.name.trim().is_empty() {
        return Err(Error::Config {
            message: "Item name cannot be empty".to_string(),
        });
    }
    validate_price(input.cost_price)?;
    validate_price(input.sell_price)
}

/// Adds a new item with an initial quantity on hand.
///
/// # Errors
/// Returns an error if the name is blank or a price is negative or not finite.
pub fn create_item(state: &mut ShopState, input: ItemInput, quantity: u32) -> Result<InventoryItem> {
    validate_input(&input)?;

    let item = InventoryItem {
        id: next_id(state.inventory.iter().map(|i| i.id), CollectionKey::Inventory)?,
        name: input.name.trim().to_string(),
        quantity,
        cost_price: input.cost_price,
        sell_price: input.sell_price,
        min_stock: input.min_stock,
    };

    let mut inventory = state.inventory.clone();
    inventory.push(item.clone());
    state.inventory = inventory;

    info!("Created item #{} '{}' with {} units", item.id, item.name, quantity);
    Ok(item)
}

/// Edits an item's name, prices and threshold. Quantity is preserved.
///
/// # Errors
/// Returns an error if validation fails or the item does not exist.
pub fn update_item(state: &mut ShopState, item_id: i64, input: ItemInput) -> Result<InventoryItem> {
    validate_input(&input)?;

    let current = state
        .item(item_id)
        .cloned()
        .ok_or(Error::ItemNotFound { id: item_id })?;

    let updated = InventoryItem {
        name: input.name.trim().to_string(),
        cost_price: input.cost_price,
        sell_price: input.sell_price,
        min_stock: input.min_stock,
        ..current
    };

    state.inventory = state
        .inventory
        .iter()
        .map(|i| if i.id == item_id { updated.clone() } else { i.clone() })
        .collect();

    info!("Updated item #{item_id}");
    Ok(updated)
}

/// Removes an item. Part snapshots on existing orders are unaffected.
///
/// # Errors
/// Returns `Error::ItemNotFound` if the item does not exist.
pub fn delete_item(state: &mut ShopState, item_id: i64) -> Result<InventoryItem> {
    let removed = state
        .item(item_id)
        .cloned()
        .ok_or(Error::ItemNotFound { id: item_id })?;

    state.inventory = state
        .inventory
        .iter()
        .filter(|i| i.id != item_id)
        .cloned()
        .collect();

    info!("Deleted item #{item_id}");
    Ok(removed)
}

/// Items whose name contains `query` (case-insensitive), sorted by name.
#[must_use]
pub fn search_items<'a>(state: &'a ShopState, query: &str) -> Vec<&'a InventoryItem> {
    let query = query.to_lowercase();
    let mut matching: Vec<&InventoryItem> = state
        .inventory
        .iter()
        .filter(|i| i.name.to_lowercase().contains(&query))
        .collect();
    matching.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    matching
}

/// Items at or below their minimum stock.
#[must_use]
pub fn low_stock_items(state: &ShopState) -> Vec<&InventoryItem> {
    state.inventory.iter().filter(|i| i.is_low_stock()).collect()
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    #![allow(clippy::float_cmp)]
    use super::*;
    use crate::test_utils::sample_item;

    fn input(name: &str, cost: f64, sell: f64) -> ItemInput {
        ItemInput {
            name: name.to_string(),
            cost_price: cost,
            sell_price: sell,
            min_stock: 2,
        }
    }

    #[test]
    fn test_create_item() {
        let mut state = ShopState::default();
        let item = create_item(&mut state, input(" Fuser unit ", 80.0, 150.0), 5).unwrap();

        assert_eq!(item.id, 1);
        assert_eq!(item.name, "Fuser unit");
        assert_eq!(item.quantity, 5);
        assert_eq!(state.inventory, vec![item]);
    }

    #[test]
    fn test_create_item_validation() {
        let mut state = ShopState::default();

        assert!(matches!(
            create_item(&mut state, input("", 1.0, 2.0), 1).unwrap_err(),
            Error::Config { message: _ }
        ));
        assert!(matches!(
            create_item(&mut state, input("Roller", -1.0, 2.0), 1).unwrap_err(),
            Error::InvalidAmount { amount: -1.0 }
        ));
        assert!(matches!(
            create_item(&mut state, input("Roller", 1.0, f64::NAN), 1).unwrap_err(),
            Error::InvalidAmount { amount: _ }
        ));
        assert!(state.inventory.is_empty());
    }

    #[test]
    fn test_update_item_preserves_quantity() {
        let mut state = ShopState {
            inventory: vec![sample_item(1, "Toner", 7)],
            ..Default::default()
        };

        let updated = update_item(&mut state, 1, input("Toner 85A", 20.0, 45.0)).unwrap();

        assert_eq!(updated.quantity, 7);
        assert_eq!(updated.name, "Toner 85A");
        assert_eq!(state.item(1).unwrap().sell_price, 45.0);
    }

    #[test]
    fn test_update_and_delete_missing_item() {
        let mut state = ShopState::default();
        assert!(matches!(
            update_item(&mut state, 3, input("X", 1.0, 1.0)).unwrap_err(),
            Error::ItemNotFound { id: 3 }
        ));
        assert!(matches!(
            delete_item(&mut state, 3).unwrap_err(),
            Error::ItemNotFound { id: 3 }
        ));
    }

    #[test]
    fn test_low_stock_includes_threshold() {
        let mut at_threshold = sample_item(1, "Drum", 2);
        at_threshold.min_stock = 2;
        let mut above = sample_item(2, "Belt", 3);
        above.min_stock = 2;
        let state = ShopState {
            inventory: vec![at_threshold, above],
            ..Default::default()
        };

        let low: Vec<i64> = low_stock_items(&state).iter().map(|i| i.id).collect();
        assert_eq!(low, vec![1]);
    }
}
