//! In-memory shop state - the four collections the rest of the core mutates.
//!
//! Loaded once at startup and persisted collection by collection after each
//! change. Mutating functions in the sibling modules take `&mut ShopState` and
//! replace whole collections, so a failed operation never leaves a partial update.

use crate::{
    core::storage::{CollectionKey, load_collection, save_collection},
    errors::{Error, Result},
    models::{Client, InventoryItem, PartReminder, ServiceOrder},
};
use sea_orm::{ConnectionTrait, DatabaseConnection, TransactionTrait};
use tracing::info;

/// All persisted shop data.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ShopState {
    /// Client records
    pub clients: Vec<Client>,
    /// Inventory items
    pub inventory: Vec<InventoryItem>,
    /// Service orders
    pub orders: Vec<ServiceOrder>,
    /// Part reminders
    pub reminders: Vec<PartReminder>,
}

impl ShopState {
    /// Loads every collection. Never fails; unreadable collections start empty.
    pub async fn load<C: ConnectionTrait>(db: &C) -> Self {
        let state = Self {
            clients: load_collection(db, CollectionKey::Clients).await,
            inventory: load_collection(db, CollectionKey::Inventory).await,
            orders: load_collection(db, CollectionKey::Orders).await,
            reminders: load_collection(db, CollectionKey::Reminders).await,
        };
        info!(
            "Loaded shop state: {} clients, {} items, {} orders, {} reminders",
            state.clients.len(),
            state.inventory.len(),
            state.orders.len(),
            state.reminders.len()
        );
        state
    }

    /// Writes one collection.
    pub async fn persist<C: ConnectionTrait>(&self, db: &C, key: CollectionKey) -> Result<()> {
        match key {
            CollectionKey::Clients => save_collection(db, key, &self.clients).await,
            CollectionKey::Inventory => save_collection(db, key, &self.inventory).await,
            CollectionKey::Orders => save_collection(db, key, &self.orders).await,
            CollectionKey::Reminders => save_collection(db, key, &self.reminders).await,
        }
    }

    /// Writes several collections inside one database transaction.
    pub async fn persist_many(&self, db: &DatabaseConnection, keys: &[CollectionKey]) -> Result<()> {
        let txn = db.begin().await?;
        for key in keys {
            self.persist(&txn, *key).await?;
        }
        txn.commit().await?;
        Ok(())
    }

    /// Looks up a client by id.
    #[must_use]
    pub fn client(&self, id: i64) -> Option<&Client> {
        self.clients.iter().find(|c| c.id == id)
    }

    /// Looks up an inventory item by id.
    #[must_use]
    pub fn item(&self, id: i64) -> Option<&InventoryItem> {
        self.inventory.iter().find(|i| i.id == id)
    }

    /// Looks up a service order by id.
    #[must_use]
    pub fn order(&self, id: i64) -> Option<&ServiceOrder> {
        self.orders.iter().find(|o| o.id == id)
    }

    /// Looks up a part reminder by id.
    #[must_use]
    pub fn reminder(&self, id: i64) -> Option<&PartReminder> {
        self.reminders.iter().find(|r| r.id == id)
    }

    /// Display name of an order's client, `"N/A"` when the client is gone.
    #[must_use]
    pub fn client_name(&self, client_id: i64) -> &str {
        self.client(client_id).map_or("N/A", |c| c.name.as_str())
    }
}

/// Next identifier for a collection: one past the largest id in use.
///
/// # Errors
/// Returns `Error::IdsExhausted` when the largest id is already `i64::MAX`,
/// which only an imported backup can produce.
pub fn next_id<I: IntoIterator<Item = i64>>(ids: I, key: CollectionKey) -> Result<i64> {
    ids.into_iter()
        .max()
        .unwrap_or(0)
        .checked_add(1)
        .ok_or(Error::IdsExhausted {
            collection: key.as_str(),
        })
}
