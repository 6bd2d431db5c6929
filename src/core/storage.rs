//! Collection storage - Reads and writes whole collections as JSON blobs.
//!
//! Each collection is stored under its own key in the `collections` table and
//! rewritten in full on every change. Reads never fail: a missing row, a
//! database error or an unparsable blob all yield an empty collection.

use crate::{
    entities::{Collection, collection},
    errors::Result,
};
use chrono::Utc;
use sea_orm::{Set, prelude::*};
use serde::{Serialize, de::DeserializeOwned};
use tracing::{debug, instrument, warn};

/// The four independently persisted collections.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum CollectionKey {
    /// Client records
    Clients,
    /// Inventory items
    Inventory,
    /// Service orders
    Orders,
    /// Part reminders
    Reminders,
}

impl CollectionKey {
    /// Every collection key.
    pub const ALL: [Self; 4] = [Self::Clients, Self::Inventory, Self::Orders, Self::Reminders];

    /// Storage key for this collection
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Clients => "clients",
            Self::Inventory => "inventory",
            Self::Orders => "orders",
            Self::Reminders => "reminders",
        }
    }
}

/// Loads a collection, falling back to an empty one on any failure.
#[instrument(skip(db))]
pub async fn load_collection<T, C>(db: &C, key: CollectionKey) -> Vec<T>
where
    T: DeserializeOwned,
    C: ConnectionTrait,
{
    let row = match Collection::find()
        .filter(collection::Column::Key.eq(key.as_str()))
        .one(db)
        .await
    {
        Ok(row) => row,
        Err(e) => {
            warn!("Failed to read collection '{}': {e}", key.as_str());
            return Vec::new();
        }
    };

    let Some(row) = row else {
        debug!("Collection '{}' not stored yet", key.as_str());
        return Vec::new();
    };

    serde_json::from_str(&row.value).unwrap_or_else(|e| {
        warn!("Collection '{}' is not valid JSON, starting empty: {e}", key.as_str());
        Vec::new()
    })
}

/// Rewrites a collection in full (insert or update of its row).
#[instrument(skip(db, items), fields(len = items.len()))]
pub async fn save_collection<T, C>(db: &C, key: CollectionKey, items: &[T]) -> Result<()>
where
    T: Serialize,
    C: ConnectionTrait,
{
    let value = serde_json::to_string(items)?;
    let now = Utc::now().naive_utc();

    let existing = Collection::find()
        .filter(collection::Column::Key.eq(key.as_str()))
        .one(db)
        .await?;

    if let Some(row) = existing {
        let mut active_model: collection::ActiveModel = row.into();
        active_model.value = Set(value);
        active_model.updated_at = Set(now);
        active_model.update(db).await?;
    } else {
        let new_row = collection::ActiveModel {
            key: Set(key.as_str().to_string()),
            value: Set(value),
            updated_at: Set(now),
            ..Default::default()
        };
        new_row.insert(db).await?;
    }

    debug!("Saved collection '{}'", key.as_str());
    Ok(())
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::setup_test_db;

    #[tokio::test]
    async fn test_missing_collection_loads_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let clients: Vec<crate::models::Client> =
            load_collection(&db, CollectionKey::Clients).await;
        assert!(clients.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_save_then_load_and_overwrite() -> Result<()> {
        let db = setup_test_db().await?;

        save_collection(&db, CollectionKey::Reminders, &["a".to_string()]).await?;
        save_collection(&db, CollectionKey::Reminders, &["b".to_string(), "c".to_string()])
            .await?;

        let loaded: Vec<String> = load_collection(&db, CollectionKey::Reminders).await;
        assert_eq!(loaded, vec!["b".to_string(), "c".to_string()]);

        // Only one row per key
        let rows = Collection::find().all(&db).await?;
        assert_eq!(rows.len(), 1);
        Ok(())
    }

    #[tokio::test]
    async fn test_corrupt_blob_falls_back_to_empty() -> Result<()> {
        let db = setup_test_db().await?;
        let row = collection::ActiveModel {
            key: Set(CollectionKey::Orders.as_str().to_string()),
            value: Set("{not json".to_string()),
            updated_at: Set(Utc::now().naive_utc()),
            ..Default::default()
        };
        row.insert(&db).await?;

        let orders: Vec<crate::models::ServiceOrder> =
            load_collection(&db, CollectionKey::Orders).await;
        assert!(orders.is_empty());
        Ok(())
    }

    #[tokio::test]
    async fn test_collections_are_independent() -> Result<()> {
        let db = setup_test_db().await?;
        save_collection(&db, CollectionKey::Clients, &[1_i64, 2]).await?;

        let inventory: Vec<i64> = load_collection(&db, CollectionKey::Inventory).await;
        let clients: Vec<i64> = load_collection(&db, CollectionKey::Clients).await;
        assert!(inventory.is_empty());
        assert_eq!(clients, vec![1, 2]);
        Ok(())
    }
}
