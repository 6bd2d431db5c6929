//! Collection entity - Key-value rows holding whole JSON-serialized collections.
//!
//! Each of the four shop collections (clients, inventory, orders, reminders)
//! lives in one row, keyed by its collection name. The value is rewritten in
//! full whenever the collection changes.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

/// Collection database model - one JSON blob per collection key
#[derive(Clone, Debug, PartialEq, Eq, DeriveEntityModel, Serialize, Deserialize)]
#[sea_orm(table_name = "collections")]
pub struct Model {
    /// Unique identifier
    #[sea_orm(primary_key)]
    pub id: i32,
    /// Collection key (e.g., `"orders"`)
    #[sea_orm(unique)]
    pub key: String,
    /// JSON array serialized as text
    pub value: String,
    /// When this collection was last written
    pub updated_at: DateTime,
}

/// `Collection` rows are independent of each other
#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {}

impl ActiveModelBehavior for ActiveModel {}
