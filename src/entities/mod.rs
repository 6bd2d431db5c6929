//! Entity module - `SeaORM` entity definitions for the local key-value store.
//! The shop keeps its four collections as JSON blobs, so a single table is enough.

pub mod collection;

pub use collection::{
    Column as CollectionColumn, Entity as Collection, Model as CollectionModel,
};
