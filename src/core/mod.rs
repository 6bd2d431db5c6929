//! Core business logic - framework-agnostic operations on the shop state.
//!
//! Mutating functions take `&mut ShopState` and either fully apply or return an
//! error without changes. Persisting the affected collections is the caller's job.

/// Backup export and import
pub mod backup;
/// Client registration and lookup
pub mod client;
/// Order draft editing and inventory reconciliation
pub mod draft;
/// Inventory items
pub mod inventory;
/// Service orders and status transitions
pub mod order;
/// Printable order and client documents
pub mod print;
/// Part reorder reminders
pub mod reminder;
/// Dashboard statistics
pub mod report;
/// In-memory shop state
pub mod state;
/// JSON collection persistence
pub mod storage;
