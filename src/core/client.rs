//! Client business logic - registration, removal and lookup.
//!
//! Clients are never edited after creation. Deleting one leaves its service
//! orders untouched; they keep the dangling `client_id` and render as "N/A".

use crate::{
    core::{
        state::{ShopState, next_id},
        storage::CollectionKey,
    },
    errors::{Error, Result},
    models::{Client, ServiceOrder},
};
use chrono::Utc;
use tracing::info;

/// Registers a new client.
///
/// # Errors
/// Returns `Error::Config` if the name is empty or whitespace-only.
pub fn create_client(
    state: &mut ShopState,
    name: &str,
    phone: Option<&str>,
    email: Option<&str>,
) -> Result<Client> {
    if name.trim().is_empty() {
        return Err(Error::Config {
            message: "Client name cannot be empty".to_string(),
        });
    }

    let client = Client {
        id: next_id(state.clients.iter().map(|c| c.id), CollectionKey::Clients)?,
        name: name.trim().to_string(),
        phone: phone.unwrap_or_default().trim().to_string(),
        email: email.unwrap_or_default().trim().to_string(),
        created_at: Utc::now(),
    };

    let mut clients = state.clients.clone();
    clients.push(client.clone());
    state.clients = clients;

    info!("Created client #{} '{}'", client.id, client.name);
    Ok(client)
}

/// Removes a client. Orders referencing it are left as they are.
///
/// # Errors
/// Returns `Error::ClientNotFound` if no client has this id.
pub fn delete_client(state: &mut ShopState, client_id: i64) -> Result<Client> {
    let removed = state
        .client(client_id)
        .cloned()
        .ok_or(Error::ClientNotFound { id: client_id })?;

    state.clients = state
        .clients
        .iter()
        .filter(|c| c.id != client_id)
        .cloned()
        .collect();

    info!("Deleted client #{client_id}");
    Ok(removed)
}

/// Clients whose name, phone or email contains `query` (case-insensitive),
/// sorted by name.
#[must_use]
pub fn search_clients<'a>(state: &'a ShopState, query: &str) -> Vec<&'a Client> {
    let query = query.to_lowercase();
    let mut matching: Vec<&Client> = state
        .clients
        .iter()
        .filter(|c| {
            c.name.to_lowercase().contains(&query)
                || c.phone.to_lowercase().contains(&query)
                || c.email.to_lowercase().contains(&query)
        })
        .collect();
    matching.sort_by(|a, b| a.name.to_lowercase().cmp(&b.name.to_lowercase()));
    matching
}

/// Service orders referencing a client, newest first.
#[must_use]
pub fn orders_for_client(state: &ShopState, client_id: i64) -> Vec<&ServiceOrder> {
    let mut orders: Vec<&ServiceOrder> = state
        .orders
        .iter()
        .filter(|o| o.client_id == client_id)
        .collect();
    orders.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    orders
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::test_utils::{sample_client, sample_order};

    #[test]
    fn test_create_client_trims_and_assigns_ids() {
        let mut state = ShopState::default();

        let first = create_client(&mut state, "  Ana Souza ", Some("555-0101"), None).unwrap();
        let second = create_client(&mut state, "Bruno Lima", None, Some("bruno@example.com")).unwrap();

        assert_eq!(first.id, 1);
        assert_eq!(first.name, "Ana Souza");
        assert_eq!(first.phone, "555-0101");
        assert_eq!(first.email, "");
        assert_eq!(second.id, 2);
        assert_eq!(state.clients.len(), 2);
    }

    #[test]
    fn test_create_client_rejects_blank_name() {
        let mut state = ShopState::default();
        let result = create_client(&mut state, "   ", None, None);
        assert!(matches!(result.unwrap_err(), Error::Config { message: _ }));
        assert!(state.clients.is_empty());
    }

    #[test]
    fn test_create_client_after_max_id_is_rejected() {
        let mut state = ShopState {
            clients: vec![sample_client(i64::MAX, "Imported")],
            ..Default::default()
        };
        let before = state.clone();

        let err = create_client(&mut state, "Ana Souza", None, None).unwrap_err();

        assert!(matches!(err, Error::IdsExhausted { collection: "clients" }));
        assert_eq!(state, before);
    }

    #[test]
    fn test_delete_client_keeps_orders() {
        let mut state = ShopState {
            clients: vec![sample_client(1, "Ana Souza"), sample_client(2, "Bruno Lima")],
            orders: vec![sample_order(10, 1), sample_order(11, 2)],
            ..Default::default()
        };
        let orders_before = state.orders.clone();

        let removed = delete_client(&mut state, 1).unwrap();

        assert_eq!(removed.name, "Ana Souza");
        assert_eq!(state.clients.len(), 1);
        assert_eq!(state.orders, orders_before);
        assert_eq!(state.client_name(state.orders[0].client_id), "N/A");
    }

    #[test]
    fn test_delete_missing_client() {
        let mut state = ShopState::default();
        assert!(matches!(
            delete_client(&mut state, 42).unwrap_err(),
            Error::ClientNotFound { id: 42 }
        ));
    }

    #[test]
    fn test_search_clients_is_case_insensitive_and_sorted() {
        let state = ShopState {
            clients: vec![
                sample_client(1, "Zeca Printers"),
                sample_client(2, "ana souza"),
                sample_client(3, "Carlos"),
            ],
            ..Default::default()
        };

        let found: Vec<i64> = search_clients(&state, "A").iter().map(|c| c.id).collect();
        assert_eq!(found, vec![2, 3, 1]);
        assert!(search_clients(&state, "xyz").is_empty());
    }
}
