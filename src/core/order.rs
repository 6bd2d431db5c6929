//! Service order business logic - opening tickets, status changes and removal.
//!
//! Status changes are unrestricted: any status may follow any other. Every
//! change prepends one history entry. Moving an order to `Ready` also asks the
//! text-generation assistant for a client notification; the assistant never
//! fails, it degrades to a fixed message.

use crate::{
    assistant::TextGenerator,
    core::{
        report::format_currency,
        state::{ShopState, next_id},
        storage::CollectionKey,
    },
    errors::{Error, Result},
    models::{HistoryEntry, OrderStatus, ServiceOrder},
};
use chrono::{DateTime, Utc};
use tracing::info;

/// Fields accepted when opening an order.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct NewOrder {
    /// Owning client
    pub client_id: i64,
    /// Equipment make/model
    pub equipment_model: String,
    /// Serial number, may be empty
    pub serial_number: String,
    /// Problem reported by the client
    pub problem_description: String,
}

/// Result of a status change.
#[derive(Clone, Debug, PartialEq)]
pub struct StatusChange {
    /// The order after the change
    pub order: ServiceOrder,
    /// Generated client notification, present only for transitions to `Ready`
    pub client_message: Option<String>,
}

/// Builds a history entry.
#[must_use]
pub fn history_entry(
    status: OrderStatus,
    timestamp: DateTime<Utc>,
    actor: &str,
    description: impl Into<String>,
) -> HistoryEntry {
    HistoryEntry {
        status,
        timestamp,
        user: actor.to_string(),
        description: description.into(),
    }
}

/// Opens a new order in `Pending` with zero costs.
///
/// # Errors
/// Returns `Error::ClientNotFound` for an unknown client and `Error::Config`
/// when the equipment model or problem description is blank.
pub fn create_order(state: &mut ShopState, new_order: NewOrder, actor: &str) -> Result<ServiceOrder> {
    if state.client(new_order.client_id).is_none() {
        return Err(Error::ClientNotFound {
            id: new_order.client_id,
        });
    }
    if new_order.equipment_model.trim().is_empty() {
        return Err(Error::Config {
            message: "Equipment model cannot be empty".to_string(),
        });
    }
    if new_order.problem_description.trim().is_empty() {
        return Err(Error::Config {
            message: "Problem description cannot be empty".to_string(),
        });
    }

    let now = Utc::now();
    let order = ServiceOrder {
        id: next_id(state.orders.iter().map(|o| o.id), CollectionKey::Orders)?,
        client_id: new_order.client_id,
        equipment_model: new_order.equipment_model.trim().to_string(),
        serial_number: new_order.serial_number.trim().to_string(),
        problem_description: new_order.problem_description.trim().to_string(),
        diagnosis: None,
        status: OrderStatus::Pending,
        history: vec![history_entry(OrderStatus::Pending, now, actor, "Order created")],
        created_at: now,
        updated_at: now,
        labor_cost: 0.0,
        parts_cost: 0.0,
        total_cost: 0.0,
        parts_used: Vec::new(),
    };

    let mut orders = state.orders.clone();
    orders.push(order.clone());
    state.orders = orders;

    info!("Opened order #{} for client #{}", order.id, order.client_id);
    Ok(order)
}

/// Sets an order's status and prepends a history entry.
///
/// # Errors
/// Returns `Error::OrderNotFound` if the order does not exist.
pub fn apply_status(
    state: &mut ShopState,
    order_id: i64,
    status: OrderStatus,
    actor: &str,
    now: DateTime<Utc>,
) -> Result<ServiceOrder> {
    let mut order = state
        .order(order_id)
        .cloned()
        .ok_or(Error::OrderNotFound { id: order_id })?;

    let previous = order.status;
    order.status = status;
    order.updated_at = now;
    order.history.insert(
        0,
        history_entry(
            status,
            now,
            actor,
            format!("Status changed from {previous} to {status}"),
        ),
    );

    replace_order(state, &order);
    info!("Order #{order_id}: {previous} -> {status}");
    Ok(order)
}

/// Inputs for a client notification, detached from the shop state so the
/// assistant can be called without holding it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ClientNotice {
    /// Client display name
    pub client_name: String,
    /// Equipment make/model
    pub equipment_model: String,
    /// Status label
    pub status: String,
    /// Order number, diagnosis and total due
    pub details: String,
}

impl ClientNotice {
    /// Asks the assistant to draft the message.
    pub async fn compose(&self, assistant: &dyn TextGenerator) -> String {
        assistant
            .compose_client_message(
                &self.client_name,
                &self.equipment_model,
                &self.status,
                &self.details,
            )
            .await
    }
}

/// Notification to draft after a status change; only `Ready` orders get one.
#[must_use]
pub fn client_notice(state: &ShopState, order: &ServiceOrder) -> Option<ClientNotice> {
    (order.status == OrderStatus::Ready).then(|| ClientNotice {
        client_name: state.client_name(order.client_id).to_string(),
        equipment_model: order.equipment_model.clone(),
        status: order.status.label().to_string(),
        details: ready_details(order),
    })
}

/// Changes an order's status; on `Ready`, also drafts a client notification.
///
/// The status change is applied before the assistant is called and is kept
/// whatever the assistant returns.
///
/// # Errors
/// Returns `Error::OrderNotFound` if the order does not exist.
pub async fn transition_status(
    state: &mut ShopState,
    order_id: i64,
    status: OrderStatus,
    actor: &str,
    assistant: &dyn TextGenerator,
) -> Result<StatusChange> {
    let order = apply_status(state, order_id, status, actor, Utc::now())?;

    let client_message = match client_notice(state, &order) {
        Some(notice) => Some(notice.compose(assistant).await),
        None => None,
    };

    Ok(StatusChange {
        order,
        client_message,
    })
}

fn ready_details(order: &ServiceOrder) -> String {
    let diagnosis = order.diagnosis.as_deref().unwrap_or("not recorded");
    format!(
        "Service order #{}. Diagnosis: {}. Total due: {}.",
        order.id,
        diagnosis,
        format_currency(order.total_cost)
    )
}

/// Removes an order. Reserved stock is not returned to inventory.
///
/// # Errors
/// Returns `Error::OrderNotFound` if the order does not exist.
pub fn delete_order(state: &mut ShopState, order_id: i64) -> Result<ServiceOrder> {
    let removed = state
        .order(order_id)
        .cloned()
        .ok_or(Error::OrderNotFound { id: order_id })?;

    state.orders = state
        .orders
        .iter()
        .filter(|o| o.id != order_id)
        .cloned()
        .collect();

    info!("Deleted order #{order_id}");
    Ok(removed)
}

/// Replaces the stored copy of `order` (matched by id).
pub(crate) fn replace_order(state: &mut ShopState, order: &ServiceOrder) {
    state.orders = state
        .orders
        .iter()
        .map(|o| if o.id == order.id { order.clone() } else { o.clone() })
        .collect();
}

/// Orders matching `query` by id, equipment, serial or client name, newest first.
#[must_use]
pub fn search_orders<'a>(state: &'a ShopState, query: &str) -> Vec<&'a ServiceOrder> {
    let query = query.trim().trim_start_matches('#').to_lowercase();
    let mut matching: Vec<&ServiceOrder> = state
        .orders
        .iter()
        .filter(|o| {
            o.id.to_string().starts_with(&query)
                || o.equipment_model.to_lowercase().contains(&query)
                || o.serial_number.to_lowercase().contains(&query)
                || state.client_name(o.client_id).to_lowercase().contains(&query)
        })
        .collect();
    matching.sort_by(|a, b| b.created_at.cmp(&a.created_at));
    matching
}

#[cfg(test)]
mod tests {
    #![allow(clippy::unwrap_used)]
    use super::*;
    use crate::assistant::FALLBACK_MESSAGE;
    use crate::test_utils::{CountingGenerator, sample_client, sample_order};

    fn new_order(client_id: i64) -> NewOrder {
        NewOrder {
            client_id,
            equipment_model: "HP LaserJet P1102".to_string(),
            serial_number: "VNC3X01234".to_string(),
            problem_description: "Paper jams on every page".to_string(),
        }
    }

    #[test]
    fn test_create_order_starts_pending_with_history() {
        let mut state = ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            ..Default::default()
        };

        let order = create_order(&mut state, new_order(1), "Front desk").unwrap();

        assert_eq!(order.id, 1);
        assert_eq!(order.status, OrderStatus::Pending);
        assert_eq!(order.history.len(), 1);
        assert_eq!(order.history[0].user, "Front desk");
        assert_eq!(state.orders.len(), 1);
    }

    #[test]
    fn test_create_order_requires_existing_client() {
        let mut state = ShopState::default();
        assert!(matches!(
            create_order(&mut state, new_order(5), "x").unwrap_err(),
            Error::ClientNotFound { id: 5 }
        ));
    }

    #[test]
    fn test_create_order_rejects_blank_problem() {
        let mut state = ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            ..Default::default()
        };
        let mut input = new_order(1);
        input.problem_description = "  ".to_string();
        assert!(matches!(
            create_order(&mut state, input, "x").unwrap_err(),
            Error::Config { message: _ }
        ));
    }

    #[test]
    fn test_any_status_can_follow_any_other() {
        let mut state = ShopState {
            orders: vec![sample_order(1, 1)],
            ..Default::default()
        };
        let now = Utc::now();

        apply_status(&mut state, 1, OrderStatus::Delivered, "Tech", now).unwrap();
        let order = apply_status(&mut state, 1, OrderStatus::Diagnosing, "Tech", now).unwrap();

        assert_eq!(order.status, OrderStatus::Diagnosing);
        assert_eq!(order.history.len(), 2);
        assert_eq!(order.history[0].status, OrderStatus::Diagnosing);
        assert_eq!(order.history[1].status, OrderStatus::Delivered);
        assert_eq!(state.order(1).unwrap(), &order);
    }

    #[tokio::test]
    async fn test_ready_calls_assistant_once_and_adds_one_entry() {
        let mut state = ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            orders: vec![sample_order(1, 1)],
            ..Default::default()
        };
        let assistant = CountingGenerator::failing();

        let change = transition_status(&mut state, 1, OrderStatus::Ready, "Tech", &assistant)
            .await
            .unwrap();

        assert_eq!(assistant.message_calls(), 1);
        assert_eq!(change.client_message.as_deref(), Some(FALLBACK_MESSAGE));
        assert_eq!(change.order.history.len(), 1);
        assert_eq!(state.order(1).unwrap().status, OrderStatus::Ready);
    }

    #[tokio::test]
    async fn test_ready_passes_client_and_equipment_to_assistant() {
        let mut state = ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            orders: vec![sample_order(1, 1)],
            ..Default::default()
        };
        let assistant = CountingGenerator::echoing();

        let change = transition_status(&mut state, 1, OrderStatus::Ready, "Tech", &assistant)
            .await
            .unwrap();

        let message = change.client_message.unwrap();
        assert!(message.contains("Ana Souza"));
        assert!(message.contains("Ready"));
    }

    #[tokio::test]
    async fn test_client_notice_outlives_state() {
        let mut state = ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            orders: vec![sample_order(1, 1)],
            ..Default::default()
        };
        let order = apply_status(&mut state, 1, OrderStatus::Ready, "Tech", Utc::now()).unwrap();
        let notice = client_notice(&state, &order).unwrap();
        drop(state);

        let assistant = CountingGenerator::echoing();
        let message = notice.compose(&assistant).await;

        assert_eq!(assistant.message_calls(), 1);
        assert!(message.starts_with("Ana Souza | HP LaserJet P1102 | Ready | Service order #1."));
    }

    #[test]
    fn test_client_notice_only_for_ready() {
        let state = ShopState {
            clients: vec![sample_client(1, "Ana Souza")],
            ..Default::default()
        };
        let mut order = sample_order(1, 1);
        for status in OrderStatus::ALL {
            order.status = status;
            assert_eq!(
                client_notice(&state, &order).is_some(),
                status == OrderStatus::Ready
            );
        }
    }

    #[tokio::test]
    async fn test_other_statuses_do_not_call_assistant() {
        let mut state = ShopState {
            orders: vec![sample_order(1, 1)],
            ..Default::default()
        };
        let assistant = CountingGenerator::echoing();

        let change = transition_status(&mut state, 1, OrderStatus::InRepair, "Tech", &assistant)
            .await
            .unwrap();

        assert_eq!(assistant.message_calls(), 0);
        assert!(change.client_message.is_none());
    }

    #[tokio::test]
    async fn test_transition_unknown_order() {
        let mut state = ShopState::default();
        let assistant = CountingGenerator::echoing();
        let result = transition_status(&mut state, 9, OrderStatus::Ready, "Tech", &assistant).await;
        assert!(matches!(result.unwrap_err(), Error::OrderNotFound { id: 9 }));
        assert_eq!(assistant.message_calls(), 0);
    }

    #[test]
    fn test_delete_order() {
        let mut state = ShopState {
            orders: vec![sample_order(1, 1), sample_order(2, 1)],
            ..Default::default()
        };
        delete_order(&mut state, 1).unwrap();
        assert_eq!(state.orders.len(), 1);
        assert_eq!(state.orders[0].id, 2);
    }

    #[test]
    fn test_search_orders_by_client_and_id() {
        let state = ShopState {
            clients: vec![sample_client(1, "Ana Souza"), sample_client(2, "Bruno Lima")],
            orders: vec![sample_order(1, 1), sample_order(12, 2)],
            ..Default::default()
        };

        let by_client: Vec<i64> = search_orders(&state, "bruno").iter().map(|o| o.id).collect();
        assert_eq!(by_client, vec![12]);

        let by_id: Vec<i64> = search_orders(&state, "#12").iter().map(|o| o.id).collect();
        assert_eq!(by_id, vec![12]);
    }
}
