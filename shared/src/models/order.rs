//! Order model and status machine

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Order status
///
/// The recommended discipline is the forward path
/// `Pending → Preparing → Completed`, with `Cancelled` reachable from
/// `Pending` or `Preparing`. Terminal states accept no further status
/// edits. Enforcement is a policy toggle; the transition graph lives here
/// so it is testable on its own.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    #[default]
    Pending,
    Preparing,
    Completed,
    Cancelled,
}

impl OrderStatus {
    pub fn is_terminal(&self) -> bool {
        matches!(self, OrderStatus::Completed | OrderStatus::Cancelled)
    }

    /// Whether `self → next` is on the recommended transition graph
    pub fn can_transition_to(&self, next: OrderStatus) -> bool {
        use OrderStatus::*;
        if *self == next {
            // setting the same status again is a no-op, always allowed
            return true;
        }
        match (*self, next) {
            (Pending, Preparing) | (Preparing, Completed) => true,
            (Pending, Cancelled) | (Preparing, Cancelled) => true,
            (Pending, Completed) => true,
            _ => false,
        }
    }
}

/// Order entity: one open tab at a table
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    /// Caller-supplied identifier, unique across all orders
    pub order_id: i64,
    pub table_id: i64,
    pub order_time: DateTime<Utc>,
    pub status: OrderStatus,
}

/// Create payload (mirrors `AddOrderInput`)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderCreate {
    pub order_id: i64,
    pub table_id: i64,
    pub status: OrderStatus,
}

/// Edit payload (mirrors `EditOrderInput`; absent field = no change)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub table_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<OrderStatus>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn forward_path_is_allowed() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Preparing));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Completed));
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Completed));
    }

    #[test]
    fn cancellation_only_before_completion() {
        assert!(OrderStatus::Pending.can_transition_to(OrderStatus::Cancelled));
        assert!(OrderStatus::Preparing.can_transition_to(OrderStatus::Cancelled));
        assert!(!OrderStatus::Completed.can_transition_to(OrderStatus::Cancelled));
    }

    #[test]
    fn terminal_states_reject_everything_but_self() {
        for terminal in [OrderStatus::Completed, OrderStatus::Cancelled] {
            assert!(terminal.is_terminal());
            assert!(terminal.can_transition_to(terminal));
            assert!(!terminal.can_transition_to(OrderStatus::Pending));
            assert!(!terminal.can_transition_to(OrderStatus::Preparing));
        }
    }

    #[test]
    fn status_wire_names_are_screaming_snake() {
        let json = serde_json::to_string(&OrderStatus::Preparing).unwrap();
        assert_eq!(json, "\"PREPARING\"");
    }
}
