//! Order aggregate operations
//!
//! Owns one order's identity, table assignment and status. The transition
//! graph lives on `OrderStatus`; this service decides when to enforce it
//! (policy-gated, the legacy system accepted any edit).

use super::{OrderError, OrderResult};
use crate::catalog::CatalogReader;
use crate::config::PosConfig;
use crate::store::OrderStore;
use chrono::Utc;
use shared::models::{Order, OrderCreate, OrderUpdate};
use std::sync::Arc;
use tracing::info;

pub struct OrderService {
    store: OrderStore,
    catalog: Arc<dyn CatalogReader>,
    config: PosConfig,
}

impl OrderService {
    pub fn new(store: OrderStore, catalog: Arc<dyn CatalogReader>, config: PosConfig) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// Place a new order. The identifier is caller-supplied; collisions are
    /// a first-class error, the existing order stays untouched.
    pub async fn place_order(&self, create: OrderCreate) -> OrderResult<Order> {
        if !self.catalog.table_exists(create.table_id).await? {
            return Err(OrderError::TableNotFound(create.table_id));
        }

        let order = Order {
            order_id: create.order_id,
            table_id: create.table_id,
            order_time: Utc::now(),
            status: create.status,
        };
        self.store.insert_order(&order)?;
        info!(
            order_id = order.order_id,
            table_id = order.table_id,
            status = ?order.status,
            "order placed"
        );
        Ok(order)
    }

    /// Edit status and/or table assignment.
    ///
    /// Checks run against the order's status as loaded: a single edit that
    /// both completes the order and moves its table is still a pre-terminal
    /// table move.
    pub async fn edit_order(&self, order_id: i64, update: OrderUpdate) -> OrderResult<Order> {
        let mut order = self.store.get_order(order_id)?;
        let status_before = order.status;

        if let Some(table_id) = update.table_id {
            if self.config.enforce_status_discipline && status_before.is_terminal() {
                return Err(OrderError::InvalidTransition(format!(
                    "order {order_id} is {status_before:?}, table can no longer change"
                )));
            }
            if !self.catalog.table_exists(table_id).await? {
                return Err(OrderError::TableNotFound(table_id));
            }
            order.table_id = table_id;
        }

        if let Some(status) = update.status {
            if self.config.enforce_status_discipline
                && !status_before.can_transition_to(status)
            {
                return Err(OrderError::InvalidTransition(format!(
                    "{status_before:?} → {status:?} is not allowed for order {order_id}"
                )));
            }
            order.status = status;
        }

        self.store.update_order(&order)?;
        info!(
            order_id,
            status = ?order.status,
            table_id = order.table_id,
            "order updated"
        );
        Ok(order)
    }

    /// Delete an order. Whether line items go with it is a policy decision
    /// (`cascade_delete_items`); the legacy system left them behind.
    pub fn delete_order(&self, order_id: i64) -> OrderResult<Order> {
        let removed = self
            .store
            .delete_order(order_id, self.config.cascade_delete_items)?;
        info!(
            order_id,
            cascade = self.config.cascade_delete_items,
            "order deleted"
        );
        Ok(removed)
    }

    pub fn get_order(&self, order_id: i64) -> OrderResult<Order> {
        Ok(self.store.get_order(order_id)?)
    }

    pub fn list_orders(&self) -> OrderResult<Vec<Order>> {
        Ok(self.store.list_orders()?)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use shared::models::OrderStatus;

    fn service(config: PosConfig) -> OrderService {
        let catalog = Arc::new(MemoryCatalog::new().with_table(7, "Window 7"));
        OrderService::new(OrderStore::in_memory().unwrap(), catalog, config)
    }

    fn create(order_id: i64, table_id: i64) -> OrderCreate {
        OrderCreate {
            order_id,
            table_id,
            status: OrderStatus::Pending,
        }
    }

    #[tokio::test]
    async fn place_order_rejects_unknown_table() {
        let svc = service(PosConfig::default());
        let err = svc.place_order(create(1001, 99)).await.unwrap_err();
        assert!(matches!(err, OrderError::TableNotFound(99)));
    }

    #[tokio::test]
    async fn duplicate_order_id_leaves_original_untouched() {
        let svc = service(PosConfig::default());
        svc.place_order(create(1001, 7)).await.unwrap();
        let err = svc.place_order(create(1001, 7)).await.unwrap_err();
        assert!(matches!(err, OrderError::DuplicateOrder(1001)));
        assert_eq!(svc.get_order(1001).unwrap().status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn terminal_order_rejects_status_edit() {
        let svc = service(PosConfig::default());
        svc.place_order(create(1, 7)).await.unwrap();
        svc.edit_order(
            1,
            OrderUpdate {
                status: Some(OrderStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        let err = svc
            .edit_order(
                1,
                OrderUpdate {
                    status: Some(OrderStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition(_)));
    }

    #[tokio::test]
    async fn lenient_config_accepts_any_status_edit() {
        let svc = service(PosConfig::lenient());
        svc.place_order(create(1, 7)).await.unwrap();
        svc.edit_order(
            1,
            OrderUpdate {
                status: Some(OrderStatus::Completed),
                ..Default::default()
            },
        )
        .await
        .unwrap();

        // legacy behavior: terminal orders can be reopened
        let order = svc
            .edit_order(
                1,
                OrderUpdate {
                    status: Some(OrderStatus::Pending),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(order.status, OrderStatus::Pending);
    }

    #[tokio::test]
    async fn edit_nonexistent_order_is_not_found() {
        let svc = service(PosConfig::default());
        let err = svc
            .edit_order(42, OrderUpdate::default())
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound(42)));
    }

    #[tokio::test]
    async fn table_reassignment_validates_table() {
        let svc = service(PosConfig::default());
        svc.place_order(create(1, 7)).await.unwrap();
        let err = svc
            .edit_order(
                1,
                OrderUpdate {
                    table_id: Some(99),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::TableNotFound(99)));
    }
}
