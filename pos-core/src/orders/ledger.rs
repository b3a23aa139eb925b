//! Line item ledger
//!
//! Owns line-item creation, edits and the paid flag. Stored amounts are
//! derived from the catalog price by the billing calculator at write time;
//! a later catalog price change must not silently alter items that are not
//! being repriced, so recomputation happens only when quantity or menu item
//! actually change.

use super::{money, OrderError, OrderResult};
use crate::catalog::CatalogReader;
use crate::config::PosConfig;
use crate::store::OrderStore;
use shared::models::{BillingSnapshot, OrderItem, OrderItemCreate, OrderItemUpdate};
use std::sync::Arc;
use tracing::{debug, info};

pub struct LineItemLedger {
    store: OrderStore,
    catalog: Arc<dyn CatalogReader>,
    config: PosConfig,
}

impl LineItemLedger {
    pub fn new(store: OrderStore, catalog: Arc<dyn CatalogReader>, config: PosConfig) -> Self {
        Self {
            store,
            catalog,
            config,
        }
    }

    /// Under the status discipline, a terminal order's bill is frozen:
    /// no new items, no repricing, no moves. Paid-flag-only edits stay
    /// allowed so a closed tab can still be settled.
    fn require_open_order(&self, order_id: i64) -> OrderResult<()> {
        if !self.config.enforce_status_discipline {
            return Ok(());
        }
        let order = self.store.get_order(order_id)?;
        if order.status.is_terminal() {
            return Err(OrderError::InvalidTransition(format!(
                "order {order_id} is {:?}, line items can no longer change",
                order.status
            )));
        }
        Ok(())
    }

    /// Add a line item to an order. The amount is always computed from the
    /// current catalog price; a caller-supplied amount is ignored.
    pub async fn add_line_item(&self, create: OrderItemCreate) -> OrderResult<OrderItem> {
        money::require_valid_quantity(create.quantity)?;
        self.require_open_order(create.order_id)?;

        let menu = self.catalog.menu_item(create.menu_id).await?;
        if !menu.is_available {
            return Err(OrderError::MenuItemUnavailable(create.menu_id));
        }
        if let Some(claimed) = create.amount {
            debug!(
                menu_id = create.menu_id,
                claimed,
                "caller-supplied amount ignored, recomputing from catalog"
            );
        }
        let amount = money::to_f64(money::line_amount(menu.price, create.quantity)?);

        let item = self.store.insert_item(OrderItem {
            orderitem_id: 0, // assigned by the store
            order_id: create.order_id,
            menu_id: create.menu_id,
            quantity: create.quantity,
            amount,
            is_paid: false,
        })?;
        info!(
            orderitem_id = item.orderitem_id,
            order_id = item.order_id,
            menu_id = item.menu_id,
            quantity = item.quantity,
            amount = item.amount,
            "line item added"
        );
        Ok(item)
    }

    /// Edit a line item. Quantity or menu changes reprice the line from the
    /// current catalog price; a paid-flag-only edit leaves the amount
    /// untouched.
    pub async fn edit_line_item(
        &self,
        orderitem_id: i64,
        update: OrderItemUpdate,
    ) -> OrderResult<OrderItem> {
        let current = self.store.get_item(orderitem_id)?;
        let mut item = current.clone();

        if let Some(order_id) = update.order_id {
            // target order existence is checked by the store in the same
            // transaction as the write
            item.order_id = order_id;
        }

        let quantity = update.quantity.unwrap_or(current.quantity);
        let menu_id = update.menu_id.unwrap_or(current.menu_id);
        let reprice = quantity != current.quantity || menu_id != current.menu_id;
        let moved = item.order_id != current.order_id;

        // bill-changing edits are subject to the terminal-order freeze;
        // a paid-flag-only edit is not
        if reprice || moved {
            self.require_open_order(current.order_id)?;
            if moved {
                self.require_open_order(item.order_id)?;
            }
        }

        if reprice {
            money::require_valid_quantity(quantity)?;
            let menu = self.catalog.menu_item(menu_id).await?;
            if menu_id != current.menu_id && !menu.is_available {
                return Err(OrderError::MenuItemUnavailable(menu_id));
            }
            item.menu_id = menu_id;
            item.quantity = quantity;
            item.amount = money::to_f64(money::line_amount(menu.price, quantity)?);
        }

        if let Some(paid) = update.is_paid {
            item.is_paid = paid;
        }

        self.store.update_item(&item)?;
        info!(
            orderitem_id,
            repriced = reprice,
            amount = item.amount,
            is_paid = item.is_paid,
            "line item updated"
        );
        Ok(item)
    }

    /// Delete a line item. Refusing to delete paid items is a policy toggle;
    /// the legacy system deleted them without question. The check rides the
    /// delete transaction, so it cannot race a concurrent paid-flag write.
    pub fn delete_line_item(&self, orderitem_id: i64) -> OrderResult<OrderItem> {
        let removed = self
            .store
            .delete_item(orderitem_id, self.config.guard_paid_item_delete)?;
        info!(orderitem_id, order_id = removed.order_id, "line item deleted");
        Ok(removed)
    }

    /// Set the paid flag only. Idempotent: setting the current value is a
    /// successful no-op and touches nothing else.
    pub async fn mark_paid(&self, orderitem_id: i64, paid: bool) -> OrderResult<OrderItem> {
        self.edit_line_item(
            orderitem_id,
            OrderItemUpdate {
                is_paid: Some(paid),
                ..Default::default()
            },
        )
        .await
    }

    pub fn get_item(&self, orderitem_id: i64) -> OrderResult<OrderItem> {
        Ok(self.store.get_item(orderitem_id)?)
    }

    pub fn list_items(&self) -> OrderResult<Vec<OrderItem>> {
        Ok(self.store.list_items()?)
    }

    /// Derived totals for one order; checks the order exists first
    pub fn billing(&self, order_id: i64) -> OrderResult<BillingSnapshot> {
        self.store.get_order(order_id)?;
        let items = self.store.items_for_order(order_id)?;
        Ok(money::billing_snapshot(&items, self.config.tax_rate))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::MemoryCatalog;
    use chrono::Utc;
    use shared::models::{MenuItem, Order, OrderStatus};

    fn fixture() -> (LineItemLedger, Arc<MemoryCatalog>, OrderStore) {
        let catalog = Arc::new(
            MemoryCatalog::new()
                .with_menu_item(5, "Margherita", 12.99, 0.0)
                .with_menu_item(9, "Espresso", 5.00, 0.0)
                .with_table(7, "Window 7"),
        );
        let store = OrderStore::in_memory().unwrap();
        store
            .insert_order(&Order {
                order_id: 1001,
                table_id: 7,
                order_time: Utc::now(),
                status: OrderStatus::Pending,
            })
            .unwrap();
        let ledger = LineItemLedger::new(store.clone(), catalog.clone(), PosConfig::default());
        (ledger, catalog, store)
    }

    fn add(order_id: i64, menu_id: i64, quantity: i32) -> OrderItemCreate {
        OrderItemCreate {
            order_id,
            menu_id,
            quantity,
            amount: None,
        }
    }

    #[tokio::test]
    async fn amount_is_derived_from_catalog_not_caller() {
        let (ledger, _, _) = fixture();
        let item = ledger
            .add_line_item(OrderItemCreate {
                amount: Some(999.99),
                ..add(1001, 5, 2)
            })
            .await
            .unwrap();
        assert_eq!(item.amount, 25.98);
        assert!(!item.is_paid);
    }

    #[tokio::test]
    async fn non_positive_quantity_is_rejected() {
        let (ledger, _, _) = fixture();
        let err = ledger.add_line_item(add(1001, 5, 0)).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidQuantity(0)));
    }

    #[tokio::test]
    async fn unknown_order_and_menu_are_rejected() {
        let (ledger, _, _) = fixture();
        let err = ledger.add_line_item(add(2000, 5, 1)).await.unwrap_err();
        assert!(matches!(err, OrderError::OrderNotFound(2000)));
        let err = ledger.add_line_item(add(1001, 77, 1)).await.unwrap_err();
        assert!(matches!(err, OrderError::MenuItemNotFound(77)));
    }

    #[tokio::test]
    async fn unavailable_menu_item_is_rejected() {
        let (ledger, catalog, _) = fixture();
        catalog.insert_menu_item(MenuItem {
            menu_id: 13,
            menu_name: "Seasonal".to_string(),
            price: 8.00,
            discount: 0.0,
            is_available: false,
        });
        let err = ledger.add_line_item(add(1001, 13, 1)).await.unwrap_err();
        assert!(matches!(err, OrderError::MenuItemUnavailable(13)));
    }

    #[tokio::test]
    async fn quantity_edit_reprices_from_current_catalog() {
        let (ledger, catalog, _) = fixture();
        let item = ledger.add_line_item(add(1001, 5, 2)).await.unwrap();
        assert_eq!(item.amount, 25.98);

        // catalog price moves after the item was written
        catalog.insert_menu_item(MenuItem {
            menu_id: 5,
            menu_name: "Margherita".to_string(),
            price: 14.00,
            discount: 0.0,
            is_available: true,
        });

        let edited = ledger
            .edit_line_item(
                item.orderitem_id,
                OrderItemUpdate {
                    quantity: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.amount, 42.00);
    }

    #[tokio::test]
    async fn paid_flag_edit_never_touches_amount() {
        let (ledger, catalog, _) = fixture();
        let item = ledger.add_line_item(add(1001, 5, 2)).await.unwrap();

        // price shift that must NOT leak into the stored amount
        catalog.insert_menu_item(MenuItem {
            menu_id: 5,
            menu_name: "Margherita".to_string(),
            price: 99.00,
            discount: 0.0,
            is_available: true,
        });

        let paid = ledger.mark_paid(item.orderitem_id, true).await.unwrap();
        assert!(paid.is_paid);
        assert_eq!(paid.amount.to_bits(), item.amount.to_bits());
        assert_eq!(paid.quantity, item.quantity);
    }

    #[tokio::test]
    async fn mark_paid_is_idempotent() {
        let (ledger, _, _) = fixture();
        let item = ledger.add_line_item(add(1001, 5, 2)).await.unwrap();
        let first = ledger.mark_paid(item.orderitem_id, true).await.unwrap();
        let second = ledger.mark_paid(item.orderitem_id, true).await.unwrap();
        assert_eq!(first, second);
    }

    #[tokio::test]
    async fn explicit_same_quantity_does_not_reprice() {
        let (ledger, catalog, _) = fixture();
        let item = ledger.add_line_item(add(1001, 5, 2)).await.unwrap();
        catalog.insert_menu_item(MenuItem {
            menu_id: 5,
            menu_name: "Margherita".to_string(),
            price: 99.00,
            discount: 0.0,
            is_available: true,
        });
        // caller resends the unchanged quantity; nothing actually changes
        let edited = ledger
            .edit_line_item(
                item.orderitem_id,
                OrderItemUpdate {
                    quantity: Some(2),
                    is_paid: Some(true),
                    ..Default::default()
                },
            )
            .await
            .unwrap();
        assert_eq!(edited.amount, 25.98);
    }

    #[tokio::test]
    async fn closed_order_accepts_no_new_items() {
        let (ledger, _, store) = fixture();
        store
            .insert_order(&Order {
                order_id: 2001,
                table_id: 7,
                order_time: Utc::now(),
                status: OrderStatus::Completed,
            })
            .unwrap();

        let err = ledger.add_line_item(add(2001, 5, 1)).await.unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition(_)));
        assert!(store.items_for_order(2001).unwrap().is_empty());
    }

    #[tokio::test]
    async fn closed_order_rejects_repricing_but_not_settling() {
        let (ledger, _, store) = fixture();
        let item = ledger.add_line_item(add(1001, 5, 2)).await.unwrap();

        // close the tab after the item was booked
        let mut order = store.get_order(1001).unwrap();
        order.status = OrderStatus::Completed;
        store.update_order(&order).unwrap();

        let err = ledger
            .edit_line_item(
                item.orderitem_id,
                OrderItemUpdate {
                    quantity: Some(3),
                    ..Default::default()
                },
            )
            .await
            .unwrap_err();
        assert!(matches!(err, OrderError::InvalidTransition(_)));

        // settling the closed tab is still fine
        let paid = ledger.mark_paid(item.orderitem_id, true).await.unwrap();
        assert!(paid.is_paid);
        assert_eq!(paid.amount, item.amount);
    }

    #[tokio::test]
    async fn lenient_config_allows_items_on_closed_orders() {
        let catalog = Arc::new(
            MemoryCatalog::new()
                .with_menu_item(5, "Margherita", 12.99, 0.0)
                .with_table(7, "Window 7"),
        );
        let store = OrderStore::in_memory().unwrap();
        store
            .insert_order(&Order {
                order_id: 1,
                table_id: 7,
                order_time: Utc::now(),
                status: OrderStatus::Cancelled,
            })
            .unwrap();
        let ledger = LineItemLedger::new(store, catalog, PosConfig::lenient());

        // legacy behavior: nothing stops a late booking
        let item = ledger.add_line_item(add(1, 5, 1)).await.unwrap();
        assert_eq!(item.amount, 12.99);
    }

    #[tokio::test]
    async fn paid_item_delete_guard_is_policy() {
        let catalog = Arc::new(
            MemoryCatalog::new()
                .with_menu_item(5, "Margherita", 12.99, 0.0)
                .with_table(7, "Window 7"),
        );
        let store = OrderStore::in_memory().unwrap();
        store
            .insert_order(&Order {
                order_id: 1,
                table_id: 7,
                order_time: Utc::now(),
                status: OrderStatus::Pending,
            })
            .unwrap();
        let config = PosConfig {
            guard_paid_item_delete: true,
            ..PosConfig::default()
        };
        let ledger = LineItemLedger::new(store, catalog, config);

        let item = ledger.add_line_item(add(1, 5, 1)).await.unwrap();
        ledger.mark_paid(item.orderitem_id, true).await.unwrap();
        let err = ledger.delete_line_item(item.orderitem_id).unwrap_err();
        assert!(matches!(err, OrderError::PaidItemDelete(_)));
    }

    #[tokio::test]
    async fn billing_matches_reference_scenario() {
        let (ledger, _, _) = fixture();
        ledger.add_line_item(add(1001, 5, 2)).await.unwrap();
        ledger.add_line_item(add(1001, 9, 1)).await.unwrap();
        let snap = ledger.billing(1001).unwrap();
        assert_eq!(snap.subtotal, 30.98);
        assert_eq!(snap.total, 34.08);
    }
}
