//! Unpaid-orders aggregation (read side)
//!
//! Scans all line items with `is_paid = false`, groups them by order, and
//! reports the outstanding balance per order together with the owning
//! table. Used by cashier and admin reconciliation views.

use super::{money, OrderResult};
use crate::store::OrderStore;
use rust_decimal::Decimal;
use shared::models::{Order, UnpaidOrder};
use std::collections::{BTreeMap, HashMap};
use tracing::warn;

/// Outstanding balances grouped by order, sorted by order id. Empty input
/// yields an empty vec, never an error.
///
/// Orders and items come from a single read transaction, so the result is
/// a consistent snapshot even while commands are running.
pub fn list_unpaid_orders(store: &OrderStore) -> OrderResult<Vec<UnpaidOrder>> {
    let (orders, items) = store.scan_snapshot()?;
    let orders_by_id: HashMap<i64, &Order> =
        orders.iter().map(|o| (o.order_id, o)).collect();

    let mut totals: BTreeMap<i64, Decimal> = BTreeMap::new();
    for item in items.iter().filter(|item| !item.is_paid) {
        if !orders_by_id.contains_key(&item.order_id) {
            // orphan from a non-cascaded order delete
            warn!(
                orderitem_id = item.orderitem_id,
                order_id = item.order_id,
                "unpaid line item references a missing order, skipping"
            );
            continue;
        }
        *totals.entry(item.order_id).or_insert(Decimal::ZERO) += money::to_decimal(item.amount);
    }

    Ok(totals
        .into_iter()
        .map(|(order_id, total)| UnpaidOrder {
            order_id,
            table_id: orders_by_id[&order_id].table_id,
            total_amount: money::to_f64(total),
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Utc;
    use shared::models::{OrderItem, OrderStatus};

    fn order(order_id: i64, table_id: i64) -> Order {
        Order {
            order_id,
            table_id,
            order_time: Utc::now(),
            status: OrderStatus::Pending,
        }
    }

    fn item(order_id: i64, amount: f64, is_paid: bool) -> OrderItem {
        OrderItem {
            orderitem_id: 0,
            order_id,
            menu_id: 1,
            quantity: 1,
            amount,
            is_paid,
        }
    }

    #[test]
    fn empty_store_yields_empty_list() {
        let store = OrderStore::in_memory().unwrap();
        assert!(list_unpaid_orders(&store).unwrap().is_empty());
    }

    #[test]
    fn groups_by_order_and_sums_unpaid_only() {
        let store = OrderStore::in_memory().unwrap();
        store.insert_order(&order(1001, 7)).unwrap();
        store.insert_order(&order(1002, 3)).unwrap();
        store.insert_item(item(1001, 25.98, true)).unwrap();
        store.insert_item(item(1001, 5.00, false)).unwrap();
        store.insert_item(item(1002, 7.50, false)).unwrap();
        store.insert_item(item(1002, 2.50, false)).unwrap();

        let unpaid = list_unpaid_orders(&store).unwrap();
        assert_eq!(
            unpaid,
            vec![
                UnpaidOrder {
                    order_id: 1001,
                    table_id: 7,
                    total_amount: 5.00
                },
                UnpaidOrder {
                    order_id: 1002,
                    table_id: 3,
                    total_amount: 10.00
                },
            ]
        );
    }

    #[test]
    fn fully_paid_orders_are_absent() {
        let store = OrderStore::in_memory().unwrap();
        store.insert_order(&order(1, 7)).unwrap();
        store.insert_item(item(1, 25.98, true)).unwrap();
        assert!(list_unpaid_orders(&store).unwrap().is_empty());
    }

    #[test]
    fn orphaned_items_are_skipped() {
        let store = OrderStore::in_memory().unwrap();
        store.insert_order(&order(1, 7)).unwrap();
        store.insert_item(item(1, 5.00, false)).unwrap();
        // non-cascaded delete leaves the item behind
        store.delete_order(1, false).unwrap();
        assert!(list_unpaid_orders(&store).unwrap().is_empty());
    }
}
