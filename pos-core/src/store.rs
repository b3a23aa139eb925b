//! redb-based persistence for orders and line items
//!
//! # Tables
//!
//! | Table | Key | Value | Purpose |
//! |-------|-----|-------|---------|
//! | `orders` | `order_id` | JSON `Order` | Order records |
//! | `order_items` | `orderitem_id` | JSON `OrderItem` | Line item records |
//!
//! # Concurrency
//!
//! Every mutation runs inside one write transaction. redb has a single
//! writer, so commands against the same identifiers are serialized at this
//! boundary; readers get MVCC snapshots and never block. Read paths
//! (`scan_snapshot`, `items_for_order`) open a single read transaction so
//! aggregations see a consistent view.

use redb::{Database, ReadableDatabase, ReadableTable, TableDefinition};
use shared::models::{Order, OrderItem};
use std::path::Path;
use std::sync::Arc;
use thiserror::Error;

/// Orders: key = order_id, value = JSON-serialized Order
const ORDERS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("orders");

/// Line items: key = orderitem_id, value = JSON-serialized OrderItem
const ORDER_ITEMS_TABLE: TableDefinition<i64, &[u8]> = TableDefinition::new("order_items");

/// Storage errors
#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Database error: {0}")]
    Database(#[from] redb::DatabaseError),

    #[error("Transaction error: {0}")]
    Transaction(#[from] redb::TransactionError),

    #[error("Table error: {0}")]
    Table(#[from] redb::TableError),

    #[error("Storage error: {0}")]
    Storage(#[from] redb::StorageError),

    #[error("Commit error: {0}")]
    Commit(#[from] redb::CommitError),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order already exists: {0}")]
    OrderExists(i64),

    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    #[error("Order item already paid: {0}")]
    ItemPaid(i64),
}

pub type StorageResult<T> = Result<T, StorageError>;

/// Order/line-item store backed by redb
#[derive(Clone)]
pub struct OrderStore {
    db: Arc<Database>,
}

impl std::fmt::Debug for OrderStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("OrderStore").finish_non_exhaustive()
    }
}

impl OrderStore {
    /// Open or create the database at the given path
    pub fn open(path: impl AsRef<Path>) -> StorageResult<Self> {
        let db = Database::create(path)?;
        Self::init(db)
    }

    /// Volatile store for tests and embedded use
    pub fn in_memory() -> StorageResult<Self> {
        let db = Database::builder().create_with_backend(redb::backends::InMemoryBackend::new())?;
        Self::init(db)
    }

    fn init(db: Database) -> StorageResult<Self> {
        let write_txn = db.begin_write()?;
        {
            let _ = write_txn.open_table(ORDERS_TABLE)?;
            let _ = write_txn.open_table(ORDER_ITEMS_TABLE)?;
        }
        write_txn.commit()?;
        Ok(Self { db: Arc::new(db) })
    }

    // ========== Orders ==========

    /// Insert a new order; fails if the id is already taken
    pub fn insert_order(&self, order: &Order) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            if table.get(order.order_id)?.is_some() {
                return Err(StorageError::OrderExists(order.order_id));
            }
            let bytes = serde_json::to_vec(order)?;
            table.insert(order.order_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    pub fn get_order(&self, order_id: i64) -> StorageResult<Order> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let guard = table
            .get(order_id)?
            .ok_or(StorageError::OrderNotFound(order_id))?;
        Ok(serde_json::from_slice(guard.value())?)
    }

    /// Overwrite an existing order; fails if the id is unknown
    pub fn update_order(&self, order: &Order) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let mut table = write_txn.open_table(ORDERS_TABLE)?;
            if table.get(order.order_id)?.is_none() {
                return Err(StorageError::OrderNotFound(order.order_id));
            }
            let bytes = serde_json::to_vec(order)?;
            table.insert(order.order_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove an order, optionally cascading to its line items.
    /// Order removal and the cascade commit atomically.
    pub fn delete_order(&self, order_id: i64, cascade: bool) -> StorageResult<Order> {
        let write_txn = self.db.begin_write()?;
        let removed: Order;
        {
            let mut orders = write_txn.open_table(ORDERS_TABLE)?;
            let guard = orders
                .remove(order_id)?
                .ok_or(StorageError::OrderNotFound(order_id))?;
            removed = serde_json::from_slice(guard.value())?;
            drop(guard);

            if cascade {
                let mut items = write_txn.open_table(ORDER_ITEMS_TABLE)?;
                let mut doomed = Vec::new();
                for entry in items.iter()? {
                    let (key, value) = entry?;
                    let item: OrderItem = serde_json::from_slice(value.value())?;
                    if item.order_id == order_id {
                        doomed.push(key.value());
                    }
                }
                for id in doomed {
                    items.remove(id)?;
                }
            }
        }
        write_txn.commit()?;
        Ok(removed)
    }

    pub fn list_orders(&self) -> StorageResult<Vec<Order>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDERS_TABLE)?;
        let mut orders = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            orders.push(serde_json::from_slice(value.value())?);
        }
        Ok(orders)
    }

    // ========== Line items ==========

    /// Insert a line item, assigning the next free id. The owning order
    /// must exist; the check shares the transaction with the insert.
    pub fn insert_item(&self, mut item: OrderItem) -> StorageResult<OrderItem> {
        let write_txn = self.db.begin_write()?;
        {
            let orders = write_txn.open_table(ORDERS_TABLE)?;
            if orders.get(item.order_id)?.is_none() {
                return Err(StorageError::OrderNotFound(item.order_id));
            }

            let mut items = write_txn.open_table(ORDER_ITEMS_TABLE)?;
            let next_id = items
                .last()?
                .map(|(key, _)| key.value() + 1)
                .unwrap_or(1);
            item.orderitem_id = next_id;
            let bytes = serde_json::to_vec(&item)?;
            items.insert(next_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(item)
    }

    pub fn get_item(&self, orderitem_id: i64) -> StorageResult<OrderItem> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_ITEMS_TABLE)?;
        let guard = table
            .get(orderitem_id)?
            .ok_or(StorageError::ItemNotFound(orderitem_id))?;
        Ok(serde_json::from_slice(guard.value())?)
    }

    /// Overwrite an existing line item. Also verifies the (possibly
    /// reassigned) owning order inside the same transaction.
    pub fn update_item(&self, item: &OrderItem) -> StorageResult<()> {
        let write_txn = self.db.begin_write()?;
        {
            let orders = write_txn.open_table(ORDERS_TABLE)?;
            if orders.get(item.order_id)?.is_none() {
                return Err(StorageError::OrderNotFound(item.order_id));
            }

            let mut items = write_txn.open_table(ORDER_ITEMS_TABLE)?;
            if items.get(item.orderitem_id)?.is_none() {
                return Err(StorageError::ItemNotFound(item.orderitem_id));
            }
            let bytes = serde_json::to_vec(item)?;
            items.insert(item.orderitem_id, bytes.as_slice())?;
        }
        write_txn.commit()?;
        Ok(())
    }

    /// Remove a line item. With `refuse_paid`, a paid item aborts the
    /// transaction and nothing is deleted; the check shares the transaction
    /// with the removal, so a concurrent paid-flag write cannot slip in
    /// between.
    pub fn delete_item(&self, orderitem_id: i64, refuse_paid: bool) -> StorageResult<OrderItem> {
        let write_txn = self.db.begin_write()?;
        let removed: OrderItem;
        {
            let mut items = write_txn.open_table(ORDER_ITEMS_TABLE)?;
            let guard = items
                .remove(orderitem_id)?
                .ok_or(StorageError::ItemNotFound(orderitem_id))?;
            removed = serde_json::from_slice(guard.value())?;
            if refuse_paid && removed.is_paid {
                return Err(StorageError::ItemPaid(orderitem_id));
            }
        }
        write_txn.commit()?;
        Ok(removed)
    }

    pub fn items_for_order(&self, order_id: i64) -> StorageResult<Vec<OrderItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_ITEMS_TABLE)?;
        let mut result = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            let item: OrderItem = serde_json::from_slice(value.value())?;
            if item.order_id == order_id {
                result.push(item);
            }
        }
        Ok(result)
    }

    pub fn list_items(&self) -> StorageResult<Vec<OrderItem>> {
        let read_txn = self.db.begin_read()?;
        let table = read_txn.open_table(ORDER_ITEMS_TABLE)?;
        let mut result = Vec::new();
        for entry in table.iter()? {
            let (_, value) = entry?;
            result.push(serde_json::from_slice(value.value())?);
        }
        Ok(result)
    }

    /// All orders and all line items from one read transaction, for
    /// aggregations that must see a consistent snapshot
    pub fn scan_snapshot(&self) -> StorageResult<(Vec<Order>, Vec<OrderItem>)> {
        let read_txn = self.db.begin_read()?;
        let orders_table = read_txn.open_table(ORDERS_TABLE)?;
        let items_table = read_txn.open_table(ORDER_ITEMS_TABLE)?;

        let mut orders = Vec::new();
        for entry in orders_table.iter()? {
            let (_, value) = entry?;
            orders.push(serde_json::from_slice(value.value())?);
        }
        let mut items = Vec::new();
        for entry in items_table.iter()? {
            let (_, value) = entry?;
            items.push(serde_json::from_slice(value.value())?);
        }
        Ok((orders, items))
    }
}
