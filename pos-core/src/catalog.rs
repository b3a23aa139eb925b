//! Catalog seam
//!
//! Menu prices, discounts, availability and dining-table identity come from
//! the catalog subsystem, which the core only ever reads. The trait keeps
//! the core testable without that subsystem; `MemoryCatalog` is the
//! in-process implementation used by tests and embedding callers.

use async_trait::async_trait;
use parking_lot::RwLock;
use shared::models::{DiningTable, MenuItem};
use std::collections::HashMap;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum CatalogError {
    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Catalog backend error: {0}")]
    Backend(String),
}

/// Read-only view of the menu and table catalog
#[async_trait]
pub trait CatalogReader: Send + Sync {
    /// Look up a menu item; `MenuItemNotFound` if absent
    async fn menu_item(&self, menu_id: i64) -> Result<MenuItem, CatalogError>;

    /// Whether the table identifier exists
    async fn table_exists(&self, table_id: i64) -> Result<bool, CatalogError>;
}

/// In-memory catalog backed by `RwLock`ed maps
#[derive(Debug, Default)]
pub struct MemoryCatalog {
    menu: RwLock<HashMap<i64, MenuItem>>,
    tables: RwLock<HashMap<i64, DiningTable>>,
}

impl MemoryCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn insert_menu_item(&self, item: MenuItem) {
        self.menu.write().insert(item.menu_id, item);
    }

    pub fn insert_table(&self, table: DiningTable) {
        self.tables.write().insert(table.table_id, table);
    }

    /// Convenience for tests: a priced, available menu item
    pub fn with_menu_item(self, menu_id: i64, name: &str, price: f64, discount: f64) -> Self {
        self.insert_menu_item(MenuItem {
            menu_id,
            menu_name: name.to_string(),
            price,
            discount,
            is_available: true,
        });
        self
    }

    pub fn with_table(self, table_id: i64, name: &str) -> Self {
        self.insert_table(DiningTable {
            table_id,
            table_name: name.to_string(),
            is_available: true,
        });
        self
    }
}

#[async_trait]
impl CatalogReader for MemoryCatalog {
    async fn menu_item(&self, menu_id: i64) -> Result<MenuItem, CatalogError> {
        self.menu
            .read()
            .get(&menu_id)
            .cloned()
            .ok_or(CatalogError::MenuItemNotFound(menu_id))
    }

    async fn table_exists(&self, table_id: i64) -> Result<bool, CatalogError> {
        Ok(self.tables.read().contains_key(&table_id))
    }
}
