//! Order lifecycle module
//!
//! - **service**: order aggregate operations (place/edit/delete) and the
//!   status discipline
//! - **ledger**: line-item operations and amount recomputation rules
//! - **money**: decimal billing math
//! - **unpaid**: read-side aggregation of outstanding balances

pub mod ledger;
pub mod money;
pub mod service;
pub mod unpaid;

pub use ledger::LineItemLedger;
pub use service::OrderService;
pub use unpaid::list_unpaid_orders;

use crate::catalog::CatalogError;
use crate::store::StorageError;
use shared::ErrorKind;
use thiserror::Error;

/// Business-level errors for order and line-item operations
#[derive(Debug, Error)]
pub enum OrderError {
    #[error("Order not found: {0}")]
    OrderNotFound(i64),

    #[error("Order item not found: {0}")]
    ItemNotFound(i64),

    #[error("Menu item not found: {0}")]
    MenuItemNotFound(i64),

    #[error("Menu item not available: {0}")]
    MenuItemUnavailable(i64),

    #[error("Table not found: {0}")]
    TableNotFound(i64),

    #[error("Order already exists: {0}")]
    DuplicateOrder(i64),

    #[error("Quantity must be positive, got {0}")]
    InvalidQuantity(i32),

    #[error("Invalid status transition: {0}")]
    InvalidTransition(String),

    #[error("Order item {0} is already paid")]
    PaidItemDelete(i64),

    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("Catalog backend error: {0}")]
    CatalogBackend(String),

    #[error("Storage error: {0}")]
    Storage(StorageError),
}

pub type OrderResult<T> = Result<T, OrderError>;

impl From<StorageError> for OrderError {
    fn from(err: StorageError) -> Self {
        match err {
            StorageError::OrderNotFound(id) => OrderError::OrderNotFound(id),
            StorageError::OrderExists(id) => OrderError::DuplicateOrder(id),
            StorageError::ItemNotFound(id) => OrderError::ItemNotFound(id),
            StorageError::ItemPaid(id) => OrderError::PaidItemDelete(id),
            other => OrderError::Storage(other),
        }
    }
}

impl From<CatalogError> for OrderError {
    fn from(err: CatalogError) -> Self {
        match err {
            CatalogError::MenuItemNotFound(id) => OrderError::MenuItemNotFound(id),
            CatalogError::TableNotFound(id) => OrderError::TableNotFound(id),
            CatalogError::Backend(msg) => OrderError::CatalogBackend(msg),
        }
    }
}

impl OrderError {
    /// Envelope error classification
    pub fn kind(&self) -> ErrorKind {
        match self {
            OrderError::OrderNotFound(_)
            | OrderError::ItemNotFound(_)
            | OrderError::MenuItemNotFound(_)
            | OrderError::TableNotFound(_) => ErrorKind::NotFound,
            OrderError::DuplicateOrder(_) => ErrorKind::DuplicateIdentifier,
            OrderError::MenuItemUnavailable(_)
            | OrderError::InvalidQuantity(_)
            | OrderError::InvalidTransition(_)
            | OrderError::PaidItemDelete(_)
            | OrderError::InvalidInput(_) => ErrorKind::InvalidInput,
            OrderError::CatalogBackend(_) | OrderError::Storage(_) => {
                ErrorKind::PersistenceFailure
            }
        }
    }

    /// Message safe to hand to end users. Backend failures are logged with
    /// full detail but surfaced generically.
    pub fn public_message(&self) -> String {
        match self {
            OrderError::CatalogBackend(_) | OrderError::Storage(_) => {
                "Internal error, please try again later".to_string()
            }
            other => other.to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn storage_not_found_maps_to_business_error() {
        let err: OrderError = StorageError::OrderNotFound(7).into();
        assert!(matches!(err, OrderError::OrderNotFound(7)));
        assert_eq!(err.kind(), ErrorKind::NotFound);
    }

    #[test]
    fn persistence_failures_hide_internals() {
        let err: OrderError = StorageError::Serialization(
            serde_json::from_str::<i32>("oops").unwrap_err(),
        )
        .into();
        assert_eq!(err.kind(), ErrorKind::PersistenceFailure);
        assert!(!err.public_message().contains("oops"));
    }

    #[test]
    fn duplicate_is_first_class() {
        let err: OrderError = StorageError::OrderExists(1001).into();
        assert_eq!(err.kind(), ErrorKind::DuplicateIdentifier);
    }
}
