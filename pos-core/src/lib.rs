//! Order lifecycle and billing core
//!
//! The business core behind a restaurant POS API: order state machine,
//! line-item ledger, decimal billing math, unpaid-orders aggregation, and
//! the command gateway the API layer calls into.
//!
//! # Architecture
//!
//! ```text
//! AuthContext + command
//!        │
//!        ▼
//!   OrderGateway ──► OrderService ────┐
//!        │      ──► LineItemLedger ───┤──► OrderStore (redb, one write
//!        │                            │    txn per command)
//!        │          CatalogReader ◄───┘    (prices, tables; read-only)
//!        ▼
//!   Envelope { type, message, content }
//! ```
//!
//! Reads (`get_unpaid_orders`, billing snapshots) run against a single redb
//! read transaction, so they see a consistent snapshot of orders and items.

pub mod catalog;
pub mod config;
pub mod gateway;
pub mod logging;
pub mod orders;
pub mod store;

// Re-exports
pub use catalog::{CatalogError, CatalogReader, MemoryCatalog};
pub use config::PosConfig;
pub use gateway::OrderGateway;
pub use orders::{LineItemLedger, OrderError, OrderResult, OrderService};
pub use store::{OrderStore, StorageError};
