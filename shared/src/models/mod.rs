//! Data models
//!
//! Field names follow the legacy wire contract (`order_id`, `orderitem_id`,
//! `is_paid`, ...) so existing clients keep working.

pub mod dining_table;
pub mod menu;
pub mod order;
pub mod order_item;

pub use dining_table::DiningTable;
pub use menu::MenuItem;
pub use order::{Order, OrderCreate, OrderStatus, OrderUpdate};
pub use order_item::{BillingSnapshot, OrderItem, OrderItemCreate, OrderItemUpdate, UnpaidOrder};
