//! Order line item model and derived billing shapes

use serde::{Deserialize, Serialize};

/// One menu item × quantity entry within an order
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    pub orderitem_id: i64,
    pub order_id: i64,
    pub menu_id: i64,
    /// Always > 0
    pub quantity: i32,
    /// Line amount in currency units, set by the billing calculator at the
    /// time of the last write; never recomputed on read
    pub amount: f64,
    pub is_paid: bool,
}

/// Create payload (mirrors `AddOrderItemInput`)
///
/// `amount` is accepted for wire compatibility but the calculator is the
/// sole authority: the stored amount is always derived from the catalog
/// price at write time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OrderItemCreate {
    pub order_id: i64,
    pub menu_id: i64,
    pub quantity: i32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
}

/// Edit payload (mirrors `EditOrderItemInput`; absent field = no change)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct OrderItemUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub order_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub menu_id: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i32>,
    /// Ignored on writes, see `OrderItemCreate::amount`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub is_paid: Option<bool>,
}

/// Derived totals for one order; computed on demand, never persisted
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct BillingSnapshot {
    pub subtotal: f64,
    pub tax: f64,
    pub total: f64,
}

/// Outstanding balance of one order (unpaid line items only)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnpaidOrder {
    pub order_id: i64,
    pub table_id: i64,
    pub total_amount: f64,
}
