//! Core configuration and policy toggles
//!
//! The observed system left several product decisions open (cascade on
//! order delete, guarding paid items, terminal statuses). They are plain
//! config fields here rather than hardcoded guesses.

use rust_decimal::Decimal;

/// Default tax rate: 10%
pub const DEFAULT_TAX_RATE: Decimal = Decimal::from_parts(10, 0, 0, false, 2);

#[derive(Debug, Clone)]
pub struct PosConfig {
    /// Tax rate applied to the subtotal (fraction, e.g. 0.10)
    pub tax_rate: Decimal,
    /// Enforce the recommended status discipline
    /// (`Pending → Preparing → Completed`, terminal states frozen).
    /// Off reproduces the legacy behavior where any edit is accepted.
    pub enforce_status_discipline: bool,
    /// Delete an order's line items together with the order
    pub cascade_delete_items: bool,
    /// Refuse to delete a line item that is already paid
    pub guard_paid_item_delete: bool,
}

impl Default for PosConfig {
    fn default() -> Self {
        Self {
            tax_rate: DEFAULT_TAX_RATE,
            enforce_status_discipline: true,
            // both observed behaviors, kept until the product decides otherwise
            cascade_delete_items: false,
            guard_paid_item_delete: false,
        }
    }
}

impl PosConfig {
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            tax_rate: std::env::var("POS_TAX_RATE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.tax_rate),
            enforce_status_discipline: std::env::var("POS_ENFORCE_STATUS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.enforce_status_discipline),
            cascade_delete_items: std::env::var("POS_CASCADE_DELETE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.cascade_delete_items),
            guard_paid_item_delete: std::env::var("POS_GUARD_PAID_DELETE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(defaults.guard_paid_item_delete),
        }
    }

    /// Legacy-compatible profile: no status discipline, no guards
    pub fn lenient() -> Self {
        Self {
            enforce_status_discipline: false,
            cascade_delete_items: false,
            guard_paid_item_delete: false,
            ..Self::default()
        }
    }
}
