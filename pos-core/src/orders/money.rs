//! Money calculation using rust_decimal for precision
//!
//! All arithmetic happens in `Decimal`; stored and serialized amounts are
//! `f64` rounded to 2 decimal places on the way out. Binary floating point
//! is never used for accumulation.

use super::OrderError;
use rust_decimal::prelude::*;
use shared::models::{BillingSnapshot, OrderItem};

/// Rounding for monetary values (2 decimal places, half-up)
const DECIMAL_PLACES: u32 = 2;

/// Maximum allowed unit price
const MAX_PRICE: f64 = 1_000_000.0;
/// Maximum allowed quantity per line item
const MAX_QUANTITY: i32 = 9999;

/// Convert f64 to Decimal for calculation
#[inline]
pub fn to_decimal(value: f64) -> Decimal {
    Decimal::from_f64(value).unwrap_or_default()
}

/// Convert Decimal back to f64 for storage, rounded to 2 decimal places
#[inline]
pub fn to_f64(value: Decimal) -> f64 {
    value
        .round_dp_with_strategy(DECIMAL_PLACES, RoundingStrategy::MidpointAwayFromZero)
        .to_f64()
        .unwrap_or_default()
}

/// Validate a unit price coming from the catalog
fn require_valid_price(price: f64) -> Result<(), OrderError> {
    if !price.is_finite() {
        return Err(OrderError::InvalidInput(format!(
            "price must be a finite number, got {price}"
        )));
    }
    if price < 0.0 {
        return Err(OrderError::InvalidInput(format!(
            "price must be non-negative, got {price}"
        )));
    }
    if price > MAX_PRICE {
        return Err(OrderError::InvalidInput(format!(
            "price exceeds maximum allowed ({MAX_PRICE}), got {price}"
        )));
    }
    Ok(())
}

/// Validate a line item quantity
pub fn require_valid_quantity(quantity: i32) -> Result<(), OrderError> {
    if quantity <= 0 {
        return Err(OrderError::InvalidQuantity(quantity));
    }
    if quantity > MAX_QUANTITY {
        return Err(OrderError::InvalidInput(format!(
            "quantity exceeds maximum allowed ({MAX_QUANTITY}), got {quantity}"
        )));
    }
    Ok(())
}

/// Line amount = unit price × quantity. The sole authority for deriving
/// stored amounts; callers never supply them.
pub fn line_amount(unit_price: f64, quantity: i32) -> Result<Decimal, OrderError> {
    require_valid_price(unit_price)?;
    require_valid_quantity(quantity)?;
    Ok(to_decimal(unit_price) * Decimal::from(quantity))
}

/// Sum of stored line amounts
pub fn subtotal(items: &[OrderItem]) -> Decimal {
    items.iter().map(|item| to_decimal(item.amount)).sum()
}

/// Tax on a subtotal at the given fractional rate
pub fn tax(subtotal: Decimal, rate: Decimal) -> Decimal {
    subtotal * rate
}

/// Subtotal plus tax; zero for an empty item set
pub fn grand_total(items: &[OrderItem], rate: Decimal) -> Decimal {
    let sub = subtotal(items);
    sub + tax(sub, rate)
}

/// Catalog display price after percentage discount, clamped at zero
pub fn discounted_price(base_price: f64, discount_percent: f64) -> Result<Decimal, OrderError> {
    require_valid_price(base_price)?;
    if !discount_percent.is_finite() || discount_percent < 0.0 {
        return Err(OrderError::InvalidInput(format!(
            "discount must be a non-negative number, got {discount_percent}"
        )));
    }
    let base = to_decimal(base_price);
    let factor = Decimal::ONE - to_decimal(discount_percent) / Decimal::ONE_HUNDRED;
    Ok((base * factor).max(Decimal::ZERO))
}

/// Display-rounded totals for one order's items
pub fn billing_snapshot(items: &[OrderItem], rate: Decimal) -> BillingSnapshot {
    let sub = subtotal(items);
    let tax = tax(sub, rate);
    BillingSnapshot {
        subtotal: to_f64(sub),
        tax: to_f64(tax),
        total: to_f64(sub + tax),
    }
}
