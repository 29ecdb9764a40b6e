//! Display
//!
//! Formats normalised prices for presentation. Currency rendering is
//! delegated to `rusty_money`; amounts are rounded to cents at the display
//! boundary only, never inside the core calculations.

use rust_decimal::{Decimal, RoundingStrategy, prelude::FromPrimitive};
use rusty_money::{Money, iso};

use crate::units::{UnitKind, resolve_unit, unit_price};

/// Formats a plain price as a euro amount.
///
/// Returns `None` when the value is not a finite number.
#[must_use]
pub fn format_price(value: f64) -> Option<String> {
    // `from_f64` drops binary excess precision, so 0.995 rounds up to
    // 1.00 instead of surfacing as 0.99499...
    let amount = Decimal::from_f64(value)?
        .round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);

    Some(format!("{}", Money::from_decimal(amount, iso::EUR)))
}

/// Formats a unit price as a euro amount with its dimension suffix.
///
/// Returns `None` when the price is absent or not finite, or when the
/// dimension carries no unit-price suffix.
#[must_use]
pub fn format_unit_price(value: Option<f64>, kind: UnitKind) -> Option<String> {
    let label = kind.label()?;
    let formatted = format_price(value?)?;

    Some(format!("{formatted}{label}"))
}

/// Resolves, computes, and formats a product's unit price in one step.
///
/// The unit is resolved with the name fallback; `None` when no measurable
/// unit price could be determined.
#[must_use]
pub fn unit_price_display(price: f64, unit: Option<&str>, name: Option<&str>) -> Option<String> {
    let resolved = resolve_unit(unit, name)?;

    format_unit_price(unit_price(price, Some(&resolved)), resolved.kind)
}
