//! Bonus Mechanisms
//!
//! Grocery catalogs describe promotions as free-text Dutch marketing
//! strings ("1 + 1 gratis", "2e Halve Prijs", "25% korting"). This module
//! recognises the known mechanisms and prices them against a shelf price.

use std::{str::FromStr, sync::LazyLock};

use decimal_percentage::Percentage;
use regex::{Captures, Regex};
use rust_decimal::{Decimal, prelude::ToPrimitive};
use serde::Serialize;
use thiserror::Error;

use crate::locale::parse_decimal;

static MULTI_BUY_FREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^(\d+)\s*\+\s*(\d+)\s+gratis$").expect("valid pattern"));

static SECOND_HALF_PRICE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^2e\s+halve\s+prijs$").expect("valid pattern"));

static SECOND_FREE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^2e\s+gratis$").expect("valid pattern"));

static COUNT_FOR_AMOUNT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+)\s+voor\s+(\d+(?:[.,]\d+)?)$").expect("valid pattern")
});

static FOR_AMOUNT: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)^voor\s+(\d+(?:[.,]\d+)?)$").expect("valid pattern"));

static PERCENT_OFF: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)\s*%\s+korting$").expect("valid pattern")
});

static VOLUME_ADVANTAGE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)^(\d+(?:[.,]\d+)?)\s*%\s+volume\s*voordeel$").expect("valid pattern")
});

/// Errors from parsing a bonus mechanism string.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum MechanismError {
    /// The string is not one of the recognised promotion patterns.
    #[error("unrecognised bonus mechanism: {0:?}")]
    Unrecognised(String),

    /// A matched item count does not fit the supported quantity range.
    #[error("count out of range in bonus mechanism: {0:?}")]
    CountOutOfRange(String),
}

/// A recognised promotional pricing scheme.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum BonusMechanism {
    /// "N + M gratis": pay for N items, receive N + M.
    MultiBuyFree {
        /// Items paid at the shelf price.
        paid: u32,

        /// Items received for free.
        free: u32,
    },

    /// "2e Halve Prijs": second item at half the shelf price.
    SecondHalfPrice,

    /// "2e Gratis": second item free.
    SecondFree,

    /// "N voor X,XX": a fixed total for a fixed count of items.
    CountForAmount {
        /// Number of items covered by the amount.
        count: u32,

        /// Total paid for `count` items.
        total: f64,
    },

    /// "voor X,XX": a single item at a promotional amount.
    ForAmount {
        /// Promotional price for one item.
        total: f64,
    },

    /// "P% korting": a percentage off the shelf price.
    PercentOff(Percentage),

    /// "P% volume voordeel": a volume-advantage percentage off.
    VolumeAdvantage(Percentage),
}

impl FromStr for BonusMechanism {
    type Err = MechanismError;

    /// Patterns are tried in a fixed order on the trimmed input; the first
    /// match wins. The patterns are anchored, so they are mutually
    /// exclusive by construction.
    fn from_str(raw: &str) -> Result<Self, Self::Err> {
        let mechanism = raw.trim();

        if let Some(caps) = MULTI_BUY_FREE.captures(mechanism) {
            let paid = captured_count(&caps, 1, raw)?;
            let free = captured_count(&caps, 2, raw)?;

            return Ok(Self::MultiBuyFree { paid, free });
        }

        if SECOND_HALF_PRICE.is_match(mechanism) {
            return Ok(Self::SecondHalfPrice);
        }

        if SECOND_FREE.is_match(mechanism) {
            return Ok(Self::SecondFree);
        }

        if let Some(caps) = COUNT_FOR_AMOUNT.captures(mechanism) {
            let count = captured_count(&caps, 1, raw)?;

            if let Some(total) = captured_decimal(&caps, 2) {
                return Ok(Self::CountForAmount { count, total });
            }
        }

        if let Some(caps) = FOR_AMOUNT.captures(mechanism)
            && let Some(total) = captured_decimal(&caps, 1)
        {
            return Ok(Self::ForAmount { total });
        }

        if let Some(caps) = PERCENT_OFF.captures(mechanism)
            && let Some(percent) = captured_decimal(&caps, 1)
        {
            return Ok(Self::PercentOff(Percentage::from(percent / 100.0)));
        }

        if let Some(caps) = VOLUME_ADVANTAGE.captures(mechanism)
            && let Some(percent) = captured_decimal(&caps, 1)
        {
            return Ok(Self::VolumeAdvantage(Percentage::from(percent / 100.0)));
        }

        Err(MechanismError::Unrecognised(raw.to_string()))
    }
}

impl BonusMechanism {
    /// Prices this mechanism against a shelf price.
    ///
    /// The shelf price is the regular single-item price; supplying a
    /// positive, finite value is the caller's responsibility.
    #[must_use]
    pub fn deal(&self, shelf_price: f64) -> BonusDeal {
        match *self {
            Self::MultiBuyFree { paid, free } => quantity_deal(
                paid.saturating_add(free),
                shelf_price * f64::from(paid),
                shelf_price,
            ),
            Self::SecondHalfPrice => quantity_deal(2, shelf_price * 1.5, shelf_price),
            Self::SecondFree => quantity_deal(2, shelf_price, shelf_price),
            Self::CountForAmount { count, total } => quantity_deal(count, total, shelf_price),
            Self::ForAmount { total } => quantity_deal(1, total, shelf_price),
            Self::PercentOff(percent) | Self::VolumeAdvantage(percent) => {
                percent_deal(percent, shelf_price)
            }
        }
    }
}

/// The effective pricing of a bonus mechanism against a shelf price.
#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct BonusDeal {
    /// Effective price per single item.
    pub unit_price: f64,

    /// Number of items bought to obtain the deal.
    pub quantity: u32,

    /// Total paid for `quantity` items.
    pub total_price: f64,

    /// Savings relative to the shelf price, in percent points.
    pub savings_percent: f64,
}

/// Prices a promotional mechanism string against a shelf price.
///
/// Returns `None` when the mechanism is not one of the recognised
/// patterns, including the empty string. Never panics for any
/// string/number input.
#[must_use]
pub fn calculate_bonus_deal(mechanism: &str, shelf_price: f64) -> Option<BonusDeal> {
    mechanism
        .parse::<BonusMechanism>()
        .ok()
        .map(|mechanism| mechanism.deal(shelf_price))
}

/// Deal for mechanisms where savings follow from the effective unit price.
fn quantity_deal(quantity: u32, total_price: f64, shelf_price: f64) -> BonusDeal {
    let unit_price = total_price / f64::from(quantity);

    BonusDeal {
        unit_price,
        quantity,
        total_price,
        savings_percent: (1.0 - unit_price / shelf_price) * 100.0,
    }
}

/// Deal for percentage mechanisms. The advertised percentage is reported
/// verbatim rather than recomputed from the unit price.
fn percent_deal(percent: Percentage, shelf_price: f64) -> BonusDeal {
    let fraction = (percent * Decimal::ONE).to_f64().unwrap_or(0.0);
    let unit_price = shelf_price * (1.0 - fraction);

    BonusDeal {
        unit_price,
        quantity: 1,
        total_price: unit_price,
        savings_percent: fraction * 100.0,
    }
}

fn captured_count(caps: &Captures<'_>, group: usize, raw: &str) -> Result<u32, MechanismError> {
    caps.get(group)
        .and_then(|count| count.as_str().parse::<u32>().ok())
        .ok_or_else(|| MechanismError::CountOutOfRange(raw.to_string()))
}

fn captured_decimal(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group).and_then(|m| parse_decimal(m.as_str()))
}

#[cfg(test)]
mod tests {
    use testresult::TestResult;

    use super::*;

    fn approx(left: f64, right: f64) -> bool {
        (left - right).abs() < 1e-6
    }

    #[test]
    fn parses_multi_buy_free() -> TestResult {
        assert_eq!(
            "1 + 1 gratis".parse::<BonusMechanism>()?,
            BonusMechanism::MultiBuyFree { paid: 1, free: 1 }
        );

        assert_eq!(
            "3+1 gratis".parse::<BonusMechanism>()?,
            BonusMechanism::MultiBuyFree { paid: 3, free: 1 }
        );

        Ok(())
    }

    #[test]
    fn parses_positional_mechanisms_case_insensitively() -> TestResult {
        assert_eq!(
            "2e Halve Prijs".parse::<BonusMechanism>()?,
            BonusMechanism::SecondHalfPrice
        );

        assert_eq!(
            "2E HALVE PRIJS".parse::<BonusMechanism>()?,
            BonusMechanism::SecondHalfPrice
        );

        assert_eq!(
            "2e Gratis".parse::<BonusMechanism>()?,
            BonusMechanism::SecondFree
        );

        Ok(())
    }

    #[test]
    fn parses_amount_mechanisms_with_comma_decimals() -> TestResult {
        assert_eq!(
            "2 VOOR 4,50".parse::<BonusMechanism>()?,
            BonusMechanism::CountForAmount {
                count: 2,
                total: 4.5
            }
        );

        assert_eq!(
            "voor 1.99".parse::<BonusMechanism>()?,
            BonusMechanism::ForAmount { total: 1.99 }
        );

        Ok(())
    }

    #[test]
    fn parses_percentage_mechanisms() -> TestResult {
        assert_eq!(
            "25% korting".parse::<BonusMechanism>()?,
            BonusMechanism::PercentOff(Percentage::from(0.25))
        );

        assert_eq!(
            "10% volume voordeel".parse::<BonusMechanism>()?,
            BonusMechanism::VolumeAdvantage(Percentage::from(0.10))
        );

        assert_eq!(
            "10% volumevoordeel".parse::<BonusMechanism>()?,
            BonusMechanism::VolumeAdvantage(Percentage::from(0.10))
        );

        Ok(())
    }

    #[test]
    fn trims_surrounding_whitespace() -> TestResult {
        assert_eq!(
            "  2e gratis  ".parse::<BonusMechanism>()?,
            BonusMechanism::SecondFree
        );

        Ok(())
    }

    #[test]
    fn rejects_unrecognised_mechanisms() {
        for raw in ["", "gratis bezorging", "2e artikel", "op=op", "voor jou"] {
            assert!(
                matches!(
                    raw.parse::<BonusMechanism>(),
                    Err(MechanismError::Unrecognised(_))
                ),
                "expected {raw:?} to be unrecognised"
            );
        }
    }

    #[test]
    fn rejects_counts_that_overflow() {
        let raw = "99999999999 + 1 gratis";

        assert!(matches!(
            raw.parse::<BonusMechanism>(),
            Err(MechanismError::CountOutOfRange(_))
        ));
    }

    #[test]
    fn one_plus_one_gratis_halves_the_price() -> TestResult {
        let deal = calculate_bonus_deal("1 + 1 gratis", 1.99).ok_or("expected deal")?;

        assert_eq!(deal.quantity, 2);
        assert!(approx(deal.total_price, 1.99));
        assert!(approx(deal.unit_price, 0.995));
        assert!(approx(deal.savings_percent, 50.0));

        Ok(())
    }

    #[test]
    fn second_half_price_saves_a_quarter() -> TestResult {
        let deal = calculate_bonus_deal("2e Halve Prijs", 11.99).ok_or("expected deal")?;

        assert_eq!(deal.quantity, 2);
        assert!(approx(deal.total_price, 17.985));
        assert!(approx(deal.unit_price, 8.9925));
        assert!(approx(deal.savings_percent, 25.0));

        Ok(())
    }

    #[test]
    fn percent_off_reports_the_advertised_percentage() -> TestResult {
        let deal = calculate_bonus_deal("25% korting", 17.99).ok_or("expected deal")?;

        assert_eq!(deal.quantity, 1);
        assert!(approx(deal.unit_price, 13.4925));
        assert!(approx(deal.savings_percent, 25.0));

        Ok(())
    }

    #[test]
    fn fractional_percentages_are_supported() -> TestResult {
        let deal = calculate_bonus_deal("12.5% korting", 10.0).ok_or("expected deal")?;

        assert!(approx(deal.unit_price, 8.75));
        assert!(approx(deal.savings_percent, 12.5));

        Ok(())
    }

    #[test]
    fn count_for_amount_divides_the_total() -> TestResult {
        let deal = calculate_bonus_deal("3 voor 5,00", 2.49).ok_or("expected deal")?;

        assert_eq!(deal.quantity, 3);
        assert!(approx(deal.total_price, 5.0));
        assert!(approx(deal.unit_price, 5.0 / 3.0));

        Ok(())
    }

    #[test]
    fn unit_price_times_quantity_equals_total_for_all_mechanisms() -> TestResult {
        let mechanisms = [
            "1 + 1 gratis",
            "3 + 1 gratis",
            "2e Halve Prijs",
            "2e Gratis",
            "2 voor 4,50",
            "voor 0,89",
            "25% korting",
            "10% volume voordeel",
        ];

        for mechanism in mechanisms {
            let deal = calculate_bonus_deal(mechanism, 2.39)
                .ok_or_else(|| format!("expected deal for {mechanism:?}"))?;

            assert!(
                approx(deal.unit_price * f64::from(deal.quantity), deal.total_price),
                "invariant violated for {mechanism:?}"
            );
        }

        Ok(())
    }

    #[test]
    fn unrecognised_mechanisms_yield_no_deal() {
        assert_eq!(calculate_bonus_deal("", 1.99), None);
        assert_eq!(calculate_bonus_deal("nu extra voordelig", 1.99), None);
    }
}
