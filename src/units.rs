//! Packaging Units
//!
//! Shops describe package sizes as free text ("500g", "1.5L", "6x330ml",
//! "per stuk"). This module normalises those strings to a quantity in
//! kilograms or litres so prices become comparable across package sizes.

use std::sync::LazyLock;

use regex::{Captures, Regex};
use serde::Serialize;

use crate::locale::parse_decimal;

static PIECE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?i)(?:(\d+)\s*x\s*)?\bstuks?\b").expect("valid pattern"));

// The amount must start at a word boundary, so a glued multipack form
// ("6x330ml") is left for the multipack pattern below while a spaced one
// ("6 x 330ml") still resolves here first.
static WEIGHT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?)\s*(kg|gram|g)\b").expect("valid pattern")
});

static VOLUME: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+(?:[.,]\d+)?)\s*(liter|litre|ml|cl|l)\b").expect("valid pattern")
});

static MULTIPACK: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\b(\d+)\s*x\s*(\d+(?:[.,]\d+)?)\s*(kg|gram|g|liter|litre|ml|cl|l)\b")
        .expect("valid pattern")
});

/// The physical dimension a packaging unit normalises to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum UnitKind {
    /// Mass, canonicalised to kilograms.
    #[serde(rename = "kg")]
    Kilogram,

    /// Volume, canonicalised to litres.
    #[serde(rename = "liter")]
    Litre,

    /// A discrete piece ("stuk"), not measurable.
    #[serde(rename = "stuk")]
    Piece,

    /// Packaging text that did not match any known pattern.
    #[serde(rename = "unknown")]
    Unknown,
}

impl UnitKind {
    /// Whether prices in this dimension can be normalised per kg / per L.
    #[must_use]
    pub fn is_measurable(self) -> bool {
        matches!(self, Self::Kilogram | Self::Litre)
    }

    /// Display suffix for a unit price in this dimension.
    #[must_use]
    pub fn label(self) -> Option<&'static str> {
        match self {
            Self::Kilogram => Some("/kg"),
            Self::Litre => Some("/L"),
            Self::Piece | Self::Unknown => None,
        }
    }
}

/// A packaging unit normalised to its canonical quantity.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ParsedUnit {
    /// Quantity in the canonical unit for `kind` (kg or L), never in the
    /// original granularity (g, ml, cl).
    pub quantity: f64,

    /// Physical dimension of the unit.
    pub kind: UnitKind,

    /// The raw unit string as supplied by the catalog.
    pub original: String,
}

/// Parses a free-form packaging-unit string.
///
/// Returns `None` only for absent or empty input; anything else yields at
/// worst an [`UnitKind::Unknown`] unit with the original text preserved.
/// Branches are tried in a fixed precedence order: piece, weight, volume,
/// multipack, unknown.
#[must_use]
pub fn parse_unit(raw: Option<&str>) -> Option<ParsedUnit> {
    let original = raw?.trim();

    if original.is_empty() {
        return None;
    }

    let parsed = piece_unit(original)
        .or_else(|| weight_unit(original))
        .or_else(|| volume_unit(original))
        .or_else(|| multipack_unit(original))
        .unwrap_or_else(|| ParsedUnit {
            quantity: 1.0,
            kind: UnitKind::Unknown,
            original: original.to_string(),
        });

    Some(parsed)
}

/// Price per canonical unit (per kg or per L).
///
/// Returns `None` when no unit was parsed, the unit is not measurable, or
/// the parsed quantity is zero. Never panics.
#[must_use]
pub fn unit_price(price: f64, parsed: Option<&ParsedUnit>) -> Option<f64> {
    let parsed = parsed?;

    if !parsed.kind.is_measurable() || parsed.quantity == 0.0 {
        return None;
    }

    Some(price / parsed.quantity)
}

/// Resolves a product's unit from its structured unit field, falling back
/// to the free-text product name.
///
/// The fallback only activates when the unit field is absent or parses to
/// [`UnitKind::Unknown`], and only measurable (kg / L) results are
/// accepted from the name. An explicit piece unit is respected, and a unit
/// that already parses measurably is never overridden by the name.
#[must_use]
pub fn resolve_unit(unit: Option<&str>, name: Option<&str>) -> Option<ParsedUnit> {
    let primary = parse_unit(unit);

    match primary {
        Some(ref parsed) if parsed.kind != UnitKind::Unknown => primary,
        _ => parse_unit(name)
            .filter(|fallback| fallback.kind.is_measurable())
            .or(primary),
    }
}

fn piece_unit(original: &str) -> Option<ParsedUnit> {
    let caps = PIECE.captures(original)?;

    let quantity = caps
        .get(1)
        .and_then(|count| count.as_str().parse::<f64>().ok())
        .unwrap_or(1.0);

    Some(ParsedUnit {
        quantity,
        kind: UnitKind::Piece,
        original: original.to_string(),
    })
}

fn weight_unit(original: &str) -> Option<ParsedUnit> {
    let caps = WEIGHT.captures(original)?;
    let amount = captured_amount(&caps, 1)?;
    let scale = captured_scale(&caps, 2);

    Some(ParsedUnit {
        quantity: to_kilograms(amount, scale),
        kind: UnitKind::Kilogram,
        original: original.to_string(),
    })
}

fn volume_unit(original: &str) -> Option<ParsedUnit> {
    let caps = VOLUME.captures(original)?;
    let amount = captured_amount(&caps, 1)?;
    let scale = captured_scale(&caps, 2);

    Some(ParsedUnit {
        quantity: to_litres(amount, scale),
        kind: UnitKind::Litre,
        original: original.to_string(),
    })
}

fn multipack_unit(original: &str) -> Option<ParsedUnit> {
    let caps = MULTIPACK.captures(original)?;
    let count = captured_amount(&caps, 1)?;
    let amount = captured_amount(&caps, 2)?;
    let scale = captured_scale(&caps, 3);

    let (quantity, kind) = if is_weight_scale(scale) {
        (count * to_kilograms(amount, scale), UnitKind::Kilogram)
    } else {
        (count * to_litres(amount, scale), UnitKind::Litre)
    };

    Some(ParsedUnit {
        quantity,
        kind,
        original: original.to_string(),
    })
}

/// Scales a weight amount to kilograms. Gram inputs divide by 1000.
fn to_kilograms(amount: f64, scale: &str) -> f64 {
    if scale.eq_ignore_ascii_case("kg") {
        amount
    } else {
        amount / 1000.0
    }
}

/// Scales a volume amount to litres. Millilitres divide by 1000,
/// centilitres by 100.
fn to_litres(amount: f64, scale: &str) -> f64 {
    if scale.eq_ignore_ascii_case("ml") {
        amount / 1000.0
    } else if scale.eq_ignore_ascii_case("cl") {
        amount / 100.0
    } else {
        amount
    }
}

fn is_weight_scale(scale: &str) -> bool {
    scale.eq_ignore_ascii_case("kg")
        || scale.eq_ignore_ascii_case("gram")
        || scale.eq_ignore_ascii_case("g")
}

fn captured_amount(caps: &Captures<'_>, group: usize) -> Option<f64> {
    caps.get(group).and_then(|m| parse_decimal(m.as_str()))
}

fn captured_scale<'c>(caps: &'c Captures<'c>, group: usize) -> &'c str {
    caps.get(group).map_or("", |m| m.as_str())
}
