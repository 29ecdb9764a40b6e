//! Locale
//!
//! Dutch catalog feeds mix comma and dot decimal separators. Both the
//! mechanism and unit parsers normalise numbers through this one helper so
//! their parsing behaviour cannot diverge.

/// Parses a decimal number that may use a comma as the decimal separator.
///
/// Returns `None` for anything that does not parse to a finite number.
#[must_use]
pub fn parse_decimal(raw: &str) -> Option<f64> {
    let normalised = raw.trim().replace(',', ".");

    normalised
        .parse::<f64>()
        .ok()
        .filter(|value| value.is_finite())
}
