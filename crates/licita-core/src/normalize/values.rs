use rust_decimal::Decimal;
use std::str::FromStr;

/// Parse a quantity cell into a non-negative decimal.
///
/// Handles formats like:
/// - "12" -> 12
/// - " 2.5 " -> 2.5
/// - "+3" -> 3
/// - "1e3" -> 1000
///
/// Returns `None` for empty cells, text markers such as "N/D" or "S/C",
/// comma separated numbers and negative values.
pub fn parse_quantity(s: &str) -> Option<Decimal> {
    let s = s.trim();
    let s = s.strip_prefix('+').unwrap_or(s);

    if s.is_empty() || s.contains(',') {
        return None;
    }

    let value = if s.contains(['e', 'E']) {
        Decimal::from_scientific(s).ok()?
    } else {
        Decimal::from_str(s).ok()?
    };

    if value.is_sign_negative() && !value.is_zero() {
        return None;
    }

    Some(value.normalize())
}
