//! Decimal formatting and parsing for user-facing amounts.

use rust_decimal::prelude::*;

/// Format a USD value with two decimals, e.g. `$500000.00`.
pub fn format_usd(value: Decimal) -> String {
    let rounded = value.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
    format!("${:.2}", rounded)
}

/// Parse a user-entered amount.
///
/// Accepts plain (`"0.5"`) and scientific (`"1e3"`) notation. Returns `None`
/// for anything that is not a finite decimal number; sign is not checked here.
pub fn parse_amount(input: &str) -> Option<Decimal> {
    let trimmed = input.trim();
    if trimmed.is_empty() {
        return None;
    }
    Decimal::from_str(trimmed)
        .or_else(|_| Decimal::from_scientific(trimmed))
        .ok()
}

/// Convert a JSON price into an exact decimal. Non-finite values are rejected.
pub fn price_from_f64(value: f64) -> Option<Decimal> {
    if !value.is_finite() {
        return None;
    }
    Decimal::from_f64(value)
}
