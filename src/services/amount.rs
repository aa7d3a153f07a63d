use regex::Regex;
use std::sync::LazyLock;

use crate::models::RawAmount;

/// Leading decimal number of a text, in the shape `parseFloat` accepts.
static NUMERIC_PREFIX: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[+-]?(?:\d+(?:\.\d*)?|\.\d+)(?:[eE][+-]?\d+)?").expect("valid regex")
});

/// Coerce a raw ledger amount to a non-negative float.
///
/// Numbers are taken as-is, text is read by its leading numeric prefix
/// (`"123.45 INR"` is 123.45). Missing, empty, non-numeric and non-finite input
/// is 0.0. Signed ledgers write expenses as negative numbers, so the magnitude
/// is returned and the transaction type carries the direction.
pub fn parse_amount(raw: &RawAmount) -> f64 {
    match raw {
        RawAmount::Number(n) => sanitize(*n),
        RawAmount::Text(s) => parse_amount_str(s),
        RawAmount::Missing | RawAmount::Other(_) => 0.0,
    }
}

pub fn parse_amount_str(s: &str) -> f64 {
    NUMERIC_PREFIX
        .find(s.trim_start())
        .and_then(|m| m.as_str().parse::<f64>().ok())
        .map(sanitize)
        .unwrap_or(0.0)
}

fn sanitize(n: f64) -> f64 {
    if n.is_finite() {
        n.abs()
    } else {
        0.0
    }
}

/// Round to cents.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0
}
