//! Value normalization for raw ledger cells.
//!
//! Every function here is total: dirty input degrades to an empty string
//! or zero instead of failing, so grouping and totals never abort on a
//! malformed cell.

use std::str::FromStr;

use rust_decimal::Decimal;

use super::types::RawValue;

/// Largest float magnitude that is still printed as an integer.
const INTEGRAL_PRINT_LIMIT: f64 = 1e15;

/// Normalize a cell to trimmed text.
///
/// Integral floats print without a fraction (`959168.0` → `"959168"`),
/// replacement and control characters (except line breaks and tabs) are dropped.
pub fn text(value: &RawValue) -> String {
    match value {
        RawValue::Empty => String::new(),
        RawValue::Text(s) => clean_text(s),
        RawValue::Number(n) => number_text(*n),
        RawValue::Int(n) => n.to_string(),
        RawValue::Bool(b) => if *b { "TRUE" } else { "FALSE" }.to_string(),
    }
}

/// Decode bytes of unknown encoding into trimmed text, dropping what does not decode.
pub fn text_from_bytes(bytes: &[u8]) -> String {
    clean_text(&String::from_utf8_lossy(bytes))
}

/// Strip surrounding whitespace and drop characters that cannot be represented.
pub fn clean_text(s: &str) -> String {
    s.chars()
        .filter(|c| *c != char::REPLACEMENT_CHARACTER)
        .filter(|c| !c.is_control() || matches!(c, '\n' | '\r' | '\t'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn number_text(n: f64) -> String {
    if !n.is_finite() {
        return String::new();
    }
    if n.fract() == 0.0 && n.abs() < INTEGRAL_PRINT_LIMIT {
        format!("{}", n as i64)
    } else {
        format!("{n}")
    }
}

/// Normalize a cell to a decimal amount. Anything unparsable becomes zero.
///
/// No rounding is applied.
pub fn amount(value: &RawValue) -> Decimal {
    match value {
        RawValue::Number(n) if n.is_finite() => parse_decimal(&format!("{n}")),
        RawValue::Int(n) => Decimal::from(*n),
        RawValue::Text(s) => parse_decimal(s),
        _ => Decimal::ZERO,
    }
}

fn parse_decimal(s: &str) -> Decimal {
    let s = s.trim();
    Decimal::from_str(s)
        .or_else(|_| Decimal::from_scientific(s))
        .unwrap_or(Decimal::ZERO)
}

/// Reduce an identifier to its digits.
///
/// `"0959-168 "` → `"0959168"`. A number written with an all-zero fraction
/// (`"959168.0"`) is truncated to its integer part before the digits are taken.
pub fn digits_only(value: &str) -> String {
    let trimmed = value.trim();
    let integral = match trimmed.split_once('.') {
        Some((int, frac))
            if !int.is_empty()
                && int.chars().all(|c| c.is_ascii_digit())
                && !frac.is_empty()
                && frac.chars().all(|c| c == '0') =>
        {
            int
        }
        _ => trimmed,
    };
    integral.chars().filter(|c| c.is_ascii_digit()).collect()
}

/// Comparison key for reference numbers: digits only, leading zeros dropped.
///
/// `"0959-168"`, `"959168"` and `959168.0` share the key `"959168"`.
/// An all-zero reference keeps a single `"0"`; empty input stays empty.
pub fn reference_key(value: &str) -> String {
    let digits = digits_only(value);
    if digits.is_empty() {
        return digits;
    }
    let stripped = digits.trim_start_matches('0');
    if stripped.is_empty() {
        "0".to_string()
    } else {
        stripped.to_string()
    }
}

/// Comparison key for creditor names: trimmed, inner whitespace collapsed, lowercased.
pub fn name_key(value: &str) -> String {
    clean_text(value)
        .split_whitespace()
        .collect::<Vec<_>>()
        .join(" ")
        .to_lowercase()
}
