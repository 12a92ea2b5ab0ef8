// crates/cart-core/src/core/format.rs
// ============================================================================
// Module: Cart Number Formatting
// Description: Display helper for cart amounts.
// Purpose: Render amounts with two decimals and thousands separators.
// Dependencies: bigdecimal
// ============================================================================

//! ## Overview
//! [`format_number`] is a pure display utility. It strips everything that is
//! not a digit or a decimal point, reads the leading decimal number from what
//! remains, rounds half away from zero to two places, and groups the integer
//! part in thousands with `,`.

// ============================================================================
// SECTION: Imports
// ============================================================================

use std::str::FromStr;

use bigdecimal::BigDecimal;
use bigdecimal::RoundingMode;

// ============================================================================
// SECTION: Formatting
// ============================================================================

/// Decimal places rendered by [`format_number`].
const DISPLAY_SCALE: i64 = 2;

/// Formats numeric text for display: `"1234.5"` renders as `"1,234.50"`.
///
/// Empty input is returned unchanged. Input with no leading number after
/// stripping renders as `"0.00"`.
#[must_use]
pub fn format_number(raw: &str) -> String {
    if raw.is_empty() {
        return String::new();
    }
    let kept: String = raw.chars().filter(|ch| ch.is_ascii_digit() || *ch == '.').collect();
    let value = leading_decimal(&kept);
    format_decimal(&value)
}

/// Formats a decimal value with two places and thousands separators.
#[must_use]
pub fn format_decimal(value: &BigDecimal) -> String {
    let rounded = value.with_scale_round(DISPLAY_SCALE, RoundingMode::HalfUp);
    let negative = rounded < BigDecimal::from(0);
    let (digits, _) = rounded.abs().as_bigint_and_exponent();
    let mut magnitude = digits.to_string();
    while magnitude.len() < 3 {
        magnitude.insert(0, '0');
    }
    let split = magnitude.len() - 2;
    let (integer, fraction) = magnitude.split_at(split);
    let mut out = String::with_capacity(magnitude.len() + magnitude.len() / 3 + 2);
    if negative {
        out.push('-');
    }
    out.push_str(&group_thousands(integer));
    out.push('.');
    out.push_str(fraction);
    out
}

/// Parses the longest leading `digits[.digits]` prefix, defaulting to zero.
fn leading_decimal(text: &str) -> BigDecimal {
    let mut end = 0;
    let mut seen_dot = false;
    for (index, ch) in text.char_indices() {
        if ch == '.' {
            if seen_dot {
                break;
            }
            seen_dot = true;
        }
        end = index + ch.len_utf8();
    }
    let prefix = text[..end].trim_end_matches('.');
    if !prefix.chars().any(|ch| ch.is_ascii_digit()) {
        return BigDecimal::from(0);
    }
    let canonical =
        if prefix.starts_with('.') { format!("0{prefix}") } else { prefix.to_string() };
    BigDecimal::from_str(&canonical).unwrap_or_else(|_| BigDecimal::from(0))
}

/// Inserts `,` between groups of three integer digits.
fn group_thousands(integer: &str) -> String {
    let len = integer.len();
    let mut out = String::with_capacity(len + len / 3);
    for (index, ch) in integer.chars().enumerate() {
        if index > 0 && (len - index) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
