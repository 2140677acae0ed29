//! # Fixed-point amounts
//!
//! Human-facing amounts are decimal strings such as `"12.5"`. On-chain they
//! are 128-bit integers counted in the asset's smallest unit, i.e. the decimal
//! value multiplied by `10^decimals`.
//!
//! Parsing is exact: no floating point is involved, and a fractional part
//! longer than the configured scale is rejected rather than rounded.

use crate::CommonError;

/// Scale used by the reference deployment (same as ether's 18 decimals).
pub const DEFAULT_DECIMALS: u32 = 18;

/// `10^38` is the largest power of ten that fits in an `i128`.
pub const MAX_DECIMALS: u32 = 38;

/// Return `10^decimals`.
pub fn scale_factor(decimals: u32) -> Result<i128, CommonError> {
    if decimals > MAX_DECIMALS {
        return Err(CommonError::InvalidAmount);
    }
    10i128
        .checked_pow(decimals)
        .ok_or(CommonError::AmountOverflow)
}

/// Parse a positive decimal string into base units.
///
/// Accepts `"12"`, `"12.5"`, `"0.000001"` and `".5"`. Surrounding whitespace
/// is ignored.
///
/// # Errors
/// - [`CommonError::InvalidAmount`]: empty, non-numeric, signed, zero, or
///   more fractional digits than `decimals`.
/// - [`CommonError::AmountOverflow`]: the value exceeds `i128::MAX` units.
pub fn parse_units(text: &str, decimals: u32) -> Result<i128, CommonError> {
    let scale = scale_factor(decimals)?;
    let text = text.trim();

    let (whole, frac) = match text.split_once('.') {
        Some((whole, frac)) => (whole, frac),
        None => (text, ""),
    };

    if whole.is_empty() && frac.is_empty() {
        return Err(CommonError::InvalidAmount);
    }
    if !is_digits(whole) || !is_digits(frac) {
        return Err(CommonError::InvalidAmount);
    }
    if frac.len() > decimals as usize {
        return Err(CommonError::InvalidAmount);
    }

    let whole_units = parse_digits(whole)?
        .checked_mul(scale)
        .ok_or(CommonError::AmountOverflow)?;
    let frac_scale = scale_factor(decimals - frac.len() as u32)?;
    let frac_units = parse_digits(frac)?
        .checked_mul(frac_scale)
        .ok_or(CommonError::AmountOverflow)?;

    let units = whole_units
        .checked_add(frac_units)
        .ok_or(CommonError::AmountOverflow)?;
    if units == 0 {
        return Err(CommonError::InvalidAmount);
    }
    Ok(units)
}

/// Render base units as a decimal string, e.g. `12_500_000 @ 6 -> "12.5"`.
///
/// Whole numbers keep a single fractional zero (`"12.0"`).
#[cfg(feature = "std")]
pub fn format_units(units: i128, decimals: u32) -> std::string::String {
    let sign = if units < 0 { "-" } else { "" };
    let digits = units.unsigned_abs().to_string();
    let decimals = decimals.min(MAX_DECIMALS) as usize;
    if decimals == 0 {
        return format!("{sign}{digits}");
    }

    let padded = if digits.len() <= decimals {
        format!("{}{}", "0".repeat(decimals - digits.len() + 1), digits)
    } else {
        digits
    };
    let (whole, frac) = padded.split_at(padded.len() - decimals);
    let frac = frac.trim_end_matches('0');
    let frac = if frac.is_empty() { "0" } else { frac };

    format!("{sign}{whole}.{frac}")
}

fn is_digits(text: &str) -> bool {
    text.bytes().all(|b| b.is_ascii_digit())
}

fn parse_digits(text: &str) -> Result<i128, CommonError> {
    text.bytes().try_fold(0i128, |acc, b| {
        acc.checked_mul(10)
            .and_then(|acc| acc.checked_add(i128::from(b - b'0')))
            .ok_or(CommonError::AmountOverflow)
    })
}

// ── Tests ─────────────────────────────────────────────────────────────────────
