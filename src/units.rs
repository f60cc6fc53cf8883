//! Conversions between human token amounts and smallest-unit integers.
//!
//! Scaling is done by `alloy_primitives::utils`; this module adds the
//! validation and display policy a swap screen needs on top of it.

use crate::error::InputError;
use crate::token::check_decimals;
use alloy_primitives::utils::{self, Unit};
use alloy_primitives::U256;

#[inline]
fn exp10(exp: u8) -> Option<U256> {
    Unit::new(exp).map(|unit| unit.wei())
}

/// Parses a human amount such as `"1.5"` into smallest units for a token
/// with `decimals` decimals (`1.5` WETH becomes `1500000000000000000`).
///
/// More fractional digits than the token has is an error rather than a
/// silent truncation.
pub fn parse_units(text: &str, decimals: u8) -> Result<U256, InputError> {
    check_decimals(decimals)?;
    let malformed = || InputError::MalformedAmount(text.to_string());

    let trimmed = text.trim();
    let (whole, fraction) = trimmed.split_once('.').unwrap_or((trimmed, ""));
    let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());

    // signs, exponents and separators are rejected here; alloy would
    // otherwise return a signed value or truncate the fraction
    if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction) {
        return Err(malformed());
    }
    if fraction.len() > decimals as usize {
        return Err(malformed());
    }

    utils::parse_units(trimmed, decimals)
        .map(<U256 as From<utils::ParseUnits>>::from)
        .map_err(|_| malformed())
}

/// Exact human rendering of a smallest-unit amount: trailing zeros trimmed,
/// at least one fractional digit (`1000000` at 6 decimals is `"1.0"`).
pub fn format_units(amount: U256, decimals: u8) -> Result<String, InputError> {
    check_decimals(decimals)?;

    let full = utils::format_units(amount, decimals)
        .map_err(|_| InputError::MalformedAmount(amount.to_string()))?;
    let (whole, fraction) = full.split_once('.').unwrap_or((full.as_str(), ""));
    let fraction = fraction.trim_end_matches('0');

    Ok(format!(
        "{}.{}",
        whole,
        if fraction.is_empty() { "0" } else { fraction }
    ))
}

/// Rounds a smallest-unit amount half up to `places` fractional digits,
/// the way balances and quotes are shown (`2` places for USDC, `4` for
/// 18-decimal tokens).
pub fn format_units_fixed(amount: U256, decimals: u8, places: u8) -> Result<String, InputError> {
    check_decimals(decimals)?;
    let overflow = || InputError::MalformedAmount(amount.to_string());

    let scaled = if places >= decimals {
        exp10(places - decimals)
            .and_then(|factor| amount.checked_mul(factor))
            .ok_or_else(overflow)?
    } else {
        let divisor = exp10(decimals - places).ok_or_else(overflow)?;
        let (quotient, remainder) = amount.div_rem(divisor);
        if remainder * U256::from(2u8) >= divisor {
            quotient + U256::ONE
        } else {
            quotient
        }
    };

    if places == 0 {
        return Ok(scaled.to_string());
    }

    utils::format_units(scaled, places).map_err(|_| overflow())
}
