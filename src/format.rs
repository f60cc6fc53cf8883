//! Display policy for exchange rates.
//!
//! Rates inside `[1e-4, 1e6]` print as fixed point with four fractional
//! digits and `,` thousands grouping (`2,000.0403`). Anything outside that
//! window prints in normalized scientific form with a four digit mantissa
//! fraction (`1.0000e-12`), so very small rates never show up as a misleading
//! run of zeros. Rounding is half up on the exact value.

use crate::error::MathError;
use crate::math::math_helpers::{div_round_half_up, pow10};
use crate::rate::ExchangeRate;
use crate::U1024;

/// Fractional digits shown in both fixed and scientific form.
pub const DISPLAY_PRECISION: u32 = 4;
/// Rates above this switch to scientific notation.
pub const SCIENTIFIC_ABOVE_EXP10: u32 = 6;
/// Rates below `10^-SCIENTIFIC_BELOW_EXP10` switch to scientific notation.
pub const SCIENTIFIC_BELOW_EXP10: u32 = 4;

/// Formats a rate according to the display policy.
pub fn format_rate(rate: &ExchangeRate) -> Result<String, MathError> {
    let numerator = rate.numerator();
    let denominator = rate.denominator();

    let above = numerator > denominator * pow10(SCIENTIFIC_ABOVE_EXP10);
    let below = numerator * pow10(SCIENTIFIC_BELOW_EXP10) < denominator;

    if above || below {
        format_scientific(numerator, denominator)
    } else {
        format_fixed(numerator, denominator)
    }
}

/// `1,234.5678` style, `DISPLAY_PRECISION` fractional digits.
fn format_fixed(numerator: U1024, denominator: U1024) -> Result<String, MathError> {
    let unit = pow10(DISPLAY_PRECISION);
    let scaled = div_round_half_up(
        numerator.checked_mul(unit).ok_or(MathError::Overflow)?,
        denominator,
    )?;
    let (whole, fraction) = scaled.div_rem(unit);

    Ok(format!(
        "{}.{:0>width$}",
        group_thousands(&whole.to_string()),
        fraction.to_string(),
        width = DISPLAY_PRECISION as usize
    ))
}

/// `1.2346e+6` style, matching what JavaScript's `toExponential(4)` prints.
fn format_scientific(numerator: U1024, denominator: U1024) -> Result<String, MathError> {
    let mut exponent = decimal_exponent(numerator, denominator)?;

    let shift = i64::from(DISPLAY_PRECISION) - exponent;
    let mut mantissa = if shift >= 0 {
        div_round_half_up(
            numerator
                .checked_mul(pow10(shift as u32))
                .ok_or(MathError::Overflow)?,
            denominator,
        )?
    } else {
        div_round_half_up(
            numerator,
            denominator
                .checked_mul(pow10((-shift) as u32))
                .ok_or(MathError::Overflow)?,
        )?
    };

    // 9.99995 rounds up to 10.0000
    let unit = pow10(DISPLAY_PRECISION);
    if mantissa >= unit * U1024::from(10u8) {
        mantissa /= U1024::from(10u8);
        exponent += 1;
    }

    let (whole, fraction) = mantissa.div_rem(unit);
    let sign = if exponent >= 0 { '+' } else { '-' };

    Ok(format!(
        "{}.{:0>width$}e{}{}",
        whole,
        fraction.to_string(),
        sign,
        exponent.unsigned_abs(),
        width = DISPLAY_PRECISION as usize
    ))
}

/// `floor(log10(numerator / denominator))` for a positive ratio.
fn decimal_exponent(numerator: U1024, denominator: U1024) -> Result<i64, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let whole = numerator / denominator;
    if !whole.is_zero() {
        return Ok(whole.to_string().len() as i64 - 1);
    }

    let ten = U1024::from(10u8);
    let mut scaled = numerator;
    let mut exponent = 0i64;
    while scaled < denominator {
        scaled = scaled.checked_mul(ten).ok_or(MathError::Overflow)?;
        exponent -= 1;
    }
    Ok(exponent)
}

/// Inserts `,` between groups of three digits.
pub fn group_thousands(digits: &str) -> String {
    let mut grouped = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(ch);
    }
    grouped
}

#[cfg(test)]
mod tests {
    use super::*;

    fn rate(text: &str) -> ExchangeRate {
        text.parse().unwrap()
    }

    #[test]
    fn fixed_point_inside_window() {
        assert_eq!(format_rate(&rate("1")).unwrap(), "1.0000");
        assert_eq!(format_rate(&rate("123456.789")).unwrap(), "123,456.7890");
        assert_eq!(format_rate(&rate("999999.999")).unwrap(), "999,999.9990");
        assert_eq!(format_rate(&rate("0.5")).unwrap(), "0.5000");
    }

    #[test]
    fn window_edges_stay_fixed_point() {
        assert_eq!(format_rate(&rate("1000000")).unwrap(), "1,000,000.0000");
        assert_eq!(format_rate(&rate("0.0001")).unwrap(), "0.0001");
    }

    #[test]
    fn scientific_outside_window() {
        assert_eq!(format_rate(&rate("1234567.891")).unwrap(), "1.2346e+6");
        assert_eq!(format_rate(&rate("0.000099999")).unwrap(), "9.9999e-5");
        assert_eq!(format_rate(&rate("1e12")).unwrap(), "1.0000e+12");
        assert_eq!(format_rate(&rate("1e-12")).unwrap(), "1.0000e-12");
        assert_eq!(format_rate(&rate("0.00000999995")).unwrap(), "1.0000e-5");
    }

    #[test]
    fn scientific_mantissa_carries_into_exponent() {
        assert_eq!(format_rate(&rate("99999500")).unwrap(), "1.0000e+8");
        assert_eq!(format_rate(&rate("99999499")).unwrap(), "9.9999e+7");
    }

    #[test]
    fn fixed_point_rounds_half_up() {
        assert_eq!(format_rate(&rate("1.00005")).unwrap(), "1.0001");
        assert_eq!(format_rate(&rate("1.000049")).unwrap(), "1.0000");
        assert_eq!(format_rate(&rate("999.99995")).unwrap(), "1,000.0000");
    }

    #[test]
    fn groups_thousands() {
        assert_eq!(group_thousands("0"), "0");
        assert_eq!(group_thousands("999"), "999");
        assert_eq!(group_thousands("1000"), "1,000");
        assert_eq!(group_thousands("1234567"), "1,234,567");
    }

    #[test]
    fn decimal_exponent_of_fractions() {
        let e = |n: u32, d: u32| decimal_exponent(U1024::from(n), U1024::from(d)).unwrap();
        assert_eq!(e(1, 1), 0);
        assert_eq!(e(99, 10), 0);
        assert_eq!(e(1, 10), -1);
        assert_eq!(e(1, 11), -2);
        assert_eq!(e(12345, 1), 4);
    }
}
