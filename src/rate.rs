//! Exact exchange rates.
//!
//! An [`ExchangeRate`] is a positive rational number kept in lowest terms.
//! Rates are derived from pool state on demand and never stored
//! authoritatively; keeping them exact means the price ↔ tick conversions
//! can round-trip without the drift a `f64` pipeline would introduce.

use crate::error::InputError;
use crate::format::format_rate;
use crate::math::math_helpers::pow10;
use crate::U1024;
use std::cmp::Ordering;
use std::fmt;
use std::str::FromStr;

/// Widest numerator or denominator a rate may carry. Keeps cross
/// multiplication (ordering, formatting) inside `U1024`.
pub const MAX_RATE_BITS: usize = 512;

/// Longest run of significant digits accepted when parsing a rate.
const MAX_PARSED_DIGITS: usize = 100;
/// Largest decimal exponent accepted when parsing a rate.
const MAX_PARSED_EXPONENT: u64 = 150;

/// Units of quote token per unit of base token, decimal adjusted.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct ExchangeRate {
    numerator: U1024,
    denominator: U1024,
}

impl ExchangeRate {
    pub const ONE: Self = Self {
        numerator: U1024::ONE,
        denominator: U1024::ONE,
    };

    /// Builds `numerator / denominator`, reduced to lowest terms.
    ///
    /// Zero on either side is rejected: a zero rate is "no price", which
    /// callers express with [`crate::error::UnavailableError`] instead.
    pub fn from_ratio(numerator: U1024, denominator: U1024) -> Result<Self, InputError> {
        if numerator.is_zero() || denominator.is_zero() {
            return Err(InputError::NonPositivePrice);
        }

        let gcd = numerator.gcd(denominator);
        let numerator = numerator / gcd;
        let denominator = denominator / gcd;

        if numerator.bit_len() > MAX_RATE_BITS || denominator.bit_len() > MAX_RATE_BITS {
            return Err(InputError::PriceOutOfRange);
        }

        Ok(Self {
            numerator,
            denominator,
        })
    }

    /// Exact rate of a binary floating point value.
    ///
    /// Zero, negative, NaN and infinite values are rejected.
    pub fn from_f64(value: f64) -> Result<Self, InputError> {
        if !value.is_finite() || value <= 0.0 {
            return Err(InputError::NonPositivePrice);
        }

        let bits = value.to_bits();
        let biased_exponent = ((bits >> 52) & 0x7ff) as i64;
        let fraction = bits & ((1u64 << 52) - 1);

        let (mantissa, exponent) = if biased_exponent == 0 {
            (fraction, -1074)
        } else {
            (fraction | (1u64 << 52), biased_exponent - 1075)
        };

        let mantissa = U1024::from(mantissa);
        if exponent >= 0 {
            if exponent as usize + 53 > MAX_RATE_BITS {
                return Err(InputError::PriceOutOfRange);
            }
            Self::from_ratio(mantissa << exponent as usize, U1024::ONE)
        } else {
            if (-exponent) as usize > MAX_RATE_BITS {
                return Err(InputError::PriceOutOfRange);
            }
            Self::from_ratio(mantissa, U1024::ONE << (-exponent) as usize)
        }
    }

    #[inline]
    pub fn numerator(&self) -> U1024 {
        self.numerator
    }

    #[inline]
    pub fn denominator(&self) -> U1024 {
        self.denominator
    }

    /// The reciprocal rate (base per quote instead of quote per base).
    #[inline]
    pub fn invert(&self) -> Self {
        Self {
            numerator: self.denominator,
            denominator: self.numerator,
        }
    }

    /// Nearest `f64`, for display-only consumers such as charts.
    pub fn to_f64(&self) -> f64 {
        // scale so that the quotient carries 64-65 significant bits
        let shift = self.denominator.bit_len() as i64 - self.numerator.bit_len() as i64 + 64;
        let (scaled, remainder) = if shift >= 0 {
            (self.numerator << shift as usize).div_rem(self.denominator)
        } else {
            self.numerator.div_rem(self.denominator << (-shift) as usize)
        };

        let limbs = scaled.as_limbs();
        // sticky bit: a dropped remainder must still break round-half-even ties
        let mantissa = (u128::from(limbs[1]) << 64)
            | u128::from(limbs[0])
            | u128::from(!remainder.is_zero());

        mantissa as f64 * 2f64.powi(-shift as i32)
    }
}

impl PartialOrd for ExchangeRate {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl Ord for ExchangeRate {
    fn cmp(&self, other: &Self) -> Ordering {
        // both sides are at most 512 bits wide, so the products fit
        (self.numerator * other.denominator).cmp(&(other.numerator * self.denominator))
    }
}

impl FromStr for ExchangeRate {
    type Err = InputError;

    /// Parses decimal text such as `"1999.5"`, `"0.0004"` or `"1.5e-7"`
    /// without going through floating point.
    fn from_str(text: &str) -> Result<Self, Self::Err> {
        let malformed = || InputError::MalformedPrice(text.to_string());
        let trimmed = text.trim();

        let (mantissa, exponent) = match trimmed.find(|c: char| c == 'e' || c == 'E') {
            Some(at) => {
                let exponent = trimmed[at + 1..]
                    .parse::<i64>()
                    .map_err(|_| malformed())?;
                (&trimmed[..at], exponent)
            }
            None => (trimmed, 0),
        };

        let (negative, mantissa) = match mantissa.strip_prefix('-') {
            Some(rest) => (true, rest),
            None => (false, mantissa.strip_prefix('+').unwrap_or(mantissa)),
        };

        let (whole, fraction) = mantissa.split_once('.').unwrap_or((mantissa, ""));
        let is_digits = |part: &str| part.bytes().all(|b| b.is_ascii_digit());
        if (whole.is_empty() && fraction.is_empty()) || !is_digits(whole) || !is_digits(fraction)
        {
            return Err(malformed());
        }

        let digits = format!("{whole}{fraction}");
        let digits = digits.trim_start_matches('0');
        if negative || digits.is_empty() {
            return Err(InputError::NonPositivePrice);
        }
        if digits.len() > MAX_PARSED_DIGITS {
            return Err(InputError::PriceOutOfRange);
        }

        let value = U1024::from_str_radix(digits, 10).map_err(|_| malformed())?;
        let scale = exponent
            .checked_sub(fraction.len() as i64)
            .ok_or(InputError::PriceOutOfRange)?;
        if scale.unsigned_abs() > MAX_PARSED_EXPONENT {
            return Err(InputError::PriceOutOfRange);
        }

        // |scale| <= MAX_PARSED_EXPONENT, so the narrowing is lossless
        let magnitude = scale.unsigned_abs() as u32;
        if scale >= 0 {
            Self::from_ratio(value * pow10(magnitude), U1024::ONE)
        } else {
            Self::from_ratio(value, pow10(magnitude))
        }
    }
}

impl fmt::Display for ExchangeRate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let text = format_rate(self).map_err(|_| fmt::Error)?;
        f.write_str(&text)
    }
}
