//! Conversions between pool sqrt prices, ticks and human exchange rates.
//!
//! A pool quotes `token1 / token0` in raw smallest units. The human rate
//! shifts that by `10^(d0 - d1)` and, when the human convention lists the
//! pair the other way round, inverts it. All of it is done on exact
//! rationals, so `price_to_tick(tick_to_price(t)) == t` for every tick.

use crate::error::{Error, InputError, UnavailableError};
use crate::math::math_helpers::{isqrt, pow10};
use crate::math::tick_math::{
    get_sqrt_ratio_at_tick, get_tick_at_sqrt_ratio, is_valid_tick, MAX_SQRT_RATIO, MAX_TICK,
    MIN_SQRT_RATIO,
};
use crate::rate::ExchangeRate;
use crate::token::check_decimals;
use crate::{Q160, U1024};
use alloy_primitives::U256;

/// `2^192`, the scale of a squared Q64.96 value.
const Q192_SHIFT: usize = 192;

/// `(numerator, denominator)` factors that turn a raw pool ratio into
/// human units: `10^(d0 - d1)` split across whichever side keeps it integral.
fn decimal_adjustment(
    token0_decimals: u8,
    token1_decimals: u8,
) -> Result<(U1024, U1024), InputError> {
    let d0 = check_decimals(token0_decimals)?;
    let d1 = check_decimals(token1_decimals)?;

    Ok(if d0 >= d1 {
        (pow10(u32::from(d0 - d1)), U1024::ONE)
    } else {
        (U1024::ONE, pow10(u32::from(d1 - d0)))
    })
}

/// Decodes a pool's `sqrtPriceX96` into a decimals adjusted rate.
///
/// The rate is `token1 per token0` unless `invert` is set, in which case it
/// is `token0 per token1`. A zero sqrt price means the pool has no price yet
/// and is reported as [`UnavailableError::Price`], never as a zero rate.
pub fn sqrt_price_x96_to_price(
    sqrt_price_x96: U256,
    token0_decimals: u8,
    token1_decimals: u8,
    invert: bool,
) -> Result<ExchangeRate, Error> {
    let (scale_num, scale_den) = decimal_adjustment(token0_decimals, token1_decimals)?;

    if sqrt_price_x96.is_zero() {
        return Err(UnavailableError::Price.into());
    }
    if sqrt_price_x96 >= Q160 {
        return Err(InputError::SqrtPriceOutOfRange.into());
    }

    let sqrt = U1024::from(sqrt_price_x96);
    // < 2^320 * 10^38 and 2^192 * 10^38, both well inside U1024
    let numerator = sqrt * sqrt * scale_num;
    let denominator = (U1024::ONE << Q192_SHIFT) * scale_den;

    let rate = ExchangeRate::from_ratio(numerator, denominator)?;
    Ok(if invert { rate.invert() } else { rate })
}

/// Human rate at `tick`, using the pool's own sqrt ratio for the tick.
pub fn tick_to_price(
    tick: i32,
    token0_decimals: u8,
    token1_decimals: u8,
    invert: bool,
) -> Result<ExchangeRate, Error> {
    if !is_valid_tick(tick) {
        return Err(InputError::TickOutOfBounds(tick).into());
    }
    let sqrt_price_x96 =
        get_sqrt_ratio_at_tick(tick).map_err(|_| InputError::TickOutOfBounds(tick))?;
    sqrt_price_x96_to_price(sqrt_price_x96, token0_decimals, token1_decimals, invert)
}

/// Inverse of [`sqrt_price_x96_to_price`]: the Q64.96 sqrt price, rounded
/// down, that encodes `price`.
///
/// Prices whose sqrt price falls outside `[MIN_SQRT_RATIO, MAX_SQRT_RATIO]`
/// cannot be expressed by any tick and are rejected.
pub fn sqrt_price_x96_from_price(
    price: &ExchangeRate,
    token0_decimals: u8,
    token1_decimals: u8,
    invert: bool,
) -> Result<U256, Error> {
    let (scale_num, scale_den) = decimal_adjustment(token0_decimals, token1_decimals)?;
    let raw = if invert { price.invert() } else { *price };

    // raw pool ratio = human / 10^(d0 - d1)
    let numerator = raw.numerator() * scale_den;
    let denominator = raw.denominator() * scale_num;

    let sqrt = isqrt((numerator << Q192_SHIFT) / denominator);
    if sqrt < U1024::from(MIN_SQRT_RATIO) || sqrt > U1024::from(MAX_SQRT_RATIO) {
        return Err(InputError::PriceOutOfRange.into());
    }

    // bounded by MAX_SQRT_RATIO above, so it fits in 160 bits
    U256::checked_from_uint(sqrt).ok_or_else(|| InputError::PriceOutOfRange.into())
}

/// The tick whose price is the greatest not exceeding `price` (floor, the
/// same tick the pool would report at that price).
pub fn price_to_tick(
    price: &ExchangeRate,
    token0_decimals: u8,
    token1_decimals: u8,
    invert: bool,
) -> Result<i32, Error> {
    let sqrt_price_x96 =
        sqrt_price_x96_from_price(price, token0_decimals, token1_decimals, invert)?;

    if sqrt_price_x96 == MAX_SQRT_RATIO {
        return Ok(MAX_TICK);
    }
    Ok(get_tick_at_sqrt_ratio(sqrt_price_x96)?)
}

/// [`price_to_tick`] for a floating point price, converted exactly.
pub fn price_f64_to_tick(
    price: f64,
    token0_decimals: u8,
    token1_decimals: u8,
    invert: bool,
) -> Result<i32, Error> {
    let price = ExchangeRate::from_f64(price)?;
    price_to_tick(&price, token0_decimals, token1_decimals, invert)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::math::tick_math::MIN_TICK;
    use crate::Q96;
    use proptest::prelude::*;

    fn rate(text: &str) -> ExchangeRate {
        text.parse().unwrap()
    }

    // ------------------------- decoding -------------------------

    #[test]
    fn decodes_one_dai_per_usdc() {
        // token0 = DAI (18), token1 = USDC (6); 1 DAI == 1 USDC
        let sqrt_price_x96 = U256::from(79228162514264337593543u128);
        let price = sqrt_price_x96_to_price(sqrt_price_x96, 18, 6, true).unwrap();
        assert_eq!(price.to_string(), "1.0000");
        let price = sqrt_price_x96_to_price(sqrt_price_x96, 18, 6, false).unwrap();
        assert_eq!(price.to_string(), "1.0000");
    }

    #[test]
    fn q96_is_parity_for_equal_decimals() {
        let price = sqrt_price_x96_to_price(Q96, 6, 6, false).unwrap();
        assert_eq!(price, ExchangeRate::ONE);
        assert_eq!(price.to_string(), "1.0000");
    }

    #[test]
    fn q96_is_scaled_by_decimal_difference() {
        assert_eq!(
            sqrt_price_x96_to_price(Q96, 18, 6, false).unwrap().to_string(),
            "1.0000e+12"
        );
        assert_eq!(
            sqrt_price_x96_to_price(Q96, 18, 6, true).unwrap().to_string(),
            "1.0000e-12"
        );
    }

    #[test]
    fn zero_sqrt_price_is_unavailable() {
        let err = sqrt_price_x96_to_price(U256::ZERO, 18, 6, false).unwrap_err();
        assert!(matches!(err, Error::Unavailable(UnavailableError::Price)));
    }

    #[test]
    fn sqrt_price_wider_than_160_bits_is_rejected() {
        let err = sqrt_price_x96_to_price(Q160, 18, 18, false).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::SqrtPriceOutOfRange)
        ));
        assert!(sqrt_price_x96_to_price(Q160 - U256::ONE, 18, 18, false).is_ok());
    }

    #[test]
    fn unsupported_decimals_are_rejected() {
        let err = sqrt_price_x96_to_price(Q96, 39, 6, false).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::DecimalsOutOfRange(39))
        ));
    }

    // ------------------------- tick -> price -------------------------

    #[test]
    fn tick_to_price_near_parity() {
        assert_eq!(tick_to_price(0, 0, 0, false).unwrap(), ExchangeRate::ONE);
        assert_eq!(tick_to_price(100, 0, 0, false).unwrap().to_string(), "1.0100");
        assert_eq!(tick_to_price(-100, 0, 0, false).unwrap().to_string(), "0.9901");
    }

    #[test]
    fn tick_to_price_at_domain_edges() {
        assert_eq!(
            tick_to_price(MAX_TICK, 0, 0, false).unwrap().to_string(),
            "3.4026e+38"
        );
        assert_eq!(
            tick_to_price(MIN_TICK, 0, 0, false).unwrap().to_string(),
            "2.9390e-39"
        );
    }

    #[test]
    fn tick_to_price_rejects_ticks_outside_domain() {
        for tick in [MAX_TICK + 1, MIN_TICK - 1, i32::MIN, i32::MAX] {
            let err = tick_to_price(tick, 18, 6, false).unwrap_err();
            assert!(
                matches!(err, Error::InvalidInput(InputError::TickOutOfBounds(t)) if t == tick),
                "{tick} should be out of bounds"
            );
        }
    }

    #[test]
    fn weth_usdc_ticks_around_two_thousand() {
        // token0 = USDC (6), token1 = WETH (18), shown as USDC per WETH
        assert_eq!(
            tick_to_price(200311, 6, 18, true).unwrap().to_string(),
            "2,000.0403"
        );
        assert_eq!(
            tick_to_price(200312, 6, 18, true).unwrap().to_string(),
            "1,999.8403"
        );
        assert_eq!(
            tick_to_price(200310, 6, 18, true).unwrap().to_string(),
            "2,000.2403"
        );
    }

    // ------------------------- price -> tick -------------------------

    #[test]
    fn price_to_tick_for_two_thousand_usdc_per_weth() {
        assert_eq!(price_to_tick(&rate("2000"), 6, 18, true).unwrap(), 200311);
    }

    #[test]
    fn price_to_tick_floors() {
        assert_eq!(price_to_tick(&ExchangeRate::ONE, 0, 0, false).unwrap(), 0);
        assert_eq!(price_to_tick(&rate("0.999999999"), 0, 0, false).unwrap(), -1);
        assert_eq!(price_to_tick(&rate("1.0102"), 0, 0, false).unwrap(), 101);
    }

    #[test]
    fn price_to_tick_rejects_prices_outside_tick_domain() {
        for text in ["1e39", "1e-40"] {
            let err = price_to_tick(&rate(text), 0, 0, false).unwrap_err();
            assert!(
                matches!(err, Error::InvalidInput(InputError::PriceOutOfRange)),
                "{text} should be out of range"
            );
        }
    }

    #[test]
    fn price_f64_to_tick_rejects_non_positive() {
        for price in [0.0, -2000.0, f64::NAN] {
            let err = price_f64_to_tick(price, 6, 18, true).unwrap_err();
            assert!(matches!(
                err,
                Error::InvalidInput(InputError::NonPositivePrice)
            ));
        }
        assert_eq!(price_f64_to_tick(1.0, 0, 0, false).unwrap(), 0);
    }

    #[test]
    fn round_trips_at_domain_edges() {
        for (d0, d1) in [(0, 0), (6, 18), (18, 6), (18, 18), (38, 0), (0, 38)] {
            for invert in [false, true] {
                for tick in [MIN_TICK, MIN_TICK + 1, -1, 0, 1, MAX_TICK - 1, MAX_TICK] {
                    let price = tick_to_price(tick, d0, d1, invert).unwrap();
                    assert_eq!(
                        price_to_tick(&price, d0, d1, invert).unwrap(),
                        tick,
                        "tick {tick} with decimals ({d0}, {d1}) invert {invert}"
                    );
                }
            }
        }
    }

    #[test]
    fn sqrt_price_from_price_at_domain_edges() {
        for (d0, d1, invert) in [(0, 0, false), (6, 18, true), (18, 6, false)] {
            let top = tick_to_price(MAX_TICK, d0, d1, invert).unwrap();
            let bottom = tick_to_price(MIN_TICK, d0, d1, invert).unwrap();
            assert_eq!(
                sqrt_price_x96_from_price(&top, d0, d1, invert).unwrap(),
                MAX_SQRT_RATIO
            );
            assert_eq!(
                sqrt_price_x96_from_price(&bottom, d0, d1, invert).unwrap(),
                MIN_SQRT_RATIO
            );
        }
    }

    proptest! {
        #[test]
        fn tick_price_round_trip(
            tick in MIN_TICK..=MAX_TICK,
            d0 in 0u8..=18,
            d1 in 0u8..=18,
            invert in any::<bool>(),
        ) {
            let price = tick_to_price(tick, d0, d1, invert).unwrap();
            prop_assert_eq!(price_to_tick(&price, d0, d1, invert).unwrap(), tick);
        }

        #[test]
        fn higher_ticks_mean_higher_pool_prices(tick in MIN_TICK..MAX_TICK) {
            let lower = tick_to_price(tick, 18, 18, false).unwrap();
            let upper = tick_to_price(tick + 1, 18, 18, false).unwrap();
            prop_assert!(lower < upper);
        }
    }
}
