use crate::error::{Error, InputError, UnavailableError};
use crate::math::math_helpers::mul_div;
use crate::math::tick_math::{MAX_SQRT_RATIO, MIN_SQRT_RATIO};
use crate::{Q160, U256_E4};
use alloy_primitives::U256;

/// Largest accepted tolerance, 100%.
pub const MAX_TOLERANCE_BPS: u32 = 10_000;

#[inline]
fn check_tolerance(tolerance_bps: u32) -> Result<U256, InputError> {
    if tolerance_bps > MAX_TOLERANCE_BPS {
        return Err(InputError::ToleranceOutOfRange(tolerance_bps));
    }
    Ok(U256::from(tolerance_bps))
}

/// Smallest acceptable output for a quoted `amount_out` under a tolerance in
/// basis points: `amount_out - floor(amount_out * tolerance_bps / 10000)`.
///
/// A missing or zero quote fails with [`UnavailableError::Quote`]; no bound
/// is ever derived from a quote that has not arrived.
pub fn minimum_output(amount_out: Option<U256>, tolerance_bps: u32) -> Result<U256, Error> {
    let tolerance = check_tolerance(tolerance_bps)?;

    let amount_out = match amount_out {
        Some(amount) if !amount.is_zero() => amount,
        _ => return Err(UnavailableError::Quote.into()),
    };

    let slippage = mul_div(amount_out, tolerance, U256_E4)?;
    Ok(amount_out - slippage)
}

/// Sqrt price limit that stops a swap once the price has moved by
/// `tolerance_bps` of the sqrt price in the swap direction.
///
/// Selling token0 (`zero_for_one`) pushes the price down, so the limit sits
/// below the current sqrt price; the other direction sits above it. The
/// result is kept strictly inside `(MIN_SQRT_RATIO, MAX_SQRT_RATIO)`, which
/// is what the pool accepts as a limit.
pub fn sqrt_price_limit(
    sqrt_price_x96: U256,
    zero_for_one: bool,
    tolerance_bps: u32,
) -> Result<U256, Error> {
    let tolerance = check_tolerance(tolerance_bps)?;

    if sqrt_price_x96.is_zero() {
        return Err(UnavailableError::Price.into());
    }
    if sqrt_price_x96 >= Q160 {
        return Err(InputError::SqrtPriceOutOfRange.into());
    }

    Ok(if zero_for_one {
        let limit = mul_div(sqrt_price_x96, U256_E4 - tolerance, U256_E4)?;
        limit.max(MIN_SQRT_RATIO + U256::ONE)
    } else {
        let limit = mul_div(sqrt_price_x96, U256_E4 + tolerance, U256_E4)?;
        limit.min(MAX_SQRT_RATIO - U256::ONE)
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Q96;
    use proptest::prelude::*;

    #[test]
    fn one_percent_of_a_million() {
        assert_eq!(
            minimum_output(Some(U256::from(1_000_000u64)), 100).unwrap(),
            U256::from(990_000u64)
        );
    }

    #[test]
    fn zero_tolerance_keeps_the_quote() {
        let amount = U256::from(123_456_789u64);
        assert_eq!(minimum_output(Some(amount), 0).unwrap(), amount);
    }

    #[test]
    fn full_tolerance_accepts_nothing() {
        assert_eq!(
            minimum_output(Some(U256::from(5u8)), 10_000).unwrap(),
            U256::ZERO
        );
    }

    #[test]
    fn slippage_is_rounded_down() {
        // 999 * 50 / 10000 = 4.995, floor 4
        assert_eq!(
            minimum_output(Some(U256::from(999u16)), 50).unwrap(),
            U256::from(995u16)
        );
    }

    #[test]
    fn missing_or_zero_quote_is_unavailable() {
        for quote in [None, Some(U256::ZERO)] {
            let err = minimum_output(quote, 100).unwrap_err();
            assert!(matches!(err, Error::Unavailable(UnavailableError::Quote)));
        }
    }

    #[test]
    fn tolerance_above_one_hundred_percent_is_rejected() {
        let err = minimum_output(Some(U256::from(1u8)), 10_001).unwrap_err();
        assert!(matches!(
            err,
            Error::InvalidInput(InputError::ToleranceOutOfRange(10_001))
        ));
    }

    #[test]
    fn does_not_overflow_on_full_width_quotes() {
        let amount = U256::MAX;
        let minimum = minimum_output(Some(amount), 10_000).unwrap();
        // floor(MAX * 10000 / 10000) == MAX
        assert_eq!(minimum, U256::ZERO);
        assert!(minimum_output(Some(amount), 1).unwrap() < amount);
    }

    #[test]
    fn sqrt_price_limit_moves_with_swap_direction() {
        let down = sqrt_price_limit(Q96, true, 100).unwrap();
        let up = sqrt_price_limit(Q96, false, 100).unwrap();
        assert_eq!(down, Q96 * U256::from(9_900u16) / U256_E4);
        assert_eq!(up, Q96 * U256::from(10_100u16) / U256_E4);
    }

    #[test]
    fn sqrt_price_limit_is_clamped_inside_pool_bounds() {
        assert_eq!(
            sqrt_price_limit(MIN_SQRT_RATIO, true, 500).unwrap(),
            MIN_SQRT_RATIO + U256::ONE
        );
        assert_eq!(
            sqrt_price_limit(Q96, true, 10_000).unwrap(),
            MIN_SQRT_RATIO + U256::ONE
        );
        assert_eq!(
            sqrt_price_limit(MAX_SQRT_RATIO - U256::ONE, false, 500).unwrap(),
            MAX_SQRT_RATIO - U256::ONE
        );
    }

    #[test]
    fn sqrt_price_limit_requires_a_price() {
        let err = sqrt_price_limit(U256::ZERO, true, 100).unwrap_err();
        assert!(err.is_unavailable());
        let err = sqrt_price_limit(Q160, false, 100).unwrap_err();
        assert!(err.is_invalid_input());
    }

    proptest! {
        #[test]
        fn minimum_output_never_exceeds_quote(
            limbs in any::<[u64; 4]>(),
            tolerance_bps in 0u32..=10_000,
        ) {
            let amount = U256::from_limbs(limbs).max(U256::ONE);
            let minimum = minimum_output(Some(amount), tolerance_bps).unwrap();
            prop_assert!(minimum <= amount);
            if tolerance_bps == 0 {
                prop_assert_eq!(minimum, amount);
            }
        }

        #[test]
        fn minimum_output_shrinks_as_tolerance_grows(
            amount in 1u128..,
            tolerance_bps in 0u32..10_000,
        ) {
            let amount = U256::from(amount);
            let tighter = minimum_output(Some(amount), tolerance_bps).unwrap();
            let looser = minimum_output(Some(amount), tolerance_bps + 1).unwrap();
            prop_assert!(looser <= tighter);
        }
    }
}
