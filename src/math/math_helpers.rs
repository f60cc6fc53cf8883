use crate::error::MathError;
use crate::U1024;
use alloy_primitives::U256;

const U256_ONE: U256 = U256::ONE;
const U256_TWO: U256 = U256::from_limbs([2, 0, 0, 0]);
const U256_THREE: U256 = U256::from_limbs([3, 0, 0, 0]);

/// Computes `a * b / denominator` with full 512‑bit intermediate precision,
/// rounding down, and returns a `MathError` on overflow or division by zero.
///
/// This mirrors the Solidity `FullMath.mulDiv` behavior. Slippage bounds go
/// through here so that `amount * bps` never silently wraps.
#[inline]
pub fn mul_div(a: U256, b: U256, mut denominator: U256) -> Result<U256, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }

    let mm = a.mul_mod(b, U256::MAX);
    let mut prod0 = a.wrapping_mul(b);

    let (mut prod1, borrow1) = mm.overflowing_sub(prod0);
    if borrow1 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    if prod1.is_zero() {
        return Ok(prod0.wrapping_div(denominator));
    }

    if denominator <= prod1 {
        return Err(MathError::Overflow);
    }

    let remainder = a.mul_mod(b, denominator);
    let (prod0_new, borrow2) = prod0.overflowing_sub(remainder);
    prod0 = prod0_new;
    if borrow2 {
        prod1 = prod1.wrapping_sub(U256_ONE);
    }

    let twos = denominator & denominator.wrapping_neg();
    denominator = denominator.wrapping_div(twos);
    prod0 = prod0.wrapping_div(twos);

    let twos_adj = twos
        .wrapping_neg()
        .wrapping_div(twos)
        .wrapping_add(U256_ONE);
    prod0 |= prod1.wrapping_mul(twos_adj);

    let mut inv = U256_THREE.wrapping_mul(denominator) ^ U256_TWO;

    macro_rules! newton_iteration {
        () => {
            inv = inv.wrapping_mul(U256_TWO.wrapping_sub(denominator.wrapping_mul(inv)))
        };
    }

    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();
    newton_iteration!();

    Ok(prod0.wrapping_mul(inv))
}

/// Floor of the square root of `value`.
///
/// Newton's method started from a power of two above the root, so the
/// sequence decreases monotonically onto the floor.
pub fn isqrt(value: U1024) -> U1024 {
    if value <= U1024::ONE {
        return value;
    }

    let mut x = U1024::ONE << value.bit_len().div_ceil(2);
    loop {
        let y = (x + value / x) >> 1;
        if y >= x {
            return x;
        }
        x = y;
    }
}

/// `10^exp` in the wide type used for exact rational price math.
#[inline]
pub fn pow10(exp: u32) -> U1024 {
    U1024::from(10u8).pow(U1024::from(exp))
}

/// `numerator / denominator` rounded half up.
#[inline]
pub fn div_round_half_up(numerator: U1024, denominator: U1024) -> Result<U1024, MathError> {
    if denominator.is_zero() {
        return Err(MathError::DivisionByZero);
    }
    let (quotient, remainder) = numerator.div_rem(denominator);
    let doubled = remainder.checked_mul(U1024::from(2u8)).ok_or(MathError::Overflow)?;
    if doubled >= denominator {
        Ok(quotient + U1024::ONE)
    } else {
        Ok(quotient)
    }
}
