use crate::error::{InputError, StateError};
use alloy_primitives::{I256, U256};

pub const MIN_TICK: i32 = -887272;
pub const MAX_TICK: i32 = -MIN_TICK;

pub const MIN_SQRT_RATIO: U256 = U256::from_limbs([4295128739, 0, 0, 0]);
pub const MAX_SQRT_RATIO: U256 =
    U256::from_limbs([6743328256752651558, 17280870778742802505, 4294805859, 0]);

const SQRT_10001: I256 = I256::from_raw(U256::from_limbs([11745905768312294533, 13863, 0, 0]));
const TICK_LOW: I256 = I256::from_raw(U256::from_limbs([
    6552757943157144234,
    184476617836266586,
    0,
    0,
]));
const TICK_HIGH: I256 = I256::from_raw(U256::from_limbs([
    4998474450511881007,
    15793544031827761793,
    0,
    0,
]));
const I256_128: I256 = I256::from_raw(U256::from_limbs([128, 0, 0, 0]));

const SHIFT_32: usize = 32;
const SHIFT_128: usize = 128;

/// Returns `true` when `tick` lies inside `[MIN_TICK, MAX_TICK]`.
#[inline]
pub fn is_valid_tick(tick: i32) -> bool {
    (MIN_TICK..=MAX_TICK).contains(&tick)
}

/// Returns the sqrt price (Q64.96 fixed‑point) at a given tick, exactly as
/// the pool contract computes it, or `StateError::TickOutOfBounds` if the
/// tick is outside `[MIN_TICK, MAX_TICK]`.
///
/// This is the pool's own approximation of `sqrt(1.0001)^tick`; every tick
/// price in this crate goes through it so that prices and ticks agree with
/// what the chain reports.
pub fn get_sqrt_ratio_at_tick(tick: i32) -> Result<U256, StateError> {
    let abs_tick = tick.unsigned_abs();

    if abs_tick > MAX_TICK as u32 {
        return Err(StateError::TickOutOfBounds);
    }

    // Start with ratio based on bit 0
    let mut ratio = if abs_tick & 1 != 0 {
        U256::from_limbs([12262481743371124737, 18445821805675392311, 0, 0])
    } else {
        U256::from_limbs([0, 0, 1, 0])
    };

    macro_rules! apply_multiplier {
        ($bit:expr, $l0:expr, $l1:expr) => {
            if abs_tick & $bit != 0 {
                ratio = ratio.wrapping_mul(U256::from_limbs([$l0, $l1, 0, 0])) >> 128;
            }
        };
    }

    apply_multiplier!(2, 6459403834229662010, 18444899583751176498);
    apply_multiplier!(4, 17226890335427755468, 18443055278223354162);
    apply_multiplier!(8, 2032852871939366096, 18439367220385604838);
    apply_multiplier!(16, 14545316742740207172, 18431993317065449817);
    apply_multiplier!(32, 5129152022828963008, 18417254355718160513);
    apply_multiplier!(64, 4894419605888772193, 18387811781193591352);
    apply_multiplier!(128, 1280255884321894483, 18329067761203520168);
    apply_multiplier!(256, 15924666964335305636, 18212142134806087854);
    apply_multiplier!(512, 8010504389359918676, 17980523815641551639);
    apply_multiplier!(1024, 10668036004952895731, 17526086738831147013);
    apply_multiplier!(2048, 4878133418470705625, 16651378430235024244);
    apply_multiplier!(4096, 9537173718739605541, 15030750278693429944);
    apply_multiplier!(8192, 9972618978014552549, 12247334978882834399);
    apply_multiplier!(16384, 10428997489610666743, 8131365268884726200);
    apply_multiplier!(32768, 9305304367709015974, 3584323654723342297);
    apply_multiplier!(65536, 14301143598189091785, 696457651847595233);
    apply_multiplier!(131072, 7393154844743099908, 26294789957452057);
    apply_multiplier!(262144, 2209338891292245656, 37481735321082);
    apply_multiplier!(524288, 10518117631919034274, 76158723);

    if tick > 0 {
        ratio = U256::MAX / ratio;
    }

    let lower_32_bits = (ratio.as_limbs()[0] & 0xFFFF_FFFF) as u32;
    Ok((ratio >> 32) + U256::from((lower_32_bits != 0) as u64))
}

/// Computes the tick index corresponding to a given sqrt price
/// (Q64.96 fixed‑point): the greatest tick whose sqrt ratio is less than
/// or equal to `sqrt_price_x96`.
///
/// This floors, never rounds, which is what the pool itself does when it
/// reports `slot0.tick`.
pub fn get_tick_at_sqrt_ratio(sqrt_price_x96: U256) -> Result<i32, StateError> {
    if sqrt_price_x96 < MIN_SQRT_RATIO || sqrt_price_x96 >= MAX_SQRT_RATIO {
        return Err(StateError::SqrtPriceOutOfBounds);
    }

    let ratio = sqrt_price_x96 << SHIFT_32;
    let msb = ratio.bit_len() - 1;

    let mut r = if msb >= 128 {
        ratio >> (msb - 127)
    } else {
        ratio << (127 - msb)
    };

    let mut log_2: I256 = (I256::from_raw(U256::from(msb)) - I256_128) << 64usize;

    macro_rules! log2_step {
        ($shift:expr) => {{
            r = r.wrapping_mul(r) >> 127usize;
            let f = (r >> SHIFT_128).as_limbs()[0];
            log_2 |= I256::from_raw(U256::from(f) << $shift);
            r >>= f as usize;
        }};
    }

    log2_step!(63);
    log2_step!(62);
    log2_step!(61);
    log2_step!(60);
    log2_step!(59);
    log2_step!(58);
    log2_step!(57);
    log2_step!(56);
    log2_step!(55);
    log2_step!(54);
    log2_step!(53);
    log2_step!(52);
    log2_step!(51);
    log2_step!(50);

    let log_sqrt10001 = log_2.wrapping_mul(SQRT_10001);
    let tick_low = ((log_sqrt10001 - TICK_LOW) >> SHIFT_128).low_i32();
    let tick_high = ((log_sqrt10001 + TICK_HIGH) >> SHIFT_128).low_i32();

    Ok(if tick_low == tick_high {
        tick_low
    } else if get_sqrt_ratio_at_tick(tick_high)? <= sqrt_price_x96 {
        tick_high
    } else {
        tick_low
    })
}

/// Snaps `tick` to the nearest multiple of `tick_spacing`.
///
/// Ties (a tick exactly half a spacing from both neighbours) round away from
/// zero: with spacing 60, `30` snaps to `60` and `-30` to `-60`. Input ticks
/// outside the domain are clamped to `[MIN_TICK, MAX_TICK]` first, and a
/// snapped tick that would leave the domain steps back one spacing toward
/// zero, so the result is always usable.
pub fn nearest_usable_tick(tick: i32, tick_spacing: i32) -> Result<i32, InputError> {
    if tick_spacing <= 0 {
        return Err(InputError::NonPositiveTickSpacing(tick_spacing));
    }
    Ok(snap_to_spacing(tick, tick_spacing))
}

/// [`nearest_usable_tick`] for a spacing already known to be positive.
pub(crate) fn snap_to_spacing(tick: i32, tick_spacing: i32) -> i32 {
    let tick = i64::from(tick.clamp(MIN_TICK, MAX_TICK));
    let spacing = i64::from(tick_spacing);

    let lower = tick.div_euclid(spacing) * spacing;
    let upper = lower + spacing;
    let below = tick - lower;
    let above = upper - tick;

    let rounded = if below < above {
        lower
    } else if above < below {
        upper
    } else if tick > 0 {
        upper
    } else {
        lower
    };

    let usable = if rounded > i64::from(MAX_TICK) {
        rounded - spacing
    } else if rounded < i64::from(MIN_TICK) {
        rounded + spacing
    } else {
        rounded
    };

    // |usable| <= MAX_TICK, so the narrowing cannot truncate
    usable as i32
}

/// Smallest and largest usable ticks for a spacing.
pub fn usable_tick_bounds(tick_spacing: i32) -> Result<(i32, i32), InputError> {
    if tick_spacing <= 0 {
        return Err(InputError::NonPositiveTickSpacing(tick_spacing));
    }
    let max = (MAX_TICK / tick_spacing) * tick_spacing;
    Ok((-max, max))
}

/// Default tick spacing of the standard fee tiers, keyed by fee in pips.
pub fn default_tick_spacing(fee_pips: u32) -> Option<i32> {
    match fee_pips {
        100 => Some(1),
        500 => Some(10),
        3000 => Some(60),
        10000 => Some(200),
        _ => None,
    }
}
