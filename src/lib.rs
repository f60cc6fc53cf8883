//! Price, tick and slippage math for Uniswap V3–style swap front-ends.
//!
//! This crate exposes:
//! - Exact price ↔ tick conversions (`math::price_math`) built on the pool's
//!   own tick math, so a tick priced here maps back to the same tick.
//! - Tick snapping and the integer slippage bound submitted with a swap.
//! - A configured [`PriceTickEngine`] that speaks *quote per base* for one
//!   token pair, whichever token the pool calls `token0`.
//! - Optional `onchain` helpers that read `slot0`, tick spacing, quotes and
//!   token decimals through an alloy provider.
//!
//! # Examples
//!
//! ```no_run
//! use clmm_price_engine::{
//!     EngineConfig, ExchangeRate, PriceTickEngine, TokenDescriptor, U256, address,
//! };
//!
//! let weth = TokenDescriptor::new(address!("c02aaa39b223fe8d0a0e5c4f27ead9083c756cc2"), 18).unwrap();
//! let usdc = TokenDescriptor::new(address!("a0b86991c6218b36c1d19d4a2e9eb0ce3606eb48"), 6).unwrap();
//!
//! let mut config = EngineConfig::new(weth, usdc);
//! config.fee_pips = 500;
//! let engine = PriceTickEngine::new(config).unwrap();
//!
//! let price: ExchangeRate = "2000".parse().unwrap();
//! let tick = engine.usable_tick_for_price(&price).unwrap();
//! println!("2000 USDC/WETH -> tick {tick} ({})", engine.tick_to_price(tick).unwrap());
//!
//! let minimum = engine.minimum_output(Some(U256::from(1_999_500_000u64))).unwrap();
//! println!("amountOutMinimum {minimum}");
//! ```

pub use alloy_primitives::{address, Address, Uint, I256, U256};

pub mod engine;
pub mod error;
pub mod format;
mod hash;
pub mod math;
pub mod pool;
pub mod quote;
pub mod rate;
pub mod token;
pub mod units;

pub use engine::{EngineConfig, PairRates, PriceTickEngine};
pub use error::Error;
pub use hash::FastMap;
pub use math::price_math::{
    price_f64_to_tick, price_to_tick, sqrt_price_x96_from_price, sqrt_price_x96_to_price,
    sqrt_price_x96_to_price as decode_price, tick_to_price,
};
pub use math::slippage_math::{minimum_output, sqrt_price_limit};
pub use math::tick_math::{nearest_usable_tick, MAX_TICK, MIN_TICK};
pub use pool::v3_pool::{Slot0, V3Pool};
pub use quote::{ExactInputSingleParams, Quote, SlippageBound, SwapDirection};
pub use rate::ExchangeRate;
pub use token::{TokenDescriptor, TokenRegistry, MAX_TOKEN_DECIMALS};

/// Wide unsigned integer for exact rational price math.
pub type U1024 = Uint<1024, 16>;

pub const Q96: U256 = U256::from_limbs([0, 4294967296, 0, 0]);
/// `2^160`, one past the largest value a `uint160` sqrt price can hold.
pub const Q160: U256 = U256::from_limbs([0, 0, 4294967296, 0]);

const U256_E4: U256 = U256::from_limbs([10000, 0, 0, 0]);
