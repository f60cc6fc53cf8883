//! Configured facade over the price, tick and slippage math for one pool.
//!
//! The engine fixes a base/quote pair, sorts it into pool order once, and
//! from then on every rate it hands out is *quote per base* regardless of
//! which token the pool calls `token0`.

use crate::error::{ConfigError, Error, InputError};
use crate::math::price_math;
use crate::math::slippage_math::{self, MAX_TOLERANCE_BPS};
use crate::math::tick_math::{default_tick_spacing, snap_to_spacing};
use crate::quote::{ExactInputSingleParams, Quote, SlippageBound, SwapDirection};
use crate::rate::ExchangeRate;
use crate::token::{check_decimals, sort_tokens, TokenDescriptor};
use alloy_primitives::{Address, U256};
use serde::{Deserialize, Serialize};
use std::path::Path;
use tracing::{debug, trace};

pub const DEFAULT_FEE_PIPS: u32 = 3000;
pub const DEFAULT_SLIPPAGE_BPS: u32 = 100;
pub const DEFAULT_DEADLINE_SECS: u64 = 1200;

fn default_fee_pips() -> u32 {
    DEFAULT_FEE_PIPS
}

fn default_slippage_bps() -> u32 {
    DEFAULT_SLIPPAGE_BPS
}

fn default_deadline_secs() -> u64 {
    DEFAULT_DEADLINE_SECS
}

/// Construction-time settings of a [`PriceTickEngine`].
///
/// ```json
/// {
///   "base":  { "address": "0xC02aaA39b223FE8D0A0e5C4F27eAD9083C756Cc2", "decimals": 18 },
///   "quote": { "address": "0xA0b86991c6218b36c1d19D4a2e9Eb0cE3606eB48", "decimals": 6 },
///   "fee_pips": 500
/// }
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(deny_unknown_fields)]
pub struct EngineConfig {
    pub base: TokenDescriptor,
    pub quote: TokenDescriptor,
    /// Pool fee in hundredths of a bip.
    #[serde(default = "default_fee_pips")]
    pub fee_pips: u32,
    /// Overrides the fee tier's default spacing.
    #[serde(default)]
    pub tick_spacing: Option<i32>,
    #[serde(default = "default_slippage_bps")]
    pub slippage_bps: u32,
    #[serde(default = "default_deadline_secs")]
    pub deadline_secs: u64,
}

impl EngineConfig {
    pub fn new(base: TokenDescriptor, quote: TokenDescriptor) -> Self {
        Self {
            base,
            quote,
            fee_pips: DEFAULT_FEE_PIPS,
            tick_spacing: None,
            slippage_bps: DEFAULT_SLIPPAGE_BPS,
            deadline_secs: DEFAULT_DEADLINE_SECS,
        }
    }

    pub fn from_json_str(json: &str) -> Result<Self, ConfigError> {
        Ok(serde_json::from_str(json)?)
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        let path = path.as_ref();
        debug!("loading engine config from {}", path.display());
        let json = std::fs::read_to_string(path)?;
        Self::from_json_str(&json)
    }
}

/// Both directions of a pair's rate at once.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct PairRates {
    /// `1 base = base_to_quote quote`
    pub base_to_quote: ExchangeRate,
    /// `1 quote = quote_to_base base`
    pub quote_to_base: ExchangeRate,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct PriceTickEngine {
    base: TokenDescriptor,
    quote: TokenDescriptor,
    token0: TokenDescriptor,
    token1: TokenDescriptor,
    /// `true` when base is the pool's `token1`.
    invert: bool,
    fee_pips: u32,
    tick_spacing: i32,
    slippage_bps: u32,
    deadline_secs: u64,
}

impl PriceTickEngine {
    /// Validates `config` and freezes it.
    pub fn new(config: EngineConfig) -> Result<Self, InputError> {
        check_decimals(config.base.decimals)?;
        check_decimals(config.quote.decimals)?;

        let tick_spacing = match config.tick_spacing {
            Some(spacing) if spacing <= 0 => {
                return Err(InputError::NonPositiveTickSpacing(spacing));
            }
            Some(spacing) => spacing,
            None => default_tick_spacing(config.fee_pips)
                .ok_or(InputError::UnknownFeeTier(config.fee_pips))?,
        };

        if config.slippage_bps > MAX_TOLERANCE_BPS {
            return Err(InputError::ToleranceOutOfRange(config.slippage_bps));
        }

        let (token0, token1, invert) = sort_tokens(config.base, config.quote);
        debug!(
            "engine for base {} / quote {}: token0 {}, fee {}, spacing {}",
            config.base.address, config.quote.address, token0.address, config.fee_pips, tick_spacing
        );

        Ok(Self {
            base: config.base,
            quote: config.quote,
            token0,
            token1,
            invert,
            fee_pips: config.fee_pips,
            tick_spacing,
            slippage_bps: config.slippage_bps,
            deadline_secs: config.deadline_secs,
        })
    }

    /// Reads and validates a JSON config file.
    pub fn from_config_file(path: impl AsRef<Path>) -> Result<Self, ConfigError> {
        Ok(Self::new(EngineConfig::load(path)?)?)
    }

    #[inline]
    pub fn base(&self) -> &TokenDescriptor {
        &self.base
    }

    #[inline]
    pub fn quote(&self) -> &TokenDescriptor {
        &self.quote
    }

    #[inline]
    pub fn token0(&self) -> &TokenDescriptor {
        &self.token0
    }

    #[inline]
    pub fn token1(&self) -> &TokenDescriptor {
        &self.token1
    }

    /// `true` when the human rate is the inverse of the pool's raw rate.
    #[inline]
    pub fn is_inverted(&self) -> bool {
        self.invert
    }

    #[inline]
    pub fn fee_pips(&self) -> u32 {
        self.fee_pips
    }

    #[inline]
    pub fn tick_spacing(&self) -> i32 {
        self.tick_spacing
    }

    #[inline]
    pub fn slippage_bps(&self) -> u32 {
        self.slippage_bps
    }

    #[inline]
    pub fn deadline_secs(&self) -> u64 {
        self.deadline_secs
    }

    /// Quote per base at the pool's current `sqrtPriceX96`.
    pub fn decode_price(&self, sqrt_price_x96: U256) -> Result<ExchangeRate, Error> {
        let result = price_math::sqrt_price_x96_to_price(
            sqrt_price_x96,
            self.token0.decimals,
            self.token1.decimals,
            self.invert,
        );
        match &result {
            Ok(rate) => trace!("sqrtPriceX96 {} decodes to {}", sqrt_price_x96, rate),
            Err(err) => debug!("cannot decode sqrtPriceX96 {}: {}", sqrt_price_x96, err),
        }
        result
    }

    pub fn pair_rates(&self, sqrt_price_x96: U256) -> Result<PairRates, Error> {
        let base_to_quote = self.decode_price(sqrt_price_x96)?;
        Ok(PairRates {
            base_to_quote,
            quote_to_base: base_to_quote.invert(),
        })
    }

    /// Floor tick of a quote-per-base rate.
    pub fn price_to_tick(&self, price: &ExchangeRate) -> Result<i32, Error> {
        let result = price_math::price_to_tick(
            price,
            self.token0.decimals,
            self.token1.decimals,
            self.invert,
        );
        match &result {
            Ok(tick) => trace!("price {} maps to tick {}", price, tick),
            Err(err) => debug!("cannot map price {} to a tick: {}", price, err),
        }
        result
    }

    /// Quote per base at `tick`.
    pub fn tick_to_price(&self, tick: i32) -> Result<ExchangeRate, Error> {
        let result = price_math::tick_to_price(
            tick,
            self.token0.decimals,
            self.token1.decimals,
            self.invert,
        );
        if let Err(err) = &result {
            debug!("cannot price tick {}: {}", tick, err);
        }
        result
    }

    /// Snaps `tick` to this pool's spacing.
    #[inline]
    pub fn nearest_usable_tick(&self, tick: i32) -> i32 {
        snap_to_spacing(tick, self.tick_spacing)
    }

    /// The usable tick closest to the floor tick of `price`, for placing a
    /// range bound at a human price.
    pub fn usable_tick_for_price(&self, price: &ExchangeRate) -> Result<i32, Error> {
        let tick = self.price_to_tick(price)?;
        Ok(self.nearest_usable_tick(tick))
    }

    /// [`slippage_math::minimum_output`] with the configured tolerance.
    pub fn minimum_output(&self, amount_out: Option<U256>) -> Result<U256, Error> {
        let result = slippage_math::minimum_output(amount_out, self.slippage_bps);
        if let Err(err) = &result {
            debug!("no minimum output for quote {:?}: {}", amount_out, err);
        }
        result
    }

    /// Slippage bound for `quote`, at `tolerance_bps` or the configured
    /// default.
    pub fn slippage_bound(
        &self,
        quote: &Quote,
        tolerance_bps: Option<u32>,
    ) -> Result<SlippageBound, Error> {
        let tolerance_bps = tolerance_bps.unwrap_or(self.slippage_bps);
        let bound = SlippageBound::from_quote(quote, tolerance_bps)?;
        trace!(
            "amount out {} at {} bps -> minimum {}",
            quote.amount_out,
            tolerance_bps,
            bound.amount_out_minimum
        );
        Ok(bound)
    }

    /// `true` when swapping in `direction` sells the pool's `token0`.
    #[inline]
    pub fn zero_for_one(&self, direction: SwapDirection) -> bool {
        (direction == SwapDirection::BaseToQuote) != self.invert
    }

    /// Sqrt price limit for a swap in `direction` at `tolerance_bps`.
    pub fn sqrt_price_limit(
        &self,
        sqrt_price_x96: U256,
        direction: SwapDirection,
        tolerance_bps: u32,
    ) -> Result<U256, Error> {
        slippage_math::sqrt_price_limit(sqrt_price_x96, self.zero_for_one(direction), tolerance_bps)
    }

    /// Router arguments for selling `quote.amount_in` in `direction`.
    ///
    /// The deadline is `now_secs` plus the configured window. The quote's
    /// decimals must match the tokens it claims to trade. No price limit is
    /// set; use [`Self::sqrt_price_limit`] to add one.
    pub fn exact_input_single(
        &self,
        quote: &Quote,
        direction: SwapDirection,
        recipient: Address,
        now_secs: u64,
        tolerance_bps: Option<u32>,
    ) -> Result<ExactInputSingleParams, Error> {
        let (token_in, token_out) = match direction {
            SwapDirection::BaseToQuote => (self.base, self.quote),
            SwapDirection::QuoteToBase => (self.quote, self.base),
        };

        for (token, actual) in [(token_in, quote.decimals_in), (token_out, quote.decimals_out)] {
            if token.decimals != actual {
                return Err(InputError::DecimalsMismatch {
                    expected: token.decimals,
                    actual,
                }
                .into());
            }
        }

        let bound = self.slippage_bound(quote, tolerance_bps)?;

        Ok(ExactInputSingleParams {
            token_in: token_in.address,
            token_out: token_out.address,
            fee: self.fee_pips,
            recipient,
            deadline: now_secs.saturating_add(self.deadline_secs),
            amount_in: quote.amount_in,
            amount_out_minimum: bound.amount_out_minimum,
            sqrt_price_limit_x96: U256::ZERO,
        })
    }
}
