use crate::error::{Error, UnavailableError};
use crate::math::math_helpers::pow10;
use crate::math::slippage_math::minimum_output;
use crate::rate::ExchangeRate;
use crate::token::check_decimals;
use crate::U1024;
use alloy_primitives::{Address, U256};

/// Which side of a base/quote pair is being sold.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum SwapDirection {
    /// Sell base, receive quote.
    BaseToQuote,
    /// Sell quote, receive base.
    QuoteToBase,
}

/// An exact-input quote: `amount_in` of one token buys `amount_out` of the
/// other, both in smallest units.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Quote {
    pub amount_in: U256,
    pub amount_out: U256,
    pub decimals_in: u8,
    pub decimals_out: u8,
}

impl Quote {
    pub fn new(
        amount_in: U256,
        amount_out: U256,
        decimals_in: u8,
        decimals_out: u8,
    ) -> Result<Self, Error> {
        Ok(Self {
            amount_in,
            amount_out,
            decimals_in: check_decimals(decimals_in)?,
            decimals_out: check_decimals(decimals_out)?,
        })
    }

    /// Output tokens received per input token, decimals adjusted.
    ///
    /// Includes the pool fee and price impact, unlike the pool's spot rate.
    pub fn execution_rate(&self) -> Result<ExchangeRate, Error> {
        if self.amount_in.is_zero() || self.amount_out.is_zero() {
            return Err(UnavailableError::Quote.into());
        }

        let numerator = U1024::from(self.amount_out) * pow10(u32::from(self.decimals_in));
        let denominator = U1024::from(self.amount_in) * pow10(u32::from(self.decimals_out));
        Ok(ExchangeRate::from_ratio(numerator, denominator)?)
    }

    /// [`minimum_output`] of this quote's `amount_out`.
    #[inline]
    pub fn minimum_output(&self, tolerance_bps: u32) -> Result<U256, Error> {
        minimum_output(Some(self.amount_out), tolerance_bps)
    }
}

/// The on-chain guard derived from a quote.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct SlippageBound {
    pub tolerance_bps: u32,
    pub amount_out_minimum: U256,
}

impl SlippageBound {
    pub fn from_quote(quote: &Quote, tolerance_bps: u32) -> Result<Self, Error> {
        Ok(Self {
            tolerance_bps,
            amount_out_minimum: quote.minimum_output(tolerance_bps)?,
        })
    }
}

/// Arguments of the router's `exactInputSingle`. Only assembled here;
/// submitting the transaction is left to the caller's wallet stack.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct ExactInputSingleParams {
    pub token_in: Address,
    pub token_out: Address,
    /// Fee tier in hundredths of a bip (`uint24` on chain).
    pub fee: u32,
    pub recipient: Address,
    /// Unix timestamp after which the router rejects the swap.
    pub deadline: u64,
    pub amount_in: U256,
    pub amount_out_minimum: U256,
    /// `0` for no limit.
    pub sqrt_price_limit_x96: U256,
}
