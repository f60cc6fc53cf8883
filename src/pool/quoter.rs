use crate::error::OnchainError;
use crate::pool::v3_pool::OnchainProvider;
use crate::quote::Quote;
use crate::token::TokenDescriptor;
use alloy_primitives::aliases::{U160, U24};
use alloy_primitives::{address, Address, BlockNumber, U256};
use alloy_provider::Provider;
use alloy_sol_macro::sol;
use std::marker::PhantomData;
use tracing::debug;

/// Uniswap V3 `Quoter` on Ethereum mainnet.
pub const MAINNET_QUOTER: Address = address!("b27308f9f90d607463bb33ea1bebb41c27ce5ab6");

sol! {
    #[sol(rpc)]
    interface IQuoter {
        function quoteExactInputSingle(
            address tokenIn,
            address tokenOut,
            uint24 fee,
            uint256 amountIn,
            uint160 sqrtPriceLimitX96
        ) external returns (uint256 amountOut);
    }

    #[sol(rpc)]
    interface IERC20Metadata {
        function decimals() external view returns (uint8);
    }
}

/// Read-only access to the quoter contract and token metadata.
#[derive(Clone, Debug)]
pub struct Quoter<P> {
    provider: OnchainProvider<P>,
    pub contract: IQuoter::IQuoterInstance<OnchainProvider<P>>,
    _marker: PhantomData<P>,
}

impl<P> Quoter<P>
where
    P: Provider + Send + Sync + 'static,
{
    pub fn new(quoter_address: Address, provider: OnchainProvider<P>) -> Self {
        let contract = IQuoter::IQuoterInstance::new(quoter_address, provider.clone());
        Self {
            provider,
            contract,
            _marker: PhantomData,
        }
    }

    pub fn mainnet(provider: OnchainProvider<P>) -> Self {
        Self::new(MAINNET_QUOTER, provider)
    }

    /// Simulates an exact-input swap of `amount_in` through the `fee_pips`
    /// pool, without a price limit.
    ///
    /// A zero `amount_out` is passed through as is; turning it into a
    /// slippage bound fails with `Unavailable`.
    pub async fn quote_exact_input_single(
        &self,
        token_in: &TokenDescriptor,
        token_out: &TokenDescriptor,
        fee_pips: u32,
        amount_in: U256,
        block_number: Option<BlockNumber>,
    ) -> Result<Quote, OnchainError> {
        let fee = U24::try_from(fee_pips)
            .map_err(|e| OnchainError::FailedToGetQuote(e.to_string()))?;

        let mut call = self.contract.quoteExactInputSingle(
            token_in.address,
            token_out.address,
            fee,
            amount_in,
            U160::ZERO,
        );

        if let Some(bn) = block_number {
            call = call.block(bn.into());
        }

        let amount_out = call
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetQuote(e.to_string()))?;

        debug!(
            "quote {} {} -> {} {} (fee {})",
            amount_in, token_in.address, amount_out, token_out.address, fee_pips
        );

        Quote::new(amount_in, amount_out, token_in.decimals, token_out.decimals)
            .map_err(|e| OnchainError::FailedToGetQuote(e.to_string()))
    }

    /// Reads an ERC-20 token's `decimals()`.
    pub async fn fetch_decimals(&self, token: Address) -> Result<u8, OnchainError> {
        let decimals = IERC20Metadata::new(token, self.provider.clone())
            .decimals()
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetDecimals(e.to_string()))?;

        debug!("token {} has {} decimals", token, decimals);
        Ok(decimals)
    }

    /// Builds a validated descriptor from the token's on-chain decimals.
    pub async fn fetch_descriptor(&self, token: Address) -> Result<TokenDescriptor, OnchainError> {
        let decimals = self.fetch_decimals(token).await?;
        TokenDescriptor::new(token, decimals)
            .map_err(|e| OnchainError::FailedToGetDecimals(e.to_string()))
    }
}
