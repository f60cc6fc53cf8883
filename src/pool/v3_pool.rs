use crate::engine::{PairRates, PriceTickEngine};
use crate::error::Error;
#[cfg(feature = "onchain")]
use crate::error::OnchainError;
use crate::rate::ExchangeRate;
use crate::token::address_to_u160;
#[cfg(feature = "onchain")]
use alloy_primitives::BlockNumber;
use alloy_primitives::{Address, U256};
use std::marker::PhantomData;
use std::sync::Arc;
#[cfg(feature = "onchain")]
use tracing::debug;

#[cfg(feature = "onchain")]
use alloy_provider::Provider;
#[cfg(feature = "onchain")]
use alloy_sol_macro::sol;

#[cfg(feature = "onchain")]
sol! {
    #[sol(rpc)]
    interface IV3Pool {
        function tickSpacing() external view returns (int24);
        function slot0() external view returns (
            uint160 sqrtPriceX96,
            int24 tick,
            uint16 observationIndex,
            uint16 observationCardinality,
            uint16 observationCardinalityNext,
            uint8 feeProtocol,
            bool unlocked
        );
    }
}

pub type OnchainProvider<P> = Arc<P>;

/// The part of a pool's `slot0` the price math needs.
#[derive(Copy, Clone, Debug, Default, PartialEq, Eq)]
pub struct Slot0 {
    pub sqrt_price_x96: U256,
    pub tick: i32,
}

impl Slot0 {
    /// A pool that has never been initialized reports a zero sqrt price.
    #[inline]
    pub fn has_price(&self) -> bool {
        !self.sqrt_price_x96.is_zero()
    }
}

/// Snapshot of the pool state a swap screen prices against.
#[derive(Clone, Debug)]
pub struct V3Pool<P> {
    pub pool_address: Address,
    pub token0: Address,
    pub token1: Address,
    pub fee_pips: u32,
    pub slot0: Slot0,
    pub tick_spacing: i32,
    _marker: PhantomData<P>,
    #[cfg(feature = "onchain")]
    pub contract: IV3Pool::IV3PoolInstance<OnchainProvider<P>>,
}

#[inline]
fn pool_order(a: Address, b: Address) -> (Address, Address) {
    if address_to_u160(a) <= address_to_u160(b) {
        (a, b)
    } else {
        (b, a)
    }
}

impl<P> V3Pool<P> {
    #[cfg(not(feature = "onchain"))]
    /// In-memory pool; `slot0` and `tick_spacing` are filled in by the caller.
    pub fn new(pool_address: Address, token0: Address, token1: Address, fee_pips: u32) -> Self {
        let (token0, token1) = pool_order(token0, token1);

        Self {
            pool_address,
            token0,
            token1,
            fee_pips,
            slot0: Slot0::default(),
            tick_spacing: 0i32,
            _marker: PhantomData,
        }
    }

    /// Quote per base at the snapshot's sqrt price, per `engine`'s pair.
    pub fn price(&self, engine: &PriceTickEngine) -> Result<ExchangeRate, Error> {
        engine.decode_price(self.slot0.sqrt_price_x96)
    }

    pub fn pair_rates(&self, engine: &PriceTickEngine) -> Result<PairRates, Error> {
        engine.pair_rates(self.slot0.sqrt_price_x96)
    }
}

#[cfg(feature = "onchain")]
impl<P> V3Pool<P>
where
    P: Provider + Send + Sync + 'static,
{
    /// Pool bound to an on-chain provider. State stays empty until one of
    /// the fetch helpers runs.
    pub fn new(
        pool_address: Address,
        token0: Address,
        token1: Address,
        fee_pips: u32,
        provider: OnchainProvider<P>,
    ) -> Self {
        let (token0, token1) = pool_order(token0, token1);
        let contract = IV3Pool::IV3PoolInstance::new(pool_address, provider);

        Self {
            pool_address,
            token0,
            token1,
            fee_pips,
            slot0: Slot0::default(),
            tick_spacing: 0i32,
            _marker: PhantomData,
            contract,
        }
    }

    /// Reads `tickSpacing` at the given block, or the latest one.
    pub async fn fetch_tick_spacing(
        &self,
        block_number: Option<BlockNumber>,
    ) -> Result<i32, OnchainError> {
        let mut call = self.contract.tickSpacing();

        if let Some(bn) = block_number {
            call = call.block(bn.into());
        }

        let tick_spacing = call
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetTickSpacing(e.to_string()))?;

        debug!("pool {} tick spacing {}", self.pool_address, tick_spacing);
        Ok(tick_spacing.as_i32())
    }

    /// Reads `slot0` at the given block, or the latest one.
    pub async fn fetch_slot0(
        &self,
        block_number: Option<BlockNumber>,
    ) -> Result<Slot0, OnchainError> {
        let mut call = self.contract.slot0();

        if let Some(bn) = block_number {
            call = call.block(bn.into());
        }

        let slot0 = call
            .call()
            .await
            .map_err(|e| OnchainError::FailedToGetSlot0(e.to_string()))?;

        let slot0 = Slot0 {
            sqrt_price_x96: U256::from(slot0.sqrtPriceX96),
            tick: slot0.tick.as_i32(),
        };
        debug!(
            "pool {} slot0: sqrtPriceX96 {}, tick {}",
            self.pool_address, slot0.sqrt_price_x96, slot0.tick
        );
        Ok(slot0)
    }

    pub async fn update_slot0(
        &mut self,
        block_number: Option<BlockNumber>,
    ) -> Result<Slot0, OnchainError> {
        self.slot0 = self.fetch_slot0(block_number).await?;
        Ok(self.slot0)
    }

    /// Fetches `slot0` and `tickSpacing` concurrently and stores both.
    pub async fn refresh(&mut self, block_number: Option<BlockNumber>) -> Result<(), OnchainError> {
        let (slot0, spacing) = futures::try_join!(
            self.fetch_slot0(block_number),
            self.fetch_tick_spacing(block_number)
        )?;

        self.slot0 = slot0;
        self.tick_spacing = spacing;

        Ok(())
    }

    pub async fn refresh_latest(&mut self) -> Result<(), OnchainError> {
        self.refresh(None).await
    }
}
