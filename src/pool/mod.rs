#[cfg(feature = "onchain")]
pub mod quoter;
pub mod v3_pool;
