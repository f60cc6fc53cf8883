use thiserror::Error;

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum MathError {
    #[error("Math error - overflow")]
    Overflow,
    #[error("Math error - division by zero")]
    DivisionByZero,
}

#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum StateError {
    #[error("State error - sqrtPrice out of bounds")]
    SqrtPriceOutOfBounds,
    #[error("State error - tick out of bounds")]
    TickOutOfBounds,
}

/// Upstream data that has not been fetched yet, or came back empty.
///
/// Callers must treat this as "block the dependent action", never as zero.
#[derive(Debug, Error, Clone, Copy, PartialEq, Eq)]
pub enum UnavailableError {
    #[error("Unavailable - no price, sqrtPriceX96 is 0")]
    Price,
    #[error("Unavailable - no quote for the requested amount")]
    Quote,
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum InputError {
    #[error("Invalid input - price must be positive and finite")]
    NonPositivePrice,
    #[error("Invalid input - malformed price `{0}`")]
    MalformedPrice(String),
    #[error("Invalid input - price outside the representable tick range")]
    PriceOutOfRange,
    #[error("Invalid input - sqrtPriceX96 does not fit in 160 bits")]
    SqrtPriceOutOfRange,
    #[error("Invalid input - tick spacing must be positive, got {0}")]
    NonPositiveTickSpacing(i32),
    #[error("Invalid input - tick {0} outside [MIN_TICK, MAX_TICK]")]
    TickOutOfBounds(i32),
    #[error("Invalid input - slippage tolerance {0} bps exceeds 10000")]
    ToleranceOutOfRange(u32),
    #[error("Invalid input - {0} token decimals exceeds the supported maximum")]
    DecimalsOutOfRange(u8),
    #[error("Invalid input - malformed token amount `{0}`")]
    MalformedAmount(String),
    #[error("Invalid input - no default tick spacing for fee tier {0}")]
    UnknownFeeTier(u32),
    #[error("Invalid input - quote uses {actual} decimals but the token has {expected}")]
    DecimalsMismatch { expected: u8, actual: u8 },
}

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Config error - failed to read config file: {0}")]
    Io(#[from] std::io::Error),
    #[error("Config error - failed to parse config: {0}")]
    Parse(#[from] serde_json::Error),
    #[error(transparent)]
    Invalid(#[from] InputError),
}

#[cfg(feature = "onchain")]
#[derive(Debug, Error)]
pub enum OnchainError {
    #[error("Onchain error - failed to get slot0: {0}")]
    FailedToGetSlot0(String),
    #[error("Onchain error - failed to get tick spacing: {0}")]
    FailedToGetTickSpacing(String),
    #[error("Onchain error - failed to get quote: {0}")]
    FailedToGetQuote(String),
    #[error("Onchain error - failed to get token decimals: {0}")]
    FailedToGetDecimals(String),
}

#[derive(Debug, Error)]
pub enum Error {
    #[error(transparent)]
    Unavailable(#[from] UnavailableError),

    #[error(transparent)]
    InvalidInput(#[from] InputError),

    #[error(transparent)]
    MathError(#[from] MathError),

    #[error(transparent)]
    StateError(#[from] StateError),
}

impl Error {
    /// `true` when the failure is missing upstream data rather than bad input.
    pub fn is_unavailable(&self) -> bool {
        matches!(self, Error::Unavailable(_))
    }

    /// `true` when the caller handed in something outside the domain.
    pub fn is_invalid_input(&self) -> bool {
        matches!(self, Error::InvalidInput(_))
    }
}
