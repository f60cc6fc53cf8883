pub mod math_helpers;
pub mod price_math;
pub mod slippage_math;
pub mod tick_math;
