//! # Mathematical Functions
//!
//! Pure functions for tick/price conversion and the advisory estimators
//! (yield, gas, rebalance, range prediction, position risk).

pub mod gas;
pub mod optimal_range;
pub mod rebalance;
pub mod risk_assessment;
pub mod tick_math;
pub mod yield_math;

// Re-export commonly used functions
pub use gas::*;
pub use optimal_range::*;
pub use rebalance::*;
pub use risk_assessment::*;
pub use tick_math::*;
pub use yield_math::*;
