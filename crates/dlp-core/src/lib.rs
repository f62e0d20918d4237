//! # DLP Core - Vault Dashboard Numerics
//!
//! Pure, synchronous logic shared by the API service and any client that
//! renders vault data. It provides:
//!
//! - Tick <-> price conversions and tick-spacing alignment
//! - Yield, gas, rebalance, range and risk estimators
//! - Vault, user position and notification types
//! - The vault aggregation store with filtered/sorted views and portfolio totals
//!
//! Nothing in this crate performs I/O or reads chain state; values are for
//! display and recommendation and may drift from on-chain state.

pub mod constants;
pub mod errors;
pub mod math;
pub mod store;
pub mod types;

// Re-export commonly used items
pub use constants::*;
pub use errors::{CoreError, CoreResult};
pub use store::{VaultAction, VaultStore};
pub use types::*;
