//! # Type Definitions
//!
//! JSON-shaped entities held by the vault store.

pub mod notification;
pub mod position;
pub mod price;
pub mod vault;

pub use notification::*;
pub use position::*;
pub use price::*;
pub use vault::*;
