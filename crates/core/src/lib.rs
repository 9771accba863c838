//! Core data types for the smart money bot.
//!
//! Holds the per-token buyer sets gathered by scans and computes the
//! wallets common to all of them.

pub mod address;
pub mod error;
pub mod overlap;
pub mod store;

pub use address::*;
pub use error::*;
pub use overlap::*;
pub use store::*;
