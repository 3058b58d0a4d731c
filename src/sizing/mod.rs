//! Position sizing from signal strength and volatility.

pub mod leverage;

pub use leverage::*;
