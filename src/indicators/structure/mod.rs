//! Price-structure indicators

pub mod supertrend;

pub use supertrend::*;
