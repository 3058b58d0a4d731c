//! Momentum indicators: RSI, MACD, MLMI

pub mod macd;
pub mod mlmi;
pub mod rsi;

pub use macd::*;
pub use mlmi::*;
pub use rsi::*;
