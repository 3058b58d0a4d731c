//! Shared numeric building blocks.

pub mod buffer;
pub mod math;

pub use buffer::RollingBuffer;
