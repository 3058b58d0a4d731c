//! Pair indicators over two aligned asset series

pub mod divergence;

pub use divergence::*;
