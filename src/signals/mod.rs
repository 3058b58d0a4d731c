//! Signal aggregation interfaces.

pub mod aggregation;
pub mod consensus;

pub use aggregation::*;
pub use consensus::{analyze as analyze_consensus, Consensus};
