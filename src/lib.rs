//! Technical-analysis signal engine: indicator registry, MLMI momentum
//! predictor, cross-asset divergence detection, leverage sizing and
//! agent-signal aggregation.

pub mod common;
pub mod config;
pub mod core;
pub mod indicators;
pub mod logging;
pub mod metrics;
pub mod models;
pub mod signals;
pub mod sizing;
