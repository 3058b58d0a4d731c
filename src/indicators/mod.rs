pub mod error;
pub mod registry;

pub mod momentum;
pub mod pair;
pub mod structure;
pub mod trend;
pub mod volatility;

pub use error::IndicatorError;
pub use registry::*;
