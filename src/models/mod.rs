//! Shared data models spanning the engine layers.

pub mod indicators;
pub mod position;
pub mod signal;

pub use indicators::{
    AtrOutput, BollingerOutput, Candle, DivergenceOutput, IndicatorOutput, MacdOutput,
    MarketData, MlmiOutput, MovingAverageOutput, PairBar, RsiOutput, SuperTrendOutput,
};
pub use position::{LeverageDecision, RiskMetrics};
pub use signal::{
    AgentSignal, AggregatedSignal, SentimentSummary, Signal, SignalDirection,
};
