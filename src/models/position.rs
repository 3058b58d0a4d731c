use serde::{Deserialize, Serialize};

/// Sized order intent.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LeverageDecision {
    pub instrument: String,
    /// Units to trade; negative for a short intent.
    pub position_size: f64,
    pub leverage_used: f64,
}

/// Account risk figures maintained by the caller.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RiskMetrics {
    pub account_volatility: f64,
    pub drawdown: f64,
    pub sharpe: f64,
    pub max_drawdown: f64,
}
