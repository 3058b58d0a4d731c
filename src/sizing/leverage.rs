//! Volatility-aware position sizing capped at a maximum leverage

use std::collections::HashMap;
use thiserror::Error;
use tracing::{debug, info};

use crate::common::RollingBuffer;
use crate::config::LeverageConfig;
use crate::models::position::{LeverageDecision, RiskMetrics};

#[derive(Debug, Error)]
pub enum SizingError {
    #[error("invalid sizing input: {0}")]
    InvalidInput(String),
}

/// Default exchange margin requirement as a fraction of notional.
pub const DEFAULT_MARGIN_REQUIREMENT: f64 = 0.1;

pub struct LeverageSizer {
    config: LeverageConfig,
    positions: HashMap<String, LeverageDecision>,
    leverage_history: RollingBuffer<f64>,
    risk_metrics: RiskMetrics,
}

impl LeverageSizer {
    pub fn new(config: LeverageConfig) -> Result<Self, SizingError> {
        validate_config(&config)?;
        let leverage_history = RollingBuffer::new(config.history_capacity);
        Ok(Self {
            config,
            positions: HashMap::new(),
            leverage_history,
            risk_metrics: RiskMetrics::default(),
        })
    }

    pub fn config(&self) -> &LeverageConfig {
        &self.config
    }

    pub fn capital(&self) -> f64 {
        self.config.capital
    }

    pub fn set_capital(&mut self, capital: f64) -> Result<(), SizingError> {
        if !(capital.is_finite() && capital > 0.0) {
            return Err(SizingError::InvalidInput(format!(
                "capital must be finite and > 0, got {capital}"
            )));
        }
        info!(capital, "Sizer capital updated");
        self.config.capital = capital;
        Ok(())
    }

    /// Capital put at risk before conversion to units and before the
    /// leverage cap.
    pub fn risk_capital_for(&self, signal_strength: f64, volatility: f64) -> f64 {
        let base = self.config.capital * self.config.default_risk_per_trade * signal_strength.abs();
        if self.config.vol_based_sizing {
            base / volatility.max(self.config.volatility_floor)
        } else {
            base
        }
    }

    /// Size an order for `instrument`.
    ///
    /// Units are `risk_capital / (price * margin_requirement)`, scaled down
    /// when the implied leverage `units * price / capital` would exceed
    /// `max_leverage`. The sign of the position follows `signal_strength`.
    pub fn size_position(
        &mut self,
        instrument: &str,
        signal_strength: f64,
        price: f64,
        volatility: f64,
        margin_requirement: f64,
    ) -> Result<LeverageDecision, SizingError> {
        if !(price.is_finite() && price > 0.0) {
            return Err(SizingError::InvalidInput(format!(
                "price must be finite and > 0, got {price}"
            )));
        }
        if !(margin_requirement.is_finite() && margin_requirement > 0.0) {
            return Err(SizingError::InvalidInput(format!(
                "margin_requirement must be finite and > 0, got {margin_requirement}"
            )));
        }
        if !signal_strength.is_finite() || !volatility.is_finite() {
            return Err(SizingError::InvalidInput(
                "signal_strength and volatility must be finite".to_string(),
            ));
        }

        let capital = self.config.capital;
        let max_leverage = self.config.max_leverage;
        let risk_capital = self.risk_capital_for(signal_strength, volatility);

        let mut units = risk_capital.abs() / (price * margin_requirement);
        let mut leverage = units * price / capital;
        if leverage > max_leverage {
            units = max_leverage * capital / price;
            leverage = max_leverage;
        }
        let leverage = leverage.clamp(0.0, max_leverage);

        let position_size = if signal_strength < 0.0 { -units } else { units };
        let decision = LeverageDecision {
            instrument: instrument.to_string(),
            position_size,
            leverage_used: leverage,
        };

        debug!(
            instrument,
            signal_strength,
            volatility,
            risk_capital,
            position_size,
            leverage,
            "Position sized"
        );
        self.leverage_history.push(leverage);
        self.positions.insert(instrument.to_string(), decision.clone());
        Ok(decision)
    }

    /// Latest decision made for `instrument`.
    pub fn position(&self, instrument: &str) -> Option<&LeverageDecision> {
        self.positions.get(instrument)
    }

    /// Leverage of recent decisions, oldest first.
    pub fn leverage_history(&self) -> &RollingBuffer<f64> {
        &self.leverage_history
    }

    pub fn risk_metrics(&self) -> &RiskMetrics {
        &self.risk_metrics
    }

    /// Replace the externally maintained risk figures. `max_drawdown` keeps
    /// the worst drawdown seen so far.
    pub fn update_risk_metrics(&mut self, metrics: RiskMetrics) {
        let max_drawdown = self
            .risk_metrics
            .max_drawdown
            .max(metrics.max_drawdown)
            .max(metrics.drawdown);
        self.risk_metrics = RiskMetrics {
            max_drawdown,
            ..metrics
        };
    }
}

/// Reject settings under which the leverage cap or the volatility floor
/// would not hold.
fn validate_config(config: &LeverageConfig) -> Result<(), SizingError> {
    if !(config.capital.is_finite() && config.capital > 0.0) {
        return Err(SizingError::InvalidInput(format!(
            "capital must be finite and > 0, got {}",
            config.capital
        )));
    }
    if !(config.max_leverage.is_finite() && config.max_leverage >= 0.0) {
        return Err(SizingError::InvalidInput(format!(
            "max_leverage must be finite and >= 0, got {}",
            config.max_leverage
        )));
    }
    if !(0.0..=1.0).contains(&config.default_risk_per_trade) {
        return Err(SizingError::InvalidInput(format!(
            "default_risk_per_trade must be within [0, 1], got {}",
            config.default_risk_per_trade
        )));
    }
    if !(config.volatility_floor.is_finite() && config.volatility_floor > 0.0) {
        return Err(SizingError::InvalidInput(format!(
            "volatility_floor must be finite and > 0, got {}",
            config.volatility_floor
        )));
    }
    Ok(())
}
