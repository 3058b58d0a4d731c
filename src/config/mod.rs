//! Engine configuration: defaults, environment overlay.

use serde::{Deserialize, Serialize};
use std::env;
use std::str::FromStr;
use thiserror::Error;
use tracing::{debug, warn};

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("invalid value for {key}: {value:?}")]
    InvalidValue { key: String, value: String },
}

/// Deployment environment from `APP_ENV` (default `sandbox`).
pub fn get_environment() -> String {
    env::var("APP_ENV").unwrap_or_else(|_| "sandbox".to_string())
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct RsiConfig {
    pub period: usize,
    pub overbought: f64,
    pub oversold: f64,
}

impl Default for RsiConfig {
    fn default() -> Self {
        Self {
            period: 14,
            overbought: 70.0,
            oversold: 30.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MacdConfig {
    pub fast_period: usize,
    pub slow_period: usize,
    pub signal_period: usize,
}

impl Default for MacdConfig {
    fn default() -> Self {
        Self {
            fast_period: 12,
            slow_period: 26,
            signal_period: 9,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct BollingerConfig {
    pub period: usize,
    pub std_dev: f64,
}

impl Default for BollingerConfig {
    fn default() -> Self {
        Self {
            period: 20,
            std_dev: 2.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct SuperTrendConfig {
    pub period: usize,
    pub multiplier: f64,
}

impl Default for SuperTrendConfig {
    fn default() -> Self {
        Self {
            period: 10,
            multiplier: 3.0,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct MlmiConfig {
    /// k of the nearest-neighbour vote
    pub num_neighbors: usize,
    /// WMA window applied to both RSI features; also the minimum number of
    /// bars before a prediction is made
    pub momentum_window: usize,
    /// Training samples retained; the oldest are evicted first
    pub max_samples: usize,
}

impl Default for MlmiConfig {
    fn default() -> Self {
        Self {
            num_neighbors: 200,
            momentum_window: 20,
            max_samples: 10_000,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct DivergenceConfig {
    pub lookback_period: usize,
    pub correlation_threshold: f64,
    pub divergence_threshold: f64,
}

impl Default for DivergenceConfig {
    fn default() -> Self {
        Self {
            lookback_period: 20,
            correlation_threshold: 0.7,
            divergence_threshold: 0.2,
        }
    }
}

/// Parameters of the indicators registered by default.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct IndicatorConfig {
    pub sma_period: usize,
    pub ema_period: usize,
    pub atr_period: usize,
    pub rsi: RsiConfig,
    pub macd: MacdConfig,
    pub bollinger: BollingerConfig,
    pub supertrend: SuperTrendConfig,
    pub mlmi: MlmiConfig,
    pub divergence: DivergenceConfig,
}

impl Default for IndicatorConfig {
    fn default() -> Self {
        Self {
            sma_period: 20,
            ema_period: 20,
            atr_period: 14,
            rsi: RsiConfig::default(),
            macd: MacdConfig::default(),
            bollinger: BollingerConfig::default(),
            supertrend: SuperTrendConfig::default(),
            mlmi: MlmiConfig::default(),
            divergence: DivergenceConfig::default(),
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct LeverageConfig {
    pub capital: f64,
    pub max_leverage: f64,
    /// Fraction of capital put at risk by a full-strength signal
    pub default_risk_per_trade: f64,
    /// Scale risk capital inversely to volatility
    pub vol_based_sizing: bool,
    /// Volatility used in place of anything smaller
    pub volatility_floor: f64,
    /// Decisions kept in the leverage history
    pub history_capacity: usize,
}

impl Default for LeverageConfig {
    fn default() -> Self {
        Self {
            capital: 100_000.0,
            max_leverage: 5.0,
            default_risk_per_trade: 0.02,
            vol_based_sizing: true,
            volatility_floor: 1e-4,
            history_capacity: 100,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    pub indicators: IndicatorConfig,
    pub leverage: LeverageConfig,
    /// Share of tallied agents that must agree for a consensus
    pub consensus_threshold: f64,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            indicators: IndicatorConfig::default(),
            leverage: LeverageConfig::default(),
            consensus_threshold: 0.75,
        }
    }
}

impl EngineConfig {
    /// Defaults overlaid with `SIGNALMESH_*` environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        Self::from_lookup(|key| env::var(key).ok())
    }

    /// Defaults overlaid with values from `lookup`; absent keys keep their
    /// default.
    pub fn from_lookup<F>(lookup: F) -> Result<Self, ConfigError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let mut config = Self::default();
        let leverage = &mut config.leverage;
        overlay(&lookup, "SIGNALMESH_CAPITAL", &mut leverage.capital)?;
        overlay(&lookup, "SIGNALMESH_MAX_LEVERAGE", &mut leverage.max_leverage)?;
        overlay(&lookup, "SIGNALMESH_RISK_PER_TRADE", &mut leverage.default_risk_per_trade)?;
        overlay(&lookup, "SIGNALMESH_VOL_SIZING", &mut leverage.vol_based_sizing)?;

        let indicators = &mut config.indicators;
        overlay(&lookup, "SIGNALMESH_MLMI_NEIGHBORS", &mut indicators.mlmi.num_neighbors)?;
        overlay(&lookup, "SIGNALMESH_MLMI_WINDOW", &mut indicators.mlmi.momentum_window)?;
        overlay(&lookup, "SIGNALMESH_MLMI_MAX_SAMPLES", &mut indicators.mlmi.max_samples)?;
        overlay(&lookup, "SIGNALMESH_PAIR_LOOKBACK", &mut indicators.divergence.lookback_period)?;

        overlay(&lookup, "SIGNALMESH_CONSENSUS_THRESHOLD", &mut config.consensus_threshold)?;
        Ok(config)
    }
}

fn overlay<F, T>(lookup: &F, key: &str, target: &mut T) -> Result<(), ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    let Some(raw) = lookup(key) else {
        return Ok(());
    };
    *target = match raw.trim().parse() {
        Ok(value) => value,
        Err(_) => {
            warn!(key, value = %raw, "Invalid config override");
            return Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            });
        }
    };
    debug!(key, value = %raw, "Config override applied");
    Ok(())
}
