//! RSI (Relative Strength Index) indicator

use crate::common::{math, RollingBuffer};
use crate::config::RsiConfig;
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{closes, expect_candles, Indicator};
use crate::models::indicators::{IndicatorOutput, MarketData, RsiOutput};
use crate::models::signal::SignalDirection;

/// RSI = 100 - (100 / (1 + RS))
/// RS = Average Gain / Average Loss
///
/// Averages are plain rolling means. A window without losses is not special
/// cased: it reads 100 with gains and `NaN` when flat.
#[derive(Debug, Clone)]
pub struct Rsi {
    period: usize,
    overbought: f64,
    oversold: f64,
    history: RollingBuffer<f64>,
}

impl Rsi {
    pub fn new(period: usize, overbought: f64, oversold: f64) -> Result<Self, IndicatorError> {
        let period = require_period("RSI", "period", period)?;
        if !(oversold < overbought) {
            return Err(IndicatorError::invalid_params(format!(
                "RSI oversold ({oversold}) must be below overbought ({overbought})"
            )));
        }
        Ok(Self {
            period,
            overbought,
            oversold,
            history: RollingBuffer::new(period),
        })
    }

    pub fn from_config(config: &RsiConfig) -> Result<Self, IndicatorError> {
        Self::new(config.period, config.overbought, config.oversold)
    }

    pub fn history(&self) -> &RollingBuffer<f64> {
        &self.history
    }

    fn classify(&self, value: f64) -> Option<SignalDirection> {
        if value > self.overbought {
            Some(SignalDirection::Sell)
        } else if value < self.oversold {
            Some(SignalDirection::Buy)
        } else {
            None
        }
    }
}

impl Indicator for Rsi {
    fn name(&self) -> &str {
        "RSI"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.period {
            return Ok(IndicatorOutput::Rsi(RsiOutput {
                value: 0.0,
                period: self.period,
                signal: None,
            }));
        }

        let value = math::last(&math::rsi_series(&closes(candles), self.period));
        self.history.push(value);

        Ok(IndicatorOutput::Rsi(RsiOutput {
            value,
            period: self.period,
            signal: self.classify(value),
        }))
    }
}
