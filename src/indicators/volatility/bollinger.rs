//! Bollinger Bands indicator

use crate::common::{math, RollingBuffer};
use crate::config::BollingerConfig;
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{expect_candles, Indicator};
use crate::models::indicators::{BollingerOutput, IndicatorOutput, MarketData};
use crate::models::signal::SignalDirection;

/// Middle Band = SMA(period) of the typical price
/// Upper Band = Middle + (std_dev * sample standard deviation)
/// Lower Band = Middle - (std_dev * sample standard deviation)
#[derive(Debug, Clone)]
pub struct BollingerBands {
    period: usize,
    std_dev: f64,
    middle_history: RollingBuffer<f64>,
}

impl BollingerBands {
    pub fn new(period: usize, std_dev: f64) -> Result<Self, IndicatorError> {
        let period = require_period("BollingerBands", "period", period)?;
        if !(std_dev > 0.0) {
            return Err(IndicatorError::invalid_params(
                "BollingerBands std_dev must be > 0",
            ));
        }
        Ok(Self {
            period,
            std_dev,
            middle_history: RollingBuffer::new(period),
        })
    }

    pub fn from_config(config: &BollingerConfig) -> Result<Self, IndicatorError> {
        Self::new(config.period, config.std_dev)
    }

    pub fn middle_history(&self) -> &RollingBuffer<f64> {
        &self.middle_history
    }
}

impl Indicator for BollingerBands {
    fn name(&self) -> &str {
        "BollingerBands"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.period {
            return Ok(IndicatorOutput::Bollinger(BollingerOutput {
                upper: 0.0,
                middle: 0.0,
                lower: 0.0,
                signal: None,
            }));
        }

        let window: Vec<f64> = candles[candles.len() - self.period..]
            .iter()
            .map(|c| c.typical_price())
            .collect();
        let middle = math::mean(window.iter().copied());
        let std = math::sample_std(&window);
        let upper = middle + self.std_dev * std;
        let lower = middle - self.std_dev * std;
        self.middle_history.push(middle);

        let close = candles[candles.len() - 1].close;
        let signal = if close > upper {
            Some(SignalDirection::Sell)
        } else if close < lower {
            Some(SignalDirection::Buy)
        } else {
            None
        };

        Ok(IndicatorOutput::Bollinger(BollingerOutput {
            upper,
            middle,
            lower,
            signal,
        }))
    }
}
