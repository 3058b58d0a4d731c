//! SMA (Simple Moving Average) indicator

use crate::common::{math, RollingBuffer};
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{closes, expect_candles, Indicator};
use crate::models::indicators::{IndicatorOutput, MarketData, MovingAverageOutput};

/// Arithmetic mean of the last `period` closes.
#[derive(Debug, Clone)]
pub struct Sma {
    period: usize,
    history: RollingBuffer<f64>,
}

impl Sma {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("SMA", "period", period)?;
        Ok(Self {
            period,
            history: RollingBuffer::new(period),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    /// Values produced by recent calls, oldest first.
    pub fn history(&self) -> &RollingBuffer<f64> {
        &self.history
    }
}

impl Indicator for Sma {
    fn name(&self) -> &str {
        "SMA"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.period {
            return Ok(IndicatorOutput::Sma(MovingAverageOutput {
                value: 0.0,
                period: self.period,
            }));
        }

        let closes = closes(&candles[candles.len() - self.period..]);
        let value = math::mean(closes);
        self.history.push(value);

        Ok(IndicatorOutput::Sma(MovingAverageOutput {
            value,
            period: self.period,
        }))
    }
}
