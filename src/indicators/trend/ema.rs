//! EMA (Exponential Moving Average) indicator

use crate::common::{math, RollingBuffer};
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{closes, expect_candles, Indicator};
use crate::models::indicators::{IndicatorOutput, MarketData, MovingAverageOutput};

/// Span EMA of closes, seeded with the first close of the series.
#[derive(Debug, Clone)]
pub struct Ema {
    period: usize,
    history: RollingBuffer<f64>,
}

impl Ema {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("EMA", "period", period)?;
        Ok(Self {
            period,
            history: RollingBuffer::new(period),
        })
    }

    pub fn period(&self) -> usize {
        self.period
    }

    pub fn history(&self) -> &RollingBuffer<f64> {
        &self.history
    }
}

impl Indicator for Ema {
    fn name(&self) -> &str {
        "EMA"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.period {
            return Ok(IndicatorOutput::Ema(MovingAverageOutput {
                value: 0.0,
                period: self.period,
            }));
        }

        let value = math::last(&math::ema_series(&closes(candles), self.period));
        self.history.push(value);

        Ok(IndicatorOutput::Ema(MovingAverageOutput {
            value,
            period: self.period,
        }))
    }
}
