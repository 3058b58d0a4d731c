//! ATR (Average True Range) indicator

use crate::common::{math, RollingBuffer};
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{expect_candles, Indicator};
use crate::models::indicators::{AtrOutput, IndicatorOutput, MarketData};

/// Rolling mean of the true range over `period` bars. Measures volatility;
/// never directional.
#[derive(Debug, Clone)]
pub struct Atr {
    period: usize,
    history: RollingBuffer<f64>,
}

impl Atr {
    pub fn new(period: usize) -> Result<Self, IndicatorError> {
        let period = require_period("ATR", "period", period)?;
        Ok(Self {
            period,
            history: RollingBuffer::new(period),
        })
    }

    pub fn history(&self) -> &RollingBuffer<f64> {
        &self.history
    }
}

impl Indicator for Atr {
    fn name(&self) -> &str {
        "ATR"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.period + 1 {
            return Ok(IndicatorOutput::Atr(AtrOutput {
                value: 0.0,
                period: self.period,
            }));
        }

        let tr_values: Vec<f64> = candles
            .windows(2)
            .map(|pair| math::true_range(pair[1].high, pair[1].low, pair[0].close))
            .collect();
        let value = math::mean(tr_values[tr_values.len() - self.period..].iter().copied());
        self.history.push(value);

        Ok(IndicatorOutput::Atr(AtrOutput {
            value,
            period: self.period,
        }))
    }
}
