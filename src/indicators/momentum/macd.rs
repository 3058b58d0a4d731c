//! MACD (Moving Average Convergence Divergence) indicator

use crate::common::{math, RollingBuffer};
use crate::config::MacdConfig;
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{closes, expect_candles, Indicator};
use crate::models::indicators::{IndicatorOutput, MacdOutput, MarketData};
use crate::models::signal::SignalDirection;

/// MACD = EMA(fast) - EMA(slow)
/// Signal = EMA(signal) of MACD
/// Histogram = MACD - Signal
#[derive(Debug, Clone)]
pub struct Macd {
    fast_period: usize,
    slow_period: usize,
    signal_period: usize,
    histogram_history: RollingBuffer<f64>,
}

impl Macd {
    pub fn new(
        fast_period: usize,
        slow_period: usize,
        signal_period: usize,
    ) -> Result<Self, IndicatorError> {
        let fast_period = require_period("MACD", "fast_period", fast_period)?;
        let slow_period = require_period("MACD", "slow_period", slow_period)?;
        let signal_period = require_period("MACD", "signal_period", signal_period)?;
        if fast_period >= slow_period {
            return Err(IndicatorError::invalid_params(
                "MACD fast_period must be shorter than slow_period",
            ));
        }
        Ok(Self {
            fast_period,
            slow_period,
            signal_period,
            histogram_history: RollingBuffer::new(signal_period),
        })
    }

    pub fn from_config(config: &MacdConfig) -> Result<Self, IndicatorError> {
        Self::new(config.fast_period, config.slow_period, config.signal_period)
    }

    pub fn histogram_history(&self) -> &RollingBuffer<f64> {
        &self.histogram_history
    }
}

/// BUY when the histogram turns positive on the last bar, SELL when it turns
/// negative.
fn histogram_cross(previous: f64, current: f64) -> Option<SignalDirection> {
    if previous <= 0.0 && current > 0.0 {
        Some(SignalDirection::Buy)
    } else if previous >= 0.0 && current < 0.0 {
        Some(SignalDirection::Sell)
    } else {
        None
    }
}

impl Indicator for Macd {
    fn name(&self) -> &str {
        "MACD"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.slow_period {
            return Ok(IndicatorOutput::Macd(MacdOutput {
                macd: 0.0,
                signal_line: 0.0,
                histogram: 0.0,
                signal: None,
            }));
        }

        let closes = closes(candles);
        let fast = math::ema_series(&closes, self.fast_period);
        let slow = math::ema_series(&closes, self.slow_period);
        let macd_line: Vec<f64> = fast.iter().zip(&slow).map(|(f, s)| f - s).collect();
        let signal_line = math::ema_series(&macd_line, self.signal_period);
        let histogram: Vec<f64> = macd_line
            .iter()
            .zip(&signal_line)
            .map(|(m, s)| m - s)
            .collect();

        let n = histogram.len();
        let current = histogram[n - 1];
        let signal = if n >= 2 {
            histogram_cross(histogram[n - 2], current)
        } else {
            None
        };
        self.histogram_history.push(current);

        Ok(IndicatorOutput::Macd(MacdOutput {
            macd: macd_line[n - 1],
            signal_line: signal_line[n - 1],
            histogram: current,
            signal,
        }))
    }
}
