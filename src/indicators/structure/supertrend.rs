//! SuperTrend indicator

use crate::common::{math, RollingBuffer};
use crate::config::SuperTrendConfig;
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{expect_candles, Indicator};
use crate::models::indicators::{IndicatorOutput, MarketData, SuperTrendOutput};
use crate::models::signal::SignalDirection;

/// Trend-following bands at `hl2 ± multiplier * ATR(period)`.
///
/// A close above the upper band starts an uptrend and a close below the lower
/// band a downtrend. Between the bands the previous trend holds; with no
/// previous trend the close is compared with `hl2`. BUY or SELL is reported
/// on the call where the trend flips.
#[derive(Debug, Clone)]
pub struct SuperTrend {
    period: usize,
    multiplier: f64,
    trend: Option<i8>,
    trend_history: RollingBuffer<i8>,
}

impl SuperTrend {
    pub fn new(period: usize, multiplier: f64) -> Result<Self, IndicatorError> {
        let period = require_period("SuperTrend", "period", period)?;
        if !(multiplier.is_finite() && multiplier > 0.0) {
            return Err(IndicatorError::invalid_params(
                "SuperTrend multiplier must be finite and > 0",
            ));
        }
        Ok(Self {
            period,
            multiplier,
            trend: None,
            trend_history: RollingBuffer::new(period),
        })
    }

    pub fn from_config(config: &SuperTrendConfig) -> Result<Self, IndicatorError> {
        Self::new(config.period, config.multiplier)
    }

    /// Trend of recent calls, oldest first.
    pub fn trend_history(&self) -> &RollingBuffer<i8> {
        &self.trend_history
    }
}

impl Indicator for SuperTrend {
    fn name(&self) -> &str {
        "SuperTrend"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.period + 1 {
            return Ok(IndicatorOutput::SuperTrend(SuperTrendOutput {
                value: 0.0,
                trend: 0,
                upper_band: 0.0,
                lower_band: 0.0,
                period: self.period,
                multiplier: self.multiplier,
                signal: None,
            }));
        }

        let tr_values: Vec<f64> = candles
            .windows(2)
            .map(|pair| math::true_range(pair[1].high, pair[1].low, pair[0].close))
            .collect();
        let atr = math::mean(tr_values[tr_values.len() - self.period..].iter().copied());

        let last = &candles[candles.len() - 1];
        let hl2 = (last.high + last.low) / 2.0;
        let upper_band = hl2 + self.multiplier * atr;
        let lower_band = hl2 - self.multiplier * atr;

        let trend = if last.close > upper_band {
            1
        } else if last.close < lower_band {
            -1
        } else {
            match self.trend {
                Some(previous) => previous,
                None if last.close > hl2 => 1,
                None => -1,
            }
        };

        let signal = match (self.trend, trend) {
            (Some(-1), 1) => Some(SignalDirection::Buy),
            (Some(1), -1) => Some(SignalDirection::Sell),
            _ => None,
        };
        self.trend = Some(trend);
        self.trend_history.push(trend);

        let value = if trend == 1 { lower_band } else { upper_band };
        Ok(IndicatorOutput::SuperTrend(SuperTrendOutput {
            value,
            trend,
            upper_band,
            lower_band,
            period: self.period,
            multiplier: self.multiplier,
            signal,
        }))
    }
}
