//! Cross-asset correlation and spread divergence detector

use tracing::debug;

use crate::common::{math, RollingBuffer};
use crate::config::DivergenceConfig;
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{expect_pair, Indicator};
use crate::models::indicators::{DivergenceOutput, IndicatorOutput, MarketData};
use crate::models::signal::SignalDirection;

/// Flags a stretched spread between two normally co-moving assets.
///
/// When the rolling correlation of returns is at least
/// `correlation_threshold` in magnitude, the latest spread
/// `asset1 - asset2` is scored against its own history. A z-score beyond
/// `divergence_threshold` sells asset1 when it is rich and buys it when it is
/// cheap.
#[derive(Debug, Clone)]
pub struct DivergenceDetector {
    lookback_period: usize,
    correlation_threshold: f64,
    divergence_threshold: f64,
    correlation_history: RollingBuffer<f64>,
    spread_history: RollingBuffer<f64>,
}

impl DivergenceDetector {
    pub fn new(config: &DivergenceConfig) -> Result<Self, IndicatorError> {
        let lookback_period =
            require_period("CrossCorrelationPair", "lookback_period", config.lookback_period)?;
        Ok(Self {
            lookback_period,
            correlation_threshold: config.correlation_threshold,
            divergence_threshold: config.divergence_threshold,
            correlation_history: RollingBuffer::new(lookback_period),
            spread_history: RollingBuffer::new(lookback_period),
        })
    }

    pub fn lookback_period(&self) -> usize {
        self.lookback_period
    }

    /// `(correlation_history, spread_history)`, oldest first.
    pub fn historical_values(&self) -> (Vec<f64>, Vec<f64>) {
        (
            self.correlation_history.to_vec(),
            self.spread_history.to_vec(),
        )
    }
}

impl Indicator for DivergenceDetector {
    fn name(&self) -> &str {
        "CrossCorrelationPair"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let bars = expect_pair(self.name(), data)?;
        if bars.len() < self.lookback_period {
            return Ok(IndicatorOutput::Divergence(DivergenceOutput::neutral()));
        }

        let asset1: Vec<f64> = bars.iter().map(|b| b.asset1).collect();
        let asset2: Vec<f64> = bars.iter().map(|b| b.asset2).collect();
        let returns1 = math::pct_returns(&asset1);
        let returns2 = math::pct_returns(&asset2);

        // The first return is undefined, so a series exactly `lookback_period`
        // long yields a NaN correlation and no signal.
        let start = returns1.len() - self.lookback_period;
        let correlation = math::pearson(&returns1[start..], &returns2[start..]);
        let spread = asset1[asset1.len() - 1] - asset2[asset2.len() - 1];

        self.correlation_history.push(correlation);
        self.spread_history.push(spread);

        let mut signal = None;
        let mut strength = 0.0;

        if correlation.abs() >= self.correlation_threshold {
            let spread_mean = self.spread_history.mean();
            let spread_std = self.spread_history.std_dev();
            let zscore = (spread - spread_mean) / spread_std;

            if zscore.abs() >= self.divergence_threshold {
                signal = Some(if zscore > 0.0 {
                    SignalDirection::Sell
                } else {
                    SignalDirection::Buy
                });
                strength = correlation.abs().min(zscore.abs());
            }

            debug!(correlation, spread, zscore, ?signal, "Pair divergence evaluated");
        }

        Ok(IndicatorOutput::Divergence(DivergenceOutput {
            correlation,
            spread,
            signal,
            strength,
        }))
    }
}
