//! MLMI (Machine Learning Momentum Index) indicator
//!
//! An online k-nearest-neighbour regressor. Each time the fast price WMA
//! crosses the slow one, the current pair of smoothed RSI readings is stored
//! as a training sample labelled with the price move since the previous
//! crossing. Every call then sums the labels of the `k` samples closest to
//! the current RSI pair and compares that prediction with an adaptive channel
//! built from recent predictions.

use serde::Serialize;
use tracing::debug;

use crate::common::{math, RollingBuffer};
use crate::config::MlmiConfig;
use crate::indicators::error::{require_period, IndicatorError};
use crate::indicators::registry::{closes, expect_candles, Indicator};
use crate::models::indicators::{IndicatorOutput, MarketData, MlmiOutput};
use crate::models::signal::SignalDirection;

pub const FAST_MA_PERIOD: usize = 5;
pub const SLOW_MA_PERIOD: usize = 20;
pub const QUICK_RSI_PERIOD: usize = 5;
pub const SLOW_RSI_PERIOD: usize = 20;
/// Predictions kept for the smoothed line and the channel.
pub const PREDICTION_WINDOW: usize = 20;

#[derive(Debug, Clone, Copy, PartialEq, Serialize)]
pub struct TrainingSample {
    pub feature_slow: f64,
    pub feature_quick: f64,
    /// +1 when price rose (or held) since the previous sample, -1 otherwise.
    pub label: i32,
}

impl TrainingSample {
    /// Euclidean distance in `(feature_slow, feature_quick)` space.
    pub fn distance(&self, feature_slow: f64, feature_quick: f64) -> f64 {
        ((feature_slow - self.feature_slow).powi(2) + (feature_quick - self.feature_quick).powi(2))
            .sqrt()
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Cross {
    Over,
    Under,
}

/// `Over` when `fast` moved from not-above to above `slow` on the last bar,
/// `Under` for the mirror move. Comparisons against `NaN` never cross.
fn detect_cross(fast: &[f64], slow: &[f64]) -> Option<Cross> {
    let n = fast.len().min(slow.len());
    if n < 2 {
        return None;
    }
    let (f0, f1) = (fast[n - 2], fast[n - 1]);
    let (s0, s1) = (slow[n - 2], slow[n - 1]);
    if f1 > s1 && f0 <= s0 {
        Some(Cross::Over)
    } else if f1 < s1 && f0 >= s0 {
        Some(Cross::Under)
    } else {
        None
    }
}

#[derive(Debug, Clone)]
pub struct MomentumPredictor {
    num_neighbors: usize,
    momentum_window: usize,
    samples: RollingBuffer<TrainingSample>,
    /// Close at the most recent training event.
    last_event_price: Option<f64>,
    predictions: RollingBuffer<f64>,
    std_ema: Option<f64>,
}

impl MomentumPredictor {
    pub fn new(config: &MlmiConfig) -> Result<Self, IndicatorError> {
        let num_neighbors = require_period("MLMI", "num_neighbors", config.num_neighbors)?;
        let momentum_window = require_period("MLMI", "momentum_window", config.momentum_window)?;
        let max_samples = require_period("MLMI", "max_samples", config.max_samples)?;
        Ok(Self {
            num_neighbors,
            momentum_window,
            samples: RollingBuffer::new(max_samples),
            last_event_price: None,
            predictions: RollingBuffer::new(PREDICTION_WINDOW),
            std_ema: None,
        })
    }

    pub fn num_neighbors(&self) -> usize {
        self.num_neighbors
    }

    pub fn momentum_window(&self) -> usize {
        self.momentum_window
    }

    /// Stored training samples, oldest first.
    pub fn samples(&self) -> &RollingBuffer<TrainingSample> {
        &self.samples
    }

    pub fn sample_count(&self) -> usize {
        self.samples.len()
    }

    /// `(feature_slow, feature_quick)`: the last values of the slow and quick
    /// RSI, each smoothed by a WMA over `momentum_window`.
    pub fn features(&self, closes: &[f64]) -> (f64, f64) {
        let slow = math::wma_series(
            &math::rsi_series(closes, SLOW_RSI_PERIOD),
            self.momentum_window,
        );
        let quick = math::wma_series(
            &math::rsi_series(closes, QUICK_RSI_PERIOD),
            self.momentum_window,
        );
        (math::last(&slow), math::last(&quick))
    }

    /// Append a training sample for the feature pair observed at `price`.
    ///
    /// The label compares `price` with the price cached at the previous
    /// event; the first event has nothing to compare with and counts as a
    /// rise.
    pub fn record_sample(&mut self, feature_slow: f64, feature_quick: f64, price: f64) {
        let previous = self.last_event_price.unwrap_or(price);
        let label = if price >= previous { 1 } else { -1 };
        self.samples.push(TrainingSample {
            feature_slow,
            feature_quick,
            label,
        });
        self.last_event_price = Some(price);
    }

    /// Sum of the labels of the `k = min(num_neighbors, sample_count)`
    /// samples nearest to the query. Ties keep insertion order and an
    /// unorderable (`NaN`) distance ranks after every real one.
    pub fn predict(&self, feature_slow: f64, feature_quick: f64) -> i64 {
        let mut ranked: Vec<(f64, usize)> = self
            .samples
            .iter()
            .enumerate()
            .map(|(index, sample)| {
                let distance = sample.distance(feature_slow, feature_quick);
                let distance = if distance.is_nan() {
                    f64::INFINITY
                } else {
                    distance
                };
                (distance, index)
            })
            .collect();
        ranked.sort_by(|a, b| a.0.total_cmp(&b.0).then(a.1.cmp(&b.1)));

        let k = self.num_neighbors.min(ranked.len());
        ranked[..k]
            .iter()
            .filter_map(|&(_, index)| self.samples.get(index))
            .map(|sample| i64::from(sample.label))
            .sum()
    }

    /// Rolling sample std of the prediction window, smoothed by a 20-period
    /// EMA. Zero until the window is full.
    fn update_channel_std(&mut self) -> f64 {
        if self.predictions.is_full() {
            let std = math::sample_std(&self.predictions.to_vec());
            let alpha = 2.0 / (PREDICTION_WINDOW as f64 + 1.0);
            let smoothed = match self.std_ema {
                Some(previous) => math::ema_step(std, previous, alpha),
                None => std,
            };
            self.std_ema = Some(smoothed);
        }
        self.std_ema.unwrap_or(0.0)
    }
}

impl Indicator for MomentumPredictor {
    fn name(&self) -> &str {
        "MLMI"
    }

    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError> {
        let candles = expect_candles(self.name(), data)?;
        if candles.len() < self.momentum_window {
            return Ok(IndicatorOutput::Mlmi(MlmiOutput::neutral()));
        }

        let closes = closes(candles);
        let price = math::last(&closes);
        let ma_quick = math::wma_series(&closes, FAST_MA_PERIOD);
        let ma_slow = math::wma_series(&closes, SLOW_MA_PERIOD);
        let (feature_slow, feature_quick) = self.features(&closes);

        if let Some(cross) = detect_cross(&ma_quick, &ma_slow) {
            self.record_sample(feature_slow, feature_quick, price);
            debug!(
                ?cross,
                feature_slow,
                feature_quick,
                samples = self.samples.len(),
                "MLMI recorded training sample"
            );
        }

        let k = self.num_neighbors.min(self.samples.len());
        let prediction = self.predict(feature_slow, feature_quick) as f64;
        self.predictions.push(prediction);

        let window = self.predictions.to_vec();
        let prediction_ma = math::weighted_mean(&window);
        let upper = self.predictions.max();
        let lower = self.predictions.min();
        let std = self.update_channel_std();
        let adjusted_upper = upper - std;
        let adjusted_lower = lower + std;

        let signal = if prediction > adjusted_upper {
            Some(SignalDirection::Sell)
        } else if prediction < adjusted_lower {
            Some(SignalDirection::Buy)
        } else {
            None
        };
        let strength = if k == 0 {
            0.0
        } else {
            prediction.abs() / k as f64
        };

        Ok(IndicatorOutput::Mlmi(MlmiOutput {
            prediction,
            prediction_ma,
            upper,
            lower,
            adjusted_upper,
            adjusted_lower,
            signal,
            strength,
        }))
    }
}
