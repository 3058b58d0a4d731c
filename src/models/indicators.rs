use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::models::signal::{Signal, SignalDirection};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Candle {
    pub open: f64,
    pub high: f64,
    pub low: f64,
    pub close: f64,
    #[serde(default)]
    pub volume: f64,
    pub timestamp: DateTime<Utc>,
}

impl Candle {
    pub fn new(open: f64, high: f64, low: f64, close: f64, volume: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            open,
            high,
            low,
            close,
            volume,
            timestamp,
        }
    }

    /// Bar whose open, high, low and close are all `price`.
    pub fn flat(price: f64, timestamp: DateTime<Utc>) -> Self {
        Self::new(price, price, price, price, 0.0, timestamp)
    }

    /// `(high + low + close) / 3`
    pub fn typical_price(&self) -> f64 {
        (self.high + self.low + self.close) / 3.0
    }
}

/// One aligned observation of two asset prices.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PairBar {
    pub asset1: f64,
    pub asset2: f64,
    pub timestamp: DateTime<Utc>,
}

impl PairBar {
    pub fn new(asset1: f64, asset2: f64, timestamp: DateTime<Utc>) -> Self {
        Self {
            asset1,
            asset2,
            timestamp,
        }
    }
}

/// Time series handed to an indicator. Owned by the caller, read-only to
/// indicators.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MarketData {
    Candles(Vec<Candle>),
    Pair(Vec<PairBar>),
}

impl MarketData {
    pub fn len(&self) -> usize {
        match self {
            MarketData::Candles(candles) => candles.len(),
            MarketData::Pair(bars) => bars.len(),
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn kind(&self) -> &'static str {
        match self {
            MarketData::Candles(_) => "candles",
            MarketData::Pair(_) => "pair",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct MovingAverageOutput {
    pub value: f64,
    pub period: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct RsiOutput {
    pub value: f64,
    pub period: usize,
    pub signal: Option<SignalDirection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct AtrOutput {
    pub value: f64,
    pub period: usize,
}

#[derive(Debug, Clone, Serialize)]
pub struct MacdOutput {
    pub macd: f64,
    pub signal_line: f64,
    pub histogram: f64,
    pub signal: Option<SignalDirection>,
}

#[derive(Debug, Clone, Serialize)]
pub struct BollingerOutput {
    pub upper: f64,
    pub middle: f64,
    pub lower: f64,
    pub signal: Option<SignalDirection>,
}

/// ATR band trend state.
#[derive(Debug, Clone, Serialize)]
pub struct SuperTrendOutput {
    pub value: f64,
    /// 1 for uptrend, -1 for downtrend, 0 before enough data
    pub trend: i8,
    pub upper_band: f64,
    pub lower_band: f64,
    pub period: usize,
    pub multiplier: f64,
    pub signal: Option<SignalDirection>,
}

/// k-NN momentum prediction with its adaptive channel.
#[derive(Debug, Clone, Serialize)]
pub struct MlmiOutput {
    /// Sum of the nearest neighbours' labels, in `[-k, k]`.
    pub prediction: f64,
    pub prediction_ma: f64,
    pub upper: f64,
    pub lower: f64,
    /// `upper` pulled in by the smoothed prediction std.
    pub adjusted_upper: f64,
    /// `lower` pushed out by the smoothed prediction std.
    pub adjusted_lower: f64,
    pub signal: Option<SignalDirection>,
    pub strength: f64,
}

impl MlmiOutput {
    pub fn neutral() -> Self {
        Self {
            prediction: 0.0,
            prediction_ma: 0.0,
            upper: 0.0,
            lower: 0.0,
            adjusted_upper: 0.0,
            adjusted_lower: 0.0,
            signal: None,
            strength: 0.0,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct DivergenceOutput {
    pub correlation: f64,
    pub spread: f64,
    pub signal: Option<SignalDirection>,
    pub strength: f64,
}

impl DivergenceOutput {
    pub fn neutral() -> Self {
        Self {
            correlation: 0.0,
            spread: 0.0,
            signal: None,
            strength: 0.0,
        }
    }
}

/// Result record of any registered indicator.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "indicator", rename_all = "snake_case")]
pub enum IndicatorOutput {
    Sma(MovingAverageOutput),
    Ema(MovingAverageOutput),
    Rsi(RsiOutput),
    Macd(MacdOutput),
    Bollinger(BollingerOutput),
    Atr(AtrOutput),
    SuperTrend(SuperTrendOutput),
    Mlmi(MlmiOutput),
    Divergence(DivergenceOutput),
}

impl IndicatorOutput {
    pub fn direction(&self) -> Option<SignalDirection> {
        match self {
            IndicatorOutput::Sma(_) | IndicatorOutput::Ema(_) | IndicatorOutput::Atr(_) => None,
            IndicatorOutput::Rsi(out) => out.signal,
            IndicatorOutput::Macd(out) => out.signal,
            IndicatorOutput::Bollinger(out) => out.signal,
            IndicatorOutput::SuperTrend(out) => out.signal,
            IndicatorOutput::Mlmi(out) => out.signal,
            IndicatorOutput::Divergence(out) => out.signal,
        }
    }

    /// Signal strength: the indicator's own strength where it reports one,
    /// otherwise 1 for a directional output and 0 for none.
    pub fn strength(&self) -> f64 {
        match self {
            IndicatorOutput::Mlmi(out) => out.strength,
            IndicatorOutput::Divergence(out) => out.strength,
            other => {
                if other.direction().is_some() {
                    1.0
                } else {
                    0.0
                }
            }
        }
    }

    pub fn to_signal(&self, name: impl Into<String>) -> Signal {
        Signal {
            name: name.into(),
            strength: self.strength(),
            direction: self.direction(),
        }
    }
}
