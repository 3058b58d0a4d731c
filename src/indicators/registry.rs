//! Indicator registry and trait system

use std::collections::HashMap;
use tracing::{debug, info, warn};

use crate::config::IndicatorConfig;
use crate::indicators::error::IndicatorError;
use crate::indicators::momentum::{Macd, MomentumPredictor, Rsi};
use crate::indicators::pair::DivergenceDetector;
use crate::indicators::structure::SuperTrend;
use crate::indicators::trend::{Ema, Sma};
use crate::indicators::volatility::{Atr, BollingerBands};
use crate::models::indicators::{Candle, IndicatorOutput, MarketData, PairBar};

/// Capability shared by every indicator.
///
/// Indicators own their history buffers, so `calculate` takes `&mut self` and
/// callers must not drive one instance from two threads at once.
pub trait Indicator {
    /// Name of the indicator
    fn name(&self) -> &str;

    /// Compute the latest output for `data`, updating internal history.
    fn calculate(&mut self, data: &MarketData) -> Result<IndicatorOutput, IndicatorError>;
}

/// Borrow the candle rows of `data`, or fail for pair data.
pub(crate) fn expect_candles<'a>(
    indicator: &str,
    data: &'a MarketData,
) -> Result<&'a [Candle], IndicatorError> {
    match data {
        MarketData::Candles(candles) => Ok(candles),
        other => Err(IndicatorError::invalid_input(
            indicator,
            format!("expected candles, got {} data", other.kind()),
        )),
    }
}

/// Borrow the pair rows of `data`, or fail for candle data.
pub(crate) fn expect_pair<'a>(
    indicator: &str,
    data: &'a MarketData,
) -> Result<&'a [PairBar], IndicatorError> {
    match data {
        MarketData::Pair(bars) => Ok(bars),
        other => Err(IndicatorError::invalid_input(
            indicator,
            format!("expected pair, got {} data", other.kind()),
        )),
    }
}

pub(crate) fn closes(candles: &[Candle]) -> Vec<f64> {
    candles.iter().map(|c| c.close).collect()
}

/// Owned handle to a registered indicator.
pub type BoxedIndicator = Box<dyn Indicator + Send>;

/// Name → indicator dispatch table.
#[derive(Default)]
pub struct IndicatorRegistry {
    indicators: HashMap<String, BoxedIndicator>,
}

impl IndicatorRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self {
            indicators: HashMap::new(),
        }
    }

    /// Registry with every built-in indicator under its conventional name.
    pub fn with_defaults(config: &IndicatorConfig) -> Result<Self, IndicatorError> {
        let mut registry = Self::new();
        registry.register("SMA", Box::new(Sma::new(config.sma_period)?))?;
        registry.register("EMA", Box::new(Ema::new(config.ema_period)?))?;
        registry.register("RSI", Box::new(Rsi::from_config(&config.rsi)?))?;
        registry.register("MACD", Box::new(Macd::from_config(&config.macd)?))?;
        registry.register(
            "BollingerBands",
            Box::new(BollingerBands::from_config(&config.bollinger)?),
        )?;
        registry.register("ATR", Box::new(Atr::new(config.atr_period)?))?;
        registry.register(
            "SuperTrend",
            Box::new(SuperTrend::from_config(&config.supertrend)?),
        )?;
        registry.register("MLMI", Box::new(MomentumPredictor::new(&config.mlmi)?))?;
        registry.register(
            "CrossCorrelationPair",
            Box::new(DivergenceDetector::new(&config.divergence)?),
        )?;
        Ok(registry)
    }

    /// Register `indicator` under `name`. An existing entry is kept and the
    /// call fails with [`IndicatorError::DuplicateIndicator`].
    pub fn register(
        &mut self,
        name: impl Into<String>,
        indicator: BoxedIndicator,
    ) -> Result<(), IndicatorError> {
        let name = name.into();
        if self.indicators.contains_key(&name) {
            warn!(indicator = %name, "Rejected duplicate indicator registration");
            return Err(IndicatorError::DuplicateIndicator(name));
        }
        info!(indicator = %name, kind = indicator.name(), "Registered indicator");
        self.indicators.insert(name, indicator);
        Ok(())
    }

    pub fn get(&self, name: &str) -> Result<&BoxedIndicator, IndicatorError> {
        self.indicators
            .get(name)
            .ok_or_else(|| IndicatorError::NotFound(name.to_string()))
    }

    pub fn get_mut(&mut self, name: &str) -> Result<&mut BoxedIndicator, IndicatorError> {
        self.indicators
            .get_mut(name)
            .ok_or_else(|| IndicatorError::NotFound(name.to_string()))
    }

    /// Resolve `name` and forward `data` to it.
    pub fn calculate(
        &mut self,
        name: &str,
        data: &MarketData,
    ) -> Result<IndicatorOutput, IndicatorError> {
        let indicator = self.get_mut(name)?;
        let output = indicator.calculate(data)?;
        debug!(
            indicator = name,
            observations = data.len(),
            direction = ?output.direction(),
            "Calculated indicator"
        );
        Ok(output)
    }

    pub fn contains(&self, name: &str) -> bool {
        self.indicators.contains_key(name)
    }

    /// Registered names, sorted.
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.indicators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    pub fn len(&self) -> usize {
        self.indicators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.indicators.is_empty()
    }
}
