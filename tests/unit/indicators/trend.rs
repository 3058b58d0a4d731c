//! Unit tests for the moving averages

use chrono::Utc;
use signalmesh::indicators::trend::{Ema, Sma};
use signalmesh::indicators::{Indicator, IndicatorError};
use signalmesh::models::{Candle, IndicatorOutput, MarketData};

fn candles(closes: &[f64]) -> MarketData {
    let now = Utc::now();
    MarketData::Candles(closes.iter().map(|&c| Candle::flat(c, now)).collect())
}

fn value_of(output: IndicatorOutput) -> f64 {
    match output {
        IndicatorOutput::Sma(out) | IndicatorOutput::Ema(out) => out.value,
        other => panic!("expected a moving average, got {:?}", other),
    }
}

#[test]
fn test_sma_uses_last_period_closes() {
    let mut sma = Sma::new(3).unwrap();
    let value = value_of(sma.calculate(&candles(&[1.0, 2.0, 3.0, 4.0, 5.0])).unwrap());
    assert_eq!(value, 4.0);
    assert_eq!(sma.history().to_vec(), vec![4.0]);
}

#[test]
fn test_sma_short_series_is_neutral() {
    let mut sma = Sma::new(20).unwrap();
    let value = value_of(sma.calculate(&candles(&[1.0, 2.0])).unwrap());
    assert_eq!(value, 0.0);
    assert!(sma.history().is_empty());
}

#[test]
fn test_sma_history_is_bounded() {
    let mut sma = Sma::new(3).unwrap();
    let closes: Vec<f64> = (1..=40).map(f64::from).collect();
    for end in 3..=closes.len() {
        sma.calculate(&candles(&closes[..end])).unwrap();
    }
    assert_eq!(sma.history().len(), 3);
    assert_eq!(sma.history().last(), Some(&39.0));
}

#[test]
fn test_ema_seeded_with_first_close() {
    let mut ema = Ema::new(3).unwrap();
    let value = value_of(ema.calculate(&candles(&[1.0, 2.0, 3.0])).unwrap());
    assert_eq!(value, 2.25);
}

#[test]
fn test_ema_constant_series() {
    let mut ema = Ema::new(20).unwrap();
    let value = value_of(ema.calculate(&candles(&[42.0; 50])).unwrap());
    assert!((value - 42.0).abs() < 1e-12);
}

#[test]
fn test_moving_averages_have_no_direction() {
    let mut sma = Sma::new(2).unwrap();
    let output = sma.calculate(&candles(&[1.0, 2.0])).unwrap();
    assert_eq!(output.direction(), None);
    assert_eq!(output.strength(), 0.0);
}

#[test]
fn test_zero_period_rejected() {
    assert!(matches!(Sma::new(0), Err(IndicatorError::InvalidParams(_))));
    assert!(matches!(Ema::new(0), Err(IndicatorError::InvalidParams(_))));
}
