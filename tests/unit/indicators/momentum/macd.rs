//! Unit tests for MACD

use chrono::Utc;
use signalmesh::config::MacdConfig;
use signalmesh::indicators::momentum::Macd;
use signalmesh::indicators::{Indicator, IndicatorError};
use signalmesh::models::{Candle, IndicatorOutput, MacdOutput, MarketData, SignalDirection};

fn candles(closes: &[f64]) -> MarketData {
    let now = Utc::now();
    MarketData::Candles(closes.iter().map(|&c| Candle::flat(c, now)).collect())
}

fn macd_of(macd: &mut Macd, closes: &[f64]) -> MacdOutput {
    match macd.calculate(&candles(closes)).unwrap() {
        IndicatorOutput::Macd(out) => out,
        other => panic!("expected MACD output, got {:?}", other),
    }
}

fn wave(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + (i as f64 * 0.2).sin() * 10.0)
        .collect()
}

#[test]
fn test_short_series_is_neutral() {
    let mut macd = Macd::from_config(&MacdConfig::default()).unwrap();
    let out = macd_of(&mut macd, &wave(25));
    assert_eq!(out.macd, 0.0);
    assert_eq!(out.histogram, 0.0);
    assert_eq!(out.signal, None);
}

#[test]
fn test_histogram_is_macd_minus_signal_line() {
    let mut macd = Macd::from_config(&MacdConfig::default()).unwrap();
    let out = macd_of(&mut macd, &wave(60));
    assert!((out.histogram - (out.macd - out.signal_line)).abs() < 1e-12);
}

#[test]
fn test_signal_fires_on_histogram_sign_change() {
    let closes = wave(160);
    let mut macd = Macd::from_config(&MacdConfig::default()).unwrap();
    let mut previous: Option<f64> = None;
    let mut crossings = 0;

    for end in 26..=closes.len() {
        let out = macd_of(&mut macd, &closes[..end]);
        if let Some(prev) = previous {
            let expected = if prev <= 0.0 && out.histogram > 0.0 {
                Some(SignalDirection::Buy)
            } else if prev >= 0.0 && out.histogram < 0.0 {
                Some(SignalDirection::Sell)
            } else {
                None
            };
            assert_eq!(out.signal, expected, "bar {}", end);
            if expected.is_some() {
                crossings += 1;
            }
        }
        previous = Some(out.histogram);
    }
    assert!(crossings >= 2, "a sine wave should cross several times");
}

#[test]
fn test_fast_must_be_shorter_than_slow() {
    assert!(matches!(
        Macd::new(26, 12, 9),
        Err(IndicatorError::InvalidParams(_))
    ));
}
