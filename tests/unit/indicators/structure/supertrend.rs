//! Unit tests for SuperTrend

use chrono::Utc;
use signalmesh::config::SuperTrendConfig;
use signalmesh::indicators::structure::SuperTrend;
use signalmesh::indicators::{Indicator, IndicatorError};
use signalmesh::models::{Candle, IndicatorOutput, MarketData, SignalDirection, SuperTrendOutput};

fn supertrend_of(st: &mut SuperTrend, candles: &[Candle]) -> SuperTrendOutput {
    match st.calculate(&MarketData::Candles(candles.to_vec())).unwrap() {
        IndicatorOutput::SuperTrend(out) => out,
        other => panic!("expected SuperTrend output, got {:?}", other),
    }
}

/// Five quiet bars: close 100 inside a 99..101 range.
fn quiet_bars() -> Vec<Candle> {
    let now = Utc::now();
    (0..5)
        .map(|_| Candle::new(100.0, 101.0, 99.0, 100.0, 1.0, now))
        .collect()
}

#[test]
fn test_short_series_is_neutral() {
    let mut st = SuperTrend::from_config(&SuperTrendConfig::default()).unwrap();
    let out = supertrend_of(&mut st, &quiet_bars());
    assert_eq!(out.trend, 0);
    assert_eq!(out.value, 0.0);
    assert_eq!(out.signal, None);
    assert!(st.trend_history().is_empty());
}

#[test]
fn test_first_trend_from_close_against_midpoint() {
    let mut st = SuperTrend::new(3, 0.5).unwrap();
    let out = supertrend_of(&mut st, &quiet_bars());
    // close sits on hl2, inside the bands
    assert_eq!(out.trend, -1);
    assert_eq!(out.signal, None);
    assert!((out.upper_band - 101.0).abs() < 1e-9);
    assert!((out.lower_band - 99.0).abs() < 1e-9);
    assert_eq!(out.value, out.upper_band);
}

#[test]
fn test_breakout_flips_trend_and_signals() {
    let now = Utc::now();
    let mut st = SuperTrend::new(3, 0.5).unwrap();
    let mut candles = quiet_bars();
    supertrend_of(&mut st, &candles);

    // true range 10, ATR (2 + 2 + 10) / 3, upper band 105 + 0.5 * ATR
    candles.push(Candle::new(100.0, 110.0, 100.0, 110.0, 1.0, now));
    let up = supertrend_of(&mut st, &candles);
    assert_eq!(up.trend, 1);
    assert_eq!(up.signal, Some(SignalDirection::Buy));
    assert_eq!(up.value, up.lower_band);
    assert!((up.upper_band - (105.0 + 0.5 * 14.0 / 3.0)).abs() < 1e-9);

    // the same data again keeps the trend without a new signal
    let held = supertrend_of(&mut st, &candles);
    assert_eq!(held.trend, 1);
    assert_eq!(held.signal, None);

    candles.push(Candle::new(110.0, 110.0, 100.0, 100.0, 1.0, now));
    let down = supertrend_of(&mut st, &candles);
    assert_eq!(down.trend, -1);
    assert_eq!(down.signal, Some(SignalDirection::Sell));
    assert_eq!(down.value, down.upper_band);

    assert_eq!(st.trend_history().to_vec(), vec![1, 1, -1]);
}

#[test]
fn test_trend_inside_bands_is_kept() {
    let now = Utc::now();
    let mut st = SuperTrend::new(3, 0.5).unwrap();
    let mut candles = quiet_bars();
    candles.push(Candle::new(100.0, 110.0, 100.0, 110.0, 1.0, now));
    assert_eq!(supertrend_of(&mut st, &candles).trend, 1);

    // a quiet bar closing below its midpoint but inside the bands
    candles.push(Candle::new(110.0, 111.0, 109.0, 109.5, 1.0, now));
    let out = supertrend_of(&mut st, &candles);
    assert_eq!(out.trend, 1);
    assert_eq!(out.signal, None);
}

#[test]
fn test_invalid_params_rejected() {
    assert!(matches!(
        SuperTrend::new(0, 3.0),
        Err(IndicatorError::InvalidParams(_))
    ));
    assert!(matches!(
        SuperTrend::new(10, 0.0),
        Err(IndicatorError::InvalidParams(_))
    ));
    assert!(matches!(
        SuperTrend::new(10, f64::NAN),
        Err(IndicatorError::InvalidParams(_))
    ));
}
