//! Unit tests for series math

use signalmesh::common::math;

fn zigzag(count: usize) -> Vec<f64> {
    (0..count)
        .map(|i| 100.0 + (i as f64 * 0.7).sin() * 5.0 + (i % 3) as f64)
        .collect()
}

#[test]
fn test_rsi_stays_in_range() {
    let values = zigzag(120);
    for period in [2, 5, 14, 20] {
        let rsi = math::rsi_series(&values, period);
        for value in rsi.iter().skip(period - 1) {
            assert!(
                value.is_nan() || (0.0..=100.0).contains(value),
                "RSI({period}) out of range: {value}"
            );
        }
    }
}

#[test]
fn test_rsi_extremes() {
    let rising: Vec<f64> = (0..30).map(|i| 100.0 + i as f64).collect();
    let falling: Vec<f64> = (0..30).map(|i| 100.0 - i as f64).collect();
    let flat = vec![100.0; 30];

    assert_eq!(math::last(&math::rsi_series(&rising, 14)), 100.0);
    assert_eq!(math::last(&math::rsi_series(&falling, 14)), 0.0);
    assert!(math::last(&math::rsi_series(&flat, 14)).is_nan());
}

#[test]
fn test_rsi_warmup_is_nan() {
    let rsi = math::rsi_series(&zigzag(20), 14);
    assert!(rsi[..13].iter().all(|v| v.is_nan()));
    assert!(!rsi[13].is_nan());
}

#[test]
fn test_pearson_bounds() {
    let xs = zigzag(40);
    let ys: Vec<f64> = (0..40).map(|i| (i as f64 * 1.3).cos()).collect();
    let corr = math::pearson(&xs, &ys);
    assert!((-1.0..=1.0).contains(&corr));

    let doubled: Vec<f64> = xs.iter().map(|x| x * 2.0 + 1.0).collect();
    assert!((math::pearson(&xs, &doubled) - 1.0).abs() < 1e-9);

    let mirrored: Vec<f64> = xs.iter().map(|x| -x).collect();
    assert!((math::pearson(&xs, &mirrored) + 1.0).abs() < 1e-9);
}

#[test]
fn test_pearson_degenerate_inputs() {
    assert!(math::pearson(&[1.0, 1.0, 1.0], &[1.0, 2.0, 3.0]).is_nan());
    assert!(math::pearson(&[1.0, 2.0], &[1.0]).is_nan());
    assert!(math::pearson(&[f64::NAN, 2.0, 3.0], &[1.0, 2.0, 3.0]).is_nan());
}

#[test]
fn test_wma_weights_recent_values() {
    let wma = math::wma_series(&[1.0, 2.0, 3.0, 4.0], 3);
    assert!(wma[1].is_nan());
    // (2*1 + 3*2 + 4*3) / 6
    assert!((wma[3] - 20.0 / 6.0).abs() < 1e-12);
}

#[test]
fn test_ema_span_smoothing() {
    let ema = math::ema_series(&[1.0, 2.0, 3.0], 3);
    assert_eq!(ema, vec![1.0, 1.5, 2.25]);
}

#[test]
fn test_pct_returns() {
    let returns = math::pct_returns(&[100.0, 110.0, 99.0]);
    assert!(returns[0].is_nan());
    assert!((returns[1] - 0.1).abs() < 1e-12);
    assert!((returns[2] + 0.1).abs() < 1e-12);
}

#[test]
fn test_std_variants() {
    let values = [2.0, 4.0, 4.0, 4.0, 5.0, 5.0, 7.0, 9.0];
    assert!((math::population_std(values.iter().copied()) - 2.0).abs() < 1e-12);
    assert!((math::sample_std(&values) - (32.0f64 / 7.0).sqrt()).abs() < 1e-12);
    assert!(math::sample_std(&[1.0]).is_nan());
}

#[test]
fn test_true_range_uses_gaps() {
    assert_eq!(math::true_range(105.0, 100.0, 102.0), 5.0);
    assert_eq!(math::true_range(105.0, 100.0, 95.0), 10.0);
    assert_eq!(math::true_range(105.0, 100.0, 112.0), 12.0);
}
