//! Integration tests for the API Server
//!
//! Tests HTTP endpoints, health checks, metrics, and business logic.


use serde_json::{json, Value};
use signalmesh::config::EngineConfig;

use test_utils::{agent_signal, candle_data, pair_data, TestApiServer};

#[tokio::test]
async fn health_endpoint_reports_healthy_status() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/health").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["status"], "healthy");
    assert!(body["uptime_seconds"].as_u64().is_some());
    assert_eq!(body["service"], "signalmesh");
}

#[tokio::test]
async fn metrics_endpoint_exposes_prometheus_metrics() {
    let app = TestApiServer::new().await;
    let _ = app.server.get("/health").await;

    let response = app.server.get("/metrics").await;
    assert_eq!(response.status_code(), 200);

    let body = response.text();
    for name in [
        "http_requests_total",
        "http_request_duration_seconds",
        "http_requests_in_flight",
        "signals_aggregated_total",
        "indicator_errors_total",
    ] {
        assert!(body.contains(name), "Expected {} metric", name);
    }
}

#[tokio::test]
async fn lists_registered_indicators() {
    let app = TestApiServer::new().await;
    let response = app.server.get("/api/indicators").await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let names: Vec<&str> = body["indicators"]
        .as_array()
        .expect("indicator list")
        .iter()
        .filter_map(Value::as_str)
        .collect();
    assert_eq!(names.len(), 9);
    assert!(names.contains(&"MLMI"));
    assert!(names.contains(&"SuperTrend"));
    assert!(names.contains(&"CrossCorrelationPair"));
}

#[tokio::test]
async fn calculates_single_indicator() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/indicators/SMA")
        .json(&candle_data(25))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["indicator"], "sma");
    assert_eq!(body["period"], 20);
    // mean of closes 105..=124
    assert_eq!(body["value"].as_f64(), Some(114.5));
}

#[tokio::test]
async fn calculates_pair_divergence() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/indicators/CrossCorrelationPair")
        .json(&pair_data(30))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["indicator"], "divergence");
    assert!(body["correlation"].as_f64().is_some());
}

#[tokio::test]
async fn unknown_indicator_returns_not_found() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/indicators/Ichimoku")
        .json(&candle_data(5))
        .await;
    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("Ichimoku"));
}

#[tokio::test]
async fn wrong_data_shape_is_unprocessable() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/indicators/RSI")
        .json(&pair_data(30))
        .await;
    assert_eq!(response.status_code(), 422);
}

#[tokio::test]
async fn aggregates_signals_with_summary_and_consensus() {
    let app = TestApiServer::new().await;
    let data = candle_data(30);
    let request = json!({
        "signals": [
            agent_signal("trend", "BUY", "SMA", &data),
            agent_signal("momentum", "BUY", "RSI", &data),
            agent_signal("ml", "BUY", "MLMI", &data),
            agent_signal("bands", "SELL", "BollingerBands", &data),
            agent_signal("idle", "WAIT", "EMA", &data),
        ]
    });

    let response = app.server.post("/api/signals/aggregate").json(&request).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let signals = body["signals"].as_array().expect("signals");
    assert_eq!(signals.len(), 5);
    assert_eq!(signals[0]["agent"], "trend");
    assert_eq!(signals[0]["indicator_signal"]["indicator"], "sma");
    assert_eq!(signals[4]["action"], "WAIT");

    assert_eq!(body["summary"], json!({ "BUY": 3, "SELL": 1, "HOLD": 0 }));
    assert_eq!(body["consensus"]["has_consensus"], true);
    assert_eq!(body["consensus"]["direction"], "BUY");

    let metrics = app.metrics.export().unwrap();
    assert!(metrics.contains("signals_aggregated_total 5"));
}

#[tokio::test]
async fn aggregate_with_unknown_indicator_fails_whole_batch() {
    let app = TestApiServer::new().await;
    let data = candle_data(30);
    let request = json!({
        "signals": [
            agent_signal("trend", "BUY", "SMA", &data),
            agent_signal("mystery", "SELL", "Nope", &data),
        ]
    });

    let response = app.server.post("/api/signals/aggregate").json(&request).await;
    assert_eq!(response.status_code(), 404);

    let body: Value = response.json();
    assert!(body.get("signals").is_none());
    assert_eq!(app.metrics.indicator_errors_total.get(), 1);
    assert_eq!(app.metrics.signals_aggregated_total.get(), 0);
}

#[tokio::test]
async fn summarizes_actions() {
    let app = TestApiServer::new().await;
    let request = json!({
        "signals": [
            { "action": "BUY" },
            { "action": "BUY" },
            { "action": "BUY" },
            { "action": "SELL" },
            { "action": "SELL" },
            { "action": "HOLD" },
            { "action": "WAIT" },
        ]
    });

    let response = app.server.post("/api/signals/summary").json(&request).await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body, json!({ "BUY": 3, "SELL": 2, "HOLD": 1 }));
}

#[tokio::test]
async fn sizes_position_capped_at_max_leverage() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/position/size")
        .json(&json!({
            "instrument": "BTC-PERP",
            "signal_strength": 1.0,
            "price": 100.0,
            "volatility": 0.02
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    assert_eq!(body["instrument"], "BTC-PERP");
    assert_eq!(body["leverage_used"].as_f64(), Some(5.0));
    assert_eq!(body["position_size"].as_f64(), Some(5000.0));
}

#[tokio::test]
async fn sizes_position_without_volatility_scaling() {
    let mut config = EngineConfig::default();
    config.leverage.vol_based_sizing = false;
    let app = TestApiServer::with_config(config).await;

    let response = app
        .server
        .post("/api/position/size")
        .json(&json!({
            "instrument": "ETH-PERP",
            "signal_strength": -1.0,
            "price": 100.0,
            "volatility": 0.02,
            "margin_requirement": 0.1
        }))
        .await;
    assert_eq!(response.status_code(), 200);

    let body: Value = response.json();
    let size = body["position_size"].as_f64().unwrap();
    let leverage = body["leverage_used"].as_f64().unwrap();
    assert!((size + 200.0).abs() < 1e-9);
    assert!((leverage - 0.2).abs() < 1e-9);
}

#[tokio::test]
async fn invalid_price_is_unprocessable() {
    let app = TestApiServer::new().await;
    let response = app
        .server
        .post("/api/position/size")
        .json(&json!({
            "instrument": "BTC-PERP",
            "signal_strength": 1.0,
            "price": 0.0,
            "volatility": 0.02
        }))
        .await;
    assert_eq!(response.status_code(), 422);

    let body: Value = response.json();
    assert!(body["error"].as_str().unwrap().contains("price"));
}
