//! HTTP endpoint server using Axum

use axum::{
    extract::{Path, Request, State},
    http::StatusCode,
    middleware::Next,
    response::{Json, Response},
    routing::{get, post},
    Router,
};
use serde::{Deserialize, Serialize};
use serde_json::{json, Value};
use std::sync::Arc;
use std::time::Instant;
use tokio::sync::Mutex;
use tower::ServiceBuilder;
use tower_http::{
    cors::CorsLayer,
    trace::{DefaultMakeSpan, DefaultOnRequest, DefaultOnResponse, TraceLayer},
};
use tracing::{error, info, warn, Level};

use crate::config::EngineConfig;
use crate::indicators::IndicatorError;
use crate::metrics::Metrics;
use crate::models::indicators::{IndicatorOutput, MarketData};
use crate::models::position::LeverageDecision;
use crate::models::signal::{AgentSignal, AggregatedSignal, SentimentSummary, SignalDirection};
use crate::signals::{analyze_consensus, Consensus, SignalAggregator};
use crate::sizing::{LeverageSizer, SizingError, DEFAULT_MARGIN_REQUIREMENT};

/// Shared handler state. Each stateful component sits behind its own mutex so
/// indicator histories are never mutated concurrently.
#[derive(Clone)]
pub struct AppState {
    pub metrics: Arc<Metrics>,
    pub start_time: Arc<Instant>,
    pub aggregator: Arc<Mutex<SignalAggregator>>,
    pub sizer: Arc<Mutex<LeverageSizer>>,
    pub consensus_threshold: f64,
}

impl AppState {
    pub fn new(
        config: &EngineConfig,
        metrics: Arc<Metrics>,
    ) -> Result<Self, Box<dyn std::error::Error + Send + Sync>> {
        let aggregator = SignalAggregator::with_defaults(&config.indicators)?;
        let sizer = LeverageSizer::new(config.leverage.clone())?;
        Ok(Self {
            metrics,
            start_time: Arc::new(Instant::now()),
            aggregator: Arc::new(Mutex::new(aggregator)),
            sizer: Arc::new(Mutex::new(sizer)),
            consensus_threshold: config.consensus_threshold,
        })
    }
}

type ApiError = (StatusCode, Json<Value>);

fn indicator_error(state: &AppState, err: &IndicatorError) -> ApiError {
    state.metrics.indicator_errors_total.inc();
    let status = match err {
        IndicatorError::NotFound(_) => StatusCode::NOT_FOUND,
        IndicatorError::DuplicateIndicator(_) => StatusCode::CONFLICT,
        IndicatorError::InvalidInput { .. } | IndicatorError::InvalidParams(_) => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
    };
    warn!(error = %err, status = %status, "Indicator request rejected");
    (status, Json(json!({ "error": err.to_string() })))
}

fn sizing_error(err: &SizingError) -> ApiError {
    warn!(error = %err, "Sizing request rejected");
    (
        StatusCode::UNPROCESSABLE_ENTITY,
        Json(json!({ "error": err.to_string() })),
    )
}

/// Liveness: answering at all means the engine is up.
pub async fn health_check(State(state): State<AppState>) -> Result<Json<Value>, StatusCode> {
    let uptime_seconds = state.start_time.elapsed().as_secs();
    Ok(Json(json!({
        "status": "healthy",
        "uptime_seconds": uptime_seconds,
        "service": "signalmesh"
    })))
}

pub async fn metrics_handler(State(state): State<AppState>) -> Result<String, StatusCode> {
    state.metrics.export().map_err(|e| {
        error!(error = %e, "Failed to export metrics");
        StatusCode::INTERNAL_SERVER_ERROR
    })
}

/// Middleware to track HTTP request metrics
async fn metrics_middleware(State(state): State<AppState>, request: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = request.method().clone();
    let path = request.uri().path().to_string();

    state.metrics.http_requests_in_flight.inc();
    let response = next.run(request).await;
    let status = response.status();
    let duration = start.elapsed();
    state.metrics.http_requests_in_flight.dec();

    state.metrics.http_requests_total.inc();
    state
        .metrics
        .http_request_duration_seconds
        .observe(duration.as_secs_f64());

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = %status,
            duration_ms = duration.as_millis(),
            "HTTP request error"
        );
    }

    response
}

#[derive(Debug, Deserialize)]
pub struct AggregateRequest {
    pub signals: Vec<AgentSignal>,
}

#[derive(Debug, Serialize)]
pub struct AggregateResponse {
    pub signals: Vec<AggregatedSignal>,
    pub summary: SentimentSummary,
    pub consensus: Consensus,
}

fn default_action() -> String {
    SignalDirection::Hold.as_str().to_string()
}

/// Entry of a summary request; only the action is read.
#[derive(Debug, Deserialize)]
pub struct ActionEntry {
    #[serde(default = "default_action")]
    pub action: String,
}

#[derive(Debug, Deserialize)]
pub struct SummaryRequest {
    pub signals: Vec<ActionEntry>,
}

#[derive(Debug, Deserialize)]
pub struct SizeRequest {
    pub instrument: String,
    pub signal_strength: f64,
    pub price: f64,
    pub volatility: f64,
    #[serde(default = "default_margin_requirement")]
    pub margin_requirement: f64,
}

fn default_margin_requirement() -> f64 {
    DEFAULT_MARGIN_REQUIREMENT
}

/// List registered indicator names
async fn list_indicators(State(state): State<AppState>) -> Json<Value> {
    let aggregator = state.aggregator.lock().await;
    Json(json!({ "indicators": aggregator.registry().names() }))
}

/// Run a single indicator over the posted series
async fn calculate_indicator(
    State(state): State<AppState>,
    Path(name): Path<String>,
    Json(data): Json<MarketData>,
) -> Result<Json<IndicatorOutput>, ApiError> {
    let mut aggregator = state.aggregator.lock().await;
    aggregator
        .registry_mut()
        .calculate(&name, &data)
        .map(Json)
        .map_err(|e| indicator_error(&state, &e))
}

/// Merge agent actions with indicator output and tally the sentiment
async fn aggregate_signals(
    State(state): State<AppState>,
    Json(request): Json<AggregateRequest>,
) -> Result<Json<AggregateResponse>, ApiError> {
    let signals = {
        let mut aggregator = state.aggregator.lock().await;
        aggregator
            .aggregate_signals(&request.signals)
            .map_err(|e| indicator_error(&state, &e))?
    };
    state
        .metrics
        .signals_aggregated_total
        .inc_by(signals.len() as u64);

    let summary = SignalAggregator::summarize_signals(&signals);
    let consensus = analyze_consensus(&summary, state.consensus_threshold);
    info!(
        count = signals.len(),
        buy = summary.buy,
        sell = summary.sell,
        hold = summary.hold,
        consensus = ?consensus.direction.filter(|_| consensus.has_consensus),
        "Aggregated signal batch"
    );

    Ok(Json(AggregateResponse {
        signals,
        summary,
        consensus,
    }))
}

/// Tally actions of already aggregated signals
async fn summarize_signals(Json(request): Json<SummaryRequest>) -> Json<SentimentSummary> {
    Json(SentimentSummary::tally(
        request.signals.iter().map(|entry| entry.action.as_str()),
    ))
}

/// Size a position from signal strength and volatility
async fn size_position(
    State(state): State<AppState>,
    Json(request): Json<SizeRequest>,
) -> Result<Json<LeverageDecision>, ApiError> {
    let mut sizer = state.sizer.lock().await;
    sizer
        .size_position(
            &request.instrument,
            request.signal_strength,
            request.price,
            request.volatility,
            request.margin_requirement,
        )
        .map(Json)
        .map_err(|e| sizing_error(&e))
}

pub fn create_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health_check))
        .route("/metrics", get(metrics_handler))
        .route("/api/indicators", get(list_indicators))
        .route("/api/indicators/{name}", post(calculate_indicator))
        .route("/api/signals/aggregate", post(aggregate_signals))
        .route("/api/signals/summary", post(summarize_signals))
        .route("/api/position/size", post(size_position))
        .layer(
            ServiceBuilder::new()
                .layer(
                    TraceLayer::new_for_http()
                        .make_span_with(DefaultMakeSpan::new().level(Level::DEBUG))
                        .on_request(DefaultOnRequest::new().level(Level::DEBUG))
                        .on_response(DefaultOnResponse::new().level(Level::DEBUG)),
                )
                .layer(axum::middleware::from_fn_with_state(
                    state.clone(),
                    metrics_middleware,
                ))
                .layer(CorsLayer::permissive()),
        )
        .with_state(state)
}

pub async fn start_server(
    config: EngineConfig,
    port: u16,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let metrics = Arc::new(Metrics::new()?);
    let state = AppState::new(&config, metrics)?;
    let app = create_router(state);
    let listener = tokio::net::TcpListener::bind(format!("0.0.0.0:{}", port)).await?;

    info!(port = port, "HTTP server listening on port {}", port);
    axum::serve(listener, app).await?;

    Ok(())
}
