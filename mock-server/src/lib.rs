//! In-process stand-in for the latest-rates endpoint.
//!
//! Serves `GET /v1/latest?apikey=..&base_currency=..&currencies=..` from a
//! fixed rate table and reproduces the provider's failure statuses: 401 for
//! a wrong or missing key, 422 for an unknown base currency, 429 once the
//! optional request quota is spent, 500 while `outage` is set.

use std::collections::BTreeMap;
use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;

use axum::{
    extract::{Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::get,
    Json, Router,
};
use serde::Deserialize;
use serde_json::{json, Value};
use tokio::net::TcpListener;

pub const DEFAULT_API_KEY: &str = "test-key";

/// base currency -> (quoted currency -> rate)
pub type RateTable = BTreeMap<String, BTreeMap<String, f64>>;

#[derive(Debug, Clone)]
pub struct MockConfig {
    pub api_key: String,
    pub rates: RateTable,
    /// Requests answered before every further one gets 429.
    pub quota: Option<u32>,
    pub outage: bool,
}

impl Default for MockConfig {
    fn default() -> Self {
        Self {
            api_key: DEFAULT_API_KEY.to_string(),
            rates: default_rates(),
            quota: None,
            outage: false,
        }
    }
}

pub fn default_rates() -> RateTable {
    let quotes = [
        ("CAD", "CAD", 1.0),
        ("CAD", "EUR", 0.68),
        ("CAD", "USD", 0.74),
        ("EUR", "CAD", 1.47),
        ("EUR", "EUR", 1.0),
        ("EUR", "USD", 1.09),
        ("USD", "CAD", 1.35),
        ("USD", "EUR", 0.92),
        ("USD", "USD", 1.0),
    ];
    let mut table = RateTable::new();
    for (base, quoted, rate) in quotes {
        table
            .entry(base.to_string())
            .or_default()
            .insert(quoted.to_string(), rate);
    }
    table
}

struct MockState {
    config: MockConfig,
    served: AtomicU32,
}

type SharedState = Arc<MockState>;

#[derive(Debug, Deserialize)]
struct LatestQuery {
    apikey: Option<String>,
    base_currency: Option<String>,
    currencies: Option<String>,
}

pub fn app() -> Router {
    app_with(MockConfig::default())
}

pub fn app_with(config: MockConfig) -> Router {
    let state = Arc::new(MockState {
        config,
        served: AtomicU32::new(0),
    });
    Router::new().route("/v1/latest", get(latest)).with_state(state)
}

pub async fn run(listener: TcpListener) -> Result<(), std::io::Error> {
    run_with(listener, MockConfig::default()).await
}

pub async fn run_with(listener: TcpListener, config: MockConfig) -> Result<(), std::io::Error> {
    axum::serve(listener, app_with(config)).await
}

fn error(status: StatusCode, message: &str) -> Response {
    (status, Json(json!({ "message": message }))).into_response()
}

async fn latest(State(state): State<SharedState>, Query(query): Query<LatestQuery>) -> Response {
    let config = &state.config;

    if config.outage {
        return error(StatusCode::INTERNAL_SERVER_ERROR, "Internal Server Error");
    }
    if query.apikey.as_deref() != Some(config.api_key.as_str()) {
        tracing::debug!("rejecting request with bad api key");
        return error(StatusCode::UNAUTHORIZED, "Invalid authentication credentials");
    }
    if let Some(quota) = config.quota {
        if state.served.fetch_add(1, Ordering::SeqCst) >= quota {
            return error(StatusCode::TOO_MANY_REQUESTS, "API rate limit exceeded");
        }
    }

    let base = query.base_currency.as_deref().unwrap_or("USD");
    let Some(quotes) = config.rates.get(base) else {
        return (
            StatusCode::UNPROCESSABLE_ENTITY,
            Json(json!({
                "message": "Validation error",
                "errors": { "base_currency": ["The selected base currency is invalid."] }
            })),
        )
            .into_response();
    };

    let data: serde_json::Map<String, Value> = match query.currencies.as_deref() {
        Some(list) => list
            .split(',')
            .map(str::trim)
            .filter_map(|code| quotes.get(code).map(|rate| (code.to_string(), json!(rate))))
            .collect(),
        None => quotes.iter().map(|(code, rate)| (code.clone(), json!(rate))).collect(),
    };

    tracing::debug!(base, quoted = data.len(), "serving latest rates");
    Json(json!({ "data": data })).into_response()
}
