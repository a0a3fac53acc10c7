use std::sync::Arc;

use axum::{
    extract::{Path, Query, State},
    response::Html,
    routing::{get, post},
    Json, Router,
};
use serde::{Deserialize, Serialize};

use crate::api::health::HealthState;
use crate::api::page::INDEX_HTML;
use crate::error::AppError;
use crate::market;
use crate::smoke::{run_full_sweep, test_connection, ReportCollector};
use crate::store::RemoteStore;
use crate::types::{ConnectionStatus, CryptoRow, StockRow, TickerMatch};

#[derive(Clone)]
pub struct ApiState {
    pub store: Arc<dyn RemoteStore>,
    pub health: Arc<HealthState>,
}

pub fn router(state: ApiState) -> Router {
    Router::new()
        .route("/", get(index))
        .route("/health", get(get_health))
        .route("/api/connection", get(get_connection))
        .route("/api/tests", post(run_tests))
        .route("/api/stocks/search", get(search_stocks))
        .route("/api/stocks/:ticker/window", get(get_stock_window))
        .route("/api/stocks/:ticker/latest", get(get_latest_stock))
        .route("/api/crypto/search", get(search_crypto))
        .route("/api/crypto/:ticker/window", get(get_crypto_window))
        .route("/api/crypto/:ticker/latest", get(get_latest_crypto))
        .with_state(state)
}

// ---------------------------------------------------------------------------
// Query param structs
// ---------------------------------------------------------------------------

#[derive(Deserialize)]
pub struct WindowQuery {
    pub days: Option<i64>,
}

#[derive(Deserialize)]
pub struct SearchQuery {
    pub q: String,
    pub limit: Option<usize>,
}

// ---------------------------------------------------------------------------
// Response types
// ---------------------------------------------------------------------------

#[derive(Debug, Serialize, Deserialize, PartialEq)]
pub struct ConnectionResponse {
    pub status: String,
    pub reason: Option<String>,
}

impl From<&ConnectionStatus> for ConnectionResponse {
    fn from(status: &ConnectionStatus) -> Self {
        let reason = match status {
            ConnectionStatus::Failed(r) => Some(r.clone()),
            _ => None,
        };
        Self {
            status: status.label().to_string(),
            reason,
        }
    }
}

#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub connection: ConnectionResponse,
    pub sweeps_run: u64,
}

// ---------------------------------------------------------------------------
// Handlers
// ---------------------------------------------------------------------------

async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

async fn get_health(State(state): State<ApiState>) -> Json<HealthResponse> {
    Json(HealthResponse {
        connection: ConnectionResponse::from(&state.health.connection()),
        sweeps_run: state.health.sweeps_run(),
    })
}

async fn get_connection(State(state): State<ApiState>) -> Json<ConnectionResponse> {
    let status = test_connection(state.store.as_ref()).await;
    let body = ConnectionResponse::from(&status);
    state.health.set_connection(status);
    Json(body)
}

/// Plain-text report of the full sweep.
async fn run_tests(State(state): State<ApiState>) -> String {
    let mut report = ReportCollector::new();
    run_full_sweep(state.store.as_ref(), &mut report).await;
    state.health.inc_sweeps_run();
    report.render()
}

async fn get_stock_window(
    State(state): State<ApiState>,
    Path(ticker): Path<String>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<StockRow>>, AppError> {
    let rows = market::get_stock_window(state.store.as_ref(), &ticker, params.days).await?;
    Ok(Json(rows))
}

async fn get_latest_stock(
    State(state): State<ApiState>,
    Path(ticker): Path<String>,
) -> Result<Json<StockRow>, AppError> {
    let row = market::get_latest_stock(state.store.as_ref(), &ticker).await?;
    Ok(Json(row))
}

async fn search_stocks(
    State(state): State<ApiState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<TickerMatch>>, AppError> {
    let hits = market::search_stocks(state.store.as_ref(), &params.q, params.limit).await?;
    Ok(Json(hits))
}

async fn get_crypto_window(
    State(state): State<ApiState>,
    Path(ticker): Path<String>,
    Query(params): Query<WindowQuery>,
) -> Result<Json<Vec<CryptoRow>>, AppError> {
    let rows = market::get_crypto_window(state.store.as_ref(), &ticker, params.days).await?;
    Ok(Json(rows))
}

async fn get_latest_crypto(
    State(state): State<ApiState>,
    Path(ticker): Path<String>,
) -> Result<Json<CryptoRow>, AppError> {
    let row = market::get_latest_crypto(state.store.as_ref(), &ticker).await?;
    Ok(Json(row))
}

async fn search_crypto(
    State(state): State<ApiState>,
    Query(params): Query<SearchQuery>,
) -> Result<Json<Vec<TickerMatch>>, AppError> {
    let hits = market::search_crypto(state.store.as_ref(), &params.q, params.limit).await?;
    Ok(Json(hits))
}

#[cfg(test)]
mod tests {
    use axum::body::{to_bytes, Body};
    use axum::http::{Request, StatusCode};
    use serde_json::{json, Value};
    use tower::ServiceExt;

    use super::*;
    use crate::store::fake::{Call, FakeStore};

    fn app(store: FakeStore) -> (Router, Arc<FakeStore>, Arc<HealthState>) {
        let store = Arc::new(store);
        let health = Arc::new(HealthState::new());
        let state = ApiState {
            store: store.clone(),
            health: health.clone(),
        };
        (router(state), store, health)
    }

    async fn send(router: Router, method: &str, uri: &str) -> (StatusCode, String) {
        let req = Request::builder()
            .method(method)
            .uri(uri)
            .body(Body::empty())
            .unwrap();
        let resp = router.oneshot(req).await.unwrap();
        let status = resp.status();
        let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
        (status, String::from_utf8(bytes.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn index_serves_page() {
        let (router, _, _) = app(FakeStore::returning(json!([])));
        let (status, body) = send(router, "GET", "/").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("Run Full API Tests"));
    }

    #[tokio::test]
    async fn connection_endpoint_updates_health() {
        let (router, _, health) = app(FakeStore::returning(json!([{"d":"2024-06-05","close":1224.4}])));
        let (status, body) = send(router, "GET", "/api/connection").await;
        assert_eq!(status, StatusCode::OK);
        let resp: ConnectionResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.status, "connected");
        assert!(resp.reason.is_none());
        assert_eq!(health.connection(), ConnectionStatus::Connected);
    }

    #[tokio::test]
    async fn connection_failure_carries_reason() {
        let (router, _, _) = app(FakeStore::failing("Invalid API key"));
        let (_, body) = send(router, "GET", "/api/connection").await;
        let resp: ConnectionResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.status, "failed");
        assert!(resp.reason.unwrap().contains("Invalid API key"));
    }

    #[tokio::test]
    async fn tests_endpoint_returns_plain_report() {
        let (router, store, health) = app(FakeStore::failing("offline"));
        let (status, body) = send(router, "POST", "/api/tests").await;
        assert_eq!(status, StatusCode::OK);
        assert!(body.contains("ERROR: Stock window failed"));
        assert!(body.contains("ERROR: Crypto search failed"));
        assert_eq!(store.calls().len(), 6);
        assert_eq!(health.sweeps_run(), 1);
    }

    #[tokio::test]
    async fn stock_window_passes_days_and_uppercases() {
        let (router, store, _) = app(FakeStore::returning(json!([{"d":"2024-06-05","close":1224.4}])));
        let (status, body) = send(router, "GET", "/api/stocks/nvda/window?days=5").await;
        assert_eq!(status, StatusCode::OK);
        let rows: Value = serde_json::from_str(&body).unwrap();
        assert_eq!(rows.as_array().unwrap().len(), 1);
        assert_eq!(
            store.calls(),
            vec![Call::Rpc {
                function: "get_stock_window".to_string(),
                args: json!({"p_ticker": "NVDA", "p_days": 5}),
            }]
        );
    }

    #[tokio::test]
    async fn latest_missing_is_404() {
        let (router, _, _) = app(FakeStore::returning(json!([])));
        let (status, _) = send(router, "GET", "/api/crypto/DOGE-USD/latest").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn remote_failure_is_502() {
        let (router, _, _) = app(FakeStore::failing("upstream timeout"));
        let (status, body) = send(router, "GET", "/api/stocks/AAPL/latest").await;
        assert_eq!(status, StatusCode::BAD_GATEWAY);
        assert!(body.contains("upstream timeout"));
    }

    #[tokio::test]
    async fn crypto_search_dedups() {
        let (router, _, _) = app(FakeStore::returning(json!([
            {"ticker":"BTC-USD","coin_name":"Bitcoin"},
            {"ticker":"BTC-USD","coin_name":"Bitcoin"}
        ])));
        let (status, body) = send(router, "GET", "/api/crypto/search?q=btc&limit=5").await;
        assert_eq!(status, StatusCode::OK);
        let hits: Vec<TickerMatch> = serde_json::from_str(&body).unwrap();
        assert_eq!(hits.len(), 1);
        assert_eq!(hits[0].name.as_deref(), Some("Bitcoin"));
    }

    #[tokio::test]
    async fn health_reports_pending_before_probe() {
        let (router, _, _) = app(FakeStore::returning(json!([])));
        let (_, body) = send(router, "GET", "/health").await;
        let resp: HealthResponse = serde_json::from_str(&body).unwrap();
        assert_eq!(resp.connection.status, "pending");
        assert_eq!(resp.sweeps_run, 0);
    }
}
