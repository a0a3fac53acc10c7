//! Read-only access to daily price history.
//!
//! Every call normalizes the ticker, makes exactly one remote call and returns
//! a `Result`; nothing here panics or retries.

pub mod crypto;
pub mod stocks;

use std::collections::HashSet;

use serde::de::DeserializeOwned;
use serde_json::{json, Value};
use tracing::{debug, error};

use crate::error::{AppError, Result};
use crate::store::{RemoteStore, TableQuery};
use crate::types::{AssetClass, TickerMatch};

pub use crypto::{get_crypto_window, get_latest_crypto, search_crypto};
pub use stocks::{get_latest_stock, get_stock_window, search_stocks};

pub fn normalize_ticker(ticker: &str) -> String {
    ticker.trim().to_uppercase()
}

/// Keeps the first row for each ticker, preserving server order.
pub fn dedup_by_ticker(rows: Vec<TickerMatch>) -> Vec<TickerMatch> {
    let mut seen = HashSet::new();
    rows.into_iter()
        .filter(|row| seen.insert(row.ticker.clone()))
        .collect()
}

/// Strips characters PostgREST treats as filter syntax.
pub fn sanitize_term(term: &str) -> String {
    term.chars()
        .filter(|c| !matches!(c, ',' | '(' | ')' | '"'))
        .collect::<String>()
        .trim()
        .to_string()
}

fn require_ticker(ticker: &str) -> Result<String> {
    let ticker = normalize_ticker(ticker);
    if ticker.is_empty() {
        return Err(AppError::InvalidInput("ticker must not be empty".to_string()));
    }
    Ok(ticker)
}

fn decode_rows<T: DeserializeOwned>(value: Value) -> Result<Vec<T>> {
    match value {
        Value::Null => Ok(Vec::new()),
        other => Ok(serde_json::from_value(other)?),
    }
}

/// `days` is forwarded as-is; zero and negative values are the server's business.
pub(crate) async fn fetch_window<T: DeserializeOwned>(
    store: &dyn RemoteStore,
    asset: AssetClass,
    ticker: &str,
    days: Option<i64>,
) -> Result<Vec<T>> {
    let ticker = require_ticker(ticker)?;
    let days = days.unwrap_or_else(|| asset.default_window_days());
    let args = json!({ "p_ticker": ticker, "p_days": days });

    let value = store
        .rpc(asset.window_function(), args)
        .await
        .inspect_err(|e| error!("Error fetching {asset} window for {ticker}: {e}"))?;

    let rows = decode_rows(value)?;
    debug!(%asset, %ticker, days, "window fetched");
    Ok(rows)
}

/// Single-row read from the asset's latest view.
pub(crate) async fn fetch_latest<T: DeserializeOwned>(
    store: &dyn RemoteStore,
    asset: AssetClass,
    ticker: &str,
) -> Result<T> {
    let ticker = require_ticker(ticker)?;
    let query = TableQuery::from(asset.latest_view()).eq("ticker", &ticker);

    let mut rows: Vec<T> = decode_rows(store.select(&query).await?)?;
    match rows.len() {
        0 => Err(AppError::NotFound(format!("no latest {asset} row for {ticker}"))),
        1 => Ok(rows.remove(0)),
        n => Err(AppError::Remote {
            status: 406,
            code: None,
            message: format!("expected a single {asset} row for {ticker}, got {n}"),
        }),
    }
}

/// The row cap applies before dedup, so fewer than `limit` matches can come back.
pub(crate) async fn run_search(store: &dyn RemoteStore, query: TableQuery) -> Result<Vec<TickerMatch>> {
    let rows: Vec<TickerMatch> = decode_rows(store.select(&query).await?)?;
    Ok(dedup_by_ticker(rows))
}
