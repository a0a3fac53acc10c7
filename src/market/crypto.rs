use crate::config::SEARCH_LIMIT;
use crate::error::Result;
use crate::market::{fetch_latest, fetch_window, normalize_ticker, run_search, sanitize_term};
use crate::store::{RemoteStore, TableQuery};
use crate::types::{AssetClass, CryptoRow, TickerMatch};

/// Up to `days` most recent calendar days for `ticker`, newest first.
/// `None` means one calendar year.
pub async fn get_crypto_window(
    store: &dyn RemoteStore,
    ticker: &str,
    days: Option<i64>,
) -> Result<Vec<CryptoRow>> {
    fetch_window(store, AssetClass::Crypto, ticker, days).await
}

pub async fn get_latest_crypto(store: &dyn RemoteStore, ticker: &str) -> Result<CryptoRow> {
    fetch_latest(store, AssetClass::Crypto, ticker).await
}

/// Prefix match on the ticker or substring match on the coin name.
pub async fn search_crypto(
    store: &dyn RemoteStore,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<TickerMatch>> {
    let term = sanitize_term(query);
    let expression = format!(
        "ticker.ilike.{}*,coin_name.ilike.*{}*",
        normalize_ticker(&term),
        term
    );
    let query = TableQuery::from(AssetClass::Crypto.daily_table())
        .select("ticker,coin_name")
        .or(&expression)
        .order("ticker")
        .limit(limit.unwrap_or(SEARCH_LIMIT));
    run_search(store, query).await
}
