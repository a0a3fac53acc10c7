use crate::config::SEARCH_LIMIT;
use crate::error::Result;
use crate::market::{fetch_latest, fetch_window, normalize_ticker, run_search, sanitize_term};
use crate::store::{RemoteStore, TableQuery};
use crate::types::{AssetClass, StockRow, TickerMatch};

/// Up to `days` most recent trading days for `ticker`, newest first.
/// `None` means one trading year.
pub async fn get_stock_window(
    store: &dyn RemoteStore,
    ticker: &str,
    days: Option<i64>,
) -> Result<Vec<StockRow>> {
    fetch_window(store, AssetClass::Stock, ticker, days).await
}

pub async fn get_latest_stock(store: &dyn RemoteStore, ticker: &str) -> Result<StockRow> {
    fetch_latest(store, AssetClass::Stock, ticker).await
}

/// Ticker-prefix autocomplete over `stocks_daily`.
pub async fn search_stocks(
    store: &dyn RemoteStore,
    query: &str,
    limit: Option<usize>,
) -> Result<Vec<TickerMatch>> {
    let prefix = normalize_ticker(&sanitize_term(query));
    let query = TableQuery::from(AssetClass::Stock.daily_table())
        .select("ticker")
        .ilike("ticker", &format!("{prefix}*"))
        .order("ticker")
        .limit(limit.unwrap_or(SEARCH_LIMIT));
    run_search(store, query).await
}
