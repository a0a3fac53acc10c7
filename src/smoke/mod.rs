//! Manual smoke tests against the live store: a one-row connectivity probe and
//! a sweep over every data-access call with fixed sample tickers.

pub mod report;

use tracing::{error, info, warn};

use crate::market::{
    get_crypto_window, get_latest_crypto, get_latest_stock, get_stock_window, search_crypto,
    search_stocks,
};
use crate::store::RemoteStore;
use crate::types::ConnectionStatus;

pub use report::{LineLevel, ReportCollector, ReportLine};

/// Ticker the connectivity probe reads one day of.
pub const PROBE_TICKER: &str = "NVDA";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Probe {
    StockWindow,
    LatestStock,
    StockSearch,
    CryptoWindow,
    LatestCrypto,
    CryptoSearch,
}

impl Probe {
    /// Sweep order.
    pub const ALL: [Probe; 6] = [
        Probe::StockWindow,
        Probe::LatestStock,
        Probe::StockSearch,
        Probe::CryptoWindow,
        Probe::LatestCrypto,
        Probe::CryptoSearch,
    ];

    pub fn title(self) -> &'static str {
        match self {
            Probe::StockWindow => "stock window data",
            Probe::LatestStock => "latest stock data",
            Probe::StockSearch => "stock search",
            Probe::CryptoWindow => "crypto window data",
            Probe::LatestCrypto => "latest crypto data",
            Probe::CryptoSearch => "crypto search",
        }
    }
}

/// Fetch one day of `PROBE_TICKER`. Always settles to `Connected` or `Failed`.
pub async fn test_connection(store: &dyn RemoteStore) -> ConnectionStatus {
    info!("Quick connection test...");
    match get_stock_window(store, PROBE_TICKER, Some(1)).await {
        Ok(rows) => match rows.first() {
            Some(latest) => {
                info!("Connection successful, {PROBE_TICKER} latest: {} close {}", latest.d, latest.close);
                ConnectionStatus::Connected
            }
            None => {
                warn!("Connection failed: no {PROBE_TICKER} rows returned");
                ConnectionStatus::Failed(format!("no {PROBE_TICKER} rows returned"))
            }
        },
        Err(e) => {
            error!("Connection failed: {e}");
            ConnectionStatus::Failed(e.to_string())
        }
    }
}

/// Run every probe in order. A failing probe is reported and the sweep moves on.
/// Returns the number of failed probes.
pub async fn run_full_sweep(store: &dyn RemoteStore, report: &mut ReportCollector) -> usize {
    report.info("Testing Pattern Whisper APIs...");
    let mut failed = 0;
    for probe in Probe::ALL {
        report.info(format!("Testing {}...", probe.title()));
        if !run_probe(store, probe, report).await {
            failed += 1;
        }
    }
    report.info(format!(
        "API testing complete! {} of {} probes passed",
        Probe::ALL.len() - failed,
        Probe::ALL.len()
    ));
    failed
}

fn format_close(close: Option<f64>) -> String {
    close.map_or("n/a".to_string(), |c| format!("{c:.2}"))
}

fn format_opt(value: Option<f64>) -> String {
    value.map_or("n/a".to_string(), |v| format!("{v}"))
}

async fn run_probe(store: &dyn RemoteStore, probe: Probe, report: &mut ReportCollector) -> bool {
    match probe {
        Probe::StockWindow => match get_stock_window(store, "NVDA", Some(5)).await {
            Ok(rows) => {
                report.info(format!("Stock window: {} days of NVDA data", rows.len()));
                report.info(format!("   Latest close: {}", format_close(rows.first().map(|r| r.close))));
                true
            }
            Err(e) => {
                report.error(format!("Stock window failed: {e}"));
                false
            }
        },
        Probe::LatestStock => match get_latest_stock(store, "AAPL").await {
            Ok(row) => {
                report.info(format!("Latest AAPL: {} PE: {}", format_close(Some(row.close)), format_opt(row.pe)));
                true
            }
            Err(e) => {
                report.error(format!("Latest stock failed: {e}"));
                false
            }
        },
        Probe::StockSearch => match search_stocks(store, "A", None).await {
            Ok(hits) => {
                let tickers: Vec<_> = hits.iter().map(|h| h.ticker.as_str()).collect();
                report.info(format!("Found tickers: {}", tickers.join(", ")));
                true
            }
            Err(e) => {
                report.error(format!("Stock search failed: {e}"));
                false
            }
        },
        Probe::CryptoWindow => match get_crypto_window(store, "BTC-USD", Some(3)).await {
            Ok(rows) => {
                report.info(format!("Crypto window: {} days of BTC data", rows.len()));
                report.info(format!("   Latest close: {}", format_close(rows.first().map(|r| r.close))));
                true
            }
            Err(e) => {
                report.error(format!("Crypto window failed: {e}"));
                false
            }
        },
        Probe::LatestCrypto => match get_latest_crypto(store, "ETH-USD").await {
            Ok(row) => {
                report.info(format!(
                    "Latest ETH: {} Market cap: {}",
                    format_close(Some(row.close)),
                    format_opt(row.market_cap)
                ));
                true
            }
            Err(e) => {
                report.error(format!("Latest crypto failed: {e}"));
                false
            }
        },
        Probe::CryptoSearch => match search_crypto(store, "BTC", None).await {
            Ok(hits) => {
                let labels: Vec<_> = hits.iter().map(|h| h.to_string()).collect();
                report.info(format!("Found crypto: {}", labels.join(", ")));
                true
            }
            Err(e) => {
                report.error(format!("Crypto search failed: {e}"));
                false
            }
        },
    }
}
