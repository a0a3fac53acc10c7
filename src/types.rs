use chrono::NaiveDate;
use serde::{Deserialize, Serialize};

use crate::config::{CRYPTO_WINDOW_DAYS, STOCK_WINDOW_DAYS};

// ---------------------------------------------------------------------------
// Asset classes
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AssetClass {
    Stock,
    Crypto,
}

impl AssetClass {
    /// Trading days for stocks, calendar days for crypto.
    pub fn default_window_days(self) -> i64 {
        match self {
            AssetClass::Stock => STOCK_WINDOW_DAYS,
            AssetClass::Crypto => CRYPTO_WINDOW_DAYS,
        }
    }

    pub fn window_function(self) -> &'static str {
        match self {
            AssetClass::Stock => "get_stock_window",
            AssetClass::Crypto => "get_crypto_window",
        }
    }

    pub fn latest_view(self) -> &'static str {
        match self {
            AssetClass::Stock => "v_stock_latest",
            AssetClass::Crypto => "v_crypto_latest",
        }
    }

    pub fn daily_table(self) -> &'static str {
        match self {
            AssetClass::Stock => "stocks_daily",
            AssetClass::Crypto => "crypto_daily",
        }
    }
}

impl std::fmt::Display for AssetClass {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            AssetClass::Stock => "stock",
            AssetClass::Crypto => "crypto",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Price rows (read-only historical facts)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct StockRow {
    /// Present on view rows, absent from window rows.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub d: NaiveDate,
    pub close: f64,
    #[serde(default)]
    pub adj_close: Option<f64>,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub pe: Option<f64>,
    #[serde(default)]
    pub ps: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CryptoRow {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ticker: Option<String>,
    pub d: NaiveDate,
    pub close: f64,
    #[serde(default)]
    pub volume: Option<f64>,
    #[serde(default)]
    pub market_cap: Option<f64>,
    #[serde(default)]
    pub circulating_supply: Option<f64>,
}

// ---------------------------------------------------------------------------
// Search
// ---------------------------------------------------------------------------

/// One autocomplete hit. `name` is only populated for crypto.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TickerMatch {
    pub ticker: String,
    #[serde(default, alias = "coin_name", skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
}

impl std::fmt::Display for TickerMatch {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.name {
            Some(name) => write!(f, "{} ({})", self.ticker, name),
            None => write!(f, "{}", self.ticker),
        }
    }
}

// ---------------------------------------------------------------------------
// Connection status
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub enum ConnectionStatus {
    Pending,
    Connected,
    Failed(String),
}

impl ConnectionStatus {
    pub fn label(&self) -> &'static str {
        match self {
            ConnectionStatus::Pending => "pending",
            ConnectionStatus::Connected => "connected",
            ConnectionStatus::Failed(_) => "failed",
        }
    }

    pub fn is_settled(&self) -> bool {
        !matches!(self, ConnectionStatus::Pending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stock_row_tolerates_null_fundamentals() {
        let raw = r#"{"d":"2024-06-03","close":1150.0,"adj_close":null,"volume":31200000,"pe":null,"ps":35.2,"market_cap":null}"#;
        let row: StockRow = serde_json::from_str(raw).unwrap();
        assert_eq!(row.d, NaiveDate::from_ymd_opt(2024, 6, 3).unwrap());
        assert!(row.ticker.is_none());
        assert!(row.pe.is_none());
        assert_eq!(row.ps, Some(35.2));
        assert_eq!(row.volume, Some(31_200_000.0));
    }

    #[test]
    fn crypto_match_reads_coin_name() {
        let raw = r#"{"ticker":"BTC-USD","coin_name":"Bitcoin"}"#;
        let m: TickerMatch = serde_json::from_str(raw).unwrap();
        assert_eq!(m.name.as_deref(), Some("Bitcoin"));
        assert_eq!(m.to_string(), "BTC-USD (Bitcoin)");
    }

    #[test]
    fn stock_match_has_no_name() {
        let m: TickerMatch = serde_json::from_str(r#"{"ticker":"AAPL"}"#).unwrap();
        assert!(m.name.is_none());
        assert_eq!(serde_json::to_string(&m).unwrap(), r#"{"ticker":"AAPL"}"#);
    }

    #[test]
    fn asset_class_defaults() {
        assert_eq!(AssetClass::Stock.default_window_days(), 252);
        assert_eq!(AssetClass::Crypto.default_window_days(), 365);
        assert_eq!(AssetClass::Crypto.window_function(), "get_crypto_window");
        assert_eq!(AssetClass::Stock.latest_view(), "v_stock_latest");
    }

    #[test]
    fn only_pending_is_unsettled() {
        assert!(!ConnectionStatus::Pending.is_settled());
        assert!(ConnectionStatus::Connected.is_settled());
        assert!(ConnectionStatus::Failed("x".into()).is_settled());
    }
}
