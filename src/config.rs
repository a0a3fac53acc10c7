use crate::error::{AppError, Result};

pub const SUPABASE_URL: &str = "https://ztgvmqdencafiyoaarpu.supabase.co";

/// Where the service role key can be copied from when it is missing.
pub const SERVICE_KEY_HINT_URL: &str =
    "https://supabase.com/dashboard/project/ztgvmqdencafiyoaarpu/settings/api";

/// Relative directory holding the ordered SQL migrations.
pub const MIGRATIONS_DIR: &str = "supabase/migrations";

/// Request timeout for the remote store client (seconds).
pub const REQUEST_TIMEOUT_SECS: u64 = 30;

/// Default window lengths per asset class.
pub const STOCK_WINDOW_DAYS: i64 = 252;
pub const CRYPTO_WINDOW_DAYS: i64 = 365;

/// Default cap for ticker autocomplete.
pub const SEARCH_LIMIT: usize = 10;

// ---------------------------------------------------------------------------
// Tunables. Consumed by analog-search logic that does not exist yet; only the
// bucket helpers at the bottom of this file read them today.
// ---------------------------------------------------------------------------

pub mod patterns {
    /// Trading days (1 year).
    pub const DEFAULT_WINDOW_LENGTH: usize = 252;
    pub const MIN_WINDOW_LENGTH: usize = 60;
    /// Two years of trading days.
    pub const MAX_WINDOW_LENGTH: usize = 504;
    pub const MIN_SIMILARITY_SCORE: f64 = 0.7;
    pub const MAX_ANALOG_RESULTS: usize = 50;
    pub const TOP_MATCHES_TO_SHOW: usize = 10;
    /// Days ahead: 1m, 3m, 6m, 12m.
    pub const PREDICTION_HORIZONS: &[u32] = &[21, 63, 126, 252];
}

pub mod data {
    pub const HISTORICAL_START_YEAR: i32 = 1990;
    pub const MAX_DATA_POINTS: usize = 10_000;
    pub const CACHE_EXPIRY_SECS: u64 = 300;
    pub const UPDATE_FREQUENCY: &str = "daily";
    pub const DEFAULT_CURRENCY: &str = "USD";
}

pub mod confidence {
    pub mod weights {
        pub const PATTERN_SIMILARITY: f64 = 0.6;
        pub const MACRO_SIMILARITY: f64 = 0.2;
        pub const VALUATION_SIMILARITY: f64 = 0.2;
    }

    pub mod thresholds {
        pub const HIGH: f64 = 0.8;
        pub const MEDIUM: f64 = 0.6;
        pub const LOW: f64 = 0.4;
    }

    pub const SECTOR_BONUS: f64 = 0.02;
}

pub mod risk {
    /// Annualized volatility bucket edges.
    pub mod volatility {
        pub const LOW_MAX: f64 = 0.15;
        pub const MEDIUM_MAX: f64 = 0.30;
    }

    pub mod drawdown {
        pub const ACCEPTABLE: f64 = -0.10;
        pub const CONCERNING: f64 = -0.20;
        pub const SEVERE: f64 = -0.30;
    }
}

pub mod rate_limit {
    #[derive(Debug, Clone, Copy, PartialEq, Eq)]
    pub struct Limits {
        pub per_hour: u32,
        pub per_minute: u32,
        pub per_second: u32,
    }

    pub const PER_USER: Limits = Limits { per_hour: 100, per_minute: 20, per_second: 2 };
    pub const PER_IP: Limits = Limits { per_hour: 50, per_minute: 10, per_second: 1 };
    pub const PREMIUM_MULTIPLIER: u32 = 10;
}

pub mod features {
    pub const ENABLE_CRYPTO: bool = true;
    pub const ENABLE_INTRADAY: bool = false;
    pub const ENABLE_ALERTS: bool = false;
    pub const ENABLE_SOCIAL_SHARING: bool = true;
    pub const ENABLE_DEMO_MODE: bool = true;
    pub const DEMO_TICKERS: &[&str] = &["NVDA", "AAPL", "MSFT", "BTC-USD", "ETH-USD"];
}

pub mod database {
    pub const MAX_RETRIES: u32 = 3;
    pub const RETRY_DELAY_MS: u64 = 1_000;
    pub const TIMEOUT_MS: u64 = 30_000;
    pub const BATCH_SIZE: usize = 1_000;
}

pub mod performance {
    pub const DEBOUNCE_DELAY_MS: u64 = 300;
    pub const THROTTLE_DELAY_MS: u64 = 1_000;
    pub const MAX_CONCURRENT_REQUESTS: usize = 3;
}

pub mod sectors {
    pub const CODES: &[(&str, &str)] = &[
        ("tech", "Technology"),
        ("healthcare", "Healthcare"),
        ("finance", "Financial Services"),
        ("consumer", "Consumer Discretionary"),
        ("industrial", "Industrials"),
        ("energy", "Energy"),
        ("utilities", "Utilities"),
        ("realestate", "Real Estate"),
        ("materials", "Materials"),
        ("staples", "Consumer Staples"),
        ("telecom", "Communication Services"),
    ];
}

pub mod macro_indicators {
    pub const NAMES: &[(&str, &str)] = &[
        ("fed_funds", "Fed Funds Rate"),
        ("cpi_yoy", "CPI (YoY)"),
        ("ust2y", "2-Year Treasury"),
        ("ust10y", "10-Year Treasury"),
        ("vix", "VIX"),
        ("dxy", "Dollar Index"),
        ("wti", "WTI Crude"),
        ("spx_ret", "S&P 500 Return"),
    ];

    pub const VIX_HIGH: f64 = 30.0;
    pub const VIX_LOW: f64 = 12.0;
    pub const UST10Y_HIGH: f64 = 5.0;
    pub const UST10Y_LOW: f64 = 1.5;
    pub const CPI_YOY_HIGH: f64 = 4.0;
    pub const CPI_YOY_TARGET: f64 = 2.0;
}

// ---------------------------------------------------------------------------
// Bucket helpers
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RiskLevel {
    Low,
    Medium,
    High,
}

impl RiskLevel {
    /// Bucket an annualized volatility.
    pub fn from_volatility(volatility: f64) -> Self {
        use self::risk::volatility::*;
        if volatility < LOW_MAX {
            RiskLevel::Low
        } else if volatility < MEDIUM_MAX {
            RiskLevel::Medium
        } else {
            RiskLevel::High
        }
    }
}

impl std::fmt::Display for RiskLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            RiskLevel::Low => "low",
            RiskLevel::Medium => "medium",
            RiskLevel::High => "high",
        };
        write!(f, "{s}")
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ConfidenceLevel {
    High,
    Medium,
    Low,
}

impl ConfidenceLevel {
    /// Anything under the medium threshold is `Low`; the low threshold is not a floor.
    pub fn from_score(score: f64) -> Self {
        use self::confidence::thresholds::*;
        if score >= HIGH {
            ConfidenceLevel::High
        } else if score >= MEDIUM {
            ConfidenceLevel::Medium
        } else {
            ConfidenceLevel::Low
        }
    }
}

impl std::fmt::Display for ConfidenceLevel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            ConfidenceLevel::High => "high",
            ConfidenceLevel::Medium => "medium",
            ConfidenceLevel::Low => "low",
        };
        write!(f, "{s}")
    }
}

// ---------------------------------------------------------------------------
// Runtime configuration
// ---------------------------------------------------------------------------

/// Which secret a process needs. The web surfaces read with the anon key;
/// migrations need the service role.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyRole {
    Anon,
    ServiceRole,
}

impl KeyRole {
    pub fn env_var(self) -> &'static str {
        match self {
            KeyRole::Anon => "SUPABASE_ANON_KEY",
            KeyRole::ServiceRole => "SUPABASE_SERVICE_ROLE_KEY",
        }
    }
}

#[derive(Debug, Clone)]
pub struct Config {
    pub store_url: String,
    pub api_key: String,
    pub log_level: String,
    pub api_port: u16,
    /// Directory the migration runner reads scripts from (MIGRATIONS_DIR)
    pub migrations_dir: String,
}

impl Config {
    pub fn from_env(role: KeyRole) -> Result<Self> {
        Self::from_lookup(role, |key| std::env::var(key).ok())
    }

    /// Same as `from_env` but reads variables through `lookup`.
    pub fn from_lookup<F>(role: KeyRole, lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let api_key = lookup(role.env_var())
            .map(|k| k.trim().to_string())
            .filter(|k| !k.is_empty())
            .ok_or_else(|| {
                AppError::Config(format!("Missing {} environment variable", role.env_var()))
            })?;

        Ok(Self {
            store_url: lookup("SUPABASE_URL")
                .unwrap_or_else(|| SUPABASE_URL.to_string())
                .trim_end_matches('/')
                .to_string(),
            api_key,
            log_level: lookup("LOG_LEVEL").unwrap_or_else(|| "info".to_string()),
            api_port: lookup("API_PORT")
                .unwrap_or_else(|| "3000".to_string())
                .parse::<u16>()
                .map_err(|_| AppError::Config("API_PORT must be a valid port number".to_string()))?,
            migrations_dir: lookup("MIGRATIONS_DIR").unwrap_or_else(|| MIGRATIONS_DIR.to_string()),
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        move |key: &str| map.get(key).cloned()
    }

    #[test]
    fn missing_key_is_a_config_error() {
        let err = Config::from_lookup(KeyRole::ServiceRole, env(&[])).unwrap_err();
        match err {
            AppError::Config(msg) => assert!(msg.contains("SUPABASE_SERVICE_ROLE_KEY")),
            other => panic!("expected Config error, got {other:?}"),
        }
    }

    #[test]
    fn blank_key_counts_as_missing() {
        let result = Config::from_lookup(KeyRole::Anon, env(&[("SUPABASE_ANON_KEY", "  ")]));
        assert!(result.is_err());
    }

    #[test]
    fn defaults_applied() {
        let cfg = Config::from_lookup(KeyRole::Anon, env(&[("SUPABASE_ANON_KEY", "anon")])).unwrap();
        assert_eq!(cfg.store_url, SUPABASE_URL);
        assert_eq!(cfg.api_key, "anon");
        assert_eq!(cfg.log_level, "info");
        assert_eq!(cfg.api_port, 3000);
        assert_eq!(cfg.migrations_dir, MIGRATIONS_DIR);
    }

    #[test]
    fn overrides_and_trailing_slash() {
        let cfg = Config::from_lookup(
            KeyRole::Anon,
            env(&[
                ("SUPABASE_ANON_KEY", "anon"),
                ("SUPABASE_URL", "http://localhost:54321/"),
                ("API_PORT", "8080"),
            ]),
        )
        .unwrap();
        assert_eq!(cfg.store_url, "http://localhost:54321");
        assert_eq!(cfg.api_port, 8080);
    }

    #[test]
    fn bad_port_rejected() {
        let result = Config::from_lookup(
            KeyRole::Anon,
            env(&[("SUPABASE_ANON_KEY", "anon"), ("API_PORT", "not-a-port")]),
        );
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn risk_buckets() {
        assert_eq!(RiskLevel::from_volatility(0.10), RiskLevel::Low);
        assert_eq!(RiskLevel::from_volatility(0.15), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility(0.29), RiskLevel::Medium);
        assert_eq!(RiskLevel::from_volatility(0.30), RiskLevel::High);
    }

    #[test]
    fn confidence_buckets() {
        assert_eq!(ConfidenceLevel::from_score(0.85), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.8), ConfidenceLevel::High);
        assert_eq!(ConfidenceLevel::from_score(0.65), ConfidenceLevel::Medium);
        assert_eq!(ConfidenceLevel::from_score(0.2), ConfidenceLevel::Low);
    }
}
