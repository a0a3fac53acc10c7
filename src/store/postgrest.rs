use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderName, HeaderValue, AUTHORIZATION};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use crate::config::{Config, REQUEST_TIMEOUT_SECS};
use crate::error::{AppError, Result};
use crate::store::{RemoteStore, TableQuery};

/// HTTP client for a PostgREST endpoint (`{store_url}/rest/v1`).
#[derive(Debug, Clone)]
pub struct PostgrestClient {
    client: reqwest::Client,
    rest_url: String,
}

impl PostgrestClient {
    pub fn new(cfg: &Config) -> Result<Self> {
        Self::with_key(&cfg.store_url, &cfg.api_key)
    }

    pub fn with_key(store_url: &str, api_key: &str) -> Result<Self> {
        let key = HeaderValue::from_str(api_key)
            .map_err(|_| AppError::Config("API key contains invalid header characters".to_string()))?;
        let bearer = HeaderValue::from_str(&format!("Bearer {api_key}"))
            .map_err(|_| AppError::Config("API key contains invalid header characters".to_string()))?;

        let mut headers = HeaderMap::new();
        headers.insert(HeaderName::from_static("apikey"), key);
        headers.insert(AUTHORIZATION, bearer);

        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(REQUEST_TIMEOUT_SECS))
            .default_headers(headers)
            .build()?;

        Ok(Self {
            client,
            rest_url: format!("{}/rest/v1", store_url.trim_end_matches('/')),
        })
    }

    pub fn rpc_url(&self, function: &str) -> String {
        format!("{}/rpc/{}", self.rest_url, function)
    }

    pub fn table_url(&self, table: &str) -> String {
        format!("{}/{}", self.rest_url, table)
    }
}

#[async_trait]
impl RemoteStore for PostgrestClient {
    async fn rpc(&self, function: &str, args: Value) -> Result<Value> {
        let url = self.rpc_url(function);
        debug!(function, "rpc");
        let resp = self.client.post(&url).json(&args).send().await?;
        read_response(resp).await
    }

    async fn select(&self, query: &TableQuery) -> Result<Value> {
        let url = self.table_url(&query.table);
        debug!(table = %query.table, filters = ?query.filters, "select");
        let resp = self
            .client
            .get(&url)
            .query(&query.query_pairs())
            .send()
            .await?;
        read_response(resp).await
    }
}

async fn read_response(resp: reqwest::Response) -> Result<Value> {
    let status = resp.status();
    let body = resp.text().await?;
    if status.is_success() {
        parse_body(&body)
    } else {
        Err(remote_error(status.as_u16(), &body))
    }
}

/// `void` procedures answer with an empty body.
fn parse_body(body: &str) -> Result<Value> {
    if body.trim().is_empty() {
        Ok(Value::Null)
    } else {
        Ok(serde_json::from_str(body)?)
    }
}

#[derive(Deserialize)]
struct ErrorBody {
    code: Option<String>,
    message: Option<String>,
    details: Option<String>,
}

fn remote_error(status: u16, body: &str) -> AppError {
    match serde_json::from_str::<ErrorBody>(body) {
        Ok(ErrorBody { code, message: Some(message), details }) => {
            let message = match details {
                Some(d) if !d.is_empty() => format!("{message} ({d})"),
                _ => message,
            };
            AppError::Remote { status, code, message }
        }
        _ => {
            let trimmed = body.trim();
            let message = if trimmed.is_empty() {
                format!("HTTP {status}")
            } else {
                trimmed.to_string()
            };
            AppError::Remote { status, code: None, message }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn urls_are_rooted_at_rest_v1() {
        let client = PostgrestClient::with_key("https://example.supabase.co/", "key").unwrap();
        assert_eq!(
            client.rpc_url("get_stock_window"),
            "https://example.supabase.co/rest/v1/rpc/get_stock_window"
        );
        assert_eq!(
            client.table_url("v_crypto_latest"),
            "https://example.supabase.co/rest/v1/v_crypto_latest"
        );
    }

    #[test]
    fn key_with_newline_is_rejected() {
        let result = PostgrestClient::with_key("https://example.supabase.co", "bad\nkey");
        assert!(matches!(result, Err(AppError::Config(_))));
    }

    #[test]
    fn empty_body_is_null() {
        assert_eq!(parse_body("").unwrap(), Value::Null);
        assert_eq!(parse_body("  \n").unwrap(), Value::Null);
        assert_eq!(parse_body("[]").unwrap(), serde_json::json!([]));
    }

    #[test]
    fn structured_error_body() {
        let body = r#"{"code":"42883","message":"function exec_sql(sql => text) does not exist","details":null,"hint":"No function matches"}"#;
        match remote_error(404, body) {
            AppError::Remote { status, code, message } => {
                assert_eq!(status, 404);
                assert_eq!(code.as_deref(), Some("42883"));
                assert_eq!(message, "function exec_sql(sql => text) does not exist");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
    }

    #[test]
    fn details_appended_to_message() {
        let body = r#"{"code":"PGRST116","message":"JSON object requested, multiple (or no) rows returned","details":"The result contains 0 rows"}"#;
        let err = remote_error(406, body);
        assert!(err.message().ends_with("(The result contains 0 rows)"));
    }

    #[test]
    fn unstructured_error_body() {
        match remote_error(502, "Bad Gateway") {
            AppError::Remote { code, message, .. } => {
                assert!(code.is_none());
                assert_eq!(message, "Bad Gateway");
            }
            other => panic!("expected Remote, got {other:?}"),
        }
        assert_eq!(remote_error(503, "").message(), "HTTP 503");
    }
}
