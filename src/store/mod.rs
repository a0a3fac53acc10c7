//! Seam between the data-access layer and the hosted database.
//!
//! Everything the client needs from the remote store is two verbs: call a
//! named procedure with a JSON argument object, and read a table or view with
//! filters, ordering and a row cap. `PostgrestClient` speaks these over HTTP;
//! tests swap in a recording fake.

pub mod postgrest;

#[cfg(test)]
pub(crate) mod fake;

use async_trait::async_trait;
use serde_json::Value;

use crate::error::Result;

pub use postgrest::PostgrestClient;

#[async_trait]
pub trait RemoteStore: Send + Sync {
    /// Invoke a remote procedure. Procedures returning `void` yield `Value::Null`.
    async fn rpc(&self, function: &str, args: Value) -> Result<Value>;

    /// Read rows from a table or view. Always yields a JSON array on success.
    async fn select(&self, query: &TableQuery) -> Result<Value>;
}

/// A read against one table or view, rendered to PostgREST query parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableQuery {
    pub table: String,
    pub columns: String,
    /// `(column, "op.value")` pairs; the `or` pseudo-column carries a grouped expression.
    pub filters: Vec<(String, String)>,
    pub order: Option<String>,
    pub limit: Option<usize>,
}

impl TableQuery {
    pub fn from(table: impl Into<String>) -> Self {
        Self {
            table: table.into(),
            columns: "*".to_string(),
            filters: Vec::new(),
            order: None,
            limit: None,
        }
    }

    pub fn select(mut self, columns: impl Into<String>) -> Self {
        self.columns = columns.into();
        self
    }

    pub fn eq(mut self, column: &str, value: &str) -> Self {
        self.filters.push((column.to_string(), format!("eq.{value}")));
        self
    }

    /// Case-insensitive match; `*` is the wildcard.
    pub fn ilike(mut self, column: &str, pattern: &str) -> Self {
        self.filters.push((column.to_string(), format!("ilike.{pattern}")));
        self
    }

    /// Any-of filter, e.g. `ticker.ilike.BTC*,coin_name.ilike.*btc*`.
    pub fn or(mut self, expression: &str) -> Self {
        self.filters.push(("or".to_string(), format!("({expression})")));
        self
    }

    /// Ascending order on one column.
    pub fn order(mut self, column: &str) -> Self {
        self.order = Some(format!("{column}.asc"));
        self
    }

    pub fn limit(mut self, limit: usize) -> Self {
        self.limit = Some(limit);
        self
    }

    /// Value of the first filter on `column`, as sent on the wire.
    pub fn filter(&self, column: &str) -> Option<&str> {
        self.filters
            .iter()
            .find(|(c, _)| c == column)
            .map(|(_, v)| v.as_str())
    }

    pub fn query_pairs(&self) -> Vec<(String, String)> {
        let mut pairs = vec![("select".to_string(), self.columns.clone())];
        pairs.extend(self.filters.iter().cloned());
        if let Some(order) = &self.order {
            pairs.push(("order".to_string(), order.clone()));
        }
        if let Some(limit) = self.limit {
            pairs.push(("limit".to_string(), limit.to_string()));
        }
        pairs
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn query_pairs_in_wire_order() {
        let q = TableQuery::from("stocks_daily")
            .select("ticker")
            .ilike("ticker", "A*")
            .order("ticker")
            .limit(10);
        assert_eq!(
            q.query_pairs(),
            vec![
                ("select".to_string(), "ticker".to_string()),
                ("ticker".to_string(), "ilike.A*".to_string()),
                ("order".to_string(), "ticker.asc".to_string()),
                ("limit".to_string(), "10".to_string()),
            ]
        );
    }

    #[test]
    fn defaults_select_everything_without_limit() {
        let q = TableQuery::from("v_stock_latest").eq("ticker", "AAPL");
        let pairs = q.query_pairs();
        assert_eq!(pairs[0], ("select".to_string(), "*".to_string()));
        assert_eq!(q.filter("ticker"), Some("eq.AAPL"));
        assert!(!pairs.iter().any(|(k, _)| k == "limit" || k == "order"));
    }

    #[test]
    fn or_expression_is_grouped() {
        let q = TableQuery::from("crypto_daily").or("ticker.ilike.BTC*,coin_name.ilike.*btc*");
        assert_eq!(q.filter("or"), Some("(ticker.ilike.BTC*,coin_name.ilike.*btc*)"));
    }
}
