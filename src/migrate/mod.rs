//! One-shot schema setup against the remote store.
//!
//! Scripts are read from disk and executed through the `exec_sql` procedure in
//! a fixed order. The first failure aborts the run; there is no rollback and
//! no retry, so a failed run leaves earlier scripts applied.

use std::path::{Path, PathBuf};

use serde_json::json;
use tracing::{debug, error, info};

use crate::error::{AppError, Result};
use crate::store::RemoteStore;

/// Applied in this order.
pub const MIGRATIONS: &[&str] = &[
    "001_initial_schema.sql",
    "002_pattern_analysis.sql",
    "003_performance_indexes.sql",
];

/// The hosted database has no raw-SQL endpoint, so migrations go through this helper.
pub const CREATE_EXEC_SQL: &str = r#"
CREATE OR REPLACE FUNCTION exec_sql(sql text)
RETURNS void
LANGUAGE plpgsql
AS $function$
BEGIN
  EXECUTE sql;
END;
$function$;
"#;

/// Create the `exec_sql` helper. An "already exists" answer counts as success.
pub async fn ensure_exec_function(store: &dyn RemoteStore) -> Result<()> {
    match store.rpc("exec", json!({ "query": CREATE_EXEC_SQL })).await {
        Ok(_) => {
            debug!("exec_sql helper installed");
            Ok(())
        }
        Err(e) if e.message().contains("already exists") => {
            debug!("exec_sql helper already present");
            Ok(())
        }
        Err(e) => Err(e),
    }
}

#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct MigrationReport {
    pub applied: Vec<String>,
}

pub struct MigrationRunner<'a> {
    store: &'a dyn RemoteStore,
    dir: PathBuf,
    scripts: Vec<String>,
}

impl<'a> MigrationRunner<'a> {
    pub fn new(store: &'a dyn RemoteStore, dir: impl AsRef<Path>) -> Self {
        Self {
            store,
            dir: dir.as_ref().to_path_buf(),
            scripts: MIGRATIONS.iter().map(|s| s.to_string()).collect(),
        }
    }

    pub fn with_scripts(mut self, scripts: &[&str]) -> Self {
        self.scripts = scripts.iter().map(|s| s.to_string()).collect();
        self
    }

    pub fn scripts(&self) -> &[String] {
        &self.scripts
    }

    /// Apply every script in order, stopping at the first failure.
    pub async fn run(&self) -> Result<MigrationReport> {
        let mut report = MigrationReport::default();
        for name in &self.scripts {
            self.apply(name).await?;
            report.applied.push(name.clone());
        }
        Ok(report)
    }

    async fn apply(&self, name: &str) -> Result<()> {
        info!("Running {name}...");

        let path = self.dir.join(name);
        let sql = tokio::fs::read_to_string(&path).await.map_err(|e| {
            error!("Failed to read {name}: {e}");
            AppError::Migration {
                name: name.to_string(),
                message: format!("failed to read {}: {e}", path.display()),
            }
        })?;

        self.store
            .rpc("exec_sql", json!({ "sql": sql }))
            .await
            .map_err(|e| {
                error!("Error in {name}: {}", e.message());
                AppError::Migration {
                    name: name.to_string(),
                    message: e.message(),
                }
            })?;

        info!("{name} completed");
        Ok(())
    }
}
