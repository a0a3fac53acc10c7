use ratatui::style::Color;

use pattern_whisper::smoke::{run_full_sweep, test_connection, LineLevel, ReportCollector, ReportLine};
use pattern_whisper::store::RemoteStore;
use pattern_whisper::types::ConnectionStatus;

// ---------------------------------------------------------------------------
// App state
// ---------------------------------------------------------------------------

#[derive(Debug, Clone)]
pub struct AppState {
    pub status: ConnectionStatus,
    pub report: Vec<ReportLine>,
    pub running: bool,
    /// Failed probe count of the last completed sweep.
    pub last_failures: Option<usize>,
    pub scroll: u16,
    pub store_url: String,
}

impl AppState {
    pub fn new(store_url: String) -> Self {
        Self {
            status: ConnectionStatus::Pending,
            report: Vec::new(),
            running: false,
            last_failures: None,
            scroll: 0,
            store_url,
        }
    }

    pub async fn probe(&mut self, store: &dyn RemoteStore) {
        self.status = test_connection(store).await;
    }

    /// Mark the sweep as started so the next frame shows progress.
    pub fn begin_sweep(&mut self) {
        self.running = true;
        self.scroll = 0;
        self.report = vec![ReportLine {
            level: LineLevel::Info,
            text: "Running tests...".to_string(),
        }];
    }

    pub async fn run_sweep(&mut self, store: &dyn RemoteStore) {
        let mut report = ReportCollector::new();
        let failed = run_full_sweep(store, &mut report).await;
        self.report = report.lines().to_vec();
        self.last_failures = Some(failed);
        self.running = false;
    }

    pub fn scroll_down(&mut self) {
        let max = self.report.len().saturating_sub(1) as u16;
        self.scroll = (self.scroll + 1).min(max);
    }

    pub fn scroll_up(&mut self) {
        self.scroll = self.scroll.saturating_sub(1);
    }
}

// ---------------------------------------------------------------------------
// Formatting helpers
// ---------------------------------------------------------------------------

pub fn status_display(status: &ConnectionStatus) -> (String, Color) {
    match status {
        ConnectionStatus::Connected => ("● connected".to_string(), Color::Green),
        ConnectionStatus::Pending => ("◌ testing connection".to_string(), Color::Yellow),
        ConnectionStatus::Failed(e) => (format!("✗ {}", truncate(e, 60)), Color::Red),
    }
}

pub fn line_text(line: &ReportLine) -> String {
    match line.level {
        LineLevel::Info => line.text.clone(),
        LineLevel::Error => format!("ERROR: {}", line.text),
    }
}

pub fn truncate(s: &str, max: usize) -> String {
    if s.chars().count() <= max {
        s.to_string()
    } else {
        let cut: String = s.chars().take(max.saturating_sub(1)).collect();
        format!("{cut}…")
    }
}
