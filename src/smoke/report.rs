use tracing::{error, info};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineLevel {
    Info,
    Error,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReportLine {
    pub level: LineLevel,
    pub text: String,
}

/// Collects the lines a sweep emits. Each line also goes to `tracing`, so the
/// console keeps its usual output while the caller gets a renderable report.
#[derive(Debug, Default, Clone)]
pub struct ReportCollector {
    lines: Vec<ReportLine>,
}

impl ReportCollector {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn info(&mut self, text: impl Into<String>) {
        let text = text.into();
        info!(target: "smoke", "{text}");
        self.lines.push(ReportLine { level: LineLevel::Info, text });
    }

    pub fn error(&mut self, text: impl Into<String>) {
        let text = text.into();
        error!(target: "smoke", "{text}");
        self.lines.push(ReportLine { level: LineLevel::Error, text });
    }

    pub fn lines(&self) -> &[ReportLine] {
        &self.lines
    }

    pub fn error_count(&self) -> usize {
        self.lines.iter().filter(|l| l.level == LineLevel::Error).count()
    }

    /// One line per entry; error lines are prefixed with `ERROR: `.
    pub fn render(&self) -> String {
        let mut out = String::new();
        for line in &self.lines {
            if line.level == LineLevel::Error {
                out.push_str("ERROR: ");
            }
            out.push_str(&line.text);
            out.push('\n');
        }
        out
    }
}
