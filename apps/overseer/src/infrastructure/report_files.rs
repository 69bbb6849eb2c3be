use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use chrono::{DateTime, Local, TimeZone};

use crate::agents::errors::AgentResult;
use crate::agents::human::ReportWriter;

const SLUG_CHARS: usize = 20;

/// File name for a report: `<timestamp>_<first 20 chars of content>.md`
///
/// Newlines in the slug become spaces and path separators become `_`.
///
/// # Example
/// ```
/// use chrono::{TimeZone, Utc};
/// use overseer::infrastructure::report_files::report_file_name;
///
/// let at = Utc.with_ymd_and_hms(2024, 1, 2, 3, 4, 5).unwrap();
/// assert_eq!(report_file_name(&at, "# Goal\n\nWrite"), "20240102030405_# Goal  Write.md");
/// ```
pub fn report_file_name<Tz: TimeZone>(at: &DateTime<Tz>, content: &str) -> String
where
    Tz::Offset: std::fmt::Display,
{
    let slug: String = content
        .chars()
        .take(SLUG_CHARS)
        .map(|c| match c {
            '\n' | '\r' => ' ',
            '/' | '\\' => '_',
            c => c,
        })
        .collect();

    format!("{}_{}.md", at.format("%Y%m%d%H%M%S"), slug)
}

/// Saves each report as a new Markdown file under a fixed directory
#[derive(Debug, Clone)]
pub struct FileReportWriter {
    dir: PathBuf,
}

impl FileReportWriter {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    pub fn dir(&self) -> &Path {
        &self.dir
    }
}

impl ReportWriter for FileReportWriter {
    fn write(&mut self, report: &str) -> AgentResult<()> {
        fs::create_dir_all(&self.dir)?;

        let path = self.dir.join(report_file_name(&Local::now(), report));
        fs::write(&path, report)?;

        tracing::info!(path = %path.display(), "report saved");
        Ok(())
    }
}

/// Keeps reports in memory; clones share the same buffer
#[derive(Debug, Clone, Default)]
pub struct MemoryReportWriter {
    reports: Arc<Mutex<Vec<String>>>,
}

impl MemoryReportWriter {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn reports(&self) -> Vec<String> {
        self.reports
            .lock()
            .map(|reports| reports.clone())
            .unwrap_or_default()
    }
}

impl ReportWriter for MemoryReportWriter {
    fn write(&mut self, report: &str) -> AgentResult<()> {
        if let Ok(mut reports) = self.reports.lock() {
            reports.push(report.to_string());
        }
        Ok(())
    }
}
