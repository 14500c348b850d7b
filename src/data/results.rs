use std::fs::OpenOptions;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tracing::debug;

use crate::error::PersistenceError;
use crate::models::SessionSummary;

pub const DEFAULT_RESULTS_PATH: &str = "results.csv";

/// Column names of the result store.
pub const RESULT_HEADER: [&str; 5] = ["Timestamp", "Category", "Score", "Total", "Percentage"];

/// One row of the result store.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResultRow {
    #[serde(rename = "Timestamp")]
    pub timestamp: String,
    #[serde(rename = "Category")]
    pub category: String,
    #[serde(rename = "Score")]
    pub score: usize,
    #[serde(rename = "Total")]
    pub total: usize,
    #[serde(rename = "Percentage")]
    pub percentage: String,
}

impl From<&SessionSummary> for ResultRow {
    fn from(summary: &SessionSummary) -> Self {
        Self {
            timestamp: summary.timestamp_label(),
            category: summary.category.clone(),
            score: summary.correct,
            total: summary.total,
            percentage: summary.percentage_label(),
        }
    }
}

/// Append-only destination for session summaries.
pub trait ResultStore {
    fn append(&mut self, summary: &SessionSummary) -> Result<(), PersistenceError>;
}

impl<S: ResultStore + ?Sized> ResultStore for &mut S {
    fn append(&mut self, summary: &SessionSummary) -> Result<(), PersistenceError> {
        (**self).append(summary)
    }
}

/// CSV file store. The file is opened, written and closed on every append.
#[derive(Debug, Clone)]
pub struct CsvResultStore {
    path: PathBuf,
}

impl CsvResultStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn io_error(&self, source: std::io::Error) -> PersistenceError {
        PersistenceError::Io {
            path: self.path.clone(),
            source,
        }
    }
}

impl Default for CsvResultStore {
    fn default() -> Self {
        Self::new(DEFAULT_RESULTS_PATH)
    }
}

impl ResultStore for CsvResultStore {
    fn append(&mut self, summary: &SessionSummary) -> Result<(), PersistenceError> {
        let file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)
            .map_err(|source| self.io_error(source))?;

        // A file that exists but was never written still needs its header.
        let is_new = file
            .metadata()
            .map_err(|source| self.io_error(source))?
            .len()
            == 0;

        let mut writer = csv::WriterBuilder::new()
            .has_headers(is_new)
            .from_writer(file);
        writer
            .serialize(ResultRow::from(summary))
            .map_err(|source| PersistenceError::Csv {
                path: self.path.clone(),
                source,
            })?;

        let mut file = writer
            .into_inner()
            .map_err(|err| self.io_error(err.into_error()))?;
        file.flush().map_err(|source| self.io_error(source))?;

        debug!(path = %self.path.display(), header = is_new, "Appended result row");
        Ok(())
    }
}

/// In-memory store used where no file should be touched.
#[derive(Debug, Clone, Default)]
pub struct MemoryResultStore {
    rows: Vec<ResultRow>,
}

impl MemoryResultStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn rows(&self) -> &[ResultRow] {
        &self.rows
    }
}

impl ResultStore for MemoryResultStore {
    fn append(&mut self, summary: &SessionSummary) -> Result<(), PersistenceError> {
        self.rows.push(ResultRow::from(summary));
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use chrono::NaiveDate;

    use super::*;
    use crate::models::FeedbackBand;

    fn summary(category: &str, correct: usize, total: usize, percentage: f64) -> SessionSummary {
        SessionSummary {
            category: category.to_string(),
            total,
            correct,
            percentage,
            feedback: FeedbackBand::for_percentage(percentage),
            timestamp: NaiveDate::from_ymd_opt(2024, 3, 9)
                .unwrap()
                .and_hms_opt(14, 5, 7)
                .unwrap(),
        }
    }

    #[test]
    fn test_header_written_once() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        let mut store = CsvResultStore::new(&path);

        store.append(&summary("Math", 3, 4, 75.0)).unwrap();
        store.append(&summary("Science, Nature", 1, 3, 33.33)).unwrap();

        let content = fs::read_to_string(&path).unwrap();
        let lines: Vec<_> = content.lines().collect();
        assert_eq!(lines[0], RESULT_HEADER.join(","));
        assert_eq!(
            lines[1..],
            [
                "2024-03-09 14:05:07,Math,3,4,75.00%",
                "2024-03-09 14:05:07,\"Science, Nature\",1,3,33.33%",
            ]
        );
    }

    #[test]
    fn test_existing_rows_are_kept() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("results.csv");
        fs::write(
            &path,
            "Timestamp,Category,Score,Total,Percentage\n2020-01-01 00:00:00,Old,1,1,100.00%\n",
        )
        .unwrap();

        CsvResultStore::new(&path)
            .append(&summary("Math", 0, 2, 0.0))
            .unwrap();

        let content = fs::read_to_string(&path).unwrap();
        assert_eq!(content.matches("Timestamp").count(), 1);
        assert!(content.starts_with("Timestamp,Category"));
        assert!(content.contains("2020-01-01 00:00:00,Old,1,1,100.00%\n"));
        assert!(content.ends_with("2024-03-09 14:05:07,Math,0,2,0.00%\n"));
    }

    #[test]
    fn test_unwritable_store_reports_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut store = CsvResultStore::new(dir.path().join("missing").join("results.csv"));
        let err = store.append(&summary("Math", 1, 1, 100.0)).unwrap_err();
        assert!(matches!(err, PersistenceError::Io { .. }));
    }

    #[test]
    fn test_memory_store_rows() {
        let mut store = MemoryResultStore::new();
        store.append(&summary("Art", 2, 3, 66.67)).unwrap();
        assert_eq!(store.rows()[0].percentage, "66.67%");
        assert_eq!(store.rows()[0].score, 2);
    }
}
