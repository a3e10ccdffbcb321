//! Sanity checks on a finished dataset file

use crate::export::{Column, Delimiter};
use pgd_common::Result;
use serde::Serialize;
use std::path::{Path, PathBuf};
use tracing::{info, warn};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ViolationKind {
    /// A description contains the list delimiter
    PipeInText,
    /// A description contains two consecutive spaces
    DoubleSpaceInText,
}

impl std::fmt::Display for ViolationKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ViolationKind::PipeInText => f.write_str("text_unprocessed contains '|'"),
            ViolationKind::DoubleSpaceInText => f.write_str("text_unprocessed contains a double space"),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Violation {
    /// 1-based data row, header excluded
    pub row: usize,
    pub kind: ViolationKind,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct CheckReport {
    pub file: PathBuf,
    pub rows: usize,
    pub missing_columns: Vec<String>,
    pub violations: Vec<Violation>,
}

impl CheckReport {
    pub fn is_clean(&self) -> bool {
        self.missing_columns.is_empty() && self.violations.is_empty()
    }
}

/// Flags every description containing `|` or a double space, and every
/// final-dataset column missing from the header.
pub fn check_dataset(path: &Path) -> Result<CheckReport> {
    let mut reader = csv::ReaderBuilder::new()
        .delimiter(Delimiter::from_path(path).as_byte())
        .from_path(path)?;
    let headers = reader.headers()?.clone();

    let missing_columns: Vec<String> = Column::ALL
        .iter()
        .map(|c| c.header())
        .filter(|name| !headers.iter().any(|h| h == *name))
        .map(str::to_string)
        .collect();
    let text_col = headers
        .iter()
        .position(|h| h == Column::TextUnprocessed.header());

    let mut rows = 0;
    let mut violations = Vec::new();
    for (index, record) in reader.records().enumerate() {
        let record = record?;
        rows += 1;
        let Some(text) = text_col.and_then(|col| record.get(col)) else {
            continue;
        };
        if text.contains('|') {
            violations.push(Violation { row: index + 1, kind: ViolationKind::PipeInText });
        }
        if text.contains("  ") {
            violations.push(Violation { row: index + 1, kind: ViolationKind::DoubleSpaceInText });
        }
    }

    let report = CheckReport {
        file: path.to_path_buf(),
        rows,
        missing_columns,
        violations,
    };
    if report.is_clean() {
        info!(file = %path.display(), rows, "Dataset check passed");
    } else {
        warn!(
            file = %path.display(),
            rows,
            missing_columns = report.missing_columns.len(),
            violations = report.violations.len(),
            "Dataset check failed"
        );
    }
    Ok(report)
}
