use std::fs;
use std::path::Path;

use tracing::{info, instrument, warn};

use crate::config::ReconConfig;
use crate::error::{ReconError, Result};
use crate::io::{self, excel_write};
use crate::model::{ReconSummary, Side, Table};
use crate::reconcile::reconcile_with;

/// MIME type of the generated report.
pub const REPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// An uploaded file: the name it was submitted under and its raw bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Upload {
    pub filename: String,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: impl Into<String>, bytes: impl Into<Vec<u8>>) -> Self {
        Self {
            filename: filename.into(),
            bytes: bytes.into(),
        }
    }

    /// Reads a file from disk, keeping only its final path component as the name.
    pub fn from_path(path: &Path) -> Result<Self> {
        let bytes = fs::read(path)?;
        let filename = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        Ok(Self { filename, bytes })
    }
}

/// A generated report ready to hand back to the caller.
#[derive(Debug, Clone)]
pub struct Report {
    pub file_name: String,
    pub bytes: Vec<u8>,
    pub summary: ReconSummary,
}

impl Report {
    pub fn content_type(&self) -> &'static str {
        REPORT_CONTENT_TYPE
    }
}

/// Runs parse, join and report generation for one pair of uploads.
#[derive(Debug, Clone)]
pub struct Reconciler {
    config: ReconConfig,
}

impl Reconciler {
    pub fn new(config: ReconConfig) -> Result<Self> {
        config.validate()?;
        Ok(Self { config })
    }

    pub fn config(&self) -> &ReconConfig {
        &self.config
    }

    /// Entry point for callers whose uploads may be absent.
    pub fn run(&self, left: Option<&Upload>, right: Option<&Upload>) -> Result<Report> {
        match (left, right) {
            (Some(left), Some(right)) => self.reconcile(left, right),
            _ => {
                let side = Side::missing(left.is_some(), right.is_some()).unwrap_or(Side::Both);
                warn!(%side, "upload missing");
                Err(ReconError::MissingInput { side, path: None })
            }
        }
    }

    #[instrument(
        level = "info",
        skip_all,
        fields(left = %left.filename, right = %right.filename)
    )]
    pub fn reconcile(&self, left: &Upload, right: &Upload) -> Result<Report> {
        let left_table = io::parse(&left.filename, &left.bytes)?;
        let right_table = io::parse(&right.filename, &right.bytes)?;
        info!(
            left_rows = left_table.len(),
            right_rows = right_table.len(),
            "parsed uploads"
        );
        self.reconcile_tables(&left_table, &right_table)
    }

    /// Joins two already-parsed tables and renders the report.
    pub fn reconcile_tables(&self, left: &Table, right: &Table) -> Result<Report> {
        let reconciled = reconcile_with(left, right, &self.config)?;
        let summary = reconciled.summary();
        info!(
            matched = summary.matched,
            mismatched = summary.mismatched,
            left_only = summary.left_only,
            right_only = summary.right_only,
            "reconciled"
        );

        let bytes = excel_write::write_report(&reconciled, &self.config.report_sheet)?;
        info!(size = bytes.len(), "report written");
        Ok(Report {
            file_name: self.config.report_file_name.clone(),
            bytes,
            summary,
        })
    }
}
