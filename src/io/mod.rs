//! Adapters between uploaded bytes, in-memory tables and the generated report.

pub mod csv_read;
pub mod excel_read;
pub mod excel_write;

use std::path::Path;

use tracing::{debug, instrument};

use crate::error::{ReconError, Result};
use crate::model::Table;

/// Upload formats the parser understands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileKind {
    Xlsx,
    Xls,
    Csv,
}

impl FileKind {
    /// Picks a format from the filename's extension, ignoring case.
    pub fn from_filename(filename: &str) -> Option<Self> {
        let extension = Path::new(filename)
            .extension()?
            .to_str()?
            .to_ascii_lowercase();
        match extension.as_str() {
            "xlsx" => Some(FileKind::Xlsx),
            "xls" => Some(FileKind::Xls),
            "csv" => Some(FileKind::Csv),
            _ => None,
        }
    }
}

/// Decodes an uploaded file into a [`Table`], choosing the decoder from the
/// file extension alone.
#[instrument(level = "debug", skip(bytes), fields(size = bytes.len()))]
pub fn parse(filename: &str, bytes: &[u8]) -> Result<Table> {
    let kind = FileKind::from_filename(filename).ok_or_else(|| {
        ReconError::UnsupportedFileType {
            file: filename.to_string(),
        }
    })?;

    let table = match kind {
        FileKind::Xlsx => excel_read::read_xlsx(filename, bytes)?,
        FileKind::Xls => excel_read::read_xls(filename, bytes)?,
        FileKind::Csv => csv_read::read_csv(filename, bytes)?,
    };
    debug!(
        ?kind,
        columns = table.width(),
        rows = table.len(),
        "parsed upload"
    );
    Ok(table)
}
