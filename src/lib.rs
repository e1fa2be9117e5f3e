//! Core library for the tabrecon command line application.
//!
//! The library reconciles two uploaded tables (`.xlsx`, `.xls` or `.csv`) on a
//! key column and renders the outcome as an Excel report. Parsing lives under
//! [`io`], the in-memory representations inside [`model`], the join and
//! comparison logic in [`reconcile`], and the end-to-end orchestration in
//! [`pipeline`].

pub mod config;
pub mod error;
pub mod io;
pub mod model;
pub mod pipeline;
pub mod reconcile;

pub use config::ReconConfig;
pub use error::{ErrorKind, ReconError, Result};
pub use model::{CellValue, ReconSummary, ReconciledRow, ReconciledTable, Side, Status, Table};
pub use pipeline::{Reconciler, Report, Upload};
