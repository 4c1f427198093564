// src/export/mod.rs

pub mod csv;
mod fs_utils;
pub mod logic;
pub mod model;
pub mod range;
mod xlsx;

pub use logic::{ExportLogic, ExportRequest};
pub use model::ExportTable;

use crate::ui::messages::success;
use chrono::NaiveDate;
use clap::ValueEnum;
use std::path::Path;

pub(crate) fn notify_export_success(label: &str, path: &Path) {
    success(format!("{label} export completed: {}", path.display()));
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportFormat {
    Csv,
    Json,
    Xlsx,
}

impl ExportFormat {
    pub fn as_str(&self) -> &'static str {
        match self {
            ExportFormat::Csv => "csv",
            ExportFormat::Json => "json",
            ExportFormat::Xlsx => "xlsx",
        }
    }
}

#[derive(Clone, Copy, Debug, PartialEq, Eq, ValueEnum)]
pub enum ExportKind {
    Employees,
    Inspections,
    /// All sheets with a week ending in the range
    Timesheets,
    /// One sheet by --id
    Timesheet,
    Havs,
    Compliance,
}

impl ExportKind {
    pub fn entity(&self) -> &'static str {
        match self {
            ExportKind::Employees => "employees",
            ExportKind::Inspections => "inspections",
            ExportKind::Timesheets => "timesheets",
            ExportKind::Timesheet => "timesheet",
            ExportKind::Havs => "havs",
            ExportKind::Compliance => "compliance",
        }
    }

    /// Shape of the rows, the last token of the default filename.
    pub fn export_type(&self) -> &'static str {
        match self {
            ExportKind::Employees => "roster",
            ExportKind::Inspections => "items",
            ExportKind::Timesheets => "weekly",
            ExportKind::Timesheet => "entries",
            ExportKind::Havs => "exposure",
            ExportKind::Compliance => "weekly",
        }
    }
}

/// `<entity>_<start>_<end>_<type>.<ext>`
pub fn default_filename(
    kind: ExportKind,
    bounds: Option<(NaiveDate, NaiveDate)>,
    format: ExportFormat,
) -> String {
    let (start, end) = match bounds {
        Some((s, e)) => (s.format("%Y-%m-%d").to_string(), e.format("%Y-%m-%d").to_string()),
        None => ("all".to_string(), "all".to_string()),
    };
    format!(
        "{}_{}_{}_{}.{}",
        kind.entity(),
        start,
        end,
        kind.export_type(),
        format.as_str()
    )
}
