// src/export/logic.rs

use crate::core::read_model::ReadModel;
use crate::db::employees::{load_employees, load_vehicles};
use crate::db::havs::load_sheets_between;
use crate::db::inspections::{inspection_span, load_inspections_between};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::timesheets::{get_timesheet, load_timesheets_between};
use crate::errors::{AppError, AppResult};
use crate::export::csv::export_csv;
use crate::export::fs_utils::ensure_writable;
use crate::export::model::{
    ExportTable, Names, RowKind, compliance_table, employees_table, havs_table,
    inspections_table, timesheet_table, timesheets_table,
};
use crate::export::range::parse_range;
use crate::export::xlsx::export_xlsx;
use crate::export::{ExportFormat, ExportKind, default_filename, notify_export_success};
use crate::ui::messages::{info, warning};
use crate::utils::date::{week_days, week_ending};
use crate::utils::path::resolve_output;
use chrono::{Duration, NaiveDate, NaiveTime};
use serde_json::{Map, Value};
use std::fs::File;
use std::io::Write;
use std::path::{Path, PathBuf};

/// Bounds used for `--range all`.
const ALL_FROM: (i32, u32, u32) = (1900, 1, 1);
const ALL_TO: (i32, u32, u32) = (9999, 12, 31);

/// Longest compliance export, in weeks.
pub const MAX_EXPORT_WEEKS: i64 = 520;

#[derive(Debug, Clone)]
pub struct ExportRequest {
    pub kind: ExportKind,
    pub format: ExportFormat,
    pub file: Option<String>,
    /// `None` is the current week, `"all"` is everything.
    pub range: Option<String>,
    pub id: Option<i64>,
    pub force: bool,
    pub today: NaiveDate,
}

pub struct ExportLogic;

fn all_bounds() -> AppResult<(NaiveDate, NaiveDate)> {
    let from = NaiveDate::from_ymd_opt(ALL_FROM.0, ALL_FROM.1, ALL_FROM.2);
    let to = NaiveDate::from_ymd_opt(ALL_TO.0, ALL_TO.1, ALL_TO.2);
    from.zip(to)
        .ok_or_else(|| AppError::Other("invalid built-in range".into()))
}

/// Resolved date window plus the form it takes in the filename
/// (`None` for "all").
type Bounds = (NaiveDate, NaiveDate);

fn resolve_bounds(req: &ExportRequest) -> AppResult<(Bounds, Option<Bounds>)> {
    match req.range.as_deref() {
        Some(r) if r.eq_ignore_ascii_case("all") => Ok((all_bounds()?, None)),
        Some(r) => {
            let b = parse_range(r)?;
            Ok((b, Some(b)))
        }
        None => {
            let days = week_days(week_ending(req.today));
            let b = (days[0], days[6]);
            Ok((b, Some(b)))
        }
    }
}

impl ExportLogic {
    /// Build the table for the request. Returns it with the window used
    /// for the default filename.
    pub fn build(
        pool: &mut DbPool,
        req: &ExportRequest,
    ) -> AppResult<(ExportTable, Option<(NaiveDate, NaiveDate)>)> {
        let conn = &pool.conn;
        let names = Names::new(&load_employees(conn, true)?, &load_vehicles(conn)?);
        let ((from, to), label) = resolve_bounds(req)?;

        let table = match req.kind {
            ExportKind::Employees => employees_table(&load_employees(conn, true)?, &names),
            ExportKind::Inspections => {
                let rows = load_inspections_between(
                    conn,
                    from.and_time(NaiveTime::MIN),
                    (to + Duration::days(1)).and_time(NaiveTime::MIN),
                )?;
                inspections_table(&rows, &names)
            }
            ExportKind::Timesheets => {
                timesheets_table(&load_timesheets_between(conn, from, to)?, &names)
            }
            ExportKind::Timesheet => {
                let id = req.id.ok_or_else(|| {
                    AppError::Validation("--id is required for a single timesheet".into())
                })?;
                let ts = get_timesheet(conn, id)?;
                let days = week_days(ts.week_ending);
                return Ok((timesheet_table(&ts), Some((days[0], days[6]))));
            }
            ExportKind::Havs => havs_table(&load_sheets_between(conn, from, to)?, &names),
            ExportKind::Compliance => {
                // "all" runs from the first inspection to the current week
                let (first, last) = match label {
                    Some(_) => (week_ending(from), week_ending(to)),
                    None => {
                        let current = week_ending(req.today);
                        match inspection_span(conn)? {
                            Some((earliest, latest)) => {
                                (week_ending(earliest), current.max(week_ending(latest)))
                            }
                            None => (current, current),
                        }
                    }
                };
                let weeks = ((last - first).num_days() / 7 + 1).clamp(1, MAX_EXPORT_WEEKS) as u32;
                let mut model = ReadModel::new(conn);
                compliance_table(&model.inspection_compliance(last, weeks)?)
            }
        };
        Ok((table, label))
    }

    /// Write the export and return the path written.
    pub fn export(pool: &mut DbPool, req: &ExportRequest) -> AppResult<PathBuf> {
        let (table, label) = Self::build(pool, req)?;

        let path = match &req.file {
            Some(f) => resolve_output(f)?,
            None => resolve_output(&default_filename(req.kind, label, req.format))?,
        };
        ensure_writable(&path, req.force)?;

        if table.data_rows() == 0 {
            warning("No records found for the selected range.");
        }

        match req.format {
            ExportFormat::Csv => export_csv(&table, &path)?,
            ExportFormat::Json => export_json(&table, &path)?,
            ExportFormat::Xlsx => export_xlsx(&table, req.kind.entity(), &path)?,
        }

        audit(
            &pool.conn,
            "export",
            &path.to_string_lossy(),
            &format!(
                "{} as {} ({} records)",
                req.kind.entity(),
                req.format.as_str(),
                table.data_rows()
            ),
        );
        Ok(path)
    }
}

/// Rows as objects keyed by header; separator rows are dropped.
pub fn table_to_json(table: &ExportTable) -> Value {
    let rows = table
        .rows
        .iter()
        .filter(|(kind, _)| *kind != RowKind::Separator)
        .map(|(_, cells)| {
            let obj: Map<String, Value> = table
                .headers
                .iter()
                .cloned()
                .zip(cells.iter().map(|c| Value::String(c.clone())))
                .collect();
            Value::Object(obj)
        })
        .collect();
    Value::Array(rows)
}

fn export_json(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting to JSON: {}", path.display()));

    let json_data = serde_json::to_string_pretty(&table_to_json(table))?;
    let mut file = File::create(path)?;
    file.write_all(json_data.as_bytes())?;

    notify_export_success("JSON", path);
    Ok(())
}
