//! Flat tables handed to the CSV / JSON / XLSX writers.
//!
//! Grouped exports close each group with a `TOTAL` row and put one blank
//! separator row between groups (none after the last).

use crate::core::compliance::WeekCompliance;
use crate::models::employee::{Employee, Vehicle};
use crate::models::havs::HavsTimesheet;
use crate::models::inspection::VehicleInspection;
use crate::models::timesheet::{Timesheet, TimesheetEntry};
use crate::utils::date::{DATE_FMT, format_datetime, slot_label};
use rust_decimal::{Decimal, RoundingStrategy};
use std::collections::HashMap;

pub const TOTAL_LABEL: &str = "TOTAL";

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RowKind {
    Data,
    Total,
    Separator,
}

#[derive(Debug, Clone, Default)]
pub struct ExportTable {
    pub headers: Vec<String>,
    pub rows: Vec<(RowKind, Vec<String>)>,
}

impl ExportTable {
    fn new<S: Into<String>>(headers: Vec<S>) -> Self {
        Self {
            headers: headers.into_iter().map(Into::into).collect(),
            rows: Vec::new(),
        }
    }

    fn push(&mut self, kind: RowKind, mut cells: Vec<String>) {
        cells.resize(self.headers.len(), String::new());
        self.rows.push((kind, cells));
    }

    fn separator(&mut self) {
        self.push(RowKind::Separator, Vec::new());
    }

    pub fn data_rows(&self) -> usize {
        self.rows.iter().filter(|(k, _)| *k == RowKind::Data).count()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

/// Id → display name lookups shared by the builders.
#[derive(Debug, Default)]
pub struct Names {
    employees: HashMap<i64, String>,
    vehicles: HashMap<i64, String>,
}

impl Names {
    pub fn new(employees: &[Employee], vehicles: &[Vehicle]) -> Self {
        Self {
            employees: employees.iter().map(|e| (e.id, e.name.clone())).collect(),
            vehicles: vehicles
                .iter()
                .map(|v| (v.id, v.registration.clone()))
                .collect(),
        }
    }

    pub fn employee(&self, id: i64) -> String {
        self.employees
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{id}"))
    }

    pub fn vehicle(&self, id: i64) -> String {
        self.vehicles
            .get(&id)
            .cloned()
            .unwrap_or_else(|| format!("#{id}"))
    }
}

fn money(d: Decimal) -> String {
    format!("{:.2}", d.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero))
}

fn hours(d: Decimal) -> String {
    d.normalize().to_string()
}

fn day_headers() -> Vec<String> {
    (0..7).map(|i| slot_label(i).to_string()).collect()
}

pub fn employees_table(employees: &[Employee], names: &Names) -> ExportTable {
    let mut t = ExportTable::new(vec![
        "id",
        "name",
        "role",
        "hourly_rate",
        "vehicle",
        "email",
        "active",
    ]);
    for e in employees {
        t.push(
            RowKind::Data,
            vec![
                e.id.to_string(),
                e.name.clone(),
                e.role.label().to_string(),
                money(e.hourly_rate),
                e.vehicle_id.map(|v| names.vehicle(v)).unwrap_or_default(),
                e.email.clone().unwrap_or_default(),
                if e.active { "yes" } else { "no" }.to_string(),
            ],
        );
    }
    t
}

/// One row per inspection item.
pub fn inspections_table(inspections: &[VehicleInspection], names: &Names) -> ExportTable {
    let mut t = ExportTable::new(vec![
        "inspection_id",
        "submitted_at",
        "employee",
        "vehicle",
        "item",
        "status",
        "notes",
        "photo_url",
    ]);
    for insp in inspections {
        for item in &insp.items {
            t.push(
                RowKind::Data,
                vec![
                    insp.id.to_string(),
                    format_datetime(&insp.submitted_at),
                    names.employee(insp.employee_id),
                    names.vehicle(insp.vehicle_id),
                    item.name.clone(),
                    item.status_label().to_string(),
                    item.notes.clone(),
                    item.photo_url.clone().unwrap_or_default(),
                ],
            );
        }
    }
    t
}

fn entry_cells(e: &TimesheetEntry) -> Vec<String> {
    let mut cells = vec![
        e.id.to_string(),
        e.kind.label().to_string(),
        e.description.clone(),
        hours(e.quantity),
    ];
    cells.extend(e.daily_hours.iter().map(|h| hours(*h)));
    cells.push(money(e.unit_price));
    cells.push(money(e.total));
    cells
}

fn entry_headers() -> Vec<String> {
    let mut h: Vec<String> = ["entry_id", "kind", "description", "quantity"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    h.extend(day_headers());
    h.push("unit_price".into());
    h.push("total".into());
    h
}

/// A single sheet: entries followed by one TOTAL row.
pub fn timesheet_table(ts: &Timesheet) -> ExportTable {
    let mut t = ExportTable::new(entry_headers());
    for e in &ts.entries {
        t.push(RowKind::Data, entry_cells(e));
    }
    let mut total = vec![String::new(); t.headers.len()];
    total[0] = TOTAL_LABEL.to_string();
    if let Some(last) = total.last_mut() {
        *last = money(ts.total());
    }
    t.push(RowKind::Total, total);
    t
}

/// Several sheets, each with its entries and a TOTAL row.
pub fn timesheets_table(sheets: &[Timesheet], names: &Names) -> ExportTable {
    let mut headers: Vec<String> = [
        "timesheet_id",
        "employee",
        "week_ending",
        "job_number",
        "status",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect();
    headers.extend(entry_headers());
    let prefix = 5;
    let mut t = ExportTable::new(headers);

    for (i, ts) in sheets.iter().enumerate() {
        if i > 0 {
            t.separator();
        }
        let head = vec![
            ts.id.to_string(),
            names.employee(ts.employee_id),
            ts.week_ending.format(DATE_FMT).to_string(),
            ts.job_number.clone(),
            ts.status.to_db_str().to_string(),
        ];
        for e in &ts.entries {
            let mut cells = head.clone();
            cells.extend(entry_cells(e));
            t.push(RowKind::Data, cells);
        }
        let mut total = vec![String::new(); t.headers.len()];
        total[0] = ts.id.to_string();
        total[1] = names.employee(ts.employee_id);
        total[prefix] = TOTAL_LABEL.to_string();
        if let Some(last) = total.last_mut() {
            *last = money(ts.total());
        }
        t.push(RowKind::Total, total);
    }
    t
}

/// HAVS sheets: one row per equipment and a TOTAL row of daily minutes.
pub fn havs_table(sheets: &[HavsTimesheet], names: &Names) -> ExportTable {
    let mut headers: Vec<String> = ["havs_id", "employee", "week_ending", "status", "equipment"]
        .iter()
        .map(|s| s.to_string())
        .collect();
    headers.extend(day_headers());
    headers.push("total_minutes".into());
    let mut t = ExportTable::new(headers);

    for (i, sheet) in sheets.iter().enumerate() {
        if i > 0 {
            t.separator();
        }
        let head = vec![
            sheet.id.to_string(),
            names.employee(sheet.employee_id),
            sheet.week_ending.format(DATE_FMT).to_string(),
            sheet.status.to_db_str().to_string(),
        ];
        let mut daily = [0u32; 7];
        for exp in &sheet.exposures {
            let mut cells = head.clone();
            cells.push(exp.equipment.clone());
            cells.extend(exp.minutes.iter().map(|m| m.to_string()));
            cells.push(exp.total_minutes().to_string());
            for (d, m) in daily.iter_mut().zip(exp.minutes.iter()) {
                *d += m;
            }
            t.push(RowKind::Data, cells);
        }
        let mut total = head;
        total.push(TOTAL_LABEL.to_string());
        total.extend(daily.iter().map(|m| m.to_string()));
        total.push(sheet.total_minutes().to_string());
        t.push(RowKind::Total, total);
    }
    t
}

/// Weekly grid per employee; each week ends with a TOTAL row carrying the
/// weekday percentage.
pub fn compliance_table(weeks: &[WeekCompliance]) -> ExportTable {
    let mut headers: Vec<String> = vec!["week_ending".into(), "employee".into()];
    headers.extend(day_headers());
    headers.extend(["weekday_checks", "weekend_checks", "weekday_percentage"].map(String::from));
    let mut t = ExportTable::new(headers);

    for (i, week) in weeks.iter().enumerate() {
        if i > 0 {
            t.separator();
        }
        let we = week.week_ending.format(DATE_FMT).to_string();
        for row in &week.rows {
            let mut cells = vec![we.clone(), row.name.clone()];
            cells.extend(
                row.days
                    .iter()
                    .map(|d| if d.checked { "Y" } else { "" }.to_string()),
            );
            cells.push(row.weekday_checks().to_string());
            cells.push(row.weekend_checks().to_string());
            t.push(RowKind::Data, cells);
        }
        let mut total = vec![we, TOTAL_LABEL.to_string()];
        total.extend(std::iter::repeat_n(String::new(), 7));
        total.push(week.weekday_checked_slots().to_string());
        total.push(week.weekend_checked_slots().to_string());
        total.push(week.weekday_percentage().to_string());
        t.push(RowKind::Total, total);
    }
    t
}
