use crate::core::compliance::Submission;
use crate::errors::{AppError, AppResult};
use crate::models::havs::HavsTimesheet;
use crate::models::timesheet::TimesheetStatus;

pub const MAX_DAILY_MINUTES: u32 = 24 * 60;

/// Minutes for one equipment/day cell must fit in a day, and the day's
/// total across all equipment too.
pub fn validate_exposure(
    sheet: &HavsTimesheet,
    equipment: &str,
    day: usize,
    minutes: u32,
) -> AppResult<()> {
    if equipment.trim().is_empty() {
        return Err(AppError::Exposure("equipment name is required".into()));
    }
    if day > 6 {
        return Err(AppError::Exposure(format!("day index {day} out of range")));
    }
    if minutes > MAX_DAILY_MINUTES {
        return Err(AppError::Exposure(format!(
            "{minutes} minutes exceeds a day ({MAX_DAILY_MINUTES})"
        )));
    }

    let others: u32 = sheet
        .exposures
        .iter()
        .filter(|e| !e.equipment.eq_ignore_ascii_case(equipment.trim()))
        .map(|e| e.minutes[day])
        .sum();
    if others + minutes > MAX_DAILY_MINUTES {
        return Err(AppError::Exposure(format!(
            "day total would be {} minutes",
            others + minutes
        )));
    }
    Ok(())
}

pub fn daily_totals(sheet: &HavsTimesheet) -> [u32; 7] {
    let mut out = [0u32; 7];
    for e in &sheet.exposures {
        for (slot, m) in out.iter_mut().zip(e.minutes.iter()) {
            *slot += m;
        }
    }
    out
}

/// Submitted sheets as dated submissions for the compliance grid.
pub fn submissions(sheets: &[HavsTimesheet]) -> Vec<Submission> {
    sheets
        .iter()
        .filter(|s| s.status == TimesheetStatus::Submitted)
        .filter_map(|s| {
            s.submitted_at.map(|at| Submission {
                employee_id: s.employee_id,
                at,
                has_active_defect: false,
            })
        })
        .collect()
}

