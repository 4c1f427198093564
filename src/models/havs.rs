use crate::models::timesheet::TimesheetStatus;
use chrono::{NaiveDate, NaiveDateTime};
use serde::Serialize;

/// Minutes of use of one piece of equipment, Monday..Sunday.
#[derive(Debug, Clone, Serialize)]
pub struct HavsExposure {
    pub equipment: String,
    pub minutes: [u32; 7],
}

impl HavsExposure {
    pub fn total_minutes(&self) -> u32 {
        self.minutes.iter().sum()
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct HavsTimesheet {
    pub id: i64,
    pub employee_id: i64,
    pub week_ending: NaiveDate,
    pub status: TimesheetStatus,
    pub submitted_at: Option<NaiveDateTime>,
    pub exposures: Vec<HavsExposure>,
}

impl HavsTimesheet {
    pub fn total_minutes(&self) -> u32 {
        self.exposures.iter().map(HavsExposure::total_minutes).sum()
    }

    pub fn status_is_draft(&self) -> bool {
        self.status == TimesheetStatus::Draft
    }
}
