use crate::errors::{AppError, AppResult};
use chrono::NaiveDateTime;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ItemStatus {
    Defect,
    NoDefect,
}

impl ItemStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            ItemStatus::Defect => "defect",
            ItemStatus::NoDefect => "no_defect",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "defect" => Some(ItemStatus::Defect),
            "no_defect" => Some(ItemStatus::NoDefect),
            _ => None,
        }
    }
}

/// Repair state of a defect item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum FixStatus {
    Fixed,
    Active,
}

impl FixStatus {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            FixStatus::Fixed => "fixed",
            FixStatus::Active => "active",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "fixed" | "resolved" | "defect_fixed" => Some(FixStatus::Fixed),
            "active" => Some(FixStatus::Active),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct InspectionItem {
    pub name: String,
    pub status: ItemStatus,
    pub fix: Option<FixStatus>,
    pub notes: String,
    pub photo_url: Option<String>,
}

impl InspectionItem {
    /// Parse `NAME|STATUS[|NOTES[|PHOTO_URL]]` where STATUS is one of
    /// `ok`, `no_defect`, `defect`, `fixed`.
    pub fn parse(raw: &str) -> AppResult<Self> {
        let mut parts = raw.splitn(4, '|').map(str::trim);

        let name = parts
            .next()
            .filter(|n| !n.is_empty())
            .ok_or_else(|| AppError::InvalidItem(format!("missing item name in '{raw}'")))?;

        let status_raw = parts
            .next()
            .ok_or_else(|| AppError::InvalidItem(format!("missing status in '{raw}'")))?;

        let (status, fix) = match status_raw.to_lowercase().as_str() {
            "ok" | "no_defect" | "pass" => (ItemStatus::NoDefect, None),
            "defect" | "fail" => (ItemStatus::Defect, Some(FixStatus::Active)),
            "fixed" | "defect_fixed" | "resolved" => (ItemStatus::Defect, Some(FixStatus::Fixed)),
            other => {
                return Err(AppError::InvalidItem(format!(
                    "unknown status '{other}' (use ok, defect or fixed)"
                )));
            }
        };

        let notes = parts.next().unwrap_or("").to_string();
        let photo_url = parts.next().filter(|p| !p.is_empty()).map(str::to_string);

        Ok(Self {
            name: name.to_string(),
            status,
            fix,
            notes,
            photo_url,
        })
    }

    pub fn is_active_defect(&self) -> bool {
        self.status == ItemStatus::Defect && self.fix != Some(FixStatus::Fixed)
    }

    pub fn is_fixed_defect(&self) -> bool {
        self.status == ItemStatus::Defect && self.fix == Some(FixStatus::Fixed)
    }

    pub fn status_label(&self) -> &'static str {
        match (self.status, self.fix) {
            (ItemStatus::NoDefect, _) => "no_defect",
            (ItemStatus::Defect, Some(FixStatus::Fixed)) => "defect (fixed)",
            (ItemStatus::Defect, _) => "defect",
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct VehicleInspection {
    pub id: i64,
    pub employee_id: i64,
    pub vehicle_id: i64,
    pub submitted_at: NaiveDateTime,
    pub has_defect: bool,
    pub items: Vec<InspectionItem>,
}

impl VehicleInspection {
    pub fn new(
        employee_id: i64,
        vehicle_id: i64,
        submitted_at: NaiveDateTime,
        items: Vec<InspectionItem>,
    ) -> Self {
        let has_defect = items.iter().any(|i| i.status == ItemStatus::Defect);
        Self {
            id: 0,
            employee_id,
            vehicle_id,
            submitted_at,
            has_defect,
            items,
        }
    }
}
