use clap::ValueEnum;
use rust_decimal::Decimal;
use serde::Serialize;

/// The three pricing tables a timesheet entry can be priced from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, ValueEnum)]
pub enum RateSchedule {
    Ipsom,
    Mollsworth,
    Work,
}

impl RateSchedule {
    pub fn to_db_str(&self) -> &'static str {
        match self {
            RateSchedule::Ipsom => "ipsom",
            RateSchedule::Mollsworth => "mollsworth",
            RateSchedule::Work => "work",
        }
    }

    pub fn from_db_str(s: &str) -> Option<Self> {
        match s.trim().to_lowercase().as_str() {
            "ipsom" => Some(RateSchedule::Ipsom),
            "mollsworth" => Some(RateSchedule::Mollsworth),
            "work" => Some(RateSchedule::Work),
            _ => None,
        }
    }

    pub fn table(&self) -> &'static str {
        match self {
            RateSchedule::Ipsom => "ipsom_rates",
            RateSchedule::Mollsworth => "mollsworth_rates",
            RateSchedule::Work => "work_rates",
        }
    }

    /// Headings of the four classification columns.
    pub fn column_labels(&self) -> [&'static str; 4] {
        match self {
            RateSchedule::Ipsom => ["Work item", "Voltage", "Excavation", "Site"],
            RateSchedule::Mollsworth => ["Work item", "Column 2", "Column 3", "Column 4"],
            RateSchedule::Work => ["Work item", "Unit", "", ""],
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            RateSchedule::Ipsom => "Ipsom",
            RateSchedule::Mollsworth => "Mollsworth",
            RateSchedule::Work => "Work",
        }
    }
}

/// One pricing row: four classification columns mapped to a unit price.
/// Blank columns act as wildcards during resolution.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RateRow {
    pub id: i64,
    pub schedule: RateSchedule,
    pub work_item: String,
    pub col2: String,
    pub col3: String,
    pub col4: String,
    pub unit_price: Decimal,
}

impl RateRow {
    pub fn columns(&self) -> [&str; 4] {
        [&self.work_item, &self.col2, &self.col3, &self.col4]
    }

    pub fn describe(&self) -> String {
        self.columns()
            .iter()
            .map(|c| if c.trim().is_empty() { "*" } else { c.trim() })
            .collect::<Vec<_>>()
            .join(" / ")
    }
}
