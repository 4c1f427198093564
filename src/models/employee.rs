use rust_decimal::Decimal;
use serde::Serialize;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Role {
    Ganger,
    Labourer,
    BackupDriver,
}

impl Role {
    /// Convert enum → DB string
    pub fn to_db_str(&self) -> &'static str {
        match self {
            Role::Ganger => "ganger",
            Role::Labourer => "labourer",
            Role::BackupDriver => "backup_driver",
        }
    }

    /// Convert DB string → enum
    pub fn from_db_str(s: &str) -> Option<Self> {
        match s {
            "ganger" => Some(Role::Ganger),
            "labourer" => Some(Role::Labourer),
            "backup_driver" => Some(Role::BackupDriver),
            _ => None,
        }
    }

    /// Helper: accept CLI spellings such as `Ganger`, `backup-driver`, `Backup Driver`.
    pub fn from_code(code: &str) -> Option<Self> {
        let normalized = code.trim().to_lowercase().replace(['-', ' '], "_");
        Role::from_db_str(&normalized)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Role::Ganger => "Ganger",
            Role::Labourer => "Labourer",
            Role::BackupDriver => "Backup Driver",
        }
    }

    /// Gangers and labourers are paid day rate, so they need an hourly rate.
    pub fn requires_hourly_rate(&self) -> bool {
        matches!(self, Role::Ganger | Role::Labourer)
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Employee {
    pub id: i64,
    pub name: String,
    pub role: Role,
    pub hourly_rate: Decimal,
    pub vehicle_id: Option<i64>,
    pub email: Option<String>,
    pub active: bool,
}

impl Employee {
    pub fn new(name: &str, role: Role, hourly_rate: Decimal) -> Self {
        Self {
            id: 0,
            name: name.trim().to_string(),
            role,
            hourly_rate,
            vehicle_id: None,
            email: None,
            active: true,
        }
    }
}

#[derive(Debug, Clone, Serialize)]
pub struct Vehicle {
    pub id: i64,
    pub registration: String,
    pub description: String,
}
