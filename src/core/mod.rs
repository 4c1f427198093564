pub mod backup;
pub mod compliance;
pub mod config;
pub mod defects;
pub mod employees;
pub mod havs;
pub mod havs_sheets;
pub mod inspections;
pub mod log;
pub mod provisioning;
pub mod rate_tables;
pub mod rates;
pub mod read_model;
pub mod timesheets;
