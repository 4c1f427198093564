pub mod employee;
pub mod havs;
pub mod inspection;
pub mod rate;
pub mod timesheet;
pub mod user;
