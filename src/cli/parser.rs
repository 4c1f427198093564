use crate::export::{ExportFormat, ExportKind};
use crate::models::rate::RateSchedule;
use clap::{Parser, Subcommand, ValueEnum};

/// Command-line interface definition for fieldops
/// Field-services operations on SQLite: inspections, timesheets, HAVS, compliance
#[derive(Parser)]
#[command(
    name = "fieldops",
    version = env!("CARGO_PKG_VERSION"),
    about = "Field-services operations: vehicle inspections, gang timesheets, HAVS exposure and weekly compliance on SQLite",
    long_about = None
)]
pub struct Cli {
    /// Override database path (useful for tests or custom DB)
    #[arg(global = true, long = "db")]
    pub db: Option<String>,

    /// Run in test mode (no config file update)
    #[arg(global = true, long = "test", hide = true)]
    pub test: bool,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Initialize the database and configuration
    Init,

    /// Manage the configuration file (view, check, migrate or edit)
    Config {
        #[arg(long = "print", help = "Print the current configuration file")]
        print_config: bool,

        #[arg(long = "check", help = "Check configuration file for missing fields")]
        check: bool,

        #[arg(long = "migrate", help = "Add missing keys with their default values")]
        migrate: bool,

        #[arg(
            long = "edit",
            help = "Edit the configuration file (default editor: $EDITOR, or nano/notepad)"
        )]
        edit_config: bool,

        #[arg(long = "editor", help = "Specify the editor to use")]
        editor: Option<String>,
    },

    /// Manage the database (migrations, integrity checks, etc.)
    Db {
        #[arg(long = "migrate", help = "Run pending database migrations")]
        migrate: bool,

        #[arg(long = "check", help = "Check database integrity")]
        check: bool,

        #[arg(long = "vacuum", help = "Optimize the database using VACUUM")]
        vacuum: bool,

        #[arg(long = "info", help = "Show database information")]
        info: bool,
    },

    /// Print the internal audit log
    Log {
        #[arg(long = "print", help = "Print rows from the internal log table")]
        print: bool,
    },

    /// Create a backup copy of the database
    Backup {
        #[arg(long, value_name = "FILE")]
        file: String,

        #[arg(long, help = "Compress the copy (zip on Windows, tar.gz elsewhere)")]
        compress: bool,

        #[arg(long, short = 'f', help = "Overwrite an existing backup")]
        force: bool,
    },

    /// Manage the employee roster
    Employee {
        #[command(subcommand)]
        action: EmployeeCmd,
    },

    /// Manage fleet vehicles
    Vehicle {
        #[command(subcommand)]
        action: VehicleCmd,
    },

    /// Submit and review daily vehicle inspections
    Inspection {
        #[command(subcommand)]
        action: InspectionCmd,
    },

    /// Gang timesheets with price-work and day-rate entries
    Timesheet {
        #[command(subcommand)]
        action: TimesheetCmd,
    },

    /// Ipsom / Mollsworth / Work pricing tables
    Rate {
        #[command(subcommand)]
        action: RateCmd,
    },

    /// Hand-arm vibration exposure sheets
    Havs {
        #[command(subcommand)]
        action: HavsCmd,
    },

    /// Weekly compliance reports
    Compliance {
        #[arg(value_enum)]
        report: ComplianceReport,

        #[arg(long, help = "Reference date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(
            long,
            value_parser = clap::value_parser!(u32).range(1..=520),
            help = "Number of trailing weeks, 1 to 520 (default from config)"
        )]
        weeks: Option<u32>,

        #[arg(long, help = "Print JSON instead of tables")]
        json: bool,
    },

    /// Week-at-a-glance summary
    Dashboard {
        #[arg(long, help = "Reference date (YYYY-MM-DD, default today)")]
        date: Option<String>,

        #[arg(long, help = "Print JSON instead of text")]
        json: bool,
    },

    /// Export data to CSV, JSON or XLSX
    Export {
        #[arg(long, value_enum)]
        kind: ExportKind,

        #[arg(long, value_enum, default_value = "csv")]
        format: ExportFormat,

        #[arg(
            long,
            value_name = "FILE",
            help = "Output file (default <entity>_<start>_<end>_<type>.<ext> in the current directory)"
        )]
        file: Option<String>,

        #[arg(
            long,
            value_name = "RANGE",
            help = "YYYY, YYYY-MM, YYYY-MM-DD, START:END or 'all' (default: current week)"
        )]
        range: Option<String>,

        #[arg(long, help = "Timesheet id (for --kind timesheet)")]
        id: Option<i64>,

        #[arg(long, short = 'f')]
        force: bool,
    },

    /// Account provisioning
    User {
        #[command(subcommand)]
        action: UserCmd,
    },
}

#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum ComplianceReport {
    Inspections,
    Havs,
    Timesheets,
}

#[derive(Subcommand)]
pub enum EmployeeCmd {
    /// Add an employee
    Add {
        #[arg(long)]
        name: String,

        #[arg(long, help = "ganger, labourer or backup_driver")]
        role: String,

        #[arg(long, default_value = "0", help = "Hourly rate for day-rate work")]
        rate: String,

        #[arg(long, help = "Assigned vehicle (id or registration)")]
        vehicle: Option<String>,

        #[arg(long)]
        email: Option<String>,
    },

    /// List employees
    List {
        #[arg(long, help = "Include inactive employees")]
        all: bool,
    },

    /// Change employee details
    Update {
        id: i64,

        #[arg(long)]
        name: Option<String>,

        #[arg(long)]
        role: Option<String>,

        #[arg(long)]
        rate: Option<String>,

        #[arg(long, help = "Vehicle id or registration, 'none' to unassign")]
        vehicle: Option<String>,

        #[arg(long)]
        email: Option<String>,

        #[arg(long)]
        active: Option<bool>,
    },

    /// Delete an employee
    Del { id: i64 },
}

#[derive(Subcommand)]
pub enum VehicleCmd {
    /// Register a vehicle
    Add {
        registration: String,

        #[arg(long, default_value = "")]
        description: String,
    },

    /// List vehicles
    List,
}

#[derive(Subcommand)]
pub enum InspectionCmd {
    /// Submit a daily vehicle check
    Submit {
        #[arg(long)]
        employee: i64,

        #[arg(long, help = "Vehicle id or registration")]
        vehicle: String,

        #[arg(
            long = "item",
            required = true,
            help = "NAME|STATUS[|NOTES[|PHOTO_URL]], STATUS = ok | defect | fixed"
        )]
        items: Vec<String>,

        #[arg(long, help = "Submission time (YYYY-MM-DD HH:MM, default now)")]
        at: Option<String>,
    },

    /// Mark a defect item as fixed
    Fix {
        id: i64,

        #[arg(long)]
        item: String,
    },

    /// List inspections
    List {
        #[arg(long, help = "YYYY, YYYY-MM, YYYY-MM-DD or START:END (default: current week)")]
        range: Option<String>,
    },

    /// Show one inspection with its items
    Show { id: i64 },
}

#[derive(Subcommand)]
pub enum TimesheetCmd {
    /// Create a draft timesheet
    Create {
        #[arg(long)]
        employee: i64,

        #[arg(long = "week-ending", help = "Sunday closing the week (YYYY-MM-DD)")]
        week_ending: String,

        #[arg(long)]
        job: String,
    },

    /// Add a price-work entry resolved from a rate table
    AddPrice {
        id: i64,

        #[arg(long, value_enum)]
        schedule: RateSchedule,

        #[arg(long)]
        item: String,

        #[arg(long, default_value = "N/A")]
        col2: String,

        #[arg(long, default_value = "N/A")]
        col3: String,

        #[arg(long, default_value = "N/A")]
        col4: String,

        #[arg(long, help = "Metres")]
        quantity: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Add a day-rate entry
    AddDay {
        id: i64,

        #[arg(long, help = "Hours Monday onwards, comma separated (e.g. 8,8,8,8,8)")]
        hours: String,

        #[arg(long)]
        description: Option<String>,
    },

    /// Remove an entry from a draft
    RemoveEntry { id: i64, entry: i64 },

    /// Submit a draft
    Submit {
        id: i64,

        #[arg(long, help = "Submission time (YYYY-MM-DD HH:MM, default now)")]
        at: Option<String>,
    },

    /// List timesheets by week ending
    List {
        #[arg(long, help = "YYYY, YYYY-MM, YYYY-MM-DD or START:END (default: current week)")]
        range: Option<String>,
    },

    /// Show a timesheet with its entries and total
    Show { id: i64 },
}

#[derive(Subcommand)]
pub enum RateCmd {
    /// Add a rate row
    Add {
        #[arg(long, value_enum)]
        schedule: RateSchedule,

        #[arg(long)]
        item: String,

        #[arg(long, default_value = "")]
        col2: String,

        #[arg(long, default_value = "")]
        col3: String,

        #[arg(long, default_value = "")]
        col4: String,

        #[arg(long)]
        price: String,
    },

    /// Import rows from a CSV file (work_item,col2,col3,col4,rate)
    Import {
        #[arg(long, value_enum)]
        schedule: RateSchedule,

        #[arg(long)]
        file: String,
    },

    /// List a rate table
    List {
        #[arg(long, value_enum)]
        schedule: RateSchedule,
    },

    /// Resolve the rate for a selection
    Resolve {
        #[arg(long, value_enum)]
        schedule: RateSchedule,

        #[arg(long)]
        item: String,

        #[arg(long, default_value = "N/A")]
        col2: String,

        #[arg(long, default_value = "N/A")]
        col3: String,

        #[arg(long, default_value = "N/A")]
        col4: String,

        #[arg(long, help = "Also price this quantity")]
        quantity: Option<String>,
    },

    /// Choices for the next selection step
    Options {
        #[arg(long, value_enum)]
        schedule: RateSchedule,

        #[arg(long)]
        item: Option<String>,

        #[arg(long)]
        col2: Option<String>,

        #[arg(long)]
        col3: Option<String>,
    },

    /// Delete a rate row
    Del {
        #[arg(long, value_enum)]
        schedule: RateSchedule,

        id: i64,
    },
}

#[derive(Subcommand)]
pub enum HavsCmd {
    /// Record minutes of equipment use on one day
    Record {
        #[arg(long)]
        employee: i64,

        #[arg(long = "week-ending")]
        week_ending: String,

        #[arg(long)]
        equipment: String,

        #[arg(long, help = "mon, tue, ... sun")]
        day: String,

        #[arg(long)]
        minutes: u32,
    },

    /// Submit a HAVS sheet
    Submit {
        id: i64,

        #[arg(long)]
        at: Option<String>,
    },

    /// List HAVS sheets by week ending
    List {
        #[arg(long)]
        range: Option<String>,
    },

    /// Show one HAVS sheet
    Show { id: i64 },
}

#[derive(Subcommand)]
pub enum UserCmd {
    /// Create the first administrator (only on an install without accounts)
    BootstrapAdmin {
        #[arg(long)]
        email: String,

        #[arg(long)]
        password: String,

        #[arg(long)]
        name: String,
    },

    /// Create an account (administrators only); prints a JSON response
    Create {
        #[arg(long = "caller-email")]
        caller_email: Option<String>,

        #[arg(long = "caller-password", default_value = "")]
        caller_password: String,

        #[arg(long, default_value = "")]
        email: String,

        #[arg(long, default_value = "")]
        password: String,

        #[arg(long, default_value = "")]
        name: String,

        #[arg(long, default_value = "", help = "admin, ganger, labourer or backup_driver")]
        role: String,

        #[arg(long)]
        employee: Option<i64>,
    },

    /// List accounts
    List,
}
