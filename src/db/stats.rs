use crate::db::pool::DbPool;
use crate::utils::colors::{CYAN, GREEN, GREY, RESET};
use rusqlite::OptionalExtension;
use std::fs;

const COUNTED_TABLES: &[(&str, &str)] = &[
    ("employees", "Employees"),
    ("vehicles", "Vehicles"),
    ("inspections", "Inspections"),
    ("timesheets", "Timesheets"),
    ("timesheet_entries", "Timesheet entries"),
    ("havs_timesheets", "HAVS sheets"),
    ("ipsom_rates", "Ipsom rates"),
    ("mollsworth_rates", "Mollsworth rates"),
    ("work_rates", "Work rates"),
    ("app_users", "Users"),
];

pub fn print_db_info(pool: &mut DbPool, db_path: &str) -> rusqlite::Result<()> {
    println!();

    //
    // 1) FILE SIZE
    //
    let file_size = fs::metadata(db_path).map(|m| m.len()).unwrap_or(0);
    let file_mb = (file_size as f64) / (1024.0 * 1024.0);

    println!("{}• File:{} {}", CYAN, RESET, db_path);
    println!("{}• Size:{} {:.2} MB", CYAN, RESET, file_mb);

    //
    // 2) ROW COUNTS
    //
    for (table, label) in COUNTED_TABLES {
        let count: Option<i64> = pool
            .conn
            .query_row(&format!("SELECT COUNT(*) FROM {table}"), [], |row| {
                row.get(0)
            })
            .optional()
            .unwrap_or(None);

        match count {
            Some(c) => println!("{}• {}:{} {}{}{}", CYAN, label, RESET, GREEN, c, RESET),
            None => println!("{}• {}:{} {}--{}", CYAN, label, RESET, GREY, RESET),
        }
    }

    //
    // 3) INSPECTION RANGE
    //
    let first: Option<String> = pool
        .conn
        .query_row("SELECT MIN(submitted_at) FROM inspections", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);
    let last: Option<String> = pool
        .conn
        .query_row("SELECT MAX(submitted_at) FROM inspections", [], |row| {
            row.get(0)
        })
        .unwrap_or(None);

    println!("{}• Inspections range:{}", CYAN, RESET);
    println!(
        "    from: {}",
        first.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );
    println!(
        "    to:   {}",
        last.unwrap_or_else(|| format!("{GREY}--{RESET}"))
    );

    println!();
    Ok(())
}
