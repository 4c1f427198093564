use crate::errors::{AppError, AppResult};
use crate::ui::messages::{success, warning};
use rusqlite::{Connection, OptionalExtension};

/// A schema step, applied once and recorded in the `log` table as
/// `migration_applied` with its version as target.
struct Migration {
    version: &'static str,
    description: &'static str,
    sql: &'static str,
}

const MIGRATIONS: &[Migration] = &[
    Migration {
        version: "20260112_0001_fleet_and_roster",
        description: "Created vehicles and employees tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS vehicles (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            registration TEXT NOT NULL UNIQUE,
            description  TEXT NOT NULL DEFAULT '',
            created_at   TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS employees (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            name         TEXT NOT NULL,
            role         TEXT NOT NULL CHECK(role IN ('ganger','labourer','backup_driver')),
            hourly_rate  TEXT NOT NULL DEFAULT '0',
            vehicle_id   INTEGER REFERENCES vehicles(id) ON DELETE SET NULL,
            email        TEXT,
            active       INTEGER NOT NULL DEFAULT 1,
            created_at   TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260112_0002_inspections",
        description: "Created inspections and inspection_items tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS inspections (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            vehicle_id   INTEGER NOT NULL REFERENCES vehicles(id) ON DELETE CASCADE,
            submitted_at TEXT NOT NULL,
            has_defect   INTEGER NOT NULL DEFAULT 0
        );

        CREATE TABLE IF NOT EXISTS inspection_items (
            id            INTEGER PRIMARY KEY AUTOINCREMENT,
            inspection_id INTEGER NOT NULL REFERENCES inspections(id) ON DELETE CASCADE,
            position      INTEGER NOT NULL DEFAULT 0,
            name          TEXT NOT NULL,
            status        TEXT NOT NULL CHECK(status IN ('defect','no_defect')),
            fix_status    TEXT CHECK(fix_status IS NULL OR fix_status IN ('fixed','active')),
            notes         TEXT NOT NULL DEFAULT '',
            photo_url     TEXT
        );

        CREATE INDEX IF NOT EXISTS idx_inspections_submitted ON inspections(submitted_at);
        CREATE INDEX IF NOT EXISTS idx_inspections_vehicle ON inspections(vehicle_id, submitted_at);
        "#,
    },
    Migration {
        version: "20260112_0003_rate_tables",
        description: "Created ipsom_rates, mollsworth_rates and work_rates tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS ipsom_rates (
            id         INTEGER PRIMARY KEY AUTOINCREMENT,
            work_item  TEXT NOT NULL,
            voltage    TEXT NOT NULL DEFAULT '',
            excavation TEXT NOT NULL DEFAULT '',
            site       TEXT NOT NULL DEFAULT '',
            rate       TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS mollsworth_rates (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            work_item TEXT NOT NULL,
            column2   TEXT NOT NULL DEFAULT '',
            column3   TEXT NOT NULL DEFAULT '',
            column4   TEXT NOT NULL DEFAULT '',
            rate      TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS work_rates (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            work_item TEXT NOT NULL,
            unit      TEXT NOT NULL DEFAULT '',
            rate      TEXT NOT NULL
        );
        "#,
    },
    Migration {
        version: "20260112_0004_timesheets",
        description: "Created timesheets and timesheet_entries tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS timesheets (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            week_ending  TEXT NOT NULL,
            job_number   TEXT NOT NULL DEFAULT '',
            status       TEXT NOT NULL DEFAULT 'draft' CHECK(status IN ('draft','submitted')),
            submitted_at TEXT,
            created_at   TEXT NOT NULL,
            UNIQUE(employee_id, week_ending, job_number)
        );

        CREATE TABLE IF NOT EXISTS timesheet_entries (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            timesheet_id INTEGER NOT NULL REFERENCES timesheets(id) ON DELETE CASCADE,
            kind         TEXT NOT NULL CHECK(kind IN ('ipsom','mollsworth','work','day_rate')),
            rate_id      INTEGER,
            description  TEXT NOT NULL DEFAULT '',
            quantity     TEXT NOT NULL DEFAULT '0',
            daily_hours  TEXT NOT NULL DEFAULT '[]',
            unit_price   TEXT NOT NULL DEFAULT '0',
            total        TEXT NOT NULL DEFAULT '0',
            CHECK((kind = 'day_rate') = (rate_id IS NULL))
        );

        CREATE INDEX IF NOT EXISTS idx_timesheets_week ON timesheets(week_ending);
        "#,
    },
    Migration {
        version: "20260112_0005_havs",
        description: "Created havs_timesheets and havs_exposures tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS havs_timesheets (
            id           INTEGER PRIMARY KEY AUTOINCREMENT,
            employee_id  INTEGER NOT NULL REFERENCES employees(id) ON DELETE CASCADE,
            week_ending  TEXT NOT NULL,
            status       TEXT NOT NULL DEFAULT 'draft' CHECK(status IN ('draft','submitted')),
            submitted_at TEXT,
            UNIQUE(employee_id, week_ending)
        );

        CREATE TABLE IF NOT EXISTS havs_exposures (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            havs_id   INTEGER NOT NULL REFERENCES havs_timesheets(id) ON DELETE CASCADE,
            equipment TEXT NOT NULL,
            day       INTEGER NOT NULL CHECK(day BETWEEN 0 AND 6),
            minutes   INTEGER NOT NULL CHECK(minutes BETWEEN 0 AND 1440),
            UNIQUE(havs_id, equipment, day)
        );
        "#,
    },
    Migration {
        version: "20260112_0006_accounts",
        description: "Created auth_identities, app_users and profiles tables",
        sql: r#"
        CREATE TABLE IF NOT EXISTS auth_identities (
            id            TEXT PRIMARY KEY,
            email         TEXT NOT NULL UNIQUE,
            password_hash TEXT NOT NULL,
            created_at    TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS app_users (
            id          TEXT PRIMARY KEY REFERENCES auth_identities(id) ON DELETE CASCADE,
            email       TEXT NOT NULL,
            full_name   TEXT NOT NULL,
            role        TEXT NOT NULL,
            employee_id INTEGER UNIQUE REFERENCES employees(id) ON DELETE SET NULL,
            created_at  TEXT NOT NULL
        );

        CREATE TABLE IF NOT EXISTS profiles (
            id        TEXT PRIMARY KEY REFERENCES auth_identities(id) ON DELETE CASCADE,
            full_name TEXT NOT NULL,
            role      TEXT NOT NULL CHECK(role IN ('admin','staff'))
        );
        "#,
    },
];

/// Ensure that the `log` table exists.
fn ensure_log_table(conn: &Connection) -> rusqlite::Result<()> {
    conn.execute_batch(
        r#"
        CREATE TABLE IF NOT EXISTS log (
            id        INTEGER PRIMARY KEY AUTOINCREMENT,
            date      TEXT NOT NULL,
            operation TEXT NOT NULL,
            target    TEXT DEFAULT '',
            message   TEXT NOT NULL
        );
        "#,
    )
}

fn is_applied(conn: &Connection, version: &str) -> rusqlite::Result<bool> {
    let mut chk = conn.prepare_cached(
        "SELECT 1 FROM log
         WHERE operation = 'migration_applied' AND target = ?1
         LIMIT 1",
    )?;
    Ok(chk.query_row([version], |_| Ok(())).optional()?.is_some())
}

/// True when the database already holds application tables.
fn has_app_tables(conn: &Connection) -> rusqlite::Result<bool> {
    let count: i64 = conn.query_row(
        "SELECT COUNT(*) FROM sqlite_master
         WHERE type = 'table' AND name NOT IN ('log', 'sqlite_sequence')",
        [],
        |row| row.get(0),
    )?;
    Ok(count > 0)
}

pub fn pending_versions(conn: &Connection) -> AppResult<Vec<&'static str>> {
    ensure_log_table(conn)?;
    let mut out = Vec::new();
    for m in MIGRATIONS {
        if !is_applied(conn, m.version)? {
            out.push(m.version);
        }
    }
    Ok(out)
}

fn backup_before_migration(db_path: &str) -> AppResult<()> {
    use chrono::Local;
    use std::fs::{self, File};
    use std::io::Write;
    use zip::CompressionMethod;
    use zip::ZipWriter;
    use zip::write::FileOptions;

    let backup_name = format!(
        "{}-backup_db_pre_migration.zip",
        Local::now().format("%Y%m%d_%H%M%S")
    );

    let backup_path = std::path::Path::new(db_path)
        .parent()
        .map(|p| p.join(&backup_name))
        .ok_or_else(|| AppError::Migration(format!("no parent directory for {db_path}")))?;

    let file = File::create(&backup_path)?;
    let mut zip = ZipWriter::new(file);

    let options: FileOptions<'_, ()> =
        FileOptions::default().compression_method(CompressionMethod::Deflated);

    zip.start_file("database.sqlite", options)
        .map_err(|e| AppError::Migration(format!("Backup failed (start_file): {e}")))?;

    let db_content = fs::read(db_path)?;
    zip.write_all(&db_content)?;
    zip.finish()
        .map_err(|e| AppError::Migration(format!("Backup failed (finish): {e}")))?;

    success(format!("📦 Backup created: {}", backup_path.display()));
    Ok(())
}

/// Public entry point: run all pending migrations.
///
/// Invoked by db::init_db(). Returns the number of migrations applied.
pub fn run_pending_migrations(conn: &Connection) -> AppResult<usize> {
    let pending = pending_versions(conn)?;
    if pending.is_empty() {
        return Ok(0);
    }

    // Existing data → safety copy first
    if has_app_tables(conn)? {
        warning("Schema upgrade pending, creating safety backup before migration...");

        let db_path: String = conn
            .query_row("PRAGMA database_list;", [], |row| row.get::<_, String>(2))
            .unwrap_or_default();

        if db_path.is_empty() {
            warning("Could not determine DB path, backup skipped.");
        } else {
            backup_before_migration(&db_path)?;
        }
    }

    let mut applied = 0;
    for m in MIGRATIONS.iter().filter(|m| pending.contains(&m.version)) {
        conn.execute_batch(m.sql)
            .map_err(|e| AppError::Migration(format!("{}: {}", m.version, e)))?;

        conn.execute(
            "INSERT INTO log (date, operation, target, message)
             VALUES (datetime('now'), 'migration_applied', ?1, ?2)",
            [m.version, m.description],
        )?;

        success(format!("Migration applied: {} → {}", m.version, m.description));
        applied += 1;
    }

    Ok(applied)
}
