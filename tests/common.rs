#![allow(dead_code)]
use assert_cmd::{Command, cargo_bin_cmd};
use fieldops::db::initialize::init_db;
use fieldops::db::pool::DbPool;
use std::env;
use std::fs;
use std::path::PathBuf;

pub fn fo() -> Command {
    cargo_bin_cmd!("fieldops")
}

/// Create a unique test DB path inside the system temp dir and remove any existing file
pub fn setup_test_db(name: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_fieldops.sqlite", name));
    let db_path = path.to_string_lossy().to_string();
    fs::remove_file(&db_path).ok();
    db_path
}

/// Create a temporary output file path inside tempdir and ensure it's removed
pub fn temp_out(name: &str, ext: &str) -> String {
    let mut path: PathBuf = env::temp_dir();
    path.push(format!("{}_out.{}", name, ext));
    let p = path.to_string_lossy().to_string();
    fs::remove_file(&p).ok();
    p
}

/// Run one CLI command against `db_path` and require success.
pub fn run_ok(db_path: &str, args: &[&str]) {
    let mut full = vec!["--db", db_path];
    full.extend_from_slice(args);
    fo().args(&full).assert().success();
}

/// Initialize DB with one van and a three-person gang:
/// 1 = Alice (ganger, 20.00/h), 2 = Bob (labourer, 15.50/h), 3 = Carol (backup driver).
pub fn init_db_with_roster(db_path: &str) {
    fo().args(["--db", db_path, "--test", "init"])
        .assert()
        .success();

    run_ok(db_path, &["vehicle", "add", "AB12CDE", "--description", "Transit van"]);
    run_ok(
        db_path,
        &[
            "employee", "add", "--name", "Alice", "--role", "ganger", "--rate", "20.00",
            "--vehicle", "AB12CDE",
        ],
    );
    run_ok(
        db_path,
        &["employee", "add", "--name", "Bob", "--role", "labourer", "--rate", "15.50"],
    );
    run_ok(
        db_path,
        &["employee", "add", "--name", "Carol", "--role", "backup_driver"],
    );
}

/// Fresh in-memory database with the full schema.
pub fn memory_pool() -> DbPool {
    let pool = DbPool::in_memory().expect("open in-memory db");
    init_db(&pool.conn).expect("init db");
    pool
}
