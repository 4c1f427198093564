mod common;
use common::{fo, init_db_with_roster, run_ok, setup_test_db, temp_out};
use predicates::str::contains;
use std::fs;

#[test]
fn test_init_creates_database() {
    let db_path = setup_test_db("init_creates");

    fo().args(["--db", &db_path, "--test", "init"])
        .assert()
        .success()
        .stdout(contains("initialization completed"));

    assert!(std::path::Path::new(&db_path).exists());
}

#[test]
fn test_commands_require_init() {
    let db_path = setup_test_db("requires_init");

    fo().args(["--db", &db_path, "employee", "list"])
        .assert()
        .failure()
        .stderr(contains("fieldops init"));
}

#[test]
fn test_employee_roster_listing() {
    let db_path = setup_test_db("roster_listing");
    init_db_with_roster(&db_path);

    fo().args(["--db", &db_path, "employee", "list"])
        .assert()
        .success()
        .stdout(contains("Alice"))
        .stdout(contains("AB12CDE"))
        .stdout(contains("Carol"));

    fo().args(["--db", &db_path, "employee", "add", "--name", "Dave", "--role", "surveyor"])
        .assert()
        .failure()
        .stderr(contains("Invalid role"));
}

#[test]
fn test_inspection_submit_list_show() {
    let db_path = setup_test_db("inspection_flow");
    init_db_with_roster(&db_path);

    fo().args([
        "--db", &db_path, "inspection", "submit", "--employee", "1", "--vehicle", "AB12CDE",
        "--item", "Tyres|ok", "--item", "Lights|defect|nearside indicator", "--at",
        "2026-03-02 07:15",
    ])
    .assert()
    .success()
    .stdout(contains("Inspection 1 recorded"))
    .stdout(contains("1 active defect(s) reported"));

    fo().args(["--db", &db_path, "inspection", "list", "--range", "2026-03"])
        .assert()
        .success()
        .stdout(contains("AB12CDE"))
        .stdout(contains("Alice"));

    fo().args(["--db", &db_path, "inspection", "show", "1"])
        .assert()
        .success()
        .stdout(contains("nearside indicator"));

    fo().args(["--db", &db_path, "inspection", "fix", "1", "--item", "Lights"])
        .assert()
        .success()
        .stdout(contains("marked as fixed"));

    fo().args(["--db", &db_path, "inspection", "submit", "--employee", "1", "--vehicle", "ZZ99ZZZ", "--item", "Tyres|ok"])
        .assert()
        .failure();
}

#[test]
fn test_inspection_compliance_json() {
    let db_path = setup_test_db("compliance_json");
    init_db_with_roster(&db_path);

    for day in ["2026-03-02", "2026-03-03", "2026-03-04"] {
        let at = format!("{day} 07:00");
        run_ok(
            &db_path,
            &["inspection", "submit", "--employee", "1", "--vehicle", "AB12CDE", "--item", "Tyres|ok", "--at", &at],
        );
    }

    let out = fo()
        .args(["--db", &db_path, "compliance", "inspections", "--date", "2026-03-04", "--weeks", "1", "--json"])
        .output()
        .expect("run compliance");
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    let week = &json[0];
    assert_eq!(week["week_ending"], "2026-03-08");
    assert_eq!(week["rows"].as_array().map(Vec::len), Some(3));

    fo().args(["--db", &db_path, "compliance", "inspections", "--date", "2026-03-04", "--weeks", "1"])
        .assert()
        .success()
        .stdout(contains("20%"))
        .stdout(contains("Missing: Bob, Carol"));
}

#[test]
fn test_compliance_weeks_out_of_range_is_rejected() {
    let db_path = setup_test_db("compliance_weeks_bound");
    init_db_with_roster(&db_path);

    for weeks in ["0", "521", "100000"] {
        fo().args(["--db", &db_path, "compliance", "inspections", "--weeks", weeks])
            .assert()
            .failure()
            .stderr(contains("1..=520"));
    }

    fo().args(["--db", &db_path, "compliance", "inspections", "--weeks", "520", "--json"])
        .assert()
        .success();
}

#[test]
fn test_timesheet_pricing_flow() {
    let db_path = setup_test_db("timesheet_flow");
    init_db_with_roster(&db_path);

    run_ok(
        &db_path,
        &["rate", "add", "--schedule", "ipsom", "--item", "Cable lay", "--col2", "LV", "--col3", "Soft", "--price", "4.00"],
    );

    fo().args(["--db", &db_path, "timesheet", "create", "--employee", "1", "--week-ending", "2026-03-07", "--job", "J-100"])
        .assert()
        .failure()
        .stderr(contains("Sunday"));

    fo().args(["--db", &db_path, "timesheet", "create", "--employee", "1", "--week-ending", "2026-03-08", "--job", "J-100"])
        .assert()
        .success()
        .stdout(contains("Timesheet 1 created"));

    fo().args([
        "--db", &db_path, "timesheet", "add-price", "1", "--schedule", "ipsom", "--item", "Cable lay",
        "--col2", "LV", "--col3", "Soft", "--col4", "Urban", "--quantity", "12.5",
    ])
    .assert()
    .success()
    .stdout(contains("50.00"));

    fo().args(["--db", &db_path, "timesheet", "add-day", "1", "--hours", "8,8"])
        .assert()
        .success()
        .stdout(contains("320.00"));

    fo().args(["--db", &db_path, "timesheet", "add-price", "1", "--schedule", "work", "--item", "Duct"])
        .args(["--quantity", "1"])
        .assert()
        .failure()
        .stderr(contains("No rate defined"));

    fo().args(["--db", &db_path, "timesheet", "submit", "1", "--at", "2026-03-09 08:30"])
        .assert()
        .success()
        .stdout(contains("370.00"));

    fo().args(["--db", &db_path, "timesheet", "add-day", "1", "--hours", "8"])
        .assert()
        .failure()
        .stderr(contains("already submitted"));

    fo().args(["--db", &db_path, "timesheet", "show", "1"])
        .assert()
        .success()
        .stdout(contains("J-100"))
        .stdout(contains("TOTAL"));

    fo().args(["--db", &db_path, "compliance", "timesheets", "--date", "2026-03-08", "--weeks", "1"])
        .assert()
        .success()
        .stdout(contains("on time"))
        .stdout(contains("missing"));
}

#[test]
fn test_export_csv_and_overwrite_guard() {
    let db_path = setup_test_db("export_csv");
    init_db_with_roster(&db_path);
    run_ok(
        &db_path,
        &[
            "inspection", "submit", "--employee", "2", "--vehicle", "AB12CDE", "--item",
            "Mirrors|defect|cracked, \"passenger\" side", "--at", "2026-03-03 06:45",
        ],
    );

    let out = temp_out("export_csv", "csv");
    fo().args(["--db", &db_path, "export", "--kind", "inspections", "--range", "2026-03", "--file", &out])
        .assert()
        .success()
        .stdout(contains("CSV export completed"));

    let content = fs::read_to_string(&out).expect("read export");
    let first = content.lines().next().unwrap_or_default();
    assert!(first.starts_with('"'));
    assert!(content.contains("\"Bob\""));
    assert!(content.contains("\"cracked, \"\"passenger\"\" side\""));

    fo().args(["--db", &db_path, "export", "--kind", "inspections", "--range", "2026-03", "--file", &out])
        .assert()
        .failure()
        .stderr(contains("--force"));

    fo().args(["--db", &db_path, "export", "--kind", "inspections", "--range", "2026-03", "--file", &out, "--force"])
        .assert()
        .success();
}

#[test]
fn test_export_json_employees() {
    let db_path = setup_test_db("export_json");
    init_db_with_roster(&db_path);

    let out = temp_out("export_json", "json");
    run_ok(&db_path, &["export", "--kind", "employees", "--format", "json", "--file", &out]);

    let content = fs::read_to_string(&out).expect("read export");
    let json: serde_json::Value = serde_json::from_str(&content).expect("valid JSON");
    assert_eq!(json.as_array().map(Vec::len), Some(3));
}

#[test]
fn test_user_provisioning_cli() {
    let db_path = setup_test_db("user_cli");
    init_db_with_roster(&db_path);

    run_ok(
        &db_path,
        &["user", "bootstrap-admin", "--email", "admin@example.com", "--password", "s3cret-pass", "--name", "Admin"],
    );

    fo().args([
        "--db", &db_path, "user", "create", "--email", "alice@example.com", "--password", "alice-pass",
        "--name", "Alice", "--role", "ganger", "--employee", "1",
    ])
    .assert()
    .failure()
    .stdout(contains("\"status\": 401"))
    .stdout(contains("\"success\": false"));

    fo().args([
        "--db", &db_path, "user", "create", "--caller-email", "admin@example.com", "--caller-password",
        "s3cret-pass", "--email", "not-an-email", "--password", "alice-pass", "--name", "Alice",
        "--role", "ganger", "--employee", "1",
    ])
    .assert()
    .failure()
    .stdout(contains("\"status\": 400"));

    fo().args([
        "--db", &db_path, "user", "create", "--caller-email", "admin@example.com", "--caller-password",
        "s3cret-pass", "--email", "alice@example.com", "--password", "alice-pass", "--name", "Alice",
        "--role", "ganger", "--employee", "1",
    ])
    .assert()
    .success()
    .stdout(contains("\"success\": true"))
    .stdout(contains("alice@example.com"));

    fo().args(["--db", &db_path, "user", "list"])
        .assert()
        .success()
        .stdout(contains("admin@example.com"))
        .stdout(contains("alice@example.com"));
}

#[test]
fn test_dashboard_json() {
    let db_path = setup_test_db("dashboard_json");
    init_db_with_roster(&db_path);
    run_ok(
        &db_path,
        &["inspection", "submit", "--employee", "1", "--vehicle", "AB12CDE", "--item", "Tyres|ok", "--at", "2026-03-02 07:00"],
    );

    let out = fo()
        .args(["--db", &db_path, "dashboard", "--date", "2026-03-04", "--json"])
        .output()
        .expect("run dashboard");
    assert!(out.status.success());

    let json: serde_json::Value = serde_json::from_slice(&out.stdout).expect("valid JSON");
    assert_eq!(json["employees"], 3);
    assert_eq!(json["inspections"], 1);
    assert_eq!(json["week_ending"], "2026-03-08");
}

#[test]
fn test_db_info_and_log() {
    let db_path = setup_test_db("db_info");
    init_db_with_roster(&db_path);

    fo().args(["--db", &db_path, "db", "--info"])
        .assert()
        .success();

    fo().args(["--db", &db_path, "log", "--print"])
        .assert()
        .success()
        .stdout(contains("employee_add"));
}
