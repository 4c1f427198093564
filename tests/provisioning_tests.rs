mod common;
use common::memory_pool;
use fieldops::core::employees::EmployeeLogic;
use fieldops::core::provisioning::{
    CallerCredentials, CreateUserRequest, ProvisionResponse, ProvisioningLogic, is_valid_email,
};
use fieldops::db::pool::DbPool;
use fieldops::db::users::{count_identities_by_email, load_users};
use fieldops::errors::AppError;
use rust_decimal::Decimal;

const MIN_LEN: usize = 6;

fn admin() -> CallerCredentials {
    CallerCredentials {
        email: "boss@example.com".into(),
        password: "s3cret-admin".into(),
    }
}

fn with_admin() -> DbPool {
    let pool = memory_pool();
    ProvisioningLogic::bootstrap_admin(&pool.conn, "boss@example.com", "s3cret-admin", "The Boss", MIN_LEN)
        .expect("bootstrap admin");
    pool
}

fn ganger_request(employee_id: i64) -> CreateUserRequest {
    CreateUserRequest {
        email: "alice@example.com".into(),
        password: "alice-pass".into(),
        full_name: "Alice Smith".into(),
        role: "ganger".into(),
        employee_id: Some(employee_id),
    }
}

fn status_of(pool: &DbPool, caller: Option<&CallerCredentials>, req: &CreateUserRequest) -> u16 {
    match ProvisioningLogic::create_user(&pool.conn, caller, req, MIN_LEN) {
        Ok(_) => 200,
        Err(e) => e.status_code(),
    }
}

#[test]
fn test_email_format() {
    assert!(is_valid_email("alice@example.com"));
    assert!(is_valid_email(" a.b+c@sub.example.co.uk "));
    assert!(!is_valid_email("alice@"));
    assert!(!is_valid_email("alice example.com"));
    assert!(!is_valid_email(""));
}

#[test]
fn test_bootstrap_only_once() {
    let pool = with_admin();
    let again = ProvisioningLogic::bootstrap_admin(&pool.conn, "x@example.com", "another1", "X", MIN_LEN);
    assert!(matches!(again, Err(AppError::Unauthorized(_))));
}

#[test]
fn test_admin_creates_linked_field_user() {
    let mut pool = with_admin();
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", Decimal::from(20), None, None)
        .expect("add employee");

    let result = ProvisioningLogic::create_user(&pool.conn, Some(&admin()), &ganger_request(emp.id), MIN_LEN);
    let response = ProvisionResponse::from_result(&result);
    assert!(response.is_success());

    let json = serde_json::to_value(&response).expect("serialize response");
    assert_eq!(json["success"], true);
    assert_eq!(json["user"]["email"], "alice@example.com");
    assert_eq!(json["user"]["role"], "ganger");
    assert_eq!(json["user"]["employee_id"], emp.id);

    let users = load_users(&pool.conn).expect("load users");
    assert_eq!(users.len(), 2);
}

#[test]
fn test_caller_must_be_an_authenticated_admin() {
    let mut pool = with_admin();
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", Decimal::from(20), None, None)
        .expect("add employee");
    let req = ganger_request(emp.id);

    assert_eq!(status_of(&pool, None, &req), 401);

    let wrong = CallerCredentials {
        email: "boss@example.com".into(),
        password: "guess".into(),
    };
    assert_eq!(status_of(&pool, Some(&wrong), &req), 401);

    // a staff account authenticates but is not allowed to provision
    assert_eq!(status_of(&pool, Some(&admin()), &req), 200);
    let staff = CallerCredentials {
        email: "alice@example.com".into(),
        password: "alice-pass".into(),
    };
    let mut other = ganger_request(emp.id);
    other.email = "bob@example.com".into();
    other.role = "admin".into();
    other.employee_id = None;
    assert_eq!(status_of(&pool, Some(&staff), &other), 403);
}

#[test]
fn test_request_validation() {
    let mut pool = with_admin();
    let alice = EmployeeLogic::add(&mut pool, "Alice", "ganger", Decimal::from(20), None, None)
        .expect("add employee");
    let bob = EmployeeLogic::add(&mut pool, "Bob", "labourer", Decimal::from(15), None, None)
        .expect("add employee");
    pool.conn
        .execute("UPDATE employees SET hourly_rate = '0' WHERE id = ?1", [bob.id])
        .expect("zero bob's rate");

    let base = ganger_request(alice.id);
    let cases: Vec<(&str, CreateUserRequest)> = vec![
        ("bad email", CreateUserRequest { email: "alice-at-example".into(), ..base.clone() }),
        ("short password", CreateUserRequest { password: "abc".into(), ..base.clone() }),
        ("missing name", CreateUserRequest { full_name: "  ".into(), ..base.clone() }),
        ("unknown role", CreateUserRequest { role: "foreman".into(), ..base.clone() }),
        ("no employee", CreateUserRequest { employee_id: None, ..base.clone() }),
        ("unknown employee", CreateUserRequest { employee_id: Some(999), ..base.clone() }),
        ("role mismatch", CreateUserRequest { role: "labourer".into(), ..base.clone() }),
        (
            "zero rate",
            CreateUserRequest { role: "labourer".into(), employee_id: Some(bob.id), ..base.clone() },
        ),
        ("existing email", CreateUserRequest { email: "BOSS@example.com".into(), ..base.clone() }),
    ];

    for (label, req) in &cases {
        assert_eq!(status_of(&pool, Some(&admin()), req), 400, "case: {label}");
    }
    assert_eq!(load_users(&pool.conn).expect("load users").len(), 1);
}

#[test]
fn test_employee_with_an_account_cannot_be_linked_again() {
    let mut pool = with_admin();
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", Decimal::from(20), None, None)
        .expect("add employee");
    assert_eq!(status_of(&pool, Some(&admin()), &ganger_request(emp.id)), 200);

    let mut dup = ganger_request(emp.id);
    dup.email = "alice2@example.com".into();
    let result = ProvisioningLogic::create_user(&pool.conn, Some(&admin()), &dup, MIN_LEN);

    assert!(matches!(result, Err(AppError::Validation(_))));
    let json = serde_json::to_value(ProvisionResponse::from_result(&result)).expect("serialize");
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], 400);
    assert_eq!(count_identities_by_email(&pool.conn, "alice2@example.com").expect("count"), 0);
    assert_eq!(load_users(&pool.conn).expect("load users").len(), 2);
}

#[test]
fn test_failed_insert_leaves_no_identity_behind() {
    let mut pool = with_admin();
    let emp = EmployeeLogic::add(&mut pool, "Alice", "ganger", Decimal::from(20), None, None)
        .expect("add employee");

    // the profile write is the last of the three
    pool.conn
        .execute_batch(
            "CREATE TRIGGER refuse_profiles BEFORE INSERT ON profiles
             BEGIN SELECT RAISE(ABORT, 'profiles are read-only'); END;",
        )
        .expect("create trigger");
    let result =
        ProvisioningLogic::create_user(&pool.conn, Some(&admin()), &ganger_request(emp.id), MIN_LEN);

    assert!(matches!(result, Err(AppError::Provisioning(_))));
    let json = serde_json::to_value(ProvisionResponse::from_result(&result)).expect("serialize");
    assert_eq!(json["success"], false);
    assert_eq!(json["status"], 500);
    assert_eq!(count_identities_by_email(&pool.conn, "alice@example.com").expect("count"), 0);
    assert_eq!(load_users(&pool.conn).expect("load users").len(), 1);
}
