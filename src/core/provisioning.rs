//! Account provisioning: the privileged create-user operation.
//!
//! Three writes make up one account (auth identity, app user, profile).
//! They are not wrapped in a transaction; when a later insert fails the
//! identity is deleted again, which cascades to whatever was written.

use crate::db::employees::find_employee;
use crate::db::log::audit;
use crate::db::users::{
    count_identities_by_email, count_profiles, delete_identity, find_identity_by_email,
    insert_app_user, insert_identity, insert_profile, profile_role, user_for_employee,
};
use crate::errors::{AppError, AppResult};
use crate::models::user::{AppUser, AuthIdentity, ProfileRole, UserRole};
use bcrypt::{DEFAULT_COST, hash, verify};
use regex::Regex;
use rusqlite::Connection;
use serde::Serialize;
use std::sync::OnceLock;
use uuid::Uuid;

#[derive(Debug, Clone, Default)]
pub struct CreateUserRequest {
    pub email: String,
    pub password: String,
    pub full_name: String,
    pub role: String,
    pub employee_id: Option<i64>,
}

#[derive(Debug, Clone)]
pub struct CallerCredentials {
    pub email: String,
    pub password: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(untagged)]
pub enum ProvisionResponse {
    Created {
        success: bool,
        user_id: String,
        user: AppUser,
    },
    Failed {
        success: bool,
        error: String,
        status: u16,
    },
}

impl ProvisionResponse {
    pub fn from_result(result: &AppResult<AppUser>) -> Self {
        match result {
            Ok(user) => ProvisionResponse::Created {
                success: true,
                user_id: user.id.clone(),
                user: user.clone(),
            },
            Err(e) => ProvisionResponse::Failed {
                success: false,
                error: e.to_string(),
                status: e.status_code(),
            },
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, ProvisionResponse::Created { .. })
    }
}

fn email_regex() -> &'static Regex {
    static RE: OnceLock<Regex> = OnceLock::new();
    RE.get_or_init(|| Regex::new(r"^[^@\s]+@[^@\s]+\.[^@\s]+$").expect("static email pattern"))
}

pub fn is_valid_email(email: &str) -> bool {
    email_regex().is_match(email.trim())
}

fn hash_password(password: &str) -> AppResult<String> {
    hash(password, DEFAULT_COST)
        .map_err(|e| AppError::Provisioning(format!("password hashing: {e}")))
}

/// 401 unless the credentials match an identity, 403 unless its profile is admin.
pub fn authorize_admin(conn: &Connection, caller: Option<&CallerCredentials>) -> AppResult<String> {
    let caller = caller
        .filter(|c| !c.email.trim().is_empty())
        .ok_or_else(|| AppError::Unauthenticated("caller credentials are required".into()))?;

    let identity = find_identity_by_email(conn, &caller.email)?
        .ok_or_else(|| AppError::Unauthenticated("invalid credentials".into()))?;

    let matches = verify(&caller.password, &identity.password_hash).unwrap_or(false);
    if !matches {
        return Err(AppError::Unauthenticated("invalid credentials".into()));
    }

    match profile_role(conn, &identity.id)? {
        Some(ProfileRole::Admin) => Ok(identity.id),
        _ => Err(AppError::Unauthorized(format!(
            "{} is not an administrator",
            identity.email
        ))),
    }
}

/// Field checks that need no writes. Returns the parsed role.
pub fn validate_request(
    conn: &Connection,
    req: &CreateUserRequest,
    min_password_length: usize,
) -> AppResult<UserRole> {
    if req.email.trim().is_empty() {
        return Err(AppError::Validation("email is required".into()));
    }
    if !is_valid_email(&req.email) {
        return Err(AppError::Validation(format!("malformed email '{}'", req.email.trim())));
    }
    if req.password.chars().count() < min_password_length {
        return Err(AppError::Validation(format!(
            "password must be at least {min_password_length} characters"
        )));
    }
    if req.full_name.trim().is_empty() {
        return Err(AppError::Validation("full name is required".into()));
    }
    let role = UserRole::parse(&req.role)
        .ok_or_else(|| AppError::Validation(format!("unknown role '{}'", req.role)))?;

    if count_identities_by_email(conn, &req.email)? > 0 {
        return Err(AppError::Validation(format!(
            "{} is already registered",
            req.email.trim()
        )));
    }

    match (role, req.employee_id) {
        (UserRole::Field(_), None) => {
            return Err(AppError::Validation(
                "field accounts must be linked to an employee".into(),
            ));
        }
        (_, Some(emp_id)) => {
            let emp = find_employee(conn, emp_id)?
                .ok_or_else(|| AppError::Validation(format!("employee {emp_id} does not exist")))?;

            if let Some(linked) = user_for_employee(conn, emp_id)? {
                return Err(AppError::Validation(format!(
                    "employee {emp_id} already has an account ({linked})"
                )));
            }

            if let UserRole::Field(r) = role {
                if r != emp.role {
                    return Err(AppError::Validation(format!(
                        "role {} does not match employee role {}",
                        r.label(),
                        emp.role.label()
                    )));
                }
                if r.requires_hourly_rate() && emp.hourly_rate <= rust_decimal::Decimal::ZERO {
                    return Err(AppError::Validation(format!(
                        "a {} needs a positive hourly rate",
                        r.label()
                    )));
                }
            }
        }
        (UserRole::Admin, None) => {}
    }

    Ok(role)
}

/// Write identity, user and profile. Any failure after the identity exists
/// deletes it again and surfaces as an internal error.
fn provision(conn: &Connection, req: &CreateUserRequest, role: UserRole) -> AppResult<AppUser> {
    let identity = AuthIdentity {
        id: Uuid::new_v4().to_string(),
        email: req.email.trim().to_lowercase(),
        password_hash: hash_password(&req.password)?,
    };
    insert_identity(conn, &identity)
        .map_err(|e| AppError::Provisioning(format!("creating auth identity: {e}")))?;

    let user = AppUser {
        id: identity.id.clone(),
        email: identity.email.clone(),
        full_name: req.full_name.trim().to_string(),
        role,
        employee_id: req.employee_id,
    };

    let written = insert_app_user(conn, &user)
        .and_then(|_| insert_profile(conn, &user.id, &user.full_name, role.profile_role()));

    if let Err(e) = written {
        if let Err(undo) = delete_identity(conn, &identity.id) {
            audit(
                conn,
                "provision_rollback_failed",
                &identity.email,
                &undo.to_string(),
            );
        }
        return Err(AppError::Provisioning(format!(
            "could not create user record: {e}"
        )));
    }

    Ok(user)
}

pub struct ProvisioningLogic;

impl ProvisioningLogic {
    pub fn create_user(
        conn: &Connection,
        caller: Option<&CallerCredentials>,
        req: &CreateUserRequest,
        min_password_length: usize,
    ) -> AppResult<AppUser> {
        let caller_id = authorize_admin(conn, caller)?;
        let role = validate_request(conn, req, min_password_length)?;
        let user = provision(conn, req, role)?;

        audit(
            conn,
            "create_user",
            &user.email,
            &format!("{} ({}) by {caller_id}", user.full_name, role.to_db_str()),
        );
        Ok(user)
    }

    /// First administrator of an empty install. Refused once any profile exists.
    pub fn bootstrap_admin(
        conn: &Connection,
        email: &str,
        password: &str,
        full_name: &str,
        min_password_length: usize,
    ) -> AppResult<AppUser> {
        if count_profiles(conn)? > 0 {
            return Err(AppError::Unauthorized(
                "an administrator already exists; use `user create`".into(),
            ));
        }

        let req = CreateUserRequest {
            email: email.to_string(),
            password: password.to_string(),
            full_name: full_name.to_string(),
            role: "admin".into(),
            employee_id: None,
        };
        let role = validate_request(conn, &req, min_password_length)?;
        let user = provision(conn, &req, role)?;

        audit(conn, "bootstrap_admin", &user.email, &user.full_name);
        Ok(user)
    }
}
