use crate::db::created_now;
use crate::errors::AppResult;
use crate::models::user::{AppUser, AuthIdentity, ProfileRole, UserRole};
use rusqlite::{Connection, OptionalExtension, params};

pub fn insert_identity(conn: &Connection, identity: &AuthIdentity) -> AppResult<()> {
    conn.execute(
        "INSERT INTO auth_identities (id, email, password_hash, created_at)
         VALUES (?1, ?2, ?3, ?4)",
        params![
            identity.id,
            identity.email,
            identity.password_hash,
            created_now()
        ],
    )?;
    Ok(())
}

/// Removes the identity; user and profile rows follow through cascade.
pub fn delete_identity(conn: &Connection, id: &str) -> AppResult<usize> {
    Ok(conn.execute("DELETE FROM auth_identities WHERE id = ?1", [id])?)
}

pub fn find_identity_by_email(conn: &Connection, email: &str) -> AppResult<Option<AuthIdentity>> {
    let mut stmt = conn.prepare_cached(
        "SELECT id, email, password_hash FROM auth_identities WHERE email = ?1 COLLATE NOCASE",
    )?;
    Ok(stmt
        .query_row([email.trim()], |row| {
            Ok(AuthIdentity {
                id: row.get(0)?,
                email: row.get(1)?,
                password_hash: row.get(2)?,
            })
        })
        .optional()?)
}

pub fn insert_app_user(conn: &Connection, user: &AppUser) -> AppResult<()> {
    conn.execute(
        "INSERT INTO app_users (id, email, full_name, role, employee_id, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
        params![
            user.id,
            user.email,
            user.full_name,
            user.role.to_db_str(),
            user.employee_id,
            created_now(),
        ],
    )?;
    Ok(())
}

pub fn insert_profile(
    conn: &Connection,
    id: &str,
    full_name: &str,
    role: ProfileRole,
) -> AppResult<()> {
    conn.execute(
        "INSERT INTO profiles (id, full_name, role) VALUES (?1, ?2, ?3)",
        params![id, full_name, role.to_db_str()],
    )?;
    Ok(())
}

pub fn profile_role(conn: &Connection, id: &str) -> AppResult<Option<ProfileRole>> {
    let raw: Option<String> = conn
        .query_row("SELECT role FROM profiles WHERE id = ?1", [id], |row| {
            row.get(0)
        })
        .optional()?;
    Ok(raw.as_deref().and_then(ProfileRole::from_db_str))
}

pub fn count_profiles(conn: &Connection) -> AppResult<i64> {
    Ok(conn.query_row("SELECT COUNT(*) FROM profiles", [], |row| row.get(0))?)
}

pub fn count_identities_by_email(conn: &Connection, email: &str) -> AppResult<i64> {
    Ok(conn.query_row(
        "SELECT COUNT(*) FROM auth_identities WHERE email = ?1 COLLATE NOCASE",
        [email.trim()],
        |row| row.get(0),
    )?)
}

/// Email of the account already linked to an employee, if any.
pub fn user_for_employee(conn: &Connection, employee_id: i64) -> AppResult<Option<String>> {
    Ok(conn
        .query_row(
            "SELECT email FROM app_users WHERE employee_id = ?1",
            [employee_id],
            |row| row.get(0),
        )
        .optional()?)
}

pub fn load_users(conn: &Connection) -> AppResult<Vec<AppUser>> {
    let mut stmt = conn.prepare(
        "SELECT id, email, full_name, role, employee_id FROM app_users ORDER BY full_name ASC",
    )?;
    let rows = stmt.query_map([], |row| {
        let role_raw: String = row.get(3)?;
        let role = UserRole::parse(&role_raw)
            .ok_or_else(|| crate::db::invalid_value("role", &role_raw))?;
        Ok(AppUser {
            id: row.get(0)?,
            email: row.get(1)?,
            full_name: row.get(2)?,
            role,
            employee_id: row.get(4)?,
        })
    })?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}
