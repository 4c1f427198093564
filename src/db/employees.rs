use crate::db::{created_now, decimal_col, invalid_value};
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, Role, Vehicle};
use rusqlite::{Connection, OptionalExtension, Row, params};

pub fn map_employee(row: &Row) -> rusqlite::Result<Employee> {
    let role_str: String = row.get("role")?;
    let role = Role::from_db_str(&role_str).ok_or_else(|| invalid_value("role", &role_str))?;

    Ok(Employee {
        id: row.get("id")?,
        name: row.get("name")?,
        role,
        hourly_rate: decimal_col(row, "hourly_rate")?,
        vehicle_id: row.get("vehicle_id")?,
        email: row.get("email")?,
        active: row.get::<_, i64>("active")? == 1,
    })
}

pub fn insert_employee(conn: &Connection, emp: &Employee) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO employees (name, role, hourly_rate, vehicle_id, email, active, created_at)
         VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7)",
        params![
            emp.name,
            emp.role.to_db_str(),
            emp.hourly_rate.to_string(),
            emp.vehicle_id,
            emp.email,
            if emp.active { 1 } else { 0 },
            created_now(),
        ],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn update_employee(conn: &Connection, emp: &Employee) -> AppResult<()> {
    let changed = conn.execute(
        "UPDATE employees
         SET name = ?1, role = ?2, hourly_rate = ?3, vehicle_id = ?4, email = ?5, active = ?6
         WHERE id = ?7",
        params![
            emp.name,
            emp.role.to_db_str(),
            emp.hourly_rate.to_string(),
            emp.vehicle_id,
            emp.email,
            if emp.active { 1 } else { 0 },
            emp.id,
        ],
    )?;
    if changed == 0 {
        return Err(AppError::not_found("Employee", emp.id));
    }
    Ok(())
}

pub fn delete_employee(conn: &Connection, id: i64) -> AppResult<()> {
    let changed = conn.execute("DELETE FROM employees WHERE id = ?1", [id])?;
    if changed == 0 {
        return Err(AppError::not_found("Employee", id));
    }
    Ok(())
}

pub fn find_employee(conn: &Connection, id: i64) -> AppResult<Option<Employee>> {
    let mut stmt = conn.prepare_cached("SELECT * FROM employees WHERE id = ?1")?;
    Ok(stmt.query_row([id], map_employee).optional()?)
}

pub fn get_employee(conn: &Connection, id: i64) -> AppResult<Employee> {
    find_employee(conn, id)?.ok_or_else(|| AppError::not_found("Employee", id))
}

/// Roster ordered by name. Inactive employees are skipped unless `include_inactive`.
pub fn load_employees(conn: &Connection, include_inactive: bool) -> AppResult<Vec<Employee>> {
    let sql = if include_inactive {
        "SELECT * FROM employees ORDER BY name ASC, id ASC"
    } else {
        "SELECT * FROM employees WHERE active = 1 ORDER BY name ASC, id ASC"
    };
    let mut stmt = conn.prepare(sql)?;
    let rows = stmt.query_map([], map_employee)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

fn map_vehicle(row: &Row) -> rusqlite::Result<Vehicle> {
    Ok(Vehicle {
        id: row.get("id")?,
        registration: row.get("registration")?,
        description: row.get("description")?,
    })
}

pub fn insert_vehicle(conn: &Connection, registration: &str, description: &str) -> AppResult<i64> {
    conn.execute(
        "INSERT INTO vehicles (registration, description, created_at) VALUES (?1, ?2, ?3)",
        params![registration.trim().to_uppercase(), description, created_now()],
    )?;
    Ok(conn.last_insert_rowid())
}

pub fn load_vehicles(conn: &Connection) -> AppResult<Vec<Vehicle>> {
    let mut stmt = conn.prepare("SELECT * FROM vehicles ORDER BY registration ASC")?;
    let rows = stmt.query_map([], map_vehicle)?;

    let mut out = Vec::new();
    for r in rows {
        out.push(r?);
    }
    Ok(out)
}

pub fn get_vehicle(conn: &Connection, id: i64) -> AppResult<Vehicle> {
    let mut stmt = conn.prepare_cached("SELECT * FROM vehicles WHERE id = ?1")?;
    stmt.query_row([id], map_vehicle)
        .optional()?
        .ok_or_else(|| AppError::not_found("Vehicle", id))
}

/// Look a vehicle up by id or, failing that, by registration.
pub fn resolve_vehicle(conn: &Connection, key: &str) -> AppResult<Vehicle> {
    if let Ok(id) = key.trim().parse::<i64>() {
        return get_vehicle(conn, id);
    }
    let mut stmt = conn.prepare_cached("SELECT * FROM vehicles WHERE registration = ?1")?;
    stmt.query_row([key.trim().to_uppercase()], map_vehicle)
        .optional()?
        .ok_or_else(|| AppError::not_found("Vehicle", key))
}
