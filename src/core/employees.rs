use crate::db::employees::{
    delete_employee, get_employee, insert_employee, insert_vehicle, load_employees,
    load_vehicles, resolve_vehicle, update_employee,
};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::errors::{AppError, AppResult};
use crate::models::employee::{Employee, Role, Vehicle};
use rust_decimal::Decimal;

/// Optional field changes for `employee update`.
#[derive(Debug, Default, Clone)]
pub struct EmployeePatch {
    pub name: Option<String>,
    pub role: Option<String>,
    pub hourly_rate: Option<Decimal>,
    pub vehicle: Option<String>,
    pub email: Option<String>,
    pub active: Option<bool>,
}

pub struct EmployeeLogic;

fn parse_role(code: &str) -> AppResult<Role> {
    Role::from_code(code).ok_or_else(|| {
        AppError::InvalidRole(format!(
            "'{code}' (use ganger, labourer or backup_driver)"
        ))
    })
}

/// Gangers and labourers are paid day rate from `hourly_rate`.
fn check_rate(role: Role, rate: Decimal) -> AppResult<()> {
    if rate < Decimal::ZERO {
        return Err(AppError::InvalidAmount(format!("hourly rate {rate} is negative")));
    }
    if role.requires_hourly_rate() && rate.is_zero() {
        return Err(AppError::Validation(format!(
            "a {} needs a positive hourly rate",
            role.label()
        )));
    }
    Ok(())
}

impl EmployeeLogic {
    pub fn add(
        pool: &mut DbPool,
        name: &str,
        role: &str,
        hourly_rate: Decimal,
        vehicle: Option<&str>,
        email: Option<&str>,
    ) -> AppResult<Employee> {
        if name.trim().is_empty() {
            return Err(AppError::Validation("employee name is required".into()));
        }
        let role = parse_role(role)?;
        check_rate(role, hourly_rate)?;

        let mut emp = Employee::new(name, role, hourly_rate);
        if let Some(key) = vehicle {
            emp.vehicle_id = Some(resolve_vehicle(&pool.conn, key)?.id);
        }
        emp.email = email.map(|e| e.trim().to_string()).filter(|e| !e.is_empty());

        emp.id = insert_employee(&pool.conn, &emp)?;
        audit(
            &pool.conn,
            "employee_add",
            &emp.id.to_string(),
            &format!("{} ({})", emp.name, role.label()),
        );
        Ok(emp)
    }

    pub fn list(pool: &mut DbPool, include_inactive: bool) -> AppResult<Vec<Employee>> {
        load_employees(&pool.conn, include_inactive)
    }

    pub fn update(pool: &mut DbPool, id: i64, patch: &EmployeePatch) -> AppResult<Employee> {
        let mut emp = get_employee(&pool.conn, id)?;

        if let Some(name) = patch.name.as_deref().map(str::trim).filter(|n| !n.is_empty()) {
            emp.name = name.to_string();
        }
        if let Some(code) = &patch.role {
            emp.role = parse_role(code)?;
        }
        if let Some(rate) = patch.hourly_rate {
            emp.hourly_rate = rate;
        }
        check_rate(emp.role, emp.hourly_rate)?;

        if let Some(key) = &patch.vehicle {
            emp.vehicle_id = if key.trim().is_empty() || key.eq_ignore_ascii_case("none") {
                None
            } else {
                Some(resolve_vehicle(&pool.conn, key)?.id)
            };
        }
        if let Some(email) = &patch.email {
            emp.email = Some(email.trim().to_string()).filter(|e| !e.is_empty());
        }
        if let Some(active) = patch.active {
            emp.active = active;
        }

        update_employee(&pool.conn, &emp)?;
        audit(&pool.conn, "employee_update", &id.to_string(), &emp.name);
        Ok(emp)
    }

    pub fn delete(pool: &mut DbPool, id: i64) -> AppResult<Employee> {
        let emp = get_employee(&pool.conn, id)?;
        delete_employee(&pool.conn, id)?;
        audit(&pool.conn, "employee_del", &id.to_string(), &emp.name);
        Ok(emp)
    }

    pub fn add_vehicle(
        pool: &mut DbPool,
        registration: &str,
        description: &str,
    ) -> AppResult<Vehicle> {
        if registration.trim().is_empty() {
            return Err(AppError::Validation("registration is required".into()));
        }
        let id = insert_vehicle(&pool.conn, registration, description)?;
        audit(&pool.conn, "vehicle_add", &id.to_string(), registration.trim());
        Ok(Vehicle {
            id,
            registration: registration.trim().to_uppercase(),
            description: description.to_string(),
        })
    }

    pub fn vehicles(pool: &mut DbPool) -> AppResult<Vec<Vehicle>> {
        load_vehicles(&pool.conn)
    }
}
