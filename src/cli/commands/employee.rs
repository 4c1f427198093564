use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, EmployeeCmd};
use crate::config::Config;
use crate::core::employees::{EmployeeLogic, EmployeePatch};
use crate::errors::AppResult;
use crate::export::model::Names;
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_optional;
use crate::utils::formatting::{format_money, yes_no};
use crate::utils::table::Table;
use crate::utils::time::parse_amount;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Employee { action } = cmd {
        let mut pool = open_pool(cfg)?;

        match action {
            EmployeeCmd::Add {
                name,
                role,
                rate,
                vehicle,
                email,
            } => {
                let emp = EmployeeLogic::add(
                    &mut pool,
                    name,
                    role,
                    parse_amount(rate)?,
                    vehicle.as_deref(),
                    email.as_deref(),
                )?;
                success(format!(
                    "Employee {} added: {} ({})",
                    emp.id,
                    emp.name,
                    emp.role.label()
                ));
            }

            EmployeeCmd::List { all } => {
                let employees = EmployeeLogic::list(&mut pool, *all)?;
                if employees.is_empty() {
                    info("No employees registered.");
                    return Ok(());
                }
                let names = Names::new(&employees, &EmployeeLogic::vehicles(&mut pool)?);

                let mut table = Table::new(vec![
                    "ID", "Name", "Role", "Rate", "Vehicle", "Email", "Active",
                ]);
                for e in &employees {
                    let vehicle = e
                        .vehicle_id
                        .map(|v| names.vehicle(v))
                        .unwrap_or_else(|| "--".into());
                    let email = e.email.clone().unwrap_or_else(|| "--".into());
                    table.add_row(vec![
                        e.id.to_string(),
                        e.name.clone(),
                        e.role.label().to_string(),
                        format_money(e.hourly_rate, &cfg.currency_symbol),
                        colorize_optional(&vehicle),
                        colorize_optional(&email),
                        yes_no(e.active).to_string(),
                    ]);
                }
                print!("{}", table.render_with(&cfg.separator_char));
            }

            EmployeeCmd::Update {
                id,
                name,
                role,
                rate,
                vehicle,
                email,
                active,
            } => {
                let patch = EmployeePatch {
                    name: name.clone(),
                    role: role.clone(),
                    hourly_rate: rate.as_deref().map(parse_amount).transpose()?,
                    vehicle: vehicle.clone(),
                    email: email.clone(),
                    active: *active,
                };
                let emp = EmployeeLogic::update(&mut pool, *id, &patch)?;
                success(format!("Employee {} updated: {}", emp.id, emp.name));
            }

            EmployeeCmd::Del { id } => {
                let emp = EmployeeLogic::delete(&mut pool, *id)?;
                success(format!("Employee {} deleted: {}", emp.id, emp.name));
            }
        }
    }

    Ok(())
}
