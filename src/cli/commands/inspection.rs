use crate::cli::commands::{open_pool, resolve_range};
use crate::cli::parser::{Commands, InspectionCmd};
use crate::config::Config;
use crate::core::employees::EmployeeLogic;
use crate::core::inspections::InspectionLogic;
use crate::db::employees::load_employees;
use crate::errors::AppResult;
use crate::export::model::Names;
use crate::ui::messages::{header, info, success, warning};
use crate::utils::colors::{GREEN, RED, RESET, YELLOW};
use crate::utils::date::format_datetime;
use crate::utils::table::Table;
use crate::utils::time::parse_optional_datetime;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Inspection { action } = cmd {
        let mut pool = open_pool(cfg)?;

        match action {
            InspectionCmd::Submit {
                employee,
                vehicle,
                items,
                at,
            } => {
                let at = parse_optional_datetime(at.as_ref())?;
                let insp = InspectionLogic::submit(&mut pool, *employee, vehicle, items, at)?;
                let active = insp.items.iter().filter(|i| i.is_active_defect()).count();
                success(format!(
                    "Inspection {} recorded at {} ({} items)",
                    insp.id,
                    format_datetime(&insp.submitted_at),
                    insp.items.len()
                ));
                if active > 0 {
                    warning(format!("{active} active defect(s) reported"));
                }
            }

            InspectionCmd::Fix { id, item } => {
                InspectionLogic::mark_fixed(&mut pool, *id, item)?;
                success(format!("Defect '{item}' on inspection {id} marked as fixed"));
            }

            InspectionCmd::List { range } => {
                let (from, to) = resolve_range(range)?;
                let rows = InspectionLogic::list(&mut pool, from, to)?;
                if rows.is_empty() {
                    info(format!("No inspections between {from} and {to}."));
                    return Ok(());
                }
                let names = Names::new(
                    &load_employees(&pool.conn, true)?,
                    &EmployeeLogic::vehicles(&mut pool)?,
                );

                let mut table = Table::new(vec![
                    "ID", "Submitted", "Employee", "Vehicle", "Items", "Defects",
                ]);
                for insp in &rows {
                    let active = insp.items.iter().filter(|i| i.is_active_defect()).count();
                    let fixed = insp.items.iter().filter(|i| i.is_fixed_defect()).count();
                    let defects = match (active, fixed) {
                        (0, 0) => format!("{GREEN}none{RESET}"),
                        (0, f) => format!("{YELLOW}{f} fixed{RESET}"),
                        (a, 0) => format!("{RED}{a} active{RESET}"),
                        (a, f) => format!("{RED}{a} active{RESET}, {f} fixed"),
                    };
                    table.add_row(vec![
                        insp.id.to_string(),
                        format_datetime(&insp.submitted_at),
                        names.employee(insp.employee_id),
                        names.vehicle(insp.vehicle_id),
                        insp.items.len().to_string(),
                        defects,
                    ]);
                }
                print!("{}", table.render_with(&cfg.separator_char));
            }

            InspectionCmd::Show { id } => {
                let (insp, hints) = InspectionLogic::show(&mut pool, *id)?;
                let names = Names::new(
                    &load_employees(&pool.conn, true)?,
                    &EmployeeLogic::vehicles(&mut pool)?,
                );

                header(format!("Inspection {}", insp.id));
                println!("Employee : {}", names.employee(insp.employee_id));
                println!("Vehicle  : {}", names.vehicle(insp.vehicle_id));
                println!("Submitted: {}\n", format_datetime(&insp.submitted_at));

                let mut table = Table::new(vec!["Item", "Status", "Notes", "Photo"]);
                for item in &insp.items {
                    let status = if item.is_active_defect() {
                        format!("{RED}{}{RESET}", item.status_label())
                    } else if item.is_fixed_defect() {
                        format!("{YELLOW}{}{RESET}", item.status_label())
                    } else {
                        format!("{GREEN}{}{RESET}", item.status_label())
                    };
                    table.add_row(vec![
                        item.name.clone(),
                        status,
                        item.notes.clone(),
                        item.photo_url.clone().unwrap_or_default(),
                    ]);
                }
                print!("{}", table.render_with(&cfg.separator_char));

                for h in hints {
                    info(format!(
                        "'{}' was reported as a defect in the previous week and is now OK: possibly fixed",
                        h.item
                    ));
                }
            }
        }
    }

    Ok(())
}
