use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, VehicleCmd};
use crate::config::Config;
use crate::core::employees::EmployeeLogic;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Vehicle { action } = cmd {
        let mut pool = open_pool(cfg)?;

        match action {
            VehicleCmd::Add {
                registration,
                description,
            } => {
                let v = EmployeeLogic::add_vehicle(&mut pool, registration, description)?;
                success(format!("Vehicle {} registered: {}", v.id, v.registration));
            }
            VehicleCmd::List => {
                let vehicles = EmployeeLogic::vehicles(&mut pool)?;
                if vehicles.is_empty() {
                    info("No vehicles registered.");
                    return Ok(());
                }
                let mut table = Table::new(vec!["ID", "Registration", "Description"]);
                for v in vehicles {
                    table.add_row(vec![v.id.to_string(), v.registration, v.description]);
                }
                print!("{}", table.render_with(&cfg.separator_char));
            }
        }
    }

    Ok(())
}
