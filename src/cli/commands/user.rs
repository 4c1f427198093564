use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, UserCmd};
use crate::config::Config;
use crate::core::provisioning::{
    CallerCredentials, CreateUserRequest, ProvisionResponse, ProvisioningLogic,
};
use crate::db::users::load_users;
use crate::errors::AppResult;
use crate::ui::messages::{info, success};
use crate::utils::colors::colorize_optional;
use crate::utils::table::Table;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::User { action } = cmd {
        let pool = open_pool(cfg)?;

        match action {
            UserCmd::BootstrapAdmin {
                email,
                password,
                name,
            } => {
                let user = ProvisioningLogic::bootstrap_admin(
                    &pool.conn,
                    email,
                    password,
                    name,
                    cfg.min_password_length,
                )?;
                success(format!("Administrator {} created ({})", user.email, user.id));
            }

            UserCmd::Create {
                caller_email,
                caller_password,
                email,
                password,
                name,
                role,
                employee,
            } => {
                let caller = caller_email.as_ref().map(|e| CallerCredentials {
                    email: e.clone(),
                    password: caller_password.clone(),
                });
                let req = CreateUserRequest {
                    email: email.clone(),
                    password: password.clone(),
                    full_name: name.clone(),
                    role: role.clone(),
                    employee_id: *employee,
                };

                // JSON body on stdout, the error (if any) on stderr with exit code 1
                let result = ProvisioningLogic::create_user(
                    &pool.conn,
                    caller.as_ref(),
                    &req,
                    cfg.min_password_length,
                );
                let response = ProvisionResponse::from_result(&result);
                println!("{}", serde_json::to_string_pretty(&response)?);
                result?;
            }

            UserCmd::List => {
                let users = load_users(&pool.conn)?;
                if users.is_empty() {
                    info("No accounts yet. Start with `fieldops user bootstrap-admin`.");
                    return Ok(());
                }
                let mut table = Table::new(vec!["ID", "Email", "Name", "Role", "Employee"]);
                for u in users {
                    let employee = u
                        .employee_id
                        .map(|e| e.to_string())
                        .unwrap_or_else(|| "--".into());
                    table.add_row(vec![
                        u.id,
                        u.email,
                        u.full_name,
                        u.role.to_db_str().to_string(),
                        colorize_optional(&employee),
                    ]);
                }
                print!("{}", table.render_with(&cfg.separator_char));
            }
        }
    }

    Ok(())
}
