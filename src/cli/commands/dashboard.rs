use crate::cli::commands::{open_pool, resolve_date};
use crate::cli::parser::Commands;
use crate::config::Config;
use crate::core::read_model::{Dashboard, ReadModel};
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{GREEN, RED, RESET, YELLOW};
use crate::utils::formatting::{describe_percentage, format_money, mins2readable};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Dashboard { date, json } = cmd {
        let pool = open_pool(cfg)?;
        let reference = resolve_date(date)?;

        let mut model = ReadModel::new(&pool.conn);
        let dash = model.dashboard(reference, cfg.cutoff_time())?;

        if *json {
            println!("{}", serde_json::to_string_pretty(&dash)?);
        } else {
            print_dashboard(&dash, cfg);
        }
    }

    Ok(())
}

fn print_dashboard(d: &Dashboard, cfg: &Config) {
    header(format!("Week ending {}", d.week_ending));

    println!("👷 Active employees : {}", d.employees);

    // Inspections
    let (pct, color) = describe_percentage(d.inspection_percentage);
    println!("\n🚐 Vehicle inspections");
    println!("   submitted        : {}", d.inspections);
    println!("   compliance       : {color}{pct}{RESET}");
    println!(
        "   active defects   : {}{}{}",
        if d.inspections_with_active_defects > 0 { RED } else { GREEN },
        d.inspections_with_active_defects,
        RESET
    );
    println!("   fixed defects    : {}", d.inspections_with_fixed_defects);
    if !d.missing_inspections.is_empty() {
        warning(format!("No checks this week: {}", d.missing_inspections.join(", ")));
    }
    for hint in &d.possibly_fixed {
        info(format!(
            "Inspection {}: '{}' possibly fixed",
            hint.inspection_id, hint.item
        ));
    }

    // HAVS
    println!("\n🔧 HAVS");
    println!("   sheets submitted : {}", d.havs_sheets_submitted);
    println!(
        "   exposure         : {}",
        mins2readable(d.havs_minutes as i64, false)
    );

    // Timesheets (previous week)
    let ts = &d.timesheets;
    let (pct, color) = describe_percentage(ts.on_time_percentage());
    println!("\n📋 Timesheets, week ending {}", ts.week_ending);
    println!("   on time          : {color}{pct}{RESET} ({})", ts.on_time());
    println!("   late             : {YELLOW}{}{RESET}", ts.late());
    println!("   value            : {}", format_money(d.timesheet_value, &cfg.currency_symbol));
    let missing = ts.missing();
    if !missing.is_empty() {
        warning(format!("Missing timesheets: {}", missing.join(", ")));
    }
    println!();
}
