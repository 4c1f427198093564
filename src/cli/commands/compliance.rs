use crate::cli::commands::{open_pool, resolve_date};
use crate::cli::parser::{Commands, ComplianceReport};
use crate::config::Config;
use crate::core::compliance::{TimesheetWeek, WeekCompliance};
use crate::core::read_model::ReadModel;
use crate::errors::AppResult;
use crate::ui::messages::{header, info, warning};
use crate::utils::colors::{RESET, color_for_timeliness, colorize_optional, grid_cell};
use crate::utils::date::{format_datetime, slot_label};
use crate::utils::formatting::describe_percentage;
use crate::utils::table::Table;

/// Same ceiling as `--weeks`; applies to the configured defaults too.
const MAX_WEEKS: u32 = 520;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Compliance {
        report,
        date,
        weeks,
        json,
    } = cmd
    {
        let pool = open_pool(cfg)?;
        let reference = resolve_date(date)?;
        let mut model = ReadModel::new(&pool.conn);

        if !*json && model.roster()?.is_empty() {
            warning("No active employees: every percentage will be 0%.");
        }

        match report {
            ComplianceReport::Inspections => {
                let weeks = weeks.unwrap_or(cfg.inspection_weeks).clamp(1, MAX_WEEKS);
                let grid = model.inspection_compliance(reference, weeks)?;
                if *json {
                    println!("{}", serde_json::to_string_pretty(&grid)?);
                } else {
                    print_grid("Vehicle inspections", &grid, &cfg.separator_char);
                }
            }
            ComplianceReport::Havs => {
                let weeks = weeks.unwrap_or(cfg.havs_weeks).clamp(1, MAX_WEEKS);
                let grid = model.havs_compliance(reference, weeks)?;
                if *json {
                    println!("{}", serde_json::to_string_pretty(&grid)?);
                } else {
                    print_grid("HAVS submissions", &grid, &cfg.separator_char);
                }
            }
            ComplianceReport::Timesheets => {
                let weeks = weeks.unwrap_or(cfg.timesheet_weeks).clamp(1, MAX_WEEKS);
                let report = model.timesheet_compliance(reference, weeks, cfg.cutoff_time())?;
                if *json {
                    println!("{}", serde_json::to_string_pretty(&report)?);
                } else {
                    print_timeliness(&report, cfg);
                }
            }
        }
    }

    Ok(())
}

fn print_grid(title: &str, weeks: &[WeekCompliance], sep: &str) {
    for week in weeks {
        header(format!("{title} - week ending {}", week.week_ending));

        let mut headers = vec!["Employee".to_string()];
        headers.extend((0..7).map(|d| slot_label(d).to_string()));
        headers.extend(["Weekday".to_string(), "Weekend".into()]);

        let mut table = Table::new(headers);
        for row in &week.rows {
            let mut cells = vec![row.name.clone()];
            cells.extend(row.days.iter().map(|d| grid_cell(d.checked, d.has_active_defect)));
            cells.extend([
                format!("{}/5", row.weekday_checks()),
                row.weekend_checks().to_string(),
            ]);
            table.add_row(cells);
        }
        print!("{}", table.render_with(sep));

        let (pct, color) = describe_percentage(week.weekday_percentage());
        println!(
            "\nCompliance: {color}{pct}{RESET} ({} of {} weekday checks, {} weekend)",
            week.weekday_checked_slots(),
            week.possible_slots(),
            week.weekend_checked_slots()
        );
        let defect_days = week.active_defect_days();
        if defect_days > 0 {
            warning(format!("{defect_days} day(s) with an active defect"));
        }

        let missing = week.missing();
        if missing.is_empty() {
            println!();
        } else {
            println!("Missing: {}\n", missing.join(", "));
        }
    }
}

fn print_timeliness(weeks: &[TimesheetWeek], cfg: &Config) {
    for week in weeks {
        header(format!(
            "Timesheets - week ending {} (due Monday {})",
            week.week_ending, cfg.submission_cutoff
        ));

        if week.rows.is_empty() {
            info("No active employees.");
            continue;
        }

        let mut table = Table::new(vec!["Employee", "Status", "Submitted", "Sheets"]);
        for row in &week.rows {
            let label = row.timeliness.label();
            let submitted = row
                .submitted_at
                .as_ref()
                .map(format_datetime)
                .unwrap_or_else(|| "--".into());
            table.add_row(vec![
                row.name.clone(),
                format!("{}{label}{RESET}", color_for_timeliness(label)),
                colorize_optional(&submitted),
                row.submitted_sheets.to_string(),
            ]);
        }
        print!("{}", table.render_with(&cfg.separator_char));

        let (pct, color) = describe_percentage(week.on_time_percentage());
        println!(
            "\nOn time: {color}{pct}{RESET} ({} on time, {} late, {} missing)\n",
            week.on_time(),
            week.late(),
            week.missing().len()
        );
    }
}
