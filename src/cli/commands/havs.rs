use crate::cli::commands::{open_pool, resolve_range};
use crate::cli::parser::{Commands, HavsCmd};
use crate::config::Config;
use crate::core::havs::daily_totals;
use crate::core::havs_sheets::HavsLogic;
use crate::db::employees::load_employees;
use crate::errors::{AppError, AppResult};
use crate::export::model::Names;
use crate::models::havs::HavsTimesheet;
use crate::ui::messages::{header, info, success};
use crate::utils::date::{format_datetime, parse_date, parse_weekday_slot, slot_label};
use crate::utils::formatting::mins2readable;
use crate::utils::table::Table;
use crate::utils::time::parse_optional_datetime;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Havs { action } = cmd {
        let mut pool = open_pool(cfg)?;

        match action {
            HavsCmd::Record {
                employee,
                week_ending,
                equipment,
                day,
                minutes,
            } => {
                let we = parse_date(week_ending)
                    .ok_or_else(|| AppError::InvalidDate(week_ending.clone()))?;
                let slot = parse_weekday_slot(day)
                    .ok_or_else(|| AppError::InvalidDate(format!("unknown day '{day}'")))?;
                let sheet = HavsLogic::record(&mut pool, *employee, we, equipment, slot, *minutes)?;
                success(format!(
                    "HAVS sheet {}: {} {} min on {} (day total {})",
                    sheet.id,
                    equipment.trim(),
                    minutes,
                    slot_label(slot),
                    mins2readable(daily_totals(&sheet)[slot] as i64, true)
                ));
            }

            HavsCmd::Submit { id, at } => {
                let at = parse_optional_datetime(at.as_ref())?;
                let sheet = HavsLogic::submit(&mut pool, *id, at)?;
                success(format!(
                    "HAVS sheet {} submitted at {} ({} total)",
                    sheet.id,
                    format_datetime(&at),
                    mins2readable(sheet.total_minutes() as i64, false)
                ));
            }

            HavsCmd::List { range } => {
                let (from, to) = resolve_range(range)?;
                let sheets = HavsLogic::list(&mut pool, from, to)?;
                if sheets.is_empty() {
                    info(format!("No HAVS sheets with a week ending between {from} and {to}."));
                    return Ok(());
                }
                let names = Names::new(&load_employees(&pool.conn, true)?, &[]);

                let mut table = Table::new(vec![
                    "ID", "Week ending", "Employee", "Status", "Submitted", "Equipment", "Total",
                ]);
                for s in &sheets {
                    table.add_row(vec![
                        s.id.to_string(),
                        s.week_ending.to_string(),
                        names.employee(s.employee_id),
                        s.status.to_db_str().to_string(),
                        s.submitted_at
                            .as_ref()
                            .map(format_datetime)
                            .unwrap_or_else(|| "--".into()),
                        s.exposures.len().to_string(),
                        mins2readable(s.total_minutes() as i64, true),
                    ]);
                }
                print!("{}", table.render_with(&cfg.separator_char));
            }

            HavsCmd::Show { id } => {
                let sheet = HavsLogic::show(&mut pool, *id)?;
                let names = Names::new(&load_employees(&pool.conn, true)?, &[]);
                print_sheet(&sheet, &names, cfg);
            }
        }
    }

    Ok(())
}

fn print_sheet(sheet: &HavsTimesheet, names: &Names, cfg: &Config) {
    header(format!("HAVS sheet {} - week ending {}", sheet.id, sheet.week_ending));
    println!("Employee : {}", names.employee(sheet.employee_id));
    println!("Status   : {}\n", sheet.status.to_db_str());

    let mut headers = vec!["Equipment".to_string()];
    headers.extend((0..7).map(|d| slot_label(d).to_string()));
    headers.push("Total".into());

    let cell = |m: u32| if m == 0 { String::new() } else { m.to_string() };

    let mut table = Table::new(headers);
    for e in &sheet.exposures {
        let mut row = vec![e.equipment.clone()];
        row.extend(e.minutes.iter().map(|m| cell(*m)));
        row.push(mins2readable(e.total_minutes() as i64, true));
        table.add_row(row);
    }
    let totals = daily_totals(sheet);
    let mut row = vec!["TOTAL".to_string()];
    row.extend(totals.iter().map(|m| cell(*m)));
    row.push(mins2readable(sheet.total_minutes() as i64, true));
    table.add_row(row);

    print!("{}", table.render_with(&cfg.separator_char));
}
