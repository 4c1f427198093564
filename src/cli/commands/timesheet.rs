use crate::cli::commands::{open_pool, resolve_range};
use crate::cli::parser::{Commands, TimesheetCmd};
use crate::config::Config;
use crate::core::rates::RateQuery;
use crate::core::timesheets::{TimesheetLogic, parse_daily_hours};
use crate::db::employees::load_employees;
use crate::errors::{AppError, AppResult};
use crate::export::model::Names;
use crate::models::timesheet::{EntryKind, Timesheet, TimesheetStatus};
use crate::ui::messages::{header, info, success};
use crate::utils::colors::{GREEN, RESET, YELLOW};
use crate::utils::date::{format_datetime, parse_date, slot_label};
use crate::utils::formatting::format_money;
use crate::utils::table::Table;
use crate::utils::time::{parse_amount, parse_optional_datetime};

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Timesheet { action } = cmd {
        let mut pool = open_pool(cfg)?;
        let money = |d| format_money(d, &cfg.currency_symbol);

        match action {
            TimesheetCmd::Create {
                employee,
                week_ending,
                job,
            } => {
                let we = parse_date(week_ending)
                    .ok_or_else(|| AppError::InvalidDate(week_ending.clone()))?;
                let ts = TimesheetLogic::create(&mut pool, *employee, we, job)?;
                success(format!(
                    "Timesheet {} created for week ending {} (job {})",
                    ts.id, ts.week_ending, ts.job_number
                ));
            }

            TimesheetCmd::AddPrice {
                id,
                schedule,
                item,
                col2,
                col3,
                col4,
                quantity,
                description,
            } => {
                let query = RateQuery::new(item, col2, col3, col4);
                let entry = TimesheetLogic::add_price_work(
                    &mut pool,
                    *id,
                    *schedule,
                    &query,
                    parse_amount(quantity)?,
                    description.as_deref(),
                )?;
                success(format!(
                    "Entry {} added: {} x {} = {}",
                    entry.id,
                    entry.quantity,
                    money(entry.unit_price),
                    money(entry.total)
                ));
            }

            TimesheetCmd::AddDay {
                id,
                hours,
                description,
            } => {
                let daily = parse_daily_hours(hours)?;
                let entry =
                    TimesheetLogic::add_day_rate(&mut pool, *id, daily, description.as_deref())?;
                success(format!(
                    "Entry {} added: {}h x {} = {}",
                    entry.id,
                    entry.quantity.normalize(),
                    money(entry.unit_price),
                    money(entry.total)
                ));
            }

            TimesheetCmd::RemoveEntry { id, entry } => {
                TimesheetLogic::remove_entry(&mut pool, *id, *entry)?;
                success(format!("Entry {entry} removed from timesheet {id}"));
            }

            TimesheetCmd::Submit { id, at } => {
                let at = parse_optional_datetime(at.as_ref())?;
                let ts = TimesheetLogic::submit(&mut pool, *id, at)?;
                success(format!(
                    "Timesheet {} submitted at {} (total {})",
                    ts.id,
                    format_datetime(&at),
                    money(ts.total())
                ));
            }

            TimesheetCmd::List { range } => {
                let (from, to) = resolve_range(range)?;
                let sheets = TimesheetLogic::list(&mut pool, from, to)?;
                if sheets.is_empty() {
                    info(format!("No timesheets with a week ending between {from} and {to}."));
                    return Ok(());
                }
                let names = Names::new(&load_employees(&pool.conn, true)?, &[]);

                let mut table = Table::new(vec![
                    "ID",
                    "Week ending",
                    "Employee",
                    "Job",
                    "Status",
                    "Submitted",
                    "Entries",
                    "Total",
                ]);
                for ts in &sheets {
                    table.add_row(vec![
                        ts.id.to_string(),
                        ts.week_ending.to_string(),
                        names.employee(ts.employee_id),
                        ts.job_number.clone(),
                        status_cell(ts),
                        ts.submitted_at
                            .as_ref()
                            .map(format_datetime)
                            .unwrap_or_else(|| "--".into()),
                        ts.entries.len().to_string(),
                        money(ts.total()),
                    ]);
                }
                print!("{}", table.render_with(&cfg.separator_char));
            }

            TimesheetCmd::Show { id } => {
                let ts = TimesheetLogic::show(&mut pool, *id)?;
                let names = Names::new(&load_employees(&pool.conn, true)?, &[]);
                print_timesheet(&ts, &names, cfg);
            }
        }
    }

    Ok(())
}

fn status_cell(ts: &Timesheet) -> String {
    match ts.status {
        TimesheetStatus::Draft => format!("{YELLOW}draft{RESET}"),
        TimesheetStatus::Submitted => format!("{GREEN}submitted{RESET}"),
    }
}

fn print_timesheet(ts: &Timesheet, names: &Names, cfg: &Config) {
    let money = |d| format_money(d, &cfg.currency_symbol);

    header(format!("Timesheet {} - week ending {}", ts.id, ts.week_ending));
    println!("Employee : {}", names.employee(ts.employee_id));
    println!("Job      : {}", ts.job_number);
    println!("Status   : {}\n", status_cell(ts));

    if ts.entries.is_empty() {
        info("No entries yet.");
        return;
    }

    let mut headers = vec!["ID".to_string(), "Kind".into(), "Description".into()];
    headers.extend((0..7).map(|d| slot_label(d).to_string()));
    headers.extend(["Qty".to_string(), "Unit".into(), "Total".into()]);

    let mut table = Table::new(headers);
    for e in &ts.entries {
        let mut row = vec![e.id.to_string(), e.kind.label().to_string(), e.description.clone()];
        row.extend(e.daily_hours.iter().map(|h| match e.kind {
            EntryKind::DayRate if !h.is_zero() => h.normalize().to_string(),
            _ => String::new(),
        }));
        row.extend([
            e.quantity.normalize().to_string(),
            money(e.unit_price),
            money(e.total),
        ]);
        table.add_row(row);
    }
    print!("{}", table.render_with(&cfg.separator_char));
    println!("\nTOTAL: {}", money(ts.total()));
}
