use crate::cli::commands::open_pool;
use crate::cli::parser::{Commands, RateCmd};
use crate::config::Config;
use crate::core::rate_tables::RateTableLogic;
use crate::core::rates::{RateQuery, price_work_total};
use crate::errors::AppResult;
use crate::ui::messages::{info, success, warning};
use crate::utils::formatting::format_money;
use crate::utils::table::Table;
use crate::utils::time::parse_amount;
use std::path::Path;

pub fn handle(cmd: &Commands, cfg: &Config) -> AppResult<()> {
    if let Commands::Rate { action } = cmd {
        let mut pool = open_pool(cfg)?;
        let money = |d| format_money(d, &cfg.currency_symbol);

        match action {
            RateCmd::Add {
                schedule,
                item,
                col2,
                col3,
                col4,
                price,
            } => {
                let row = RateTableLogic::add(
                    &mut pool,
                    *schedule,
                    [item.as_str(), col2.as_str(), col3.as_str(), col4.as_str()],
                    parse_amount(price)?,
                )?;
                success(format!(
                    "{} rate {} added: {} = {}",
                    schedule.label(),
                    row.id,
                    row.describe(),
                    money(row.unit_price)
                ));
            }

            RateCmd::Import { schedule, file } => {
                let n = RateTableLogic::import_csv(&mut pool, *schedule, Path::new(file))?;
                success(format!("Imported {n} {} rate rows from {file}", schedule.label()));
            }

            RateCmd::List { schedule } => {
                let rows = RateTableLogic::list(&mut pool, *schedule)?;
                if rows.is_empty() {
                    info(format!("The {} table is empty.", schedule.label()));
                    return Ok(());
                }
                let labels = schedule.column_labels();
                let mut table = Table::new(vec![
                    "ID", labels[0], labels[1], labels[2], labels[3], "Rate",
                ]);
                for r in &rows {
                    table.add_row(vec![
                        r.id.to_string(),
                        r.work_item.clone(),
                        r.col2.clone(),
                        r.col3.clone(),
                        r.col4.clone(),
                        money(r.unit_price),
                    ]);
                }
                print!("{}", table.render_with(&cfg.separator_char));
            }

            RateCmd::Resolve {
                schedule,
                item,
                col2,
                col3,
                col4,
                quantity,
            } => {
                let query = RateQuery::new(item, col2, col3, col4);
                let (row, exact) = RateTableLogic::resolve(&mut pool, *schedule, &query)?;
                if !exact {
                    warning(format!(
                        "No exact match for {}; falling back to the first '{}' row",
                        query.describe(),
                        row.work_item
                    ));
                }
                println!("Rate {}: {} = {}", row.id, row.describe(), money(row.unit_price));
                if let Some(q) = quantity {
                    let q = parse_amount(q)?;
                    println!("Total for {}: {}", q, money(price_work_total(q, row.unit_price)));
                }
            }

            RateCmd::Options {
                schedule,
                item,
                col2,
                col3,
            } => {
                let chosen: Vec<&str> = [item, col2, col3]
                    .into_iter()
                    .map_while(|c| c.as_deref())
                    .collect();
                let column = chosen.len();
                let prefix = RateQuery::from_values(&chosen);

                let values = RateTableLogic::options(&mut pool, *schedule, &prefix, column)?;
                let label = schedule.column_labels()[column];
                if values.is_empty() {
                    info(format!("No choices for {label}: the selection is complete."));
                } else {
                    println!("{label}:");
                    for v in values {
                        println!("  {v}");
                    }
                }
            }

            RateCmd::Del { schedule, id } => {
                RateTableLogic::delete(&mut pool, *schedule, *id)?;
                success(format!("{} rate {id} deleted", schedule.label()));
            }
        }
    }

    Ok(())
}
