use crate::core::rates::{RateQuery, Resolution, options, resolve};
use crate::db::log::audit;
use crate::db::pool::DbPool;
use crate::db::rates::{delete_rate, insert_rate, load_rates};
use crate::errors::{AppError, AppResult};
use crate::models::rate::{RateRow, RateSchedule};
use crate::utils::time::parse_amount;
use rust_decimal::Decimal;
use serde::Deserialize;
use std::path::Path;

/// One line of a rate-table CSV. Column headings from any of the three
/// tables are accepted.
#[derive(Debug, Deserialize)]
struct RateRecord {
    work_item: String,
    #[serde(default, alias = "voltage", alias = "column2", alias = "unit")]
    col2: String,
    #[serde(default, alias = "excavation", alias = "column3")]
    col3: String,
    #[serde(default, alias = "site", alias = "column4")]
    col4: String,
    #[serde(alias = "unit_price", alias = "price")]
    rate: String,
}

pub struct RateTableLogic;

impl RateTableLogic {
    pub fn add(
        pool: &mut DbPool,
        schedule: RateSchedule,
        columns: [&str; 4],
        unit_price: Decimal,
    ) -> AppResult<RateRow> {
        if columns[0].trim().is_empty() {
            return Err(AppError::Validation("work item is required".into()));
        }
        let mut row = RateRow {
            id: 0,
            schedule,
            work_item: columns[0].trim().to_string(),
            col2: columns[1].trim().to_string(),
            col3: columns[2].trim().to_string(),
            col4: columns[3].trim().to_string(),
            unit_price,
        };
        row.id = insert_rate(&pool.conn, &row)?;
        audit(
            &pool.conn,
            "rate_add",
            schedule.to_db_str(),
            &format!("{} = {}", row.describe(), unit_price),
        );
        Ok(row)
    }

    /// Append every row of a CSV file, in file order, inside one transaction.
    pub fn import_csv(pool: &mut DbPool, schedule: RateSchedule, path: &Path) -> AppResult<usize> {
        let mut rdr = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .flexible(true)
            .from_path(path)?;

        let mut rows = Vec::new();
        for (n, rec) in rdr.deserialize::<RateRecord>().enumerate() {
            let rec = rec?;
            if rec.work_item.is_empty() {
                return Err(AppError::Validation(format!(
                    "line {}: work item is empty",
                    n + 2
                )));
            }
            rows.push(RateRow {
                id: 0,
                schedule,
                unit_price: parse_amount(&rec.rate)?,
                work_item: rec.work_item,
                col2: rec.col2,
                col3: rec.col3,
                col4: rec.col4,
            });
        }

        let tx = pool.conn.transaction()?;
        for row in &rows {
            insert_rate(&tx, row)?;
        }
        tx.commit()?;

        audit(
            &pool.conn,
            "rate_import",
            schedule.to_db_str(),
            &format!("{} rows from {}", rows.len(), path.display()),
        );
        Ok(rows.len())
    }

    pub fn list(pool: &mut DbPool, schedule: RateSchedule) -> AppResult<Vec<RateRow>> {
        load_rates(&pool.conn, schedule)
    }

    pub fn resolve(
        pool: &mut DbPool,
        schedule: RateSchedule,
        query: &RateQuery,
    ) -> AppResult<(RateRow, bool)> {
        let rows = load_rates(&pool.conn, schedule)?;
        let Resolution { row, exact } = resolve(&rows, query).ok_or_else(|| {
            AppError::UndefinedRate(format!("{} {}", schedule.label(), query.describe()))
        })?;
        Ok((row.clone(), exact))
    }

    /// Choices for the next column after the values already in `prefix`.
    pub fn options(
        pool: &mut DbPool,
        schedule: RateSchedule,
        prefix: &RateQuery,
        column: usize,
    ) -> AppResult<Vec<String>> {
        if column > 3 {
            return Err(AppError::Validation(format!("column {column} out of range (0-3)")));
        }
        let rows = load_rates(&pool.conn, schedule)?;
        Ok(options(&rows, prefix, column))
    }

    pub fn delete(pool: &mut DbPool, schedule: RateSchedule, id: i64) -> AppResult<()> {
        delete_rate(&pool.conn, schedule, id)?;
        audit(&pool.conn, "rate_del", schedule.to_db_str(), &id.to_string());
        Ok(())
    }
}
