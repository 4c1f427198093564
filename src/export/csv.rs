// src/export/csv.rs

use crate::errors::AppResult;
use crate::export::model::{ExportTable, RowKind};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use csv::{QuoteStyle, Writer, WriterBuilder};
use std::io;
use std::path::Path;

/// Every cell is quoted and embedded quotes are doubled, so free text
/// (notes, descriptions) with commas or quotes survives a round trip.
fn writer<W: io::Write>(out: W) -> Writer<W> {
    WriterBuilder::new()
        .quote_style(QuoteStyle::Always)
        .from_writer(out)
}

fn write_table<W: io::Write>(wtr: &mut Writer<W>, table: &ExportTable) -> AppResult<()> {
    wtr.write_record(&table.headers)?;
    for (kind, cells) in &table.rows {
        match kind {
            RowKind::Separator => wtr.write_record(vec![""; table.headers.len()])?,
            _ => wtr.write_record(cells)?,
        }
    }
    wtr.flush()?;
    Ok(())
}

pub(crate) fn export_csv(table: &ExportTable, path: &Path) -> AppResult<()> {
    info(format!("Exporting to CSV: {}", path.display()));

    let file = std::fs::File::create(path)?;
    let mut wtr = writer(file);
    write_table(&mut wtr, table)?;

    notify_export_success("CSV", path);
    Ok(())
}

/// Same bytes as `export_csv`, kept in memory.
pub fn to_csv_string(table: &ExportTable) -> AppResult<String> {
    let mut wtr = writer(Vec::new());
    write_table(&mut wtr, table)?;
    let bytes = wtr
        .into_inner()
        .map_err(|e| io::Error::other(e.to_string()))?;
    String::from_utf8(bytes).map_err(|e| io::Error::other(e.to_string()).into())
}
