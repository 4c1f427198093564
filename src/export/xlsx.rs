// src/export/xlsx.rs

use crate::errors::{AppError, AppResult};
use crate::export::model::{ExportTable, RowKind};
use crate::export::notify_export_success;
use crate::ui::messages::info;
use chrono::{NaiveDate, NaiveDateTime, NaiveTime};
use rust_xlsxwriter::{Color, Format, FormatAlign, FormatBorder, FormatPattern, Workbook, Worksheet};
use std::path::Path;
use unicode_width::UnicodeWidthStr;

pub(crate) fn export_xlsx(table: &ExportTable, sheet_name: &str, path: &Path) -> AppResult<()> {
    info(format!("Exporting to XLSX: {}", path.display()));

    let mut workbook = Workbook::new();
    let worksheet = workbook.add_worksheet();
    worksheet.set_name(sheet_name).map_err(to_export_error)?;

    if table.is_empty() {
        worksheet
            .write(0, 0, "No data available")
            .map_err(to_export_error)?;
        workbook.save(path).map_err(to_export_error)?;
        notify_export_success("XLSX (empty dataset)", path);
        return Ok(());
    }

    // ---------------------------
    // Header
    // ---------------------------
    let header_format = Format::new()
        .set_bold()
        .set_font_color(Color::RGB(0xFFFFFF))
        .set_background_color(Color::RGB(0x2F75B5))
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);

    for (col, header) in table.headers.iter().enumerate() {
        worksheet
            .write_with_format(0, col as u16, header, &header_format)
            .map_err(to_export_error)?;
    }
    worksheet.set_freeze_panes(1, 0).ok();

    let mut col_widths: Vec<usize> = table
        .headers
        .iter()
        .map(|h| UnicodeWidthStr::width(h.as_str()))
        .collect();

    let band1 = Color::RGB(0xEAF3FB);
    let band2 = Color::RGB(0xFFFFFF);
    let total_bg = Color::RGB(0xFFF2CC);

    // ---------------------------
    // Rows
    // ---------------------------
    let mut band = 0usize;
    for (row_index, (kind, cells)) in table.rows.iter().enumerate() {
        let row = (row_index + 1) as u32;
        let (bg, bold) = match kind {
            RowKind::Separator => {
                band = 0;
                continue;
            }
            RowKind::Total => (total_bg, true),
            RowKind::Data => {
                band += 1;
                (if band % 2 == 1 { band1 } else { band2 }, false)
            }
        };

        for (col, value) in cells.iter().enumerate() {
            write_cell(worksheet, row, col as u16, value, bg, bold)?;
            if let Some(w) = col_widths.get_mut(col) {
                *w = (*w).max(UnicodeWidthStr::width(value.as_str()));
            }
        }
    }

    for (c, w) in col_widths.iter().enumerate() {
        worksheet
            .set_column_width(c as u16, (*w).min(60) as f64 + 2.0)
            .map_err(to_export_error)?;
    }

    workbook.save(path).map_err(to_export_error)?;
    notify_export_success("XLSX", path);
    Ok(())
}

/// Excel serial number for dates and timestamps, with its number format.
fn excel_serial(s: &str) -> Option<(&'static str, f64)> {
    let epoch = NaiveDate::from_ymd_opt(1899, 12, 30)?.and_time(NaiveTime::MIN);
    let serial = |dt: NaiveDateTime| (dt - epoch).num_seconds() as f64 / 86400.0;

    if let Some(dt) = crate::utils::date::parse_datetime(s) {
        return Some(("yyyy-mm-dd hh:mm", serial(dt)));
    }
    crate::utils::date::parse_date(s).map(|d| ("yyyy-mm-dd", serial(d.and_time(NaiveTime::MIN))))
}

fn write_cell(
    worksheet: &mut Worksheet,
    row: u32,
    col: u16,
    s: &str,
    bg: Color,
    bold: bool,
) -> AppResult<()> {
    let mut fmt = Format::new()
        .set_background_color(bg)
        .set_pattern(FormatPattern::Solid)
        .set_border(FormatBorder::Thin);
    if bold {
        fmt = fmt.set_bold();
    }

    if let Some((num_format, serial)) = excel_serial(s) {
        worksheet
            .write_with_format(row, col, serial, &fmt.set_num_format(num_format))
            .map_err(to_export_error)?;
        return Ok(());
    }

    if let Ok(num) = s.parse::<f64>() {
        worksheet
            .write_with_format(row, col, num, &fmt.set_align(FormatAlign::Right))
            .map_err(to_export_error)?;
        return Ok(());
    }

    worksheet
        .write_with_format(row, col, s, &fmt)
        .map_err(to_export_error)?;
    Ok(())
}

fn to_export_error<E: std::fmt::Display>(e: E) -> AppError {
    AppError::Export(e.to_string())
}
