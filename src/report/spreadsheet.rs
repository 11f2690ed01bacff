//! The spreadsheet export: a summary sheet plus one sheet of raw values for the report kind.

use std::io::Cursor;

use umya_spreadsheet::Worksheet;

use crate::{
    Error,
    config::BusinessConfig,
    report::{
        ReportKind,
        data::ReportData,
        kind::ColumnKind,
        table::{Cell, SPREADSHEET_ROW_LIMIT, build_table, format_date, format_date_time},
    },
};

/// The name of the sheet holding the report header and summary metrics.
pub const SUMMARY_SHEET_NAME: &str = "Summary";

/// The spreadsheet MIME type.
pub const SPREADSHEET_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Write the report for `kind` as an xlsx workbook.
///
/// Numbers are written as raw values so they can be re-read without loss.
/// Recent Transactions is limited to the newest [SPREADSHEET_ROW_LIMIT] rows.
///
/// # Errors
/// Returns an [Error::SpreadsheetError] if the workbook could not be created
/// or written.
pub fn write_spreadsheet(
    kind: ReportKind,
    data: &ReportData,
    business: &BusinessConfig,
) -> Result<Vec<u8>, Error> {
    let mut book = umya_spreadsheet::new_file_empty_worksheet();

    let summary_sheet = book
        .new_sheet(SUMMARY_SHEET_NAME)
        .map_err(|error| Error::SpreadsheetError(error.to_string()))?;
    write_summary_sheet(summary_sheet, data, business);

    let kind_sheet = book
        .new_sheet(kind.sheet_name())
        .map_err(|error| Error::SpreadsheetError(error.to_string()))?;
    write_kind_sheet(kind_sheet, kind, data);

    let mut buffer = Cursor::new(Vec::new());
    umya_spreadsheet::writer::xlsx::write_writer(&book, &mut buffer)
        .inspect_err(|error| tracing::error!("could not write spreadsheet: {error}"))
        .map_err(|error| Error::SpreadsheetError(error.to_string()))?;

    Ok(buffer.into_inner())
}

fn write_summary_sheet(sheet: &mut Worksheet, data: &ReportData, business: &BusinessConfig) {
    sheet
        .get_cell_mut((1, 1))
        .set_value(format!("{} - Business Report", business.name));
    sheet
        .get_cell_mut((1, 2))
        .set_value(format!("Report Period: {}", data.period.label()));
    sheet
        .get_cell_mut((1, 3))
        .set_value(format!("Generated: {}", format_date_time(data.generated_at)));

    sheet.get_cell_mut((1, 5)).set_value("Summary Statistics");
    sheet.get_cell_mut((1, 6)).set_value("Metric");
    sheet.get_cell_mut((2, 6)).set_value("Value");

    for (row, (label, value)) in (7u32..).zip(data.summary.metrics()) {
        sheet.get_cell_mut((1, row)).set_value(label);
        write_cell(sheet, 2, row, &Cell::from(value));
    }
}

fn write_kind_sheet(sheet: &mut Worksheet, kind: ReportKind, data: &ReportData) {
    let Some(table) = build_table(kind, data, SPREADSHEET_ROW_LIMIT) else {
        sheet.get_cell_mut((1, 1)).set_value(kind.no_data_message());
        return;
    };

    let headers = table.columns.iter().flat_map(|column| match column.kind {
        ColumnKind::Measure => vec![column.header, "Unit"],
        _ => vec![column.header],
    });

    for (col, header) in (1u32..).zip(headers) {
        sheet.get_cell_mut((col, 1)).set_value(header);
    }

    for (row, cells) in (2u32..).zip(&table.rows) {
        let mut col = 1;

        for cell in cells {
            col += write_cell(sheet, col, row, cell);
        }
    }
}

/// Write `cell` starting at (`col`, `row`) and return the number of columns used.
fn write_cell(sheet: &mut Worksheet, col: u32, row: u32, cell: &Cell) -> u32 {
    let target = sheet.get_cell_mut((col, row));

    match cell {
        Cell::Text(text) => {
            target.set_value(text);
        }
        Cell::Placeholder(_) => {}
        Cell::Count(count) => {
            target.set_value_number(*count as f64);
        }
        Cell::Currency(number) | Cell::Number(number) => {
            target.set_value_number(*number);
        }
        Cell::Measure { value, unit } => {
            target.set_value_number(*value);
            sheet.get_cell_mut((col + 1, row)).set_value(unit);
            return 2;
        }
        Cell::Date(date) => {
            target.set_value(format_date(*date));
        }
        Cell::DateTime(date_time) => {
            target.set_value(format_date_time(*date_time));
        }
    }

    1
}
