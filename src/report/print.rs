//! The print-formatted HTML report.

use maud::{DOCTYPE, Markup, PreEscaped, html};

use crate::{
    config::BusinessConfig,
    report::{
        ReportKind,
        data::ReportData,
        table::{Cell, PRINT_ROW_LIMIT, build_table, format_date_time},
    },
};

const PRINT_STYLES: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; color: #111827; }
.header { text-align: center; margin-bottom: 30px; }
.header h1 { margin: 0 0 4px 0; }
.header p { margin: 2px 0; color: #4b5563; }
.summary { display: grid; grid-template-columns: repeat(auto-fit, minmax(150px, 1fr)); gap: 12px; margin-bottom: 30px; }
.card { border: 1px solid #d1d5db; border-radius: 4px; padding: 12px; }
.card h3 { margin: 0 0 6px 0; font-size: 13px; color: #4b5563; }
.card p { margin: 0; font-size: 18px; font-weight: bold; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #d1d5db; padding: 8px; text-align: left; }
th { background-color: #f3f4f6; }
td.number { text-align: right; }
.no-data { text-align: center; color: #6b7280; padding: 20px; }
.actions { text-align: center; margin-top: 20px; }
@media print { .actions { display: none; } }
"#;

/// Render the report for `kind` as a standalone page for printing.
///
/// Recent Transactions is limited to the newest [PRINT_ROW_LIMIT] rows.
pub fn print_document(kind: ReportKind, data: &ReportData, business: &BusinessConfig) -> Markup {
    let report_table = build_table(kind, data, PRINT_ROW_LIMIT);
    let currency = business.currency_symbol.as_str();

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                title { (business.name) " Report - " (kind.title()) }
                style { (PreEscaped(PRINT_STYLES)) }
            }

            body
            {
                div class="header"
                {
                    h1 { (business.name) " - Business Report" }
                    p { "Report Period: " (data.period.label()) }
                    p { "Generated: " (format_date_time(data.generated_at)) }
                }

                div class="summary"
                {
                    @for (label, value) in data.summary.metrics() {
                        div class="card"
                        {
                            h3 { (label) }
                            p { (Cell::from(value).display(currency)) }
                        }
                    }
                }

                h2 { (kind.title()) }

                @match report_table {
                    Some(report_table) => {
                        table
                        {
                            thead
                            {
                                tr
                                {
                                    @for column in report_table.columns {
                                        th { (column.header) }
                                    }
                                }
                            }

                            tbody
                            {
                                @for row in &report_table.rows {
                                    tr
                                    {
                                        @for cell in row {
                                            td class=[cell.is_numeric().then_some("number")]
                                            {
                                                (cell.display(currency))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                    None => {
                        p class="no-data" { (kind.no_data_message()) }
                    }
                }

                div class="actions"
                {
                    button type="button" onclick="window.print()" { "Print" }
                }
            }
        }
    }
}
