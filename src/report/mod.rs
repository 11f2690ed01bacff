//! Business reports: aggregation of transactions and the four ways a report is presented.
//!
//! [aggregation::aggregate] turns transactions into totals and breakdowns. [data::ReportData]
//! gathers everything a report needs, [table::build_table] lays out the rows for a
//! [ReportKind], and the screen, print view, spreadsheet and PDF render that
//! table without recomputing any totals.

mod aggregation;
mod data;
mod document;
mod kind;
mod page;
mod period;
mod print;
mod spreadsheet;
mod table;

pub use kind::ReportKind;
pub use page::{get_report_document, get_report_page, get_report_print_page, get_report_spreadsheet};
pub use table::{format_date, format_date_time};
