//! The report screen, the print view and the file exports.

use axum::{
    extract::{FromRef, Query, State},
    http::header::{CONTENT_DISPOSITION, CONTENT_TYPE},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use time::{OffsetDateTime, UtcOffset};

use crate::{
    AppState, Error,
    config::BusinessConfig,
    endpoints,
    html::{
        CARD_STYLE, FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base,
    },
    navigation::NavBar,
    report::{
        ReportKind,
        data::{ReportData, fetch_report_data},
        document::{DOCUMENT_CONTENT_TYPE, write_document},
        period::{PeriodKind, ReportQuery},
        print::print_document,
        spreadsheet::{SPREADSHEET_CONTENT_TYPE, write_spreadsheet},
        table::{Cell, SCREEN_ROW_LIMIT, build_table},
    },
    stores::sqlite::{SQLiteCustomerStore, SQLiteProductStore, SQLiteTransactionStore},
    timezone::get_local_offset,
};

/// The state needed for the report screen and exports.
#[derive(Debug, Clone)]
pub struct ReportState {
    pub customer_store: SQLiteCustomerStore,
    pub product_store: SQLiteProductStore,
    pub transaction_store: SQLiteTransactionStore,
    pub business: BusinessConfig,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Lagos".
    pub local_timezone: String,
}

impl FromRef<AppState> for ReportState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            customer_store: state.customer_store.clone(),
            product_store: state.product_store.clone(),
            transaction_store: state.transaction_store.clone(),
            business: state.business.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

fn local_offset(local_timezone: &str) -> Result<UtcOffset, Error> {
    get_local_offset(local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", local_timezone);
        Error::InvalidTimezoneError(local_timezone.to_owned())
    })
}

async fn load_report(state: &ReportState, query: &ReportQuery) -> Result<ReportData, Error> {
    let local_offset = local_offset(&state.local_timezone)?;
    let period = query.period()?;

    fetch_report_data(
        state.customer_store.clone(),
        state.product_store.clone(),
        state.transaction_store.clone(),
        period,
        OffsetDateTime::now_utc(),
        local_offset,
    )
    .await
}

/// Render the report screen.
///
/// An invalid custom period is shown in place of the report so the user can
/// correct the dates.
pub async fn get_report_page(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let report = match load_report(&state, &query).await {
        Ok(data) => Ok(data),
        Err(Error::Validation(error)) => Err(error.to_string()),
        Err(error) => return Err(error),
    };

    Ok(report_view(&query, report.as_ref(), &state.business).into_response())
}

/// Render the print formatted report.
pub async fn get_report_print_page(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let data = load_report(&state, &query).await?;

    Ok(print_document(query.kind, &data, &state.business).into_response())
}

/// Download the report as an xlsx workbook.
pub async fn get_report_spreadsheet(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let data = load_report(&state, &query).await?;
    let bytes = write_spreadsheet(query.kind, &data, &state.business)?;

    Ok(attachment(
        bytes,
        SPREADSHEET_CONTENT_TYPE,
        &file_name(&state.business, query.kind, &data, "xlsx"),
    ))
}

/// Download the report as a PDF document.
pub async fn get_report_document(
    State(state): State<ReportState>,
    Query(query): Query<ReportQuery>,
) -> Result<Response, Error> {
    let data = load_report(&state, &query).await?;
    let bytes = write_document(query.kind, &data, &state.business)?;

    Ok(attachment(
        bytes,
        DOCUMENT_CONTENT_TYPE,
        &file_name(&state.business, query.kind, &data, "pdf"),
    ))
}

fn file_name(
    business: &BusinessConfig,
    kind: ReportKind,
    data: &ReportData,
    extension: &str,
) -> String {
    let stem = business.report_file_stem(data.generated_at.date(), kind.number());

    format!("{stem}.{extension}")
}

fn attachment(bytes: Vec<u8>, content_type: &str, file_name: &str) -> Response {
    (
        [
            (CONTENT_TYPE, content_type.to_owned()),
            (
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        bytes,
    )
        .into_response()
}

const TAB_STYLE: &str = "px-3 py-2 text-sm font-medium rounded text-gray-600 \
    hover:bg-gray-100 dark:text-gray-300 dark:hover:bg-gray-700";
const NUMBER_CELL_STYLE: &str = "px-6 py-4 text-right tabular-nums";
const ACTIVE_TAB_STYLE: &str = "px-3 py-2 text-sm font-medium rounded \
    bg-blue-50 text-blue-700 dark:bg-blue-900/30 dark:text-blue-200";

fn report_view(
    query: &ReportQuery,
    report: Result<&ReportData, &String>,
    business: &BusinessConfig,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::REPORTS_VIEW).into_html();

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-6 w-full lg:max-w-5xl"
            {
                h1 class="text-xl font-bold" { "Reports" }

                (filter_form(query))

                @match report {
                    Ok(data) => (report_content(query, data, business)),
                    Err(error_message) => {
                        div id="report-content"
                        {
                            p class="text-red-600 dark:text-red-400"
                            {
                                "Error: " (error_message)
                            }
                        }
                    }
                }
            }
        }
    );

    base("Reports", &[], &content)
}

fn filter_form(query: &ReportQuery) -> Markup {
    html!(
        form
            id="report-filter"
            hx-get=(endpoints::REPORTS_VIEW)
            hx-trigger="change delay:300ms"
            hx-sync="this:replace"
            hx-target="#report-content"
            hx-select="#report-content"
            hx-swap="outerHTML"
            hx-push-url="true"
            class="grid gap-4 sm:grid-cols-3 items-end"
        {
            input type="hidden" name="kind" value=(query.kind.slug());

            div
            {
                label for="period" class=(FORM_LABEL_STYLE) { "Period" }

                select id="period" name="period" class=(FORM_TEXT_INPUT_STYLE)
                {
                    @for period in PeriodKind::ALL {
                        option value=(period.slug()) selected[period == query.period]
                        {
                            (period.label())
                        }
                    }
                }
            }

            div
            {
                label for="start" class=(FORM_LABEL_STYLE) { "From" }

                input
                    id="start"
                    type="date"
                    name="start"
                    value=(query.start)
                    class=(FORM_TEXT_INPUT_STYLE);
            }

            div
            {
                label for="end" class=(FORM_LABEL_STYLE) { "To" }

                input
                    id="end"
                    type="date"
                    name="end"
                    value=(query.end)
                    class=(FORM_TEXT_INPUT_STYLE);
            }
        }
    )
}

fn report_content(query: &ReportQuery, data: &ReportData, business: &BusinessConfig) -> Markup {
    let kind = query.kind;
    let report_table = build_table(kind, data, SCREEN_ROW_LIMIT);
    let currency = business.currency_symbol.as_str();
    let query_string = query.to_query_string(kind);

    html!(
        div id="report-content" class="space-y-6"
        {
            nav class="flex flex-wrap gap-2" aria-label="Report kind"
            {
                @for tab in ReportKind::ALL {
                    a
                        href={ (endpoints::REPORTS_VIEW) "?" (query.to_query_string(tab)) }
                        class=(if tab == kind { ACTIVE_TAB_STYLE } else { TAB_STYLE })
                        aria-current=[(tab == kind).then_some("page")]
                    {
                        (tab.title())
                    }
                }
            }

            p class="text-sm text-gray-600 dark:text-gray-400"
            {
                "Report Period: " (data.period.label())
            }

            div class="grid grid-cols-2 gap-4 md:grid-cols-5"
            {
                @for (label, value) in data.summary.metrics() {
                    div class=(CARD_STYLE) data-summary-card="true"
                    {
                        h3 class="text-xs text-gray-500 dark:text-gray-400" { (label) }
                        p class="text-lg font-semibold tabular-nums"
                        {
                            (Cell::from(value).display(currency))
                        }
                    }
                }
            }

            div class="flex flex-wrap gap-4 text-sm"
            {
                a
                    href={ (endpoints::REPORT_PRINT_VIEW) "?" (query_string) }
                    target="_blank"
                    class=(LINK_STYLE)
                {
                    "Print"
                }
                a href={ (endpoints::REPORT_SPREADSHEET) "?" (query_string) } class=(LINK_STYLE)
                {
                    "Export Excel"
                }
                a href={ (endpoints::REPORT_DOCUMENT) "?" (query_string) } class=(LINK_STYLE)
                {
                    "Export PDF"
                }
            }

            h2 class="text-lg font-semibold" { (kind.title()) }

            @match report_table {
                Some(report_table) => {
                    div class="overflow-x-auto dark:bg-gray-800"
                    {
                        table class="w-full text-sm text-left rtl:text-right
                            text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    @for column in report_table.columns {
                                        th scope="col" class=(TABLE_CELL_STYLE) { (column.header) }
                                    }
                                }
                            }

                            tbody
                            {
                                @for row in &report_table.rows {
                                    tr class=(TABLE_ROW_STYLE)
                                    {
                                        @for cell in row {
                                            td class=(if cell.is_numeric() { NUMBER_CELL_STYLE } else { TABLE_CELL_STYLE })
                                            {
                                                (cell.display(currency))
                                            }
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
                None => {
                    p class="py-6 text-center text-gray-500 dark:text-gray-400" data-no-data="true"
                    {
                        (kind.no_data_message())
                    }
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Query, State},
        http::StatusCode,
        response::IntoResponse,
    };

    use crate::{
        AppState,
        report::{
            ReportKind,
            period::{PeriodKind, ReportQuery},
        },
        test_utils::{
            assert_content_type, assert_status_ok, assert_valid_html, get_header,
            must_add_customer, must_add_product, must_add_transaction, must_create_state,
            parse_html_document, select_texts,
        },
    };

    use super::{
        ReportState, get_report_document, get_report_page, get_report_print_page,
        get_report_spreadsheet,
    };

    fn seeded_state() -> AppState {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "08012345678");
        let bola = must_add_customer(&state, "Bola", "");
        let copper = must_add_product(&state, "Copper", "");
        must_add_transaction(&state, ada.id, copper.id, 2.0, 50.0);
        must_add_transaction(&state, ada.id, copper.id, 1.0, 50.0);
        must_add_transaction(&state, bola.id, copper.id, 3.0, 10.0);

        state
    }

    fn query(kind: ReportKind) -> ReportQuery {
        ReportQuery {
            kind,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn renders_summary_tabs_and_table() {
        let state = seeded_state();

        let response = get_report_page(
            State(ReportState::from_ref(&state)),
            Query(query(ReportKind::CustomerSpending)),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);

        let tabs = select_texts(&html, "nav[aria-label='Report kind'] a");
        assert_eq!(tabs.len(), 5);
        assert_eq!(
            select_texts(&html, "[aria-current='page']"),
            vec!["Reports", "Customer Spending"]
        );

        let cards = select_texts(&html, "[data-summary-card] p");
        assert_eq!(cards, vec!["2", "1", "3", "₦180.00", "6.00"]);

        let rows = select_texts(&html, "tbody tr td:first-child");
        assert_eq!(rows, vec!["Ada", "Bola"]);
    }

    #[tokio::test]
    async fn shows_no_data_message() {
        let state = must_create_state();

        let response = get_report_page(
            State(ReportState::from_ref(&state)),
            Query(query(ReportKind::ProductList)),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_texts(&html, "[data-no-data]"),
            vec!["No product data available"]
        );
        assert!(select_texts(&html, "table").is_empty());
    }

    #[tokio::test]
    async fn invalid_custom_period_shows_error() {
        let state = seeded_state();
        let query = ReportQuery {
            kind: ReportKind::RecentTransactions,
            period: PeriodKind::Custom,
            start: "2025-03-31".to_owned(),
            end: "2025-03-01".to_owned(),
        };

        let response = get_report_page(State(ReportState::from_ref(&state)), Query(query))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_eq!(
            select_texts(&html, "#report-content p"),
            vec!["Error: invalid report period: the start date must not be after the end date"]
        );
    }

    #[tokio::test]
    async fn filter_form_replaces_older_requests() {
        let state = must_create_state();

        let response = get_report_page(
            State(ReportState::from_ref(&state)),
            Query(query(ReportKind::CustomerList)),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        let form = html
            .select(&scraper::Selector::parse("#report-filter").unwrap())
            .next()
            .expect("No filter form found");
        assert_eq!(form.value().attr("hx-sync"), Some("this:replace"));
        assert_eq!(form.value().attr("hx-get"), Some("/reports"));
    }

    #[tokio::test]
    async fn print_page_is_standalone_document() {
        let state = seeded_state();

        let response = get_report_print_page(
            State(ReportState::from_ref(&state)),
            Query(query(ReportKind::ProductPurchases)),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, "h2"), vec!["Product Purchases"]);
        assert_eq!(select_texts(&html, "nav"), Vec::<String>::new());
    }

    #[tokio::test]
    async fn print_page_rejects_invalid_period() {
        let state = seeded_state();
        let query = ReportQuery {
            period: PeriodKind::Custom,
            ..Default::default()
        };

        let result =
            get_report_print_page(State(ReportState::from_ref(&state)), Query(query)).await;

        let Err(error) = result else {
            panic!("want a validation error for a custom period without dates");
        };
        assert_eq!(error.into_response().status(), StatusCode::UNPROCESSABLE_ENTITY);
    }

    #[tokio::test]
    async fn spreadsheet_is_attachment() {
        let state = seeded_state();

        let response = get_report_spreadsheet(
            State(ReportState::from_ref(&state)),
            Query(query(ReportKind::RecentTransactions)),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        assert_content_type(
            &response,
            "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet",
        );
        let disposition = get_header(&response, "content-disposition");
        assert!(
            disposition.starts_with("attachment; filename=\"TZ-Scraps-Report-"),
            "got {disposition}"
        );
        assert!(disposition.ends_with("-Kind-3.xlsx\""), "got {disposition}");
    }

    #[tokio::test]
    async fn document_is_pdf_attachment() {
        let state = seeded_state();

        let response = get_report_document(
            State(ReportState::from_ref(&state)),
            Query(query(ReportKind::CustomerList)),
        )
        .await
        .unwrap();

        assert_content_type(&response, "application/pdf");
        assert!(get_header(&response, "content-disposition").ends_with("-Kind-4.pdf\""));

        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        assert!(body.starts_with(b"%PDF"));
    }
}
