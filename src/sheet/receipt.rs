//! The printable receipt for a customer's transaction sheet.

use axum::{
    extract::{Path, State},
    response::{IntoResponse, Response},
};
use maud::{DOCTYPE, Markup, PreEscaped, html};
use time::OffsetDateTime;

use crate::{
    Error,
    config::BusinessConfig,
    database_id::CustomerId,
    html::format_currency,
    report::format_date_time,
    sheet::{SheetState, TransactionSheet, format_item_count},
    stores::CustomerStore,
    timezone::get_local_offset,
};

const RECEIPT_STYLES: &str = r#"
body { font-family: Arial, sans-serif; margin: 20px; color: #111827; }
.header { text-align: center; margin-bottom: 20px; }
.header h1 { margin: 0 0 4px 0; }
.header p { margin: 2px 0; color: #4b5563; }
.details { display: flex; justify-content: space-between; margin-bottom: 20px; }
.details p { margin: 2px 0; }
table { width: 100%; border-collapse: collapse; }
th, td { border: 1px solid #d1d5db; padding: 8px; text-align: left; }
th { background-color: #f3f4f6; }
td.number { text-align: right; }
.total { text-align: right; font-size: 18px; font-weight: bold; margin-top: 16px; }
.footer { text-align: center; margin-top: 30px; color: #6b7280; }
.actions { text-align: center; margin-top: 20px; }
@media print { .actions { display: none; } }
"#;

/// A receipt number built from the last eight digits of the issue time in
/// unix milliseconds, e.g. "TZ-41234567".
pub fn receipt_number(issued_at: OffsetDateTime) -> String {
    let millis = issued_at.unix_timestamp_nanos() / 1_000_000;

    format!("TZ-{:08}", millis.rem_euclid(100_000_000))
}

/// Render a printable receipt for a customer's transaction sheet.
///
/// Refuses with a warning alert when the sheet has no transactions.
pub async fn get_receipt_page(
    Path(customer_id): Path<CustomerId>,
    State(state): State<SheetState>,
) -> Response {
    let Some(local_offset) = get_local_offset(&state.local_timezone) else {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        return Error::InvalidTimezoneError(state.local_timezone).into_alert_response();
    };

    let customer = match state.customer_store.get(customer_id) {
        Ok(customer) => customer,
        Err(Error::NotFound) => return Error::NotFound.into_response(),
        Err(error) => return error.into_alert_response(),
    };

    let sheet = match TransactionSheet::load(customer, &state.transaction_store) {
        Ok(sheet) => sheet,
        Err(error) => {
            tracing::error!("could not load sheet for receipt {customer_id}: {error}");
            return error.into_alert_response();
        }
    };

    if sheet.is_empty() {
        return Error::EmptyReceipt.into_alert_response();
    }

    let issued_at = OffsetDateTime::now_utc().to_offset(local_offset);

    receipt_document(&sheet, &state.business, issued_at).into_response()
}

fn receipt_document(
    sheet: &TransactionSheet,
    business: &BusinessConfig,
    issued_at: OffsetDateTime,
) -> Markup {
    let customer = sheet.customer();
    let currency = business.currency_symbol.as_str();
    let money = |amount: Option<f64>| format_currency(currency, amount.unwrap_or(0.0));

    html! {
        (DOCTYPE)
        html lang="en"
        {
            head
            {
                meta charset="UTF-8";
                title { (business.name) " Receipt - " (customer.name) }
                style { (PreEscaped(RECEIPT_STYLES)) }
            }

            body
            {
                div class="header"
                {
                    h1 { (business.name) }
                    p { "Scrap Collection & Recycling" }
                    p { (business.contact) }
                }

                div class="details"
                {
                    div data-receipt="customer"
                    {
                        p { strong { "Customer: " } (customer.name) }
                        @if let Some(phone) = &customer.phone {
                            p { strong { "Phone: " } (phone) }
                        }
                    }

                    div data-receipt="issued"
                    {
                        p { strong { "Date: " } (format_date_time(issued_at)) }
                        p { strong { "Receipt No: " } span data-receipt-number { (receipt_number(issued_at)) } }
                    }
                }

                table
                {
                    thead
                    {
                        tr
                        {
                            @for header in ["Product", "Serial No", "Price per unit", "Quantity", "Amount"] {
                                th { (header) }
                            }
                        }
                    }

                    tbody
                    {
                        @for transaction in sheet.transactions() {
                            @let product = transaction.product.as_ref();
                            tr
                            {
                                td { (product.map(|product| product.name.as_str()).unwrap_or("Unknown")) }
                                td { (product.map(|product| product.serial.as_str()).unwrap_or("-")) }
                                td class="number" { (money(transaction.price)) }
                                td class="number"
                                {
                                    (format_item_count(transaction.quantity.unwrap_or(0.0)))
                                    " " (transaction.unit)
                                }
                                td class="number" { (money(transaction.total_amount)) }
                            }
                        }
                    }
                }

                p class="total" { "Total: " (format_currency(currency, sheet.total_amount())) }

                div class="footer"
                {
                    p { "Thank you for your business!" }
                    p { (business.name) " - " (business.contact) }
                }

                div class="actions"
                {
                    button type="button" onclick="window.print()" { "Print" }
                }
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Path, State},
        http::StatusCode,
    };
    use time::macros::datetime;

    use crate::{
        sheet::SheetState,
        test_utils::{
            assert_status_ok, assert_valid_html, must_add_customer, must_add_product,
            must_add_transaction, must_create_state, parse_html_document, parse_html_fragment,
            select_texts,
        },
    };

    use super::{get_receipt_page, receipt_number};

    #[test]
    fn receipt_number_uses_last_eight_digits_of_millis() {
        // 1_741_356_300_123 ms since the epoch.
        let issued_at = datetime!(2025-03-07 14:05:00.123 UTC);

        assert_eq!(receipt_number(issued_at), "TZ-56300123");
    }

    #[test]
    fn receipt_number_pads_to_eight_digits() {
        let issued_at = datetime!(1970-01-01 00:00:01 UTC);

        assert_eq!(receipt_number(issued_at), "TZ-00001000");
    }

    #[tokio::test]
    async fn renders_receipt_for_sheet() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "08012345678");
        let copper = must_add_product(&state, "Copper", "");
        must_add_transaction(&state, ada.id, copper.id, 2.0, 150.0);
        must_add_transaction(&state, ada.id, copper.id, 1.5, 100.0);

        let response = get_receipt_page(Path(ada.id), State(SheetState::from_ref(&state))).await;

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, ".header h1"), vec!["TZ Scraps"]);
        assert_eq!(
            select_texts(&html, ".header p"),
            vec!["Scrap Collection & Recycling", "+234 123 456 7890"]
        );
        assert_eq!(
            select_texts(&html, "[data-receipt='customer'] p"),
            vec!["Customer: Ada", "Phone: 08012345678"]
        );
        assert_eq!(select_texts(&html, "tbody tr").len(), 2);
        assert_eq!(
            select_texts(&html, "tbody tr:first-child td"),
            vec!["Copper", copper.serial.as_str(), "₦100.00", "1.50 kg", "₦150.00"]
        );
        assert_eq!(select_texts(&html, ".total"), vec!["Total: ₦450.00"]);
        assert!(select_texts(&html, "[data-receipt-number]")[0].starts_with("TZ-"));
    }

    #[tokio::test]
    async fn empty_sheet_is_refused_with_warning() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "");

        let response = get_receipt_page(Path(ada.id), State(SheetState::from_ref(&state))).await;

        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let html = parse_html_fragment(response).await;
        assert!(
            select_texts(&html, "*")
                .concat()
                .contains("No transactions to print")
        );
    }

    #[tokio::test]
    async fn missing_customer_is_not_found() {
        let state = must_create_state();

        let response = get_receipt_page(Path(9), State(SheetState::from_ref(&state))).await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
