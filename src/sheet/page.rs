//! The transaction sheet page and the endpoints that add and remove its transactions.

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use maud::{Markup, PreEscaped, html};
use time::OffsetDateTime;

use crate::{
    AppState, Error,
    config::BusinessConfig,
    confirmation::{
        ConfirmTarget, Confirmation, ConfirmationQuery, clear_confirm_container,
        confirmation_prompt,
    },
    database_id::{CustomerId, TransactionId},
    endpoints,
    html::{
        BUTTON_DELETE_STYLE, BUTTON_PRIMARY_STYLE, BUTTON_SECONDARY_STYLE, CARD_STYLE,
        FORM_LABEL_STYLE, FORM_TEXT_INPUT_STYLE, HeadElement, PAGE_CONTAINER_STYLE,
        TABLE_CELL_STYLE, TABLE_HEADER_STYLE, TABLE_ROW_STYLE, base, currency_input_styles,
        format_currency, link,
    },
    navigation::NavBar,
    product::Product,
    report::format_date_time,
    sheet::{TransactionSheet, format_item_count},
    stores::{
        CustomerStore, ProductStore, TransactionStore,
        sqlite::{SQLiteCustomerStore, SQLiteProductStore, SQLiteTransactionStore},
    },
    timezone::get_local_offset,
    transaction::{NewTransaction, TransactionForm, TransactionRecord, Unit},
};

/// The id of the element holding the sheet's totals and table.
const SHEET_ID: &str = "transaction-sheet";

/// The state needed for the transaction sheet and its endpoints.
#[derive(Debug, Clone)]
pub struct SheetState {
    pub customer_store: SQLiteCustomerStore,
    pub product_store: SQLiteProductStore,
    pub transaction_store: SQLiteTransactionStore,
    pub business: BusinessConfig,
    /// The local timezone as a canonical timezone name, e.g. "Africa/Lagos".
    pub local_timezone: String,
}

impl FromRef<AppState> for SheetState {
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

impl SheetState {
    fn load_sheet(&self, customer_id: CustomerId) -> Result<TransactionSheet, Error> {
        let customer = self.customer_store.get(customer_id)?;

        TransactionSheet::load(customer, &self.transaction_store)
            .inspect_err(|error| tracing::error!("could not load sheet for {customer_id}: {error}"))
    }

    fn sheet_view(&self, sheet: &TransactionSheet) -> Result<Markup, Error> {
        let local_offset = get_local_offset(&self.local_timezone).ok_or_else(|| {
            tracing::error!("Invalid timezone {}", self.local_timezone);
            Error::InvalidTimezoneError(self.local_timezone.clone())
        })?;

        Ok(sheet_view(sheet, &self.business.currency_symbol, local_offset))
    }
}

/// Render the transaction sheet for a customer.
pub async fn get_sheet_page(
    Path(customer_id): Path<CustomerId>,
    State(state): State<SheetState>,
) -> Result<Response, Error> {
    let sheet = state.load_sheet(customer_id)?;
    let products = state
        .product_store
        .list()
        .inspect_err(|error| tracing::error!("could not list products: {error}"))?;
    let sheet_markup = state.sheet_view(&sheet)?;

    Ok(sheet_page_view(&sheet, &products, sheet_markup, &state.business).into_response())
}

/// Add a transaction to a customer's sheet and return the updated sheet.
pub async fn append_transaction_endpoint(
    Path(customer_id): Path<CustomerId>,
    State(state): State<SheetState>,
    Form(form): Form<TransactionForm>,
) -> Response {
    let transaction = match NewTransaction::parse(customer_id, &form) {
        Ok(transaction) => transaction,
        Err(error) => return Error::from(error).into_alert_response(),
    };

    let mut sheet = match state.load_sheet(customer_id) {
        Ok(sheet) => sheet,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = sheet.append(
        &state.transaction_store,
        &transaction,
        OffsetDateTime::now_utc(),
    ) {
        tracing::error!("could not add transaction for customer {customer_id}: {error}");
        return error.into_alert_response();
    }

    match state.sheet_view(&sheet) {
        Ok(markup) => markup.into_response(),
        Err(error) => error.into_alert_response(),
    }
}

/// Remove a transaction from its customer's sheet.
///
/// Without a decision this returns a confirmation prompt. Cancelling clears
/// the prompt and confirming returns the updated sheet.
pub async fn delete_transaction_endpoint(
    Path(transaction_id): Path<TransactionId>,
    State(state): State<SheetState>,
    Query(query): Query<ConfirmationQuery>,
) -> Response {
    let confirmation = Confirmation::from(query);

    if confirmation == Confirmation::Cancelled {
        return StatusCode::OK.into_response();
    }

    let record = match state.transaction_store.get(transaction_id) {
        Ok(record) => record,
        Err(Error::NotFound) => return Error::DeleteMissingTransaction.into_alert_response(),
        Err(error) => {
            tracing::error!("could not get transaction {transaction_id}: {error}");
            return error.into_alert_response();
        }
    };

    let Some(customer_id) = record.customer.as_ref().map(|customer| customer.id) else {
        return Error::DeleteMissingTransaction.into_alert_response();
    };

    if confirmation == Confirmation::Pending {
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction_id);
        let target = format!("#{SHEET_ID}");

        return confirmation_prompt(
            &delete_prompt_message(&record),
            &delete_url,
            ConfirmTarget {
                selector: &target,
                swap: "outerHTML",
            },
        )
        .into_response();
    }

    let mut sheet = match state.load_sheet(customer_id) {
        Ok(sheet) => sheet,
        Err(error) => return error.into_alert_response(),
    };

    if let Err(error) = sheet.remove(&state.transaction_store, transaction_id, confirmation) {
        tracing::error!("could not delete transaction {transaction_id}: {error}");
        return error.into_alert_response();
    }

    match state.sheet_view(&sheet) {
        Ok(markup) => html!((markup) (clear_confirm_container())).into_response(),
        Err(error) => error.into_alert_response(),
    }
}

fn delete_prompt_message(record: &TransactionRecord) -> String {
    let product = record
        .product
        .as_ref()
        .map(|product| product.name.as_str())
        .unwrap_or("Unknown");
    let quantity = format_item_count(record.quantity.unwrap_or(0.0));

    format!(
        "Remove {quantity} {} of {product} from this sheet? This cannot be undone.",
        record.unit
    )
}

fn sheet_page_view(
    sheet: &TransactionSheet,
    products: &[Product],
    sheet_markup: Markup,
    business: &BusinessConfig,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();
    let customer = sheet.customer();
    let head_elements = [
        currency_input_styles(&business.currency_symbol),
        HeadElement::ScriptSource(PreEscaped(include_str!("total_preview.js").to_owned())),
    ];

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            div class="w-full lg:max-w-5xl space-y-6"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    div
                    {
                        h1 class="text-xl font-bold" { (customer.name) }
                        p class="text-sm text-gray-600 dark:text-gray-400"
                        {
                            (customer.phone.as_deref().unwrap_or("No phone"))
                        }
                    }

                    (link(endpoints::CUSTOMERS_VIEW, "Back to customers"))
                }

                (add_transaction_form(customer.id, products, &business.currency_symbol))

                (sheet_markup)
            }
        }
    );

    base(&customer.name, &head_elements, &content)
}

fn add_transaction_form(
    customer_id: CustomerId,
    products: &[Product],
    currency_symbol: &str,
) -> Markup {
    if products.is_empty() {
        return html!(
            p class="text-gray-600 dark:text-gray-400"
            {
                "There are no products yet. "
                (link(endpoints::NEW_PRODUCT_VIEW, "Create a product"))
                " to start recording transactions."
            }
        );
    }

    let endpoint = endpoints::format_endpoint(endpoints::POST_CUSTOMER_TRANSACTION, customer_id);

    html!(
        form
            id="add-transaction-form"
            hx-post=(endpoint)
            hx-target={ "#" (SHEET_ID) }
            hx-swap="outerHTML"
            hx-target-error="#alert-container"
            class=(CARD_STYLE)
        {
            h2 class="mb-4 text-lg font-semibold" { "Add Transaction" }

            div class="grid gap-4 sm:grid-cols-2 lg:grid-cols-4"
            {
                div
                {
                    label for="product_id" class=(FORM_LABEL_STYLE) { "Product" }

                    select id="product_id" name="product_id" required class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for product in products {
                            option value=(product.id) { (product.name) " (" (product.serial) ")" }
                        }
                    }
                }

                div
                {
                    label for="quantity" class=(FORM_LABEL_STYLE) { "Quantity" }

                    input
                        id="quantity"
                        type="number"
                        name="quantity"
                        value="1"
                        min="0"
                        step="any"
                        required
                        class=(FORM_TEXT_INPUT_STYLE);
                }

                div
                {
                    label for="price" class=(FORM_LABEL_STYLE) { "Price per unit" }

                    div class="input-wrapper"
                    {
                        input
                            id="price"
                            type="number"
                            name="price"
                            min="0"
                            step="any"
                            placeholder="0.00"
                            required
                            class=(FORM_TEXT_INPUT_STYLE);
                    }
                }

                div
                {
                    label for="unit" class=(FORM_LABEL_STYLE) { "Unit" }

                    select id="unit" name="unit" class=(FORM_TEXT_INPUT_STYLE)
                    {
                        @for unit in Unit::ALL {
                            option value=(unit.code()) selected[unit == Unit::default()]
                            {
                                (unit.label())
                            }
                        }
                    }
                }
            }

            div class="mt-4 flex flex-wrap items-center justify-between gap-4"
            {
                p class="text-sm"
                {
                    "Total: "
                    output
                        id="total-preview"
                        data-currency-symbol=(currency_symbol)
                        class="font-semibold tabular-nums"
                    {
                        (format_currency(currency_symbol, 0.0))
                    }
                }

                div class="w-full sm:w-48"
                {
                    button type="submit" class=(BUTTON_PRIMARY_STYLE) { "Add" }
                }
            }
        }
    )
}

fn sheet_view(
    sheet: &TransactionSheet,
    currency_symbol: &str,
    local_offset: time::UtcOffset,
) -> Markup {
    let receipt_url =
        endpoints::format_endpoint(endpoints::CUSTOMER_RECEIPT_VIEW, sheet.customer().id);

    html!(
        section id=(SHEET_ID) class="space-y-4"
        {
            div class="grid grid-cols-2 gap-4"
            {
                div class=(CARD_STYLE)
                {
                    h3 class="text-xs text-gray-500 dark:text-gray-400" { "Total Items" }
                    p class="text-lg font-semibold tabular-nums" data-total="items"
                    {
                        (format_item_count(sheet.total_item_count()))
                    }
                }

                div class=(CARD_STYLE)
                {
                    h3 class="text-xs text-gray-500 dark:text-gray-400" { "Total Amount" }
                    p class="text-lg font-semibold tabular-nums" data-total="amount"
                    {
                        (format_currency(currency_symbol, sheet.total_amount()))
                    }
                }
            }

            div class="flex justify-end"
            {
                div class="w-full sm:w-48"
                {
                    @if sheet.is_empty() {
                        button
                            type="button"
                            hx-get=(receipt_url)
                            hx-target="#alert-container"
                            hx-target-error="#alert-container"
                            class=(BUTTON_SECONDARY_STYLE)
                        {
                            "Print Receipt"
                        }
                    } @else {
                        a
                            href=(receipt_url)
                            target="_blank"
                            class={ "block text-center " (BUTTON_SECONDARY_STYLE) }
                        {
                            "Print Receipt"
                        }
                    }
                }
            }

            div class="overflow-x-auto dark:bg-gray-800"
            {
                table class="w-full text-sm text-left rtl:text-right text-gray-500 dark:text-gray-400"
                {
                    thead class=(TABLE_HEADER_STYLE)
                    {
                        tr
                        {
                            @for header in ["Date", "Product", "Quantity", "Price", "Amount", "Actions"] {
                                th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                            }
                        }
                    }

                    tbody
                    {
                        @for transaction in sheet.transactions() {
                            (transaction_row(transaction, currency_symbol, local_offset))
                        }

                        @if sheet.is_empty() {
                            tr
                            {
                                td
                                    colspan="6"
                                    class="px-6 py-4 text-center text-gray-500 dark:text-gray-400"
                                {
                                    "No transactions yet."
                                }
                            }
                        }
                    }
                }
            }
        }
    )
}

fn transaction_row(
    transaction: &TransactionRecord,
    currency_symbol: &str,
    local_offset: time::UtcOffset,
) -> Markup {
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_TRANSACTION, transaction.id);
    let product = transaction.product.as_ref();
    let money = |amount: Option<f64>| format_currency(currency_symbol, amount.unwrap_or(0.0));

    html!(
        tr class=(TABLE_ROW_STYLE) data-transaction-id=(transaction.id)
        {
            td class=(TABLE_CELL_STYLE)
            {
                (format_date_time(transaction.created_at.to_offset(local_offset)))
            }
            td class=(TABLE_CELL_STYLE)
            {
                (product.map(|product| product.name.as_str()).unwrap_or("Unknown"))
                @if let Some(product) = product {
                    br;
                    span class="text-xs" { (product.serial) }
                }
            }
            td class=(TABLE_CELL_STYLE)
            {
                (format_item_count(transaction.quantity.unwrap_or(0.0)))
                " "
                (transaction.unit_label())
            }
            td class=(TABLE_CELL_STYLE) { (money(transaction.price)) }
            td class=(TABLE_CELL_STYLE) { (money(transaction.total_amount)) }
            td class=(TABLE_CELL_STYLE)
            {
                button
                    type="button"
                    hx-delete=(delete_url)
                    hx-target="#confirm-container"
                    hx-target-error="#alert-container"
                    class=(BUTTON_DELETE_STYLE)
                {
                    "Delete"
                }
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::{
        extract::{FromRef, Path, Query, State},
        http::StatusCode,
    };
    use axum_extra::extract::Form;

    use crate::{
        AppState,
        confirmation::{ConfirmationQuery, Decision},
        endpoints,
        stores::{TransactionQuery, TransactionStore},
        test_utils::{
            assert_hx_endpoint, assert_status_ok, assert_valid_html, must_add_customer,
            must_add_product, must_add_transaction, must_create_state, must_get_form,
            parse_html_document, parse_html_fragment, select_texts,
        },
        transaction::TransactionForm,
    };

    use super::{
        SheetState, append_transaction_endpoint, delete_transaction_endpoint, get_sheet_page,
    };

    fn sheet_state(state: &AppState) -> State<SheetState> {
        State(SheetState::from_ref(state))
    }

    fn decision(decision: Option<Decision>) -> Query<ConfirmationQuery> {
        Query(ConfirmationQuery { decision })
    }

    #[tokio::test]
    async fn renders_sheet_with_totals() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "08012345678");
        let copper = must_add_product(&state, "Copper", "");
        must_add_transaction(&state, ada.id, copper.id, 10.0, 100.0);
        must_add_transaction(&state, ada.id, copper.id, 2.5, 100.0);

        let response = get_sheet_page(Path(ada.id), sheet_state(&state))
            .await
            .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, "h1"), vec!["Ada"]);
        assert_eq!(select_texts(&html, "[data-total='items']"), vec!["12.50"]);
        assert_eq!(select_texts(&html, "[data-total='amount']"), vec!["₦1,250.00"]);
        assert_eq!(select_texts(&html, "tr[data-transaction-id]").len(), 2);

        let form = must_get_form(&html);
        assert_hx_endpoint(
            &form,
            &endpoints::format_endpoint(endpoints::POST_CUSTOMER_TRANSACTION, ada.id),
            "hx-post",
        );
        let quantity = html
            .select(&scraper::Selector::parse("input[name='quantity']").unwrap())
            .next()
            .expect("No quantity input");
        assert_eq!(quantity.value().attr("value"), Some("1"));
        assert_eq!(
            select_texts(&html, "select[name='unit'] option[selected]"),
            vec!["Kilogram"]
        );
    }

    #[tokio::test]
    async fn missing_customer_is_not_found() {
        let state = must_create_state();

        let result = get_sheet_page(Path(42), sheet_state(&state)).await;

        assert_eq!(result.err(), Some(crate::Error::NotFound));
    }

    #[tokio::test]
    async fn append_returns_updated_sheet() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "");
        let copper = must_add_product(&state, "Copper", "");
        let form = TransactionForm {
            product_id: copper.id,
            quantity: "12".to_owned(),
            price: "50".to_owned(),
            unit: "kg".to_owned(),
        };

        let response = append_transaction_endpoint(Path(ada.id), sheet_state(&state), Form(form))
            .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_valid_html(&html);
        assert_eq!(select_texts(&html, "[data-total='items']"), vec!["12"]);
        assert_eq!(select_texts(&html, "[data-total='amount']"), vec!["₦600.00"]);
    }

    #[tokio::test]
    async fn append_rejects_invalid_quantity_before_storing() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "");
        let copper = must_add_product(&state, "Copper", "");
        let form = TransactionForm {
            product_id: copper.id,
            quantity: "0".to_owned(),
            price: "50".to_owned(),
            unit: "kg".to_owned(),
        };

        let response = append_transaction_endpoint(Path(ada.id), sheet_state(&state), Form(form))
            .await;

        assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
        let stored = state
            .transaction_store
            .list(&TransactionQuery::default())
            .unwrap();
        assert!(stored.is_empty());
    }

    #[tokio::test]
    async fn delete_asks_for_confirmation_first() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "");
        let copper = must_add_product(&state, "Copper", "");
        let transaction = must_add_transaction(&state, ada.id, copper.id, 2.0, 10.0);

        let response =
            delete_transaction_endpoint(Path(transaction.id), sheet_state(&state), decision(None))
                .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_eq!(
            select_texts(&html, "[role='alertdialog'] p"),
            vec!["Remove 2 kg of Copper from this sheet? This cannot be undone."]
        );
        assert!(state.transaction_store.get(transaction.id).is_ok());
    }

    #[tokio::test]
    async fn cancelled_delete_keeps_transaction() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "");
        let copper = must_add_product(&state, "Copper", "");
        let transaction = must_add_transaction(&state, ada.id, copper.id, 2.0, 10.0);

        let response = delete_transaction_endpoint(
            Path(transaction.id),
            sheet_state(&state),
            decision(Some(Decision::Cancel)),
        )
        .await;

        assert_status_ok(&response);
        assert!(state.transaction_store.get(transaction.id).is_ok());
    }

    #[tokio::test]
    async fn confirmed_delete_returns_updated_sheet() {
        let state = must_create_state();
        let ada = must_add_customer(&state, "Ada", "");
        let copper = must_add_product(&state, "Copper", "");
        let kept = must_add_transaction(&state, ada.id, copper.id, 1.0, 10.0);
        let removed = must_add_transaction(&state, ada.id, copper.id, 2.0, 10.0);

        let response = delete_transaction_endpoint(
            Path(removed.id),
            sheet_state(&state),
            decision(Some(Decision::Confirm)),
        )
        .await;

        assert_status_ok(&response);
        let html = parse_html_fragment(response).await;
        assert_eq!(select_texts(&html, "[data-total='amount']"), vec!["₦10.00"]);
        assert_eq!(
            select_texts(&html, "#confirm-container[hx-swap-oob]"),
            vec![""]
        );
        assert!(state.transaction_store.get(kept.id).is_ok());
        assert!(state.transaction_store.get(removed.id).is_err());
    }

    #[tokio::test]
    async fn delete_missing_transaction_is_not_found() {
        let state = must_create_state();

        let response = delete_transaction_endpoint(
            Path(7),
            sheet_state(&state),
            decision(Some(Decision::Confirm)),
        )
        .await;

        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }
}
