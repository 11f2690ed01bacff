//! Application router configuration.

use axum::{
    Router,
    response::Redirect,
    routing::{delete, get, post, put},
};
use tower_http::services::ServeDir;

use crate::{
    AppState,
    customer::{
        create_customer_endpoint, delete_customer_endpoint, get_customers_page,
        get_edit_customer_page, get_new_customer_page, update_customer_endpoint,
    },
    endpoints,
    internal_server_error::get_internal_server_error_page,
    not_found::get_404_not_found,
    product::{
        create_product_endpoint, delete_product_endpoint, get_edit_product_page,
        get_new_product_page, get_products_page, update_product_endpoint,
    },
    report::{get_report_document, get_report_page, get_report_print_page, get_report_spreadsheet},
    sheet::{
        append_transaction_endpoint, delete_transaction_endpoint, get_receipt_page,
        get_sheet_page,
    },
};

/// Return a router with all the app's routes.
pub fn build_router(state: AppState) -> Router {
    let pages = Router::new()
        .route(endpoints::ROOT, get(get_index_page))
        .route(endpoints::CUSTOMERS_VIEW, get(get_customers_page))
        .route(endpoints::NEW_CUSTOMER_VIEW, get(get_new_customer_page))
        .route(endpoints::EDIT_CUSTOMER_VIEW, get(get_edit_customer_page))
        .route(endpoints::CUSTOMER_SHEET_VIEW, get(get_sheet_page))
        .route(endpoints::CUSTOMER_RECEIPT_VIEW, get(get_receipt_page))
        .route(endpoints::PRODUCTS_VIEW, get(get_products_page))
        .route(endpoints::NEW_PRODUCT_VIEW, get(get_new_product_page))
        .route(endpoints::EDIT_PRODUCT_VIEW, get(get_edit_product_page))
        .route(endpoints::REPORTS_VIEW, get(get_report_page))
        .route(endpoints::REPORT_PRINT_VIEW, get(get_report_print_page))
        .route(endpoints::REPORT_SPREADSHEET, get(get_report_spreadsheet))
        .route(endpoints::REPORT_DOCUMENT, get(get_report_document))
        .route(
            endpoints::INTERNAL_ERROR_VIEW,
            get(get_internal_server_error_page),
        );

    let api = Router::new()
        .route(endpoints::POST_CUSTOMER, post(create_customer_endpoint))
        .route(
            endpoints::PUT_CUSTOMER,
            put(update_customer_endpoint).delete(delete_customer_endpoint),
        )
        .route(
            endpoints::POST_CUSTOMER_TRANSACTION,
            post(append_transaction_endpoint),
        )
        .route(
            endpoints::DELETE_TRANSACTION,
            delete(delete_transaction_endpoint),
        )
        .route(endpoints::POST_PRODUCT, post(create_product_endpoint))
        .route(
            endpoints::PUT_PRODUCT,
            put(update_product_endpoint).delete(delete_product_endpoint),
        );

    pages
        .merge(api)
        .nest_service(endpoints::STATIC, ServeDir::new("static/"))
        .fallback(get_404_not_found)
        .with_state(state)
}

/// The root path '/' redirects to the customers page.
async fn get_index_page() -> Redirect {
    Redirect::to(endpoints::CUSTOMERS_VIEW)
}
