//! Product deletion endpoint.

use axum::{
    extract::{FromRef, Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    confirmation::{
        CONFIRM_CONTAINER_ID, ConfirmTarget, Confirmation, ConfirmationQuery, confirmation_prompt,
    },
    database_id::ProductId,
    endpoints,
    stores::{ProductStore, sqlite::SQLiteProductStore},
};

/// The state needed for deleting a product.
#[derive(Debug, Clone)]
pub struct DeleteProductEndpointState {
    pub product_store: SQLiteProductStore,
}

impl FromRef<AppState> for DeleteProductEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            product_store: state.product_store.clone(),
        }
    }
}

/// Handle product deletion, asking for confirmation first.
///
/// Products with recorded transactions are kept and an alert explains why.
pub async fn delete_product_endpoint(
    Path(product_id): Path<ProductId>,
    State(state): State<DeleteProductEndpointState>,
    Query(query): Query<ConfirmationQuery>,
) -> Response {
    match Confirmation::from(query) {
        Confirmation::Cancelled => StatusCode::OK.into_response(),
        Confirmation::Pending => {
            let product = match state.product_store.get(product_id) {
                Ok(product) => product,
                Err(Error::NotFound) => return Error::DeleteMissingProduct.into_alert_response(),
                Err(error) => {
                    tracing::error!("Failed to retrieve product {product_id}: {error}");
                    return error.into_alert_response();
                }
            };
            let delete_url = endpoints::format_endpoint(endpoints::DELETE_PRODUCT, product_id);
            let container = format!("#{CONFIRM_CONTAINER_ID}");

            confirmation_prompt(
                &format!(
                    "Are you sure you want to delete '{}' ({})?",
                    product.name, product.serial
                ),
                &delete_url,
                ConfirmTarget {
                    selector: &container,
                    swap: "innerHTML",
                },
            )
            .into_response()
        }
        Confirmation::Confirmed => match state.product_store.delete(product_id) {
            Ok(()) => (
                HxRedirect(endpoints::PRODUCTS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response(),
            Err(error @ (Error::DeleteMissingProduct | Error::ProductInUse)) => {
                error.into_alert_response()
            }
            Err(error) => {
                tracing::error!(
                    "An unexpected error occurred while deleting product {product_id}: {error}"
                );
                error.into_alert_response()
            }
        },
    }
}
