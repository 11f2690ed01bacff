//! Customer deletion endpoint.

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
    database_id::CustomerId,
    endpoints,
    stores::{CustomerStore, sqlite::SQLiteCustomerStore},
};

/// The state needed for deleting a customer.
#[derive(Debug, Clone)]
pub struct DeleteCustomerEndpointState {
    pub customer_store: SQLiteCustomerStore,
}

impl FromRef<AppState> for DeleteCustomerEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            customer_store: state.customer_store.clone(),
        }
    }
}

/// Handle customer deletion.
///
/// The customer's transactions are deleted with them, so the first request
/// only returns a prompt warning about this.
pub async fn delete_customer_endpoint(
    Path(customer_id): Path<CustomerId>,
    State(state): State<DeleteCustomerEndpointState>,
    Query(query): Query<ConfirmationQuery>,
) -> Response {
    match Confirmation::from(query) {
        Confirmation::Cancelled => StatusCode::OK.into_response(),
        Confirmation::Pending => {
            let customer = match state.customer_store.get(customer_id) {
                Ok(customer) => customer,
                Err(Error::NotFound) => return Error::DeleteMissingCustomer.into_alert_response(),
                Err(error) => {
                    tracing::error!("Failed to retrieve customer {customer_id}: {error}");
                    return error.into_alert_response();
                }
            };
            let delete_url = endpoints::format_endpoint(endpoints::DELETE_CUSTOMER, customer_id);
            let container = format!("#{CONFIRM_CONTAINER_ID}");

            confirmation_prompt(
                &format!(
                    "Are you sure you want to delete '{}'? All of their transactions will be \
                    deleted too.",
                    customer.name
                ),
                &delete_url,
                ConfirmTarget {
                    selector: &container,
                    swap: "innerHTML",
                },
            )
            .into_response()
        }
        Confirmation::Confirmed => match state.customer_store.delete(customer_id) {
            Ok(()) => (
                HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
                StatusCode::SEE_OTHER,
            )
                .into_response(),
            Err(Error::DeleteMissingCustomer) => Error::DeleteMissingCustomer.into_alert_response(),
            Err(error) => {
                tracing::error!(
                    "An unexpected error occurred while deleting customer {customer_id}: {error}"
                );
                error.into_alert_response()
            }
        },
    }
}
