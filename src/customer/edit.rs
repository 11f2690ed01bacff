//! Customer editing page and endpoint.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    customer::{
        CustomerForm, ValidatedCustomer,
        form::{FormAction, customer_form_page, customer_form_view},
    },
    database_id::CustomerId,
    endpoints,
    stores::{CustomerStore, sqlite::SQLiteCustomerStore},
};

/// The state needed for the edit customer page and endpoint.
#[derive(Debug, Clone)]
pub struct EditCustomerState {
    pub customer_store: SQLiteCustomerStore,
}

impl FromRef<AppState> for EditCustomerState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            customer_store: state.customer_store.clone(),
        }
    }
}

/// Render the customer editing page.
pub async fn get_edit_customer_page(
    Path(customer_id): Path<CustomerId>,
    State(state): State<EditCustomerState>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CUSTOMER, customer_id);
    let action = FormAction::Update {
        endpoint: &update_endpoint,
    };

    let form = match state.customer_store.get(customer_id) {
        Ok(customer) => customer_form_view(
            &action,
            &customer.name,
            customer.phone.as_deref().unwrap_or_default(),
            "",
        ),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Customer not found",
                _ => {
                    tracing::error!("Failed to retrieve customer {customer_id}: {error}");
                    "Failed to load customer"
                }
            };

            customer_form_view(&action, "", "", error_message)
        }
    };

    customer_form_page("Edit Customer", form).into_response()
}

/// Handle customer update form submission.
pub async fn update_customer_endpoint(
    Path(customer_id): Path<CustomerId>,
    State(state): State<EditCustomerState>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_CUSTOMER, customer_id);

    let changes = match ValidatedCustomer::try_from(&form) {
        Ok(changes) => changes,
        Err(error) => {
            return customer_form_view(
                &FormAction::Update {
                    endpoint: &update_endpoint,
                },
                &form.name,
                &form.phone,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match state.customer_store.update(customer_id, &changes) {
        Ok(_) => (
            HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingCustomer) => Error::UpdateMissingCustomer.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating customer {customer_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
