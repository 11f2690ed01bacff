//! Customer creation page and endpoint.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use time::OffsetDateTime;

use crate::{
    AppState,
    customer::{
        CustomerForm, ValidatedCustomer,
        form::{FormAction, customer_form_page, customer_form_view},
    },
    endpoints,
    stores::{CustomerStore, sqlite::SQLiteCustomerStore},
};

/// The state needed for creating a customer.
#[derive(Debug, Clone)]
pub struct CreateCustomerEndpointState {
    pub customer_store: SQLiteCustomerStore,
}

impl FromRef<AppState> for CreateCustomerEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            customer_store: state.customer_store.clone(),
        }
    }
}

/// Render the customer creation page.
pub async fn get_new_customer_page() -> Response {
    customer_form_page(
        "Create Customer",
        customer_form_view(&FormAction::Create, "", "", ""),
    )
    .into_response()
}

/// Handle customer creation form submission.
pub async fn create_customer_endpoint(
    State(state): State<CreateCustomerEndpointState>,
    Form(form): Form<CustomerForm>,
) -> Response {
    let customer = match ValidatedCustomer::try_from(&form) {
        Ok(customer) => customer,
        Err(error) => {
            return customer_form_view(
                &FormAction::Create,
                &form.name,
                &form.phone,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match state
        .customer_store
        .insert(&customer, OffsetDateTime::now_utc())
    {
        Ok(_) => (
            HxRedirect(endpoints::CUSTOMERS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a customer: {error}");
            error.into_alert_response()
        }
    }
}
