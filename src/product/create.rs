//! Product creation page and endpoint.

use axum::{
    extract::{FromRef, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;
use time::OffsetDateTime;

use crate::{
    AppState, Error, endpoints,
    product::{
        Product, ProductForm, SerialNumber, ValidatedProduct,
        form::{FormAction, product_form_page, product_form_view},
    },
    stores::{ProductStore, sqlite::SQLiteProductStore},
};

/// How many serial numbers to try before giving up on a clash.
const SERIAL_ATTEMPTS: usize = 3;

/// The state needed for creating a product.
#[derive(Debug, Clone)]
pub struct CreateProductEndpointState {
    pub product_store: SQLiteProductStore,
}

impl FromRef<AppState> for CreateProductEndpointState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            product_store: state.product_store.clone(),
        }
    }
}

/// Render the product creation page.
pub async fn get_new_product_page() -> Response {
    product_form_page(
        "Create Product",
        product_form_view(&FormAction::Create, "", "", ""),
    )
    .into_response()
}

/// Handle product creation form submission.
///
/// The serial number is generated here, a clash with an existing serial gets
/// a fresh one.
pub async fn create_product_endpoint(
    State(state): State<CreateProductEndpointState>,
    Form(form): Form<ProductForm>,
) -> Response {
    let product = match ValidatedProduct::try_from(&form) {
        Ok(product) => product,
        Err(error) => {
            return product_form_view(
                &FormAction::Create,
                &form.name,
                &form.description,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match insert_with_new_serial(&state.product_store, &product) {
        Ok(_) => (
            HxRedirect(endpoints::PRODUCTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(error) => {
            tracing::error!("An unexpected error occurred while creating a product: {error}");
            error.into_alert_response()
        }
    }
}

fn insert_with_new_serial(
    store: &impl ProductStore,
    product: &ValidatedProduct,
) -> Result<Product, Error> {
    let mut rng = rand::thread_rng();
    let mut result = Err(Error::DuplicateSerialNumber);

    for _ in 0..SERIAL_ATTEMPTS {
        let created_at = OffsetDateTime::now_utc();
        let serial = SerialNumber::generate(created_at, &mut rng);

        result = store.insert(&serial, product, created_at);

        if result != Err(Error::DuplicateSerialNumber) {
            break;
        }

        tracing::warn!("generated serial number {serial} already exists, trying another");
    }

    result
}
