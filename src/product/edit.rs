//! Product editing page and endpoint.

use axum::{
    extract::{FromRef, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use axum_extra::extract::Form;
use axum_htmx::HxRedirect;

use crate::{
    AppState, Error,
    database_id::ProductId,
    endpoints,
    product::{
        ProductForm, ValidatedProduct,
        form::{FormAction, product_form_page, product_form_view},
    },
    stores::{ProductStore, sqlite::SQLiteProductStore},
};

/// The state needed for the edit product page and endpoint.
#[derive(Debug, Clone)]
pub struct EditProductState {
    pub product_store: SQLiteProductStore,
}

impl FromRef<AppState> for EditProductState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            product_store: state.product_store.clone(),
        }
    }
}

/// Render the product editing page.
pub async fn get_edit_product_page(
    Path(product_id): Path<ProductId>,
    State(state): State<EditProductState>,
) -> Response {
    let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PRODUCT, product_id);

    let form = match state.product_store.get(product_id) {
        Ok(product) => product_form_view(
            &FormAction::Update {
                endpoint: &update_endpoint,
                serial: product.serial.as_str(),
            },
            &product.name,
            product.description.as_deref().unwrap_or_default(),
            "",
        ),
        Err(error) => {
            let error_message = match error {
                Error::NotFound => "Product not found",
                _ => {
                    tracing::error!("Failed to retrieve product {product_id}: {error}");
                    "Failed to load product"
                }
            };

            product_form_view(
                &FormAction::Update {
                    endpoint: &update_endpoint,
                    serial: "",
                },
                "",
                "",
                error_message,
            )
        }
    };

    product_form_page("Edit Product", form).into_response()
}

/// Handle product update form submission. The serial number never changes.
pub async fn update_product_endpoint(
    Path(product_id): Path<ProductId>,
    State(state): State<EditProductState>,
    Form(form): Form<ProductForm>,
) -> Response {
    let changes = match ValidatedProduct::try_from(&form) {
        Ok(changes) => changes,
        Err(error) => {
            let update_endpoint = endpoints::format_endpoint(endpoints::PUT_PRODUCT, product_id);
            let serial = state
                .product_store
                .get(product_id)
                .map(|product| product.serial.as_str().to_owned())
                .unwrap_or_default();

            return product_form_view(
                &FormAction::Update {
                    endpoint: &update_endpoint,
                    serial: &serial,
                },
                &form.name,
                &form.description,
                &format!("Error: {error}"),
            )
            .into_response();
        }
    };

    match state.product_store.update(product_id, &changes) {
        Ok(_) => (
            HxRedirect(endpoints::PRODUCTS_VIEW.to_owned()),
            StatusCode::SEE_OTHER,
        )
            .into_response(),
        Err(Error::UpdateMissingProduct) => Error::UpdateMissingProduct.into_alert_response(),
        Err(error) => {
            tracing::error!(
                "An unexpected error occurred while updating product {product_id}: {error}"
            );
            error.into_alert_response()
        }
    }
}
