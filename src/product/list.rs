//! Products listing page.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error, endpoints,
    html::{
        CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links, search_input,
    },
    navigation::NavBar,
    product::Product,
    stores::{ProductStore, sqlite::SQLiteProductStore},
};

const LIST_ID: &str = "product-list";

/// The state needed for the products listing page.
#[derive(Debug, Clone)]
pub struct ProductsPageState {
    pub product_store: SQLiteProductStore,
}

impl FromRef<AppState> for ProductsPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            product_store: state.product_store.clone(),
        }
    }
}

/// The query string for the products page, e.g. `?search=copper`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct ProductSearchQuery {
    #[serde(default)]
    pub search: String,
}

/// Render the products listing page.
pub async fn get_products_page(
    State(state): State<ProductsPageState>,
    Query(query): Query<ProductSearchQuery>,
) -> Result<Response, Error> {
    let products = state
        .product_store
        .list()
        .inspect_err(|error| tracing::error!("Failed to retrieve products: {error}"))?;

    let matches = search_products(&products, &query.search);

    Ok(products_view(&matches, &query.search).into_response())
}

/// Keep the products whose name, serial number or description contains
/// `search`, ignoring case.
fn search_products<'a>(products: &'a [Product], search: &str) -> Vec<&'a Product> {
    let search = search.trim().to_lowercase();

    products
        .iter()
        .filter(|product| {
            search.is_empty()
                || product.name.to_lowercase().contains(&search)
                || product.serial.as_str().to_lowercase().contains(&search)
                || product
                    .description
                    .as_deref()
                    .is_some_and(|description| description.to_lowercase().contains(&search))
        })
        .collect()
}

fn products_view(products: &[&Product], search: &str) -> Markup {
    let nav_bar = NavBar::new(endpoints::PRODUCTS_VIEW).into_html();
    let list_target = format!("#{LIST_ID}");
    let empty_message = if search.trim().is_empty() {
        "No products yet."
    } else {
        "No products match your search."
    };

    let table_row = |product: &Product| {
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_PRODUCT_VIEW, product.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_PRODUCT, product.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-product-row
            {
                td class="px-6 py-4 font-mono text-xs" { (product.serial) }
                td class=(TABLE_CELL_STYLE) { (product.name) }
                td class=(TABLE_CELL_STYLE) { (product.description.as_deref().unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE)
                {
                    div class="flex gap-4"
                    {
                        (edit_delete_action_links(&edit_url, &delete_url))
                    }
                }
            }
        )
    };

    let content = html!(
        (nav_bar)

        main class=(PAGE_CONTAINER_STYLE)
        {
            section class="space-y-4 w-full lg:max-w-5xl"
            {
                header class="flex justify-between flex-wrap items-end gap-4"
                {
                    h1 class="text-xl font-bold" { "Products" }

                    a href=(endpoints::NEW_PRODUCT_VIEW) class=(LINK_STYLE) { "Add Product" }
                }

                (search_input(
                    endpoints::PRODUCTS_VIEW,
                    search,
                    "Search by name, serial or description",
                    &list_target,
                ))

                div id=(LIST_ID)
                {
                    ul class="lg:hidden space-y-4"
                    {
                        @for product in products {
                            (product_card(product))
                        }

                        @if products.is_empty() {
                            li class="text-center text-gray-500 dark:text-gray-400" { (empty_message) }
                        }
                    }

                    section class="hidden lg:block dark:bg-gray-800"
                    {
                        table class="w-full text-sm text-left rtl:text-right
                            text-gray-500 dark:text-gray-400"
                        {
                            thead class=(TABLE_HEADER_STYLE)
                            {
                                tr
                                {
                                    @for header in ["Serial No", "Name", "Description", "Actions"] {
                                        th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                                    }
                                }
                            }

                            tbody
                            {
                                @for product in products {
                                    (table_row(product))
                                }

                                @if products.is_empty() {
                                    tr
                                    {
                                        td
                                            colspan="4"
                                            class="px-6 py-4 text-center
                                                text-gray-500 dark:text-gray-400"
                                        {
                                            (empty_message)
                                        }
                                    }
                                }
                            }
                        }
                    }
                }
            }
        }
    );

    base("Products", &[], &content)
}

fn product_card(product: &Product) -> Markup {
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_PRODUCT_VIEW, product.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_PRODUCT, product.id);

    html!(
        li class=(CARD_STYLE) data-product-card
        {
            div class="flex items-start justify-between gap-3"
            {
                span class="font-semibold text-gray-900 dark:text-white" { (product.name) }
                span class="font-mono text-xs text-gray-500 dark:text-gray-400" { (product.serial) }
            }

            @if let Some(description) = &product.description {
                p class="text-sm text-gray-600 dark:text-gray-400" { (description) }
            }

            div class="mt-2 flex items-center gap-4 text-sm"
            {
                (edit_delete_action_links(&edit_url, &delete_url))
            }
        }
    )
}

#[cfg(test)]
mod tests {
    use axum::extract::{FromRef, Query, State};
    use time::macros::datetime;

    use crate::{
        product::{Product, SerialNumber},
        test_utils::{
            assert_status_ok, assert_valid_html, must_add_product, must_create_state,
            parse_html_document, select_texts,
        },
    };

    use super::{ProductSearchQuery, ProductsPageState, get_products_page, search_products};

    fn product(id: i64, serial: &str, name: &str, description: Option<&str>) -> Product {
        Product {
            id,
            serial: SerialNumber::new_unchecked(serial),
            name: name.to_owned(),
            description: description.map(str::to_owned),
            created_at: datetime!(2025-03-07 10:00 UTC),
        }
    }

    #[test]
    fn search_matches_name_serial_and_description() {
        let products = vec![
            product(1, "TZ-1-aaaaaaaaa", "Copper", Some("Stripped wire")),
            product(2, "TZ-2-bbbbbbbbb", "Aluminium", None),
            product(3, "TZ-3-ccccccccc", "Brass", Some("Taps and fittings")),
        ];
        let names = |search: &str| {
            search_products(&products, search)
                .into_iter()
                .map(|product| product.name.as_str())
                .collect::<Vec<_>>()
        };

        assert_eq!(names(""), vec!["Copper", "Aluminium", "Brass"]);
        assert_eq!(names("ALUM"), vec!["Aluminium"]);
        assert_eq!(names("tz-3"), vec!["Brass"]);
        assert_eq!(names("wire"), vec!["Copper"]);
        assert!(names("steel").is_empty());
    }

    #[tokio::test]
    async fn lists_products() {
        let state = must_create_state();
        let copper = must_add_product(&state, "Copper", "Stripped wire");
        must_add_product(&state, "Brass", "");

        let response = get_products_page(
            State(ProductsPageState::from_ref(&state)),
            Query(ProductSearchQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_texts(&html, "tr[data-product-row] td:nth-child(2)"),
            vec!["Brass", "Copper"]
        );
        assert_eq!(
            select_texts(&html, "tr[data-product-row] td:nth-child(1)")[1],
            copper.serial.as_str()
        );
        assert_eq!(select_texts(&html, "li[data-product-card]").len(), 2);
    }

    #[tokio::test]
    async fn search_filters_rows() {
        let state = must_create_state();
        must_add_product(&state, "Copper", "Stripped wire");
        must_add_product(&state, "Brass", "");

        let response = get_products_page(
            State(ProductsPageState::from_ref(&state)),
            Query(ProductSearchQuery {
                search: "wire".to_owned(),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_texts(&html, "tr[data-product-row] td:nth-child(2)"),
            vec!["Copper"]
        );
    }
}
