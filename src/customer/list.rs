//! Customers listing page.

use axum::{
    extract::{FromRef, Query, State},
    response::{IntoResponse, Response},
};
use maud::{Markup, html};
use serde::{Deserialize, Serialize};

use crate::{
    AppState, Error,
    customer::Customer,
    endpoints,
    html::{
        CARD_STYLE, LINK_STYLE, PAGE_CONTAINER_STYLE, TABLE_CELL_STYLE, TABLE_HEADER_STYLE,
        TABLE_ROW_STYLE, base, edit_delete_action_links, search_input,
    },
    navigation::NavBar,
    report::format_date,
    stores::{CustomerStore, sqlite::SQLiteCustomerStore},
    timezone::get_local_offset,
};

const LIST_ID: &str = "customer-list";

/// The state needed for the customers listing page.
#[derive(Debug, Clone)]
pub struct CustomersPageState {
    pub customer_store: SQLiteCustomerStore,
    pub local_timezone: String,
}

impl FromRef<AppState> for CustomersPageState {
    fn from_ref(state: &AppState) -> Self {
        Self {
            customer_store: state.customer_store.clone(),
            local_timezone: state.local_timezone.clone(),
        }
    }
}

/// The query string for the customers page, e.g. `?search=ada`.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
pub struct CustomerSearchQuery {
    #[serde(default)]
    pub search: String,
}

/// A customer with its 1-based position in the full, newest first, list.
#[derive(Debug, Clone, PartialEq)]
struct NumberedCustomer<'a> {
    sn: usize,
    customer: &'a Customer,
}

/// Render the customers listing page.
pub async fn get_customers_page(
    State(state): State<CustomersPageState>,
    Query(query): Query<CustomerSearchQuery>,
) -> Result<Response, Error> {
    let local_offset = get_local_offset(&state.local_timezone).ok_or_else(|| {
        tracing::error!("Invalid timezone {}", state.local_timezone);
        Error::InvalidTimezoneError(state.local_timezone.clone())
    })?;

    let customers = state
        .customer_store
        .list()
        .inspect_err(|error| tracing::error!("Failed to retrieve customers: {error}"))?;

    let matches = search_customers(&customers, &query.search);

    Ok(customers_view(&matches, &query.search, local_offset).into_response())
}

/// Keep the customers whose name (ignoring case), phone or SN contains `search`.
///
/// SNs are assigned before filtering so a customer keeps their number while searching.
fn search_customers<'a>(customers: &'a [Customer], search: &str) -> Vec<NumberedCustomer<'a>> {
    let search = search.trim();
    let lowercase_search = search.to_lowercase();

    customers
        .iter()
        .enumerate()
        .map(|(index, customer)| NumberedCustomer {
            sn: index + 1,
            customer,
        })
        .filter(|numbered| {
            search.is_empty()
                || numbered
                    .customer
                    .name
                    .to_lowercase()
                    .contains(&lowercase_search)
                || numbered
                    .customer
                    .phone
                    .as_deref()
                    .is_some_and(|phone| phone.contains(search))
                || numbered.sn.to_string().contains(search)
        })
        .collect()
}

fn customers_view(
    customers: &[NumberedCustomer<'_>],
    search: &str,
    local_offset: time::UtcOffset,
) -> Markup {
    let nav_bar = NavBar::new(endpoints::CUSTOMERS_VIEW).into_html();
    let list_target = format!("#{LIST_ID}");
    let empty_message = if search.trim().is_empty() {
        "No customers yet."
    } else {
        "No customers match your search."
    };

    let table_row = |numbered: &NumberedCustomer<'_>| {
        let customer = numbered.customer;
        let sheet_url = endpoints::format_endpoint(endpoints::CUSTOMER_SHEET_VIEW, customer.id);
        let edit_url = endpoints::format_endpoint(endpoints::EDIT_CUSTOMER_VIEW, customer.id);
        let delete_url = endpoints::format_endpoint(endpoints::DELETE_CUSTOMER, customer.id);

        html!(
            tr class=(TABLE_ROW_STYLE) data-customer-row
            {
                td class=(TABLE_CELL_STYLE) { (numbered.sn) }
                td class=(TABLE_CELL_STYLE)
                {
                    a href=(sheet_url) class=(LINK_STYLE) { (customer.name) }
                }
                td class=(TABLE_CELL_STYLE) { (customer.phone.as_deref().unwrap_or("-")) }
                td class=(TABLE_CELL_STYLE)
                {
                    (format_date(customer.created_at.to_offset(local_offset)))
                }
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
                    h1 class="text-xl font-bold" { "Customers" }

                    a href=(endpoints::NEW_CUSTOMER_VIEW) class=(LINK_STYLE) { "Add Customer" }
                }

                (search_input(
                    endpoints::CUSTOMERS_VIEW,
                    search,
                    "Search by name, phone or SN",
                    &list_target,
                ))

                div id=(LIST_ID)
                {
                    ul class="lg:hidden space-y-4"
                    {
                        @for numbered in customers {
                            (customer_card(numbered))
                        }

                        @if customers.is_empty() {
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
                                    @for header in ["SN", "Name", "Phone", "Added", "Actions"] {
                                        th scope="col" class=(TABLE_CELL_STYLE) { (header) }
                                    }
                                }
                            }

                            tbody
                            {
                                @for numbered in customers {
                                    (table_row(numbered))
                                }

                                @if customers.is_empty() {
                                    tr
                                    {
                                        td
                                            colspan="5"
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

    base("Customers", &[], &content)
}

fn customer_card(numbered: &NumberedCustomer<'_>) -> Markup {
    let customer = numbered.customer;
    let sheet_url = endpoints::format_endpoint(endpoints::CUSTOMER_SHEET_VIEW, customer.id);
    let edit_url = endpoints::format_endpoint(endpoints::EDIT_CUSTOMER_VIEW, customer.id);
    let delete_url = endpoints::format_endpoint(endpoints::DELETE_CUSTOMER, customer.id);

    html!(
        li class=(CARD_STYLE) data-customer-card
        {
            div class="flex items-start justify-between gap-3"
            {
                a href=(sheet_url) class=(LINK_STYLE) { (customer.name) }
                span class="text-xs tabular-nums text-gray-500 dark:text-gray-400"
                {
                    "SN " (numbered.sn)
                }
            }

            @if let Some(phone) = &customer.phone {
                p class="text-sm text-gray-600 dark:text-gray-400" { (phone) }
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
        customer::Customer,
        test_utils::{
            assert_status_ok, assert_valid_html, must_add_customer, must_create_state,
            parse_html_document, select_texts,
        },
    };

    use super::{CustomerSearchQuery, CustomersPageState, get_customers_page, search_customers};

    fn customer(id: i64, name: &str, phone: Option<&str>) -> Customer {
        Customer {
            id,
            name: name.to_owned(),
            phone: phone.map(str::to_owned),
            created_at: datetime!(2025-03-07 10:00 UTC),
        }
    }

    fn matched_names(customers: &[Customer], search: &str) -> Vec<(usize, String)> {
        search_customers(customers, search)
            .into_iter()
            .map(|numbered| (numbered.sn, numbered.customer.name.clone()))
            .collect()
    }

    #[test]
    fn search_matches_name_phone_and_sn() {
        let customers = vec![
            customer(3, "Chidi", None),
            customer(2, "Bola", Some("08099990000")),
            customer(1, "Ada", Some("08012345678")),
        ];

        assert_eq!(matched_names(&customers, "").len(), 3);
        assert_eq!(matched_names(&customers, "ADA"), vec![(3, "Ada".to_owned())]);
        assert_eq!(matched_names(&customers, "9999"), vec![(2, "Bola".to_owned())]);
        assert_eq!(
            matched_names(&customers, "1"),
            vec![(1, "Chidi".to_owned()), (3, "Ada".to_owned())]
        );
        assert!(matched_names(&customers, "zeta").is_empty());
    }

    #[tokio::test]
    async fn lists_customers_newest_first_with_sn() {
        let state = must_create_state();
        must_add_customer(&state, "Ada", "");
        must_add_customer(&state, "Bola", "");

        let response = get_customers_page(
            State(CustomersPageState::from_ref(&state)),
            Query(CustomerSearchQuery::default()),
        )
        .await
        .unwrap();

        assert_status_ok(&response);
        let html = parse_html_document(response).await;
        assert_valid_html(&html);
        assert_eq!(
            select_texts(&html, "tr[data-customer-row] td:nth-child(1)"),
            vec!["1", "2"]
        );
        assert_eq!(
            select_texts(&html, "tr[data-customer-row] td:nth-child(2)"),
            vec!["Bola", "Ada"]
        );
        assert_eq!(select_texts(&html, "li[data-customer-card]").len(), 2);
    }

    #[tokio::test]
    async fn search_shows_matches_only() {
        let state = must_create_state();
        must_add_customer(&state, "Ada", "");
        must_add_customer(&state, "Bola", "");

        let response = get_customers_page(
            State(CustomersPageState::from_ref(&state)),
            Query(CustomerSearchQuery {
                search: "bol".to_owned(),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_texts(&html, "tr[data-customer-row] td:nth-child(2)"),
            vec!["Bola"]
        );
        let search = html
            .select(&scraper::Selector::parse("input[name='search']").unwrap())
            .next()
            .expect("No search input");
        assert_eq!(search.value().attr("value"), Some("bol"));
    }

    #[tokio::test]
    async fn search_without_matches_shows_message() {
        let state = must_create_state();
        must_add_customer(&state, "Ada", "");

        let response = get_customers_page(
            State(CustomersPageState::from_ref(&state)),
            Query(CustomerSearchQuery {
                search: "zeta".to_owned(),
            }),
        )
        .await
        .unwrap();

        let html = parse_html_document(response).await;
        assert_eq!(
            select_texts(&html, "tbody td"),
            vec!["No customers match your search."]
        );
    }
}
