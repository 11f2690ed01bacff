//! Customers: the people and businesses who sell scrap, and the pages for managing them.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod list;

pub use core::{
    Customer, CustomerForm, ValidatedCustomer, create_customer_table, map_row_to_customer,
};
pub use create::{create_customer_endpoint, get_new_customer_page};
pub use delete::delete_customer_endpoint;
pub use edit::{get_edit_customer_page, update_customer_endpoint};
pub use list::get_customers_page;
