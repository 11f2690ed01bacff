//! Products: the kinds of scrap the yard buys, and the pages for managing them.

mod core;
mod create;
mod delete;
mod edit;
mod form;
mod list;

pub use core::{
    Product, ProductForm, SerialNumber, ValidatedProduct, create_product_table, map_row_to_product,
};
pub use create::{create_product_endpoint, get_new_product_page};
pub use delete::delete_product_endpoint;
pub use edit::{get_edit_product_page, update_product_endpoint};
pub use list::get_products_page;
