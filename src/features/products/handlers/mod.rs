mod admin_product_handler;
mod catalog_handler;

pub use admin_product_handler::*;
pub use catalog_handler::*;
