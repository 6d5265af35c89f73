mod admin_category_handler;

pub use admin_category_handler::*;
