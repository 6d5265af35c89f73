pub mod wishlist_handler;

pub use wishlist_handler::*;
