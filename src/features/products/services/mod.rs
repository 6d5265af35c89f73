mod image_service;
pub mod listing;
mod product_service;

pub use image_service::ImageService;
pub use listing::{ListingOrder, ProductFilter};
pub use product_service::ProductService;
