mod image;
mod print_size;
mod product;

pub use image::Image;
pub use print_size::PrintSize;
pub use product::{Product, ProductListRow, ProductStatus, ProductType};
