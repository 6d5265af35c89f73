mod image_dto;
mod product_dto;
mod query_dto;
mod request_dto;

pub use image_dto::*;
pub use product_dto::*;
pub use query_dto::*;
pub use request_dto::*;
