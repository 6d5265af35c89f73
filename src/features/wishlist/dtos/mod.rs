mod wishlist_dto;

pub use wishlist_dto::*;
