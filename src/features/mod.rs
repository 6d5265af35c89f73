pub mod admin;
pub mod auth;
pub mod categories;
pub mod home;
pub mod products;
pub mod users;
pub mod wishlist;
