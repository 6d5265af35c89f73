//! Home page and shared storefront settings.

pub mod dtos;
pub mod handlers;
pub mod routes;
