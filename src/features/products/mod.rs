//! Products: the public catalog and the admin back-office for products and
//! their images.
//!
//! | Route | Access |
//! |-------|--------|
//! | `GET /api/catalog`, `GET /api/catalog/{slug}` | public |
//! | `/api/admin/products/**` | admin |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::{ImageService, ProductService};
