//! Per-user wishlist of products.
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/wishlist` | Wishlisted products |
//! | POST | `/api/wishlist/{slug}` | Toggle a product |
//! | DELETE | `/api/wishlist/{slug}` | Remove a product |

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::WishlistService;
