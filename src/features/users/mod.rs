//! User accounts and self-service profile.
//!
//! ## Endpoints
//!
//! | Method | Endpoint | Description |
//! |--------|----------|-------------|
//! | GET | `/api/profile` | Current user's profile |
//! | PATCH | `/api/profile` | Update name, email, whatsapp, address |
//! | PUT | `/api/profile/password` | Change password |

pub mod dtos;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;

pub use services::UserService;
