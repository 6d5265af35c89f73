//! Back-office dashboard and customer management.
//!
//! Every route here is mounted under `/api/admin`, behind both the auth
//! middleware and the admin role check.

pub mod dtos;
pub mod handlers;
pub mod routes;
pub mod services;

pub use services::AdminService;
