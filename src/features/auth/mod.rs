//! Local account authentication with HS256 access tokens.

mod jwt;

pub mod dtos;
pub mod handlers;
pub mod model;
pub mod password;
pub mod routes;
pub mod services;

pub use jwt::JwtManager;
pub use services::AuthService;
