use crate::features::users::handlers::profile_handler;
use crate::features::users::services::UserService;
use axum::{
    routing::{get, put},
    Router,
};
use std::sync::Arc;

/// Profile routes; mounted behind the auth middleware
pub fn routes(service: Arc<UserService>) -> Router {
    Router::new()
        .route(
            "/api/profile",
            get(profile_handler::get_profile).patch(profile_handler::update_profile),
        )
        .route("/api/profile/password", put(profile_handler::change_password))
        .with_state(service)
}
