use std::sync::Arc;

use axum::{routing::get, Router};

use crate::features::admin::handlers;
use crate::features::admin::services::AdminService;

/// Dashboard and customer routes, nested under `/api/admin`
pub fn routes(admin_service: Arc<AdminService>) -> Router {
    Router::new()
        .route("/dashboard", get(handlers::get_dashboard))
        .route("/users", get(handlers::list_users))
        .route("/users/{id}", get(handlers::get_user))
        .with_state(admin_service)
}
