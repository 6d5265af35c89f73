use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};
use uuid::Uuid;

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::admin::dtos::*;
use crate::features::admin::services::AdminService;
use crate::features::auth::model::AuthenticatedUser;
use crate::shared::constants::ADMIN_PAGE_SIZE;
use crate::shared::types::{ApiResponse, Page};

/// Back-office dashboard counters
#[utoipa::path(
    get,
    path = "/api/admin/dashboard",
    responses(
        (status = 200, description = "Store totals", body = ApiResponse<DashboardStatsDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_dashboard(
    admin: AuthenticatedUser,
    State(service): State<Arc<AdminService>>,
) -> Result<Json<ApiResponse<DashboardStatsDto>>> {
    tracing::debug!("Dashboard requested by {}", admin.email);
    let stats = service.dashboard().await?;
    Ok(Json(ApiResponse::success(Some(stats), None, None)))
}

/// List customer accounts (paginated)
#[utoipa::path(
    get,
    path = "/api/admin/users",
    params(AdminUserQuery),
    responses(
        (status = 200, description = "One page of customers, newest first", body = ApiResponse<AdminUserListDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_users(
    State(service): State<Arc<AdminService>>,
    AppQuery(query): AppQuery<AdminUserQuery>,
) -> Result<Json<ApiResponse<AdminUserListDto>>> {
    let page = Page::new(query.page, ADMIN_PAGE_SIZE);
    let (users, meta) = service.list_users(query.search.as_deref(), page).await?;

    Ok(Json(ApiResponse::success(
        Some(AdminUserListDto {
            users,
            filters: AdminUserFiltersDto {
                search: query.search,
            },
        }),
        None,
        Some(meta),
    )))
}

/// Show one user with their wishlist
#[utoipa::path(
    get,
    path = "/api/admin/users/{id}",
    params(
        ("id" = Uuid, Path, description = "User ID")
    ),
    responses(
        (status = 200, description = "User with wishlisted products", body = ApiResponse<AdminUserDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "admin",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_user(
    State(service): State<Arc<AdminService>>,
    Path(id): Path<Uuid>,
) -> Result<Json<ApiResponse<AdminUserDetailDto>>> {
    let user = service.get_user(id).await?;
    Ok(Json(ApiResponse::success(Some(user), None, None)))
}
