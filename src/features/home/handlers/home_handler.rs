use std::sync::Arc;

use axum::{extract::State, Json};

use crate::core::error::Result;
use crate::features::home::dtos::{HomePageDto, SiteInfoDto};
use crate::features::products::ProductService;
use crate::shared::types::ApiResponse;

/// State for home handlers
#[derive(Clone)]
pub struct HomeState {
    pub product_service: Arc<ProductService>,
    pub site: Arc<SiteInfoDto>,
}

/// Home page data
#[utoipa::path(
    get,
    path = "/api/home",
    responses(
        (status = 200, description = "Up to six featured, available products, newest first", body = ApiResponse<HomePageDto>)
    ),
    tag = "home"
)]
pub async fn get_home(State(state): State<HomeState>) -> Result<Json<ApiResponse<HomePageDto>>> {
    let featured_products = state.product_service.featured().await?;
    Ok(Json(ApiResponse::success(
        Some(HomePageDto { featured_products }),
        None,
        None,
    )))
}

/// Storefront settings
#[utoipa::path(
    get,
    path = "/api/site",
    responses(
        (status = 200, description = "App name, WhatsApp contact, locales and currencies", body = ApiResponse<SiteInfoDto>)
    ),
    tag = "home"
)]
pub async fn get_site(State(state): State<HomeState>) -> Json<ApiResponse<SiteInfoDto>> {
    Json(ApiResponse::success(
        Some(state.site.as_ref().clone()),
        None,
        None,
    ))
}
