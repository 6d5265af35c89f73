use std::sync::Arc;

use axum::{
    extract::{Path, State},
    Json,
};

use crate::core::error::Result;
use crate::core::extractor::AppQuery;
use crate::features::categories::CategoryService;
use crate::features::products::dtos::{
    CatalogFiltersDto, CatalogPageDto, CatalogQuery, ProductPageDto,
};
use crate::features::products::services::{ListingOrder, ProductFilter, ProductService};
use crate::shared::constants::CATALOG_PAGE_SIZE;
use crate::shared::types::{ApiResponse, Page};

/// State for the public catalog handlers
#[derive(Clone)]
pub struct CatalogState {
    pub product_service: Arc<ProductService>,
    pub category_service: Arc<CategoryService>,
}

/// Browse the catalog
///
/// Filters combine with AND. Twelve products per page.
#[utoipa::path(
    get,
    path = "/api/catalog",
    params(CatalogQuery),
    responses(
        (status = 200, description = "One page of products with categories and echoed filters", body = ApiResponse<CatalogPageDto>),
        (status = 400, description = "Invalid filter value")
    ),
    tag = "catalog"
)]
pub async fn list_catalog(
    State(state): State<CatalogState>,
    AppQuery(query): AppQuery<CatalogQuery>,
) -> Result<Json<ApiResponse<CatalogPageDto>>> {
    let filter = ProductFilter::from(&query);
    let order = ListingOrder::Sort(query.sort.unwrap_or_default());
    let page = Page::new(query.page, CATALOG_PAGE_SIZE);

    let (products, meta) = state.product_service.list(&filter, order, page).await?;
    let categories = state.category_service.list().await?;

    Ok(Json(ApiResponse::success(
        Some(CatalogPageDto {
            products,
            categories,
            filters: CatalogFiltersDto::from(&query),
        }),
        None,
        Some(meta),
    )))
}

/// Product detail page
#[utoipa::path(
    get,
    path = "/api/catalog/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product with images, print sizes and related products", body = ApiResponse<ProductPageDto>),
        (status = 404, description = "Product not found")
    ),
    tag = "catalog"
)]
pub async fn get_catalog_product(
    State(state): State<CatalogState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<ProductPageDto>>> {
    let product = state.product_service.get_detail(&slug).await?;
    let related_products = state.product_service.related(&product).await?;

    Ok(Json(ApiResponse::success(
        Some(ProductPageDto {
            product,
            related_products,
        }),
        None,
        None,
    )))
}
