use std::sync::Arc;

use axum::{
    extract::{Multipart, Path, State},
    http::StatusCode,
    Json,
};
use tracing::debug;
use uuid::Uuid;

use crate::core::error::{AppError, Result};
use crate::core::extractor::{AppJson, AppQuery};
use crate::features::categories::CategoryService;
use crate::features::products::dtos::{
    AdminProductEditDto, AdminProductFiltersDto, AdminProductListDto, AdminProductQuery,
    ImageUploadResponseDto, ProductDetailDto, ProductRequestDto, SortOption, UploadImagesDto,
    UploadedImage,
};
use crate::features::products::services::{
    ImageService, ListingOrder, ProductFilter, ProductService,
};
use crate::shared::constants::ADMIN_PAGE_SIZE;
use crate::shared::types::{ApiResponse, Page};

/// State for admin product handlers
#[derive(Clone)]
pub struct AdminProductState {
    pub product_service: Arc<ProductService>,
    pub image_service: Arc<ImageService>,
    pub category_service: Arc<CategoryService>,
}

/// List products for the back-office
#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(AdminProductQuery),
    responses(
        (status = 200, description = "One page of products, newest first", body = ApiResponse<AdminProductListDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required")
    ),
    tag = "admin-products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn list_products(
    State(state): State<AdminProductState>,
    AppQuery(query): AppQuery<AdminProductQuery>,
) -> Result<Json<ApiResponse<AdminProductListDto>>> {
    let filter = ProductFilter::from(&query);
    let page = Page::new(query.page, ADMIN_PAGE_SIZE);

    let (products, meta) = state
        .product_service
        .list(&filter, ListingOrder::Sort(SortOption::Newest), page)
        .await?;
    let categories = state.category_service.list().await?;

    Ok(Json(ApiResponse::success(
        Some(AdminProductListDto {
            products,
            categories,
            filters: AdminProductFiltersDto::from(&query),
        }),
        None,
        Some(meta),
    )))
}

/// Create a product
///
/// Print sizes are stored only when `product_type` is `print`.
#[utoipa::path(
    post,
    path = "/api/admin/products",
    request_body = ProductRequestDto,
    responses(
        (status = 201, description = "Product created", body = ApiResponse<ProductDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 422, description = "Validation error")
    ),
    tag = "admin-products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn create_product(
    State(state): State<AdminProductState>,
    AppJson(dto): AppJson<ProductRequestDto>,
) -> Result<(StatusCode, Json<ApiResponse<ProductDetailDto>>)> {
    let input = dto.into_input()?;
    let product = state.product_service.create(input).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(product),
            Some("Product created successfully.".to_string()),
            None,
        )),
    ))
}

/// Product detail for the edit form
#[utoipa::path(
    get,
    path = "/api/admin/products/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product with images, print sizes and the category list", body = ApiResponse<AdminProductEditDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin-products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn get_product(
    State(state): State<AdminProductState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<AdminProductEditDto>>> {
    let product = state.product_service.get_detail(&slug).await?;
    let categories = state.category_service.list().await?;

    Ok(Json(ApiResponse::success(
        Some(AdminProductEditDto {
            product,
            categories,
        }),
        None,
        None,
    )))
}

/// Replace a product's fields
///
/// Omitted `status` resets to `available` and omitted `is_featured` to false.
/// A present `print_sizes` list replaces the stored sizes.
#[utoipa::path(
    put,
    path = "/api/admin/products/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    request_body = ProductRequestDto,
    responses(
        (status = 200, description = "Product updated", body = ApiResponse<ProductDetailDto>),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Product not found"),
        (status = 422, description = "Validation error")
    ),
    tag = "admin-products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn update_product(
    State(state): State<AdminProductState>,
    Path(slug): Path<String>,
    AppJson(dto): AppJson<ProductRequestDto>,
) -> Result<Json<ApiResponse<ProductDetailDto>>> {
    let input = dto.into_input()?;
    let product = state.product_service.update(&slug, input).await?;

    Ok(Json(ApiResponse::success(
        Some(product),
        Some("Product updated successfully.".to_string()),
        None,
    )))
}

/// Delete a product and its stored images
#[utoipa::path(
    delete,
    path = "/api/admin/products/{slug}",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    responses(
        (status = 200, description = "Product deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Product not found")
    ),
    tag = "admin-products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_product(
    State(state): State<AdminProductState>,
    Path(slug): Path<String>,
) -> Result<Json<ApiResponse<()>>> {
    state.product_service.delete(&slug).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some("Product deleted successfully.".to_string()),
        None,
    )))
}

/// Upload product images
///
/// Accepts multipart/form-data with one or more `images[]` (or `images`)
/// parts. Each must be a JPEG, PNG, GIF or WebP image of at most 5MB.
#[utoipa::path(
    post,
    path = "/api/admin/products/{slug}/images",
    params(
        ("slug" = String, Path, description = "Product slug")
    ),
    request_body(
        content = UploadImagesDto,
        content_type = "multipart/form-data",
        description = "Image files",
    ),
    responses(
        (status = 201, description = "Images uploaded", body = ApiResponse<ImageUploadResponseDto>),
        (status = 400, description = "Malformed multipart body"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Forbidden - Admin access required"),
        (status = 404, description = "Product not found"),
        (status = 413, description = "Request too large"),
        (status = 422, description = "Not an image or image too large")
    ),
    tag = "admin-products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn upload_images(
    State(state): State<AdminProductState>,
    Path(slug): Path<String>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<ApiResponse<ImageUploadResponseDto>>)> {
    let mut files: Vec<UploadedImage> = Vec::new();

    while let Some(field) = multipart.next_field().await.map_err(|e| {
        debug!("Failed to read multipart field: {}", e);
        multipart_error(e.status(), e.body_text())
    })? {
        let field_name = field.name().unwrap_or("").to_string();

        match field_name.as_str() {
            "images" | "images[]" => {
                let content_type = field.content_type().map(|s| s.to_string());
                let data = field.bytes().await.map_err(|e| {
                    debug!("Failed to read image bytes: {}", e);
                    multipart_error(e.status(), e.body_text())
                })?;

                files.push(UploadedImage {
                    content_type,
                    data: data.to_vec(),
                });
            }
            _ => {
                debug!("Ignoring unknown field: {}", field_name);
            }
        }
    }

    let response = state.image_service.upload(&slug, files).await?;

    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(
            Some(response),
            Some("Images uploaded successfully.".to_string()),
            None,
        )),
    ))
}

fn multipart_error(status: StatusCode, detail: String) -> AppError {
    if status == StatusCode::PAYLOAD_TOO_LARGE {
        AppError::PayloadTooLarge("Upload exceeds the maximum request size".to_string())
    } else {
        AppError::BadRequest(format!("Failed to read multipart data: {}", detail))
    }
}

/// Delete one product image
#[utoipa::path(
    delete,
    path = "/api/admin/products/{slug}/images/{image_id}",
    params(
        ("slug" = String, Path, description = "Product slug"),
        ("image_id" = Uuid, Path, description = "Image ID")
    ),
    responses(
        (status = 200, description = "Image deleted"),
        (status = 401, description = "Unauthorized"),
        (status = 403, description = "Image belongs to another product, or admin access required"),
        (status = 404, description = "Product or image not found")
    ),
    tag = "admin-products",
    security(
        ("bearer_auth" = [])
    )
)]
pub async fn delete_image(
    State(state): State<AdminProductState>,
    Path((slug, image_id)): Path<(String, Uuid)>,
) -> Result<Json<ApiResponse<()>>> {
    state.image_service.delete(&slug, image_id).await?;

    Ok(Json(ApiResponse::success(
        None,
        Some("Image deleted successfully.".to_string()),
        None,
    )))
}
