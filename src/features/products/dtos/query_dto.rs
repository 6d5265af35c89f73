use std::str::FromStr;

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::features::categories::dtos::CategoryResponseDto;
use crate::features::products::dtos::{ProductDetailDto, ProductListItemDto};
use crate::features::products::models::{ProductStatus, ProductType};
use crate::shared::types::empty_string_as_none;

/// Catalog ordering
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOption {
    #[default]
    Newest,
    PriceLow,
    PriceHigh,
}

impl FromStr for SortOption {
    type Err = String;

    /// Unknown values fall back to `newest`
    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(match s {
            "price_low" => SortOption::PriceLow,
            "price_high" => SortOption::PriceHigh,
            _ => SortOption::Newest,
        })
    }
}

/// Query params for the public catalog. Empty values count as absent.
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct CatalogQuery {
    /// Category id
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<Uuid>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<ProductType>)]
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<ProductStatus>)]
    pub status: Option<ProductStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub price_min: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<f64>)]
    pub price_max: Option<Decimal>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<SortOption>)]
    pub sort: Option<SortOption>,
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
}

/// Catalog filters echoed back to the client
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CatalogFiltersDto {
    pub category: Option<Uuid>,
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
    pub status: Option<ProductStatus>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub sort: SortOption,
}

impl From<&CatalogQuery> for CatalogFiltersDto {
    fn from(q: &CatalogQuery) -> Self {
        Self {
            category: q.category,
            product_type: q.product_type,
            status: q.status,
            price_min: q.price_min,
            price_max: q.price_max,
            sort: q.sort.unwrap_or_default(),
        }
    }
}

/// Query params for the admin product list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AdminProductQuery {
    /// Case-insensitive substring of title or description
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub category: Option<Uuid>,
    #[serde(default, rename = "type", deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<ProductType>)]
    pub product_type: Option<ProductType>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    #[param(value_type = Option<ProductStatus>)]
    pub status: Option<ProductStatus>,
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminProductFiltersDto {
    pub search: Option<String>,
    pub category: Option<Uuid>,
    #[serde(rename = "type")]
    pub product_type: Option<ProductType>,
    pub status: Option<ProductStatus>,
}

impl From<&AdminProductQuery> for AdminProductFiltersDto {
    fn from(q: &AdminProductQuery) -> Self {
        Self {
            search: q.search.clone(),
            category: q.category,
            product_type: q.product_type,
            status: q.status,
        }
    }
}

// =============================================================================
// PAGE PAYLOADS
// =============================================================================

/// Catalog page: one page of products plus the filter sidebar data
#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct CatalogPageDto {
    pub products: Vec<ProductListItemDto>,
    pub categories: Vec<CategoryResponseDto>,
    pub filters: CatalogFiltersDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ProductPageDto {
    pub product: ProductDetailDto,
    pub related_products: Vec<ProductListItemDto>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminProductListDto {
    pub products: Vec<ProductListItemDto>,
    pub categories: Vec<CategoryResponseDto>,
    pub filters: AdminProductFiltersDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminProductEditDto {
    pub product: ProductDetailDto,
    pub categories: Vec<CategoryResponseDto>,
}
