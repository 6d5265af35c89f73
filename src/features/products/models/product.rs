use std::str::FromStr;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use sqlx::{FromRow, Type};
use utoipa::ToSchema;
use uuid::Uuid;

/// Product type enum matching database enum
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "product_type", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductType {
    Original,
    Print,
    Digital,
}

impl FromStr for ProductType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "original" => Ok(ProductType::Original),
            "print" => Ok(ProductType::Print),
            "digital" => Ok(ProductType::Digital),
            other => Err(format!("unknown product type '{}'", other)),
        }
    }
}

/// Product availability enum matching database enum
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize, Type, ToSchema)]
#[sqlx(type_name = "product_status", rename_all = "lowercase")]
#[serde(rename_all = "lowercase")]
pub enum ProductStatus {
    #[default]
    Available,
    Sold,
}

impl FromStr for ProductStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "available" => Ok(ProductStatus::Available),
            "sold" => Ok(ProductStatus::Sold),
            other => Err(format!("unknown product status '{}'", other)),
        }
    }
}

/// Database model for product
#[derive(Debug, Clone, FromRow)]
pub struct Product {
    pub id: Uuid,
    pub category_id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub product_type: ProductType,
    pub price: Decimal,
    pub price_usd: Option<Decimal>,
    pub width: i32,
    pub height: i32,
    pub medium: String,
    pub year_created: i32,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Listing row: product columns joined with its category and thumbnail URL
#[derive(Debug, Clone, FromRow)]
pub struct ProductListRow {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub product_type: ProductType,
    pub price: Decimal,
    pub price_usd: Option<Decimal>,
    pub width: i32,
    pub height: i32,
    pub medium: String,
    pub year_created: i32,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub created_at: DateTime<Utc>,
    pub category_id: Uuid,
    pub category_name: String,
    pub category_slug: String,
    pub thumbnail: Option<String>,
}
