use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::Validate;

use crate::features::categories::models::{Category, CategoryWithCount};
use crate::shared::validation::validate_not_blank;

/// Response DTO for category
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategoryResponseDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
    pub products_count: i64,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl From<CategoryWithCount> for CategoryResponseDto {
    fn from(c: CategoryWithCount) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
            products_count: c.products_count,
            created_at: c.created_at,
            updated_at: c.updated_at,
        }
    }
}

/// Category reference embedded in product payloads
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct CategorySummaryDto {
    pub id: Uuid,
    pub name: String,
    pub slug: String,
}

impl From<Category> for CategorySummaryDto {
    fn from(c: Category) -> Self {
        Self {
            id: c.id,
            name: c.name,
            slug: c.slug,
        }
    }
}

/// Request DTO for creating or renaming a category
#[derive(Debug, Serialize, Deserialize, Validate, ToSchema)]
pub struct CategoryRequestDto {
    #[validate(
        custom(function = "validate_not_blank", message = "Category name is required."),
        length(max = 100, message = "Category name must not exceed 100 characters.")
    )]
    pub name: String,
}
