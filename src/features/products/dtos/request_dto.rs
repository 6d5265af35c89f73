use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;
use validator::{Validate, ValidationError};

use crate::core::error::{AppError, Result};
use crate::features::products::models::{ProductStatus, ProductType};
use crate::shared::validation::{
    validate_not_blank, validate_price, validate_price_usd, validate_year_created,
};

fn validate_product_type(value: &str) -> std::result::Result<(), ValidationError> {
    value.parse::<ProductType>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("in");
        err.message = Some("Product type must be original, print, or digital.".into());
        err
    })
}

fn validate_product_status(value: &str) -> std::result::Result<(), ValidationError> {
    value.parse::<ProductStatus>().map(|_| ()).map_err(|_| {
        let mut err = ValidationError::new("in");
        err.message = Some("Status must be available or sold.".into());
        err
    })
}

/// One print size row in a product form
#[derive(Debug, Clone, Serialize, Deserialize, Validate, ToSchema)]
pub struct PrintSizeInput {
    #[validate(
        custom(function = "validate_not_blank", message = "Size name is required."),
        length(max = 50, message = "Size name must not exceed 50 characters.")
    )]
    pub size_name: String,

    #[validate(range(min = 1, message = "Width must be at least 1 cm."))]
    pub width: i32,

    #[validate(range(min = 1, message = "Height must be at least 1 cm."))]
    pub height: i32,

    #[validate(custom(function = "validate_price"))]
    pub price: Decimal,

    #[validate(custom(function = "validate_price_usd"))]
    pub price_usd: Option<Decimal>,
}

/// Create/update form for a product.
///
/// Required fields are optional here so that a missing field is reported as a
/// field-level validation error rather than a JSON parse error.
#[derive(Debug, Clone, Default, Serialize, Deserialize, Validate, ToSchema)]
pub struct ProductRequestDto {
    #[validate(required(message = "Please select a category."))]
    pub category_id: Option<Uuid>,

    #[validate(
        required(message = "Product title is required."),
        custom(function = "validate_not_blank", message = "Product title is required."),
        length(max = 255, message = "Product title must not exceed 255 characters.")
    )]
    pub title: Option<String>,

    #[validate(
        required(message = "Product description is required."),
        custom(function = "validate_not_blank", message = "Product description is required.")
    )]
    pub description: Option<String>,

    #[validate(
        required(message = "Please select a product type."),
        custom(function = "validate_product_type")
    )]
    pub product_type: Option<String>,

    #[validate(
        required(message = "Price is required."),
        custom(function = "validate_price")
    )]
    pub price: Option<Decimal>,

    #[validate(custom(function = "validate_price_usd"))]
    pub price_usd: Option<Decimal>,

    #[validate(
        required(message = "Width is required."),
        range(min = 1, message = "Width must be at least 1 cm.")
    )]
    pub width: Option<i32>,

    #[validate(
        required(message = "Height is required."),
        range(min = 1, message = "Height must be at least 1 cm.")
    )]
    pub height: Option<i32>,

    #[validate(
        required(message = "Medium is required."),
        custom(function = "validate_not_blank", message = "Medium is required."),
        length(max = 100, message = "Medium must not exceed 100 characters.")
    )]
    pub medium: Option<String>,

    #[validate(
        required(message = "Year created is required."),
        custom(function = "validate_year_created")
    )]
    pub year_created: Option<i32>,

    #[validate(custom(function = "validate_product_status"))]
    pub status: Option<String>,

    pub is_featured: Option<bool>,

    #[validate(nested)]
    pub print_sizes: Option<Vec<PrintSizeInput>>,
}

/// Validated product form with defaults applied
#[derive(Debug, Clone)]
pub struct ProductInput {
    pub category_id: Uuid,
    pub title: String,
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
    pub print_sizes: Option<Vec<PrintSizeInput>>,
}

fn required<T>(value: Option<T>, field: &str, message: &str) -> Result<T> {
    value.ok_or_else(|| AppError::field(field, message))
}

impl ProductRequestDto {
    /// Validate the form and apply defaults: status `available`, not featured
    pub fn into_input(self) -> Result<ProductInput> {
        self.validate()?;

        let product_type = required(self.product_type, "product_type", "Please select a product type.")?
            .parse::<ProductType>()
            .map_err(|_| {
                AppError::field(
                    "product_type",
                    "Product type must be original, print, or digital.",
                )
            })?;

        let status = match self.status {
            Some(s) => s
                .parse::<ProductStatus>()
                .map_err(|_| AppError::field("status", "Status must be available or sold."))?,
            None => ProductStatus::default(),
        };

        Ok(ProductInput {
            category_id: required(self.category_id, "category_id", "Please select a category.")?,
            title: required(self.title, "title", "Product title is required.")?
                .trim()
                .to_string(),
            description: required(self.description, "description", "Product description is required.")?,
            product_type,
            price: required(self.price, "price", "Price is required.")?,
            price_usd: self.price_usd,
            width: required(self.width, "width", "Width is required.")?,
            height: required(self.height, "height", "Height is required.")?,
            medium: required(self.medium, "medium", "Medium is required.")?
                .trim()
                .to_string(),
            year_created: required(self.year_created, "year_created", "Year created is required.")?,
            status,
            is_featured: self.is_featured.unwrap_or(false),
            print_sizes: self.print_sizes,
        })
    }
}
