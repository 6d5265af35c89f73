use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::features::categories::dtos::CategorySummaryDto;
use crate::features::products::models::{
    Image, PrintSize, Product, ProductListRow, ProductStatus, ProductType,
};
use crate::shared::format::{format_dimensions, format_idr};

/// Product card used in listings (catalog, home, wishlist, related products)
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductListItemDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub product_type: ProductType,
    pub price: Decimal,
    pub price_usd: Option<Decimal>,
    pub price_formatted: String,
    pub width: i32,
    pub height: i32,
    pub dimensions_formatted: String,
    pub medium: String,
    pub year_created: i32,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub thumbnail: Option<String>,
    pub category: CategorySummaryDto,
    pub created_at: DateTime<Utc>,
}

impl From<ProductListRow> for ProductListItemDto {
    fn from(r: ProductListRow) -> Self {
        Self {
            id: r.id,
            price_formatted: format_idr(r.price),
            dimensions_formatted: format_dimensions(r.width, r.height),
            title: r.title,
            slug: r.slug,
            product_type: r.product_type,
            price: r.price,
            price_usd: r.price_usd,
            width: r.width,
            height: r.height,
            medium: r.medium,
            year_created: r.year_created,
            status: r.status,
            is_featured: r.is_featured,
            thumbnail: r.thumbnail,
            category: CategorySummaryDto {
                id: r.category_id,
                name: r.category_name,
                slug: r.category_slug,
            },
            created_at: r.created_at,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ImageDto {
    pub id: Uuid,
    pub url: String,
    pub is_primary: bool,
    pub order: i32,
}

impl From<Image> for ImageDto {
    fn from(i: Image) -> Self {
        Self {
            id: i.id,
            url: i.url,
            is_primary: i.is_primary,
            order: i.sort_order,
        }
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct PrintSizeDto {
    pub id: Uuid,
    pub size_name: String,
    pub width: i32,
    pub height: i32,
    pub price: Decimal,
    pub price_usd: Option<Decimal>,
    pub price_formatted: String,
    pub dimensions_formatted: String,
}

impl From<PrintSize> for PrintSizeDto {
    fn from(p: PrintSize) -> Self {
        Self {
            id: p.id,
            price_formatted: format_idr(p.price),
            dimensions_formatted: format_dimensions(p.width, p.height),
            size_name: p.size_name,
            width: p.width,
            height: p.height,
            price: p.price,
            price_usd: p.price_usd,
        }
    }
}

/// Full product with category, ordered images and print sizes
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct ProductDetailDto {
    pub id: Uuid,
    pub title: String,
    pub slug: String,
    pub description: String,
    pub product_type: ProductType,
    pub price: Decimal,
    pub price_usd: Option<Decimal>,
    pub price_formatted: String,
    pub width: i32,
    pub height: i32,
    pub dimensions_formatted: String,
    pub medium: String,
    pub year_created: i32,
    pub status: ProductStatus,
    pub is_featured: bool,
    pub thumbnail: Option<String>,
    pub category: CategorySummaryDto,
    pub images: Vec<ImageDto>,
    pub print_sizes: Vec<PrintSizeDto>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl ProductDetailDto {
    /// `images` must already be ordered by `sort_order`
    pub fn assemble(
        product: Product,
        category: CategorySummaryDto,
        images: Vec<Image>,
        print_sizes: Vec<PrintSize>,
    ) -> Self {
        let images: Vec<ImageDto> = images.into_iter().map(ImageDto::from).collect();

        Self {
            id: product.id,
            price_formatted: format_idr(product.price),
            dimensions_formatted: format_dimensions(product.width, product.height),
            thumbnail: thumbnail_of(&images),
            title: product.title,
            slug: product.slug,
            description: product.description,
            product_type: product.product_type,
            price: product.price,
            price_usd: product.price_usd,
            width: product.width,
            height: product.height,
            medium: product.medium,
            year_created: product.year_created,
            status: product.status,
            is_featured: product.is_featured,
            category,
            images,
            print_sizes: print_sizes.into_iter().map(PrintSizeDto::from).collect(),
            created_at: product.created_at,
            updated_at: product.updated_at,
        }
    }
}

/// Primary image URL, else the first image
pub fn thumbnail_of(images: &[ImageDto]) -> Option<String> {
    images
        .iter()
        .find(|i| i.is_primary)
        .or_else(|| images.first())
        .map(|i| i.url.clone())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn image(url: &str, is_primary: bool, order: i32) -> ImageDto {
        ImageDto {
            id: Uuid::now_v7(),
            url: url.to_string(),
            is_primary,
            order,
        }
    }

    #[test]
    fn test_thumbnail_prefers_primary_image() {
        let images = vec![
            image("/storage/products/a.jpg", false, 0),
            image("/storage/products/b.jpg", true, 1),
        ];
        assert_eq!(
            thumbnail_of(&images),
            Some("/storage/products/b.jpg".to_string())
        );
    }

    #[test]
    fn test_thumbnail_falls_back_to_first_image() {
        let images = vec![
            image("/storage/products/a.jpg", false, 0),
            image("/storage/products/b.jpg", false, 1),
        ];
        assert_eq!(
            thumbnail_of(&images),
            Some("/storage/products/a.jpg".to_string())
        );
        assert_eq!(thumbnail_of(&[]), None);
    }

    #[test]
    fn test_list_item_formats_price_and_dimensions() {
        let row = ProductListRow {
            id: Uuid::now_v7(),
            title: "Senja di Kuta".to_string(),
            slug: "senja-di-kuta".to_string(),
            product_type: ProductType::Original,
            price: Decimal::new(250_000_000, 2),
            price_usd: None,
            width: 60,
            height: 80,
            medium: "Oil on canvas".to_string(),
            year_created: 2023,
            status: ProductStatus::Available,
            is_featured: true,
            created_at: Utc::now(),
            category_id: Uuid::now_v7(),
            category_name: "Lukisan".to_string(),
            category_slug: "lukisan".to_string(),
            thumbnail: None,
        };

        let dto = ProductListItemDto::from(row);
        assert_eq!(dto.price_formatted, "Rp 2.500.000");
        assert_eq!(dto.dimensions_formatted, "60 x 80 cm");
        assert_eq!(dto.category.slug, "lukisan");
    }
}
