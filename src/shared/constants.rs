/// Products per catalog page
pub const CATALOG_PAGE_SIZE: i64 = 12;

/// Rows per page on admin listings (products, users)
pub const ADMIN_PAGE_SIZE: i64 = 15;

/// Featured products shown on the home page
pub const FEATURED_LIMIT: i64 = 6;

/// Related products shown on a product detail page
pub const RELATED_LIMIT: i64 = 4;

// =============================================================================
// IMAGE UPLOADS
// =============================================================================

/// Maximum size of a single uploaded image (5MB)
pub const MAX_IMAGE_SIZE: usize = 5 * 1024 * 1024;

/// Maximum number of images accepted in one upload request
pub const MAX_IMAGES_PER_UPLOAD: usize = 20;

/// Allowed MIME types for product images
pub const ALLOWED_IMAGE_TYPES: &[&str] = &["image/jpeg", "image/png", "image/gif", "image/webp"];

/// Storage directory (relative to the storage root) for product images
pub const PRODUCT_IMAGE_DIR: &str = "products";

// =============================================================================
// PRODUCT RULES
// =============================================================================

/// Digits before the decimal point in `NUMERIC(15, 2)` rupiah prices
pub const PRICE_INTEGER_DIGITS: u32 = 13;

/// Digits before the decimal point in `NUMERIC(10, 2)` USD prices
pub const PRICE_USD_INTEGER_DIGITS: u32 = 8;

/// Earliest accepted `year_created`
pub const MIN_YEAR_CREATED: i32 = 1900;

/// Slug used when a title slugifies to an empty string
pub const FALLBACK_PRODUCT_SLUG: &str = "product";

/// Slug used when a category name slugifies to an empty string
pub const FALLBACK_CATEGORY_SLUG: &str = "category";
