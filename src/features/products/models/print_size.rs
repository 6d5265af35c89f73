use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::FromRow;
use uuid::Uuid;

/// Database model for a purchasable print size of a product
#[derive(Debug, Clone, FromRow)]
pub struct PrintSize {
    pub id: Uuid,
    pub product_id: Uuid,
    pub size_name: String,
    pub width: i32,
    pub height: i32,
    pub price: Decimal,
    pub price_usd: Option<Decimal>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}
