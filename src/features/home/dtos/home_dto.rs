use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::core::config::SiteConfig;
use crate::features::products::dtos::ProductListItemDto;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct HomePageDto {
    pub featured_products: Vec<ProductListItemDto>,
}

/// Storefront settings shared by every page
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct SiteInfoDto {
    pub name: String,
    /// Digits only, country code first (e.g. `6281234567890`)
    pub whatsapp_number: String,
    pub whatsapp_url: String,
    pub locales: Vec<String>,
    pub currencies: Vec<String>,
}

impl From<&SiteConfig> for SiteInfoDto {
    fn from(c: &SiteConfig) -> Self {
        let digits: String = c
            .whatsapp_number
            .chars()
            .filter(|ch| ch.is_ascii_digit())
            .collect();

        Self {
            name: c.name.clone(),
            whatsapp_url: format!("https://wa.me/{}", digits),
            whatsapp_number: digits,
            locales: c.locales.clone(),
            currencies: c.currencies.clone(),
        }
    }
}
