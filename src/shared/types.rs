use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct ApiResponse<T> {
    pub success: bool,
    pub data: Option<T>,
    pub message: Option<String>,
    pub meta: Option<Meta>,
    pub errors: Option<Vec<String>>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Meta {
    pub total: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub last_page: Option<i64>,
}

impl Meta {
    pub fn total(total: i64) -> Self {
        Self {
            total,
            page: None,
            per_page: None,
            last_page: None,
        }
    }

    /// Meta for a fixed-size page; `last_page` is at least 1
    pub fn paginated(total: i64, page: i64, per_page: i64) -> Self {
        let last_page = if total <= 0 {
            1
        } else {
            (total + per_page - 1) / per_page
        };
        Self {
            total,
            page: Some(page),
            per_page: Some(per_page),
            last_page: Some(last_page),
        }
    }
}

// =============================================================================
// PAGINATION
// =============================================================================

/// A fixed-size page request, used by listings whose page size is not client-controlled
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Page {
    pub number: i64,
    pub size: i64,
}

impl Page {
    /// Page numbers are clamped to `1..=i64::MAX / size` so the offset always fits
    pub fn new(number: Option<i64>, size: i64) -> Self {
        let size = size.max(1);
        Self {
            number: number.unwrap_or(1).clamp(1, i64::MAX / size),
            size,
        }
    }

    pub fn offset(&self) -> i64 {
        self.number.saturating_sub(1).saturating_mul(self.size)
    }

    pub fn meta(&self, total: i64) -> Meta {
        Meta::paginated(total, self.number, self.size)
    }
}

impl<T> ApiResponse<T> {
    pub fn success(data: Option<T>, message: Option<String>, meta: Option<Meta>) -> Self {
        Self {
            success: true,
            data,
            message,
            meta,
            errors: None,
        }
    }

    pub fn error(message: Option<String>, errors: Option<Vec<String>>) -> ApiResponse<()> {
        ApiResponse {
            success: false,
            data: None,
            message,
            meta: None,
            errors,
        }
    }
}

/// Treat `?field=` the same as an absent field when deserializing query strings
pub fn empty_string_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    let raw: Option<String> = Option::deserialize(deserializer)?;
    match raw.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse::<T>().map(Some).map_err(serde::de::Error::custom),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_meta_paginated_last_page() {
        let meta = Meta::paginated(25, 1, 12);
        assert_eq!(meta.last_page, Some(3));

        let empty = Meta::paginated(0, 1, 12);
        assert_eq!(empty.last_page, Some(1));

        let exact = Meta::paginated(24, 2, 12);
        assert_eq!(exact.last_page, Some(2));
    }

    #[test]
    fn test_page_offset_clamps_to_first_page() {
        assert_eq!(Page::new(None, 12).offset(), 0);
        assert_eq!(Page::new(Some(0), 12).offset(), 0);
        assert_eq!(Page::new(Some(-3), 15).number, 1);
        assert_eq!(Page::new(Some(3), 15).offset(), 30);
    }

    #[test]
    fn test_page_offset_does_not_overflow_on_huge_page_numbers() {
        let page = Page::new(Some(i64::MAX), 12);
        assert_eq!(page.number, i64::MAX / 12);
        assert!(page.offset() >= 0);
        assert!(page.offset() <= i64::MAX - 12);

        let meta = page.meta(30);
        assert_eq!(meta.page, Some(i64::MAX / 12));
        assert_eq!(meta.last_page, Some(3));
    }

    #[derive(Debug, Deserialize)]
    struct Filter {
        #[serde(default, deserialize_with = "empty_string_as_none")]
        price_min: Option<i64>,
    }

    #[test]
    fn test_empty_string_as_none() {
        let f: Filter = serde_json::from_str(r#"{"price_min": ""}"#).unwrap();
        assert_eq!(f.price_min, None);

        let f: Filter = serde_json::from_str(r#"{"price_min": "150"}"#).unwrap();
        assert_eq!(f.price_min, Some(150));

        let f: Filter = serde_json::from_str(r#"{}"#).unwrap();
        assert_eq!(f.price_min, None);

        assert!(serde_json::from_str::<Filter>(r#"{"price_min": "abc"}"#).is_err());
    }
}
