use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::features::products::dtos::ProductListItemDto;
use crate::features::users::dtos::UserResponseDto;
use crate::shared::types::empty_string_as_none;

// =============================================================================
// DASHBOARD
// =============================================================================

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct DashboardStatsDto {
    /// Products that are not soft-deleted
    pub total_products: i64,
    pub total_sold: i64,
    /// Customer accounts (role `user`)
    pub total_users: i64,
    pub total_categories: i64,
}

// =============================================================================
// USERS
// =============================================================================

/// Query params for the customer list
#[derive(Debug, Clone, Default, Deserialize, IntoParams)]
pub struct AdminUserQuery {
    /// Case-insensitive substring of name or email
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub search: Option<String>,
    /// Page number (1-indexed)
    #[serde(default, deserialize_with = "empty_string_as_none")]
    pub page: Option<i64>,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AdminUserFiltersDto {
    pub search: Option<String>,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUserListDto {
    pub users: Vec<UserResponseDto>,
    pub filters: AdminUserFiltersDto,
}

#[derive(Debug, Serialize, Deserialize, ToSchema)]
pub struct AdminUserDetailDto {
    pub user: UserResponseDto,
    /// Wishlisted products, most recently added first
    pub wishlist: Vec<ProductListItemDto>,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_user_query_treats_empty_search_as_absent() {
        let query: AdminUserQuery =
            serde_json::from_value(serde_json::json!({ "search": "", "page": "3" })).unwrap();
        assert_eq!(query.search, None);
        assert_eq!(query.page, Some(3));
    }
}
