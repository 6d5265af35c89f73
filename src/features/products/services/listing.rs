//! SQL for product listings.
//!
//! Every listing (catalog, admin, home, related, wishlist) selects the same
//! `ProductListRow` shape and differs only in filters and ordering.

use rust_decimal::Decimal;
use sqlx::{Postgres, QueryBuilder};
use uuid::Uuid;

use crate::features::products::dtos::{AdminProductQuery, CatalogQuery, SortOption};
use crate::features::products::models::{ProductStatus, ProductType};

const LIST_SELECT: &str = r#"
SELECT p.id, p.title, p.slug, p.product_type, p.price, p.price_usd, p.width, p.height,
       p.medium, p.year_created, p.status, p.is_featured, p.created_at,
       c.id AS category_id, c.name AS category_name, c.slug AS category_slug,
       (SELECT i.url FROM images i
         WHERE i.product_id = p.id
         ORDER BY i.is_primary DESC, i.sort_order, i.created_at
         LIMIT 1) AS thumbnail
FROM products p
JOIN categories c ON c.id = p.category_id
WHERE p.deleted_at IS NULL"#;

const COUNT_SELECT: &str = "SELECT COUNT(*) FROM products p WHERE p.deleted_at IS NULL";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListingOrder {
    Sort(SortOption),
    /// Most recently wishlisted first; requires `ProductFilter::wishlisted_by`
    WishlistedAt,
}

/// Filters shared by all product listings
#[derive(Debug, Clone, Default)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category_id: Option<Uuid>,
    pub product_type: Option<ProductType>,
    pub status: Option<ProductStatus>,
    pub price_min: Option<Decimal>,
    pub price_max: Option<Decimal>,
    pub featured_only: bool,
    pub exclude_id: Option<Uuid>,
    pub wishlisted_by: Option<Uuid>,
}

impl From<&CatalogQuery> for ProductFilter {
    fn from(q: &CatalogQuery) -> Self {
        Self {
            category_id: q.category,
            product_type: q.product_type,
            status: q.status,
            price_min: q.price_min,
            price_max: q.price_max,
            ..Default::default()
        }
    }
}

impl From<&AdminProductQuery> for ProductFilter {
    fn from(q: &AdminProductQuery) -> Self {
        Self {
            search: q.search.clone(),
            category_id: q.category,
            product_type: q.product_type,
            status: q.status,
            ..Default::default()
        }
    }
}

/// Escape `%`, `_` and `\` so a search term matches literally inside ILIKE
pub fn escape_like(term: &str) -> String {
    let mut escaped = String::with_capacity(term.len());
    for ch in term.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            escaped.push('\\');
        }
        escaped.push(ch);
    }
    escaped
}

fn push_filters(qb: &mut QueryBuilder<'static, Postgres>, filter: &ProductFilter) {
    if let Some(ref search) = filter.search {
        let pattern = format!("%{}%", escape_like(search.trim()));
        qb.push(" AND (p.title ILIKE ");
        qb.push_bind(pattern.clone());
        qb.push(" OR p.description ILIKE ");
        qb.push_bind(pattern);
        qb.push(")");
    }

    if let Some(category_id) = filter.category_id {
        qb.push(" AND p.category_id = ");
        qb.push_bind(category_id);
    }

    if let Some(product_type) = filter.product_type {
        qb.push(" AND p.product_type = ");
        qb.push_bind(product_type);
    }

    if let Some(status) = filter.status {
        qb.push(" AND p.status = ");
        qb.push_bind(status);
    }

    if let Some(price_min) = filter.price_min {
        qb.push(" AND p.price >= ");
        qb.push_bind(price_min);
    }

    if let Some(price_max) = filter.price_max {
        qb.push(" AND p.price <= ");
        qb.push_bind(price_max);
    }

    if filter.featured_only {
        qb.push(" AND p.is_featured = TRUE");
    }

    if let Some(exclude_id) = filter.exclude_id {
        qb.push(" AND p.id <> ");
        qb.push_bind(exclude_id);
    }

    if let Some(user_id) = filter.wishlisted_by {
        qb.push(" AND w.user_id = ");
        qb.push_bind(user_id);
    }
}

fn order_clause(order: ListingOrder) -> &'static str {
    match order {
        ListingOrder::Sort(SortOption::Newest) => " ORDER BY p.created_at DESC, p.id DESC",
        ListingOrder::Sort(SortOption::PriceLow) => " ORDER BY p.price ASC, p.created_at DESC",
        ListingOrder::Sort(SortOption::PriceHigh) => " ORDER BY p.price DESC, p.created_at DESC",
        ListingOrder::WishlistedAt => " ORDER BY w.created_at DESC, p.id DESC",
    }
}

/// `SELECT` of listing rows with filters, ordering and an optional
/// `(limit, offset)` window
pub fn list_query(
    filter: &ProductFilter,
    order: ListingOrder,
    window: Option<(i64, i64)>,
) -> QueryBuilder<'static, Postgres> {
    let select = match filter.wishlisted_by {
        Some(_) => LIST_SELECT.replacen(
            "JOIN categories c ON c.id = p.category_id",
            "JOIN categories c ON c.id = p.category_id\nJOIN wishlists w ON w.product_id = p.id",
            1,
        ),
        None => LIST_SELECT.to_string(),
    };

    let mut qb = QueryBuilder::new(select);
    push_filters(&mut qb, filter);
    qb.push(order_clause(order));
    if let Some((limit, offset)) = window {
        qb.push(" LIMIT ");
        qb.push_bind(limit);
        qb.push(" OFFSET ");
        qb.push_bind(offset);
    }
    qb
}

/// `COUNT(*)` matching `list_query` without the page window
pub fn count_query(filter: &ProductFilter) -> QueryBuilder<'static, Postgres> {
    let select = match filter.wishlisted_by {
        Some(_) => COUNT_SELECT.replacen(
            "FROM products p",
            "FROM products p JOIN wishlists w ON w.product_id = p.id",
            1,
        ),
        None => COUNT_SELECT.to_string(),
    };

    let mut qb = QueryBuilder::new(select);
    push_filters(&mut qb, filter);
    qb
}

#[cfg(test)]
mod tests {
    use super::*;

    fn compact(sql: &str) -> String {
        sql.split_whitespace().collect::<Vec<_>>().join(" ")
    }

    #[test]
    fn test_unfiltered_catalog_sorts_newest_first() {
        let qb = list_query(
            &ProductFilter::default(),
            ListingOrder::Sort(SortOption::Newest),
            Some((12, 0)),
        );
        let sql = compact(qb.sql());
        assert!(sql.contains("WHERE p.deleted_at IS NULL ORDER BY p.created_at DESC"));
        assert!(sql.ends_with("LIMIT $1 OFFSET $2"));
        assert!(!sql.contains("wishlists"));
    }

    #[test]
    fn test_catalog_filters_bind_in_order() {
        let filter = ProductFilter {
            category_id: Some(Uuid::now_v7()),
            product_type: Some(ProductType::Print),
            status: Some(ProductStatus::Available),
            price_min: Some(Decimal::from(100_000)),
            price_max: Some(Decimal::from(900_000)),
            ..Default::default()
        };
        let qb = list_query(
            &filter,
            ListingOrder::Sort(SortOption::PriceLow),
            Some((12, 12)),
        );
        let sql = compact(qb.sql());
        assert!(sql.contains(
            "AND p.category_id = $1 AND p.product_type = $2 AND p.status = $3 \
             AND p.price >= $4 AND p.price <= $5 ORDER BY p.price ASC"
        ));
        assert!(sql.ends_with("LIMIT $6 OFFSET $7"));
    }

    #[test]
    fn test_search_matches_title_or_description() {
        let filter = ProductFilter {
            search: Some("batik".to_string()),
            ..Default::default()
        };
        let sql = compact(count_query(&filter).sql());
        assert_eq!(
            sql,
            "SELECT COUNT(*) FROM products p WHERE p.deleted_at IS NULL \
             AND (p.title ILIKE $1 OR p.description ILIKE $2)"
        );
    }

    #[test]
    fn test_featured_and_related_filters() {
        let filter = ProductFilter {
            status: Some(ProductStatus::Available),
            featured_only: true,
            exclude_id: Some(Uuid::now_v7()),
            ..Default::default()
        };
        let qb = list_query(&filter, ListingOrder::Sort(SortOption::Newest), Some((6, 0)));
        let sql = compact(qb.sql());
        assert!(sql.contains("AND p.status = $1 AND p.is_featured = TRUE AND p.id <> $2"));
    }

    #[test]
    fn test_wishlist_listing_joins_and_orders_by_added_at() {
        let filter = ProductFilter {
            wishlisted_by: Some(Uuid::now_v7()),
            ..Default::default()
        };
        let sql = compact(list_query(&filter, ListingOrder::WishlistedAt, None).sql());
        assert!(sql.contains("JOIN wishlists w ON w.product_id = p.id"));
        assert!(sql.contains("AND w.user_id = $1 ORDER BY w.created_at DESC"));
        assert!(!sql.contains("LIMIT"));

        let count = compact(count_query(&filter).sql());
        assert!(count.contains("JOIN wishlists w ON w.product_id = p.id"));
    }

    #[test]
    fn test_escape_like() {
        assert_eq!(escape_like("50%_off"), "50\\%\\_off");
        assert_eq!(escape_like("plain"), "plain");
        assert_eq!(escape_like("a\\b"), "a\\\\b");
    }
}
