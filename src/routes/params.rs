use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};

use crate::models::OrderStatus;

pub const ALL: &str = "all";

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Deserialize, ToSchema)]
pub struct Pagination {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}

impl Pagination {
    pub fn normalize(&self) -> (i64, i64, i64) {
        let page = self.page.unwrap_or(1).max(1);
        let per_page = self.per_page.unwrap_or(20).clamp(1, 100);
        let offset = (page - 1).saturating_mul(per_page);
        (page, per_page, offset)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum SortOrder {
    Asc,
    Desc,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize, ToSchema)]
#[serde(rename_all = "snake_case")]
pub enum ProductSortBy {
    CreatedAt,
    Price,
    #[serde(alias = "name")]
    Title,
}

/// Sort choices of the category page.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, ToSchema)]
pub enum CategorySort {
    #[serde(rename = "newest")]
    Newest,
    #[serde(rename = "price-low")]
    PriceLow,
    #[serde(rename = "price-high")]
    PriceHigh,
}

impl CategorySort {
    pub fn ordering(&self) -> (ProductSortBy, SortOrder) {
        match self {
            CategorySort::Newest => (ProductSortBy::CreatedAt, SortOrder::Desc),
            CategorySort::PriceLow => (ProductSortBy::Price, SortOrder::Asc),
            CategorySort::PriceHigh => (ProductSortBy::Price, SortOrder::Desc),
        }
    }
}

/// Resolved catalog filter handed to the product service.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ProductFilter {
    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub featured: Option<bool>,
    pub visible: Option<bool>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort_by: ProductSortBy,
    pub sort_order: SortOrder,
    pub pagination: Pagination,
}

impl Default for ProductFilter {
    fn default() -> Self {
        Self {
            search: None,
            category: None,
            subcategory: None,
            featured: None,
            visible: None,
            min_price: None,
            max_price: None,
            sort_by: ProductSortBy::CreatedAt,
            sort_order: SortOrder::Desc,
            pagination: Pagination::default(),
        }
    }
}

fn non_empty(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty() && v != ALL)
}

// Categories are stored lower-case.
fn category_value(value: Option<String>) -> Option<String> {
    non_empty(value).map(|v| v.to_lowercase())
}

/// Wraps user text in `%...%` for `ILIKE`, matching `%`, `_` and `\` literally.
pub fn like_pattern(text: &str) -> String {
    let mut pattern = String::with_capacity(text.len() + 2);
    pattern.push('%');
    for ch in text.chars() {
        if matches!(ch, '%' | '_' | '\\') {
            pattern.push('\\');
        }
        pattern.push(ch);
    }
    pattern.push('%');
    pattern
}

/// Storefront catalog query. Hidden products are never listed here.
#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct ProductQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    #[serde(alias = "q")]
    pub search: Option<String>,
    pub category: Option<String>,
    pub subcategory: Option<String>,
    pub featured: Option<bool>,
    pub min_price: Option<i64>,
    pub max_price: Option<i64>,
    pub sort_by: Option<ProductSortBy>,
    #[serde(alias = "sort_order")]
    pub sort_direction: Option<SortOrder>,
    /// Shorthand used by category pages; wins over `sort_by`.
    pub sort: Option<CategorySort>,
}

impl ProductQuery {
    pub fn into_filter(self) -> ProductFilter {
        // An explicit sort column without a direction sorts ascending.
        let (sort_by, sort_order) = match (self.sort, self.sort_by) {
            (Some(sort), _) => sort.ordering(),
            (None, Some(by)) => (by, self.sort_direction.unwrap_or(SortOrder::Asc)),
            (None, None) => (
                ProductSortBy::CreatedAt,
                self.sort_direction.unwrap_or(SortOrder::Desc),
            ),
        };

        ProductFilter {
            search: non_empty(self.search),
            category: category_value(self.category),
            subcategory: category_value(self.subcategory),
            featured: self.featured.filter(|f| *f),
            visible: Some(true),
            min_price: self.min_price,
            max_price: self.max_price,
            sort_by,
            sort_order,
            pagination: Pagination {
                page: self.page,
                per_page: self.per_page,
            },
        }
    }
}

/// State of the admin product filter bar.
///
/// `price_ceiling` is the top of the price slider; range edges at `0` or at the
/// ceiling mean "unbounded".
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
#[serde(default)]
pub struct ProductFilterForm {
    pub search: String,
    pub category: String,
    /// `all`, `true` (visible) or `false` (hidden).
    pub in_stock: String,
    pub sort_by: ProductSortBy,
    pub sort_direction: SortOrder,
    pub min_price: i64,
    pub max_price: i64,
    pub price_ceiling: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub page: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub per_page: Option<i64>,
}

pub const DEFAULT_PRICE_CEILING: i64 = 100_000;

impl Default for ProductFilterForm {
    fn default() -> Self {
        Self::with_ceiling(DEFAULT_PRICE_CEILING)
    }
}

impl ProductFilterForm {
    pub fn with_ceiling(price_ceiling: i64) -> Self {
        Self {
            search: String::new(),
            category: ALL.to_string(),
            in_stock: ALL.to_string(),
            sort_by: ProductSortBy::CreatedAt,
            sort_direction: SortOrder::Desc,
            min_price: 0,
            max_price: price_ceiling,
            price_ceiling,
            page: None,
            per_page: None,
        }
    }

    /// Reset every field, keeping the slider ceiling.
    pub fn clear(&mut self) {
        *self = Self::with_ceiling(self.price_ceiling);
    }

    pub fn applied(&self) -> ProductFilter {
        let visible = match self.in_stock.as_str() {
            "true" => Some(true),
            "false" => Some(false),
            _ => None,
        };

        ProductFilter {
            search: non_empty(Some(self.search.clone())),
            category: category_value(Some(self.category.clone())),
            subcategory: None,
            featured: None,
            visible,
            min_price: (self.min_price > 0).then_some(self.min_price),
            max_price: (self.max_price < self.price_ceiling).then_some(self.max_price),
            sort_by: self.sort_by,
            sort_order: self.sort_direction,
            pagination: Pagination {
                page: self.page,
                per_page: self.per_page,
            },
        }
    }
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct OrderListQuery {
    pub page: Option<i64>,
    pub per_page: Option<i64>,
    pub status: Option<OrderStatus>,
    pub sort_order: Option<SortOrder>,
}

impl OrderListQuery {
    pub fn pagination(&self) -> Pagination {
        Pagination {
            page: self.page,
            per_page: self.per_page,
        }
    }
}
