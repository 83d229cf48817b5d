use serde::{Deserialize, Deserializer, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::models::{Product, ProductCondition};

#[derive(Debug, Deserialize, ToSchema)]
pub struct CreateProductRequest {
    pub title: String,
    pub description: Option<String>,
    pub price: i64,
    pub original_price: Option<i64>,
    /// `women`, `men/shirts`, `watches/vintage`...
    pub category: String,
    pub brand: Option<String>,
    pub condition: ProductCondition,
    #[serde(default)]
    pub sizes: Vec<String>,
    #[serde(default = "default_true")]
    pub is_visible: bool,
    #[serde(default)]
    pub is_featured: bool,
}

fn default_true() -> bool {
    true
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct UpdateProductRequest {
    pub title: Option<String>,
    pub description: Option<String>,
    pub price: Option<i64>,
    /// `Some(None)` clears the original price.
    #[serde(default, deserialize_with = "present_or_null")]
    #[schema(value_type = Option<i64>)]
    pub original_price: Option<Option<i64>>,
    pub category: Option<String>,
    pub brand: Option<String>,
    pub condition: Option<ProductCondition>,
    pub sizes: Option<Vec<String>>,
    pub is_visible: Option<bool>,
    pub is_featured: Option<bool>,
}

/// Distinguishes an absent field from an explicit `null`.
fn present_or_null<'de, D, T>(deserializer: D) -> Result<Option<Option<T>>, D::Error>
where
    D: Deserializer<'de>,
    T: Deserialize<'de>,
{
    Option::<T>::deserialize(deserializer).map(Some)
}

#[derive(Serialize, ToSchema)]
#[serde(transparent)]
pub struct ProductList {
    #[schema(value_type = Vec<Product>)]
    pub items: Vec<Product>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductImage {
    pub product_id: Uuid,
    pub file_name: String,
    pub url: String,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ProductImageList {
    pub items: Vec<ProductImage>,
}
