use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::{models::Product, wishlist::Wishlist};

/// The stored wishlist plus the product being toggled.
#[derive(Debug, Deserialize, ToSchema)]
pub struct ToggleWishlistRequest {
    #[serde(default)]
    #[schema(value_type = Vec<Uuid>)]
    pub wishlist: Wishlist,
    pub product_id: Uuid,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ToggleWishlistResponse {
    #[schema(value_type = Vec<Uuid>)]
    pub wishlist: Wishlist,
    /// Whether the product is wishlisted after the toggle.
    pub wishlisted: bool,
    /// Value to write back under the `wishlist` storage key.
    pub storage_value: String,
}

#[derive(Debug, Deserialize, ToSchema)]
pub struct WishlistProductsRequest {
    #[serde(default)]
    #[schema(value_type = Vec<Uuid>)]
    pub wishlist: Wishlist,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct WishlistProducts {
    pub items: Vec<Product>,
}
