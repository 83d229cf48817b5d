use sea_orm::EntityTrait;

use crate::{
    dto::wishlist::{ToggleWishlistRequest, ToggleWishlistResponse, WishlistProducts},
    entity::Products,
    error::{AppError, AppResult},
    response::{ApiResponse, Meta},
    services::product_service::products_by_ids,
    state::AppState,
    wishlist::Wishlist,
};

/// Flips a product in the caller's stored wishlist and returns the new value.
/// Only adding requires the product to exist; a stale id can always be removed.
pub async fn toggle(
    state: &AppState,
    payload: ToggleWishlistRequest,
) -> AppResult<ApiResponse<ToggleWishlistResponse>> {
    let ToggleWishlistRequest {
        mut wishlist,
        product_id,
    } = payload;

    if !wishlist.contains(product_id)
        && Products::find_by_id(product_id)
            .one(&state.orm)
            .await?
            .is_none()
    {
        return Err(AppError::NotFound);
    }

    let wishlisted = wishlist.toggle(product_id);
    tracing::debug!(%product_id, wishlisted, "wishlist toggled");

    let message = if wishlisted {
        "Added to wishlist"
    } else {
        "Removed from wishlist"
    };
    let storage_value = wishlist.to_storage();
    Ok(ApiResponse::success(
        message,
        ToggleWishlistResponse {
            wishlist,
            wishlisted,
            storage_value,
        },
        Some(Meta::empty()),
    ))
}

pub async fn products(
    state: &AppState,
    wishlist: Wishlist,
) -> AppResult<ApiResponse<WishlistProducts>> {
    let items = products_by_ids(state, wishlist.ids()).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(
        "Wishlist",
        WishlistProducts { items },
        Some(meta),
    ))
}
