use axum::{Json, Router, extract::State, routing::post};

use crate::{
    dto::wishlist::{
        ToggleWishlistRequest, ToggleWishlistResponse, WishlistProducts, WishlistProductsRequest,
    },
    error::AppResult,
    response::ApiResponse,
    services::wishlist_service,
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/toggle", post(toggle))
        .route("/products", post(products))
}

#[utoipa::path(
    post,
    path = "/api/wishlist/toggle",
    request_body = ToggleWishlistRequest,
    responses(
        (status = 200, description = "Updated wishlist to store", body = ApiResponse<ToggleWishlistResponse>),
        (status = 404, description = "Product not found")
    ),
    tag = "Wishlist"
)]
pub async fn toggle(
    State(state): State<AppState>,
    Json(payload): Json<ToggleWishlistRequest>,
) -> AppResult<Json<ApiResponse<ToggleWishlistResponse>>> {
    let resp = wishlist_service::toggle(&state, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/wishlist/products",
    request_body = WishlistProductsRequest,
    responses(
        (status = 200, description = "Visible products of a stored wishlist", body = ApiResponse<WishlistProducts>)
    ),
    tag = "Wishlist"
)]
pub async fn products(
    State(state): State<AppState>,
    Json(payload): Json<WishlistProductsRequest>,
) -> AppResult<Json<ApiResponse<WishlistProducts>>> {
    let resp = wishlist_service::products(&state, payload.wishlist).await?;
    Ok(Json(resp))
}
