use axum::Json;
use chrono::Utc;

use crate::{
    promotions::{PromotionBanner, banner_at},
    response::{ApiResponse, Meta},
};

#[utoipa::path(
    get,
    path = "/api/promotions",
    responses(
        (status = 200, description = "Rotating promotion banner", body = ApiResponse<PromotionBanner>),
    ),
    tag = "Promotions"
)]
pub async fn promotion_banner() -> Json<ApiResponse<PromotionBanner>> {
    let banner = banner_at(Utc::now());
    let meta = Meta::count(banner.items.len());
    Json(ApiResponse::success("Promotions", banner, Some(meta)))
}
