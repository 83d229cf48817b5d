use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;
use utoipa::ToSchema;

pub const ROTATION_INTERVAL: Duration = Duration::from_secs(5);

pub const PROMOTIONS: [&str; 4] = [
    "Free Shipping on Orders Above ₹999",
    "Buy 2 Get 1 Free on Selected Items",
    "Flat 30% Off on New Arrivals",
    "Limited Time: Use Code FURBISH20 for Extra 20% Off",
];

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct PromotionBanner {
    pub items: Vec<String>,
    pub rotate_every_secs: u64,
    pub current_index: usize,
    pub current: String,
}

/// Index of the message on screen at `now`, advancing once per interval.
pub fn current_index(now: DateTime<Utc>, len: usize) -> usize {
    if len == 0 {
        return 0;
    }
    let ticks = now.timestamp().max(0) as u64 / ROTATION_INTERVAL.as_secs();
    (ticks % len as u64) as usize
}

pub fn banner_at(now: DateTime<Utc>) -> PromotionBanner {
    let current_index = current_index(now, PROMOTIONS.len());
    PromotionBanner {
        items: PROMOTIONS.iter().map(|p| p.to_string()).collect(),
        rotate_every_secs: ROTATION_INTERVAL.as_secs(),
        current_index,
        current: PROMOTIONS[current_index].to_string(),
    }
}
