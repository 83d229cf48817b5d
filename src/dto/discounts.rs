use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::models::{Discount, DiscountStatus, DiscountType};

/// Create/edit form of the discount manager. Dates are calendar days in UTC;
/// a discount runs from the start of `start_date` to the end of `end_date`.
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct DiscountForm {
    pub code: String,
    #[serde(rename = "type")]
    pub kind: DiscountType,
    /// Percent for `percentage`, minor units for `fixed`.
    pub value: i64,
    #[serde(default)]
    pub min_purchase: i64,
    /// Omit for unlimited uses.
    pub max_uses: Option<i64>,
    pub start_date: NaiveDate,
    pub end_date: NaiveDate,
    #[serde(default = "default_active")]
    pub is_active: bool,
}

fn default_active() -> bool {
    true
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct DiscountView {
    #[serde(flatten)]
    pub discount: Discount,
    pub status: DiscountStatus,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct DiscountList {
    pub items: Vec<DiscountView>,
}
