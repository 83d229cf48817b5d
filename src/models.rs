use std::{fmt, str::FromStr};

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;
use uuid::Uuid;

use crate::error::AppError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Admin,
    Buyer,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct AppUser {
    pub id: Uuid,
    pub email: String,
    pub role: Role,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
pub enum ProductCondition {
    #[serde(rename = "new")]
    New,
    #[serde(rename = "like new", alias = "like-new", alias = "like_new")]
    LikeNew,
    #[serde(rename = "good")]
    Good,
    #[serde(rename = "fair")]
    Fair,
}

impl ProductCondition {
    pub fn as_str(&self) -> &'static str {
        match self {
            ProductCondition::New => "new",
            ProductCondition::LikeNew => "like new",
            ProductCondition::Good => "good",
            ProductCondition::Fair => "fair",
        }
    }
}

impl FromStr for ProductCondition {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "new" => Ok(ProductCondition::New),
            "like new" | "like-new" | "like_new" => Ok(ProductCondition::LikeNew),
            "good" => Ok(ProductCondition::Good),
            "fair" => Ok(ProductCondition::Fair),
            _ => Err(AppError::BadRequest(format!("Invalid condition: {s}"))),
        }
    }
}

/// Catalog product as served to the storefront.
///
/// Rows keep a single `category` path such as `women/outerwear`; it is split
/// into `category` and `subcategory` here. `discount_percent` is derived from
/// the two prices and never stored.
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Product {
    pub id: Uuid,
    pub name: String,
    pub description: String,
    pub category: String,
    pub subcategory: String,
    pub price: i64,
    pub original_price: Option<i64>,
    pub discount_percent: Option<i64>,
    pub images: Vec<String>,
    pub sizes: Vec<String>,
    pub brand: String,
    pub condition: ProductCondition,
    pub featured: bool,
    pub in_stock: bool,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum OrderStatus {
    Pending,
    Confirmed,
    Shipped,
    Delivered,
    Cancelled,
}

impl OrderStatus {
    pub const ALL: [OrderStatus; 5] = [
        OrderStatus::Pending,
        OrderStatus::Confirmed,
        OrderStatus::Shipped,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Confirmed => "confirmed",
            OrderStatus::Shipped => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
        }
    }
}

impl fmt::Display for OrderStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for OrderStatus {
    type Err = AppError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        OrderStatus::ALL
            .into_iter()
            .find(|status| status.as_str() == s)
            .ok_or_else(|| AppError::BadRequest("Invalid order status".into()))
    }
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Order {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub product_id: Uuid,
    pub status: OrderStatus,
    pub quantity: i32,
    pub size: String,
    pub total_amount: i64,
    /// Object path inside the `payment-proofs` bucket.
    pub payment_proof_url: Option<String>,
    pub buyer_name: String,
    pub buyer_address: String,
    pub buyer_phone: String,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product: Option<Product>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountType {
    Percentage,
    Fixed,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "lowercase")]
pub enum DiscountStatus {
    Active,
    Inactive,
    Expired,
}

#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
pub struct Discount {
    pub id: Uuid,
    pub code: String,
    #[serde(rename = "type")]
    pub kind: DiscountType,
    pub value: i64,
    pub min_purchase: i64,
    /// `None` means unlimited.
    pub max_uses: Option<i64>,
    pub used_count: i64,
    pub start_date: DateTime<Utc>,
    pub end_date: DateTime<Utc>,
    pub is_active: bool,
}

impl Discount {
    pub fn status_at(&self, now: DateTime<Utc>) -> DiscountStatus {
        if now > self.end_date {
            DiscountStatus::Expired
        } else if self.is_active {
            DiscountStatus::Active
        } else {
            DiscountStatus::Inactive
        }
    }
}
