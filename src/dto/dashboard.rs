use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

use crate::revenue::{RevenuePoint, Timeframe};

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct RevenueQuery {
    #[serde(default)]
    pub timeframe: Timeframe,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct RevenueChart {
    pub timeframe: Timeframe,
    pub points: Vec<RevenuePoint>,
    pub total: i64,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct DashboardSummary {
    pub product_count: i64,
    pub visible_product_count: i64,
    pub order_count: i64,
    pub pending_order_count: i64,
    pub total_revenue: i64,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityEntry {
    pub id: Uuid,
    pub user_id: Option<Uuid>,
    pub action: String,
    pub resource: Option<String>,
    pub metadata: Option<serde_json::Value>,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct ActivityList {
    pub items: Vec<ActivityEntry>,
}

#[derive(Debug, Serialize, ToSchema, sqlx::FromRow)]
pub struct CustomerSummary {
    pub user_id: Option<Uuid>,
    pub name: String,
    pub email: String,
    pub orders: i64,
    pub total_spent: i64,
    pub last_order: DateTime<Utc>,
}

#[derive(Debug, Serialize, ToSchema)]
pub struct CustomerList {
    pub items: Vec<CustomerSummary>,
}

#[derive(Debug, Default, Deserialize, ToSchema, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct CustomerQuery {
    /// Case-insensitive match on buyer name or email.
    pub q: Option<String>,
    pub page: Option<i64>,
    pub per_page: Option<i64>,
}
