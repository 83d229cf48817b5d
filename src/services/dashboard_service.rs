use chrono::{DateTime, Days, Months, Utc};
use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder, QuerySelect};

use crate::{
    dto::{
        dashboard::{ActivityEntry, ActivityList, DashboardSummary, RevenueChart},
        products::ProductList,
    },
    entity::{
        audit_logs::{Column as AuditCol, Entity as AuditLogs},
        products::{Column as ProdCol, Entity as Products},
    },
    error::AppResult,
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    revenue::{Timeframe, revenue_series},
    services::product_service::with_images,
    state::AppState,
};

const TOP_PRODUCTS: u64 = 5;
const RECENT_ACTIVITY: u64 = 20;

pub async fn summary(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<DashboardSummary>> {
    ensure_admin(user)?;
    let summary = sqlx::query_as::<_, DashboardSummary>(
        r#"
        SELECT
            (SELECT COUNT(*) FROM products) AS product_count,
            (SELECT COUNT(*) FROM products WHERE is_visible) AS visible_product_count,
            (SELECT COUNT(*) FROM orders) AS order_count,
            (SELECT COUNT(*) FROM orders WHERE status = 'pending') AS pending_order_count,
            (SELECT COALESCE(SUM(total_amount), 0)::BIGINT FROM orders) AS total_revenue
        "#,
    )
    .fetch_one(&state.pool)
    .await?;

    Ok(ApiResponse::success("Summary", summary, Some(Meta::empty())))
}

/// Revenue chart over the timeframe's lookback window. Orders of every status count.
pub async fn revenue(
    state: &AppState,
    user: &AuthUser,
    timeframe: Timeframe,
) -> AppResult<ApiResponse<RevenueChart>> {
    ensure_admin(user)?;
    let now = Utc::now();

    let orders: Vec<(DateTime<Utc>, i64)> = sqlx::query_as(
        "SELECT created_at, total_amount FROM orders WHERE created_at >= $1 ORDER BY created_at",
    )
    .bind(window_start(timeframe, now))
    .fetch_all(&state.pool)
    .await?;

    let points = revenue_series(&orders, timeframe, now);
    let total = points.iter().map(|p| p.revenue).sum();
    tracing::debug!(?timeframe, orders = orders.len(), buckets = points.len(), "revenue chart");

    Ok(ApiResponse::success(
        "Revenue",
        RevenueChart {
            timeframe,
            points,
            total,
        },
        Some(Meta::empty()),
    ))
}

/// Generous lower bound for the query; exact bucketing happens in `revenue_series`.
fn window_start(timeframe: Timeframe, now: DateTime<Utc>) -> DateTime<Utc> {
    let start = match timeframe {
        Timeframe::Daily => now.checked_sub_days(Days::new(15)),
        Timeframe::Weekly => now.checked_sub_days(Days::new(7 * 12)),
        Timeframe::Monthly => now.checked_sub_months(Months::new(7)),
    };
    start.unwrap_or(now)
}

/// Featured, visible products, newest first.
pub async fn top_products(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    let models = Products::find()
        .filter(ProdCol::IsFeatured.eq(true))
        .filter(ProdCol::IsVisible.eq(true))
        .order_by_desc(ProdCol::CreatedAt)
        .limit(TOP_PRODUCTS)
        .all(&state.orm)
        .await?;

    let items = with_images(state, models).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(
        "Top products",
        ProductList { items },
        Some(meta),
    ))
}

pub async fn recent_activity(
    state: &AppState,
    user: &AuthUser,
) -> AppResult<ApiResponse<ActivityList>> {
    ensure_admin(user)?;
    let items: Vec<ActivityEntry> = AuditLogs::find()
        .order_by_desc(AuditCol::CreatedAt)
        .limit(RECENT_ACTIVITY)
        .all(&state.orm)
        .await?
        .into_iter()
        .map(|log| ActivityEntry {
            id: log.id,
            user_id: log.user_id,
            action: log.action,
            resource: log.resource,
            metadata: log.metadata,
            created_at: log.created_at.with_timezone(&Utc),
        })
        .collect();

    let meta = Meta::count(items.len());
    Ok(ApiResponse::success(
        "Recent activity",
        ActivityList { items },
        Some(meta),
    ))
}
