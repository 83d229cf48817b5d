use sea_orm::{ColumnTrait, EntityTrait, QueryFilter, QueryOrder};
use uuid::Uuid;

use crate::{
    dto::{
        dashboard::{CustomerList, CustomerQuery, CustomerSummary},
        orders::OrderList,
    },
    entity::{
        orders::{Column as OrderCol, Entity as Orders},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    response::{ApiResponse, Meta},
    routes::params::{Pagination, like_pattern},
    services::order_service::joined_orders,
    state::AppState,
};

/// Buyers aggregated from their orders. Cancelled orders do not count.
pub async fn list_customers(
    state: &AppState,
    user: &AuthUser,
    query: CustomerQuery,
) -> AppResult<ApiResponse<CustomerList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = Pagination {
        page: query.page,
        per_page: query.per_page,
    }
    .normalize();
    let pattern = query
        .q
        .as_deref()
        .map(str::trim)
        .filter(|q| !q.is_empty())
        .map(like_pattern);

    let items = sqlx::query_as::<_, CustomerSummary>(
        r#"
        SELECT * FROM (
            SELECT
                o.user_id,
                (ARRAY_AGG(o.buyer_name ORDER BY o.created_at DESC))[1] AS name,
                COALESCE(u.email, '') AS email,
                COUNT(*) AS orders,
                COALESCE(SUM(o.total_amount), 0)::BIGINT AS total_spent,
                MAX(o.created_at) AS last_order
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            WHERE o.status <> 'cancelled'
            GROUP BY o.user_id, u.email
        ) c
        WHERE $1::TEXT IS NULL OR c.name ILIKE $1 OR c.email ILIKE $1
        ORDER BY c.last_order DESC
        LIMIT $2 OFFSET $3
        "#,
    )
    .bind(pattern.clone())
    .bind(limit)
    .bind(offset)
    .fetch_all(&state.pool)
    .await?;

    let total: (i64,) = sqlx::query_as(
        r#"
        SELECT COUNT(*) FROM (
            SELECT
                (ARRAY_AGG(o.buyer_name ORDER BY o.created_at DESC))[1] AS name,
                COALESCE(u.email, '') AS email
            FROM orders o
            LEFT JOIN users u ON u.id = o.user_id
            WHERE o.status <> 'cancelled'
            GROUP BY o.user_id, u.email
        ) c
        WHERE $1::TEXT IS NULL OR c.name ILIKE $1 OR c.email ILIKE $1
        "#,
    )
    .bind(pattern)
    .fetch_one(&state.pool)
    .await?;

    let meta = Meta::new(page, limit, total.0);
    Ok(ApiResponse::success("Customers", CustomerList { items }, Some(meta)))
}

pub async fn customer_orders(
    state: &AppState,
    user: &AuthUser,
    customer_id: Uuid,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let rows = Orders::find()
        .filter(OrderCol::UserId.eq(customer_id))
        .order_by_desc(OrderCol::CreatedAt)
        .find_also_related(Products)
        .all(&state.orm)
        .await?;
    if rows.is_empty() {
        return Err(AppError::NotFound);
    }

    let items = joined_orders(state, rows).await?;
    let meta = Meta::count(items.len());
    Ok(ApiResponse::success("Customer orders", OrderList { items }, Some(meta)))
}
