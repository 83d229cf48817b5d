use chrono::Utc;
use sea_orm::ActiveValue::Set;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::{
        orders::{OrderList, UpdateOrderStatusRequest},
        products::ProductList,
    },
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders},
        products::Entity as Products,
    },
    error::{AppError, AppResult},
    middleware::auth::{AuthUser, ensure_admin},
    models::Order,
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, ProductFilterForm, SortOrder},
    services::{
        order_service::{joined_order, joined_orders, order_from_entity},
        product_service,
    },
    state::AppState,
    storage::Bucket,
};

pub async fn list_products(
    state: &AppState,
    user: &AuthUser,
    form: ProductFilterForm,
) -> AppResult<ApiResponse<ProductList>> {
    ensure_admin(user)?;
    product_service::list_products(state, form.applied()).await
}

pub async fn list_all_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    ensure_admin(user)?;
    let (page, limit, offset) = query.pagination().normalize();

    let mut condition = Condition::all();
    if let Some(status) = query.status {
        condition = condition.add(OrderCol::Status.eq(status.as_str()));
    }

    let mut finder = Orders::find().filter(condition);
    finder = match query.sort_order.unwrap_or(SortOrder::Desc) {
        SortOrder::Asc => finder.order_by_asc(OrderCol::CreatedAt),
        SortOrder::Desc => finder.order_by_desc(OrderCol::CreatedAt),
    };

    let total = finder.clone().count(&state.orm).await? as i64;

    let rows = finder
        .find_also_related(Products)
        .limit(limit as u64)
        .offset(offset as u64)
        .all(&state.orm)
        .await?;
    let items = joined_orders(state, rows).await?;

    let meta = Meta::new(page, limit, total);
    Ok(ApiResponse::success("Orders", OrderList { items }, Some(meta)))
}

pub async fn get_order_admin(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let (order, product) = Orders::find_by_id(id)
        .find_also_related(Products)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let order = joined_order(state, order, product).await?;
    Ok(ApiResponse::success(
        "Order found",
        order,
        Some(Meta::empty()),
    ))
}

/// Sets any status regardless of the current one; there is no transition table.
pub async fn update_order_status(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    payload: UpdateOrderStatusRequest,
) -> AppResult<ApiResponse<Order>> {
    ensure_admin(user)?;
    let status = payload.parsed()?;

    let existing = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let previous = existing.status.clone();

    let mut active: OrderActive = existing.into();
    active.status = Set(status.as_str().to_string());
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;
    tracing::info!(order_id = %order.id, from = %previous, to = %status, "order status updated");

    audit::record(
        &state.pool,
        user.user_id,
        "order_status_update",
        "orders",
        serde_json::json!({ "order_id": order.id, "from": previous, "status": order.status }),
    )
    .await;

    Ok(ApiResponse::success(
        "Order updated",
        order_from_entity(order)?,
        Some(Meta::empty()),
    ))
}

/// Raw bytes of an order's payment proof with a content type guessed from the name.
pub async fn payment_proof(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<(Vec<u8>, &'static str)> {
    ensure_admin(user)?;
    let order = Orders::find_by_id(id)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;
    let path = order.payment_proof_url.ok_or(AppError::NotFound)?;

    let bytes = state.storage.read(Bucket::PaymentProofs, &path).await?;
    Ok((bytes, image_content_type(&path)))
}

pub fn image_content_type(path: &str) -> &'static str {
    match crate::storage::file_extension(path).as_str() {
        "png" => "image/png",
        "jpg" | "jpeg" => "image/jpeg",
        "gif" => "image/gif",
        "webp" => "image/webp",
        "svg" => "image/svg+xml",
        _ => "application/octet-stream",
    }
}
