use chrono::Utc;
use sea_orm::ActiveValue::NotSet;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, Condition, EntityTrait, PaginatorTrait, QueryFilter, QueryOrder,
    QuerySelect, Set,
};
use uuid::Uuid;

use crate::{
    audit,
    dto::orders::{CheckoutForm, OrderList, PaymentProof},
    entity::{
        orders::{ActiveModel as OrderActive, Column as OrderCol, Entity as Orders, Model as OrderModel},
        products::{Entity as Products, Model as ProductModel},
    },
    error::{AppError, AppResult},
    middleware::auth::AuthUser,
    models::{Order, OrderStatus},
    response::{ApiResponse, Meta},
    routes::params::{OrderListQuery, SortOrder},
    services::product_service::{UploadedFile, product_from_entity, product_images},
    state::AppState,
    storage::{Bucket, file_extension},
};

pub async fn list_orders(
    state: &AppState,
    user: &AuthUser,
    query: OrderListQuery,
) -> AppResult<ApiResponse<OrderList>> {
    let (page, limit, offset) = query.pagination().normalize();
    let mut condition = Condition::all().add(OrderCol::UserId.eq(user.user_id));
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
    Ok(ApiResponse::success("Ok", OrderList { items }, Some(meta)))
}

pub async fn get_order(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
) -> AppResult<ApiResponse<Order>> {
    let row = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .find_also_related(Products)
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let order = joined_order(state, row.0, row.1).await?;
    Ok(ApiResponse::success("OK", order, Some(Meta::empty())))
}

/// Validates the form, stores the payment proof under a fresh id, then inserts
/// a `pending` order.
///
/// The two writes are independent: a failed insert leaves the uploaded proof
/// behind, and submitting twice creates two orders.
pub async fn checkout(
    state: &AppState,
    user: &AuthUser,
    form: CheckoutForm,
) -> AppResult<ApiResponse<Order>> {
    let request = form.validate()?;

    let product = Products::find_by_id(request.product_id)
        .one(&state.orm)
        .await?
        .filter(|p| p.is_visible)
        .ok_or_else(|| AppError::BadRequest("Product not found".into()))?;

    if !product.sizes.is_empty() && !product.sizes.contains(&request.size) {
        return Err(AppError::BadRequest(format!(
            "Size {} is not available",
            request.size
        )));
    }

    let total_amount = product
        .price
        .checked_mul(i64::from(request.quantity))
        .ok_or_else(|| AppError::BadRequest("quantity is too large".into()))?;

    let proof_path = format!(
        "{}.{}",
        Uuid::new_v4(),
        file_extension(&request.payment_proof.file_name)
    );
    state
        .storage
        .upload(Bucket::PaymentProofs, &proof_path, &request.payment_proof.bytes)
        .await?;

    let order = OrderActive {
        id: Set(Uuid::new_v4()),
        user_id: Set(Some(user.user_id)),
        product_id: Set(product.id),
        status: Set(OrderStatus::Pending.as_str().to_string()),
        quantity: Set(request.quantity),
        size: Set(request.size),
        total_amount: Set(total_amount),
        payment_proof_url: Set(Some(proof_path)),
        buyer_name: Set(request.buyer_name),
        buyer_address: Set(request.buyer_address),
        buyer_phone: Set(request.buyer_phone),
        created_at: NotSet,
        updated_at: NotSet,
    }
    .insert(&state.orm)
    .await?;
    tracing::info!(order_id = %order.id, product_id = %product.id, total_amount, "order placed");

    audit::record(
        &state.pool,
        user.user_id,
        "checkout",
        "orders",
        serde_json::json!({ "order_id": order.id, "product_id": product.id }),
    )
    .await;

    let order = joined_order(state, order, Some(product)).await?;
    Ok(ApiResponse::success(
        "Order placed",
        order,
        Some(Meta::empty()),
    ))
}

/// Replaces the payment proof of one of the caller's orders.
/// The file is stored as `<order id>_<millis>.<ext>`.
pub async fn upload_payment_proof(
    state: &AppState,
    user: &AuthUser,
    id: Uuid,
    file: UploadedFile,
) -> AppResult<ApiResponse<PaymentProof>> {
    file.ensure_image()?;
    let order = Orders::find()
        .filter(
            Condition::all()
                .add(OrderCol::UserId.eq(user.user_id))
                .add(OrderCol::Id.eq(id)),
        )
        .one(&state.orm)
        .await?
        .ok_or(AppError::NotFound)?;

    let path = format!(
        "{}_{}.{}",
        order.id,
        Utc::now().timestamp_millis(),
        file_extension(&file.file_name)
    );
    state
        .storage
        .upload(Bucket::PaymentProofs, &path, &file.bytes)
        .await?;

    let mut active: OrderActive = order.into();
    active.payment_proof_url = Set(Some(path.clone()));
    active.updated_at = Set(Utc::now().into());
    let order = active.update(&state.orm).await?;

    audit::record(
        &state.pool,
        user.user_id,
        "payment_proof_upload",
        "orders",
        serde_json::json!({ "order_id": order.id }),
    )
    .await;

    Ok(ApiResponse::success(
        "Payment proof uploaded",
        PaymentProof {
            order_id: order.id,
            path,
        },
        Some(Meta::empty()),
    ))
}

pub async fn joined_orders(
    state: &AppState,
    rows: Vec<(OrderModel, Option<ProductModel>)>,
) -> AppResult<Vec<Order>> {
    let mut items = Vec::with_capacity(rows.len());
    for (order, product) in rows {
        items.push(joined_order(state, order, product).await?);
    }
    Ok(items)
}

pub async fn joined_order(
    state: &AppState,
    order: OrderModel,
    product: Option<ProductModel>,
) -> AppResult<Order> {
    let product = match product {
        Some(model) => {
            let images = product_images(state, model.id).await?;
            Some(product_from_entity(model, images))
        }
        None => None,
    };
    let mut order = order_from_entity(order)?;
    order.product = product;
    Ok(order)
}

pub fn order_from_entity(model: OrderModel) -> AppResult<Order> {
    let status = model.status.parse::<OrderStatus>().map_err(|_| {
        AppError::Internal(anyhow::anyhow!(
            "order {} has unknown status {}",
            model.id,
            model.status
        ))
    })?;

    Ok(Order {
        id: model.id,
        user_id: model.user_id,
        product_id: model.product_id,
        status,
        quantity: model.quantity,
        size: model.size,
        total_amount: model.total_amount,
        payment_proof_url: model.payment_proof_url,
        buyer_name: model.buyer_name,
        buyer_address: model.buyer_address,
        buyer_phone: model.buyer_phone,
        created_at: model.created_at.with_timezone(&Utc),
        updated_at: model.updated_at.with_timezone(&Utc),
        product: None,
    })
}
