use axum::{
    Json, Router,
    extract::{Multipart, Path, Query, State},
    http::StatusCode,
    routing::{get, post},
};
use uuid::Uuid;

use crate::{
    dto::orders::{CheckoutForm, OrderList, PaymentProof},
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::{params::OrderListQuery, upload},
    services::order_service,
    state::AppState,
};

const PROOF_FIELD: &str = "payment_proof";

pub fn route() -> Router<AppState> {
    Router::new()
        .route("/", get(list_order))
        .route("/checkout", post(checkout))
        .route("/{id}", get(get_order))
        .route("/{id}/payment-proof", post(upload_payment_proof))
}

#[utoipa::path(
    get,
    path = "/api/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Orders of the caller, newest first", body = ApiResponse<OrderList>),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn list_order(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = order_service::list_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

/// Multipart checkout: text parts for the order fields and the proof image in
/// `payment_proof`.
#[utoipa::path(
    post,
    path = "/api/orders/checkout",
    request_body(
        content_type = "multipart/form-data",
        description = "product_id, size, quantity, buyer_name, buyer_address, buyer_phone, payment_proof"
    ),
    responses(
        (status = 201, description = "Order placed", body = ApiResponse<Order>),
        (status = 400, description = "Validation failed"),
        (status = 401, description = "Not signed in")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn checkout(
    State(state): State<AppState>,
    user: AuthUser,
    mut multipart: Multipart,
) -> AppResult<(StatusCode, Json<ApiResponse<Order>>)> {
    let mut form = CheckoutForm::default();
    while let Some(field) = upload::next_field(&mut multipart).await? {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if name == PROOF_FIELD {
            let file = upload::read_file(field).await?;
            if !file.bytes.is_empty() {
                form.payment_proof = Some(file);
            }
        } else {
            let value = upload::read_text(field).await?;
            form.set_text(&name, value);
        }
    }

    let resp = order_service::checkout(&state, &user, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    get,
    path = "/api/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Order with its product", body = ApiResponse<Order>),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn get_order(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = order_service::get_order(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/orders/{id}/payment-proof",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body(content_type = "multipart/form-data", description = "Image in the `file` part"),
    responses(
        (status = 200, description = "Payment proof replaced", body = ApiResponse<PaymentProof>),
        (status = 400, description = "Missing or non-image file"),
        (status = 404, description = "Not Found")
    ),
    security(("bearer_auth" = [])),
    tag = "Orders"
)]
pub async fn upload_payment_proof(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> AppResult<Json<ApiResponse<PaymentProof>>> {
    let file = upload::single_file(multipart).await?;
    let resp = order_service::upload_payment_proof(&state, &user, id, file).await?;
    Ok(Json(resp))
}
