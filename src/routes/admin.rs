use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::{StatusCode, header},
    response::IntoResponse,
    routing::{get, patch},
};
use uuid::Uuid;

use crate::{
    dto::{
        dashboard::{
            ActivityList, CustomerList, CustomerQuery, DashboardSummary, RevenueChart, RevenueQuery,
        },
        discounts::{DiscountForm, DiscountList, DiscountView},
        orders::{OrderList, UpdateOrderStatusRequest},
        products::ProductList,
    },
    error::AppResult,
    middleware::auth::AuthUser,
    models::Order,
    response::ApiResponse,
    routes::params::{OrderListQuery, ProductFilterForm},
    services::{
        admin_service, customer_service, dashboard_service, discount_service, product_service,
    },
    state::AppState,
};

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/orders", get(list_all_orders))
        .route("/orders/{id}", get(get_order_admin))
        .route("/orders/{id}/status", patch(update_order_status))
        .route("/orders/{id}/payment-proof", get(payment_proof))
        .route("/products", get(list_products))
        .route("/products/filter-defaults", get(filter_defaults))
        .route("/dashboard/summary", get(dashboard_summary))
        .route("/dashboard/revenue", get(revenue_chart))
        .route("/dashboard/top-products", get(top_products))
        .route("/dashboard/activity", get(recent_activity))
        .route("/customers", get(list_customers))
        .route("/customers/{id}/orders", get(customer_orders))
        .route("/discounts", get(list_discounts).post(create_discount))
        .route(
            "/discounts/{id}",
            get(get_discount).put(update_discount).delete(delete_discount),
        )
        .route("/discounts/{id}/toggle", patch(toggle_discount))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders",
    params(OrderListQuery),
    responses(
        (status = 200, description = "Get all orders (admin only)", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
        (status = 500, description = "Internal Server Error"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_all_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<OrderListQuery>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = admin_service::list_all_orders(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Get any order with its product (admin only)", body = ApiResponse<Order>),
        (status = 404, description = "Not Found"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn get_order_admin(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::get_order_admin(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/orders/{id}/status",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    request_body = UpdateOrderStatusRequest,
    responses(
        (status = 200, description = "Update order status", body = ApiResponse<Order>),
        (status = 400, description = "Invalid status"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn update_order_status(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(payload): Json<UpdateOrderStatusRequest>,
) -> AppResult<Json<ApiResponse<Order>>> {
    let resp = admin_service::update_order_status(&state, &user, id, payload).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/orders/{id}/payment-proof",
    params(
        ("id" = Uuid, Path, description = "Order ID")
    ),
    responses(
        (status = 200, description = "Payment proof image", content_type = "application/octet-stream"),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "Order or proof not found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn payment_proof(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<impl IntoResponse> {
    let (bytes, content_type) = admin_service::payment_proof(&state, &user, id).await?;
    Ok((StatusCode::OK, [(header::CONTENT_TYPE, content_type)], bytes))
}

#[utoipa::path(
    get,
    path = "/api/admin/products",
    params(ProductFilterForm),
    responses(
        (status = 200, description = "Products including hidden ones", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn list_products(
    State(state): State<AppState>,
    user: AuthUser,
    Query(form): Query<ProductFilterForm>,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = admin_service::list_products(&state, &user, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/products/filter-defaults",
    responses(
        (status = 200, description = "Cleared filter bar state", body = ApiResponse<ProductFilterForm>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Admin"
)]
pub async fn filter_defaults(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProductFilterForm>>> {
    let resp = product_service::filter_defaults(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/summary",
    responses(
        (status = 200, description = "Store totals", body = ApiResponse<DashboardSummary>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn dashboard_summary(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DashboardSummary>>> {
    let resp = dashboard_service::summary(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/revenue",
    params(RevenueQuery),
    responses(
        (status = 200, description = "Revenue per period", body = ApiResponse<RevenueChart>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn revenue_chart(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<RevenueQuery>,
) -> AppResult<Json<ApiResponse<RevenueChart>>> {
    let resp = dashboard_service::revenue(&state, &user, query.timeframe).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/top-products",
    responses(
        (status = 200, description = "Featured products", body = ApiResponse<ProductList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn top_products(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ProductList>>> {
    let resp = dashboard_service::top_products(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/dashboard/activity",
    responses(
        (status = 200, description = "Latest audit entries", body = ApiResponse<ActivityList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Dashboard"
)]
pub async fn recent_activity(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<ActivityList>>> {
    let resp = dashboard_service::recent_activity(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/customers",
    params(CustomerQuery),
    responses(
        (status = 200, description = "Buyers aggregated from orders", body = ApiResponse<CustomerList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn list_customers(
    State(state): State<AppState>,
    user: AuthUser,
    Query(query): Query<CustomerQuery>,
) -> AppResult<Json<ApiResponse<CustomerList>>> {
    let resp = customer_service::list_customers(&state, &user, query).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/customers/{id}/orders",
    params(
        ("id" = Uuid, Path, description = "Customer user ID")
    ),
    responses(
        (status = 200, description = "Orders of one customer", body = ApiResponse<OrderList>),
        (status = 403, description = "Forbidden"),
        (status = 404, description = "No orders for this customer"),
    ),
    security(("bearer_auth" = [])),
    tag = "Customers"
)]
pub async fn customer_orders(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<OrderList>>> {
    let resp = customer_service::customer_orders(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/discounts",
    responses(
        (status = 200, description = "All discount codes", body = ApiResponse<DiscountList>),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn list_discounts(
    State(state): State<AppState>,
    user: AuthUser,
) -> AppResult<Json<ApiResponse<DiscountList>>> {
    let resp = discount_service::list_discounts(&state, &user).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    get,
    path = "/api/admin/discounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Discount ID")
    ),
    responses(
        (status = 200, description = "Discount", body = ApiResponse<DiscountView>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn get_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DiscountView>>> {
    let resp = discount_service::get_discount(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    post,
    path = "/api/admin/discounts",
    request_body = DiscountForm,
    responses(
        (status = 201, description = "Discount created", body = ApiResponse<DiscountView>),
        (status = 400, description = "Invalid discount"),
        (status = 403, description = "Forbidden"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn create_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Json(form): Json<DiscountForm>,
) -> AppResult<(StatusCode, Json<ApiResponse<DiscountView>>)> {
    let resp = discount_service::create_discount(&state, &user, form).await?;
    Ok((StatusCode::CREATED, Json(resp)))
}

#[utoipa::path(
    put,
    path = "/api/admin/discounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Discount ID")
    ),
    request_body = DiscountForm,
    responses(
        (status = 200, description = "Discount updated", body = ApiResponse<DiscountView>),
        (status = 400, description = "Invalid discount"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn update_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
    Json(form): Json<DiscountForm>,
) -> AppResult<Json<ApiResponse<DiscountView>>> {
    let resp = discount_service::update_discount(&state, &user, id, form).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    delete,
    path = "/api/admin/discounts/{id}",
    params(
        ("id" = Uuid, Path, description = "Discount ID")
    ),
    responses(
        (status = 200, description = "Discount deleted", body = ApiResponse<serde_json::Value>),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn delete_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<serde_json::Value>>> {
    let resp = discount_service::delete_discount(&state, &user, id).await?;
    Ok(Json(resp))
}

#[utoipa::path(
    patch,
    path = "/api/admin/discounts/{id}/toggle",
    params(
        ("id" = Uuid, Path, description = "Discount ID")
    ),
    responses(
        (status = 200, description = "Active flag flipped", body = ApiResponse<DiscountView>),
        (status = 400, description = "Discount has expired"),
        (status = 404, description = "Not Found"),
    ),
    security(("bearer_auth" = [])),
    tag = "Discounts"
)]
pub async fn toggle_discount(
    State(state): State<AppState>,
    user: AuthUser,
    Path(id): Path<Uuid>,
) -> AppResult<Json<ApiResponse<DiscountView>>> {
    let resp = discount_service::toggle_discount(&state, &user, id).await?;
    Ok(Json(resp))
}
