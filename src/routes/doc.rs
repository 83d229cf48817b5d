use utoipa::{
    Modify, OpenApi,
    openapi::{
        self,
        OpenApi as OpenApiSpec,
        security::{HttpAuthScheme, HttpBuilder, SecurityScheme},
    },
};
use utoipa_scalar::{Scalar, Servable};

use crate::{
    dto::{
        auth::{GuardQuery, GuardResponse, LoginRequest, LoginResponse, RegisterRequest},
        dashboard::{
            ActivityEntry, ActivityList, CustomerList, CustomerQuery, CustomerSummary,
            DashboardSummary, RevenueChart, RevenueQuery,
        },
        discounts::{DiscountForm, DiscountList, DiscountView},
        orders::{OrderList, PaymentProof, UpdateOrderStatusRequest},
        products::{
            CreateProductRequest, ProductImage, ProductImageList, ProductList,
            UpdateProductRequest,
        },
        wishlist::{
            ToggleWishlistRequest, ToggleWishlistResponse, WishlistProducts,
            WishlistProductsRequest,
        },
    },
    middleware::auth::Access,
    models::{
        AppUser, Discount, DiscountStatus, DiscountType, Order, OrderStatus, Product,
        ProductCondition, Role,
    },
    promotions::PromotionBanner,
    response::{ApiResponse, Meta},
    revenue::{RevenuePoint, Timeframe},
    routes::{admin, auth, health, orders, params, products as product_routes, promotions, wishlist},
};

struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearer_auth",
            SecurityScheme::Http(
                HttpBuilder::new()
                    .scheme(HttpAuthScheme::Bearer)
                    .bearer_format("JWT")
                    .build(),
            ),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health::health_check,
        auth::login,
        auth::register,
        auth::me,
        auth::guard,
        product_routes::list_products,
        product_routes::create_product,
        product_routes::get_product,
        product_routes::update_product,
        product_routes::delete_product,
        product_routes::list_images,
        product_routes::upload_image,
        product_routes::delete_image,
        orders::list_order,
        orders::checkout,
        orders::get_order,
        orders::upload_payment_proof,
        admin::list_all_orders,
        admin::get_order_admin,
        admin::update_order_status,
        admin::payment_proof,
        admin::list_products,
        admin::filter_defaults,
        admin::dashboard_summary,
        admin::revenue_chart,
        admin::top_products,
        admin::recent_activity,
        admin::list_customers,
        admin::customer_orders,
        admin::list_discounts,
        admin::get_discount,
        admin::create_discount,
        admin::update_discount,
        admin::delete_discount,
        admin::toggle_discount,
        wishlist::toggle,
        wishlist::products,
        promotions::promotion_banner
    ),
    components(
        schemas(
            AppUser,
            Role,
            Product,
            ProductCondition,
            Order,
            OrderStatus,
            Discount,
            DiscountType,
            DiscountStatus,
            Access,
            RegisterRequest,
            LoginRequest,
            LoginResponse,
            GuardQuery,
            GuardResponse,
            CreateProductRequest,
            UpdateProductRequest,
            ProductList,
            ProductImage,
            ProductImageList,
            OrderList,
            PaymentProof,
            UpdateOrderStatusRequest,
            DashboardSummary,
            RevenueQuery,
            RevenueChart,
            RevenuePoint,
            Timeframe,
            ActivityEntry,
            ActivityList,
            CustomerSummary,
            CustomerList,
            CustomerQuery,
            DiscountForm,
            DiscountView,
            DiscountList,
            ToggleWishlistRequest,
            ToggleWishlistResponse,
            WishlistProductsRequest,
            WishlistProducts,
            PromotionBanner,
            params::Pagination,
            params::ProductQuery,
            params::ProductFilterForm,
            params::OrderListQuery,
            params::SortOrder,
            params::ProductSortBy,
            params::CategorySort,
            Meta,
            ApiResponse<Product>,
            ApiResponse<ProductList>,
            ApiResponse<Order>,
            ApiResponse<OrderList>,
            ApiResponse<AppUser>
        )
    ),
    security(
        ("bearer_auth" = [])
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Health", description = "Health check endpoint"),
        (name = "Products", description = "Catalog and product image endpoints"),
        (name = "Orders", description = "Checkout and buyer order endpoints"),
        (name = "Admin", description = "Admin order and product endpoints"),
        (name = "Dashboard", description = "Admin dashboard endpoints"),
        (name = "Customers", description = "Admin customer endpoints"),
        (name = "Discounts", description = "Discount code endpoints"),
        (name = "Auth", description = "Authentication endpoints"),
        (name = "Wishlist", description = "Stateless wishlist endpoints"),
        (name = "Promotions", description = "Promotion banner endpoint"),
    )
)]
pub struct ApiDoc;

pub fn scalar_docs() -> Scalar<OpenApiSpec> {
    Scalar::with_url("/docs", ApiDoc::openapi())
}
