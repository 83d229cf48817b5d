mod common;

use std::sync::Arc;

use furbish_storefront::{
    db::{create_orm_conn, create_pool, run_migrations},
    dto::{
        auth::{LoginRequest, RegisterRequest},
        dashboard::CustomerQuery,
        orders::{CheckoutForm, UpdateOrderStatusRequest},
        products::{CreateProductRequest, UpdateProductRequest},
        wishlist::ToggleWishlistRequest,
    },
    entity::admins::ActiveModel as AdminActive,
    error::AppError,
    middleware::auth::{AuthUser, decode_token},
    models::{OrderStatus, ProductCondition, Role},
    revenue::Timeframe,
    services::{
        admin_service, auth_service, customer_service, dashboard_service,
        discount_service::DiscountRegistry, order_service, product_service, wishlist_service,
    },
    state::AppState,
    storage::{Bucket, PLACEHOLDER_IMAGE, Storage},
    wishlist::Wishlist,
};
use sea_orm::ActiveValue::NotSet;
use sea_orm::{ActiveModelTrait, Set};
use uuid::Uuid;

// Buyer registers and checks out with a payment proof; admin confirms, ships and
// reads the dashboard.
#[tokio::test]
async fn checkout_and_admin_fulfilment_flow() -> anyhow::Result<()> {
    // Allow skipping when no DB is configured in the environment.
    let database_url = match std::env::var("TEST_DATABASE_URL")
        .or_else(|_| std::env::var("DATABASE_URL"))
    {
        Ok(url) => url,
        Err(_) => {
            eprintln!(
                "Skipping test: set TEST_DATABASE_URL or DATABASE_URL to run integration flow tests."
            );
            return Ok(());
        }
    };

    let storage_dir = tempfile::tempdir()?;
    let state = setup_state(&database_url, storage_dir.path()).await?;
    let run = Uuid::new_v4().simple().to_string();

    // Accounts
    let buyer_email = format!("buyer-{run}@example.com");
    let buyer = register(&state, &buyer_email).await?;
    assert_eq!(buyer.role, Role::Buyer);

    let admin_email = format!("admin-{run}@example.com");
    let admin = register(&state, &admin_email).await?;
    AdminActive {
        user_id: Set(admin.id),
        created_at: NotSet,
    }
    .insert(&state.orm)
    .await?;

    let login = auth_service::login_user(
        &state,
        LoginRequest {
            email: admin_email.clone(),
            password: "secret123".into(),
        },
    )
    .await?
    .into_data()
    .expect("login data");
    assert_eq!(login.user.role, Role::Admin);
    let token = login.token.trim_start_matches("Bearer ");
    let claims = decode_token(token, common::JWT_SECRET)?;
    assert_eq!(claims.sub, admin.id.to_string());

    let wrong = auth_service::login_user(
        &state,
        LoginRequest {
            email: admin_email.clone(),
            password: "nope".into(),
        },
    )
    .await;
    assert!(matches!(wrong, Err(AppError::BadRequest(_))));

    let auth_buyer = AuthUser {
        user_id: buyer.id,
        email: buyer_email.clone(),
        is_admin: false,
    };
    let auth_admin = AuthUser {
        user_id: admin.id,
        email: admin_email,
        is_admin: true,
    };

    // Catalog
    let create = || CreateProductRequest {
        title: format!("Denim Jacket {run}"),
        description: Some("Mid-wash".into()),
        price: 4599,
        original_price: Some(12000),
        category: "Women/Outerwear".into(),
        brand: Some("Levi's".into()),
        condition: ProductCondition::LikeNew,
        sizes: vec!["S".into(), "M".into(), "M".into()],
        is_visible: true,
        is_featured: true,
    };
    let denied = product_service::create_product(&state, &auth_buyer, create()).await;
    assert!(matches!(denied, Err(AppError::Forbidden)));

    let product = product_service::create_product(&state, &auth_admin, create())
        .await?
        .into_data()
        .expect("product");
    assert_eq!(product.discount_percent, Some(62));
    assert_eq!(product.category, "women");
    assert_eq!(product.subcategory, "outerwear");
    assert_eq!(product.sizes, ["S", "M"]);
    assert_eq!(product.images, [PLACEHOLDER_IMAGE]);

    // Wishlist resolves against the catalog
    let toggled = wishlist_service::toggle(
        &state,
        ToggleWishlistRequest {
            wishlist: Wishlist::default(),
            product_id: product.id,
        },
    )
    .await?
    .into_data()
    .expect("wishlist");
    assert!(toggled.wishlisted);
    let listed = wishlist_service::products(&state, toggled.wishlist)
        .await?
        .into_data()
        .expect("wishlist products");
    assert_eq!(listed.items.len(), 1);

    // Two uploads in a row never overwrite each other
    for _ in 0..2 {
        let image =
            product_service::upload_image(&state, &auth_admin, product.id, png("front.png"))
                .await?
                .into_data()
                .expect("image");
        assert!(image.file_name.ends_with(".png"));
    }
    let images = product_service::list_images(&state, product.id)
        .await?
        .into_data()
        .expect("images");
    assert_eq!(images.items.len(), 2);
    assert_ne!(images.items[0].file_name, images.items[1].file_name);

    // Featured but hidden products stay off the dashboard
    let hidden = product_service::create_product(
        &state,
        &auth_admin,
        CreateProductRequest {
            is_visible: false,
            ..create()
        },
    )
    .await?
    .into_data()
    .expect("hidden product");

    // Checkout
    let unavailable = order_service::checkout(&state, &auth_buyer, checkout_form(product.id, "XL"))
        .await;
    assert!(matches!(unavailable, Err(AppError::BadRequest(_))));

    let order = order_service::checkout(&state, &auth_buyer, checkout_form(product.id, "M"))
        .await?
        .into_data()
        .expect("order");
    assert_eq!(order.status, OrderStatus::Pending);
    assert_eq!(order.quantity, 2);
    assert_eq!(order.total_amount, 9198);
    assert_eq!(order.product.as_ref().map(|p| p.id), Some(product.id));
    let proof_path = order.payment_proof_url.clone().expect("proof path");
    assert!(proof_path.ends_with(".png"));

    let mine = order_service::list_orders(&state, &auth_buyer, Default::default())
        .await?
        .into_data()
        .expect("orders");
    assert_eq!(mine.items.len(), 1);

    let summary = dashboard_service::summary(&state, &auth_admin)
        .await?
        .into_data()
        .expect("summary");
    assert!(summary.product_count >= 2);
    assert!(summary.visible_product_count >= 1);
    assert!(summary.visible_product_count < summary.product_count);
    assert!(summary.pending_order_count >= 1);
    assert!(summary.pending_order_count <= summary.order_count);
    assert!(summary.total_revenue >= 9198);
    assert!(matches!(
        dashboard_service::summary(&state, &auth_buyer).await,
        Err(AppError::Forbidden)
    ));

    let top = dashboard_service::top_products(&state, &auth_admin)
        .await?
        .into_data()
        .expect("top products");
    assert!(!top.items.is_empty() && top.items.len() <= 5);
    assert!(top.items.iter().all(|p| p.featured && p.in_stock));
    assert_eq!(top.items[0].id, product.id);
    assert!(top.items.iter().all(|p| p.id != hidden.id));

    // Admin fulfilment
    let bogus = admin_service::update_order_status(
        &state,
        &auth_admin,
        order.id,
        UpdateOrderStatusRequest {
            status: "lost".into(),
        },
    )
    .await;
    assert!(matches!(bogus, Err(AppError::BadRequest(_))));

    let shipped = admin_service::update_order_status(
        &state,
        &auth_admin,
        order.id,
        UpdateOrderStatusRequest {
            status: "shipped".into(),
        },
    )
    .await?
    .into_data()
    .expect("updated");
    assert_eq!(shipped.status, OrderStatus::Shipped);

    let activity = dashboard_service::recent_activity(&state, &auth_admin)
        .await?
        .into_data()
        .expect("activity");
    assert!(activity.items.len() <= 20);
    assert!(
        activity
            .items
            .windows(2)
            .all(|pair| pair[0].created_at >= pair[1].created_at)
    );
    assert!(
        activity
            .items
            .iter()
            .any(|entry| entry.action == "checkout" && entry.user_id == Some(buyer.id))
    );

    let (bytes, content_type) = admin_service::payment_proof(&state, &auth_admin, order.id).await?;
    assert_eq!(bytes, b"proof image");
    assert_eq!(content_type, "image/png");
    assert!(matches!(
        admin_service::payment_proof(&state, &auth_buyer, order.id).await,
        Err(AppError::Forbidden)
    ));

    // Hidden products disappear from the storefront only
    product_service::update_product(
        &state,
        &auth_admin,
        product.id,
        UpdateProductRequest {
            is_visible: Some(false),
            ..Default::default()
        },
    )
    .await?;
    assert!(matches!(
        product_service::get_product(&state, product.id, Some(&auth_buyer)).await,
        Err(AppError::NotFound)
    ));
    assert!(
        product_service::get_product(&state, product.id, Some(&auth_admin))
            .await
            .is_ok()
    );

    let removal = product_service::delete_product(&state, &auth_admin, product.id).await;
    assert!(matches!(removal, Err(AppError::BadRequest(_))));

    // Dashboard
    let chart = dashboard_service::revenue(&state, &auth_admin, Timeframe::Daily)
        .await?
        .into_data()
        .expect("chart");
    assert_eq!(chart.points.len(), 14);
    assert!(chart.points.last().map(|p| p.revenue).unwrap_or_default() >= 9198);

    let customers = customer_service::list_customers(
        &state,
        &auth_admin,
        CustomerQuery {
            q: Some(buyer_email.clone()),
            page: None,
            per_page: None,
        },
    )
    .await?
    .into_data()
    .expect("customers");
    assert_eq!(customers.items.len(), 1);
    assert_eq!(customers.items[0].orders, 1);
    assert_eq!(customers.items[0].total_spent, 9198);
    assert_eq!(customers.items[0].name, "Asha Rao");

    let history = customer_service::customer_orders(&state, &auth_admin, buyer.id)
        .await?
        .into_data()
        .expect("history");
    assert_eq!(history.items[0].id, order.id);

    Ok(())
}

async fn setup_state(database_url: &str, storage_root: &std::path::Path) -> anyhow::Result<AppState> {
    let pool = create_pool(database_url).await?;
    let orm = create_orm_conn(database_url).await?;
    run_migrations(&orm).await?;

    let storage = Storage::new(storage_root, common::BASE_URL);
    tokio::fs::create_dir_all(storage.bucket_dir(Bucket::PaymentProofs)).await?;

    Ok(AppState {
        pool,
        orm,
        storage,
        discounts: DiscountRegistry::with_samples(),
        config: Arc::new(common::test_config(database_url, storage_root)),
    })
}

async fn register(
    state: &AppState,
    email: &str,
) -> anyhow::Result<furbish_storefront::models::AppUser> {
    let user = auth_service::register_user(
        state,
        RegisterRequest {
            email: email.to_string(),
            password: "secret123".into(),
        },
    )
    .await?
    .into_data()
    .expect("registered user");
    Ok(user)
}

fn checkout_form(product_id: Uuid, size: &str) -> CheckoutForm {
    let mut form = CheckoutForm::default();
    form.set_text("product_id", product_id.to_string());
    form.set_text("size", size.to_string());
    form.set_text("quantity", "2".to_string());
    form.set_text("buyer_name", "Asha Rao".to_string());
    form.set_text("buyer_address", "12 MG Road, Pune".to_string());
    form.set_text("buyer_phone", "9876543210".to_string());
    form.payment_proof = Some(png("receipt.png"));
    form
}

fn png(file_name: &str) -> product_service::UploadedFile {
    product_service::UploadedFile {
        file_name: file_name.to_string(),
        content_type: Some("image/png".to_string()),
        bytes: b"proof image".to_vec(),
    }
}
