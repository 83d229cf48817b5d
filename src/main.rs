use std::{net::SocketAddr, sync::Arc};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use furbish_storefront::{
    app::build_router,
    config::AppConfig,
    db::{create_orm_conn, create_pool},
    services::discount_service::DiscountRegistry,
    state::AppState,
    storage::{Bucket, Storage},
};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "info,furbish_storefront=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let config = AppConfig::from_env()?;
    let pool = create_pool(&config.database_url).await?;
    let orm = create_orm_conn(&config.database_url).await?;

    sqlx::migrate!("./migrations").run(&pool).await?;

    let storage = Storage::new(&config.storage_root, &config.public_base_url);
    for bucket in [Bucket::ProductImages, Bucket::PaymentProofs] {
        tokio::fs::create_dir_all(storage.bucket_dir(bucket)).await?;
    }
    tracing::info!(root = %storage.root().display(), "object storage ready");

    let addr = SocketAddr::from((config.host.parse::<std::net::IpAddr>()?, config.port));
    let state = AppState {
        pool,
        orm,
        storage,
        discounts: DiscountRegistry::with_samples(),
        config: Arc::new(config),
    };
    let app = build_router(state);

    tracing::info!("listening on {}", addr);
    axum::serve(tokio::net::TcpListener::bind(addr).await?, app).await?;

    Ok(())
}
