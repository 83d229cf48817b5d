use furbish_storefront::{config::AppConfig, db::create_pool, services::auth_service::hash_password};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url).await?;
    // Ensure migrations are applied.
    sqlx::migrate!("./migrations").run(&pool).await?;

    let admin_id = ensure_user(&pool, "admin@example.com", "admin123").await?;
    grant_admin(&pool, admin_id).await?;
    let buyer_id = ensure_user(&pool, "buyer@example.com", "buyer123").await?;
    seed_products(&pool).await?;

    println!("Seed completed. Admin ID: {admin_id}, Buyer ID: {buyer_id}");
    Ok(())
}

async fn ensure_user(pool: &sqlx::PgPool, email: &str, password: &str) -> anyhow::Result<Uuid> {
    let password_hash = hash_password(password).map_err(|e| anyhow::anyhow!(e.to_string()))?;

    let row: Option<(Uuid,)> = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash)
        VALUES ($1, $2, $3)
        ON CONFLICT (email) DO NOTHING
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .fetch_optional(pool)
    .await?;

    // If user already exists, fetch id
    let user_id = match row {
        Some((id,)) => id,
        None => {
            let existing: (Uuid,) = sqlx::query_as("SELECT id FROM users WHERE email = $1")
                .bind(email)
                .fetch_one(pool)
                .await?;
            existing.0
        }
    };

    println!("Ensured user {email}");
    Ok(user_id)
}

async fn grant_admin(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query("INSERT INTO admins (user_id) VALUES ($1) ON CONFLICT (user_id) DO NOTHING")
        .bind(user_id)
        .execute(pool)
        .await?;
    println!("Granted admin to {user_id}");
    Ok(())
}

struct SeedProduct {
    title: &'static str,
    description: &'static str,
    price: i64,
    original_price: Option<i64>,
    category: &'static str,
    brand: &'static str,
    condition: &'static str,
    sizes: &'static [&'static str],
    featured: bool,
}

const PRODUCTS: &[SeedProduct] = &[
    SeedProduct {
        title: "Vintage Denim Jacket",
        description: "Classic mid-wash denim, barely worn",
        price: 4599,
        original_price: Some(12000),
        category: "women/outerwear",
        brand: "Levi's",
        condition: "like new",
        sizes: &["S", "M", "L"],
        featured: true,
    },
    SeedProduct {
        title: "Linen Button-Down Shirt",
        description: "Breathable summer shirt",
        price: 1899,
        original_price: Some(4500),
        category: "men/shirts",
        brand: "Uniqlo",
        condition: "good",
        sizes: &["M", "L", "XL"],
        featured: false,
    },
    SeedProduct {
        title: "Leather Crossbody Bag",
        description: "Tan leather with adjustable strap",
        price: 3200,
        original_price: None,
        category: "accessories/bags",
        brand: "Fossil",
        condition: "good",
        sizes: &[],
        featured: true,
    },
    SeedProduct {
        title: "Automatic Field Watch",
        description: "38mm steel case, serviced last year",
        price: 15900,
        original_price: Some(29900),
        category: "watches/automatic",
        brand: "Seiko",
        condition: "fair",
        sizes: &[],
        featured: true,
    },
];

async fn seed_products(pool: &sqlx::PgPool) -> anyhow::Result<()> {
    for product in PRODUCTS {
        let exists: Option<(Uuid,)> = sqlx::query_as("SELECT id FROM products WHERE title = $1")
            .bind(product.title)
            .fetch_optional(pool)
            .await?;
        if exists.is_some() {
            continue;
        }

        let sizes: Vec<String> = product.sizes.iter().map(|s| s.to_string()).collect();
        sqlx::query(
            r#"
            INSERT INTO products
                (id, title, description, price, original_price, category, brand, condition, sizes, is_featured)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(product.title)
        .bind(product.description)
        .bind(product.price)
        .bind(product.original_price)
        .bind(product.category)
        .bind(product.brand)
        .bind(product.condition)
        .bind(sizes)
        .bind(product.featured)
        .execute(pool)
        .await?;
    }

    println!("Seeded products");
    Ok(())
}
