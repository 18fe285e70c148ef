//! Seed the database with an administrator, a regular user and sample
//! products. Existing rows (by email / SKU) are left untouched.

use std::str::FromStr;

use anyhow::Context;
use api::AppConfig;
use api::telemetry::init_tracing;
use auth::domain::User;
use auth::domain::value_object::{email::Email, user_name::UserName, user_role::UserRole};
use catalog::application::cache::invalidate;
use catalog::domain::Product;
use catalog::domain::entity::product::NewProduct;
use catalog::domain::value_object::{price::Price, sku::Sku};
use platform::cache::{CacheClient, RedisSettings};
use platform::db::Database;
use platform::password::{ClearTextPassword, CredentialHasher};
use rust_decimal::Decimal;

/// (name, description, price, quantity, sku, category)
const PRODUCTS: &[(&str, &str, &str, i32, &str, &str)] = &[
    ("iPhone 15 Pro", "Latest iPhone with the A17 Pro chip and a pro camera system", "1199.99", 50, "IPHONE-15-PRO-128", "Smartphones"),
    ("MacBook Air M2", "Ultra-thin laptop with the M2 chip", "1499.99", 25, "MACBOOK-AIR-M2-256", "Computers"),
    ("AirPods Pro", "Wireless earbuds with active noise cancellation", "279.99", 100, "AIRPODS-PRO-GEN2", "Audio"),
    ("iPad Pro 12.9\"", "Professional tablet with a Liquid Retina XDR display", "1099.99", 30, "IPAD-PRO-129-256", "Tablets"),
    ("Apple Watch Series 9", "Smartwatch with the S9 chip", "429.99", 75, "WATCH-S9-45MM-GPS", "Watches"),
    ("Magic Mouse", "Rechargeable wireless mouse", "89.99", 200, "MAGIC-MOUSE-WHITE", "Accessories"),
    ("Magic Keyboard", "Wireless keyboard with numeric keypad", "149.99", 150, "MAGIC-KB-NUMERIC", "Accessories"),
    ("Studio Display", "27-inch 5K Retina display", "1599.99", 15, "STUDIO-DISPLAY-27", "Displays"),
    ("Mac Studio", "Compact workstation with the M2 Max chip", "2499.99", 10, "MAC-STUDIO-M2-MAX", "Computers"),
    ("HomePod mini", "Compact smart speaker", "99.99", 80, "HOMEPOD-MINI-WHITE", "Audio"),
];

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::from_env()?;
    init_tracing(&config.log_level, config.log_file.as_deref())?;

    let database = Database::connect(&config.database_url, config.database_max_connections)
        .await
        .context("cannot connect to database")?;
    sqlx::migrate!("../../../database/migrations")
        .run(database.pool())
        .await?;

    let hasher = CredentialHasher::new(config.auth.hash_cost)?;
    let users = vec![
        seed_user(&hasher, "admin@ecommerce.com", "Administrator", UserRole::Admin, "Admin123!").await?,
        seed_user(&hasher, "user@ecommerce.com", "Test User", UserRole::User, "User123!").await?,
    ];
    let products = PRODUCTS
        .iter()
        .map(|&(name, description, price, quantity, sku, category)| -> anyhow::Result<Product> {
            Ok(Product::new(NewProduct {
                name: name.to_string(),
                description: Some(description.to_string()),
                price: Price::new(Decimal::from_str(price)?)?,
                quantity,
                sku: Sku::new(sku)?,
                category: category.to_string(),
                is_active: true,
            }))
        })
        .collect::<anyhow::Result<Vec<_>>>()?;

    let (users_created, products_created) = database
        .transaction(move |tx| {
            Box::pin(async move {
                let mut users_created = 0;
                for user in &users {
                    users_created += sqlx::query(
                        r#"
                        INSERT INTO users (id, email, name, role, password_hash, created_at, updated_at)
                        VALUES ($1, $2, $3, $4, $5, $6, $7)
                        ON CONFLICT (email) DO NOTHING
                        "#,
                    )
                    .bind(user.user_id.as_uuid())
                    .bind(user.email.as_str())
                    .bind(user.name.as_str())
                    .bind(user.role.code())
                    .bind(user.password_hash.as_phc_string())
                    .bind(user.created_at)
                    .bind(user.updated_at)
                    .execute(&mut **tx)
                    .await?
                    .rows_affected();
                }

                let mut products_created = 0;
                for product in &products {
                    products_created += sqlx::query(
                        r#"
                        INSERT INTO products (
                            id, name, description, price, quantity, sku, category,
                            is_active, created_at, updated_at
                        )
                        VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10)
                        ON CONFLICT (sku) DO NOTHING
                        "#,
                    )
                    .bind(product.id.as_uuid())
                    .bind(&product.name)
                    .bind(&product.description)
                    .bind(product.price.amount())
                    .bind(product.quantity)
                    .bind(product.sku.as_str())
                    .bind(&product.category)
                    .bind(product.is_active)
                    .bind(product.created_at)
                    .bind(product.updated_at)
                    .execute(&mut **tx)
                    .await?
                    .rows_affected();
                }

                Ok::<_, anyhow::Error>((users_created, products_created))
            })
        })
        .await?;

    tracing::info!(
        users_created,
        products_created,
        "Seed completed (admin@ecommerce.com / user@ecommerce.com)"
    );

    if products_created > 0
        && let Some(url) = &config.redis_url
    {
        let cache = CacheClient::redis(&RedisSettings::new(url.as_str()))?;
        invalidate(&cache, None).await;
    }

    database.close().await;
    Ok(())
}

async fn seed_user(
    hasher: &CredentialHasher,
    email: &str,
    name: &str,
    role: UserRole,
    password: &str,
) -> anyhow::Result<User> {
    let hash = hasher
        .hash_blocking(ClearTextPassword::new(password))
        .await?;
    Ok(User::new(Email::new(email)?, UserName::new(name)?, role, hash))
}
