use argon2::{
    Argon2, PasswordHasher,
    password_hash::{rand_core::OsRng, SaltString},
};
use rust_decimal::Decimal;
use storefront_api::{
    catalog::image::MIN_RESOLUTION,
    config::AppConfig,
    db::{create_pool, run_migrations},
    middleware::auth::{ROLE_ADMIN, ROLE_USER},
};
use uuid::Uuid;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();
    let config = AppConfig::from_env()?;

    let pool = create_pool(&config.database_url, config.max_connections).await?;
    run_migrations(&pool).await?;

    let admin_id = ensure_user_with_role(&pool, "admin@example.com", "admin1234", ROLE_ADMIN).await?;
    let user_id = ensure_user_with_role(&pool, "user@example.com", "user1234", ROLE_USER).await?;
    ensure_customer(&pool, admin_id).await?;
    ensure_customer(&pool, user_id).await?;

    let notebooks = ensure_category(&pool, "Notebooks", "notebooks").await?;
    let smartphones = ensure_category(&pool, "Smartphones", "smartphones").await?;
    seed_notebooks(&pool, notebooks).await?;
    seed_smartphones(&pool, smartphones).await?;

    println!("Seed completed. Admin ID: {admin_id}, User ID: {user_id}");
    Ok(())
}

async fn ensure_user_with_role(
    pool: &sqlx::PgPool,
    email: &str,
    password: &str,
    role: &str,
) -> anyhow::Result<Uuid> {
    let salt = SaltString::generate(&mut OsRng);
    let password_hash = Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map_err(|e| anyhow::anyhow!(e.to_string()))?
        .to_string();

    let (user_id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO users (id, email, password_hash, role)
        VALUES ($1, $2, $3, $4)
        ON CONFLICT (email) DO UPDATE SET role = EXCLUDED.role
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(email)
    .bind(password_hash)
    .bind(role)
    .fetch_one(pool)
    .await?;

    println!("Ensured user {email} (role={role})");
    Ok(user_id)
}

async fn ensure_customer(pool: &sqlx::PgPool, user_id: Uuid) -> anyhow::Result<()> {
    sqlx::query(
        r#"
        INSERT INTO customers (id, user_id)
        VALUES ($1, $2)
        ON CONFLICT (user_id) DO NOTHING
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(user_id)
    .execute(pool)
    .await?;
    Ok(())
}

async fn ensure_category(pool: &sqlx::PgPool, name: &str, slug: &str) -> anyhow::Result<Uuid> {
    let (id,): (Uuid,) = sqlx::query_as(
        r#"
        INSERT INTO categories (id, name, slug)
        VALUES ($1, $2, $3)
        ON CONFLICT (slug) DO UPDATE SET name = EXCLUDED.name
        RETURNING id
        "#,
    )
    .bind(Uuid::new_v4())
    .bind(name)
    .bind(slug)
    .fetch_one(pool)
    .await?;
    println!("Ensured category {slug}");
    Ok(id)
}

fn image_path(slug: &str) -> String {
    let (width, height) = MIN_RESOLUTION;
    format!("products/{slug}-{width}x{height}.jpg")
}

async fn seed_notebooks(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    let notebooks = vec![
        ("Ferris Book 14", "ferris-book-14", 89_900, "14\"", "IPS", "16 GB", "3.2 GHz", "Integrated", "10 h", "Linux"),
        ("Crab Pro 16", "crab-pro-16", 189_900, "16\"", "OLED", "32 GB", "4.1 GHz", "RTX 4060", "7 h", "Windows 11"),
        ("Borrow Air 13", "borrow-air-13", 109_000, "13.3\"", "IPS", "8 GB", "2.8 GHz", "Integrated", "14 h", "macOS"),
    ];

    for (title, slug, cents, diagonal, display, ram, freq, video, battery, os) in notebooks {
        sqlx::query(
            r#"
            INSERT INTO notebooks (id, category_id, slug, title, description, price, image,
                diagonal, display_type, ram, processor_freq, video, time_without_charge, os)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category_id)
        .bind(slug)
        .bind(title)
        .bind(format!("{title} notebook"))
        .bind(Decimal::new(cents, 2))
        .bind(image_path(slug))
        .bind(diagonal)
        .bind(display)
        .bind(ram)
        .bind(freq)
        .bind(video)
        .bind(battery)
        .bind(os)
        .execute(pool)
        .await?;
    }

    println!("Seeded notebooks");
    Ok(())
}

async fn seed_smartphones(pool: &sqlx::PgPool, category_id: Uuid) -> anyhow::Result<()> {
    let smartphones = vec![
        ("Ferris Phone", "ferris-phone", 49_900, "6.1\"", "AMOLED", "2400x1080", "8 GB", "4500 mAh", Some("512 GB"), "50 MP", "12 MP"),
        ("Crab Mini", "crab-mini", 29_900, "5.4\"", "LCD", "2340x1080", "4 GB", "3000 mAh", None, "12 MP", "8 MP"),
    ];

    for (title, slug, cents, diagonal, display, resolution, ram, accum, sd_volume, main_cam, frontal_cam) in smartphones {
        sqlx::query(
            r#"
            INSERT INTO smartphones (id, category_id, slug, title, description, price, image,
                diagonal, display_type, resolution, ram, accum_volume, sd, sd_volume, main_cam, frontal_cam)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, $11, $12, $13, $14, $15, $16)
            ON CONFLICT (slug) DO NOTHING
            "#,
        )
        .bind(Uuid::new_v4())
        .bind(category_id)
        .bind(slug)
        .bind(title)
        .bind(format!("{title} smartphone"))
        .bind(Decimal::new(cents, 2))
        .bind(image_path(slug))
        .bind(diagonal)
        .bind(display)
        .bind(resolution)
        .bind(ram)
        .bind(accum)
        .bind(sd_volume.is_some())
        .bind(sd_volume)
        .bind(main_cam)
        .bind(frontal_cam)
        .execute(pool)
        .await?;
    }

    println!("Seeded smartphones");
    Ok(())
}
