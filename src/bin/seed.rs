use anyhow::{Context, Result};
use clap::Parser;
use sqlx::PgPool;
use uuid::Uuid;

use scope_api::auth::Role;
use scope_api::database::DatabaseManager;
use scope_api::services::user_service::hash_password;

/// Provision demo accounts and sample resources for local development
#[derive(Parser, Debug)]
#[command(name = "seed", about = "Seed the scope-api database with demo data")]
struct Args {
    /// Create the tables first if they do not exist
    #[arg(long)]
    init: bool,

    /// Password assigned to every demo account
    #[arg(long, default_value = "12345")]
    password: String,
}

#[tokio::main]
async fn main() -> Result<()> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt::init();

    let args = Args::parse();
    let pool = DatabaseManager::pool().context("failed to build database pool")?;

    if args.init {
        create_tables(&pool).await.context("failed to create tables")?;
        println!("Tables ready");
    }

    seed_users(&pool, &args.password).await?;
    seed_resources(&pool).await?;

    println!("Seed complete");
    Ok(())
}

async fn create_tables(pool: &PgPool) -> Result<()> {
    let statements = [
        "CREATE TABLE IF NOT EXISTS users (
            id uuid PRIMARY KEY,
            email text NOT NULL UNIQUE,
            password_hash text NOT NULL,
            name text NOT NULL,
            role text NOT NULL,
            created_at timestamptz NOT NULL DEFAULT now(),
            updated_at timestamptz NOT NULL DEFAULT now()
        )",
        "CREATE TABLE IF NOT EXISTS verification_codes (
            email text PRIMARY KEY,
            code text NOT NULL,
            expiration timestamptz NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS resources (
            id uuid PRIMARY KEY,
            title text NOT NULL,
            description text NOT NULL,
            value integer NOT NULL
        )",
        "CREATE TABLE IF NOT EXISTS items (
            id uuid PRIMARY KEY,
            resource_id uuid NOT NULL REFERENCES resources(id) ON DELETE CASCADE,
            name text NOT NULL,
            description text NOT NULL
        )",
    ];

    for statement in statements {
        sqlx::query(statement).execute(pool).await?;
    }
    Ok(())
}

async fn seed_users(pool: &PgPool, password: &str) -> Result<()> {
    let accounts = [
        ("unverified@example.com", "Unverified", Role::Unverified),
        ("user@example.com", "User", Role::User),
        ("admin@example.com", "Admin", Role::Admin),
    ];

    for (email, name, role) in accounts {
        let password_hash = hash_password(password)
            .with_context(|| format!("failed to hash password for {}", email))?;

        sqlx::query(
            "INSERT INTO users (id, email, password_hash, name, role, created_at, updated_at) \
             VALUES ($1, $2, $3, $4, $5, now(), now()) \
             ON CONFLICT (email) DO UPDATE \
             SET password_hash = $3, name = $4, role = $5, updated_at = now()",
        )
        .bind(Uuid::new_v4())
        .bind(email)
        .bind(&password_hash)
        .bind(name)
        .bind(role.as_str())
        .execute(pool)
        .await
        .with_context(|| format!("failed to upsert {}", email))?;

        println!("Seeded account {} ({})", email, role);
    }
    Ok(())
}

async fn seed_resources(pool: &PgPool) -> Result<()> {
    let (existing,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM resources")
        .fetch_one(pool)
        .await?;
    if existing > 0 {
        println!("Resources already present, skipping");
        return Ok(());
    }

    let resources = [
        ("The Grapes of Wrath", "Novel by John Steinbeck", 10),
        ("East of Eden", "Novel by John Steinbeck", 12),
        ("Cannery Row", "Novel by John Steinbeck", 8),
    ];

    for (title, description, value) in resources {
        let resource_id = Uuid::new_v4();
        sqlx::query(
            "INSERT INTO resources (id, title, description, value) VALUES ($1, $2, $3, $4)",
        )
        .bind(resource_id)
        .bind(title)
        .bind(description)
        .bind(value)
        .execute(pool)
        .await?;

        sqlx::query(
            "INSERT INTO items (id, resource_id, name, description) VALUES ($1, $2, $3, $4)",
        )
        .bind(Uuid::new_v4())
        .bind(resource_id)
        .bind("First edition")
        .bind("Sample item")
        .execute(pool)
        .await?;
    }

    println!("Seeded {} resources", resources.len());
    Ok(())
}
