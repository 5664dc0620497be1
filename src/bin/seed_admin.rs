//! Creates the first admin account from `ADMIN_EMAIL`, `ADMIN_PASSWORD` and
//! optional `ADMIN_NAME`. Does nothing if the email is already registered.

use std::env;
use std::sync::Arc;

use dotenvy::dotenv;
use sqlx::postgres::PgPoolOptions;

use tickethub_server::config::Config;
use tickethub_server::models::RegisterRequest;
use tickethub_server::services::users::normalize_email;
use tickethub_server::services::UserService;
use tickethub_server::store::{PgStore, UserRepository};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    dotenv().ok();
    tracing_subscriber::fmt::init();

    let config = Config::from_env()?;
    let email = env::var("ADMIN_EMAIL").map_err(|_| "ADMIN_EMAIL must be set")?;
    let password = env::var("ADMIN_PASSWORD").map_err(|_| "ADMIN_PASSWORD must be set")?;
    let name = env::var("ADMIN_NAME").unwrap_or_else(|_| "Administrator".to_string());

    let pool = PgPoolOptions::new()
        .max_connections(1)
        .connect(&config.database_url)
        .await?;
    sqlx::migrate!().run(&pool).await?;

    let store = Arc::new(PgStore::new(pool));
    if store.email_exists(&normalize_email(&email)).await? {
        println!("ℹ️ Admin {email} already exists. Skipping creation.");
        return Ok(());
    }

    let admin = UserService::new(store)
        .register_admin(RegisterRequest {
            email,
            password,
            username: name,
        })
        .await?;

    println!("✅ Admin user created:");
    println!("   Email: {}", admin.email);
    Ok(())
}
