use sqlx::PgPool;
use sqlx::postgres::PgPoolOptions;
use std::env;

/// Connects to PostgreSQL using `DATABASE_URL` and runs pending migrations.
///
/// # Panics
///
/// Panics if `DATABASE_URL` is unset, the connection fails, or a migration
/// cannot be applied. All three are unrecoverable at startup.
pub async fn init_db_pool() -> PgPool {
    let database_url = env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let max_connections = env::var("DATABASE_MAX_CONNECTIONS")
        .ok()
        .and_then(|s| s.parse().ok())
        .unwrap_or(10);

    let pool = PgPoolOptions::new()
        .max_connections(max_connections)
        .connect(&database_url)
        .await
        .expect("Failed to connect to database");

    sqlx::migrate!()
        .run(&pool)
        .await
        .expect("Failed to run database migrations");

    pool
}
