/// Database migration runner
///
/// Thin wrapper around sqlx's embedded migrator. Migration files live in
/// `migrations/` at the workspace root and define the full relational schema
/// (users, business profiles, posts, blog posts, analytics, calendar events,
/// the notification queue, OAuth state rows, social accounts, subscriptions,
/// and the mock compliance register).

use sqlx::postgres::PgPool;
use tracing::info;

/// Runs all pending database migrations
///
/// Safe to call on every startup; already-applied migrations are skipped.
///
/// # Errors
///
/// Returns an error if a migration file fails to apply or the migrations
/// table cannot be created.
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Running database migrations");
    sqlx::migrate!("../migrations").run(pool).await?;
    info!("Database migrations up to date");
    Ok(())
}
