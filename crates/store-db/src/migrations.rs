//! # Database Migrations
//!
//! Embedded SQL migrations for the store service.
//!
//! ## Adding New Migrations
//!
//! 1. Create a new file in `migrations/postgres/` with the next sequence number
//! 2. Name format: `NNN_description.sql` (e.g., `002_add_order_notes.sql`)
//! 3. **NEVER** modify existing migrations - always add new ones

use sqlx::PgPool;
use tracing::info;

use crate::error::DbResult;

/// Embedded migrations from the workspace `migrations/postgres` directory.
///
/// Also referenced by `#[sqlx::test(migrations = ...)]` in the integration tests.
pub static MIGRATOR: sqlx::migrate::Migrator = sqlx::migrate!("../../migrations/postgres");

/// Runs all pending database migrations.
///
/// ## Safety
/// - Idempotent: safe to run multiple times
/// - Transactional: each migration runs in a transaction
/// - Ordered: migrations run in filename order (001, 002, ...)
pub async fn run_migrations(pool: &PgPool) -> DbResult<()> {
    info!("Checking for pending migrations");

    MIGRATOR.run(pool).await?;

    info!("All migrations applied successfully");
    Ok(())
}

/// Returns `(total_migrations, applied_migrations)` for diagnostics.
pub async fn migration_status(pool: &PgPool) -> DbResult<(usize, usize)> {
    let total = MIGRATOR.migrations.len();

    let applied: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM _sqlx_migrations WHERE success")
        .fetch_one(pool)
        .await?;

    Ok((total, applied as usize))
}
