/// Database migration runner
///
/// Schema migrations live in the `migrations/` directory at the workspace
/// root and are embedded into the binary with `sqlx::migrate!`. The server
/// applies pending migrations at startup, so a fresh database is usable
/// without any manual step.

use sqlx::postgres::PgPool;
use tracing::{info, warn};

/// Runs all pending database migrations
///
/// # Errors
///
/// Returns an error if a migration file is malformed, a migration fails to
/// execute, or the connection is lost mid-run. Failed migrations are rolled
/// back where the statements allow it.
///
/// # Example
///
/// ```no_run
/// use rolodex_shared::db::pool::{create_pool, DatabaseConfig};
/// use rolodex_shared::db::migrations::run_migrations;
///
/// # async fn example() -> Result<(), Box<dyn std::error::Error>> {
/// let pool = create_pool(DatabaseConfig::default()).await?;
/// run_migrations(&pool).await?;
/// # Ok(())
/// # }
/// ```
pub async fn run_migrations(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    info!("Starting database migrations");

    let migrations = sqlx::migrate!("../migrations");

    match migrations.run(pool).await {
        Ok(()) => {
            info!("All database migrations completed successfully");
            Ok(())
        }
        Err(e) => {
            warn!("Migration failed: {}", e);
            Err(e)
        }
    }
}
