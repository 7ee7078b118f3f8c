//! PostgreSQL persistence adapters built on Diesel.

mod diesel_post_repository;
mod diesel_user_repository;
mod models;
mod pool;
pub mod schema;

pub use diesel_post_repository::DieselPostRepository;
pub use diesel_user_repository::DieselUserRepository;
pub use pool::{DbPool, PoolConfig, PoolError};

use diesel::pg::PgConnection;
use diesel::Connection;
use diesel_migrations::{embed_migrations, EmbeddedMigrations, MigrationHarness};

/// Embedded SQL migrations, applied at startup.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Apply any pending migrations over a short-lived synchronous connection.
///
/// # Errors
/// Returns the underlying connection or migration failure.
pub fn run_migrations(
    database_url: &str,
) -> Result<(), Box<dyn std::error::Error + Send + Sync>> {
    let mut conn = PgConnection::establish(database_url)?;
    conn.run_pending_migrations(MIGRATIONS)?;
    Ok(())
}
