//! Embedded schema migrations, applied at startup.
//!
//! Migrations run on a synchronous Diesel connection; callers on an async
//! runtime should wrap [`run_pending_migrations`] in `spawn_blocking`.

use diesel::Connection;
use diesel::pg::PgConnection;
use diesel_migrations::{EmbeddedMigrations, MigrationHarness, embed_migrations};
use tracing::info;

/// All migrations compiled into the binary from `migrations/`.
pub const MIGRATIONS: EmbeddedMigrations = embed_migrations!();

/// Errors raised while bringing the schema up to date.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MigrateError {
    /// Could not open a connection to run migrations on.
    #[error("failed to connect for migrations: {message}")]
    Connection { message: String },

    /// A migration failed to apply.
    #[error("failed to apply migrations: {message}")]
    Migration { message: String },
}

/// Apply any outstanding migrations against the given database.
///
/// # Errors
///
/// Returns [`MigrateError::Connection`] when the database is unreachable and
/// [`MigrateError::Migration`] when a migration itself fails.
pub fn run_pending_migrations(database_url: &str) -> Result<(), MigrateError> {
    let mut conn = PgConnection::establish(database_url).map_err(|err| {
        MigrateError::Connection {
            message: err.to_string(),
        }
    })?;

    let applied = conn
        .run_pending_migrations(MIGRATIONS)
        .map_err(|err| MigrateError::Migration {
            message: err.to_string(),
        })?;

    for version in &applied {
        info!(%version, "applied migration");
    }
    Ok(())
}
