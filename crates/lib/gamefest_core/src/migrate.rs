//! Schema migrations for the Postgres store.

use sqlx::PgPool;
use sqlx::migrate::{MigrateError, Migrator};
use tracing::info;

/// Migrations embedded from `migrations/` at build time.
pub static MIGRATOR: Migrator = sqlx::migrate!("./migrations");

/// Bring the schema behind `pool` up to date.
pub async fn migrate(pool: &PgPool) -> Result<(), MigrateError> {
    info!(available = MIGRATOR.iter().count(), "applying schema migrations");
    MIGRATOR.run(pool).await
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn initial_schema_is_embedded() {
        assert!(
            MIGRATOR
                .iter()
                .any(|m| m.version == 1 && m.description.contains("init"))
        );
    }
}
