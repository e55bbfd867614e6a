//! Embedded schema migrations (`aegis_core/migrations/`).

use sqlx::PgPool;

/// Bring the database schema up to date.
pub async fn migrate(pool: &PgPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("./migrations").run(pool).await
}
