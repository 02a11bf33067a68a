//! SQLite storage plumbing: pool factory, module migration runner and SQL
//! rendering of listing queries.

use std::str::FromStr;

use anyhow::Context;
use bookstore_kernel::settings::DatabaseSettings;
use bookstore_kernel::Migration;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use time::OffsetDateTime;

pub mod query;
pub mod timestamp;

pub type ChosenDB = sqlx::Sqlite;
pub type Pool = sqlx::Pool<ChosenDB>;

const MIGRATIONS_TABLE: &str = r#"
CREATE TABLE IF NOT EXISTS _module_migrations (
    module     TEXT NOT NULL,
    id         TEXT NOT NULL,
    applied_at TEXT NOT NULL,
    PRIMARY KEY (module, id)
)
"#;

/// Open a pool for the configured database, creating the file when missing.
pub async fn connect(settings: &DatabaseSettings) -> anyhow::Result<Pool> {
    let options = SqliteConnectOptions::from_str(&settings.url)
        .with_context(|| format!("invalid database url '{}'", settings.url))?
        .create_if_missing(true)
        .foreign_keys(true);

    let pool = SqlitePoolOptions::new()
        .max_connections(settings.max_connections)
        .connect_with(options)
        .await
        .with_context(|| format!("failed to connect to '{}'", settings.url))?;

    tracing::info!(url = %settings.url, "database pool ready");
    Ok(pool)
}

/// Single-connection in-memory database, kept alive for the pool's lifetime.
pub async fn connect_in_memory() -> anyhow::Result<Pool> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .min_connections(1)
        .idle_timeout(None)
        .max_lifetime(None)
        .connect("sqlite::memory:")
        .await?;
    Ok(pool)
}

/// Apply every migration not yet recorded. Each one runs in its own
/// transaction together with its bookkeeping row.
///
/// Returns the number of migrations applied.
pub async fn migrate(pool: &Pool, migrations: &[(String, Migration)]) -> anyhow::Result<usize> {
    sqlx::query(MIGRATIONS_TABLE)
        .execute(pool)
        .await
        .context("failed to create migrations table")?;

    let mut applied = 0;
    for (module, migration) in migrations {
        let done: i64 = sqlx::query_scalar(
            "SELECT COUNT(*) FROM _module_migrations WHERE module = ? AND id = ?",
        )
        .bind(module.as_str())
        .bind(migration.id)
        .fetch_one(pool)
        .await?;

        if done > 0 {
            tracing::debug!(module = %module, migration = migration.id, "already applied");
            continue;
        }

        let mut tx = pool.begin().await?;
        sqlx::raw_sql(migration.up)
            .execute(&mut *tx)
            .await
            .with_context(|| format!("migration {}/{} failed", module, migration.id))?;
        sqlx::query("INSERT INTO _module_migrations (module, id, applied_at) VALUES (?, ?, ?)")
            .bind(module.as_str())
            .bind(migration.id)
            .bind(timestamp::UtcTimestamp(OffsetDateTime::now_utc()))
            .execute(&mut *tx)
            .await?;
        tx.commit().await?;

        tracing::info!(module = %module, migration = migration.id, "migration applied");
        applied += 1;
    }

    Ok(applied)
}
