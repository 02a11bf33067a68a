//! Bookstore application library
//!
//! Wires the project modules into the kernel registry and drives their
//! lifecycle: init, migrate, seed, start, serve, stop.

use anyhow::Context;
use bookstore_db::Pool;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::{InitCtx, ModuleRegistry};

pub mod modules;

/// Registry holding every project module, backed by `pool`.
pub fn build_registry(pool: &Pool, settings: &Settings) -> anyhow::Result<ModuleRegistry> {
    let mut registry = ModuleRegistry::new();
    modules::register_all(&mut registry, pool, settings)?;
    Ok(registry)
}

/// Initialize modules and apply pending migrations; seeds when `seed` is set.
pub async fn prepare(
    registry: &ModuleRegistry,
    pool: &Pool,
    settings: &Settings,
    seed: bool,
) -> anyhow::Result<()> {
    let ctx = InitCtx { settings };
    registry.init_all(&ctx).await?;

    let applied = bookstore_db::migrate(pool, &registry.collect_migrations())
        .await
        .context("failed to apply migrations")?;
    tracing::info!(applied, "database schema up to date");

    if seed {
        registry.seed_all(&ctx).await?;
    }
    Ok(())
}

/// Full application run: connect, prepare, serve until Ctrl-C, stop.
pub async fn serve(settings: Settings) -> anyhow::Result<()> {
    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = build_registry(&pool, &settings)?;

    prepare(&registry, &pool, &settings, true).await?;
    registry.start_all(&InitCtx { settings: &settings }).await?;

    let served = bookstore_http::start_server(&registry, &settings).await;

    registry.stop_all().await?;
    pool.close().await;
    served
}
