pub mod books;

use std::sync::Arc;

use bookstore_db::Pool;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::ModuleRegistry;

/// Register all project-specific modules with the registry
pub fn register_all(
    registry: &mut ModuleRegistry,
    pool: &Pool,
    settings: &Settings,
) -> anyhow::Result<()> {
    registry.register(Arc::new(books::BooksModule::new(pool.clone(), settings)?))?;
    Ok(())
}
