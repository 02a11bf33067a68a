pub mod models;
pub mod repository;
pub mod routes;
pub mod seeder;
pub mod service;
pub mod ui;

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use bookstore_db::Pool;
use bookstore_kernel::localization::Localizer;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::{InitCtx, Migration, Module};

use repository::SqliteBookRepository;
use seeder::{BookSeeder, FixtureSource, SeedOutcome};
use service::BookAppService;

/// Book catalog: REST API, list page and initial data.
pub struct BooksModule {
    service: BookAppService,
    localizer: Localizer,
    openapi: serde_json::Value,
}

impl BooksModule {
    pub fn new(pool: Pool, settings: &Settings) -> anyhow::Result<Self> {
        let repository = Arc::new(SqliteBookRepository::new(pool));
        let service = BookAppService::new(repository);
        let localizer = ui::BOOKSTORE_RESOURCE.localizer(&settings.ui.culture)?;
        let (_, api) = routes::router(service.clone());

        Ok(Self {
            service,
            localizer,
            openapi: serde_json::to_value(api)?,
        })
    }

    pub fn service(&self) -> &BookAppService {
        &self.service
    }

    pub fn seeder(&self, source: FixtureSource) -> BookSeeder<SqliteBookRepository> {
        BookSeeder::new(Arc::clone(self.service.repository()), source)
    }
}

#[async_trait]
impl Module for BooksModule {
    fn name(&self) -> &'static str {
        "books"
    }

    async fn init(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        tracing::info!(
            module = self.name(),
            environment = ?ctx.settings.environment,
            culture = self.localizer.culture(),
            "books module initialized"
        );
        Ok(())
    }

    fn routes(&self) -> Router {
        routes::router(self.service.clone()).0
    }

    fn pages(&self) -> Option<Router> {
        Some(ui::router(&self.localizer))
    }

    fn openapi(&self) -> Option<serde_json::Value> {
        Some(self.openapi.clone())
    }

    fn migrations(&self) -> Vec<Migration> {
        vec![Migration {
            id: "001_create_book",
            up: repository::MIGRATION_CREATE_BOOK,
        }]
    }

    async fn seed(&self, ctx: &InitCtx<'_>) -> anyhow::Result<()> {
        if !ctx.settings.seed.enabled {
            tracing::info!(module = self.name(), "seeding disabled");
            return Ok(());
        }

        let source = FixtureSource::from_settings(&ctx.settings.seed);
        match self.seeder(source).seed().await? {
            SeedOutcome::Seeded(count) => {
                tracing::info!(module = self.name(), count, "initial books inserted")
            }
            SeedOutcome::Skipped => tracing::debug!(module = self.name(), "books already present"),
        }
        Ok(())
    }

    async fn stop(&self) -> anyhow::Result<()> {
        tracing::info!(module = self.name(), "books module stopped");
        Ok(())
    }
}
