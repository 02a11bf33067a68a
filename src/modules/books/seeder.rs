//! Initial catalog data, inserted once into an empty book table.

use std::borrow::Cow;
use std::path::PathBuf;
use std::sync::Arc;

use bookstore_kernel::settings::SeedSettings;
use bookstore_kernel::{AuditInfo, Repository};
use serde::Deserialize;
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::Book;

static EMBEDDED_FIXTURE: &[u8] = include_bytes!("data/initial-books.json");

#[derive(Debug, thiserror::Error)]
pub enum SeedError {
    #[error("failed to read fixture {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("malformed book fixture: {0}")]
    Fixture(#[from] serde_json::Error),

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SeedOutcome {
    Seeded(usize),
    Skipped,
}

/// Where the fixture bytes come from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FixtureSource {
    /// Catalog bundled with the binary.
    Embedded,
    File(PathBuf),
    Bytes(Vec<u8>),
}

impl FixtureSource {
    pub fn from_settings(settings: &SeedSettings) -> Self {
        match &settings.fixture_path {
            Some(path) => FixtureSource::File(path.clone()),
            None => FixtureSource::Embedded,
        }
    }

    pub fn read(&self) -> Result<Cow<'_, [u8]>, SeedError> {
        match self {
            FixtureSource::Embedded => Ok(Cow::Borrowed(EMBEDDED_FIXTURE)),
            FixtureSource::File(path) => std::fs::read(path)
                .map(Cow::Owned)
                .map_err(|source| SeedError::Io {
                    path: path.clone(),
                    source,
                }),
            FixtureSource::Bytes(bytes) => Ok(Cow::Borrowed(bytes)),
        }
    }
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "PascalCase")]
struct FixtureBook {
    title: String,
    #[serde(default)]
    language: String,
    #[serde(default)]
    country: String,
    #[serde(default)]
    author: String,
    #[serde(default)]
    total_page: i32,
    #[serde(default)]
    year: i32,
    #[serde(default)]
    link: String,
}

/// Parse fixture bytes into new books created at `now` by the system.
pub fn parse_fixture(bytes: &[u8], now: OffsetDateTime) -> Result<Vec<Book>, SeedError> {
    let rows: Vec<FixtureBook> = serde_json::from_slice(bytes)?;
    Ok(rows
        .into_iter()
        .map(|row| Book {
            id: Uuid::now_v7(),
            title: row.title,
            language: row.language,
            country: row.country,
            author: row.author,
            total_page: row.total_page,
            year: row.year,
            link: row.link,
            audit: AuditInfo::created(None, now),
        })
        .collect())
}

pub struct BookSeeder<R> {
    repository: Arc<R>,
    source: FixtureSource,
}

impl<R> BookSeeder<R>
where
    R: Repository<Book>,
{
    pub fn new(repository: Arc<R>, source: FixtureSource) -> Self {
        Self { repository, source }
    }

    /// Inserts the fixture unless live books already exist.
    pub async fn seed(&self) -> Result<SeedOutcome, SeedError> {
        if self.repository.any().await? {
            tracing::info!("book catalog not empty, seeding skipped");
            return Ok(SeedOutcome::Skipped);
        }

        let bytes = self.source.read()?;
        let books = parse_fixture(&bytes, OffsetDateTime::now_utc())?;
        self.repository.insert_many(&books).await?;

        tracing::info!(count = books.len(), "book catalog seeded");
        Ok(SeedOutcome::Seeded(books.len()))
    }
}
