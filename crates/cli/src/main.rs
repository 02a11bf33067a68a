use std::path::{Path, PathBuf};

use anyhow::Context;
use bookstore_app::modules::books::seeder::{parse_fixture, FixtureSource, SeedOutcome};
use bookstore_app::modules::books::BooksModule;
use bookstore_kernel::settings::Settings;
use clap::{Parser, Subcommand};
use time::OffsetDateTime;

#[derive(Debug, Parser)]
#[command(name = "bookstore", version, about = "Book catalog server and maintenance tasks")]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Run the HTTP server (migrates and seeds first)
    Serve,
    /// Apply pending database migrations
    Migrate,
    /// Insert the initial catalog into an empty database
    Seed {
        /// Fixture file to use instead of the configured one
        #[arg(long, value_name = "PATH")]
        fixture: Option<PathBuf>,
    },
    /// Parse a fixture file and report its size without touching storage
    CheckFixture {
        #[arg(value_name = "PATH")]
        path: PathBuf,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    if let Command::CheckFixture { path } = &cli.command {
        return check_fixture(path);
    }

    let settings = Settings::load().context("failed to load bookstore settings")?;
    bookstore_telemetry::init(&settings.telemetry)?;

    match cli.command {
        Command::Serve => bookstore_app::serve(settings).await,
        Command::Migrate => {
            let pool = bookstore_db::connect(&settings.database).await?;
            let registry = bookstore_app::build_registry(&pool, &settings)?;
            bookstore_app::prepare(&registry, &pool, &settings, false).await?;
            pool.close().await;
            Ok(())
        }
        Command::Seed { fixture } => seed(settings, fixture).await,
        Command::CheckFixture { .. } => Ok(()),
    }
}

async fn seed(settings: Settings, fixture: Option<PathBuf>) -> anyhow::Result<()> {
    let pool = bookstore_db::connect(&settings.database).await?;
    let registry = bookstore_app::build_registry(&pool, &settings)?;
    bookstore_app::prepare(&registry, &pool, &settings, false).await?;

    let source = match fixture {
        Some(path) => FixtureSource::File(path),
        None => FixtureSource::from_settings(&settings.seed),
    };
    let books = BooksModule::new(pool.clone(), &settings)?;
    match books.seeder(source).seed().await? {
        SeedOutcome::Seeded(count) => println!("seeded {count} books"),
        SeedOutcome::Skipped => println!("books already present, nothing to do"),
    }

    pool.close().await;
    Ok(())
}

fn check_fixture(path: &Path) -> anyhow::Result<()> {
    let source = FixtureSource::File(path.to_path_buf());
    let bytes = source.read()?;
    let books = parse_fixture(&bytes, OffsetDateTime::now_utc())
        .with_context(|| format!("invalid fixture {}", path.display()))?;
    println!("{}: {} books", path.display(), books.len());
    Ok(())
}
