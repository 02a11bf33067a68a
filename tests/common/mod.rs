#![allow(dead_code)]

use bookstore_app::modules::books::seeder::{FixtureSource, SeedOutcome};
use bookstore_app::modules::books::BooksModule;
use bookstore_db::Pool;
use bookstore_kernel::settings::Settings;
use bookstore_kernel::ModuleRegistry;

pub const FIVE_BOOKS: &str = r#"[
  {"Title": "The Hobbit", "Language": "English", "Country": "United Kingdom",
   "Author": "J. R. R. Tolkien", "TotalPage": 310, "Year": 1937,
   "Link": "https://en.wikipedia.org/wiki/The_Hobbit"},
  {"Title": "Crime and Punishment", "Language": "Russian", "Country": "Russia",
   "Author": "Fyodor Dostoevsky", "TotalPage": 551, "Year": 1866,
   "Link": "https://en.wikipedia.org/wiki/Crime_and_Punishment"},
  {"Title": "The Trial", "Language": "German", "Country": "Czechoslovakia",
   "Author": "Franz Kafka", "TotalPage": 160, "Year": 1925,
   "Link": "https://en.wikipedia.org/wiki/The_Trial"},
  {"Title": "Wuthering Heights", "Language": "English", "Country": "United Kingdom",
   "Author": "Emily Brontë", "TotalPage": 342, "Year": 1847,
   "Link": "https://en.wikipedia.org/wiki/Wuthering_Heights"},
  {"Title": "Madame Bovary", "Language": "French", "Country": "France",
   "Author": "Gustave Flaubert", "TotalPage": 528, "Year": 1857,
   "Link": "https://en.wikipedia.org/wiki/Madame_Bovary"}
]"#;

pub struct TestApp {
    pub pool: Pool,
    pub settings: Settings,
    pub registry: ModuleRegistry,
    pub books: BooksModule,
}

/// Migrated in-memory database without any books.
pub async fn empty_app() -> TestApp {
    let pool = bookstore_db::connect_in_memory().await.unwrap();
    let settings = Settings::default();
    let registry = bookstore_app::build_registry(&pool, &settings).unwrap();
    bookstore_app::prepare(&registry, &pool, &settings, false)
        .await
        .unwrap();
    let books = BooksModule::new(pool.clone(), &settings).unwrap();

    TestApp {
        pool,
        settings,
        registry,
        books,
    }
}

/// Migrated in-memory database holding [`FIVE_BOOKS`].
pub async fn seeded_app() -> TestApp {
    let app = empty_app().await;
    let outcome = app
        .books
        .seeder(FixtureSource::Bytes(FIVE_BOOKS.as_bytes().to_vec()))
        .seed()
        .await
        .unwrap();
    assert_eq!(outcome, SeedOutcome::Seeded(5));
    app
}
