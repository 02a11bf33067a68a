//! SQLite persistence of [`Book`] aggregates.

use anyhow::Context;
use async_trait::async_trait;
use bookstore_db::timestamp::UtcTimestamp;
use bookstore_db::{query, Pool};
use bookstore_kernel::query::{FieldSet, ListQuery};
use bookstore_kernel::{AuditInfo, Repository};
use sqlx::query::Query;
use sqlx::sqlite::SqliteArguments;
use sqlx::{QueryBuilder, Sqlite};
use time::OffsetDateTime;
use uuid::Uuid;

use super::models::{Book, BookField};

pub const MIGRATION_CREATE_BOOK: &str = r#"
CREATE TABLE book (
    id                     BLOB PRIMARY KEY NOT NULL,
    title                  TEXT NOT NULL,
    language               TEXT NOT NULL DEFAULT '',
    country                TEXT NOT NULL DEFAULT '',
    author                 TEXT NOT NULL DEFAULT '',
    total_page             INTEGER NOT NULL DEFAULT 0,
    year                   INTEGER NOT NULL DEFAULT 0,
    link                   TEXT NOT NULL DEFAULT '',
    creation_time          TEXT NOT NULL,
    creator_id             BLOB,
    last_modification_time TEXT,
    last_modifier_id       BLOB,
    is_deleted             INTEGER NOT NULL DEFAULT 0,
    deleter_id             BLOB,
    deletion_time          TEXT
);
CREATE INDEX book_live_creation ON book (is_deleted, creation_time);
"#;

const COLUMNS: &str = "id, title, language, country, author, total_page, year, link, \
    creation_time, creator_id, last_modification_time, last_modifier_id, \
    is_deleted, deleter_id, deletion_time";

const INSERT_BOOK: &str = "INSERT INTO book (id, title, language, country, author, total_page, \
    year, link, creation_time, creator_id, last_modification_time, last_modifier_id, \
    is_deleted, deleter_id, deletion_time) \
    VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)";

#[derive(Debug, sqlx::FromRow)]
struct BookRow {
    id: Uuid,
    title: String,
    language: String,
    country: String,
    author: String,
    total_page: i32,
    year: i32,
    link: String,
    creation_time: UtcTimestamp,
    creator_id: Option<Uuid>,
    last_modification_time: Option<UtcTimestamp>,
    last_modifier_id: Option<Uuid>,
    is_deleted: bool,
    deleter_id: Option<Uuid>,
    deletion_time: Option<UtcTimestamp>,
}

impl From<BookRow> for Book {
    fn from(row: BookRow) -> Self {
        Book {
            id: row.id,
            title: row.title,
            language: row.language,
            country: row.country,
            author: row.author,
            total_page: row.total_page,
            year: row.year,
            link: row.link,
            audit: AuditInfo {
                creation_time: row.creation_time.into_inner(),
                creator_id: row.creator_id,
                last_modification_time: row.last_modification_time.map(UtcTimestamp::into_inner),
                last_modifier_id: row.last_modifier_id,
                is_deleted: row.is_deleted,
                deleter_id: row.deleter_id,
                deletion_time: row.deletion_time.map(UtcTimestamp::into_inner),
            },
        }
    }
}

fn stamp(value: Option<OffsetDateTime>) -> Option<UtcTimestamp> {
    value.map(UtcTimestamp)
}

#[derive(Clone)]
pub struct SqliteBookRepository {
    pool: Pool,
}

impl SqliteBookRepository {
    pub fn new(pool: Pool) -> Self {
        Self { pool }
    }

    fn insert_query(book: &Book) -> Query<'_, Sqlite, SqliteArguments<'_>> {
        sqlx::query(INSERT_BOOK)
            .bind(book.id)
            .bind(&book.title)
            .bind(&book.language)
            .bind(&book.country)
            .bind(&book.author)
            .bind(book.total_page)
            .bind(book.year)
            .bind(&book.link)
            .bind(UtcTimestamp(book.audit.creation_time))
            .bind(book.audit.creator_id)
            .bind(stamp(book.audit.last_modification_time))
            .bind(book.audit.last_modifier_id)
            .bind(book.audit.is_deleted)
            .bind(book.audit.deleter_id)
            .bind(stamp(book.audit.deletion_time))
    }
}

#[async_trait]
impl Repository<Book> for SqliteBookRepository {
    type Field = BookField;

    async fn find(&self, id: Uuid) -> anyhow::Result<Option<Book>> {
        let sql = format!("SELECT {COLUMNS} FROM book WHERE id = ? AND is_deleted = 0");
        let row: Option<BookRow> = sqlx::query_as(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?;
        Ok(row.map(Book::from))
    }

    async fn any(&self) -> anyhow::Result<bool> {
        let found: i64 =
            sqlx::query_scalar("SELECT EXISTS (SELECT 1 FROM book WHERE is_deleted = 0)")
                .fetch_one(&self.pool)
                .await?;
        Ok(found != 0)
    }

    async fn insert(&self, entity: &Book) -> anyhow::Result<()> {
        Self::insert_query(entity)
            .execute(&self.pool)
            .await
            .with_context(|| format!("failed to insert book {}", entity.id))?;
        Ok(())
    }

    async fn insert_many(&self, entities: &[Book]) -> anyhow::Result<()> {
        let mut tx = self.pool.begin().await?;
        for book in entities {
            Self::insert_query(book)
                .execute(&mut *tx)
                .await
                .with_context(|| format!("failed to insert book {}", book.id))?;
        }
        tx.commit().await?;
        Ok(())
    }

    async fn update(&self, entity: &Book) -> anyhow::Result<bool> {
        let result = sqlx::query(
            r#"
            UPDATE book SET
                title = ?, language = ?, country = ?, author = ?,
                total_page = ?, year = ?, link = ?,
                last_modification_time = ?, last_modifier_id = ?,
                is_deleted = ?, deleter_id = ?, deletion_time = ?
            WHERE id = ? AND is_deleted = 0
            "#,
        )
        .bind(&entity.title)
        .bind(&entity.language)
        .bind(&entity.country)
        .bind(&entity.author)
        .bind(entity.total_page)
        .bind(entity.year)
        .bind(&entity.link)
        .bind(stamp(entity.audit.last_modification_time))
        .bind(entity.audit.last_modifier_id)
        .bind(entity.audit.is_deleted)
        .bind(entity.audit.deleter_id)
        .bind(stamp(entity.audit.deletion_time))
        .bind(entity.id)
        .execute(&self.pool)
        .await?;
        Ok(result.rows_affected() > 0)
    }

    async fn list(&self, list: &ListQuery<BookField>) -> anyhow::Result<(Vec<Book>, u64)> {
        let mut count =
            QueryBuilder::<Sqlite>::new("SELECT COUNT(*) FROM book WHERE is_deleted = 0");
        query::push_filter(&mut count, &list.filter);
        let total: i64 = count.build_query_scalar().fetch_one(&self.pool).await?;

        let mut select = QueryBuilder::<Sqlite>::new(format!(
            "SELECT {COLUMNS} FROM book WHERE is_deleted = 0"
        ));
        query::push_filter(&mut select, &list.filter);
        query::push_order_by(&mut select, &list.sorting, BookField::Id.column());
        query::push_page(&mut select, list.page);

        let rows: Vec<BookRow> = select.build_query_as().fetch_all(&self.pool).await?;
        let books = rows.into_iter().map(Book::from).collect();

        Ok((books, u64::try_from(total).unwrap_or_default()))
    }
}
