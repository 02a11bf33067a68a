use std::fmt;
use std::str::FromStr;

use bookstore_kernel::query::{FieldSet, PagedAndSortedRequest};
use bookstore_kernel::{AuditInfo, Entity};
use garde::Validate;
use serde::{de, Deserialize, Deserializer, Serialize};
use time::OffsetDateTime;
use utoipa::{IntoParams, ToSchema};
use uuid::Uuid;

/// Book aggregate root.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Book {
    pub id: Uuid,
    pub title: String,
    pub language: String,
    pub country: String,
    pub author: String,
    pub total_page: i32,
    pub year: i32,
    pub link: String,
    pub audit: AuditInfo,
}

impl Entity for Book {
    type Id = Uuid;
    const NAME: &'static str = "Book";

    fn id(&self) -> Uuid {
        self.id
    }

    fn audit(&self) -> &AuditInfo {
        &self.audit
    }

    fn audit_mut(&mut self) -> &mut AuditInfo {
        &mut self.audit
    }
}

/// Queryable fields of [`Book`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BookField {
    Id,
    Title,
    Language,
    Country,
    Author,
    TotalPage,
    Year,
    Link,
    CreationTime,
}

impl FieldSet for BookField {
    fn all() -> &'static [Self] {
        &[
            BookField::Id,
            BookField::Title,
            BookField::Language,
            BookField::Country,
            BookField::Author,
            BookField::TotalPage,
            BookField::Year,
            BookField::Link,
            BookField::CreationTime,
        ]
    }

    fn name(self) -> &'static str {
        match self {
            BookField::Id => "id",
            BookField::Title => "title",
            BookField::Language => "language",
            BookField::Country => "country",
            BookField::Author => "author",
            BookField::TotalPage => "totalPage",
            BookField::Year => "year",
            BookField::Link => "link",
            BookField::CreationTime => "creationTime",
        }
    }

    fn column(self) -> &'static str {
        match self {
            BookField::Id => "id",
            BookField::Title => "title",
            BookField::Language => "language",
            BookField::Country => "country",
            BookField::Author => "author",
            BookField::TotalPage => "total_page",
            BookField::Year => "year",
            BookField::Link => "link",
            BookField::CreationTime => "creation_time",
        }
    }

    fn sortable(self) -> bool {
        !matches!(self, BookField::Id)
    }
}

/// Book as exposed by the API.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct BookDto {
    pub id: Uuid,
    pub title: String,
    pub language: String,
    pub country: String,
    pub author: String,
    pub total_page: i32,
    pub year: i32,
    pub link: String,
    #[serde(with = "time::serde::rfc3339")]
    pub creation_time: OffsetDateTime,
    pub creator_id: Option<Uuid>,
    #[serde(default, with = "time::serde::rfc3339::option")]
    pub last_modification_time: Option<OffsetDateTime>,
    pub last_modifier_id: Option<Uuid>,
}

impl From<Book> for BookDto {
    fn from(book: Book) -> Self {
        Self {
            id: book.id,
            title: book.title,
            language: book.language,
            country: book.country,
            author: book.author,
            total_page: book.total_page,
            year: book.year,
            link: book.link,
            creation_time: book.audit.creation_time,
            creator_id: book.audit.creator_id,
            last_modification_time: book.audit.last_modification_time,
            last_modifier_id: book.audit.last_modifier_id,
        }
    }
}

/// Request body for creating and updating a book.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Validate, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct CreateUpdateBookDto {
    #[garde(length(chars, min = 1, max = 128))]
    pub title: String,
    #[garde(length(chars, max = 128))]
    pub language: String,
    #[garde(length(chars, max = 128))]
    pub country: String,
    #[garde(length(chars, max = 128))]
    pub author: String,
    #[garde(skip)]
    pub total_page: i32,
    #[garde(skip)]
    pub year: i32,
    #[garde(length(chars, max = 2048))]
    pub link: String,
}

/// Query parameters of the book listing.
///
/// Keys are accepted in camelCase (`totalPage.min`) and PascalCase
/// (`TotalPage.Min`); empty values count as absent.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, IntoParams)]
#[into_params(parameter_in = Query)]
pub struct BookGetListInput {
    /// Text searched in title, language, author and country
    #[serde(default, alias = "Filter")]
    pub filter: Option<String>,
    #[serde(
        default,
        rename = "totalPage.min",
        alias = "TotalPage.Min",
        deserialize_with = "empty_as_none"
    )]
    pub total_page_min: Option<i32>,
    #[serde(
        default,
        rename = "totalPage.max",
        alias = "TotalPage.Max",
        deserialize_with = "empty_as_none"
    )]
    pub total_page_max: Option<i32>,
    #[serde(
        default,
        rename = "year.min",
        alias = "Year.Min",
        deserialize_with = "empty_as_none"
    )]
    pub year_min: Option<i32>,
    #[serde(
        default,
        rename = "year.max",
        alias = "Year.Max",
        deserialize_with = "empty_as_none"
    )]
    pub year_max: Option<i32>,
    /// Number of matches to skip
    #[serde(
        default,
        rename = "skipCount",
        alias = "SkipCount",
        deserialize_with = "empty_as_none"
    )]
    pub skip_count: Option<i64>,
    /// Page size, 0 to 1000 (default 10)
    #[serde(
        default,
        rename = "maxResultCount",
        alias = "MaxResultCount",
        deserialize_with = "empty_as_none"
    )]
    pub max_result_count: Option<i64>,
    /// Comma separated `field [asc|desc]` clauses
    #[serde(default, alias = "Sorting")]
    pub sorting: Option<String>,
}

impl PagedAndSortedRequest for BookGetListInput {
    fn skip_count(&self) -> Option<i64> {
        self.skip_count
    }

    fn max_result_count(&self) -> Option<i64> {
        self.max_result_count
    }

    fn sorting(&self) -> Option<&str> {
        self.sorting.as_deref()
    }
}

fn empty_as_none<'de, D, T>(deserializer: D) -> Result<Option<T>, D::Error>
where
    D: Deserializer<'de>,
    T: FromStr,
    T::Err: fmt::Display,
{
    let value = Option::<String>::deserialize(deserializer)?;
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(s) => s.parse().map(Some).map_err(de::Error::custom),
    }
}
