use bookstore_kernel::query::{FilterSpec, SortField};
use bookstore_kernel::{AuditInfo, CrudAppService, CrudPolicy};
use uuid::Uuid;

use super::models::{Book, BookDto, BookField, BookGetListInput, CreateUpdateBookDto};
use super::repository::SqliteBookRepository;

/// Fields searched by the free-text `filter`.
pub const TEXT_FILTER_FIELDS: &[BookField] = &[
    BookField::Title,
    BookField::Language,
    BookField::Author,
    BookField::Country,
];

/// Book specifics for the generic CRUD service: mapping plus the list filter.
pub struct BookCrud;

impl CrudPolicy for BookCrud {
    type Entity = Book;
    type Field = BookField;
    type Dto = BookDto;
    type ListInput = BookGetListInput;
    type CreateInput = CreateUpdateBookDto;
    type UpdateInput = CreateUpdateBookDto;

    fn to_dto(entity: Book) -> BookDto {
        entity.into()
    }

    fn create_entity(id: Uuid, input: CreateUpdateBookDto, audit: AuditInfo) -> Book {
        Book {
            id,
            title: input.title,
            language: input.language,
            country: input.country,
            author: input.author,
            total_page: input.total_page,
            year: input.year,
            link: input.link,
            audit,
        }
    }

    fn apply_update(book: &mut Book, input: CreateUpdateBookDto) {
        book.title = input.title;
        book.language = input.language;
        book.country = input.country;
        book.author = input.author;
        book.total_page = input.total_page;
        book.year = input.year;
        book.link = input.link;
    }

    fn new_id() -> Uuid {
        Uuid::now_v7()
    }

    fn filter(input: &BookGetListInput) -> FilterSpec<BookField> {
        FilterSpec::new()
            .contains_any(TEXT_FILTER_FIELDS, input.filter.as_deref())
            .range(
                BookField::TotalPage,
                input.total_page_min.map(i64::from),
                input.total_page_max.map(i64::from),
            )
            .range(
                BookField::Year,
                input.year_min.map(i64::from),
                input.year_max.map(i64::from),
            )
    }

    fn default_sorting() -> Vec<SortField<BookField>> {
        vec![SortField::desc(BookField::CreationTime)]
    }
}

pub type BookAppService<R = SqliteBookRepository> = CrudAppService<BookCrud, R>;
