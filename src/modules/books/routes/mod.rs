//! REST endpoints of the books module, mounted under `/api/books`.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::{Json, Router};
use bookstore_http::error::{AppError, ErrorResponse};
use bookstore_http::extract::CurrentUser;
use bookstore_kernel::query::PagedResult;
use utoipa::openapi::OpenApi;
use utoipa_axum::{router::OpenApiRouter, routes};
use uuid::Uuid;

use super::models::{BookDto, BookGetListInput, CreateUpdateBookDto};
use super::service::BookAppService;

/// Router and OpenAPI fragment for the books API.
pub fn router(service: BookAppService) -> (Router, OpenApi) {
    let (router, api) = OpenApiRouter::<BookAppService>::new()
        .routes(routes!(list_books, create_book))
        .routes(routes!(get_book, update_book, delete_book))
        .routes(routes!(health_check))
        .split_for_parts();

    (router.with_state(service), api)
}

#[utoipa::path(
    get,
    path = "/",
    tag = "Books",
    params(BookGetListInput),
    responses(
        (status = 200, description = "One page of matching books", body = PagedResult<BookDto>),
        (status = 400, description = "Invalid sorting or paging", body = ErrorResponse)
    )
)]
async fn list_books(
    State(service): State<BookAppService>,
    input: Result<Query<BookGetListInput>, QueryRejection>,
) -> Result<Json<PagedResult<BookDto>>, AppError> {
    let Query(input) = input.map_err(|e| AppError::bad_request(e.body_text()))?;
    let page = service.get_list(&input).await?;
    Ok(Json(page))
}

#[utoipa::path(
    get,
    path = "/{id}",
    tag = "Books",
    params(("id" = Uuid, Path, description = "Book id")),
    responses(
        (status = 200, description = "The book", body = BookDto),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
async fn get_book(
    State(service): State<BookAppService>,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<Json<BookDto>, AppError> {
    let Path(id) = id.map_err(|e| AppError::bad_request(e.body_text()))?;
    Ok(Json(service.get(id).await?))
}

#[utoipa::path(
    post,
    path = "/",
    tag = "Books",
    request_body = CreateUpdateBookDto,
    responses(
        (status = 201, description = "Book created", body = BookDto),
        (status = 400, description = "Validation failed", body = ErrorResponse)
    )
)]
async fn create_book(
    State(service): State<BookAppService>,
    user: CurrentUser,
    body: Result<Json<CreateUpdateBookDto>, JsonRejection>,
) -> Result<(StatusCode, Json<BookDto>), AppError> {
    let Json(input) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    let book = service.create(input, user.id()).await?;
    Ok((StatusCode::CREATED, Json(book)))
}

#[utoipa::path(
    put,
    path = "/{id}",
    tag = "Books",
    params(("id" = Uuid, Path, description = "Book id")),
    request_body = CreateUpdateBookDto,
    responses(
        (status = 200, description = "Book updated", body = BookDto),
        (status = 400, description = "Validation failed", body = ErrorResponse),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
async fn update_book(
    State(service): State<BookAppService>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
    body: Result<Json<CreateUpdateBookDto>, JsonRejection>,
) -> Result<Json<BookDto>, AppError> {
    let Path(id) = id.map_err(|e| AppError::bad_request(e.body_text()))?;
    let Json(input) = body.map_err(|e| AppError::bad_request(e.body_text()))?;
    Ok(Json(service.update(id, input, user.id()).await?))
}

#[utoipa::path(
    delete,
    path = "/{id}",
    tag = "Books",
    params(("id" = Uuid, Path, description = "Book id")),
    responses(
        (status = 204, description = "Book deleted"),
        (status = 404, description = "No such book", body = ErrorResponse)
    )
)]
async fn delete_book(
    State(service): State<BookAppService>,
    user: CurrentUser,
    id: Result<Path<Uuid>, PathRejection>,
) -> Result<StatusCode, AppError> {
    let Path(id) = id.map_err(|e| AppError::bad_request(e.body_text()))?;
    service.delete(id, user.id()).await?;
    Ok(StatusCode::NO_CONTENT)
}

#[utoipa::path(
    get,
    path = "/health",
    tag = "Books",
    responses((status = 200, description = "OK", body = String))
)]
async fn health_check() -> &'static str {
    "books module is healthy"
}
