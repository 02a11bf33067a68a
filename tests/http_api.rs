mod common;

use axum::body::Body;
use axum::http::{header, Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use common::{seeded_app, TestApp};

fn router(app: &TestApp) -> Router {
    bookstore_http::build_router(&app.registry, &app.settings)
}

async fn send(router: &Router, request: Request<Body>) -> (StatusCode, Vec<u8>) {
    let response = router.clone().oneshot(request).await.unwrap();
    let status = response.status();
    let body = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    (status, body.to_vec())
}

async fn get_json(router: &Router, uri: &str) -> (StatusCode, Value) {
    let (status, body) = send(router, Request::get(uri).body(Body::empty()).unwrap()).await;
    (status, serde_json::from_slice(&body).unwrap())
}

fn json_request(method: &str, uri: &str, body: &Value) -> Request<Body> {
    Request::builder()
        .method(method)
        .uri(uri)
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(body.to_string()))
        .unwrap()
}

fn new_book() -> Value {
    json!({
        "title": "Anna Karenina",
        "language": "Russian",
        "country": "Russia",
        "author": "Leo Tolstoy",
        "totalPage": 864,
        "year": 1878,
        "link": "https://en.wikipedia.org/wiki/Anna_Karenina"
    })
}

#[tokio::test]
async fn list_returns_items_and_total_count() {
    let app = seeded_app().await;
    let router = router(&app);

    let (status, body) = get_json(&router, "/api/books?maxResultCount=2&sorting=year").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 5);
    assert_eq!(body["items"].as_array().unwrap().len(), 2);
    assert_eq!(body["items"][0]["title"], "Wuthering Heights");
    assert_eq!(body["items"][0]["totalPage"], 342);
}

#[tokio::test]
async fn list_accepts_dotted_range_keys() {
    let app = seeded_app().await;
    let router = router(&app);

    let (status, body) =
        get_json(&router, "/api/books?Filter=HOBBIT&TotalPage.Min=300&totalPage.max=400").await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["totalCount"], 1);
    assert_eq!(body["items"][0]["author"], "J. R. R. Tolkien");
}

#[tokio::test]
async fn invalid_listing_is_a_bad_request() {
    let app = seeded_app().await;
    let router = router(&app);

    for uri in [
        "/api/books?sorting=publisher",
        "/api/books?maxResultCount=5000",
        "/api/books?skipCount=-3",
        "/api/books?year.min=soon",
    ] {
        let (status, body) = get_json(&router, uri).await;
        assert_eq!(status, StatusCode::BAD_REQUEST, "{uri}");
        assert_eq!(body["error"]["code"], "invalid_argument", "{uri}");
    }
}

#[tokio::test]
async fn crud_lifecycle_over_http() {
    let app = seeded_app().await;
    let router = router(&app);
    let actor = uuid::Uuid::now_v7();

    let mut create = json_request("POST", "/api/books", &new_book());
    create
        .headers_mut()
        .insert("x-user-id", actor.to_string().parse().unwrap());
    let (status, body) = send(&router, create).await;
    assert_eq!(status, StatusCode::CREATED);
    let created: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(created["creatorId"], actor.to_string());
    let id = created["id"].as_str().unwrap().to_string();

    let (status, fetched) = get_json(&router, &format!("/api/books/{id}")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(fetched, created);

    let mut changes = new_book();
    changes["year"] = json!(1877);
    let (status, body) = send(
        &router,
        json_request("PUT", &format!("/api/books/{id}"), &changes),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    let updated: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(updated["year"], 1877);
    assert!(updated["lastModificationTime"].is_string());

    let delete = Request::delete(format!("/api/books/{id}"))
        .body(Body::empty())
        .unwrap();
    let (status, body) = send(&router, delete).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    assert!(body.is_empty());

    let (status, body) = get_json(&router, &format!("/api/books/{id}")).await;
    assert_eq!(status, StatusCode::NOT_FOUND);
    assert_eq!(body["error"]["code"], "not_found");

    let (_, list) = get_json(&router, "/api/books").await;
    assert_eq!(list["totalCount"], 5);
}

#[tokio::test]
async fn invalid_bodies_and_ids_are_rejected() {
    let app = seeded_app().await;
    let router = router(&app);

    let mut book = new_book();
    book["title"] = json!("");
    let (status, body) = send(&router, json_request("POST", "/api/books", &book)).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
    let body: Value = serde_json::from_slice(&body).unwrap();
    assert_eq!(body["error"]["details"][0]["field"], "title");

    let (status, _) = send(
        &router,
        json_request("POST", "/api/books", &json!({"title": 1})),
    )
    .await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let (status, _) = get_json(&router, "/api/books/not-a-uuid").await;
    assert_eq!(status, StatusCode::BAD_REQUEST);

    let missing = uuid::Uuid::now_v7();
    let (status, _) = send(
        &router,
        json_request("PUT", &format!("/api/books/{missing}"), &new_book()),
    )
    .await;
    assert_eq!(status, StatusCode::NOT_FOUND);

    let mut bad_actor = json_request("POST", "/api/books", &new_book());
    bad_actor
        .headers_mut()
        .insert("x-user-id", "somebody".parse().unwrap());
    let (status, _) = send(&router, bad_actor).await;
    assert_eq!(status, StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn book_page_and_script_are_served() {
    let app = seeded_app().await;
    let router = router(&app);

    let (status, body) = send(&router, Request::get("/Books").body(Body::empty()).unwrap()).await;
    assert_eq!(status, StatusCode::OK);
    let html = String::from_utf8(body).unwrap();
    assert!(html.contains("id=\"BooksTable\""));
    assert!(html.contains("Total pages"));
    assert!(html.contains("/Books/index.js"));

    let response = router
        .clone()
        .oneshot(Request::get("/Books/index.js").body(Body::empty()).unwrap())
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers()[header::CONTENT_TYPE]
        .to_str()
        .unwrap()
        .starts_with("text/javascript"));
}

#[tokio::test]
async fn openapi_documents_book_paths() {
    let app = seeded_app().await;
    let router = router(&app);

    let (status, doc) = get_json(&router, "/docs/openapi.json").await;
    assert_eq!(status, StatusCode::OK);
    assert!(doc["paths"]["/api/books"]["get"].is_object());
    assert!(doc["paths"]["/api/books"]["post"].is_object());
    assert!(doc["paths"]["/api/books/{id}"]["delete"].is_object());
    assert!(doc["components"]["schemas"]["BookDto"].is_object());

    let (status, body) = send(
        &router,
        Request::get("/api/books/health").body(Body::empty()).unwrap(),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body, b"books module is healthy");
}

#[tokio::test]
async fn responses_carry_request_id() {
    let app = seeded_app().await;
    let response = router(&app)
        .oneshot(Request::get("/healthz").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}
