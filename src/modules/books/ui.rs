//! Server-rendered book list page at `/Books`.
//!
//! Column titles and widget texts are localized when the page is rendered;
//! the table itself is filled by `index.js` from `/api/books`.

use std::sync::Arc;

use axum::extract::State;
use axum::http::header;
use axum::response::{Html, IntoResponse};
use axum::routing::get;
use axum::Router;
use bookstore_kernel::localization::{LocalizationResource, Localizer};

pub const BOOKSTORE_RESOURCE: LocalizationResource = LocalizationResource {
    name: "BookStore",
    default_culture: "en",
    cultures: &[
        ("en", include_str!("localization/en.json")),
        ("tr", include_str!("localization/tr.json")),
    ],
};

const PAGE_TEMPLATE: &str = include_str!("assets/index.html");
const PAGE_SCRIPT: &str = include_str!("assets/index.js");

#[derive(Clone)]
struct Page {
    html: Arc<str>,
}

pub fn router(localizer: &Localizer) -> Router {
    let page = Page {
        html: render_page(PAGE_TEMPLATE, localizer).into(),
    };

    Router::new()
        .route("/Books", get(index_page))
        .route("/Books/index.js", get(index_script))
        .with_state(page)
}

async fn index_page(State(page): State<Page>) -> Html<String> {
    Html(page.html.to_string())
}

async fn index_script() -> impl IntoResponse {
    (
        [(header::CONTENT_TYPE, "text/javascript; charset=utf-8")],
        PAGE_SCRIPT,
    )
}

/// Substitutes `{{L:Key}}`, `{{CULTURE}}` and `{{LOCALIZATION_JSON}}`.
pub fn render_page(template: &str, localizer: &Localizer) -> String {
    let texts = serde_json::to_string(localizer.texts())
        .unwrap_or_else(|_| "{}".to_string())
        .replace('<', "\\u003c");

    let template = template
        .replace("{{CULTURE}}", &escape_html(localizer.culture()))
        .replace("{{LOCALIZATION_JSON}}", &texts);

    let mut out = String::with_capacity(template.len());
    let mut rest = template.as_str();
    while let Some(start) = rest.find("{{L:") {
        out.push_str(&rest[..start]);
        let after = &rest[start + 4..];
        match after.find("}}") {
            Some(end) => {
                out.push_str(&escape_html(localizer.get(&after[..end])));
                rest = &after[end + 2..];
            }
            None => {
                out.push_str(&rest[start..]);
                rest = "";
            }
        }
    }
    out.push_str(rest);
    out
}

fn escape_html(text: &str) -> String {
    let mut escaped = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => escaped.push_str("&amp;"),
            '<' => escaped.push_str("&lt;"),
            '>' => escaped.push_str("&gt;"),
            '"' => escaped.push_str("&quot;"),
            '\'' => escaped.push_str("&#39;"),
            c => escaped.push(c),
        }
    }
    escaped
}
