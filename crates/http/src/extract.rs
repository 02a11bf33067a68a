//! Request extractors shared by module routes.

use axum::{extract::FromRequestParts, http::request::Parts};
use uuid::Uuid;

use crate::error::AppError;

pub const USER_ID_HEADER: &str = "x-user-id";

/// Caller identity recorded in audit stamps, taken from `X-User-Id`.
///
/// Anonymous when the header is absent.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct CurrentUser(pub Option<Uuid>);

impl CurrentUser {
    pub fn id(&self) -> Option<Uuid> {
        self.0
    }
}

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, _state: &S) -> Result<Self, Self::Rejection> {
        let Some(value) = parts.headers.get(USER_ID_HEADER) else {
            return Ok(CurrentUser(None));
        };

        value
            .to_str()
            .ok()
            .and_then(|v| Uuid::parse_str(v.trim()).ok())
            .map(|id| CurrentUser(Some(id)))
            .ok_or_else(|| AppError::bad_request("X-User-Id header must be a UUID"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::Request;

    async fn extract(header: Option<&str>) -> Result<CurrentUser, AppError> {
        let mut builder = Request::builder().uri("/");
        if let Some(h) = header {
            builder = builder.header(USER_ID_HEADER, h);
        }
        let (mut parts, _) = builder.body(()).unwrap().into_parts();
        CurrentUser::from_request_parts(&mut parts, &()).await
    }

    #[tokio::test]
    async fn missing_header_is_anonymous() {
        assert_eq!(extract(None).await.unwrap(), CurrentUser(None));
    }

    #[tokio::test]
    async fn valid_header_is_parsed() {
        let id = Uuid::now_v7();
        let user = extract(Some(&id.to_string())).await.unwrap();
        assert_eq!(user.id(), Some(id));
    }

    #[tokio::test]
    async fn malformed_header_is_rejected() {
        let err = extract(Some("not-a-uuid")).await.unwrap_err();
        assert!(matches!(err, AppError::BadRequest { .. }));
    }
}
