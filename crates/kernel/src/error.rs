use serde_json::json;

use crate::query::QueryError;

pub type CrudResult<T, E = CrudError> = std::result::Result<T, E>;

/// Failures surfaced by application services.
#[derive(Debug, thiserror::Error)]
pub enum CrudError {
    #[error("{entity} {id} not found")]
    NotFound { entity: &'static str, id: String },

    #[error("invalid argument: {message}")]
    InvalidArgument {
        message: String,
        details: Vec<serde_json::Value>,
    },

    #[error(transparent)]
    Storage(#[from] anyhow::Error),
}

impl CrudError {
    pub fn not_found(entity: &'static str, id: impl std::fmt::Display) -> Self {
        Self::NotFound {
            entity,
            id: id.to_string(),
        }
    }

    pub fn invalid_argument(message: impl Into<String>) -> Self {
        Self::InvalidArgument {
            message: message.into(),
            details: Vec::new(),
        }
    }
}

impl From<QueryError> for CrudError {
    fn from(e: QueryError) -> Self {
        Self::invalid_argument(e.to_string())
    }
}

impl From<garde::Report> for CrudError {
    fn from(report: garde::Report) -> Self {
        let details = report
            .iter()
            .map(|(path, error)| json!({"field": path.to_string(), "error": error.to_string()}))
            .collect();
        Self::InvalidArgument {
            message: "input validation failed".to_string(),
            details,
        }
    }
}
