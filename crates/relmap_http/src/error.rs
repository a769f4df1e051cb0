//! Error to HTTP response mapping.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use log::error;
use relmap_core::RepoError;
use serde_json::json;
use std::error::Error;
use std::fmt::{Display, Formatter};

#[derive(Debug)]
pub enum ApiError {
    Repo(RepoError),
    /// A handler panicked while holding the connection lock.
    LockPoisoned,
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            Self::Repo(RepoError::NotFound { .. }) => StatusCode::NOT_FOUND,
            Self::Repo(RepoError::AlreadyPersisted { .. }) => StatusCode::CONFLICT,
            Self::Repo(RepoError::Inconsistent(_) | RepoError::InvalidData(_)) => {
                StatusCode::UNPROCESSABLE_ENTITY
            }
            Self::Repo(_) | Self::LockPoisoned => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl Display for ApiError {
    fn fmt(&self, f: &mut Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Repo(err) => write!(f, "{err}"),
            Self::LockPoisoned => write!(f, "store lock poisoned"),
        }
    }
}

impl Error for ApiError {
    fn source(&self) -> Option<&(dyn Error + 'static)> {
        match self {
            Self::Repo(err) => Some(err),
            Self::LockPoisoned => None,
        }
    }
}

impl From<RepoError> for ApiError {
    fn from(value: RepoError) -> Self {
        Self::Repo(value)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(
                "event=http_response module=http status=error code={} error={self}",
                status.as_u16()
            );
        }
        (status, Json(json!({ "error": self.to_string() }))).into_response()
    }
}
