use crate::client::UpstreamError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

pub const NOT_FOUND_MESSAGE: &str = "Página não encontrada!";
pub const UNEXPECTED_MESSAGE: &str = "Ops! Ocorreu um erro inesperado.";

/// Result type alias for catalog operations
pub type Result<T, E = CatalogError> = std::result::Result<T, E>;

#[derive(thiserror::Error, Debug)]
pub enum CatalogError {
    #[error("upstream error: {0}")]
    Upstream(#[from] UpstreamError),

    #[error("no route matched the request")]
    RouteNotFound,

    #[error("catalog record is missing field `{field}`")]
    MalformedRecord { field: &'static str },

    #[error("template error: {0}")]
    Render(#[from] minijinja::Error),

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("HTTP client setup failed: {0}")]
    Client(#[from] reqwest::Error),

    #[error("internal error: {0}")]
    Internal(String),
}

impl CatalogError {
    pub fn status(&self) -> StatusCode {
        match self {
            CatalogError::RouteNotFound => StatusCode::NOT_FOUND,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Marker left on a failed response so the error-page layer can render it.
///
/// The error itself never reaches the client; only the status and the
/// generic message do.
#[derive(Clone, Debug, PartialEq)]
pub struct ErrorPage {
    pub status: StatusCode,
    pub message: &'static str,
}

impl ErrorPage {
    pub fn for_status(status: StatusCode) -> Self {
        let message = match status {
            StatusCode::NOT_FOUND => NOT_FOUND_MESSAGE,
            _ => UNEXPECTED_MESSAGE,
        };
        ErrorPage { status, message }
    }
}

impl IntoResponse for CatalogError {
    fn into_response(self) -> Response {
        let status = self.status();
        match status {
            StatusCode::NOT_FOUND => tracing::debug!(error = %self, "page not found"),
            _ => tracing::error!(error = ?self, "request failed: {self}"),
        }

        let mut response = status.into_response();
        response.extensions_mut().insert(ErrorPage::for_status(status));
        response
    }
}
