use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;

/// Which step of an import failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorKind {
    Authentication,
    Validation,
    UpstreamFetch,
    Extraction,
    Completion,
    CompletionParse,
    Persistence,
    MethodNotAllowed,
}

impl ErrorKind {
    pub fn status(&self) -> StatusCode {
        match self {
            ErrorKind::Authentication => StatusCode::UNAUTHORIZED,
            ErrorKind::Validation => StatusCode::BAD_REQUEST,
            ErrorKind::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            ErrorKind::UpstreamFetch
            | ErrorKind::Extraction
            | ErrorKind::Completion
            | ErrorKind::CompletionParse
            | ErrorKind::Persistence => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

/// Uniform failure result of every import step. `message` goes to the
/// client; `detail` (the full error chain) only goes to the logs.
#[derive(Debug, thiserror::Error)]
#[error("{message}")]
pub struct ImportError {
    pub kind: ErrorKind,
    pub message: String,
    detail: Option<String>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
}

impl ImportError {
    pub fn new(kind: ErrorKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
            detail: None,
        }
    }

    /// Wrap a failed step; only the outermost context reaches the client
    pub fn step(kind: ErrorKind, err: anyhow::Error) -> Self {
        Self {
            kind,
            message: err.to_string(),
            detail: Some(format!("{:#}", err)),
        }
    }

    /// For `map_err`
    pub fn at(kind: ErrorKind) -> impl FnOnce(anyhow::Error) -> Self {
        move |err| Self::step(kind, err)
    }
}

impl IntoResponse for ImportError {
    fn into_response(self) -> Response {
        let status = self.kind.status();
        let detail = self.detail.as_deref().unwrap_or(&self.message);

        if status.is_server_error() {
            tracing::error!(kind = ?self.kind, error = %detail, "Import failed");
        } else {
            tracing::warn!(kind = ?self.kind, error = %detail, "Import rejected");
        }

        (status, Json(ErrorBody { error: &self.message })).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::Context;

    #[test]
    fn test_status_mapping() {
        assert_eq!(ErrorKind::Authentication.status(), StatusCode::UNAUTHORIZED);
        assert_eq!(ErrorKind::Validation.status(), StatusCode::BAD_REQUEST);
        assert_eq!(ErrorKind::UpstreamFetch.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorKind::CompletionParse.status(), StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(ErrorKind::Persistence.status(), StatusCode::INTERNAL_SERVER_ERROR);
    }

    #[test]
    fn test_step_keeps_only_outer_message() {
        let inner: anyhow::Result<()> = Err(anyhow::anyhow!("connection reset by 10.0.0.7"));
        let err = inner.context("Failed to send request for PDF").unwrap_err();
        let import_err = ImportError::step(ErrorKind::UpstreamFetch, err);

        assert_eq!(import_err.message, "Failed to send request for PDF");
        assert!(import_err.detail.as_deref().unwrap().contains("10.0.0.7"));
    }
}
