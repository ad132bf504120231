use axum::http::{HeaderMap, header::AUTHORIZATION};
use serde::{Deserialize, Serialize};

use extract::PropertyExtractor;
use ingest::PdfReader;
use store::{NewPropertyRecord, PropertyRecord};

use crate::error::{ErrorKind, ImportError};
use crate::metrics::TimedOperation;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ImportRequest {
    #[serde(default)]
    pub pdf_url: Option<String>,
    #[serde(default)]
    pub file_name: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ImportResponse {
    pub success: bool,
    pub property: PropertyRecord,
}

/// Token from `Authorization: Bearer <token>`
pub fn bearer_token(headers: &HeaderMap) -> Result<&str, ImportError> {
    let value = headers
        .get(AUTHORIZATION)
        .ok_or_else(|| ImportError::new(ErrorKind::Authentication, "Missing authorization header"))?;

    let value = value
        .to_str()
        .map_err(|_| ImportError::new(ErrorKind::Authentication, "Invalid authorization header"))?;

    match value.strip_prefix("Bearer ").map(str::trim) {
        Some(token) if !token.is_empty() => Ok(token),
        _ => Err(ImportError::new(ErrorKind::Authentication, "Invalid authorization header")),
    }
}

/// authenticate -> fetch -> extract -> complete -> parse -> insert.
/// The first failing step ends the request; nothing is retried.
#[tracing::instrument(skip_all, fields(request_id = %uuid::Uuid::new_v4(), user_id = tracing::field::Empty))]
pub async fn run_import(
    state: &AppState,
    headers: &HeaderMap,
    body: &[u8],
) -> Result<PropertyRecord, ImportError> {
    let token = bearer_token(headers)?;
    let identity = state
        .identity
        .resolve(token)
        .await
        .map_err(ImportError::at(ErrorKind::Authentication))?;
    tracing::Span::current().record("user_id", identity.id.as_str());

    let request: ImportRequest = serde_json::from_slice(body).map_err(|e| {
        ImportError::new(ErrorKind::Validation, format!("Invalid request body: {}", e))
    })?;

    let pdf_url = request
        .pdf_url
        .filter(|url| !url.trim().is_empty())
        .ok_or_else(|| ImportError::new(ErrorKind::Validation, "PDF URL is required"))?;

    // Fetch
    let timer = TimedOperation::start();
    let bytes = state
        .fetcher
        .fetch(&pdf_url)
        .await
        .map_err(ImportError::at(ErrorKind::UpstreamFetch))?;
    state.metrics.record_fetch(timer.elapsed());

    // Extract text off the async workers; large PDFs take a while
    let timer = TimedOperation::start();
    let pdf = tokio::task::spawn_blocking(move || PdfReader::extract_text(&bytes))
        .await
        .map_err(|e| ImportError::new(ErrorKind::Extraction, format!("PDF extraction aborted: {}", e)))?
        .map_err(ImportError::at(ErrorKind::Extraction))?;
    state.metrics.record_extract(timer.elapsed(), pdf.page_count);
    tracing::info!(pages = pdf.page_count, chars = pdf.text.len(), "Extracted PDF text");

    // Complete
    let timer = TimedOperation::start();
    let content = state
        .extractor
        .complete(&pdf.text)
        .await
        .map_err(ImportError::at(ErrorKind::Completion))?;
    state.metrics.record_completion(timer.elapsed());

    let data = PropertyExtractor::parse(content.as_deref())
        .map_err(ImportError::at(ErrorKind::CompletionParse))?;

    // Insert with the caller's own credential
    let timer = TimedOperation::start();
    let record = NewPropertyRecord::imported(identity.id, data, request.file_name);
    let property = state
        .store
        .insert(token, &record)
        .await
        .map_err(ImportError::at(ErrorKind::Persistence))?;
    state.metrics.record_insert(timer.elapsed());

    tracing::info!(source_pdf_name = ?property.source_pdf_name, "Property imported");
    Ok(property)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::HeaderValue;

    fn headers_with(auth: &str) -> HeaderMap {
        let mut headers = HeaderMap::new();
        headers.insert(AUTHORIZATION, HeaderValue::from_str(auth).unwrap());
        headers
    }

    #[test]
    fn test_bearer_token_extracted() {
        let headers = headers_with("Bearer abc.def.ghi");
        assert_eq!(bearer_token(&headers).unwrap(), "abc.def.ghi");
    }

    #[test]
    fn test_bearer_token_rejections() {
        let missing = bearer_token(&HeaderMap::new()).unwrap_err();
        assert_eq!(missing.kind, ErrorKind::Authentication);
        assert_eq!(missing.message, "Missing authorization header");

        for bad in ["Basic dXNlcjpwdw==", "Bearer ", "Bearer    ", "bearer abc", "abc"] {
            let err = bearer_token(&headers_with(bad)).unwrap_err();
            assert_eq!(err.kind, ErrorKind::Authentication, "{bad}");
        }
    }

    #[test]
    fn test_request_body_field_names() {
        let request: ImportRequest =
            serde_json::from_str(r#"{"pdfUrl":"https://x/y.pdf","fileName":"y.pdf"}"#).unwrap();
        assert_eq!(request.pdf_url.as_deref(), Some("https://x/y.pdf"));
        assert_eq!(request.file_name.as_deref(), Some("y.pdf"));

        let empty: ImportRequest = serde_json::from_str("{}").unwrap();
        assert!(empty.pdf_url.is_none());
    }
}
