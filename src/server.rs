//! HTTP surface: router, handlers, and error → response mapping.
//!
//! Three routes, matching the original browser contract:
//!
//! * `GET /` — the embedded upload form.
//! * `POST /convert` — the conversion pipeline; success is a `text/plain`
//!   attachment, validation failures are 400, upstream failures are 500
//!   with the upstream body text embedded.
//! * everything else — 404 plain text. An unmatched method on a matched
//!   path also falls through to the 404 fallback; there is no distinct
//!   405 handling.
//!
//! All state is request-local. The only shared value is the [`OcrClient`],
//! which is clone-cheap and holds no per-request data.

use crate::client::OcrClient;
use crate::config::RelayConfig;
use crate::convert;
use crate::error::RelayError;
use crate::request::ConversionRequest;
use axum::{
    extract::{DefaultBodyLimit, Multipart, State},
    http::{header, StatusCode},
    response::{Html, IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tower_http::trace::TraceLayer;
use tracing::error;

/// The upload form served at `GET /`.
const INDEX_HTML: &str = include_str!("ui/index.html");

/// Build the application router.
pub fn router(config: &RelayConfig) -> Result<Router, RelayError> {
    let client = OcrClient::new(config)?;

    Ok(Router::new()
        .route("/", get(index).fallback(not_found))
        .route("/convert", post(convert_document).fallback(not_found))
        .fallback(not_found)
        .layer(DefaultBodyLimit::max(config.max_upload_bytes))
        .layer(TraceLayer::new_for_http())
        .with_state(client))
}

/// `GET /` — static upload form.
async fn index() -> Html<&'static str> {
    Html(INDEX_HTML)
}

/// Shared 404 for unknown paths and unmatched methods.
async fn not_found() -> Response {
    (StatusCode::NOT_FOUND, "Not found").into_response()
}

/// `POST /convert` — parse the multipart form, run the pipeline, and return
/// the merged Markdown as a downloadable attachment.
async fn convert_document(
    State(client): State<OcrClient>,
    multipart: Multipart,
) -> Result<Response, RelayError> {
    let request = read_form(multipart).await?;
    let output = convert::convert(&client, &request).await?;

    let disposition = format!(
        "attachment; filename=\"{}\"",
        sanitize_header_value(&output.filename)
    );

    Ok((
        StatusCode::OK,
        [
            (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
            (header::CONTENT_DISPOSITION, disposition),
        ],
        output.markdown,
    )
        .into_response())
}

/// Collect the known form fields and validate them into a
/// [`ConversionRequest`]. Unknown fields are ignored.
async fn read_form(mut multipart: Multipart) -> Result<ConversionRequest, RelayError> {
    let mut credential: Option<String> = None;
    let mut source_kind: Option<String> = None;
    let mut file: Option<(String, Vec<u8>)> = None;
    let mut url: Option<String> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(malformed_multipart)?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "apiKey" => credential = Some(field.text().await.map_err(malformed_multipart)?),
            "sourceKind" => source_kind = Some(field.text().await.map_err(malformed_multipart)?),
            "pdfFile" => {
                let file_name = field.file_name().unwrap_or("document.pdf").to_string();
                let bytes = field.bytes().await.map_err(malformed_multipart)?;
                file = Some((file_name, bytes.to_vec()));
            }
            "documentUrl" => url = Some(field.text().await.map_err(malformed_multipart)?),
            _ => {}
        }
    }

    ConversionRequest::from_form_parts(credential, source_kind, file, url)
}

fn malformed_multipart(e: axum::extract::multipart::MultipartError) -> RelayError {
    RelayError::MissingDocument {
        detail: format!("malformed multipart body: {e}"),
    }
}

/// Keep the `Content-Disposition` header parseable: drop quotes and control
/// characters from the derived filename. No further sanitisation is done.
fn sanitize_header_value(filename: &str) -> String {
    filename
        .chars()
        .filter(|c| !c.is_control() && *c != '"')
        .collect()
}

impl IntoResponse for RelayError {
    fn into_response(self) -> Response {
        let status =
            StatusCode::from_u16(self.status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let message = self.to_string();
        if status.is_server_error() {
            error!(%status, "conversion failed: {message}");
        }
        (status, message).into_response()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sanitize_strips_quotes_and_controls() {
        assert_eq!(sanitize_header_value("report.md"), "report.md");
        assert_eq!(sanitize_header_value("a\"b\r\n.md"), "ab.md");
    }

    #[test]
    fn index_page_contains_form() {
        assert!(INDEX_HTML.contains("<form"));
        assert!(INDEX_HTML.contains("apiKey"));
        assert!(INDEX_HTML.contains("sourceKind"));
        assert!(INDEX_HTML.contains("/convert"));
    }

    #[test]
    fn router_builds_with_defaults() {
        let config = RelayConfig::default();
        assert!(router(&config).is_ok());
    }
}
