//! Mistral API client: the three upstream calls the pipeline depends on.
//!
//! Each operation is exactly one round trip with no retry, polling, or
//! streaming. A non-success status becomes [`RelayError::Upstream`] carrying
//! the response body verbatim; a 2xx body that fails to decode becomes
//! [`RelayError::MalformedResponse`] rather than a panicking field access.
//!
//! The API key is supplied per call and only ever placed in the
//! `Authorization` header — it never appears in URLs, logs, or errors.

use crate::config::RelayConfig;
use crate::error::{RelayError, UpstreamEndpoint};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tracing::debug;

/// Purpose tag sent with the file upload, marking it as OCR input.
const UPLOAD_PURPOSE: &str = "ocr";

// ── Wire types ───────────────────────────────────────────────────────────

/// Identifier returned by the file-upload endpoint.
#[derive(Debug, Clone, Deserialize)]
pub struct FileHandle {
    pub id: String,
}

/// Time-limited URL granting read access to an uploaded document.
#[derive(Debug, Clone, Deserialize)]
pub struct SignedUrl {
    pub url: String,
}

/// The OCR request body: `{model, document, include_image_base64}`.
#[derive(Debug, Serialize)]
struct OcrRequest<'a> {
    model: &'a str,
    document: OcrDocument<'a>,
    include_image_base64: bool,
}

#[derive(Debug, Serialize)]
struct OcrDocument<'a> {
    #[serde(rename = "type")]
    kind: &'a str,
    document_url: &'a str,
}

/// Per-document OCR result: an ordered sequence of pages.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrResponse {
    pub pages: Vec<OcrPage>,
}

/// One page of OCR output: extracted Markdown plus any inline images.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrPage {
    pub markdown: String,
    /// Absent in the upstream JSON when a page has no images.
    #[serde(default)]
    pub images: Vec<OcrImage>,
}

/// An inline image: the placeholder name used in the page Markdown and its
/// base64-encoded data.
#[derive(Debug, Clone, Deserialize)]
pub struct OcrImage {
    pub id: String,
    pub image_base64: String,
}

// ── Client ───────────────────────────────────────────────────────────────

/// HTTP client for the Mistral file and OCR endpoints.
///
/// Cheap to clone; the inner `reqwest::Client` is reference-counted, so one
/// instance is shared across all concurrent requests in the router state.
#[derive(Debug, Clone)]
pub struct OcrClient {
    http: reqwest::Client,
    api_base: String,
    model: String,
    expiry_hours: u32,
}

impl OcrClient {
    /// Build a client from the relay configuration.
    pub fn new(config: &RelayConfig) -> Result<Self, RelayError> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.upstream_timeout_secs))
            .build()
            .map_err(|e| RelayError::InvalidConfig(format!("HTTP client: {e}")))?;

        Ok(Self {
            http,
            api_base: config.api_base.clone(),
            model: config.ocr_model.clone(),
            expiry_hours: config.signed_url_expiry_hours,
        })
    }

    /// Upload PDF bytes to the files endpoint, tagged for OCR use.
    pub async fn upload(
        &self,
        credential: &str,
        file_name: &str,
        bytes: Vec<u8>,
    ) -> Result<FileHandle, RelayError> {
        let endpoint = UpstreamEndpoint::Upload;
        debug!(file_name, size = bytes.len(), "uploading document");

        let part = reqwest::multipart::Part::bytes(bytes).file_name(file_name.to_string());
        let form = reqwest::multipart::Form::new()
            .text("purpose", UPLOAD_PURPOSE)
            .part("file", part);

        let response = self
            .http
            .post(format!("{}/v1/files", self.api_base))
            .bearer_auth(credential)
            .multipart(form)
            .send()
            .await
            .map_err(|source| RelayError::Transport { endpoint, source })?;

        decode_response(endpoint, response).await
    }

    /// Exchange a file id for a time-limited signed URL.
    pub async fn signed_url(
        &self,
        credential: &str,
        file_id: &str,
    ) -> Result<SignedUrl, RelayError> {
        let endpoint = UpstreamEndpoint::SignedUrl;
        debug!(file_id, expiry_hours = self.expiry_hours, "requesting signed URL");

        let response = self
            .http
            .get(format!("{}/v1/files/{}/url", self.api_base, file_id))
            .query(&[("expiry", self.expiry_hours)])
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(credential)
            .send()
            .await
            .map_err(|source| RelayError::Transport { endpoint, source })?;

        decode_response(endpoint, response).await
    }

    /// Submit a document URL to the OCR endpoint, requesting inline base64
    /// images, and return the per-page result set.
    pub async fn ocr(
        &self,
        credential: &str,
        document_url: &str,
    ) -> Result<OcrResponse, RelayError> {
        let endpoint = UpstreamEndpoint::Ocr;
        debug!(model = %self.model, "submitting OCR request");

        let body = OcrRequest {
            model: &self.model,
            document: OcrDocument {
                kind: "document_url",
                document_url,
            },
            include_image_base64: true,
        };

        let response = self
            .http
            .post(format!("{}/v1/ocr", self.api_base))
            .header(reqwest::header::ACCEPT, "application/json")
            .bearer_auth(credential)
            .json(&body)
            .send()
            .await
            .map_err(|source| RelayError::Transport { endpoint, source })?;

        decode_response(endpoint, response).await
    }
}

/// Shared response handling: non-success → `Upstream` with the body text,
/// undecodable 2xx body → `MalformedResponse`.
async fn decode_response<T: serde::de::DeserializeOwned>(
    endpoint: UpstreamEndpoint,
    response: reqwest::Response,
) -> Result<T, RelayError> {
    let status = response.status();
    let body = response
        .text()
        .await
        .map_err(|source| RelayError::Transport { endpoint, source })?;

    if !status.is_success() {
        return Err(RelayError::Upstream {
            endpoint,
            status: status.as_u16(),
            body,
        });
    }

    serde_json::from_str(&body).map_err(|e| RelayError::MalformedResponse {
        endpoint,
        detail: e.to_string(),
    })
}
