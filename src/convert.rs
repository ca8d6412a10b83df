//! Conversion pipeline: the sequence behind `POST /convert`.
//!
//! Strictly sequential, no fan-out: resolve the document to a URL the OCR
//! service can fetch (uploading and signing first when the source is raw
//! bytes), run OCR once, merge the pages. The first error at any stage
//! aborts the rest; nothing is retried.

use crate::assemble;
use crate::client::OcrClient;
use crate::error::RelayError;
use crate::request::{ConversionRequest, DocumentSource};
use tracing::{debug, info};

/// The result of one conversion: the merged Markdown and the filename the
/// browser should save it under. Exists only as the HTTP response body;
/// nothing is cached or persisted.
#[derive(Debug, Clone)]
pub struct ConversionOutput {
    pub markdown: String,
    pub filename: String,
}

/// Run the full pipeline for one validated request.
///
/// # Stages
/// 1. File upload → `POST /v1/files`, then exchange the id for a signed URL.
///    URL input skips both calls and is passed to OCR as-is.
/// 2. `POST /v1/ocr` with the resolved URL, inline base64 images requested.
/// 3. Pure Markdown assembly (placeholder substitution + page join).
pub async fn convert(
    client: &OcrClient,
    request: &ConversionRequest,
) -> Result<ConversionOutput, RelayError> {
    let filename = request.output_filename();

    // ── Stage 1: resolve the document to a fetchable URL ─────────────────
    let document_url = match &request.source {
        DocumentSource::FileUpload { file_name, bytes } => {
            info!(%file_name, size = bytes.len(), "ingesting uploaded document");
            let handle = client
                .upload(&request.credential, file_name, bytes.clone())
                .await?;
            debug!(file_id = %handle.id, "upload complete");

            let signed = client.signed_url(&request.credential, &handle.id).await?;
            signed.url
        }
        DocumentSource::UrlReference { url } => {
            info!(url = %url, "using caller-supplied document URL");
            url.clone()
        }
    };

    // ── Stage 2: OCR ─────────────────────────────────────────────────────
    let ocr = client.ocr(&request.credential, &document_url).await?;
    info!(pages = ocr.pages.len(), "OCR complete");

    // ── Stage 3: assemble ────────────────────────────────────────────────
    let markdown = assemble::combine_pages(&ocr);
    debug!(bytes = markdown.len(), %filename, "assembled merged Markdown");

    Ok(ConversionOutput { markdown, filename })
}
