//! Input resolution: normalise the browser form into a [`ConversionRequest`].
//!
//! The `/convert` form carries a credential, a source-kind discriminator, and
//! either a file part or a URL string. Validation happens here, before any
//! upstream call: a request with no credential or no usable document source
//! never leaves the process.

use crate::error::RelayError;

/// Fallback output name when no `.pdf` segment can be derived from the input.
const DEFAULT_OUTPUT_NAME: &str = "document.md";

/// The document source selected by the form.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum DocumentSource {
    /// Raw PDF bytes uploaded from the browser.
    FileUpload { file_name: String, bytes: Vec<u8> },
    /// A URL the remote OCR service will fetch directly. No local
    /// reachability or content-type check is performed; the caller owns
    /// its validity.
    UrlReference { url: String },
}

/// A validated conversion request. Exactly one source variant is populated
/// and the credential is non-empty; both are guaranteed by construction.
#[derive(Debug, Clone)]
pub struct ConversionRequest {
    /// The caller's Mistral API key, passed through as a bearer token.
    /// Never logged; lives only for this request.
    pub credential: String,
    pub source: DocumentSource,
}

impl ConversionRequest {
    /// Build a request from collected multipart fields.
    ///
    /// * `credential` — the `apiKey` field, if present.
    /// * `source_kind` — the discriminator field (`file` / `url`, a few
    ///   spelling variants accepted case-insensitively).
    /// * `file` — `(file_name, bytes)` from the file part, if present.
    /// * `url` — the `documentUrl` field, if present and non-empty.
    pub fn from_form_parts(
        credential: Option<String>,
        source_kind: Option<String>,
        file: Option<(String, Vec<u8>)>,
        url: Option<String>,
    ) -> Result<Self, RelayError> {
        let credential = match credential {
            Some(c) if !c.trim().is_empty() => c,
            _ => return Err(RelayError::MissingCredential),
        };

        let kind = source_kind.unwrap_or_default();
        let source = match kind.trim().to_ascii_lowercase().as_str() {
            "file" | "fileupload" | "upload" => match file {
                Some((file_name, bytes)) if !bytes.is_empty() => {
                    DocumentSource::FileUpload { file_name, bytes }
                }
                _ => {
                    return Err(RelayError::MissingDocument {
                        detail: "no file was uploaded".into(),
                    })
                }
            },
            "url" | "urlreference" | "link" => match url {
                Some(u) if !u.trim().is_empty() => DocumentSource::UrlReference {
                    url: u.trim().to_string(),
                },
                _ => {
                    return Err(RelayError::MissingDocument {
                        detail: "no document URL was provided".into(),
                    })
                }
            },
            other => {
                return Err(RelayError::MissingDocument {
                    detail: format!("unrecognised source kind '{other}'"),
                })
            }
        };

        Ok(Self { credential, source })
    }

    /// Derive the download filename for the merged Markdown.
    ///
    /// File uploads substitute the `.pdf` extension for `.md`. URL inputs
    /// use the last path segment with any query string or fragment stripped.
    /// When no `.pdf` segment can be found, the fixed default
    /// `document.md` is used.
    pub fn output_filename(&self) -> String {
        match &self.source {
            DocumentSource::FileUpload { file_name, .. } => derive_markdown_name(file_name),
            DocumentSource::UrlReference { url } => {
                let segment = last_path_segment(url);
                derive_markdown_name(segment)
            }
        }
    }
}

/// Extract the last path segment of a URL, without query or fragment.
fn last_path_segment(url: &str) -> &str {
    let without_fragment = url.split('#').next().unwrap_or(url);
    let without_query = without_fragment.split('?').next().unwrap_or(without_fragment);
    without_query.rsplit('/').next().unwrap_or(without_query)
}

/// `report.pdf` → `report.md`; anything without a `.pdf` suffix falls back
/// to the fixed default name.
fn derive_markdown_name(name: &str) -> String {
    let trimmed = name.trim();
    if trimmed.len() > 4 && trimmed.to_ascii_lowercase().ends_with(".pdf") {
        format!("{}.md", &trimmed[..trimmed.len() - 4])
    } else {
        DEFAULT_OUTPUT_NAME.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file_part() -> Option<(String, Vec<u8>)> {
        Some(("report.pdf".to_string(), b"%PDF-1.4".to_vec()))
    }

    #[test]
    fn accepts_valid_file_upload() {
        let req = ConversionRequest::from_form_parts(
            Some("key-123".into()),
            Some("fileUpload".into()),
            file_part(),
            None,
        )
        .unwrap();
        assert!(matches!(req.source, DocumentSource::FileUpload { .. }));
    }

    #[test]
    fn accepts_valid_url_reference() {
        let req = ConversionRequest::from_form_parts(
            Some("key-123".into()),
            Some("url".into()),
            None,
            Some("https://example.com/files/spec.pdf".into()),
        )
        .unwrap();
        assert_eq!(
            req.source,
            DocumentSource::UrlReference {
                url: "https://example.com/files/spec.pdf".into()
            }
        );
    }

    #[test]
    fn empty_credential_rejected_regardless_of_source() {
        for cred in [None, Some(String::new()), Some("   ".to_string())] {
            let err = ConversionRequest::from_form_parts(
                cred,
                Some("file".into()),
                file_part(),
                None,
            )
            .unwrap_err();
            assert!(matches!(err, RelayError::MissingCredential));
        }
    }

    #[test]
    fn file_kind_without_file_rejected() {
        let err = ConversionRequest::from_form_parts(
            Some("key".into()),
            Some("fileUpload".into()),
            None,
            None,
        )
        .unwrap_err();
        assert!(err.to_string().contains("no file was uploaded"));
    }

    #[test]
    fn empty_file_rejected() {
        let err = ConversionRequest::from_form_parts(
            Some("key".into()),
            Some("file".into()),
            Some(("empty.pdf".into(), Vec::new())),
            None,
        )
        .unwrap_err();
        assert!(matches!(err, RelayError::MissingDocument { .. }));
    }

    #[test]
    fn url_kind_without_url_rejected() {
        let err = ConversionRequest::from_form_parts(
            Some("key".into()),
            Some("url".into()),
            None,
            Some("  ".into()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("no document URL"));
    }

    #[test]
    fn unknown_discriminator_rejected() {
        let err = ConversionRequest::from_form_parts(
            Some("key".into()),
            Some("carrier-pigeon".into()),
            file_part(),
            Some("https://example.com/a.pdf".into()),
        )
        .unwrap_err();
        assert!(err.to_string().contains("carrier-pigeon"));
    }

    // ── Filename derivation ──────────────────────────────────────────────

    fn url_request(url: &str) -> ConversionRequest {
        ConversionRequest {
            credential: "key".into(),
            source: DocumentSource::UrlReference { url: url.into() },
        }
    }

    #[test]
    fn filename_from_uploaded_file() {
        let req = ConversionRequest {
            credential: "key".into(),
            source: DocumentSource::FileUpload {
                file_name: "report.pdf".into(),
                bytes: vec![1],
            },
        };
        assert_eq!(req.output_filename(), "report.md");
    }

    #[test]
    fn filename_from_url_last_segment() {
        let req = url_request("https://example.com/files/spec.pdf");
        assert_eq!(req.output_filename(), "spec.md");
    }

    #[test]
    fn filename_strips_query_string() {
        let req = url_request("https://example.com/files/spec.pdf?x=1&y=2");
        assert_eq!(req.output_filename(), "spec.md");
    }

    #[test]
    fn filename_strips_fragment() {
        let req = url_request("https://example.com/files/spec.pdf#page=3");
        assert_eq!(req.output_filename(), "spec.md");
    }

    #[test]
    fn filename_falls_back_without_pdf_suffix() {
        let req = url_request("https://example.com/download");
        assert_eq!(req.output_filename(), "document.md");
    }

    #[test]
    fn filename_case_insensitive_extension() {
        let req = url_request("https://example.com/REPORT.PDF");
        assert_eq!(req.output_filename(), "REPORT.md");
    }

    #[test]
    fn upload_without_pdf_extension_falls_back() {
        let req = ConversionRequest {
            credential: "key".into(),
            source: DocumentSource::FileUpload {
                file_name: "scan".into(),
                bytes: vec![1],
            },
        };
        assert_eq!(req.output_filename(), "document.md");
    }
}
