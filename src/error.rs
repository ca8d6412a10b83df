//! Error types for the mistral-ocr2md library.
//!
//! Every failure in the pipeline is a [`RelayError`]. Two classes exist:
//!
//! * **Validation** — the browser request itself is unusable (missing
//!   credential, missing document source). Surfaced as HTTP 400 before any
//!   upstream call is made.
//!
//! * **Upstream** — one of the three Mistral calls failed (non-success
//!   status, transport failure, or an unparseable response body). Surfaced
//!   as HTTP 500 with the upstream body text preserved so the user can see
//!   what the API actually said.
//!
//! The caller-supplied API key must never appear in any of these messages;
//! every variant carries only endpoint names, status codes, and body text.

use thiserror::Error;

/// Which upstream call failed. Used in error messages and logs.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpstreamEndpoint {
    /// `POST /v1/files` — file upload.
    Upload,
    /// `GET /v1/files/{id}/url` — signed-URL exchange.
    SignedUrl,
    /// `POST /v1/ocr` — OCR invocation.
    Ocr,
}

impl std::fmt::Display for UpstreamEndpoint {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            UpstreamEndpoint::Upload => "file upload",
            UpstreamEndpoint::SignedUrl => "signed URL",
            UpstreamEndpoint::Ocr => "OCR",
        };
        f.write_str(name)
    }
}

/// All errors returned by the conversion pipeline.
#[derive(Debug, Error)]
pub enum RelayError {
    // ── Validation errors (HTTP 400) ──────────────────────────────────────
    /// The `apiKey` form field is absent or empty.
    #[error("missing credential")]
    MissingCredential,

    /// The selected document source is absent, or the source-kind
    /// discriminator is unrecognised.
    #[error("missing document source: {detail}")]
    MissingDocument { detail: String },

    // ── Upstream errors (HTTP 500) ────────────────────────────────────────
    /// The remote service answered with a non-success status. The response
    /// body is forwarded verbatim.
    #[error("{endpoint} request failed ({status}): {body}")]
    Upstream {
        endpoint: UpstreamEndpoint,
        status: u16,
        body: String,
    },

    /// The remote call failed at the network level (DNS, connect, timeout).
    #[error("{endpoint} request failed: {source}")]
    Transport {
        endpoint: UpstreamEndpoint,
        #[source]
        source: reqwest::Error,
    },

    /// The remote service answered 2xx but the body did not match the
    /// expected shape (e.g. a `pages` field missing from the OCR result).
    #[error("unexpected {endpoint} response shape: {detail}")]
    MalformedResponse {
        endpoint: UpstreamEndpoint,
        detail: String,
    },

    // ── Config errors ─────────────────────────────────────────────────────
    /// Builder validation failed. Never reaches the HTTP surface.
    #[error("invalid configuration: {0}")]
    InvalidConfig(String),
}

impl RelayError {
    /// The HTTP status this error maps to at the `/convert` surface.
    pub fn status(&self) -> u16 {
        match self {
            RelayError::MissingCredential | RelayError::MissingDocument { .. } => 400,
            RelayError::Upstream { .. }
            | RelayError::Transport { .. }
            | RelayError::MalformedResponse { .. }
            | RelayError::InvalidConfig(_) => 500,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn missing_credential_display() {
        assert_eq!(RelayError::MissingCredential.to_string(), "missing credential");
        assert_eq!(RelayError::MissingCredential.status(), 400);
    }

    #[test]
    fn missing_document_display() {
        let e = RelayError::MissingDocument {
            detail: "no file was uploaded".into(),
        };
        assert_eq!(
            e.to_string(),
            "missing document source: no file was uploaded"
        );
        assert_eq!(e.status(), 400);
    }

    #[test]
    fn upstream_display_preserves_body() {
        let e = RelayError::Upstream {
            endpoint: UpstreamEndpoint::Ocr,
            status: 422,
            body: "invalid document".into(),
        };
        let msg = e.to_string();
        assert!(msg.contains("OCR"), "got: {msg}");
        assert!(msg.contains("422"), "got: {msg}");
        assert!(msg.contains("invalid document"), "got: {msg}");
        assert_eq!(e.status(), 500);
    }

    #[test]
    fn malformed_response_display() {
        let e = RelayError::MalformedResponse {
            endpoint: UpstreamEndpoint::Ocr,
            detail: "missing field `pages`".into(),
        };
        assert!(e.to_string().contains("missing field `pages`"));
        assert_eq!(e.status(), 500);
    }

    #[test]
    fn endpoint_names() {
        assert_eq!(UpstreamEndpoint::Upload.to_string(), "file upload");
        assert_eq!(UpstreamEndpoint::SignedUrl.to_string(), "signed URL");
        assert_eq!(UpstreamEndpoint::Ocr.to_string(), "OCR");
    }
}
