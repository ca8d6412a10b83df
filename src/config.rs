//! Configuration for the relay server.
//!
//! All behaviour is controlled through [`RelayConfig`], built via its
//! [`RelayConfigBuilder`]. Keeping every knob in one struct makes it trivial
//! to share across the router state and to point the whole pipeline at a
//! mock upstream in tests.

use crate::error::RelayError;
use std::net::SocketAddr;

/// Default Mistral API base. Overridable so tests can target a local mock.
pub const DEFAULT_API_BASE: &str = "https://api.mistral.ai";

/// Default OCR model identifier sent with every OCR request.
pub const DEFAULT_OCR_MODEL: &str = "mistral-ocr-latest";

/// Configuration for the relay.
///
/// Built via [`RelayConfig::builder()`] or [`RelayConfig::default()`].
///
/// # Example
/// ```rust
/// use mistral_ocr2md::RelayConfig;
///
/// let config = RelayConfig::builder()
///     .signed_url_expiry_hours(1)
///     .upstream_timeout_secs(60)
///     .build()
///     .unwrap();
/// ```
#[derive(Debug, Clone)]
pub struct RelayConfig {
    /// Address the HTTP server binds to. Default: `127.0.0.1:8080`.
    pub bind_addr: SocketAddr,

    /// Base URL of the Mistral API, without a trailing slash.
    /// Default: [`DEFAULT_API_BASE`].
    ///
    /// Not exposed to browser callers; it exists so integration tests can
    /// substitute an in-process upstream.
    pub api_base: String,

    /// Model identifier for the OCR call. Default: [`DEFAULT_OCR_MODEL`].
    pub ocr_model: String,

    /// Validity window requested for signed URLs, in hours. Default: 24.
    ///
    /// The signed URL is consumed immediately by the OCR call, so even the
    /// minimum of 1 hour is generous; 24 matches the upstream default and
    /// leaves room for slow OCR runs on large documents.
    pub signed_url_expiry_hours: u32,

    /// Per-call timeout for upstream requests, in seconds. Default: 300.
    ///
    /// OCR of a long document is a single round trip with no progress
    /// reporting, so this must cover the full processing time upstream.
    pub upstream_timeout_secs: u64,

    /// Maximum accepted request body size in bytes. Default: 50 MiB.
    ///
    /// Bounds the multipart upload; anything larger is rejected by the
    /// router before reaching the handler.
    pub max_upload_bytes: usize,
}

impl Default for RelayConfig {
    fn default() -> Self {
        Self {
            bind_addr: SocketAddr::from(([127, 0, 0, 1], 8080)),
            api_base: DEFAULT_API_BASE.to_string(),
            ocr_model: DEFAULT_OCR_MODEL.to_string(),
            signed_url_expiry_hours: 24,
            upstream_timeout_secs: 300,
            max_upload_bytes: 50 * 1024 * 1024,
        }
    }
}

impl RelayConfig {
    /// Create a new builder for `RelayConfig`.
    pub fn builder() -> RelayConfigBuilder {
        RelayConfigBuilder {
            config: Self::default(),
        }
    }
}

/// Builder for [`RelayConfig`].
#[derive(Debug)]
pub struct RelayConfigBuilder {
    config: RelayConfig,
}

impl RelayConfigBuilder {
    pub fn bind_addr(mut self, addr: SocketAddr) -> Self {
        self.config.bind_addr = addr;
        self
    }

    /// Set the upstream API base. A trailing slash is stripped so path
    /// concatenation stays predictable.
    pub fn api_base(mut self, base: impl Into<String>) -> Self {
        let base: String = base.into();
        self.config.api_base = base.trim_end_matches('/').to_string();
        self
    }

    pub fn ocr_model(mut self, model: impl Into<String>) -> Self {
        self.config.ocr_model = model.into();
        self
    }

    pub fn signed_url_expiry_hours(mut self, hours: u32) -> Self {
        self.config.signed_url_expiry_hours = hours.max(1);
        self
    }

    pub fn upstream_timeout_secs(mut self, secs: u64) -> Self {
        self.config.upstream_timeout_secs = secs.max(1);
        self
    }

    pub fn max_upload_bytes(mut self, bytes: usize) -> Self {
        self.config.max_upload_bytes = bytes;
        self
    }

    /// Build the configuration, validating constraints.
    pub fn build(self) -> Result<RelayConfig, RelayError> {
        let c = &self.config;
        if c.api_base.is_empty() {
            return Err(RelayError::InvalidConfig("api_base must not be empty".into()));
        }
        if c.max_upload_bytes < 1024 {
            return Err(RelayError::InvalidConfig(format!(
                "max_upload_bytes must be ≥ 1024, got {}",
                c.max_upload_bytes
            )));
        }
        Ok(self.config)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let c = RelayConfig::default();
        assert_eq!(c.api_base, "https://api.mistral.ai");
        assert_eq!(c.ocr_model, "mistral-ocr-latest");
        assert_eq!(c.signed_url_expiry_hours, 24);
        assert_eq!(c.upstream_timeout_secs, 300);
        assert_eq!(c.max_upload_bytes, 50 * 1024 * 1024);
    }

    #[test]
    fn builder_strips_trailing_slash() {
        let c = RelayConfig::builder()
            .api_base("http://127.0.0.1:9000/")
            .build()
            .unwrap();
        assert_eq!(c.api_base, "http://127.0.0.1:9000");
    }

    #[test]
    fn expiry_clamped_to_minimum() {
        let c = RelayConfig::builder()
            .signed_url_expiry_hours(0)
            .build()
            .unwrap();
        assert_eq!(c.signed_url_expiry_hours, 1);
    }

    #[test]
    fn empty_api_base_rejected() {
        assert!(RelayConfig::builder().api_base("").build().is_err());
    }

    #[test]
    fn tiny_body_limit_rejected() {
        assert!(RelayConfig::builder().max_upload_bytes(16).build().is_err());
    }
}
