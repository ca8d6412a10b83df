//! # mistral-ocr2md
//!
//! Relay a PDF to the Mistral OCR API and stream the merged Markdown back
//! as a downloadable file.
//!
//! A small, stateless web service: the browser supplies an API key and
//! either a PDF file or a URL; the relay drives the Mistral call sequence
//! and returns one Markdown document. All document understanding is
//! delegated upstream — nothing here parses, renders, or caches PDFs.
//!
//! ## Pipeline Overview
//!
//! ```text
//! POST /convert
//!  │
//!  ├─ 1. Resolve   validate credential + exactly one document source
//!  ├─ 2. Ingest    upload bytes → file id → signed URL (skipped for URLs)
//!  ├─ 3. OCR       one call, inline base64 images requested
//!  ├─ 4. Assemble  substitute ![name](name) placeholders, join pages
//!  └─ 5. Respond   text/plain attachment, filename derived from the input
//! ```
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use mistral_ocr2md::{router, RelayConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = RelayConfig::default();
//!     let app = router(&config)?;
//!     let listener = tokio::net::TcpListener::bind(config.bind_addr).await?;
//!     axum::serve(listener, app).await?;
//!     Ok(())
//! }
//! ```
//!
//! Every value is scoped to one request; concurrent requests share nothing
//! but the HTTP connection pool. The caller's API key is held only inside
//! the request and never written to logs.

// ── Modules ──────────────────────────────────────────────────────────────

pub mod assemble;
pub mod client;
pub mod config;
pub mod convert;
pub mod error;
pub mod request;
pub mod server;

// ── Re-exports ───────────────────────────────────────────────────────────

pub use client::{FileHandle, OcrClient, OcrImage, OcrPage, OcrResponse, SignedUrl};
pub use config::{RelayConfig, RelayConfigBuilder, DEFAULT_API_BASE, DEFAULT_OCR_MODEL};
pub use convert::{convert, ConversionOutput};
pub use error::{RelayError, UpstreamEndpoint};
pub use request::{ConversionRequest, DocumentSource};
pub use server::router;
