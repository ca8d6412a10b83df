//! Server binary for mistral-ocr2md.
//!
//! A thin shim over the library crate that maps CLI flags to `RelayConfig`
//! and serves the router.

use anyhow::{Context, Result};
use clap::Parser;
use mistral_ocr2md::{router, RelayConfig, DEFAULT_API_BASE, DEFAULT_OCR_MODEL};
use std::io;
use std::net::SocketAddr;
use tracing_subscriber::EnvFilter;

const AFTER_HELP: &str = r#"EXAMPLES:
  # Serve on the default address (127.0.0.1:8080)
  ocr2md-server

  # Expose on all interfaces
  ocr2md-server --bind 0.0.0.0:8080

  # Shorter signed-URL window, tighter upstream timeout
  ocr2md-server --expiry-hours 1 --timeout 120

USAGE FLOW:
  1. Start the server and open http://127.0.0.1:8080/ in a browser.
  2. Paste a Mistral API key, pick a PDF file or paste a document URL.
  3. The merged Markdown downloads as <input-name>.md.

The API key is supplied per request by the browser form; the server holds
no credentials of its own.
"#;

/// Relay PDFs to the Mistral OCR API and serve back merged Markdown.
#[derive(Parser, Debug)]
#[command(
    name = "ocr2md-server",
    version,
    about = "Relay PDFs to the Mistral OCR API and serve back merged Markdown",
    after_long_help = AFTER_HELP
)]
struct Cli {
    /// Address to bind the HTTP server to.
    #[arg(long, env = "OCR2MD_BIND", default_value = "127.0.0.1:8080")]
    bind: SocketAddr,

    /// Mistral API base URL.
    #[arg(long, env = "OCR2MD_API_BASE", default_value = DEFAULT_API_BASE)]
    api_base: String,

    /// OCR model identifier sent with every request.
    #[arg(long, env = "OCR2MD_MODEL", default_value = DEFAULT_OCR_MODEL)]
    model: String,

    /// Signed-URL validity window in hours.
    #[arg(long, env = "OCR2MD_EXPIRY_HOURS", default_value_t = 24)]
    expiry_hours: u32,

    /// Per-call upstream timeout in seconds.
    #[arg(long, env = "OCR2MD_TIMEOUT", default_value_t = 300)]
    timeout: u64,

    /// Maximum accepted upload size in MiB.
    #[arg(long, env = "OCR2MD_MAX_UPLOAD_MB", default_value_t = 50)]
    max_upload_mb: usize,

    /// Enable DEBUG-level tracing logs.
    #[arg(short, long, env = "OCR2MD_VERBOSE")]
    verbose: bool,

    /// Suppress all output except errors.
    #[arg(short, long, env = "OCR2MD_QUIET")]
    quiet: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    // ── Logging setup ────────────────────────────────────────────────────
    let filter = if cli.quiet {
        "error"
    } else if cli.verbose {
        "debug"
    } else {
        "info"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(filter)),
        )
        .with_writer(io::stderr)
        .init();

    // ── Build config and router ──────────────────────────────────────────
    let config = RelayConfig::builder()
        .bind_addr(cli.bind)
        .api_base(cli.api_base)
        .ocr_model(cli.model)
        .signed_url_expiry_hours(cli.expiry_hours)
        .upstream_timeout_secs(cli.timeout)
        .max_upload_bytes(cli.max_upload_mb * 1024 * 1024)
        .build()
        .context("Invalid configuration")?;

    let app = router(&config).context("Failed to build router")?;

    // ── Serve ────────────────────────────────────────────────────────────
    let listener = tokio::net::TcpListener::bind(config.bind_addr)
        .await
        .with_context(|| format!("Failed to bind {}", config.bind_addr))?;

    tracing::info!(
        "listening on http://{} (upstream: {})",
        config.bind_addr,
        config.api_base
    );

    axum::serve(listener, app).await.context("Server error")?;

    Ok(())
}
