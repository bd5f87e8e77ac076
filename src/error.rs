//! Error types shared by the listing fetcher and the invoice renderer.

use thiserror::Error;

/// Crate-wide result alias.
pub type Result<T> = std::result::Result<T, InvoiceError>;

/// Failures that abort a single fetch or render.
///
/// Missing listing fields, unrenderable glyphs and missing logo assets are
/// never errors; they are resolved with defaults where they occur.
#[derive(Debug, Error)]
pub enum InvoiceError {
    #[error("invalid listing URL: could not extract an ID from {0}")]
    InvalidListingUrl(String),

    #[error("listing service returned {status} for {url}: {body}")]
    ListingStatus { status: u16, url: String, body: String },

    #[error("failed to fetch listing: {0}")]
    Fetch(#[from] reqwest::Error),

    #[error("failed to parse listing JSON: {0}")]
    Json(#[from] serde_json::Error),

    #[error("failed to parse invoice layout: {0}")]
    Layout(#[from] usvg::Error),

    #[error("font unavailable: {0}")]
    Font(String),

    #[error("invalid page dimensions: {width}x{height}")]
    InvalidDimensions { width: f32, height: f32 },

    #[error("render task failed: {0}")]
    RenderTask(#[from] tokio::task::JoinError),

    #[error(transparent)]
    Io(#[from] std::io::Error),

    #[error("invalid configuration: {0}")]
    Config(String),
}

impl InvoiceError {
    /// HTTP-style status a caller should surface for this failure.
    ///
    /// Upstream listing statuses pass through unchanged; anything raised
    /// while rendering is an internal error.
    pub fn status_code(&self) -> u16 {
        match self {
            InvoiceError::InvalidListingUrl(_) | InvoiceError::Config(_) => 400,
            InvoiceError::ListingStatus { status, .. } => *status,
            _ => 500,
        }
    }
}
