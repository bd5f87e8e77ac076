//! Listing Invoice Library
//!
//! Turns a marketplace listing into a one-page A4 PDF invoice. A listing is
//! looked up by the UUID embedded in its URL, flattened into
//! [`normalize::InvoiceData`], laid out at fixed coordinates as SVG and
//! converted to PDF with svg2pdf.
//!
//! ## Module Overview
//!
//! - `listing`: listing ID extraction and the listings API client
//! - `normalize`: raw listing JSON to invoice data, with per-field defaults
//! - `sanitize`: ASCII sanitization, filename stems, description whitespace
//! - `layout`: page composition (header, vehicle info, totals, description, footer)
//! - `converter`: SVG to PDF conversion
//! - `renderer`: async rendering entry point
//! - `delivery`: rendered invoice bytes, filename and download helpers
//! - `job` / `telemetry`: per-request record and OpenTelemetry spans
//!
//! ## Example Usage
//!
//! ```rust,no_run
//! use listing_invoice::{
//!     converter::{load_font_database, SvgToPdfConverter},
//!     normalize::InvoiceData,
//!     renderer::InvoiceRenderer,
//! };
//!
//! #[tokio::main]
//! async fn main() {
//!     let renderer = InvoiceRenderer::new(SvgToPdfConverter::new(load_font_database(None)));
//!
//!     let data = InvoiceData::from_json(&serde_json::json!({
//!         "listingTitle": "2011 Pierce Velocity",
//!         "sellingPrice": 1234.5
//!     }));
//!
//!     let invoice = renderer.render(&data, Some("Station 12")).await.unwrap();
//!     assert_eq!(invoice.filename, "2011_Pierce_Velocity_Invoice.pdf");
//! }
//! ```

pub mod config;
pub mod converter;
pub mod currency;
pub mod delivery;
pub mod error;
pub mod job;
pub mod layout;
pub mod listing;
pub mod logo;
pub mod metrics;
pub mod normalize;
pub mod pipeline;
pub mod renderer;
pub mod sanitize;
pub mod svg;
pub mod tax;
pub mod telemetry;
pub mod theme;

pub use error::{InvoiceError, Result};
