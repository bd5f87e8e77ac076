//! Environment configuration.
//!
//! | Variable | Default |
//! |---|---|
//! | `LISTINGS_API_BASE` | `https://garage-backend.onrender.com/listings` |
//! | `LISTINGS_TIMEOUT_SECS` | `30` |
//! | `INVOICE_ASSETS_DIR` | `public` |
//! | `INVOICE_LOGO_STEM` | `garage-logo` |
//! | `INVOICE_FONT_DIR` | unset |
//! | `INVOICE_OUTPUT_DIR` | `.` |
//! | `INVOICE_APPLY_STATE_TAX` | `false` |
//! | `INVOICE_FOOTER_TEXT` | theme default |
//! | `OTEL_EXPORTER_OTLP_ENDPOINT` | unset (telemetry export off) |
//! | `OTEL_SERVICE_NAME` | `listing-invoice` |

use crate::error::{InvoiceError, Result};
use crate::tax::TaxPolicy;
use std::path::PathBuf;
use std::time::Duration;

pub const DEFAULT_LISTINGS_API_BASE: &str = "https://garage-backend.onrender.com/listings";

#[derive(Debug, Clone, PartialEq)]
pub struct Config {
    pub listings_api_base: String,
    pub listings_timeout: Duration,
    pub assets_dir: PathBuf,
    pub logo_stem: String,
    pub font_dir: Option<PathBuf>,
    pub output_dir: PathBuf,
    pub tax_policy: TaxPolicy,
    pub footer_text: Option<String>,
    pub otlp_endpoint: Option<String>,
    pub service_name: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            listings_api_base: DEFAULT_LISTINGS_API_BASE.to_string(),
            listings_timeout: Duration::from_secs(30),
            assets_dir: PathBuf::from("public"),
            logo_stem: "garage-logo".to_string(),
            font_dir: None,
            output_dir: PathBuf::from("."),
            tax_policy: TaxPolicy::Disabled,
            footer_text: None,
            otlp_endpoint: None,
            service_name: "listing-invoice".to_string(),
        }
    }
}

fn parse_bool(key: &str, value: &str) -> Result<bool> {
    match value.trim().to_ascii_lowercase().as_str() {
        "1" | "true" | "yes" | "on" => Ok(true),
        "0" | "false" | "no" | "off" | "" => Ok(false),
        other => Err(InvoiceError::Config(format!("{key}: expected a boolean, got {other:?}"))),
    }
}

impl Config {
    pub fn from_env() -> Result<Self> {
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Builds configuration from an arbitrary key lookup. Empty values are
    /// treated as unset.
    pub fn from_lookup<F>(lookup: F) -> Result<Self>
    where
        F: Fn(&str) -> Option<String>,
    {
        let get = |key: &str| lookup(key).filter(|v| !v.trim().is_empty());
        let defaults = Config::default();

        let listings_timeout = match get("LISTINGS_TIMEOUT_SECS") {
            Some(v) => Duration::from_secs(v.trim().parse().map_err(|_| {
                InvoiceError::Config(format!("LISTINGS_TIMEOUT_SECS: expected seconds, got {v:?}"))
            })?),
            None => defaults.listings_timeout,
        };

        let apply_state_tax = match get("INVOICE_APPLY_STATE_TAX") {
            Some(v) => parse_bool("INVOICE_APPLY_STATE_TAX", &v)?,
            None => false,
        };
        let tax_policy = if apply_state_tax {
            TaxPolicy::StateTable
        } else {
            TaxPolicy::Disabled
        };

        Ok(Self {
            listings_api_base: get("LISTINGS_API_BASE").unwrap_or(defaults.listings_api_base),
            listings_timeout,
            assets_dir: get("INVOICE_ASSETS_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.assets_dir),
            logo_stem: get("INVOICE_LOGO_STEM").unwrap_or(defaults.logo_stem),
            font_dir: get("INVOICE_FONT_DIR").map(PathBuf::from),
            output_dir: get("INVOICE_OUTPUT_DIR")
                .map(PathBuf::from)
                .unwrap_or(defaults.output_dir),
            tax_policy,
            footer_text: get("INVOICE_FOOTER_TEXT"),
            otlp_endpoint: get("OTEL_EXPORTER_OTLP_ENDPOINT"),
            service_name: get("OTEL_SERVICE_NAME").unwrap_or(defaults.service_name),
        })
    }
}
