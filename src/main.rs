//! Listing invoice command-line tool
//!
//! Fetches a marketplace listing (or reads one from disk), renders a
//! single-page PDF invoice and writes `<title>_Invoice.pdf` to the output
//! directory.
//!
//! ## Configuration
//!
//! Environment variables (see `listing_invoice::config`) provide defaults;
//! flags override them. `RUST_LOG` sets the log level (default: info) and
//! `LOG_FORMAT=json` switches to JSON log lines.

use anyhow::{Context, Result};
use clap::{ArgGroup, Parser};
use listing_invoice::{
    config::Config,
    converter::{load_font_database, SvgToPdfConverter},
    job::InvoiceJob,
    listing::HttpListingSource,
    logo::LogoStore,
    pipeline::{self, InvoiceOutcome},
    renderer::InvoiceRenderer,
    telemetry,
    theme::Theme,
};
use std::path::{Path, PathBuf};
use tracing::{error, info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
#[command(name = "listing-invoice", version, about = "Render a PDF invoice for a marketplace listing")]
#[command(group(ArgGroup::new("input").required(true).args(["url", "listing_file"])))]
struct Cli {
    /// Listing page URL; the listing ID is taken from the UUID it contains
    #[arg(short, long)]
    url: Option<String>,

    /// Path to a listing JSON document to render instead of fetching
    #[arg(short = 'f', long)]
    listing_file: Option<PathBuf>,

    /// Recipient shown in the "Bill To:" block
    #[arg(short, long)]
    name: Option<String>,

    /// Directory for the generated PDF (overrides INVOICE_OUTPUT_DIR)
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Print the finished job record as JSON on stdout
    #[arg(long)]
    json: bool,
}

fn init_logging() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "info".into());
    let json = std::env::var("LOG_FORMAT").is_ok_and(|v| v.eq_ignore_ascii_case("json"));

    let registry = tracing_subscriber::registry().with(filter);
    if json {
        registry.with(tracing_subscriber::fmt::layer().json()).init();
    } else {
        registry.with(tracing_subscriber::fmt::layer()).init();
    }
}

fn build_renderer(config: &Config) -> InvoiceRenderer {
    let fonts = load_font_database(config.font_dir.as_deref());
    let mut theme = Theme::default();
    if let Some(ref footer) = config.footer_text {
        theme = theme.with_footer_text(footer.clone());
    }

    InvoiceRenderer::new(SvgToPdfConverter::new(fonts))
        .with_theme(theme)
        .with_logo(LogoStore::new(&config.assets_dir, config.logo_stem.clone()))
        .with_tax_policy(config.tax_policy)
}

async fn produce(cli: &Cli, config: &Config, renderer: &InvoiceRenderer) -> Result<InvoiceOutcome> {
    let recipient = cli.name.as_deref();

    if let Some(ref path) = cli.listing_file {
        let raw = tokio::fs::read_to_string(path)
            .await
            .with_context(|| format!("Failed to read listing file {}", path.display()))?;
        let listing: serde_json::Value =
            serde_json::from_str(&raw).context("Failed to parse listing JSON")?;
        return Ok(pipeline::invoice_for_listing(renderer, &listing, recipient).await?);
    }

    let url = cli.url.as_deref().context("A listing URL or listing file is required")?;
    let source = HttpListingSource::new(&config.listings_api_base, config.listings_timeout)
        .context("Failed to create listings client")?;
    Ok(pipeline::invoice_for_url(&source, renderer, url, recipient).await?)
}

async fn deliver(outcome: &InvoiceOutcome, output_dir: &Path) -> Result<PathBuf> {
    outcome
        .invoice
        .save_to_dir(output_dir)
        .await
        .with_context(|| format!("Failed to write invoice to {}", output_dir.display()))
}

#[tokio::main]
async fn main() -> Result<()> {
    init_logging();

    let cli = Cli::parse();
    let config = Config::from_env().context("Failed to load configuration")?;

    if let Some(ref endpoint) = config.otlp_endpoint {
        if let Err(e) = telemetry::init_telemetry(endpoint, &config.service_name) {
            warn!("Failed to initialize telemetry: {}", e);
        }
    }

    let output_dir = cli.out.clone().unwrap_or_else(|| config.output_dir.clone());
    info!(
        "Configuration: listings_api_base={}, output_dir={}, tax_policy={:?}",
        config.listings_api_base,
        output_dir.display(),
        config.tax_policy
    );

    let renderer = build_renderer(&config);
    let source = cli
        .url
        .clone()
        .or_else(|| cli.listing_file.as_ref().map(|p| p.display().to_string()))
        .unwrap_or_default();
    let mut job = InvoiceJob::new(source, cli.name.clone());
    job.start_rendering(None);

    let result = match produce(&cli, &config, &renderer).await {
        Ok(outcome) => deliver(&outcome, &output_dir).await.map(|path| (outcome, path)),
        Err(e) => Err(e),
    };

    match &result {
        Ok((outcome, path)) => {
            job.listing_id = outcome.listing_id;
            job.mark_complete(
                outcome.invoice.invoice_number.clone(),
                outcome.invoice.len(),
                Some(path.display().to_string()),
            );
            info!(
                job_id = %job.job_id,
                invoice = %outcome.invoice.invoice_number,
                path = %path.display(),
                "Invoice ready"
            );
        }
        Err(e) => {
            let error_msg = format!("{:#}", e);
            error!(job_id = %job.job_id, error = %error_msg, "Invoice job failed");
            job.mark_failed(error_msg);
        }
    }

    telemetry::record_job_telemetry(&job);
    if config.otlp_endpoint.is_some() {
        telemetry::shutdown_telemetry();
    }

    if cli.json {
        println!(
            "{}",
            serde_json::to_string_pretty(&job).context("Failed to serialize job record")?
        );
    }

    result.map(|_| ())
}
