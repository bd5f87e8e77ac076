//! Asynchronous invoice rendering.

use crate::converter::SvgToPdfConverter;
use crate::delivery::RenderedInvoice;
use crate::error::Result;
use crate::layout::{compose_invoice, InvoiceMeta, PageInput};
use crate::logo::LogoStore;
use crate::metrics::FontMetrics;
use crate::normalize::InvoiceData;
use crate::tax::TaxPolicy;
use crate::theme::Theme;
use std::sync::Arc;
use std::time::Instant;
use tracing::{debug, info};

/// Renders [`InvoiceData`] into single-page PDFs.
///
/// Each call is independent; the renderer holds only read-only settings and
/// the shared font database, so concurrent renders do not interact.
#[derive(Clone)]
pub struct InvoiceRenderer {
    theme: Theme,
    logo: Option<LogoStore>,
    tax: TaxPolicy,
    converter: Arc<SvgToPdfConverter>,
}

impl InvoiceRenderer {
    pub fn new(converter: SvgToPdfConverter) -> Self {
        Self {
            theme: Theme::default(),
            logo: None,
            tax: TaxPolicy::default(),
            converter: Arc::new(converter),
        }
    }

    pub fn with_theme(mut self, theme: Theme) -> Self {
        self.theme = theme;
        self
    }

    pub fn with_logo(mut self, logo: LogoStore) -> Self {
        self.logo = Some(logo);
        self
    }

    pub fn with_tax_policy(mut self, tax: TaxPolicy) -> Self {
        self.tax = tax;
        self
    }

    pub fn theme(&self) -> &Theme {
        &self.theme
    }

    /// Composes the page as SVG without converting it.
    ///
    /// Reads the logo from disk, so async callers should go through
    /// [`InvoiceRenderer::render`].
    ///
    /// # Errors
    ///
    /// Fails when the theme's font family resolves to no face in the
    /// converter's font database.
    pub fn compose(
        &self,
        data: &InvoiceData,
        recipient: Option<&str>,
        meta: &InvoiceMeta,
    ) -> Result<String> {
        let metrics = FontMetrics::resolve(self.converter.font_database(), &self.theme.font_family)?;
        let logo = self.logo.as_ref().and_then(LogoStore::load);
        let recipient = recipient.map(str::trim).filter(|r| !r.is_empty());
        Ok(compose_invoice(
            &self.theme,
            &PageInput {
                data,
                meta,
                recipient,
                logo: logo.as_ref(),
                tax: self.tax,
                metrics: &metrics,
            },
        ))
    }

    /// Renders with a freshly generated invoice number and today's date.
    pub async fn render(&self, data: &InvoiceData, recipient: Option<&str>) -> Result<RenderedInvoice> {
        self.render_with_meta(data, recipient, InvoiceMeta::generate())
            .await
    }

    /// Renders with caller-supplied invoice metadata.
    ///
    /// Logo loading, composition and conversion all run on the blocking
    /// pool; the returned future completes once the whole document is
    /// assembled, or fails without a partial result.
    pub async fn render_with_meta(
        &self,
        data: &InvoiceData,
        recipient: Option<&str>,
        meta: InvoiceMeta,
    ) -> Result<RenderedInvoice> {
        let started = Instant::now();
        let renderer = self.clone();
        let page_data = data.clone();
        let recipient = recipient.map(str::to_owned);
        let page_meta = meta.clone();

        let bytes = tokio::task::spawn_blocking(move || {
            let svg = renderer.compose(&page_data, recipient.as_deref(), &page_meta)?;
            debug!(svg_bytes = svg.len(), invoice = %page_meta.number, "Invoice layout composed");
            renderer.converter.convert(&svg)
        })
        .await??;

        info!(
            invoice = %meta.number,
            title = %data.title,
            bytes = bytes.len(),
            elapsed_ms = started.elapsed().as_millis() as u64,
            "Invoice rendered"
        );
        Ok(RenderedInvoice::new(bytes, &data.title, meta.number))
    }
}
