//! End-to-end invoice production: listing lookup, normalization, render.

use crate::error::Result;
use crate::delivery::RenderedInvoice;
use crate::listing::{extract_listing_id, ListingSource};
use crate::normalize::InvoiceData;
use crate::renderer::InvoiceRenderer;
use serde_json::Value;
use tracing::info;
use uuid::Uuid;

/// Result of a pipeline run, with the listing it came from.
#[derive(Debug, Clone)]
pub struct InvoiceOutcome {
    pub listing_id: Option<Uuid>,
    pub data: InvoiceData,
    pub invoice: RenderedInvoice,
}

/// Extracts the listing ID from `url`, fetches the listing and renders it.
pub async fn invoice_for_url(
    source: &dyn ListingSource,
    renderer: &InvoiceRenderer,
    url: &str,
    recipient: Option<&str>,
) -> Result<InvoiceOutcome> {
    let listing_id = extract_listing_id(url)?;
    info!(listing_id = %listing_id, "Resolved listing");

    let listing = source.fetch_listing(listing_id).await?;
    let mut outcome = invoice_for_listing(renderer, &listing, recipient).await?;
    outcome.listing_id = Some(listing_id);
    Ok(outcome)
}

/// Renders an already-fetched listing.
pub async fn invoice_for_listing(
    renderer: &InvoiceRenderer,
    listing: &Value,
    recipient: Option<&str>,
) -> Result<InvoiceOutcome> {
    let data = InvoiceData::from_json(listing);
    let invoice = renderer.render(&data, recipient).await?;
    Ok(InvoiceOutcome {
        listing_id: None,
        data,
        invoice,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::converter::SvgToPdfConverter;
    use crate::error::InvoiceError;
    use crate::listing::MockListingSource;
    use crate::normalize::Price;
    use mockall::predicate::eq;
    use serde_json::json;

    const ID: &str = "6f1d2c3b-4a5e-4f60-8a7b-9c0d1e2f3a4b";

    fn renderer() -> InvoiceRenderer {
        InvoiceRenderer::new(SvgToPdfConverter::default())
    }

    #[tokio::test]
    async fn test_invoice_for_url() {
        let mut source = MockListingSource::new();
        source
            .expect_fetch_listing()
            .with(eq(Uuid::parse_str(ID).unwrap()))
            .times(1)
            .returning(|_| {
                Ok(json!({
                    "listingTitle": "1999 Seagrave Marauder",
                    "appraisedPrice": 22000,
                    "address": { "state": "NJ" }
                }))
            });

        let url = format!("https://www.withgarage.com/listing/{ID}");
        let outcome = invoice_for_url(&source, &renderer(), &url, Some("Engine 4"))
            .await
            .unwrap();

        assert_eq!(outcome.listing_id, Some(Uuid::parse_str(ID).unwrap()));
        assert_eq!(outcome.data.price, Price::Amount(22000.into()));
        assert_eq!(outcome.invoice.filename, "1999_Seagrave_Marauder_Invoice.pdf");
        assert!(outcome.invoice.bytes.starts_with(b"%PDF"));
    }

    #[tokio::test]
    async fn test_invalid_url_never_fetches() {
        let mut source = MockListingSource::new();
        source.expect_fetch_listing().times(0);

        let err = invoice_for_url(&source, &renderer(), "https://example.test/x", None)
            .await
            .unwrap_err();
        assert!(matches!(err, InvoiceError::InvalidListingUrl(_)));
        assert_eq!(err.status_code(), 400);
    }

    #[tokio::test]
    async fn test_upstream_status_propagates() {
        let mut source = MockListingSource::new();
        source.expect_fetch_listing().returning(|id| {
            Err(InvoiceError::ListingStatus {
                status: 404,
                url: format!("https://api.test/listings/{id}"),
                body: "Listing not found".to_string(),
            })
        });

        let url = format!("https://www.withgarage.com/listing/{ID}");
        let err = invoice_for_url(&source, &renderer(), &url, None)
            .await
            .unwrap_err();
        assert_eq!(err.status_code(), 404);
    }

    #[tokio::test]
    async fn test_invoice_for_listing_with_defaults() {
        let outcome = invoice_for_listing(&renderer(), &json!(null), None)
            .await
            .unwrap();
        assert_eq!(outcome.data.title, "Untitled Listing");
        assert_eq!(outcome.invoice.filename, "Untitled_Listing_Invoice.pdf");
        assert!(outcome.listing_id.is_none());
    }
}
