/// Integration tests for invoice rendering.
///
/// These tests drive the public API from listing JSON through layout and
/// SVG conversion to PDF bytes, then inspect the result with lopdf.
///
/// ## Running Tests
///
/// ```bash
/// cargo test --test invoice_pdf_test
/// ```

#[cfg(test)]
mod tests {
    use base64::{engine::general_purpose, Engine};
    use chrono::NaiveDate;
    use listing_invoice::{
        converter::{load_font_database, SvgToPdfConverter},
        delivery::CONTENT_TYPE,
        layout::InvoiceMeta,
        logo::LogoStore,
        normalize::InvoiceData,
        pipeline::invoice_for_listing,
        renderer::InvoiceRenderer,
        tax::TaxPolicy,
    };
    use lopdf::Document;
    use serde_json::json;
    use tempfile::TempDir;

    /// 1x1 transparent PNG.
    const TINY_PNG: &str =
        "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAYAAAAfFcSJAAAADUlEQVR42mNkYPhfDwAChwGA60e6kgAAAABJRU5ErkJggg==";

    fn renderer() -> InvoiceRenderer {
        InvoiceRenderer::new(SvgToPdfConverter::new(load_font_database(None)))
    }

    fn full_listing() -> serde_json::Value {
        json!({
            "listingTitle": "2016 Pierce Enforcer \u{2014} 1500 GPM",
            "sellingPrice": 1234.5,
            "listingDescription": "Single owner.\n\n\nFull service records \u{2026} ready to roll.",
            "itemBrand": "Pierce",
            "itemAge": 2016,
            "categoryV2": { "name": "Pumper" },
            "address": { "state": "WI" },
            "imageUrls": ["https://img.test/enforcer.jpg"]
        })
    }

    fn page_count(bytes: &[u8]) -> usize {
        Document::load_mem(bytes).unwrap().get_pages().len()
    }

    fn font_count(bytes: &[u8]) -> usize {
        let doc = Document::load_mem(bytes).unwrap();
        doc.objects
            .values()
            .filter_map(|o| o.as_dict().ok())
            .filter(|d| d.get(b"Type").and_then(|t| t.as_name()).ok() == Some(b"Font".as_slice()))
            .count()
    }

    /// Full listing renders as exactly one A4 page.
    #[tokio::test]
    async fn test_full_listing_single_a4_page() {
        let outcome = invoice_for_listing(&renderer(), &full_listing(), Some("Dana Ruiz"))
            .await
            .unwrap();
        let bytes = &outcome.invoice.bytes;

        assert!(bytes.starts_with(b"%PDF"));
        let doc = Document::load_mem(bytes).unwrap();
        let pages = doc.get_pages();
        assert_eq!(pages.len(), 1);

        let page_id = *pages.values().next().unwrap();
        let media_box = doc
            .get_dictionary(page_id)
            .unwrap()
            .get(b"MediaBox")
            .unwrap()
            .as_array()
            .unwrap()
            .iter()
            .map(|v| v.as_float().unwrap())
            .collect::<Vec<_>>();
        assert!((media_box[2] - media_box[0] - 595.28).abs() < 0.5);
        assert!((media_box[3] - media_box[1] - 841.89).abs() < 0.5);
        assert!(font_count(bytes) > 0, "invoice text was not embedded");
    }

    /// Two renders of the same data differ only in invoice number.
    #[tokio::test]
    async fn test_repeat_renders_are_stable() {
        let renderer = renderer();
        let data = InvoiceData::from_json(&full_listing());

        let first = renderer.render(&data, None).await.unwrap();
        let second = renderer.render(&data, None).await.unwrap();

        assert_eq!(page_count(&first.bytes), 1);
        assert_eq!(page_count(&second.bytes), 1);
        assert!(!first.is_empty());
        let (a, b) = (first.len() as f64, second.len() as f64);
        assert!((a - b).abs() / a < 0.05, "lengths {a} vs {b}");
    }

    /// Identical metadata yields identical layouts.
    #[test]
    fn test_fixed_meta_is_deterministic() {
        let renderer = renderer();
        let data = InvoiceData::from_json(&full_listing());
        let meta = InvoiceMeta::new(
            "INV-2026-555555",
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        );

        let a = renderer.compose(&data, Some("Dana"), &meta).unwrap();
        let b = renderer.compose(&data, Some("Dana"), &meta).unwrap();
        assert_eq!(a, b);
        assert!(a.contains(">2016 Pierce Enforcer -- 1500 GPM</text>"));
        assert!(a.contains(">Full service records ... ready to roll.</text>"));
    }

    /// Listing with nothing in it still renders one page with placeholders.
    #[tokio::test]
    async fn test_empty_listing_renders_placeholders() {
        let renderer = renderer();
        let outcome = invoice_for_listing(&renderer, &json!({}), None)
            .await
            .unwrap();
        assert_eq!(page_count(&outcome.invoice.bytes), 1);

        let meta = InvoiceMeta::new(
            "INV-2026-001000",
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        );
        let svg = renderer.compose(&outcome.data, None, &meta).unwrap();
        assert!(svg.contains(">Untitled Listing</text>"));
        assert_eq!(svg.matches(">N/A</text>").count(), 4);
        assert!(svg.contains(">Price: $0.00</text>"));
    }

    /// Oversized descriptions are clipped, never paginated.
    #[tokio::test]
    async fn test_long_description_stays_on_one_page() {
        let mut listing = full_listing();
        listing["listingDescription"] =
            json!("Extended warranty details and maintenance history. ".repeat(3000));

        let outcome = invoice_for_listing(&renderer(), &listing, None)
            .await
            .unwrap();
        assert_eq!(page_count(&outcome.invoice.bytes), 1);
    }

    /// A valid logo is embedded; a corrupt one is skipped.
    #[tokio::test]
    async fn test_logo_handling() {
        let assets = TempDir::new().unwrap();
        let store = LogoStore::new(assets.path(), "garage-logo");
        let data = InvoiceData::from_json(&full_listing());

        std::fs::write(
            assets.path().join("garage-logo.png"),
            general_purpose::STANDARD.decode(TINY_PNG).unwrap(),
        )
        .unwrap();
        let with_logo = renderer().with_logo(store.clone());
        let invoice = with_logo.render(&data, None).await.unwrap();
        assert_eq!(page_count(&invoice.bytes), 1);

        std::fs::write(assets.path().join("garage-logo.png"), b"corrupt").unwrap();
        let invoice = with_logo.render(&data, None).await.unwrap();
        assert_eq!(page_count(&invoice.bytes), 1);
    }

    /// State tax only applies when enabled.
    #[tokio::test]
    async fn test_state_tax_gate() {
        let data = InvoiceData::from_json(&full_listing());
        let meta = InvoiceMeta::new(
            "INV-2026-001000",
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        );

        let off = renderer().compose(&data, None, &meta).unwrap();
        assert!(off.contains(">Tax</text>"));

        let on = renderer()
            .with_tax_policy(TaxPolicy::StateTable)
            .compose(&data, None, &meta)
            .unwrap();
        assert!(on.contains(">Tax (5%)</text>"));
        assert!(on.contains(">$61.73</text>"));
    }

    /// Written invoices follow the `<title>_Invoice.pdf` convention.
    #[tokio::test]
    async fn test_write_invoice_to_disk() {
        let out = TempDir::new().unwrap();
        let listing = json!({ "listingTitle": "Bob's \u{201C}Big\u{201D} Rig", "sellingPrice": "4500" });

        let outcome = invoice_for_listing(&renderer(), &listing, None)
            .await
            .unwrap();
        let path = outcome.invoice.write_to_dir(out.path()).unwrap();

        assert_eq!(path.file_name().unwrap(), "Bobs_Big_Rig_Invoice.pdf");
        assert_eq!(CONTENT_TYPE, "application/pdf");
        let written = std::fs::read(&path).unwrap();
        assert_eq!(written, outcome.invoice.bytes);
        assert_eq!(page_count(&written), 1);
    }

    /// Stray control characters in listing fields are dropped, not fatal.
    #[tokio::test]
    async fn test_control_characters_in_fields_render() {
        let listing = json!({
            "listingTitle": "2010 KME\u{0001} Pumper",
            "itemBrand": "KME\u{000B}",
            "listingDescription": "Line one\u{0007}\r\nLine\ttwo"
        });
        let renderer = renderer();

        let outcome = invoice_for_listing(&renderer, &listing, None)
            .await
            .unwrap();
        assert_eq!(page_count(&outcome.invoice.bytes), 1);

        let meta = InvoiceMeta::new(
            "INV-2026-001000",
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        );
        let svg = renderer.compose(&outcome.data, None, &meta).unwrap();
        assert!(svg.contains(">2010 KME Pumper</text>"));
        assert!(svg.contains(">KME</text>"));
        assert!(svg.contains(">Line two</text>"));
    }

    /// Prices round to cents as decimals, half up.
    #[test]
    fn test_price_rounds_as_decimal() {
        let data = InvoiceData::from_json(&json!({ "sellingPrice": "1.005" }));
        let meta = InvoiceMeta::new(
            "INV-2026-001000",
            NaiveDate::from_ymd_opt(2026, 10, 18).unwrap(),
        );
        let svg = renderer().compose(&data, None, &meta).unwrap();
        assert!(svg.contains(">Price: $1.01</text>"));
    }
}
