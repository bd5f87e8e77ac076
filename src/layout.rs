//! Single-page invoice composition.
//!
//! Every element sits at a fixed coordinate derived from the [`Theme`];
//! nothing reflows and nothing paginates. The description box takes
//! whatever height remains above the footer reservation and clips what
//! does not fit.

use crate::currency::format_usd;
use crate::logo::LogoImage;
use crate::metrics::FontMetrics;
use crate::normalize::InvoiceData;
use crate::sanitize::{normalize_description, sanitize};
use crate::svg::{Anchor, SvgCanvas, TextStyle};
use crate::tax::{TaxPolicy, Totals};
use crate::theme::Theme;
use chrono::{Datelike, Local, NaiveDate};
use rand::Rng;
use tracing::debug;

/// Invoice number and issue date: the only non-deterministic content.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InvoiceMeta {
    pub number: String,
    pub issued_on: NaiveDate,
}

impl InvoiceMeta {
    pub fn new(number: impl Into<String>, issued_on: NaiveDate) -> Self {
        Self {
            number: number.into(),
            issued_on,
        }
    }

    /// `INV-<year>-<6 digits>` with a random serial in 1000..=999999, dated today.
    pub fn generate() -> Self {
        let today = Local::now().date_naive();
        let serial: u32 = rand::thread_rng().gen_range(1000..=999_999);
        Self::new(format!("INV-{}-{:06}", today.year(), serial), today)
    }

    /// Long textual date, e.g. "October 18, 2026".
    pub fn long_date(&self) -> String {
        self.issued_on.format("%B %-d, %Y").to_string()
    }
}

/// Everything one page needs besides the theme.
#[derive(Debug, Clone, Copy)]
pub struct PageInput<'a> {
    pub data: &'a InvoiceData,
    pub meta: &'a InvoiceMeta,
    pub recipient: Option<&'a str>,
    pub logo: Option<&'a LogoImage>,
    pub tax: TaxPolicy,
    /// Advances of the faces the converter will draw with.
    pub metrics: &'a FontMetrics,
}

const TITLE_WIDTH: f64 = 220.0;
const CATEGORY_WIDTH: f64 = 200.0;
const LEFT_COLUMN_X: f64 = 65.0;
const RIGHT_COLUMN_X: f64 = 320.0;
const INFO_BOX_HEIGHT: f64 = 95.0;
const PRICE_BOX_HEIGHT: f64 = 35.0;
const SUMMARY_ROW: f64 = 16.0;
const DESCRIPTION_SIZE: f64 = 9.5;
const DESCRIPTION_LINE_GAP: f64 = 2.0;

struct Composer<'t> {
    theme: &'t Theme,
    metrics: &'t FontMetrics,
    canvas: SvgCanvas,
}

impl<'t> Composer<'t> {
    fn style(&self, size: f64, bold: bool, fill: &'t str, anchor: Anchor) -> TextStyle<'t> {
        TextStyle {
            size,
            bold,
            fill,
            anchor,
        }
    }

    fn header(&mut self, input: &PageInput<'_>) {
        let theme = self.theme;
        let right = theme.right_edge();

        if let Some(logo) = input.logo {
            self.canvas
                .image(theme.margin, 30.0, 80.0, 55.0, &logo.data_uri);
        }

        let black = self.style(24.0, true, "#000000", Anchor::End);
        self.canvas.text(right, 30.0, "INVOICE", black);

        let meta_style = self.style(9.0, false, &theme.palette.text_medium, Anchor::End);
        self.canvas.text(
            right,
            60.0,
            &format!("Invoice #: {}", input.meta.number),
            meta_style,
        );
        self.canvas
            .text(right, 72.0, &format!("Date: {}", input.meta.long_date()), meta_style);

        if let Some(name) = input.recipient {
            let x = theme.margin + 100.0;
            self.canvas.begin_group("bill-to", None);
            let label = self.style(9.0, false, &theme.palette.text_medium, Anchor::Start);
            self.canvas.text(x, 40.0, "Bill To:", label);
            let value = self.style(11.0, true, &theme.palette.text_dark, Anchor::Start);
            self.canvas.text(x, 52.0, &sanitize(Some(name)), value);
            self.canvas.end_group();
        }
    }

    fn field(&mut self, x: f64, y: f64, label: &str, value: &str) {
        let theme = self.theme;
        let label_style = self.style(10.0, false, &theme.palette.text_medium, Anchor::Start);
        self.canvas.text(x, y, label, label_style);
        let value_style = self.style(11.0, true, &theme.palette.text_dark, Anchor::Start);
        self.canvas.text(x, y + 11.0, value, value_style);
    }

    /// Returns the y coordinate just below the info box.
    fn vehicle_info(&mut self, data: &InvoiceData, top: f64) -> f64 {
        let theme = self.theme;
        let heading = self.style(18.0, true, &theme.palette.accent, Anchor::Start);
        self.canvas
            .text(theme.margin, top, "Vehicle Information", heading);

        let box_y = top + 25.0;
        self.canvas.rect(
            theme.margin,
            box_y,
            theme.content_width(),
            INFO_BOX_HEIGHT,
            &theme.palette.panel,
            Some((&theme.palette.border, 0.5)),
        );

        let y = box_y + 12.0;
        let metrics = self.metrics;
        let title =
            metrics.truncate_with_ellipsis(&sanitize(Some(&data.title)), TITLE_WIDTH, 11.0, true);
        let category = metrics.truncate_with_ellipsis(
            &sanitize(data.category.as_deref()),
            CATEGORY_WIDTH,
            11.0,
            true,
        );

        self.field(LEFT_COLUMN_X, y, "Title", &title);
        self.field(LEFT_COLUMN_X, y + 35.0, "Brand", &sanitize(data.brand.as_deref()));
        self.field(LEFT_COLUMN_X, y + 60.0, "Year", &sanitize(data.year.as_deref()));
        self.field(RIGHT_COLUMN_X, y, "Category", &category);
        self.field(RIGHT_COLUMN_X, y + 35.0, "State", &sanitize(data.state.as_deref()));

        box_y + INFO_BOX_HEIGHT
    }

    /// Returns the y coordinate just below the totals block.
    fn price_block(&mut self, totals: &Totals, top: f64) -> f64 {
        let theme = self.theme;
        self.canvas.rect(
            theme.margin,
            top,
            theme.content_width(),
            PRICE_BOX_HEIGHT,
            &theme.palette.accent_fill,
            Some((&theme.palette.accent, 1.5)),
        );
        let price = self.style(22.0, true, &theme.palette.accent, Anchor::Start);
        self.canvas.text(
            LEFT_COLUMN_X,
            top + 8.0,
            &format!("Price: {}", format_usd(&totals.subtotal)),
            price,
        );

        let label_x = theme.page_width - 250.0;
        let value_x = theme.right_edge() - 15.0;
        let mut y = top + PRICE_BOX_HEIGHT + 12.0;

        let tax_label = if totals.is_taxed() {
            format!("Tax ({}%)", totals.tax_rate_percent)
        } else {
            "Tax".to_string()
        };
        let rows = [
            ("Subtotal", format_usd(&totals.subtotal)),
            (tax_label.as_str(), format_usd(&totals.tax)),
        ];
        for (label, value) in rows {
            let label_style = self.style(10.0, false, &theme.palette.text_medium, Anchor::Start);
            self.canvas.text(label_x, y, label, label_style);
            let value_style = self.style(10.0, false, &theme.palette.text_dark, Anchor::End);
            self.canvas.text(value_x, y, &value, value_style);
            y += SUMMARY_ROW;
        }

        self.canvas
            .line(label_x, y - 2.0, value_x, y - 2.0, &theme.palette.border, 0.5);
        y += 2.0;

        let total_label = self.style(12.0, true, &theme.palette.text_dark, Anchor::Start);
        self.canvas.text(label_x, y, "Total", total_label);
        let total_value = self.style(12.0, true, &theme.palette.accent, Anchor::End);
        self.canvas
            .text(value_x, y, &format_usd(&totals.total), total_value);

        y + SUMMARY_ROW
    }

    fn description(&mut self, description: &str, top: f64) {
        let theme = self.theme;
        let heading = self.style(18.0, true, &theme.palette.accent, Anchor::Start);
        self.canvas.text(theme.margin, top, "Description", heading);

        let box_y = top + 25.0;
        let box_height = (theme.page_height - box_y - theme.footer_reserve).max(0.0);
        let box_width = theme.content_width();
        self.canvas.rect(
            theme.margin,
            box_y,
            box_width,
            box_height,
            &theme.palette.panel,
            Some((&theme.palette.border, 0.5)),
        );

        let text = normalize_description(&sanitize(Some(description)));
        let lines = self
            .metrics
            .wrap_text(&text, box_width - 20.0, DESCRIPTION_SIZE);
        let line_height = DESCRIPTION_SIZE * 1.15 + DESCRIPTION_LINE_GAP;
        let visible = ((box_height - 8.0) / line_height).ceil().max(0.0) as usize;
        debug!(
            lines = lines.len(),
            visible = visible,
            "Laying out description"
        );

        let style = self.style(DESCRIPTION_SIZE, false, &theme.palette.text_dark, Anchor::Start);
        self.canvas.begin_group(
            "description",
            Some((theme.margin, box_y, box_width, box_height)),
        );
        let mut y = box_y + 8.0;
        for line in lines.iter().take(visible) {
            if !line.is_empty() {
                self.canvas.text(theme.margin + 10.0, y, line, style);
            }
            y += line_height;
        }
        self.canvas.end_group();
    }

    fn footer(&mut self) {
        let theme = self.theme;
        let footer_y = theme.page_height - theme.footer_offset;
        self.canvas.line(
            theme.margin,
            footer_y,
            theme.right_edge(),
            footer_y,
            &theme.palette.border,
            0.5,
        );
        let style = self.style(8.5, false, &theme.palette.text_light, Anchor::Middle);
        self.canvas.text(
            theme.page_width / 2.0,
            footer_y + 8.0,
            &sanitize(Some(&theme.footer_text)),
            style,
        );
    }
}

/// Composes the invoice page as an SVG document.
pub fn compose_invoice(theme: &Theme, input: &PageInput<'_>) -> String {
    let mut composer = Composer {
        theme,
        metrics: input.metrics,
        canvas: SvgCanvas::new(theme.page_width, theme.page_height, &theme.font_family),
    };

    composer.header(input);

    let content_top = theme.header_height + 25.0;
    let info_bottom = composer.vehicle_info(input.data, content_top);

    let totals = input
        .tax
        .totals(&input.data.price.amount_or_zero(), input.data.state.as_deref());
    let summary_bottom = composer.price_block(&totals, info_bottom + 12.0);

    composer.description(&input.data.description, summary_bottom + 10.0);
    composer.footer();

    composer.canvas.finish()
}
