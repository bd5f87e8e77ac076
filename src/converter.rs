//! SVG to PDF conversion with TRUE vector fidelity via svg2pdf.

use crate::error::{InvoiceError, Result};
use std::path::Path;
use std::sync::Arc;
use tracing::{info, warn};
use usvg::fontdb;

/// Family name of the bundled faces.
pub const BUNDLED_FAMILY: &str = "DejaVu Sans";

static BUNDLED_REGULAR: &[u8] = include_bytes!("../assets/fonts/DejaVuSans.ttf");
static BUNDLED_BOLD: &[u8] = include_bytes!("../assets/fonts/DejaVuSans-Bold.ttf");

/// Font database holding only the bundled faces, mapped to the generic
/// sans-serif and serif families.
pub fn bundled_font_database() -> fontdb::Database {
    let mut db = fontdb::Database::new();
    db.load_font_data(BUNDLED_REGULAR.to_vec());
    db.load_font_data(BUNDLED_BOLD.to_vec());
    db.set_sans_serif_family(BUNDLED_FAMILY);
    db.set_serif_family(BUNDLED_FAMILY);
    db
}

/// Builds the font database used for text in invoice layouts.
///
/// The bundled faces are always present, so layout metrics and the drawn
/// PDF agree on every host. `extra_dir` adds faces a theme may name
/// explicitly in its `font-family` list.
pub fn load_font_database(extra_dir: Option<&Path>) -> fontdb::Database {
    let mut db = bundled_font_database();
    if let Some(dir) = extra_dir {
        let before = db.len();
        db.load_fonts_dir(dir);
        if db.len() == before {
            warn!(dir = %dir.display(), "No fonts found in font directory");
        }
    }
    info!(faces = db.len(), sans_serif = BUNDLED_FAMILY, "Font database loaded");
    db
}

/// SVG to PDF converter using svg2pdf for true vector fidelity.
///
/// Holds the font database so it is loaded once per process rather than
/// once per document.
pub struct SvgToPdfConverter {
    fontdb: Arc<fontdb::Database>,
}

impl SvgToPdfConverter {
    pub fn new(fontdb: fontdb::Database) -> Self {
        Self {
            fontdb: Arc::new(fontdb),
        }
    }

    pub fn font_database(&self) -> &fontdb::Database {
        &self.fontdb
    }

    /// Converts SVG content to PDF bytes.
    ///
    /// # Errors
    ///
    /// - SVG parsing errors (malformed XML, unsupported features)
    /// - Zero or negative page dimensions
    pub fn convert(&self, svg_content: &str) -> Result<Vec<u8>> {
        let mut opt = usvg::Options::default();
        opt.fontdb = Arc::clone(&self.fontdb);

        let tree = usvg::Tree::from_str(svg_content, &opt)?;

        let size = tree.size();
        if size.width() <= 0.0 || size.height() <= 0.0 {
            return Err(InvoiceError::InvalidDimensions {
                width: size.width(),
                height: size.height(),
            });
        }

        let pdf_data = svg2pdf::to_pdf(
            &tree,
            svg2pdf::ConversionOptions::default(),
            svg2pdf::PageOptions::default(),
        );

        info!(
            width = size.width(),
            height = size.height(),
            bytes = pdf_data.len(),
            "PDF conversion complete"
        );
        Ok(pdf_data)
    }
}

impl Default for SvgToPdfConverter {
    fn default() -> Self {
        Self::new(bundled_font_database())
    }
}
