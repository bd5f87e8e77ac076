//! Download-side delivery of rendered invoices.

use crate::error::Result;
use crate::sanitize::filename_stem;
use std::io::Write;
use std::path::{Path, PathBuf};
use tempfile::NamedTempFile;
use tracing::info;

pub const CONTENT_TYPE: &str = "application/pdf";

/// A complete single-page PDF held in memory.
#[derive(Debug, Clone)]
pub struct RenderedInvoice {
    pub bytes: Vec<u8>,
    pub filename: String,
    pub invoice_number: String,
}

/// `<sanitized-title>_Invoice.pdf`
pub fn invoice_filename(title: &str) -> String {
    format!("{}_Invoice.pdf", filename_stem(title))
}

impl RenderedInvoice {
    pub fn new(bytes: Vec<u8>, title: &str, invoice_number: impl Into<String>) -> Self {
        Self {
            bytes,
            filename: invoice_filename(title),
            invoice_number: invoice_number.into(),
        }
    }

    pub fn len(&self) -> usize {
        self.bytes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.bytes.is_empty()
    }

    /// Value for a `Content-Disposition` response header.
    pub fn content_disposition(&self) -> String {
        format!("attachment; filename=\"{}\"", self.filename)
    }

    /// Writes the PDF into `dir` under its filename, replacing any existing
    /// file atomically.
    pub fn write_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        let target = dir.join(&self.filename);
        let mut tmp = NamedTempFile::new_in(dir)?;
        tmp.write_all(&self.bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&target).map_err(|e| e.error)?;

        info!(path = %target.display(), bytes = self.bytes.len(), "Invoice written");
        Ok(target)
    }

    /// Creates `dir` if needed and writes the PDF from the blocking pool.
    pub async fn save_to_dir(&self, dir: &Path) -> Result<PathBuf> {
        tokio::fs::create_dir_all(dir).await?;
        let invoice = self.clone();
        let dir = dir.to_path_buf();
        tokio::task::spawn_blocking(move || invoice.write_to_dir(&dir)).await?
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_filename_convention() {
        assert_eq!(
            invoice_filename("Bob's \u{201C}Big\u{201D} Rig"),
            "Bobs_Big_Rig_Invoice.pdf"
        );
    }

    #[test]
    fn test_content_disposition() {
        let invoice = RenderedInvoice::new(b"%PDF-1.7".to_vec(), "2010 KME Pumper", "INV-2026-001000");
        assert_eq!(
            invoice.content_disposition(),
            "attachment; filename=\"2010_KME_Pumper_Invoice.pdf\""
        );
    }

    #[test]
    fn test_write_to_dir_replaces_existing() {
        let dir = TempDir::new().unwrap();
        std::fs::write(dir.path().join("Truck_Invoice.pdf"), b"stale").unwrap();

        let invoice = RenderedInvoice::new(b"%PDF-fresh".to_vec(), "Truck", "INV-2026-001000");
        let path = invoice.write_to_dir(dir.path()).unwrap();

        assert_eq!(path, dir.path().join("Truck_Invoice.pdf"));
        assert_eq!(std::fs::read(&path).unwrap(), b"%PDF-fresh");
    }

    #[tokio::test]
    async fn test_save_to_dir_creates_missing_directory() {
        let root = TempDir::new().unwrap();
        let dir = root.path().join("out").join("invoices");

        let invoice = RenderedInvoice::new(b"%PDF-1.7".to_vec(), "Ladder 12", "INV-2026-001000");
        let path = invoice.save_to_dir(&dir).await.unwrap();

        assert_eq!(path, dir.join("Ladder_12_Invoice.pdf"));
        assert_eq!(tokio::fs::read(&path).await.unwrap(), b"%PDF-1.7");
    }
}
