//! Logo lookup in the local asset directory.

use base64::{engine::general_purpose, Engine};
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

const PNG_SIGNATURE: &[u8] = &[0x89, b'P', b'N', b'G', 0x0D, 0x0A, 0x1A, 0x0A];
const JPEG_SIGNATURE: &[u8] = &[0xFF, 0xD8, 0xFF];

/// A decoded-enough logo, ready to embed.
#[derive(Debug, Clone, PartialEq)]
pub struct LogoImage {
    pub path: PathBuf,
    pub mime: &'static str,
    pub data_uri: String,
}

/// Locates `<dir>/<stem>.png`, falling back to `<dir>/<stem>.jpg`.
#[derive(Debug, Clone)]
pub struct LogoStore {
    dir: PathBuf,
    stem: String,
}

impl LogoStore {
    pub fn new(dir: impl Into<PathBuf>, stem: impl Into<String>) -> Self {
        Self {
            dir: dir.into(),
            stem: stem.into(),
        }
    }

    /// First existing candidate path, PNG before JPG.
    pub fn locate(&self) -> Option<PathBuf> {
        ["png", "jpg"]
            .iter()
            .map(|ext| self.dir.join(format!("{}.{}", self.stem, ext)))
            .find(|p| p.is_file())
    }

    /// Loads the logo. Missing, unreadable or unrecognised files yield
    /// `None`; the invoice is then drawn without a logo.
    pub fn load(&self) -> Option<LogoImage> {
        let Some(path) = self.locate() else {
            debug!(dir = %self.dir.display(), stem = %self.stem, "No logo found");
            return None;
        };

        match load_image(&path) {
            Ok(logo) => Some(logo),
            Err(reason) => {
                warn!(path = %path.display(), reason = %reason, "Logo load failed");
                None
            }
        }
    }
}

fn load_image(path: &Path) -> Result<LogoImage, String> {
    let bytes = fs::read(path).map_err(|e| e.to_string())?;

    let mime = if bytes.starts_with(PNG_SIGNATURE) {
        "image/png"
    } else if bytes.starts_with(JPEG_SIGNATURE) {
        "image/jpeg"
    } else {
        return Err("unrecognised image format".to_string());
    };

    let encoded = general_purpose::STANDARD.encode(&bytes);
    Ok(LogoImage {
        path: path.to_path_buf(),
        mime,
        data_uri: format!("data:{mime};base64,{encoded}"),
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn png_bytes() -> Vec<u8> {
        let mut bytes = PNG_SIGNATURE.to_vec();
        bytes.extend_from_slice(&[0, 0, 0, 13]);
        bytes
    }

    #[test]
    fn test_missing_logo_is_none() {
        let dir = TempDir::new().unwrap();
        let store = LogoStore::new(dir.path(), "garage-logo");
        assert!(store.locate().is_none());
        assert!(store.load().is_none());
    }

    #[test]
    fn test_png_preferred_over_jpg() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("garage-logo.jpg"), JPEG_SIGNATURE).unwrap();
        fs::write(dir.path().join("garage-logo.png"), png_bytes()).unwrap();

        let logo = LogoStore::new(dir.path(), "garage-logo").load().unwrap();
        assert_eq!(logo.mime, "image/png");
        assert!(logo.data_uri.starts_with("data:image/png;base64,"));
    }

    #[test]
    fn test_jpg_fallback() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("garage-logo.jpg"), [0xFF, 0xD8, 0xFF, 0xE0]).unwrap();

        let logo = LogoStore::new(dir.path(), "garage-logo").load().unwrap();
        assert_eq!(logo.mime, "image/jpeg");
    }

    #[test]
    fn test_corrupt_logo_degrades() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join("garage-logo.png"), b"not really a png").unwrap();

        let store = LogoStore::new(dir.path(), "garage-logo");
        assert!(store.locate().is_some());
        assert!(store.load().is_none());
    }
}
