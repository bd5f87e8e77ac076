//! Text measurement against the faces that will draw the text.
//!
//! A `font-family` list is resolved against the converter's font database
//! the same way SVG text resolves it, and advances are read from that face.
//! Text reaching the layout has already been sanitized to ASCII; anything
//! else is measured with the face's `?` advance.

use crate::error::{InvoiceError, Result};
use usvg::fontdb::{self, Family, Query, Weight};

#[derive(Debug, Clone)]
struct FaceMetrics {
    units_per_em: f64,
    advances: [u16; 95],
    fallback: u16,
}

impl FaceMetrics {
    fn from_face(face: &ttf_parser::Face<'_>) -> Self {
        let advance = |c: char| face.glyph_index(c).and_then(|g| face.glyph_hor_advance(g));
        let fallback = advance('?').unwrap_or(face.units_per_em() / 2);

        let mut advances = [fallback; 95];
        for (slot, c) in advances.iter_mut().zip(' '..='~') {
            *slot = advance(c).unwrap_or(fallback);
        }

        Self {
            units_per_em: f64::from(face.units_per_em().max(1)),
            advances,
            fallback,
        }
    }

    fn units(&self, c: char) -> u16 {
        match c {
            ' '..='~' => self.advances[c as usize - 0x20],
            _ => self.fallback,
        }
    }
}

/// Splits a CSS `font-family` list into fontdb families.
fn parse_family_list(list: &str) -> Vec<Family<'_>> {
    list.split(',')
        .map(|name| name.trim().trim_matches(|c| c == '\'' || c == '"'))
        .filter(|name| !name.is_empty())
        .map(|name| match name {
            "serif" => Family::Serif,
            "sans-serif" => Family::SansSerif,
            "monospace" => Family::Monospace,
            "cursive" => Family::Cursive,
            "fantasy" => Family::Fantasy,
            other => Family::Name(other),
        })
        .collect()
}

fn resolve_face(
    db: &fontdb::Database,
    families: &[Family<'_>],
    weight: Weight,
    font_family: &str,
) -> Result<FaceMetrics> {
    let query = Query {
        families,
        weight,
        ..Query::default()
    };
    let id = db
        .query(&query)
        .ok_or_else(|| InvoiceError::Font(format!("no face resolves for \"{font_family}\"")))?;

    db.with_face_data(id, |data, index| {
        ttf_parser::Face::parse(data, index)
            .ok()
            .map(|face| FaceMetrics::from_face(&face))
    })
    .flatten()
    .ok_or_else(|| InvoiceError::Font(format!("face for \"{font_family}\" could not be read")))
}

/// Regular and bold advance widths for one `font-family` list.
#[derive(Debug, Clone)]
pub struct FontMetrics {
    regular: FaceMetrics,
    bold: FaceMetrics,
}

impl FontMetrics {
    /// Resolves `font_family` in `db`, falling back to the serif family
    /// last as SVG text does.
    ///
    /// # Errors
    ///
    /// [`InvoiceError::Font`] when no face matches; text drawn with such a
    /// database would be silently dropped from the PDF.
    pub fn resolve(db: &fontdb::Database, font_family: &str) -> Result<Self> {
        let mut families = parse_family_list(font_family);
        families.push(Family::Serif);

        Ok(Self {
            regular: resolve_face(db, &families, Weight::NORMAL, font_family)?,
            bold: resolve_face(db, &families, Weight::BOLD, font_family)?,
        })
    }

    /// Width of `text` at `size` points.
    pub fn text_width(&self, text: &str, size: f64, bold: bool) -> f64 {
        let face = if bold { &self.bold } else { &self.regular };
        let units: u32 = text.chars().map(|c| u32::from(face.units(c))).sum();
        f64::from(units) * size / face.units_per_em
    }

    /// Shortens `text` to fit `max_width`, ending in "..." when cut.
    pub fn truncate_with_ellipsis(&self, text: &str, max_width: f64, size: f64, bold: bool) -> String {
        if self.text_width(text, size, bold) <= max_width {
            return text.to_string();
        }

        let budget = max_width - self.text_width("...", size, bold);
        let mut out = String::new();
        let mut used = 0.0;
        for c in text.chars() {
            let w = self.text_width(c.encode_utf8(&mut [0; 4]), size, bold);
            if used + w > budget {
                break;
            }
            used += w;
            out.push(c);
        }
        format!("{}...", out.trim_end())
    }

    /// Greedy word wrap. Newlines in `text` are hard breaks and empty lines
    /// are preserved; words wider than `max_width` are split by character.
    pub fn wrap_text(&self, text: &str, max_width: f64, size: f64) -> Vec<String> {
        let fits = |s: &str| self.text_width(s, size, false) <= max_width;
        let mut lines = Vec::new();

        for paragraph in text.split('\n') {
            if paragraph.trim().is_empty() {
                lines.push(String::new());
                continue;
            }

            let mut current = String::new();
            for word in paragraph.split_whitespace() {
                let candidate = if current.is_empty() {
                    word.to_string()
                } else {
                    format!("{current} {word}")
                };

                if fits(&candidate) {
                    current = candidate;
                    continue;
                }

                if !current.is_empty() {
                    lines.push(std::mem::take(&mut current));
                }

                if fits(word) {
                    current = word.to_string();
                } else {
                    for c in word.chars() {
                        let mut next = current.clone();
                        next.push(c);
                        if !current.is_empty() && !fits(&next) {
                            lines.push(std::mem::take(&mut current));
                            current.push(c);
                        } else {
                            current = next;
                        }
                    }
                }
            }

            if !current.is_empty() {
                lines.push(current);
            }
        }

        lines
    }
}
