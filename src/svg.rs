//! Minimal absolute-coordinate SVG canvas.
//!
//! Coordinates follow the page: origin at the top-left, y growing down, one
//! unit per PDF point. Text positions are given by the top of the line box
//! and converted to baselines here.

use std::fmt::Write as _;

/// Helvetica ascender as a fraction of the font size.
const ASCENT: f64 = 0.718;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Anchor {
    Start,
    Middle,
    End,
}

impl Anchor {
    fn as_str(self) -> &'static str {
        match self {
            Anchor::Start => "start",
            Anchor::Middle => "middle",
            Anchor::End => "end",
        }
    }
}

/// Font settings for one text run.
#[derive(Debug, Clone, Copy)]
pub struct TextStyle<'a> {
    pub size: f64,
    pub bold: bool,
    pub fill: &'a str,
    pub anchor: Anchor,
}

/// Escapes the five XML special characters and drops code points XML 1.0
/// does not allow in a document.
pub fn escape_xml(text: &str) -> String {
    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        match c {
            '&' => out.push_str("&amp;"),
            '<' => out.push_str("&lt;"),
            '>' => out.push_str("&gt;"),
            '"' => out.push_str("&quot;"),
            '\'' => out.push_str("&apos;"),
            '\t' | '\n' | '\r' => out.push(c),
            '\u{0}'..='\u{1F}' | '\u{FFFE}' | '\u{FFFF}' => {}
            c => out.push(c),
        }
    }
    out
}

pub struct SvgCanvas {
    width: f64,
    height: f64,
    font_family: String,
    defs: String,
    body: String,
}

impl SvgCanvas {
    pub fn new(width: f64, height: f64, font_family: &str) -> Self {
        Self {
            width,
            height,
            font_family: escape_xml(font_family),
            defs: String::new(),
            body: String::new(),
        }
    }

    /// Draws one line of text whose line box starts at `top`.
    pub fn text(&mut self, x: f64, top: f64, content: &str, style: TextStyle<'_>) {
        let baseline = top + style.size * ASCENT;
        let _ = writeln!(
            self.body,
            r#"<text x="{:.2}" y="{:.2}" font-size="{}" font-weight="{}" fill="{}" text-anchor="{}">{}</text>"#,
            x,
            baseline,
            style.size,
            if style.bold { "bold" } else { "normal" },
            style.fill,
            style.anchor.as_str(),
            escape_xml(content),
        );
    }

    pub fn rect(&mut self, x: f64, y: f64, w: f64, h: f64, fill: &str, stroke: Option<(&str, f64)>) {
        let stroke = match stroke {
            Some((color, width)) => format!(r#" stroke="{}" stroke-width="{}""#, color, width),
            None => String::new(),
        };
        let _ = writeln!(
            self.body,
            r#"<rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" fill="{}"{}/>"#,
            x, y, w, h, fill, stroke
        );
    }

    pub fn line(&mut self, x1: f64, y1: f64, x2: f64, y2: f64, stroke: &str, width: f64) {
        let _ = writeln!(
            self.body,
            r#"<line x1="{:.2}" y1="{:.2}" x2="{:.2}" y2="{:.2}" stroke="{}" stroke-width="{}"/>"#,
            x1, y1, x2, y2, stroke, width
        );
    }

    /// Embeds an image scaled to fit inside the box, keeping aspect ratio.
    pub fn image(&mut self, x: f64, y: f64, w: f64, h: f64, href: &str) {
        let _ = writeln!(
            self.body,
            r#"<image x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}" preserveAspectRatio="xMidYMid meet" xlink:href="{}"/>"#,
            x,
            y,
            w,
            h,
            escape_xml(href)
        );
    }

    /// Opens a group; everything drawn until [`SvgCanvas::end_group`] belongs
    /// to it. With `clip`, contents are clipped to that rectangle.
    pub fn begin_group(&mut self, id: &str, clip: Option<(f64, f64, f64, f64)>) {
        match clip {
            Some((x, y, w, h)) => {
                let clip_id = format!("{id}-clip");
                let _ = writeln!(
                    self.defs,
                    r#"<clipPath id="{}"><rect x="{:.2}" y="{:.2}" width="{:.2}" height="{:.2}"/></clipPath>"#,
                    clip_id, x, y, w, h
                );
                let _ = writeln!(self.body, r#"<g id="{}" clip-path="url(#{})">"#, id, clip_id);
            }
            None => {
                let _ = writeln!(self.body, r#"<g id="{}">"#, id);
            }
        }
    }

    pub fn end_group(&mut self) {
        self.body.push_str("</g>\n");
    }

    pub fn finish(self) -> String {
        let mut doc = String::with_capacity(self.body.len() + self.defs.len() + 512);
        let _ = writeln!(
            doc,
            r#"<svg xmlns="http://www.w3.org/2000/svg" xmlns:xlink="http://www.w3.org/1999/xlink" width="{w}" height="{h}" viewBox="0 0 {w} {h}" font-family="{f}">"#,
            w = self.width,
            h = self.height,
            f = self.font_family,
        );
        if !self.defs.is_empty() {
            doc.push_str("<defs>\n");
            doc.push_str(&self.defs);
            doc.push_str("</defs>\n");
        }
        doc.push_str(&self.body);
        doc.push_str("</svg>\n");
        doc
    }
}
