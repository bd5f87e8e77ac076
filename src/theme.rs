//! Page geometry and palette handed to the layout.

/// Colors used on the invoice, as SVG hex strings.
#[derive(Debug, Clone, PartialEq)]
pub struct Palette {
    pub accent: String,
    pub accent_fill: String,
    pub text_dark: String,
    pub text_medium: String,
    pub text_light: String,
    pub border: String,
    pub panel: String,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            accent: "#E65100".to_string(),
            accent_fill: "#FFF3E0".to_string(),
            text_dark: "#212121".to_string(),
            text_medium: "#424242".to_string(),
            text_light: "#757575".to_string(),
            border: "#E0E0E0".to_string(),
            panel: "#FAFAFA".to_string(),
        }
    }
}

/// Fixed-coordinate page configuration, in PDF points.
#[derive(Debug, Clone, PartialEq)]
pub struct Theme {
    pub palette: Palette,
    pub font_family: String,
    pub page_width: f64,
    pub page_height: f64,
    pub margin: f64,
    /// Height of the logo/title band at the top of the page.
    pub header_height: f64,
    /// Space below the description box kept free for the footer.
    pub footer_reserve: f64,
    /// Distance of the footer rule from the bottom edge.
    pub footer_offset: f64,
    pub footer_text: String,
}

/// A4 in points.
pub const A4_WIDTH: f64 = 595.28;
pub const A4_HEIGHT: f64 = 841.89;

impl Default for Theme {
    fn default() -> Self {
        Self {
            palette: Palette::default(),
            font_family: "sans-serif".to_string(),
            page_width: A4_WIDTH,
            page_height: A4_HEIGHT,
            margin: 50.0,
            header_height: 85.0,
            footer_reserve: 80.0,
            footer_offset: 60.0,
            footer_text: "Garage | (201)-293-7164 | support@withgarage.com".to_string(),
        }
    }
}

impl Theme {
    pub fn content_width(&self) -> f64 {
        self.page_width - 2.0 * self.margin
    }

    pub fn right_edge(&self) -> f64 {
        self.page_width - self.margin
    }

    pub fn with_footer_text(mut self, text: impl Into<String>) -> Self {
        self.footer_text = text.into();
        self
    }
}
