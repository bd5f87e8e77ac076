//! Lossy ASCII sanitization for text drawn with the base Latin font set.
//!
//! Unicode punctuation with an obvious ASCII spelling is transliterated;
//! every other non-ASCII code point is dropped so it never renders as a
//! missing-glyph box. ASCII control characters are dropped too, except that
//! tabs and carriage returns become spaces and newlines survive. Not
//! suitable as general text processing.

/// Placeholder shown for any missing or empty displayable field.
pub const NOT_AVAILABLE: &str = "N/A";

fn transliterate(c: char, out: &mut String) {
    match c {
        '\u{2018}' | '\u{2019}' => out.push('\''),
        '\u{201C}' | '\u{201D}' => out.push('"'),
        '\u{2014}' => out.push_str("--"),
        '\u{2013}' => out.push('-'),
        '\u{2026}' => out.push_str("..."),
        '\t' | '\r' => out.push(' '),
        '\n' => out.push('\n'),
        c if c.is_ascii_control() => {}
        c if c.is_ascii() => out.push(c),
        _ => {}
    }
}

/// Sanitizes display text, returning [`NOT_AVAILABLE`] for absent input or
/// input that is empty once stripped.
pub fn sanitize(text: Option<&str>) -> String {
    let Some(text) = text else {
        return NOT_AVAILABLE.to_string();
    };

    let mut out = String::with_capacity(text.len());
    for c in text.chars() {
        transliterate(c, &mut out);
    }

    if out.is_empty() {
        NOT_AVAILABLE.to_string()
    } else {
        out
    }
}

/// Builds the filename stem for `<stem>_Invoice.pdf`.
///
/// Curly quotes become straight quotes, non-ASCII is stripped, whitespace
/// runs become a single underscore, and anything outside `[A-Za-z0-9_-]`
/// is removed.
pub fn filename_stem(title: &str) -> String {
    let mut stem = String::with_capacity(title.len());
    let mut in_whitespace = false;

    for c in title.chars() {
        let c = match c {
            '\u{2018}' | '\u{2019}' => '\'',
            '\u{201C}' | '\u{201D}' => '"',
            c => c,
        };
        if !c.is_ascii() {
            continue;
        }
        if c.is_ascii_whitespace() {
            if !in_whitespace {
                stem.push('_');
            }
            in_whitespace = true;
            continue;
        }
        in_whitespace = false;
        if c.is_ascii_alphanumeric() || c == '_' || c == '-' {
            stem.push(c);
        }
    }

    if stem.is_empty() {
        "Listing".to_string()
    } else {
        stem
    }
}

/// Normalizes free-text description whitespace.
///
/// Runs of horizontal whitespace collapse to one space, consecutive blank
/// lines collapse to a single blank line, and the result is trimmed.
pub fn normalize_description(text: &str) -> String {
    let mut lines: Vec<String> = Vec::new();
    let mut previous_blank = false;

    for raw in text.lines() {
        let line = raw.split_whitespace().collect::<Vec<_>>().join(" ");
        if line.is_empty() {
            if !previous_blank && !lines.is_empty() {
                lines.push(String::new());
            }
            previous_blank = true;
        } else {
            lines.push(line);
            previous_blank = false;
        }
    }

    while lines.last().is_some_and(|l| l.is_empty()) {
        lines.pop();
    }

    lines.join("\n")
}
