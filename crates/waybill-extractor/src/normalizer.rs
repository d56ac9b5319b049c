//! OCR text normalization
//!
//! Produces the canonical text both extractors read. Case is left alone:
//! casing is decided per field when pairs are formatted.

use waybill_domain::CleanedText;

/// Normalize raw OCR text
///
/// - control and zero-width characters are removed (line breaks survive)
/// - tabs and non-breaking spaces become spaces, runs of spaces collapse
/// - typographic quotes and dashes become their ASCII forms
/// - each line is trimmed and empty lines are dropped
///
/// Punctuation used by addresses and tracking numbers (commas, hyphens,
/// periods, `#`) is preserved.
pub fn normalize(raw_text: &str) -> CleanedText {
    let mut lines: Vec<String> = Vec::new();

    for line in raw_text.split(['\n', '\r']) {
        let mut cleaned = String::with_capacity(line.len());
        let mut pending_space = false;

        for c in line.chars() {
            let c = match c {
                '\t' | '\u{00A0}' | '\u{2007}' | '\u{202F}' => ' ',
                '\u{2018}' | '\u{2019}' | '\u{02BC}' => '\'',
                '\u{201C}' | '\u{201D}' => '"',
                '\u{2010}'..='\u{2015}' => '-',
                c => c,
            };

            if is_invisible(c) {
                continue;
            }
            if c.is_whitespace() {
                pending_space = !cleaned.is_empty();
                continue;
            }
            if pending_space {
                cleaned.push(' ');
                pending_space = false;
            }
            cleaned.push(c);
        }

        if !cleaned.is_empty() {
            lines.push(cleaned);
        }
    }

    CleanedText::from_normalized(lines.join("\n"))
}

fn is_invisible(c: char) -> bool {
    matches!(
        c,
        '\u{200B}'..='\u{200D}' | '\u{2060}' | '\u{FEFF}' | '\u{00AD}'
    ) || (c.is_control() && c != ' ')
}
