//! Output casing and address assembly

const DIRECTIONALS: &[&str] = &["N", "S", "E", "W", "NE", "NW", "SE", "SW"];

/// Title-case a word that OCR produced in a single case
///
/// Mixed-case words are assumed intentional (McDonald, DeKalb) and kept.
/// Words containing digits are upper-cased, except ordinals (40th).
fn case_word(word: &str) -> String {
    if word.chars().any(|c| c.is_ascii_digit()) {
        return if is_ordinal(word) {
            word.to_lowercase()
        } else {
            word.to_uppercase()
        };
    }

    let has_upper = word.chars().any(char::is_uppercase);
    let has_lower = word.chars().any(char::is_lowercase);
    if has_upper && has_lower {
        return word.to_string();
    }

    let mut out = String::with_capacity(word.len());
    let mut start_of_part = true;
    for c in word.chars() {
        if start_of_part {
            out.extend(c.to_uppercase());
        } else {
            out.extend(c.to_lowercase());
        }
        // O'NEIL -> O'Neil, SMITH-JONES -> Smith-Jones
        start_of_part = matches!(c, '\'' | '-');
    }
    out
}

fn is_ordinal(word: &str) -> bool {
    let lower = word.to_ascii_lowercase();
    let digits_end = lower.find(|c: char| !c.is_ascii_digit()).unwrap_or(lower.len());
    digits_end > 0 && matches!(&lower[digits_end..], "st" | "nd" | "rd" | "th")
}

/// Apply word casing to a person name
pub fn format_name(name: &str) -> String {
    name.split_whitespace()
        .map(case_word)
        .collect::<Vec<_>>()
        .join(" ")
}

/// Apply word casing to a street, unit or city
pub fn format_place(text: &str) -> String {
    text.trim()
        .trim_end_matches([',', '.'])
        .split_whitespace()
        .map(|word| {
            let bare = word.trim_end_matches('.');
            if DIRECTIONALS.iter().any(|d| d.eq_ignore_ascii_case(bare)) {
                word.to_uppercase()
            } else {
                case_word(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// `PO Box <n>` in canonical form
pub fn format_po_box(text: &str) -> String {
    let number: String = text.chars().filter(|c| c.is_ascii_digit()).collect();
    format!("PO Box {}", number)
}

/// ZIP or ZIP+4 as `NNNNN` or `NNNNN-NNNN`
pub fn format_zip(zip: &str) -> String {
    let digits: String = zip.chars().filter(|c| c.is_ascii_digit()).collect();
    if digits.len() == 9 {
        format!("{}-{}", &digits[..5], &digits[5..])
    } else {
        digits
    }
}

/// Components of a parsed address
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AddressParts {
    /// Street line (number and name, or PO box)
    pub street: Option<String>,
    /// Secondary unit
    pub unit: Option<String>,
    /// City
    pub city: Option<String>,
    /// Two-letter state code
    pub state: Option<String>,
    /// ZIP code
    pub zip: Option<String>,
}

impl AddressParts {
    /// Render as `"<street>[ <unit>], <City> <ST> <ZIP>"`
    ///
    /// Missing parts are left out along with their separators.
    pub fn render(&self) -> String {
        let mut line = String::new();
        if let Some(street) = &self.street {
            line.push_str(street);
            if let Some(unit) = &self.unit {
                line.push(' ');
                line.push_str(unit);
            }
        }

        let tail: Vec<String> = [
            self.city.clone(),
            self.state.as_ref().map(|s| s.to_ascii_uppercase()),
            self.zip.as_deref().map(format_zip),
        ]
        .into_iter()
        .flatten()
        .filter(|s| !s.is_empty())
        .collect();

        if tail.is_empty() {
            return line;
        }
        if line.is_empty() {
            return tail.join(" ");
        }
        format!("{}, {}", line, tail.join(" "))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_format_name() {
        assert_eq!(format_name("john smith"), "John Smith");
        assert_eq!(format_name("JANE O'NEIL"), "Jane O'Neil");
        assert_eq!(format_name("Ronald McDonald"), "Ronald McDonald");
        assert_eq!(format_name("mary  smith-jones"), "Mary Smith-Jones");
    }

    #[test]
    fn test_format_place() {
        assert_eq!(format_place("123 main st"), "123 Main St");
        assert_eq!(format_place("4500 n LAMAR BLVD."), "4500 N Lamar Blvd");
        assert_eq!(format_place("200 W 40TH ST"), "200 W 40th St");
        assert_eq!(format_place("apt 4b"), "Apt 4B");
    }

    #[test]
    fn test_format_zip() {
        assert_eq!(format_zip("12345"), "12345");
        assert_eq!(format_zip("12345-6789"), "12345-6789");
        assert_eq!(format_zip("123456789"), "12345-6789");
    }

    #[test]
    fn test_render_full() {
        let parts = AddressParts {
            street: Some("123 Main St".into()),
            unit: Some("Apt 4".into()),
            city: Some("Anytown".into()),
            state: Some("ca".into()),
            zip: Some("12345".into()),
        };
        assert_eq!(parts.render(), "123 Main St Apt 4, Anytown CA 12345");
    }

    #[test]
    fn test_render_partial() {
        let street_only = AddressParts {
            street: Some("9 Elm Rd".into()),
            ..AddressParts::default()
        };
        assert_eq!(street_only.render(), "9 Elm Rd");

        let tail_only = AddressParts {
            city: Some("Reno".into()),
            state: Some("NV".into()),
            zip: Some("89501".into()),
            ..AddressParts::default()
        };
        assert_eq!(tail_only.render(), "Reno NV 89501");
    }

    #[test]
    fn test_po_box() {
        assert_eq!(format_po_box("p.o. box 42"), "PO Box 42");
    }
}
