//! Address, name and section-marker pattern catalog
//!
//! Each group is ordered most specific first. Catalog entries carry a stable
//! id so that extraction results and tests can name the rule that fired.

use lazy_static::lazy_static;
use regex::Regex;

/// Street designators accepted after a street name
const STREET_SUFFIXES: &str = "street|st|avenue|ave|av|road|rd|drive|dr|lane|ln|boulevard|blvd|way|wy|court|ct|circle|cir|parkway|pkwy|highway|hwy|place|pl|plaza|plz|square|sq|terrace|ter|trail|trl|freeway|fwy|expressway|expy|loop|run|row|path|pike|alley|aly|crossing|xing|point|pt|cove|cv";

/// Secondary unit designators
const UNIT_DESIGNATORS: &str = "apt|apartment|unit|suite|ste|rm|room|fl|floor|bldg|building|dept|lot";

/// State codes as a regex alternation
const STATES: &str = "AL|AK|AZ|AR|CA|CO|CT|DE|DC|FL|GA|HI|ID|IL|IN|IA|KS|KY|LA|ME|MD|MA|MI|MN|MS|MO|MT|NE|NV|NH|NJ|NM|NY|NC|ND|OH|OK|OR|PA|RI|SC|SD|TN|TX|UT|VT|VA|WA|WV|WI|WY|PR|GU|VI|AS|MP";

const SEP: &str = r"(?:\s*,\s*|\s+)";

fn street() -> String {
    format!(
        r"(?P<street>\d{{1,6}}[A-Z]?(?:[ ]+(?:N|S|E|W|NE|NW|SE|SW|North|South|East|West)\.?)?(?:[ ]+[A-Z0-9][A-Z0-9'.\-]*){{1,4}}?[ ]+(?:{suffixes})\b\.?)",
        suffixes = STREET_SUFFIXES
    )
}

fn unit() -> String {
    format!(
        r"(?:[ ]*,?[ ]*(?P<unit>(?:(?:{units})\b\.?|#)[ ]*#?[ ]*[A-Z0-9][A-Z0-9\-]*))?",
        units = UNIT_DESIGNATORS
    )
}

fn city(max_words: usize) -> String {
    format!(
        r"(?P<city>[A-Z][A-Z'.\-]*(?:[ ]+[A-Z][A-Z'.\-]*){{0,{extra}}}?)",
        extra = max_words - 1
    )
}

fn state() -> String {
    format!(r"(?P<state>{states})\b\.?", states = STATES)
}

const ZIP: &str = r"(?P<zip>\d{5}(?:-\d{4})?)\b";

/// Shape of an address catalog entry
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AddressShape {
    /// Street, city, state and ZIP all present
    Complete,
    /// Street only; a city/state/ZIP tail may follow nearby
    StreetOnly,
    /// City, state and ZIP without a street
    TailOnly,
}

/// An address pattern in the catalog
pub struct AddressPattern {
    /// Stable identifier
    pub id: &'static str,
    /// What the pattern captures
    pub shape: AddressShape,
    /// Expression with named groups `street`, `unit`, `city`, `state`, `zip`
    pub regex: Regex,
}

/// A name pattern in the catalog
pub struct NamePattern {
    /// Stable identifier
    pub id: &'static str,
    /// Only usable when the match ends right before an address
    pub adjacent_only: bool,
    /// Expression with a named group `name`
    pub regex: Regex,
}

fn address(id: &'static str, shape: AddressShape, expr: String) -> AddressPattern {
    AddressPattern {
        id,
        shape,
        regex: Regex::new(&format!("(?i){}", expr)).unwrap(),
    }
}

fn name(id: &'static str, adjacent_only: bool, expr: &str) -> NamePattern {
    NamePattern {
        id,
        adjacent_only,
        regex: Regex::new(expr).unwrap(),
    }
}

lazy_static! {
    /// Address group, most specific first
    pub static ref ADDRESS_PATTERNS: Vec<AddressPattern> = vec![
        address(
            "street-city-state-zip",
            AddressShape::Complete,
            format!(r"\b{}{}{SEP}{}{SEP}{}{SEP}?{ZIP}", street(), unit(), city(4), state()),
        ),
        address(
            "po-box-city-state-zip",
            AddressShape::Complete,
            format!(
                r"\b(?P<street>P\.?[ ]*O\.?[ ]*Box[ ]+#?[ ]*\d+){SEP}{}{SEP}{}{SEP}?{ZIP}",
                city(4),
                state()
            ),
        ),
        address(
            "street-zip-city-state",
            AddressShape::Complete,
            format!(r"\b{}{}{SEP}{ZIP}{SEP}{}{SEP}{}", street(), unit(), city(3), state()),
        ),
        address("street-only", AddressShape::StreetOnly, format!(r"\b{}{}", street(), unit())),
        address(
            "city-state-zip",
            AddressShape::TailOnly,
            format!(r"\b{}{SEP}{}{SEP}?{ZIP}", city(2), state()),
        ),
    ];

    /// Tail used to complete a street-only match
    pub static ref CITY_STATE_ZIP_TAIL: Regex = Regex::new(&format!(
        r"(?i)\A{SEP}?{}{SEP}{}{SEP}?{ZIP}",
        city(3),
        state()
    ))
    .unwrap();

    /// Name group, most specific first
    pub static ref NAME_PATTERNS: Vec<NamePattern> = vec![
        name(
            "labelled",
            false,
            r"(?i)\b(?:ship[ ]*to|deliver[ ]*to|recipient|attn|attention)\b\.?[ ]*[:,\-]?\s*(?P<name>[A-Z][A-Z'\-]+(?:[ ]+[A-Z]\.?)?(?:[ ]+[A-Z][A-Z'\-]+){1,2})\b",
        ),
        name(
            "capitalized",
            false,
            r"\b(?P<name>[A-Z][a-z]*(?:['\-]?[A-Z][a-z]+)*(?:[ ]+[A-Z]\.)?(?:[ ]+[A-Z][a-z]*(?:['\-]?[A-Z][a-z]+)*){1,2})\b",
        ),
        name(
            "lowercase",
            true,
            r"(?P<name>\b[a-z][a-z'\-]+(?:[ ]+[a-z]\.?)?[ ]+[a-z][a-z'\-]+)[ ]*[,\n]?\s*\z",
        ),
        name(
            "uppercase",
            true,
            r"(?P<name>\b[A-Z][A-Z'\-]+(?:[ ]+[A-Z]\.?)?[ ]+[A-Z][A-Z'\-]+)[ ]*[,\n]?\s*\z",
        ),
    ];

    /// Markers opening a sender section
    pub static ref SENDER_MARKERS: Regex = Regex::new(
        r"(?im)\b(?:from|sender|shipper|return[ ]+to|ship[ ]+from|returns?[ ]+address)\b"
    ).unwrap();

    /// Markers opening a recipient section
    pub static ref RECIPIENT_MARKERS: Regex = Regex::new(
        r"(?im)(?:\bship[ ]*to\b|\bdeliver[ ]*to\b|\brecipient\b|\battn\b|\battention\b|^to\b)"
    ).unwrap();
}

#[cfg(test)]
mod tests {
    use super::*;

    fn address_by_id(id: &str) -> &'static AddressPattern {
        ADDRESS_PATTERNS.iter().find(|p| p.id == id).unwrap()
    }

    fn name_by_id(id: &str) -> &'static NamePattern {
        NAME_PATTERNS.iter().find(|p| p.id == id).unwrap()
    }

    #[test]
    fn test_catalog_ids_are_unique_and_ordered() {
        let ids: Vec<_> = ADDRESS_PATTERNS.iter().map(|p| p.id).collect();
        assert_eq!(
            ids,
            vec![
                "street-city-state-zip",
                "po-box-city-state-zip",
                "street-zip-city-state",
                "street-only",
                "city-state-zip"
            ]
        );
        let names: Vec<_> = NAME_PATTERNS.iter().map(|p| p.id).collect();
        assert_eq!(names, vec!["labelled", "capitalized", "lowercase", "uppercase"]);
    }

    #[test]
    fn test_full_address_groups() {
        let caps = address_by_id("street-city-state-zip")
            .regex
            .captures("ship to, john smith, 123 main st, anytown ca 12345, tracking")
            .unwrap();
        assert_eq!(&caps["street"], "123 main st");
        assert_eq!(&caps["city"], "anytown");
        assert_eq!(&caps["state"], "ca");
        assert_eq!(&caps["zip"], "12345");
        assert!(caps.name("unit").is_none());
    }

    #[test]
    fn test_full_address_with_unit_and_multiword_city() {
        let caps = address_by_id("street-city-state-zip")
            .regex
            .captures("4500 N Lamar Blvd Apt 12B\nSan Marcos, TX 78666-1234")
            .unwrap();
        assert_eq!(&caps["street"], "4500 N Lamar Blvd");
        assert_eq!(&caps["unit"], "Apt 12B");
        assert_eq!(&caps["city"], "San Marcos");
        assert_eq!(&caps["zip"], "78666-1234");
    }

    #[test]
    fn test_unit_keyword_needs_word_boundary() {
        let caps = address_by_id("street-city-state-zip")
            .regex
            .captures("12 Oak St, Florence AL 35630")
            .unwrap();
        assert!(caps.name("unit").is_none());
        assert_eq!(&caps["city"], "Florence");
    }

    #[test]
    fn test_po_box() {
        let caps = address_by_id("po-box-city-state-zip")
            .regex
            .captures("PO Box 42, Reno, NV 89501")
            .unwrap();
        assert_eq!(&caps["street"], "PO Box 42");
        assert_eq!(&caps["city"], "Reno");
    }

    #[test]
    fn test_street_zip_city_state() {
        let caps = address_by_id("street-zip-city-state")
            .regex
            .captures("77 Pine Rd 30301 Atlanta GA")
            .unwrap();
        assert_eq!(&caps["zip"], "30301");
        assert_eq!(&caps["city"], "Atlanta");
        assert_eq!(&caps["state"], "GA");
    }

    #[test]
    fn test_tail_completes_street() {
        let caps = CITY_STATE_ZIP_TAIL.captures(", Springfield IL 62704").unwrap();
        assert_eq!(&caps["city"], "Springfield");
        assert!(CITY_STATE_ZIP_TAIL.captures("tracking 1Z999").is_none());
    }

    #[test]
    fn test_labelled_name() {
        let caps = name_by_id("labelled")
            .regex
            .captures("SHIP TO: Jane Q. Public\n9 Elm Rd")
            .unwrap();
        assert_eq!(&caps["name"], "Jane Q. Public");
    }

    #[test]
    fn test_capitalized_name() {
        let caps = name_by_id("capitalized")
            .regex
            .captures("deliver soon Mary O'Neil-Smith 9 Elm Rd")
            .unwrap();
        assert_eq!(&caps["name"], "Mary O'Neil-Smith");
    }

    #[test]
    fn test_adjacent_lowercase_name() {
        let caps = name_by_id("lowercase").regex.captures("leave at door john smith, ").unwrap();
        assert_eq!(&caps["name"], "john smith");
    }

    #[test]
    fn test_section_markers() {
        assert!(SENDER_MARKERS.is_match("Return to: Acme"));
        assert!(RECIPIENT_MARKERS.is_match("TO: Jane"));
        assert!(RECIPIENT_MARKERS.is_match("Ship To Jane"));
        assert!(!RECIPIENT_MARKERS.is_match("return to Acme"));
    }
}
