//! Structural checks for address candidates

use lazy_static::lazy_static;
use regex::Regex;

/// USPS two-letter state, district and territory codes
pub const STATE_CODES: &[&str] = &[
    "AL", "AK", "AZ", "AR", "CA", "CO", "CT", "DE", "DC", "FL", "GA", "HI", "ID", "IL", "IN",
    "IA", "KS", "KY", "LA", "ME", "MD", "MA", "MI", "MN", "MS", "MO", "MT", "NE", "NV", "NH",
    "NJ", "NM", "NY", "NC", "ND", "OH", "OK", "OR", "PA", "RI", "SC", "SD", "TN", "TX", "UT",
    "VT", "VA", "WA", "WV", "WI", "WY", "PR", "GU", "VI", "AS", "MP",
];

lazy_static! {
    // Street number followed by a word that starts with a letter
    static ref STREET_NUMBER_NAME: Regex = Regex::new(
        r"(?i)\b\d+[A-Z]?\s+(?:[NSEW]\.?\s+)?[A-Z][A-Z'\-]+"
    ).unwrap();

    static ref PO_BOX: Regex = Regex::new(
        r"(?i)\bP\.?\s*O\.?\s*Box\s+\d+"
    ).unwrap();

    static ref STATE_ZIP_TAIL: Regex = Regex::new(
        r"(?i)\b([A-Z]{2})\.?,?\s+\d{5}(?:[- ]?\d{4})?\b"
    ).unwrap();
}

/// Whether `code` is a known state code (case-insensitive)
pub fn is_state_code(code: &str) -> bool {
    STATE_CODES.iter().any(|s| s.eq_ignore_ascii_case(code))
}

/// Whether an address has the minimum shape of a deliverable address
///
/// Accepts a street number followed by a street-name token, a PO box, or a
/// recognizable state + ZIP tail.
pub fn has_address_shape(address: &str) -> bool {
    if STREET_NUMBER_NAME.is_match(address) || PO_BOX.is_match(address) {
        return true;
    }
    STATE_ZIP_TAIL
        .captures_iter(address)
        .any(|caps| caps.get(1).is_some_and(|m| is_state_code(m.as_str())))
}
