//! Carrier tracking-number formats
//!
//! Two views of the same catalog: [`TRACKING_PATTERNS`] finds tracking
//! numbers in running text, [`recognize`] checks a standalone value such as
//! one returned by the model.

use lazy_static::lazy_static;
use regex::Regex;
use waybill_domain::{Carrier, TrackingNumber};

/// A tracking-number pattern in the search catalog
pub struct TrackingPattern {
    /// Stable identifier
    pub id: &'static str,
    /// Carrier the format belongs to
    pub carrier: Carrier,
    /// Search expression
    pub regex: Regex,
}

fn pattern(id: &'static str, carrier: Carrier, expr: &str) -> TrackingPattern {
    TrackingPattern {
        id,
        carrier,
        regex: Regex::new(expr).unwrap(),
    }
}

lazy_static! {
    /// Search catalog, most specific first
    pub static ref TRACKING_PATTERNS: Vec<TrackingPattern> = vec![
        pattern("ups-1z", Carrier::Ups, r"(?i)\b1Z[0-9A-Z]{16}\b"),
        pattern("ups-1z-spaced", Carrier::Ups, r"(?i)\b1Z(?: ?[0-9A-Z]){16}\b"),
        pattern("usps-s10", Carrier::Usps, r"(?i)\b[A-Z]{2}\d{9}US\b"),
        pattern("usps-impb-22", Carrier::Usps, r"\b9[2-5]\d{20}\b"),
        pattern("usps-20-22", Carrier::Usps, r"\b\d{20,22}\b"),
        pattern("usps-grouped", Carrier::Usps, r"\b9[2-5]\d{2}(?: \d{4}){4} \d{2}\b"),
        pattern("fedex-15", Carrier::Fedex, r"\b\d{15}\b"),
        pattern("fedex-12", Carrier::Fedex, r"\b\d{12}\b"),
        pattern("fedex-grouped", Carrier::Fedex, r"\b\d{4} \d{4} \d{4}\b"),
    ];

    static ref UPS_VALUE: Regex = Regex::new(r"^1Z[0-9A-Z]{16}$").unwrap();
    static ref USPS_S10_VALUE: Regex = Regex::new(r"^[A-Z]{2}\d{9}US$").unwrap();
    static ref USPS_VALUE: Regex = Regex::new(r"^\d{20,22}$").unwrap();
    static ref FEDEX_VALUE: Regex = Regex::new(r"^(?:\d{12}|\d{15})$").unwrap();
}

/// Canonical form: separators removed, upper-case
pub fn canonicalize(value: &str) -> String {
    value
        .chars()
        .filter(|c| c.is_ascii_alphanumeric())
        .collect::<String>()
        .to_ascii_uppercase()
}

/// Recognize a standalone tracking value
///
/// Returns `None` when the value matches no carrier format.
pub fn recognize(value: &str) -> Option<TrackingNumber> {
    let canonical = canonicalize(value);
    let carrier = if UPS_VALUE.is_match(&canonical) {
        Carrier::Ups
    } else if USPS_S10_VALUE.is_match(&canonical) || USPS_VALUE.is_match(&canonical) {
        Carrier::Usps
    } else if FEDEX_VALUE.is_match(&canonical) {
        Carrier::Fedex
    } else {
        return None;
    };
    Some(TrackingNumber::new(&canonical, carrier))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn first_match(text: &str) -> Option<(&'static str, String)> {
        TRACKING_PATTERNS.iter().find_map(|p| {
            p.regex
                .find(text)
                .map(|m| (p.id, canonicalize(m.as_str())))
        })
    }

    #[test]
    fn test_recognize_ups() {
        let tracking = recognize("1z999aa10123456784").unwrap();
        assert_eq!(tracking.carrier, Carrier::Ups);
        assert_eq!(tracking.as_str(), "1Z999AA10123456784");
    }

    #[test]
    fn test_recognize_usps_and_fedex() {
        assert_eq!(recognize("9400 1000 0000 0000 0000 00").unwrap().carrier, Carrier::Usps);
        assert_eq!(recognize("EA123456789US").unwrap().carrier, Carrier::Usps);
        assert_eq!(recognize("1234 5678 9012").unwrap().carrier, Carrier::Fedex);
        assert_eq!(recognize("123456789012345").unwrap().carrier, Carrier::Fedex);
    }

    #[test]
    fn test_recognize_rejects_other_values() {
        assert!(recognize("").is_none());
        assert!(recognize("12345").is_none());
        assert!(recognize("1Z999").is_none());
        assert!(recognize("N/A").is_none());
    }

    #[test]
    fn test_catalog_order_prefers_specific() {
        assert_eq!(
            first_match("trk 9400100000000000000000 ok"),
            Some(("usps-impb-22", "9400100000000000000000".to_string()))
        );
        assert_eq!(
            first_match("1Z 999 AA1 01 2345 6784"),
            Some(("ups-1z-spaced", "1Z999AA10123456784".to_string()))
        );
        assert_eq!(first_match("ref 1234 5678 9012").map(|m| m.0), Some("fedex-grouped"));
    }

    #[test]
    fn test_zip_is_not_tracking() {
        assert_eq!(first_match("Anytown CA 12345-6789"), None);
    }
}
