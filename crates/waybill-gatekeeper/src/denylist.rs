//! Non-person tokens that disqualify a name candidate
//!
//! OCR of shipping labels routinely produces capitalized word pairs that look
//! like names but are carrier marks, service levels, company names or pieces
//! of the address. Tokens are compared lower-cased.

use std::collections::HashSet;

use lazy_static::lazy_static;

/// Category a denylisted token belongs to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DenylistCategory {
    /// Carrier names, service levels and label boilerplate
    ShippingTerm,

    /// Company and organisation suffixes
    CompanySuffix,

    /// Place-name indicators and street vocabulary
    PlaceName,
}

impl DenylistCategory {
    /// Short label used in logs
    pub fn as_str(&self) -> &'static str {
        match self {
            DenylistCategory::ShippingTerm => "shipping term",
            DenylistCategory::CompanySuffix => "company suffix",
            DenylistCategory::PlaceName => "place name",
        }
    }
}

const SHIPPING_TERMS: &[&str] = &[
    "ship", "shipping", "shipment", "priority", "mail", "ground", "express", "ups", "fedex",
    "usps", "dhl", "tracking", "postage", "fees", "paid", "sender", "shipper", "bill",
    "billing", "ref", "reference", "lbs", "lb", "weight", "envelope", "signature",
    "package", "parcel", "hold", "location", "following", "special", "instructions",
    "delivery", "deliver", "return", "recipient", "first", "class", "overnight", "standard",
    "saver", "home", "smartpost", "notifii", "cycle", "tba", "postal", "service", "label",
    "paper", "from", "to", "attn", "attention", "zip", "box", "po",
];

const COMPANY_SUFFIXES: &[&str] = &[
    "llc", "inc", "incorporated", "corp", "corporation", "company", "co", "ltd", "limited",
    "group", "holdings", "management", "property", "properties", "partners", "associates",
    "enterprises", "industries", "services", "solutions", "design", "church", "college",
    "university", "school", "apartments", "apartment", "homes", "hospital", "department",
];

const PLACE_NAMES: &[&str] = &[
    "north", "south", "east", "west", "gate", "street", "avenue", "road", "drive", "lane",
    "boulevard", "blvd", "way", "court", "circle", "parkway", "highway", "place", "plaza",
    "suite", "ste", "apt", "unit", "floor", "building", "station", "united", "states",
    "america", "usa", "city", "county", "beach", "fort", "pointe", "new", "york", "san",
    "francisco", "los", "angeles", "chicago", "tampa",
];

lazy_static! {
    static ref SHIPPING_SET: HashSet<&'static str> = SHIPPING_TERMS.iter().copied().collect();
    static ref COMPANY_SET: HashSet<&'static str> = COMPANY_SUFFIXES.iter().copied().collect();
    static ref PLACE_SET: HashSet<&'static str> = PLACE_NAMES.iter().copied().collect();
}

/// Category of a single token, if it is denylisted
pub fn denylist_category(token: &str) -> Option<DenylistCategory> {
    let lower = token.trim_matches(|c: char| !c.is_alphanumeric()).to_lowercase();
    if lower.is_empty() {
        return None;
    }
    if SHIPPING_SET.contains(lower.as_str()) {
        Some(DenylistCategory::ShippingTerm)
    } else if COMPANY_SET.contains(lower.as_str()) {
        Some(DenylistCategory::CompanySuffix)
    } else if PLACE_SET.contains(lower.as_str()) {
        Some(DenylistCategory::PlaceName)
    } else {
        None
    }
}

/// Split a candidate name into word tokens
pub fn name_tokens(name: &str) -> impl Iterator<Item = &str> {
    name.split(|c: char| !(c.is_alphanumeric() || c == '\'' || c == '-'))
        .filter(|t| !t.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_categories() {
        assert_eq!(denylist_category("USPS"), Some(DenylistCategory::ShippingTerm));
        assert_eq!(denylist_category("LLC."), Some(DenylistCategory::CompanySuffix));
        assert_eq!(denylist_category("Avenue"), Some(DenylistCategory::PlaceName));
        assert_eq!(denylist_category("Smith"), None);
        assert_eq!(denylist_category("..."), None);
    }

    #[test]
    fn test_name_tokens() {
        let tokens: Vec<_> = name_tokens("Acme, Inc. O'Brien-Lee").collect();
        assert_eq!(tokens, vec!["Acme", "Inc", "O'Brien-Lee"]);
    }
}
