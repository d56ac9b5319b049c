//! Candidate pair validation logic

use waybill_domain::ExtractedPair;

use crate::address::has_address_shape;
use crate::denylist::{denylist_category, name_tokens, DenylistCategory};
use crate::ValidationConfig;

/// Result of candidate validation
#[derive(Debug, Clone)]
pub struct ValidationResult {
    /// Whether the candidate passed validation
    pub status: ValidationStatus,

    /// Rejection reasons (if any)
    pub reasons: Vec<RejectionReason>,
}

impl ValidationResult {
    /// Whether the candidate was accepted
    pub fn is_accepted(&self) -> bool {
        self.status == ValidationStatus::Accepted
    }
}

/// Validation status
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValidationStatus {
    /// Candidate accepted
    Accepted,

    /// Candidate rejected
    Rejected,
}

/// Reasons for rejection
#[derive(Debug, Clone, PartialEq)]
pub enum RejectionReason {
    /// Name is blank
    EmptyName,

    /// Address is blank
    EmptyAddress,

    /// Name contains a non-person token
    DenylistedName {
        /// Offending token as it appeared
        token: String,
        /// Which list it was found on
        category: DenylistCategory,
    },

    /// Name contains digits
    NameHasDigits,

    /// Name is shorter than the configured minimum, or a single token when
    /// a full name is required
    NameTooShort {
        /// Letters in the name
        letters: usize,
        /// Tokens in the name
        tokens: usize,
    },

    /// Address lacks a street number, PO box or state/ZIP tail
    MalformedAddress,
}

impl std::fmt::Display for RejectionReason {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RejectionReason::EmptyName => write!(f, "empty name"),
            RejectionReason::EmptyAddress => write!(f, "empty address"),
            RejectionReason::DenylistedName { token, category } => {
                write!(f, "name token '{}' is a {}", token, category.as_str())
            }
            RejectionReason::NameHasDigits => write!(f, "name contains digits"),
            RejectionReason::NameTooShort { letters, tokens } => {
                write!(f, "name too short ({} letters, {} tokens)", letters, tokens)
            }
            RejectionReason::MalformedAddress => write!(f, "address has no recognizable shape"),
        }
    }
}

/// The Gatekeeper validates candidate pairs before they leave extraction
#[derive(Debug, Clone)]
pub struct Gatekeeper {
    config: ValidationConfig,
}

impl Default for Gatekeeper {
    fn default() -> Self {
        Self::new(ValidationConfig::default())
    }
}

impl Gatekeeper {
    /// Create a new Gatekeeper with the given configuration
    pub fn new(config: ValidationConfig) -> Self {
        Self { config }
    }

    /// Active configuration
    pub fn config(&self) -> &ValidationConfig {
        &self.config
    }

    /// Validate an extracted pair
    pub fn validate(&self, pair: &ExtractedPair) -> ValidationResult {
        self.validate_fields(&pair.name, &pair.address)
    }

    /// Validate a raw (name, address) candidate
    pub fn validate_fields(&self, name: &str, address: &str) -> ValidationResult {
        let mut reasons = Vec::new();

        // 1. Name checks
        if name.trim().is_empty() {
            reasons.push(RejectionReason::EmptyName);
        } else if let Some(reason) = self.check_name(name) {
            reasons.push(reason);
        }

        // 2. Address checks
        if address.trim().is_empty() {
            reasons.push(RejectionReason::EmptyAddress);
        } else if self.config.require_address_shape && !has_address_shape(address) {
            reasons.push(RejectionReason::MalformedAddress);
        }

        let status = if reasons.is_empty() {
            ValidationStatus::Accepted
        } else {
            ValidationStatus::Rejected
        };

        ValidationResult { status, reasons }
    }

    /// Validate just a name, as the pattern extractor does before pairing
    pub fn accepts_name(&self, name: &str) -> bool {
        !name.trim().is_empty() && self.check_name(name).is_none()
    }

    fn check_name(&self, name: &str) -> Option<RejectionReason> {
        if self.config.reject_digits_in_name && name.chars().any(|c| c.is_ascii_digit()) {
            return Some(RejectionReason::NameHasDigits);
        }

        for token in name_tokens(name) {
            let Some(category) = denylist_category(token) else {
                continue;
            };
            let enabled = match category {
                DenylistCategory::ShippingTerm => self.config.reject_shipping_terms,
                DenylistCategory::CompanySuffix => self.config.reject_company_suffixes,
                DenylistCategory::PlaceName => self.config.reject_place_names,
            };
            if enabled {
                return Some(RejectionReason::DenylistedName {
                    token: token.to_string(),
                    category,
                });
            }
        }

        let letters = name.chars().filter(|c| c.is_alphabetic()).count();
        let tokens = name_tokens(name).count();
        if letters < self.config.min_name_length || (self.config.require_full_name && tokens < 2) {
            return Some(RejectionReason::NameTooShort { letters, tokens });
        }

        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use waybill_domain::SourceMode;

    fn gatekeeper() -> Gatekeeper {
        Gatekeeper::default()
    }

    #[test]
    fn test_accepts_plain_pair() {
        let pair = ExtractedPair::new("John Smith", "123 Main St, Anytown CA 12345", SourceMode::Model);
        let result = gatekeeper().validate(&pair);
        assert!(result.is_accepted());
        assert!(result.reasons.is_empty());
    }

    #[test]
    fn test_rejects_carrier_name() {
        let result = gatekeeper().validate_fields("USPS", "123 Main St, Anytown CA 12345");
        assert_eq!(result.status, ValidationStatus::Rejected);
        assert!(matches!(
            result.reasons[0],
            RejectionReason::DenylistedName { category: DenylistCategory::ShippingTerm, .. }
        ));
    }

    #[test]
    fn test_rejects_company() {
        let result = gatekeeper().validate_fields("Acme Widgets LLC", "9 Elm Rd, Reno NV 89501");
        assert!(matches!(
            result.reasons[0],
            RejectionReason::DenylistedName { category: DenylistCategory::CompanySuffix, .. }
        ));
    }

    #[test]
    fn test_rejects_place_name() {
        let result = gatekeeper().validate_fields("North Gate", "9 Elm Rd");
        assert!(!result.is_accepted());
    }

    #[test]
    fn test_rejects_single_token_name() {
        let result = gatekeeper().validate_fields("Madonna", "9 Elm Rd");
        assert_eq!(
            result.reasons,
            vec![RejectionReason::NameTooShort { letters: 7, tokens: 1 }]
        );
    }

    #[test]
    fn test_rejects_digits_in_name() {
        let result = gatekeeper().validate_fields("J0hn Smith", "9 Elm Rd");
        assert_eq!(result.reasons, vec![RejectionReason::NameHasDigits]);
    }

    #[test]
    fn test_rejects_malformed_address_and_empty_name() {
        let result = gatekeeper().validate_fields("", "somewhere nice");
        assert_eq!(
            result.reasons,
            vec![RejectionReason::EmptyName, RejectionReason::MalformedAddress]
        );
    }

    #[test]
    fn test_permissive_only_checks_blanks() {
        let gatekeeper = Gatekeeper::new(ValidationConfig::permissive());
        assert!(gatekeeper.validate_fields("USPS", "anywhere").is_accepted());
        assert!(!gatekeeper.validate_fields("USPS", " ").is_accepted());
    }

    #[test]
    fn test_accepts_name() {
        assert!(gatekeeper().accepts_name("Mary-Jane O'Neil"));
        assert!(!gatekeeper().accepts_name("Priority Mail"));
        assert!(!gatekeeper().accepts_name("  "));
    }

    #[test]
    fn test_reason_display() {
        let reason = RejectionReason::DenylistedName {
            token: "UPS".to_string(),
            category: DenylistCategory::ShippingTerm,
        };
        assert_eq!(reason.to_string(), "name token 'UPS' is a shipping term");
    }
}
