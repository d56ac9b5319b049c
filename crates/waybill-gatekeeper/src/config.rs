//! Gatekeeper configuration

use serde::{Deserialize, Serialize};

use crate::GatekeeperError;

/// Configuration for validation rules
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ValidationConfig {
    /// Reject names containing carrier and shipping vocabulary
    pub reject_shipping_terms: bool,

    /// Reject names containing company suffixes (LLC, Inc, Corp)
    pub reject_company_suffixes: bool,

    /// Reject names containing place-name indicators and street vocabulary
    pub reject_place_names: bool,

    /// Reject names containing digits
    pub reject_digits_in_name: bool,

    /// Minimum number of letters in a name
    pub min_name_length: usize,

    /// Require at least two name tokens (first and last)
    pub require_full_name: bool,

    /// Require the address to have a street number or a state/ZIP tail
    pub require_address_shape: bool,
}

impl Default for ValidationConfig {
    fn default() -> Self {
        Self {
            reject_shipping_terms: true,
            reject_company_suffixes: true,
            reject_place_names: true,
            reject_digits_in_name: true,
            min_name_length: 3,
            require_full_name: true,
            require_address_shape: true,
        }
    }
}

impl ValidationConfig {
    /// Create a permissive configuration (only blank fields are rejected)
    pub fn permissive() -> Self {
        Self {
            reject_shipping_terms: false,
            reject_company_suffixes: false,
            reject_place_names: false,
            reject_digits_in_name: false,
            min_name_length: 1,
            require_full_name: false,
            require_address_shape: false,
        }
    }

    /// Create a strict configuration (all checks enabled, longer names)
    pub fn strict() -> Self {
        Self {
            min_name_length: 5,
            ..Self::default()
        }
    }

    /// Validate the configuration
    pub fn validate(&self) -> Result<(), GatekeeperError> {
        if self.min_name_length == 0 {
            return Err(GatekeeperError::Config(
                "min_name_length must be at least 1".to_string(),
            ));
        }
        Ok(())
    }
}
