//! Waybill Gatekeeper
//!
//! Decides whether an extracted (name, address) candidate is plausible enough
//! to leave the extraction stage.
//!
//! The Gatekeeper provides:
//! - Name checks against a denylist of non-person tokens (shipping terms,
//!   company suffixes, place-name indicators, street vocabulary)
//! - Address checks for a minimum structural shape
//!
//! Rejected candidates are dropped, never corrected.
//!
//! # Examples
//!
//! ```
//! use waybill_gatekeeper::{Gatekeeper, ValidationConfig, ValidationStatus};
//!
//! let gatekeeper = Gatekeeper::new(ValidationConfig::default());
//! let result = gatekeeper.validate_fields("USPS", "123 Main St, Anytown CA 12345");
//! assert_eq!(result.status, ValidationStatus::Rejected);
//! ```

#![warn(missing_docs)]

pub mod address;
mod config;
pub mod denylist;
mod error;
mod validator;

pub use address::{has_address_shape, is_state_code, STATE_CODES};
pub use config::ValidationConfig;
pub use denylist::{denylist_category, DenylistCategory};
pub use error::GatekeeperError;
pub use validator::{Gatekeeper, RejectionReason, ValidationResult, ValidationStatus};
