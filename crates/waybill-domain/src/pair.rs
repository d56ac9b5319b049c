//! Extracted pair module - the unit produced by both extractors

use std::fmt;

/// Which extractor produced a pair
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SourceMode {
    /// Remote language-model extraction
    Model,

    /// Deterministic pattern-catalog extraction
    Rule,
}

impl SourceMode {
    /// Get the mode name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceMode::Model => "MODEL",
            SourceMode::Rule => "RULE",
        }
    }

    /// Parse a mode from a string (case-insensitive)
    pub fn parse(s: &str) -> Option<Self> {
        match s.to_ascii_uppercase().as_str() {
            "MODEL" => Some(SourceMode::Model),
            "RULE" => Some(SourceMode::Rule),
            _ => None,
        }
    }
}

impl fmt::Display for SourceMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for SourceMode {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::parse(s).ok_or_else(|| format!("Invalid source mode: {}", s))
    }
}

/// Carrier that issued a tracking number
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Carrier {
    /// United Parcel Service (1Z-prefixed)
    Ups,

    /// United States Postal Service (20-22 digits, or S10 international)
    Usps,

    /// FedEx (12 or 15 digits)
    Fedex,
}

impl Carrier {
    /// Get the carrier name as a string
    pub fn as_str(&self) -> &'static str {
        match self {
            Carrier::Ups => "UPS",
            Carrier::Usps => "USPS",
            Carrier::Fedex => "FedEx",
        }
    }
}

impl fmt::Display for Carrier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A carrier tracking number in canonical form (no spaces, upper-case)
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct TrackingNumber {
    /// Canonical value
    pub value: String,

    /// Carrier whose format the value matched
    pub carrier: Carrier,
}

impl TrackingNumber {
    /// Create a tracking number
    ///
    /// Format recognition happens in the extractor; this constructor only
    /// canonicalizes spacing and case.
    pub fn new(value: &str, carrier: Carrier) -> Self {
        Self {
            value: value
                .chars()
                .filter(|c| !c.is_whitespace())
                .collect::<String>()
                .to_ascii_uppercase(),
            carrier,
        }
    }

    /// Borrow the canonical value
    pub fn as_str(&self) -> &str {
        &self.value
    }
}

impl fmt::Display for TrackingNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.value)
    }
}

/// A (name, address, tracking number) tuple extracted from one label
///
/// A single label may yield several pairs (multi-package shipments). Pairs
/// leaving the extraction coordinator always have a non-empty name and
/// address; see [`ExtractedPair::is_complete`].
#[derive(Debug, Clone, PartialEq)]
pub struct ExtractedPair {
    /// Recipient name
    pub name: String,

    /// Recipient address
    pub address: String,

    /// Tracking number, if one was found and recognized
    pub tracking_number: Option<TrackingNumber>,

    /// Extractor that produced the pair
    pub source_mode: SourceMode,

    /// Confidence reported by the extractor, if any (0.0-1.0)
    pub raw_confidence: Option<f64>,
}

impl ExtractedPair {
    /// Create a pair without tracking number or confidence
    pub fn new(name: impl Into<String>, address: impl Into<String>, source_mode: SourceMode) -> Self {
        Self {
            name: name.into(),
            address: address.into(),
            tracking_number: None,
            source_mode,
            raw_confidence: None,
        }
    }

    /// Attach a tracking number
    pub fn with_tracking(mut self, tracking: TrackingNumber) -> Self {
        self.tracking_number = Some(tracking);
        self
    }

    /// Attach an extractor confidence, clamped to [0, 1]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.raw_confidence = Some(confidence.clamp(0.0, 1.0));
        self
    }

    /// Whether both name and address are non-blank
    pub fn is_complete(&self) -> bool {
        !self.name.trim().is_empty() && !self.address.trim().is_empty()
    }
}
