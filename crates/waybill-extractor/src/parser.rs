//! Parse model output into raw pair candidates
//!
//! Strict JSON parsing is tried first. When it fails (truncated output,
//! prose around the JSON, missing quotes) a recovery scan looks for
//! `name`/`address`/`tracking` fields and carrier tracking numbers in the
//! raw text.

use lazy_static::lazy_static;
use regex::Regex;
use serde_json::{Map, Value};
use tracing::debug;

use crate::error::ExtractionFailure;
use crate::patterns::ADDRESS_PATTERNS;
use crate::tracking::{canonicalize, TRACKING_PATTERNS};

/// A pair as the model reported it, before validation
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RawCandidate {
    /// Reported name
    pub name: Option<String>,
    /// Reported address
    pub address: Option<String>,
    /// Reported tracking number, unvalidated
    pub tracking: Option<String>,
    /// Reported confidence, clamped to [0, 1]
    pub confidence: Option<f64>,
}

impl RawCandidate {
    fn is_blank(&self) -> bool {
        self.name.is_none() && self.address.is_none() && self.tracking.is_none()
    }
}

const NAME_KEYS: &[&str] = &["name", "input_name", "recipient_name", "full_name", "recipient"];
const ADDRESS_KEYS: &[&str] = &["address", "input_address", "recipient_address", "full_address"];
const TRACKING_KEYS: &[&str] = &["tracking_number", "tracking", "tracking_id"];
const LIST_KEYS: &[&str] = &["pairs", "results", "recipients"];

lazy_static! {
    static ref NAME_FIELD: Regex = Regex::new(
        r#"(?im)"?\b(?:recipient_name|full_name|input_name|name)"?\s*[:=]\s*"?(?P<value>[^"\n{}\[\],]+(?:,[^"\n{}\[\]]+)?)"#
    ).unwrap();

    static ref ADDRESS_FIELD: Regex = Regex::new(
        r#"(?im)"?\b(?:recipient_address|full_address|input_address|address)"?\s*[:=]\s*"?(?P<value>[^"\n{}\[\]]+)"#
    ).unwrap();

    static ref TRACKING_FIELD: Regex = Regex::new(
        r#"(?im)"?\b(?:tracking_number|tracking_id|tracking)"?\s*[:=]\s*"?(?P<value>[^"\n{}\[\],]+)"#
    ).unwrap();
}

/// Parse a model response into raw candidates
///
/// Blank candidates (no field present) are dropped. Returns
/// `MalformedOutput` when neither strict parsing nor the recovery scan
/// finds anything.
pub fn parse_model_response(response: &str) -> Result<Vec<RawCandidate>, ExtractionFailure> {
    let json_str = extract_json(response);

    match serde_json::from_str::<Value>(json_str) {
        Ok(value) => Ok(candidates_from_value(&value)),
        Err(e) => {
            debug!("Strict parse failed ({}), scanning raw response", e);
            let recovered = recover_candidates(response);
            if recovered.is_empty() {
                Err(ExtractionFailure::MalformedOutput(e.to_string()))
            } else {
                Ok(recovered)
            }
        }
    }
}

/// Extract JSON from response, handling markdown code fences
fn extract_json(response: &str) -> &str {
    let trimmed = response.trim();
    let Some(fence) = trimmed.find("```") else {
        return trimmed;
    };

    let after = &trimmed[fence + 3..];
    // Skip the language tag on the opening fence line
    let body_start = after.find('\n').map_or(0, |i| i + 1);
    let body = &after[body_start..];
    match body.find("```") {
        Some(end) => body[..end].trim(),
        None => body.trim(),
    }
}

fn candidates_from_value(value: &Value) -> Vec<RawCandidate> {
    let items: Vec<&Value> = match value {
        Value::Array(items) => items.iter().collect(),
        Value::Object(map) => {
            let listed = LIST_KEYS
                .iter()
                .find_map(|key| map.get(*key).and_then(Value::as_array))
                .or_else(|| {
                    if has_any_key(map, NAME_KEYS) || has_any_key(map, ADDRESS_KEYS) {
                        None
                    } else {
                        map.values().find_map(Value::as_array)
                    }
                });
            match listed {
                Some(items) => items.iter().collect(),
                None => vec![value],
            }
        }
        _ => Vec::new(),
    };

    items
        .into_iter()
        .filter_map(Value::as_object)
        .map(candidate_from_object)
        .filter(|c| !c.is_blank())
        .collect()
}

fn has_any_key(map: &Map<String, Value>, keys: &[&str]) -> bool {
    keys.iter().any(|k| map.contains_key(*k))
}

fn candidate_from_object(map: &Map<String, Value>) -> RawCandidate {
    RawCandidate {
        name: first_text(map, NAME_KEYS),
        address: first_text(map, ADDRESS_KEYS),
        tracking: first_text(map, TRACKING_KEYS),
        confidence: map
            .get("confidence")
            .and_then(Value::as_f64)
            .filter(|c| c.is_finite())
            .map(|c| c.clamp(0.0, 1.0)),
    }
}

/// First present, non-empty text among `keys`
fn first_text(map: &Map<String, Value>, keys: &[&str]) -> Option<String> {
    keys.iter().find_map(|key| map.get(*key).and_then(value_text))
}

fn value_text(value: &Value) -> Option<String> {
    let text = match value {
        Value::String(s) => s.clone(),
        Value::Number(n) => n.to_string(),
        Value::Array(parts) => parts
            .iter()
            .filter_map(value_text)
            .collect::<Vec<_>>()
            .join(", "),
        _ => return None,
    };
    clean_field(&text)
}

/// Collapse whitespace and treat null-ish strings as absent
fn clean_field(text: &str) -> Option<String> {
    let collapsed = text.split_whitespace().collect::<Vec<_>>().join(" ");
    let trimmed = collapsed.trim_matches(|c: char| c == ',' || c == ';' || c.is_whitespace());
    match trimmed.to_ascii_lowercase().as_str() {
        "" | "null" | "none" | "n/a" | "na" | "unknown" => None,
        _ => Some(trimmed.to_string()),
    }
}

/// Best-effort scan of a response that is not valid JSON
fn recover_candidates(response: &str) -> Vec<RawCandidate> {
    let names: Vec<String> = field_values(&NAME_FIELD, response);
    let mut addresses: Vec<String> = field_values(&ADDRESS_FIELD, response);
    let mut tracking: Vec<String> = field_values(&TRACKING_FIELD, response);

    if addresses.is_empty() {
        addresses = ADDRESS_PATTERNS
            .iter()
            .filter(|p| p.id == "street-city-state-zip" || p.id == "po-box-city-state-zip")
            .flat_map(|p| p.regex.find_iter(response).map(|m| m.as_str().to_string()))
            .collect();
    }
    if tracking.is_empty() {
        tracking = TRACKING_PATTERNS
            .iter()
            .flat_map(|p| p.regex.find_iter(response).map(|m| canonicalize(m.as_str())))
            .fold(Vec::new(), |mut acc, t| {
                if !acc.contains(&t) {
                    acc.push(t);
                }
                acc
            });
    }

    let count = names.len().max(addresses.len());
    (0..count)
        .map(|i| RawCandidate {
            name: names.get(i).cloned(),
            address: addresses.get(i).cloned(),
            tracking: tracking.get(i).cloned(),
            confidence: None,
        })
        .filter(|c| !c.is_blank())
        .collect()
}

fn field_values(regex: &Regex, text: &str) -> Vec<String> {
    regex
        .captures_iter(text)
        .filter_map(|caps| caps.name("value").and_then(|m| clean_field(m.as_str())))
        .collect()
}
