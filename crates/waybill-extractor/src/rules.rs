//! Deterministic pattern-based extraction
//!
//! Runs the catalog in three passes (tracking numbers, addresses, names), each
//! pass claiming the spans it uses so that a later, looser pattern cannot
//! reuse text an earlier one already parsed. Names and tracking numbers are
//! then attached to addresses by position.

use regex::{Captures, Regex};
use tracing::debug;
use waybill_domain::{ExtractedPair, SourceMode, TrackingNumber};
use waybill_gatekeeper::{denylist_category, Gatekeeper};

use crate::format::{format_name, format_place, format_po_box, AddressParts};
use crate::patterns::{
    AddressShape, ADDRESS_PATTERNS, CITY_STATE_ZIP_TAIL, NAME_PATTERNS, RECIPIENT_MARKERS,
    SENDER_MARKERS,
};
use crate::tracking::{recognize, TRACKING_PATTERNS};
use crate::ExtractorConfig;

/// Byte ranges already consumed by an earlier pattern
#[derive(Debug, Default)]
struct Claims(Vec<(usize, usize)>);

impl Claims {
    /// End of the furthest claim overlapping `start..end`
    fn overlap_end(&self, start: usize, end: usize) -> Option<usize> {
        self.0
            .iter()
            .filter(|(s, e)| *s < end && start < *e)
            .map(|(_, e)| *e)
            .max()
    }

    fn is_free(&self, start: usize, end: usize) -> bool {
        self.overlap_end(start, end).is_none()
    }

    fn claim(&mut self, start: usize, end: usize) {
        self.0.push((start, end));
    }
}

/// A catalog hit with its location
#[derive(Debug, Clone)]
struct Found<T> {
    start: usize,
    end: usize,
    value: T,
    pattern: &'static str,
}

/// Sender and recipient section markers, in text order
struct Sections {
    markers: Vec<(usize, bool)>,
}

impl Sections {
    fn new(text: &str) -> Self {
        let mut markers: Vec<(usize, bool)> = SENDER_MARKERS
            .find_iter(text)
            .map(|m| (m.start(), true))
            .chain(RECIPIENT_MARKERS.find_iter(text).map(|m| (m.start(), false)))
            .collect();
        markers.sort_by_key(|(pos, _)| *pos);
        Self { markers }
    }

    /// Whether the closest marker before `pos` opens a sender section
    fn is_sender(&self, pos: usize) -> bool {
        self.markers
            .iter()
            .rev()
            .find(|(start, _)| *start < pos)
            .is_some_and(|(_, sender)| *sender)
    }
}

/// Iterate unclaimed matches of `regex`, letting `visit` decide where to resume
///
/// `visit` returns the position to resume from; overlapping matches resume
/// after the claim they collide with.
fn scan<'t>(
    regex: &Regex,
    text: &'t str,
    claims: &mut Claims,
    mut visit: impl FnMut(&Captures<'t>, &mut Claims) -> usize,
) {
    let mut pos = 0;
    while pos <= text.len() {
        let Some(caps) = regex.captures_at(text, pos) else {
            break;
        };
        let Some(whole) = caps.get(0) else {
            break;
        };

        let next = match claims.overlap_end(whole.start(), whole.end()) {
            Some(end) => end,
            None => visit(&caps, claims),
        };
        pos = if next > whole.start() {
            next
        } else {
            next_boundary(text, whole.start())
        };
    }
}

fn next_boundary(text: &str, pos: usize) -> usize {
    let mut next = pos + 1;
    while next < text.len() && !text.is_char_boundary(next) {
        next += 1;
    }
    next
}

/// Byte offset where the second word of `text[start..end]` begins
fn second_word(text: &str, start: usize, end: usize) -> usize {
    let slice = &text[start..end];
    match slice.find(char::is_whitespace) {
        Some(ws) => {
            let rest = &slice[ws..];
            start + ws + (rest.len() - rest.trim_start().len())
        }
        None => end,
    }
}

/// Deterministic extractor driven by the pattern catalog
#[derive(Debug, Clone)]
pub struct PatternExtractor {
    gatekeeper: Gatekeeper,
    name_window_chars: usize,
    tracking_window_tokens: usize,
}

impl PatternExtractor {
    /// Create a pattern extractor
    pub fn new(gatekeeper: Gatekeeper, config: &ExtractorConfig) -> Self {
        Self {
            gatekeeper,
            name_window_chars: config.name_window_chars,
            tracking_window_tokens: config.tracking_window_tokens,
        }
    }

    /// Extract pairs from cleaned text
    ///
    /// Never fails; text with nothing recognizable yields an empty list.
    /// Tracking numbers are reported on their own (with blank name and
    /// address) only when the text holds no name or address at all.
    pub fn extract(&self, text: &str) -> Vec<ExtractedPair> {
        let mut claims = Claims::default();
        let sections = Sections::new(text);

        let tracking = find_tracking(text, &mut claims);
        let addresses = find_addresses(text, &mut claims, &sections);
        let names = self.find_names(text, &mut claims, &sections, &addresses);

        debug!(
            tracking = tracking.len(),
            addresses = addresses.len(),
            names = names.len(),
            "Pattern catalog candidates"
        );

        if addresses.is_empty() && names.is_empty() {
            return tracking
                .into_iter()
                .map(|t| ExtractedPair::new("", "", SourceMode::Rule).with_tracking(t.value))
                .collect();
        }

        let pairs = self.associate(text, &names, &addresses, tracking);
        debug!(pairs = pairs.len(), "Pattern extraction complete");
        pairs
    }

    fn find_names(
        &self,
        text: &str,
        claims: &mut Claims,
        sections: &Sections,
        addresses: &[Found<String>],
    ) -> Vec<Found<String>> {
        let mut names = Vec::new();

        for pattern in NAME_PATTERNS.iter() {
            if pattern.adjacent_only {
                for address in addresses {
                    let window_start = floor_boundary(text, address.start.saturating_sub(self.name_window_chars));
                    let prefix = &text[window_start..address.start];
                    let Some(m) = pattern.regex.captures(prefix).and_then(|c| c.name("name")) else {
                        continue;
                    };
                    let (start, end) = (window_start + m.start(), window_start + m.end());
                    if !claims.is_free(start, end) {
                        continue;
                    }
                    if let Some((start, end, name)) = self.accept_name(text, start, end) {
                        claims.claim(start, end);
                        if !sections.is_sender(start) {
                            names.push(Found { start, end, value: name, pattern: pattern.id });
                        }
                    }
                }
                continue;
            }

            scan(&pattern.regex, text, claims, |caps, claims| {
                let Some(m) = caps.name("name") else {
                    return caps.get(0).map_or(text.len(), |w| w.end());
                };
                match self.accept_name(text, m.start(), m.end()) {
                    Some((start, end, name)) => {
                        claims.claim(start, end);
                        if sections.is_sender(start) {
                            debug!(pattern = pattern.id, "Skipping name in sender section");
                        } else {
                            names.push(Found { start, end, value: name, pattern: pattern.id });
                        }
                        end
                    }
                    None => second_word(text, m.start(), m.end()),
                }
            });
        }

        names.sort_by_key(|n| n.start);
        names
    }

    /// Validate a name candidate, trimming denylisted edge tokens if needed
    fn accept_name(&self, text: &str, start: usize, end: usize) -> Option<(usize, usize, String)> {
        let raw = &text[start..end];
        if self.gatekeeper.accepts_name(raw) {
            return Some((start, end, format_name(raw)));
        }

        let words: Vec<(usize, &str)> = raw
            .split_whitespace()
            .map(|w| (w.as_ptr() as usize - raw.as_ptr() as usize, w))
            .collect();
        let first = words.iter().position(|(_, w)| denylist_category(w).is_none())?;
        let last = words.iter().rposition(|(_, w)| denylist_category(w).is_none())?;
        if first == 0 && last == words.len() - 1 {
            return None;
        }

        let trimmed_start = start + words[first].0;
        let trimmed_end = start + words[last].0 + words[last].1.len();
        let trimmed = &text[trimmed_start..trimmed_end];
        self.gatekeeper
            .accepts_name(trimmed)
            .then(|| (trimmed_start, trimmed_end, format_name(trimmed)))
    }

    fn associate(
        &self,
        text: &str,
        names: &[Found<String>],
        addresses: &[Found<String>],
        tracking: Vec<Found<TrackingNumber>>,
    ) -> Vec<ExtractedPair> {
        let mut name_used = vec![false; names.len()];
        let mut tracking_used = vec![false; tracking.len()];
        let mut pairs = Vec::new();

        for address in addresses {
            let before = names
                .iter()
                .enumerate()
                .filter(|(i, n)| {
                    !name_used[*i] && n.end <= address.start && address.start - n.end <= self.name_window_chars
                })
                .max_by_key(|(_, n)| n.end);
            let after = || {
                names
                    .iter()
                    .enumerate()
                    .filter(|(i, n)| {
                        !name_used[*i] && n.start >= address.end && n.start - address.end <= self.name_window_chars
                    })
                    .min_by_key(|(_, n)| n.start)
            };
            let Some((index, name)) = before.or_else(after) else {
                debug!(pattern = address.pattern, "Address without a nearby name");
                continue;
            };
            name_used[index] = true;

            let span = (name.start.min(address.start), name.end.max(address.end));
            let mut pair = ExtractedPair::new(name.value.clone(), address.value.clone(), SourceMode::Rule);

            let nearest = tracking
                .iter()
                .enumerate()
                .filter(|(i, _)| !tracking_used[*i])
                .filter_map(|(i, t)| {
                    let gap = if t.start >= span.1 {
                        &text[span.1..t.start]
                    } else if t.end <= span.0 {
                        &text[t.end..span.0]
                    } else {
                        return None;
                    };
                    let tokens = gap.split_whitespace().count();
                    (tokens <= self.tracking_window_tokens).then_some((i, tokens, t.start < span.0))
                })
                // Prefer the closest; on equal distance prefer the one after the pair
                .min_by_key(|(_, tokens, before)| (*tokens, *before));

            if let Some((i, _, _)) = nearest {
                tracking_used[i] = true;
                pair = pair.with_tracking(tracking[i].value.clone());
            }

            debug!(name_pattern = name.pattern, address_pattern = address.pattern, "Paired name and address");
            pairs.push(pair);
        }

        pairs
    }
}

fn floor_boundary(text: &str, mut pos: usize) -> usize {
    while pos > 0 && !text.is_char_boundary(pos) {
        pos -= 1;
    }
    pos
}

fn find_tracking(text: &str, claims: &mut Claims) -> Vec<Found<TrackingNumber>> {
    let mut found = Vec::new();
    for pattern in TRACKING_PATTERNS.iter() {
        scan(&pattern.regex, text, claims, |caps, claims| {
            let Some(m) = caps.get(0) else {
                return text.len();
            };
            if let Some(value) = recognize(m.as_str()) {
                claims.claim(m.start(), m.end());
                found.push(Found {
                    start: m.start(),
                    end: m.end(),
                    value: TrackingNumber::new(value.as_str(), pattern.carrier),
                    pattern: pattern.id,
                });
            }
            m.end()
        });
    }
    found.sort_by_key(|t| t.start);
    found
}

fn find_addresses(text: &str, claims: &mut Claims, sections: &Sections) -> Vec<Found<String>> {
    let mut found = Vec::new();

    for pattern in ADDRESS_PATTERNS.iter() {
        scan(&pattern.regex, text, claims, |caps, claims| {
            let Some(whole) = caps.get(0) else {
                return text.len();
            };
            let mut end = whole.end();
            let mut parts = parts_from(caps, pattern.id == "po-box-city-state-zip");

            if pattern.shape == AddressShape::StreetOnly {
                if let Some(tail) = CITY_STATE_ZIP_TAIL.captures(&text[end..]) {
                    let tail_end = end + tail.get(0).map_or(0, |m| m.end());
                    if claims.is_free(end, tail_end) {
                        let tail_parts = parts_from(&tail, false);
                        parts.city = tail_parts.city;
                        parts.state = tail_parts.state;
                        parts.zip = tail_parts.zip;
                        end = tail_end;
                    }
                }
            }

            claims.claim(whole.start(), end);
            if sections.is_sender(whole.start()) {
                debug!(pattern = pattern.id, "Skipping address in sender section");
            } else {
                found.push(Found {
                    start: whole.start(),
                    end,
                    value: parts.render(),
                    pattern: pattern.id,
                });
            }
            end
        });
    }

    found.sort_by_key(|a| a.start);
    found
}

fn parts_from(caps: &Captures<'_>, po_box: bool) -> AddressParts {
    let group = |name: &str| caps.name(name).map(|m| m.as_str());
    AddressParts {
        street: group("street").map(|s| if po_box { format_po_box(s) } else { format_place(s) }),
        unit: group("unit").map(format_place),
        city: group("city").map(format_place),
        state: group("state").map(|s| s.to_ascii_uppercase()),
        zip: group("zip").map(str::to_string),
    }
}
