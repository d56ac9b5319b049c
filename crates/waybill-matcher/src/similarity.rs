//! String similarity scorers
//!
//! All scores are on a 0-100 scale. The base [`ratio`] is a normalized
//! Levenshtein similarity; the token variants compare word sets so that
//! reordered or partial names still score well.

use std::collections::{BTreeSet, HashMap};

use lazy_static::lazy_static;

lazy_static! {
    /// Long forms folded to the abbreviation used on labels
    static ref ADDRESS_ABBREVIATIONS: HashMap<&'static str, &'static str> = [
        ("street", "st"),
        ("avenue", "ave"),
        ("av", "ave"),
        ("road", "rd"),
        ("drive", "dr"),
        ("boulevard", "blvd"),
        ("lane", "ln"),
        ("court", "ct"),
        ("circle", "cir"),
        ("place", "pl"),
        ("terrace", "ter"),
        ("parkway", "pkwy"),
        ("highway", "hwy"),
        ("square", "sq"),
        ("trail", "trl"),
        ("north", "n"),
        ("south", "s"),
        ("east", "e"),
        ("west", "w"),
        ("northeast", "ne"),
        ("northwest", "nw"),
        ("southeast", "se"),
        ("southwest", "sw"),
        ("apartment", "apt"),
        ("suite", "ste"),
        ("building", "bldg"),
        ("floor", "fl"),
        ("room", "rm"),
    ]
    .into_iter()
    .collect();
}

/// Similarity of two strings as a percentage
pub fn ratio(a: &str, b: &str) -> f64 {
    if a.is_empty() && b.is_empty() {
        return 100.0;
    }
    strsim::normalized_levenshtein(a, b) * 100.0
}

/// Lowercase word tokens, split on anything that is not alphanumeric
pub fn tokens(text: &str) -> Vec<String> {
    text.split(|c: char| !c.is_alphanumeric())
        .filter(|t| !t.is_empty())
        .map(str::to_lowercase)
        .collect()
}

/// Ratio after sorting the tokens of both sides
pub fn token_sort_ratio(a: &str, b: &str) -> f64 {
    let mut left = tokens(a);
    let mut right = tokens(b);
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }
    left.sort();
    right.sort();
    ratio(&left.join(" "), &right.join(" "))
}

/// Ratio over token sets
///
/// The shared tokens are compared against each side's full token set, so one
/// side being a subset of the other scores 100.
pub fn token_set_ratio(a: &str, b: &str) -> f64 {
    let left: BTreeSet<String> = tokens(a).into_iter().collect();
    let right: BTreeSet<String> = tokens(b).into_iter().collect();
    if left.is_empty() || right.is_empty() {
        return 0.0;
    }

    let shared: Vec<&str> = left.intersection(&right).map(String::as_str).collect();
    let only_left: Vec<&str> = left.difference(&right).map(String::as_str).collect();
    let only_right: Vec<&str> = right.difference(&left).map(String::as_str).collect();

    if !shared.is_empty() && (only_left.is_empty() || only_right.is_empty()) {
        return 100.0;
    }

    let shared_text = shared.join(" ");
    let with = |rest: &[&str]| {
        if shared.is_empty() {
            rest.join(" ")
        } else {
            format!("{} {}", shared_text, rest.join(" "))
        }
    };
    let left_text = with(&only_left);
    let right_text = with(&only_right);

    let mut best = ratio(&left_text, &right_text);
    if !shared.is_empty() {
        best = best
            .max(ratio(&shared_text, &left_text))
            .max(ratio(&shared_text, &right_text));
    }
    best
}

/// Lowercase an address, drop punctuation and fold common long forms
///
/// ```
/// use waybill_matcher::normalize_address;
///
/// assert_eq!(
///     normalize_address("4500 North Lamar Boulevard, Apartment #12B"),
///     "4500 n lamar blvd apt 12b"
/// );
/// ```
pub fn normalize_address(address: &str) -> String {
    tokens(address)
        .into_iter()
        .map(|token| match ADDRESS_ABBREVIATIONS.get(token.as_str()) {
            Some(short) => (*short).to_string(),
            None => token,
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Name similarity: token-set ratio, tolerant of order swaps and partial names
pub fn name_similarity(extracted: &str, candidate: &str) -> f64 {
    token_set_ratio(extracted, candidate)
}

/// Address similarity: token-sort ratio over normalized addresses
pub fn address_similarity(extracted: &str, candidate: &str) -> f64 {
    token_sort_ratio(&normalize_address(extracted), &normalize_address(candidate))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_ratio_identical() {
        assert_eq!(ratio("john smith", "john smith"), 100.0);
        assert_eq!(ratio("", ""), 100.0);
    }

    #[test]
    fn test_ratio_disjoint() {
        assert_eq!(ratio("abc", "xyz"), 0.0);
    }

    #[test]
    fn test_tokens_split_punctuation() {
        assert_eq!(tokens("Smith, John-Paul"), vec!["smith", "john", "paul"]);
        assert!(tokens(" ,. ").is_empty());
    }

    #[test]
    fn test_token_sort_ignores_order() {
        assert_eq!(token_sort_ratio("Main St 123", "123 main st"), 100.0);
    }

    #[test]
    fn test_token_set_order_swap() {
        assert_eq!(token_set_ratio("Smith, John", "John Smith"), 100.0);
    }

    #[test]
    fn test_token_set_partial_name() {
        assert_eq!(token_set_ratio("Smith", "John Smith"), 100.0);
    }

    #[test]
    fn test_token_set_no_shared_tokens() {
        // one substitution per token over eight characters
        assert_eq!(token_set_ratio("Jon Lees", "Jan Leer"), 75.0);
    }

    #[test]
    fn test_token_set_uses_best_comparison() {
        let score = token_set_ratio("John Smith", "John Smyth");
        assert!((score - 90.0).abs() < 1e-9, "score {}", score);
    }

    #[test]
    fn test_empty_inputs_score_zero() {
        assert_eq!(token_set_ratio("", "John Smith"), 0.0);
        assert_eq!(token_sort_ratio("123 Main St", ""), 0.0);
    }

    #[test]
    fn test_normalize_address() {
        assert_eq!(normalize_address("123 Main Street, Anytown, CA 12345"), "123 main st anytown ca 12345");
        assert_eq!(normalize_address("1 West Avenue"), "1 w ave");
    }

    #[test]
    fn test_address_similarity_folds_abbreviations() {
        assert_eq!(
            address_similarity("123 Main St, Anytown CA 12345", "123 MAIN STREET, ANYTOWN, CA, 12345"),
            100.0
        );
    }

    #[test]
    fn test_address_similarity_distinguishes_numbers() {
        let near = address_similarity("123 Main St, Anytown CA 12345", "125 Main St, Anytown CA 12345");
        let far = address_similarity("123 Main St, Anytown CA 12345", "9 Elm Rd, Dover DE 19901");
        assert!(near > 75.0, "near {}", near);
        assert!(far < near);
    }
}
