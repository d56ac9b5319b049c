//! Prompt construction for model extraction

/// Builds the extraction prompt for one label
pub struct PromptBuilder<'a> {
    text: &'a str,
    prefix_chars: usize,
}

impl<'a> PromptBuilder<'a> {
    /// Create a new prompt builder
    pub fn new(text: &'a str, prefix_chars: usize) -> Self {
        Self { text, prefix_chars }
    }

    /// Build the complete extraction prompt
    pub fn build(&self) -> String {
        let excerpt = truncate_chars(self.text, self.prefix_chars);

        let mut prompt = String::with_capacity(EXTRACTION_INSTRUCTIONS.len() + excerpt.len() + 128);
        prompt.push_str(EXTRACTION_INSTRUCTIONS);
        prompt.push_str("\n\nOCR text:\n");
        prompt.push_str(excerpt);
        prompt.push_str("\n\n");
        prompt.push_str(OUTPUT_FORMAT_REMINDER);
        prompt
    }
}

/// Longest prefix of `text` holding at most `max_chars` characters
pub fn truncate_chars(text: &str, max_chars: usize) -> &str {
    match text.char_indices().nth(max_chars) {
        Some((byte_index, _)) => &text[..byte_index],
        None => text,
    }
}

const EXTRACTION_INSTRUCTIONS: &str = r#"Extract recipient info from shipping label OCR.

Need, for every recipient on the label:
1. Full name (first + last) of the person receiving the package
2. Complete address (street, unit, city, state, ZIP)
3. Tracking number (if any)

Ignore the sender / return address, carrier names and service levels."#;

const OUTPUT_FORMAT_REMINDER: &str = r#"Return JSON only:
{"pairs": [{"name": "", "address": "", "tracking_number": ""}]}"#;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_prompt_contains_text() {
        let prompt = PromptBuilder::new("ship to john smith", 300).build();
        assert!(prompt.contains("ship to john smith"));
        assert!(prompt.contains("\"tracking_number\""));
    }

    #[test]
    fn test_prompt_truncates_prefix() {
        let text = "a".repeat(500);
        let prompt = PromptBuilder::new(&text, 300).build();
        assert!(prompt.contains(&"a".repeat(300)));
        assert!(!prompt.contains(&"a".repeat(301)));
    }

    #[test]
    fn test_truncate_respects_char_boundaries() {
        assert_eq!(truncate_chars("héllo", 2), "hé");
        assert_eq!(truncate_chars("日本語", 5), "日本語");
        assert_eq!(truncate_chars("abc", 0), "");
    }
}
