//! Recipient directory entries

/// A known recipient from the reference directory
///
/// Loaded once before a batch starts and shared read-only across all labels.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DirectoryEntry {
    /// Identifier from the directory file, if the file provides one
    pub recipient_id: Option<String>,

    /// Canonical full name
    pub full_name: String,

    /// Full address string (street, unit, city, state, ZIP)
    pub address: String,

    /// Alternative spellings of the name (preferred names, "Last, First")
    pub aliases: Vec<String>,
}

impl DirectoryEntry {
    /// Create an entry with no id and no aliases
    pub fn new(full_name: impl Into<String>, address: impl Into<String>) -> Self {
        Self {
            recipient_id: None,
            full_name: full_name.into(),
            address: address.into(),
            aliases: Vec::new(),
        }
    }

    /// Set the recipient id
    pub fn with_id(mut self, id: impl Into<String>) -> Self {
        self.recipient_id = Some(id.into());
        self
    }

    /// Add an alias, ignoring blanks and duplicates of the full name
    pub fn with_alias(mut self, alias: impl Into<String>) -> Self {
        let alias = alias.into();
        let trimmed = alias.trim();
        if !trimmed.is_empty()
            && !trimmed.eq_ignore_ascii_case(&self.full_name)
            && !self.aliases.iter().any(|a| a.eq_ignore_ascii_case(trimmed))
        {
            self.aliases.push(trimmed.to_string());
        }
        self
    }

    /// Full name followed by every alias
    pub fn names(&self) -> impl Iterator<Item = &str> {
        std::iter::once(self.full_name.as_str()).chain(self.aliases.iter().map(String::as_str))
    }
}
