//! Splitting raw message text into a keyword and its argument.

use crate::intent::Intent;

/// A message split into its first word and the rest.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Command {
    /// First word, lower-cased.
    pub keyword: String,
    /// Remaining words joined by single spaces.
    pub argument: String,
    /// The whole message, trimmed.
    pub text: String,
}

impl Command {
    pub fn parse(raw: &str) -> Self {
        let text = raw.trim().to_string();
        let mut words = text.split_whitespace();
        let keyword = words.next().unwrap_or_default().to_lowercase();
        let argument = words.collect::<Vec<_>>().join(" ");
        Self {
            keyword,
            argument,
            text,
        }
    }

    /// Resolve to an intent and the argument its handler receives.
    ///
    /// An unknown keyword makes the whole message a free-text search; an
    /// empty message asks for help.
    pub fn resolve(&self) -> (Intent, &str) {
        match Intent::from_keyword(&self.keyword) {
            Some(intent) => (intent, self.argument.as_str()),
            None if !self.text.is_empty() => (Intent::FreeTextSearch, self.text.as_str()),
            None => (Intent::Help, ""),
        }
    }
}
