//! Emoji pattern source
//!
//! The emoji recognizer is built from a text resource holding one regular
//! expression alternation, possibly wrapped over several lines.

use crate::error::{Result, TokenizeError};
use std::path::Path;

/// Bundled emoji alternation
const BUNDLED_PATTERN: &str = include_str!("../../resources/emoji_pattern.txt");

/// Source text of the emoji recognizer
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EmojiPatternSource {
    pattern: String,
}

impl Default for EmojiPatternSource {
    fn default() -> Self {
        Self::bundled()
    }
}

impl EmojiPatternSource {
    /// Pattern shipped with the crate
    ///
    /// Covers keycaps, flag pairs, pictographs with skin-tone modifiers, and
    /// ZWJ sequences of those. Symbols that render as text by default (★ ♪ ©)
    /// only count when followed by VS16, since they often sit inside kaomoji.
    pub fn bundled() -> Self {
        Self::parse(BUNDLED_PATTERN)
    }

    /// Parse a pattern resource, concatenating its lines
    pub fn parse(content: &str) -> Self {
        let pattern = content
            .lines()
            .map(str::trim)
            .filter(|line| !line.is_empty())
            .collect::<String>();
        Self { pattern }
    }

    /// Load a pattern resource from disk
    pub fn from_file(path: &Path) -> Result<Self> {
        let content = std::fs::read_to_string(path).map_err(|e| {
            TokenizeError::Io(format!(
                "Failed to read emoji pattern file {}: {}",
                path.display(),
                e
            ))
        })?;
        let source = Self::parse(&content);
        if source.pattern.is_empty() {
            return Err(TokenizeError::Pattern(format!(
                "Emoji pattern file {} is empty",
                path.display()
            )));
        }
        Ok(source)
    }

    /// The concatenated regular expression
    pub fn as_str(&self) -> &str {
        &self.pattern
    }
}
