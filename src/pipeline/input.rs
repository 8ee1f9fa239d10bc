//! Pipeline inputs and outputs

use crate::error::Result;
use crate::loader::StructuredPost;
use crate::token::TaggedToken;
use serde::{Serialize, Serializer};

/// Sentinel emitted for text without any kana or kanji
pub const NON_JAPANESE: &str = "NON_JAPANESE";

/// One item to tokenize
#[derive(Debug, Clone, PartialEq)]
pub enum InputSource {
    /// Plain text; every entity is found by pattern
    Text(String),
    /// Platform post with pre-extracted entities
    Post(StructuredPost),
}

impl InputSource {
    pub fn text(text: impl Into<String>) -> Self {
        InputSource::Text(text.into())
    }

    pub fn post(post: StructuredPost) -> Self {
        InputSource::Post(post)
    }

    /// Interpret a JSON value as a structured post
    pub fn from_json_value(value: serde_json::Value) -> Result<Self> {
        StructuredPost::from_value(value).map(InputSource::Post)
    }

    /// The text as written by the user
    pub fn raw_text(&self) -> &str {
        match self {
            InputSource::Text(text) => text,
            InputSource::Post(post) => &post.text,
        }
    }
}

impl From<&str> for InputSource {
    fn from(text: &str) -> Self {
        InputSource::text(text)
    }
}

impl From<String> for InputSource {
    fn from(text: String) -> Self {
        InputSource::Text(text)
    }
}

impl From<StructuredPost> for InputSource {
    fn from(post: StructuredPost) -> Self {
        InputSource::Post(post)
    }
}

/// Result of tokenizing one item
///
/// Serializes as the `NON_JAPANESE` string or as an array of
/// `[text, tag]` pairs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TokenizeOutcome {
    /// The script gate rejected the input
    NonJapanese,
    /// Entities in encounter order, then analyzer tokens
    Tokens(Vec<TaggedToken>),
}

impl TokenizeOutcome {
    /// Tokens, unless the input was rejected
    pub fn tokens(&self) -> Option<&[TaggedToken]> {
        match self {
            TokenizeOutcome::NonJapanese => None,
            TokenizeOutcome::Tokens(tokens) => Some(tokens),
        }
    }

    pub fn is_non_japanese(&self) -> bool {
        matches!(self, TokenizeOutcome::NonJapanese)
    }
}

impl Serialize for TokenizeOutcome {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            TokenizeOutcome::NonJapanese => serializer.serialize_str(NON_JAPANESE),
            TokenizeOutcome::Tokens(tokens) => tokens.serialize(serializer),
        }
    }
}
