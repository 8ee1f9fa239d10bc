//! Token data structures
//!
//! Defines the tagged tokens produced by the pipeline and the morphological
//! tokens consumed from the analyzer.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Tag attached to every output token
///
/// The structured-pattern tags are a closed set. Part-of-speech tags come
/// from the analyzer and are carried through opaquely.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TagKind {
    /// Literal `RT` retweet marker
    RtMarker,
    /// Emoji code point or sequence
    Emoji,
    /// `@name` mention
    Username,
    /// `#name` hashtag
    Hashtag,
    /// URL
    Url,
    /// Single character in parentheses, e.g. `(笑)`
    ParenInterjection,
    /// Text emoticon
    Kaomoji,
    /// Configured keyword, possibly merged from several analyzer tokens
    ProjectKeyword,
    /// Part of speech reported by the analyzer
    PartOfSpeech(String),
}

impl TagKind {
    /// Wire name of the tag
    pub fn as_str(&self) -> &str {
        match self {
            TagKind::RtMarker => "RT_MARKER",
            TagKind::Emoji => "EMOJI",
            TagKind::Username => "USERNAME",
            TagKind::Hashtag => "HASHTAG",
            TagKind::Url => "URL",
            TagKind::ParenInterjection => "PAREN_INTERJECTION",
            TagKind::Kaomoji => "KAOMOJI",
            TagKind::ProjectKeyword => "PROJECT_KEYWORD",
            TagKind::PartOfSpeech(pos) => pos,
        }
    }

    /// Whether this tag came from one of the structured-pattern recognizers
    pub fn is_entity(&self) -> bool {
        matches!(
            self,
            TagKind::Emoji
                | TagKind::Username
                | TagKind::Hashtag
                | TagKind::Url
                | TagKind::ParenInterjection
                | TagKind::Kaomoji
        )
    }
}

impl From<String> for TagKind {
    fn from(value: String) -> Self {
        match value.as_str() {
            "RT_MARKER" => TagKind::RtMarker,
            "EMOJI" => TagKind::Emoji,
            "USERNAME" => TagKind::Username,
            "HASHTAG" => TagKind::Hashtag,
            "URL" => TagKind::Url,
            // Older output files used the Japanese reading for this tag
            "PAREN_INTERJECTION" | "KANDOUJI" => TagKind::ParenInterjection,
            "KAOMOJI" => TagKind::Kaomoji,
            "PROJECT_KEYWORD" => TagKind::ProjectKeyword,
            _ => TagKind::PartOfSpeech(value),
        }
    }
}

impl From<&str> for TagKind {
    fn from(value: &str) -> Self {
        TagKind::from(value.to_string())
    }
}

impl From<TagKind> for String {
    fn from(tag: TagKind) -> Self {
        match tag {
            TagKind::PartOfSpeech(pos) => pos,
            other => other.as_str().to_string(),
        }
    }
}

impl fmt::Display for TagKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A token of the final output sequence
///
/// Serialized as a two-element array `[text, tag]`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaggedToken(pub String, pub TagKind);

impl TaggedToken {
    /// Create a new tagged token
    pub fn new(text: impl Into<String>, tag: TagKind) -> Self {
        Self(text.into(), tag)
    }

    /// Token text
    pub fn text(&self) -> &str {
        &self.0
    }

    /// Token tag
    pub fn tag(&self) -> &TagKind {
        &self.1
    }
}

/// A token reported by the morphological analyzer
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MorphToken {
    /// Text as it appears in the input
    pub surface: String,
    /// Dictionary (base) form
    pub lemma: String,
    /// Top-level part of speech
    pub pos: String,
}

impl MorphToken {
    /// Create a new morphological token
    pub fn new(
        surface: impl Into<String>,
        lemma: impl Into<String>,
        pos: impl Into<String>,
    ) -> Self {
        Self {
            surface: surface.into(),
            lemma: lemma.into(),
            pos: pos.into(),
        }
    }

    /// Convert into an output token, choosing surface or lemma text
    pub fn into_tagged(self, use_lemma: bool) -> TaggedToken {
        let text = if use_lemma && !self.lemma.is_empty() {
            self.lemma
        } else {
            self.surface
        };
        TaggedToken(text, TagKind::from(self.pos))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_tag_wire_names() {
        assert_eq!(TagKind::Kaomoji.as_str(), "KAOMOJI");
        assert_eq!(TagKind::RtMarker.to_string(), "RT_MARKER");
        assert_eq!(TagKind::PartOfSpeech("名詞".into()).as_str(), "名詞");
    }

    #[test]
    fn test_tag_from_string() {
        assert_eq!(TagKind::from("HASHTAG"), TagKind::Hashtag);
        assert_eq!(TagKind::from("KANDOUJI"), TagKind::ParenInterjection);
        assert_eq!(
            TagKind::from("動詞"),
            TagKind::PartOfSpeech("動詞".to_string())
        );
    }

    #[test]
    fn test_tagged_token_serialization() {
        let token = TaggedToken::new("#foo", TagKind::Hashtag);
        let json = serde_json::to_string(&token).unwrap();
        assert_eq!(json, r##"["#foo","HASHTAG"]"##);

        let back: TaggedToken = serde_json::from_str(&json).unwrap();
        assert_eq!(back, token);
    }

    #[test]
    fn test_morph_token_lemma_toggle() {
        let token = MorphToken::new("食べ", "食べる", "動詞");
        assert_eq!(token.clone().into_tagged(false).text(), "食べ");
        assert_eq!(token.into_tagged(true).text(), "食べる");
    }

    #[test]
    fn test_rt_marker_pos_maps_to_tag() {
        let token = MorphToken::new("RT", "RT", "RT_MARKER").into_tagged(false);
        assert_eq!(token.tag(), &TagKind::RtMarker);
    }

    #[test]
    fn test_is_entity() {
        assert!(TagKind::Url.is_entity());
        assert!(!TagKind::ProjectKeyword.is_entity());
        assert!(!TagKind::PartOfSpeech("名詞".into()).is_entity());
    }
}
