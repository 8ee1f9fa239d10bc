//! Structured-pattern recognizers
//!
//! This module builds every recognizer the extractor needs, once, and keeps
//! them immutable afterwards so a single `PatternLibrary` can be shared by
//! reference across threads.
//!
//! "Text" characters are ASCII alphanumerics plus hiragana, katakana and the
//! common CJK ideograph block. Kaomoji are dense in everything else.

mod emoji;

pub use emoji::EmojiPatternSource;

use crate::error::Result;
use fancy_regex::Regex as FancyRegex;
use regex::Regex;

/// Text character class (ASCII alphanumerics, kana, kanji)
pub const TEXT_CLASS: &str = "[0-9A-Za-zぁ-ヶ一-龠]";

/// Complement of `TEXT_CLASS`
const NON_TEXT_CLASS: &str = "[^0-9A-Za-zぁ-ヶ一-龠]";

/// Text characters that routinely form parts of faces, e.g. the arms in (っ´ω｀)つ
const ALLOW_TEXT_CLASS: &str = "[ovっつ゜ニノ三二]";

const HALF_WIDTH_KANA_CLASS: &str = "[ｦ-ﾟ]";

const OPEN_BRACKET_CLASS: &str = r"[\(∩꒰（]";

const CLOSE_BRACKET_CLASS: &str = r"[\)∩꒱）]";

/// Eyes of a bracketless face: non-ASCII symbols outside the text ranges and
/// common Japanese punctuation
const BARE_EYE_CLASS: &str =
    r"[^\s\x00-\x7Fぁ-ヶ一-龠ｦ-ﾟー〜～。、〇！？「」『』【】（）∩꒰꒱…０-９Ａ-Ｚａ-ｚ]";

/// Mouth of a bracketless face; sentence punctuation never forms one
const BARE_MOUTH_CLASS: &str = r"[^\s0-9A-Za-zぁ-ヶ一-龠ｦ-ﾟ。、，．！？「」『』【】…]";

const PAREN_INTERJECTION_PATTERN: &str = r"[\(（][0-9A-Za-zぁ-ヶ一-龠][\)）]";

const MENTION_PATTERN: &str = r"(?i)@[a-z0-9_]+";

const HASHTAG_PATTERN: &str = r"(?i)#[a-z0-9ぁ-ヶ一-龠_]+";

/// Scheme-optional URL, body excludes kana/kanji and lenticular brackets,
/// nested parentheses balanced one level deep
const URL_PATTERN: &str = r#"(?i)\b(?:https?://|www\d{0,3}[.]|[a-z0-9.\-]+[.][a-z]{2,4}/)(?:[^\s()<>ぁ-ヶ一-龠【】]+|\((?:[^\s()<>ぁ-ヶ一-龠【】]+|\([^\s()<>ぁ-ヶ一-龠【】]+\))*\))+(?:\((?:[^\s()<>ぁ-ヶ一-龠【】]+|\([^\s()<>ぁ-ヶ一-龠【】]+\))*\)|[^\sぁ-ヶ一-龠【】`!()\[\]{};:'".,<>?«»“”‘’])"#;

/// Whether a character belongs to the text class
pub fn is_text_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || is_script_char(c)
}

/// Whether a character is kana or kanji
pub fn is_script_char(c: char) -> bool {
    ('ぁ'..='ヶ').contains(&c) || ('一'..='龠').contains(&c)
}

/// Number of text-class characters in a string
pub fn count_text_chars(text: &str) -> usize {
    text.chars().filter(|c| is_text_char(*c)).count()
}

/// Script-presence test: at least one kana or kanji character
pub fn contains_target_script(text: &str) -> bool {
    text.chars().any(is_script_char)
}

/// Kaomoji pattern body, unanchored
///
/// Bracketed faces follow Kurosaki & Takagi (2015), "Word2Vec を用いた顔文字の
/// 感情分類": surrounding noise, an opening bracket, three or more characters
/// not starting with a run of three text characters, a closing bracket, and
/// more noise. The match is greedy and will swallow adjacent faces.
fn kaomoji_pattern() -> String {
    let around = format!("(?:{}|{})*", NON_TEXT_CLASS, ALLOW_TEXT_CLASS);
    let face = format!("(?!(?:{}|{}){{3,}}).{{3,}}", TEXT_CLASS, HALF_WIDTH_KANA_CLASS);
    let bracketed = format!(
        "{}{}{}{}{}",
        around, OPEN_BRACKET_CLASS, face, CLOSE_BRACKET_CLASS, around
    );
    let bracketless = format!(
        r"({})(?:(?!\1){}){{1,3}}\1",
        BARE_EYE_CLASS, BARE_MOUTH_CLASS
    );
    format!("(?:{}|{})", bracketed, bracketless)
}

/// Compiled recognizers shared by every extraction run
#[derive(Debug)]
pub struct PatternLibrary {
    kaomoji: FancyRegex,
    kaomoji_prefix: FancyRegex,
    paren_interjection: Regex,
    emoji: Regex,
    url: Regex,
    mention: Regex,
    hashtag: Regex,
}

impl PatternLibrary {
    /// Build all recognizers
    pub fn new(emoji: &EmojiPatternSource) -> Result<Self> {
        let kaomoji = kaomoji_pattern();
        let library = Self {
            kaomoji_prefix: FancyRegex::new(&format!("^{}", kaomoji))?,
            kaomoji: FancyRegex::new(&kaomoji)?,
            paren_interjection: Regex::new(PAREN_INTERJECTION_PATTERN)?,
            emoji: Regex::new(emoji.as_str())?,
            url: Regex::new(URL_PATTERN)?,
            mention: Regex::new(MENTION_PATTERN)?,
            hashtag: Regex::new(HASHTAG_PATTERN)?,
        };
        tracing::debug!("Pattern library compiled");
        Ok(library)
    }

    /// Build with the bundled emoji pattern
    pub fn with_bundled_emoji() -> Result<Self> {
        Self::new(&EmojiPatternSource::bundled())
    }

    /// All non-overlapping kaomoji candidates, leftmost first
    ///
    /// A backtracking failure (limit exceeded) ends the scan with whatever was
    /// found so far; the recognizer never fails the item.
    pub fn find_kaomoji(&self, text: &str) -> Vec<String> {
        let mut faces = Vec::new();
        for found in self.kaomoji.find_iter(text) {
            match found {
                Ok(m) => faces.push(m.as_str().to_string()),
                Err(e) => {
                    tracing::warn!("Kaomoji scan stopped early: {}", e);
                    break;
                }
            }
        }
        faces
    }

    /// Kaomoji match anchored at the start of `text`
    pub fn match_kaomoji_prefix(&self, text: &str) -> Option<String> {
        match self.kaomoji_prefix.find(text) {
            Ok(found) => found.map(|m| m.as_str().to_string()),
            Err(e) => {
                tracing::warn!("Kaomoji prefix match failed: {}", e);
                None
            }
        }
    }

    /// Single text character in plain parentheses
    pub fn paren_interjection(&self) -> &Regex {
        &self.paren_interjection
    }

    /// Emoji alternation
    pub fn emoji(&self) -> &Regex {
        &self.emoji
    }

    /// URL recognizer
    pub fn url(&self) -> &Regex {
        &self.url
    }

    /// `@name` mentions
    pub fn mention(&self) -> &Regex {
        &self.mention
    }

    /// `#name` hashtags, kana and kanji allowed
    pub fn hashtag(&self) -> &Regex {
        &self.hashtag
    }

    /// Script-presence test
    pub fn has_target_script(&self, text: &str) -> bool {
        contains_target_script(text)
    }
}
