//! Keyword re-merging
//!
//! The analyzer knows nothing about the keywords a collection was built
//! around, so `東京タワー` may come back as `東京` + `タワー`. For each
//! configured keyword, in order, the merger scans the token sequence and
//! replaces every run of adjacent tokens whose surfaces concatenate to the
//! keyword with a single keyword token.
//!
//! Each keyword pass builds a new sequence from the previous one with a
//! cursor, so later keywords see the runs earlier keywords already claimed.

use crate::token::{MorphToken, TagKind, TaggedToken};
use serde::{Deserialize, Serialize};

/// Ordered, de-duplicated keyword list
///
/// Matching is exact: no case folding or width normalization.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct KeywordSpec {
    keywords: Vec<String>,
}

impl KeywordSpec {
    /// Build from keywords, dropping empties and repeats, keeping first-seen order
    pub fn new<I, S>(keywords: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let mut unique: Vec<String> = Vec::new();
        for keyword in keywords {
            let keyword = keyword.into();
            if !keyword.is_empty() && !unique.contains(&keyword) {
                unique.push(keyword);
            }
        }
        Self { keywords: unique }
    }

    /// Whether no keywords are configured
    pub fn is_empty(&self) -> bool {
        self.keywords.is_empty()
    }

    /// Number of keywords
    pub fn len(&self) -> usize {
        self.keywords.len()
    }

    /// Keywords in configuration order
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.keywords.iter().map(String::as_str)
    }

    /// Each keyword once per non-overlapping occurrence in `text`
    pub fn find_in(&self, text: &str) -> Vec<String> {
        self.keywords
            .iter()
            .flat_map(|k| std::iter::repeat(k.clone()).take(text.matches(k.as_str()).count()))
            .collect()
    }
}

/// A token after keyword merging
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MergedToken {
    /// A configured keyword, from one or more analyzer tokens
    Keyword(String),
    /// An analyzer token left as is
    Morph(MorphToken),
}

impl MergedToken {
    /// Surface text used for matching
    pub fn surface(&self) -> &str {
        match self {
            MergedToken::Keyword(keyword) => keyword,
            MergedToken::Morph(token) => &token.surface,
        }
    }

    /// Convert into an output token
    pub fn into_tagged(self, use_lemma: bool) -> TaggedToken {
        match self {
            MergedToken::Keyword(keyword) => TaggedToken::new(keyword, TagKind::ProjectKeyword),
            MergedToken::Morph(token) => token.into_tagged(use_lemma),
        }
    }
}

/// Reassembles keyword phrases split across analyzer tokens
#[derive(Debug, Clone, Copy)]
pub struct KeywordMerger<'a> {
    spec: &'a KeywordSpec,
}

impl<'a> KeywordMerger<'a> {
    pub fn new(spec: &'a KeywordSpec) -> Self {
        Self { spec }
    }

    /// Merge keyword runs, earlier keywords claiming tokens first
    pub fn merge(&self, tokens: Vec<MorphToken>) -> Vec<MergedToken> {
        let mut merged: Vec<MergedToken> = tokens.into_iter().map(MergedToken::Morph).collect();
        for keyword in self.spec.iter() {
            merged = merge_keyword(merged, keyword);
        }
        merged
    }
}

fn merge_keyword(tokens: Vec<MergedToken>, keyword: &str) -> Vec<MergedToken> {
    let mut out = Vec::with_capacity(tokens.len());
    let mut cursor = 0;

    while cursor < tokens.len() {
        match run_end(&tokens, cursor, keyword) {
            Some(end) => {
                if end - cursor > 1 {
                    tracing::debug!(keyword, tokens = end - cursor, "Merged keyword");
                }
                out.push(MergedToken::Keyword(keyword.to_string()));
                cursor = end;
            }
            None => {
                out.push(tokens[cursor].clone());
                cursor += 1;
            }
        }
    }

    out
}

/// End (exclusive) of the run starting at `start` that spells `keyword`
///
/// Each token must be a prefix of what is left of the keyword; the run ends
/// as soon as nothing is left, and fails at the first token that does not fit.
fn run_end(tokens: &[MergedToken], start: usize, keyword: &str) -> Option<usize> {
    let mut rest = keyword;
    for (i, token) in tokens.iter().enumerate().skip(start) {
        let surface = token.surface();
        if surface.is_empty() {
            return None;
        }
        rest = rest.strip_prefix(surface)?;
        if rest.is_empty() {
            return Some(i + 1);
        }
    }
    None
}
