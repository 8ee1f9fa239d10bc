//! Japanese tokenizer module
//!
//! Morphological analysis sits behind the `MorphAnalyzer` trait; the default
//! implementation uses Lindera with the IPADIC dictionary. Keyword phrases the
//! analyzer splits apart are stitched back together by `KeywordMerger`.

mod japanese;
pub mod keywords;

pub use japanese::{DictionarySource, LinderaAnalyzer};
pub use keywords::{KeywordMerger, KeywordSpec, MergedToken};

use crate::error::Result;
use crate::token::MorphToken;

/// Surface form of the retweet marker
pub const RT_SURFACE: &str = "RT";

/// Part of speech assigned to the retweet marker
pub const RT_MARKER_POS: &str = "RT_MARKER";

/// IPADIC part of speech for punctuation and symbols
pub const SYMBOL_POS: &str = "記号";

/// Segments plain text into (surface, lemma, part of speech) triples
pub trait MorphAnalyzer {
    /// Analyze `text`, returning tokens in order
    fn analyze(&self, text: &str) -> Result<Vec<MorphToken>>;
}

impl<A: MorphAnalyzer + ?Sized> MorphAnalyzer for &A {
    fn analyze(&self, text: &str) -> Result<Vec<MorphToken>> {
        (**self).analyze(text)
    }
}

impl<A: MorphAnalyzer + ?Sized> MorphAnalyzer for Box<A> {
    fn analyze(&self, text: &str) -> Result<Vec<MorphToken>> {
        (**self).analyze(text)
    }
}

/// Normalize raw analyzer output
///
/// Drops whitespace-only tokens, tags a literal `RT` as the retweet marker,
/// and with `filter_symbols` drops punctuation and symbols.
pub fn prepare_tokens(tokens: Vec<MorphToken>, filter_symbols: bool) -> Vec<MorphToken> {
    tokens
        .into_iter()
        .filter(|t| !t.surface.trim().is_empty())
        .filter_map(|t| {
            if t.surface == RT_SURFACE {
                Some(MorphToken::new(RT_SURFACE, RT_SURFACE, RT_MARKER_POS))
            } else if filter_symbols && t.pos == SYMBOL_POS {
                None
            } else {
                Some(t)
            }
        })
        .collect()
}
