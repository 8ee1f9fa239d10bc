//! Japanese morphological analyzer using Lindera
//!
//! Reports every token with its surface form, base form and top-level part
//! of speech. Filtering is left to the pipeline.

use super::MorphAnalyzer;
use crate::error::{Result, TokenizeError};
use crate::token::MorphToken;
use anyhow::Context;
use lindera::{
    dictionary::{load_dictionary, load_embedded_dictionary, DictionaryKind},
    mode::Mode,
    segmenter::Segmenter,
    tokenizer::Tokenizer as LinderaTokenizer,
};
use std::path::PathBuf;

/// IPADIC detail index of the base form
const BASE_FORM_INDEX: usize = 6;

/// Which dictionary backs the analyzer
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum DictionarySource {
    /// IPADIC compiled into the binary
    #[default]
    EmbeddedIpadic,
    /// A compiled Lindera dictionary on disk, e.g. an IPADIC NEologd build
    Path(PathBuf),
}

impl DictionarySource {
    /// Parse a config value: `ipadic`/`default`/empty, or a directory path
    pub fn parse(value: &str) -> Self {
        match value.trim() {
            "" | "ipadic" | "default" => DictionarySource::EmbeddedIpadic,
            path => DictionarySource::Path(PathBuf::from(path)),
        }
    }
}

/// Japanese morphological analyzer using Lindera
pub struct LinderaAnalyzer {
    /// Lindera tokenizer instance
    tokenizer: LinderaTokenizer,
}

impl LinderaAnalyzer {
    /// Create an analyzer with the embedded IPADIC dictionary
    pub fn new() -> anyhow::Result<Self> {
        Self::with_dictionary(&DictionarySource::EmbeddedIpadic)
    }

    /// Create an analyzer with the given dictionary
    pub fn with_dictionary(source: &DictionarySource) -> anyhow::Result<Self> {
        let dictionary = match source {
            DictionarySource::EmbeddedIpadic => load_embedded_dictionary(DictionaryKind::IPADIC)?,
            DictionarySource::Path(path) => {
                let uri = path.to_string_lossy();
                load_dictionary(&uri)
                    .with_context(|| format!("Failed to load dictionary {}", path.display()))?
            }
        };

        let segmenter = Segmenter::new(Mode::Normal, dictionary, None);
        let tokenizer = LinderaTokenizer::new(segmenter);
        tracing::info!(dictionary = ?source, "Morphological analyzer ready");

        Ok(Self { tokenizer })
    }
}

impl MorphAnalyzer for LinderaAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<MorphToken>> {
        if text.trim().is_empty() {
            return Ok(Vec::new());
        }

        let mut tokens = self
            .tokenizer
            .tokenize(text)
            .map_err(|e| TokenizeError::Analysis(e.to_string()))?;
        let mut result = Vec::with_capacity(tokens.len());

        for token in tokens.iter_mut() {
            let surface = token.surface.to_string();
            let details = token.details();

            let pos = details.first().copied().unwrap_or("UNK").to_string();
            let lemma = match details.get(BASE_FORM_INDEX) {
                Some(base) if !base.is_empty() && *base != "*" => base.to_string(),
                _ => surface.clone(),
            };

            result.push(MorphToken {
                surface,
                lemma,
                pos,
            });
        }

        Ok(result)
    }
}
