//! tsubuyaki: tagged tokenization of noisy Japanese social-media text
//!
//! Turns a post into an ordered sequence of `[text, tag]` tokens. Structured
//! entities (emoji, mentions, hashtags, URLs, parenthetical interjections and
//! kaomoji) are recognized and cut out first; the remaining text goes through
//! morphological analysis, and configured keywords that the analyzer split
//! apart are merged back into single tokens.
//!
//! # Features
//!
//! - Kaomoji recognition with heuristic splitting of run-together faces
//! - Freeform text and platform posts with pre-extracted entities
//! - Japanese morphological analysis with Lindera (IPADIC)
//! - Keyword re-merging and retweet/reply feature extraction
//!
//! # Modules
//!
//! - `token`: Tagged and morphological token types
//! - `patterns`: Compiled recognizers and character classes
//! - `extract`: Entity extraction passes and kaomoji splitting
//! - `tokenizer`: Morphological analysis and keyword merging
//! - `loader`: Line and JSONL input loading
//! - `pipeline`: Orchestration, outcomes and post features
//! - `config`: Configuration file and environment handling

pub mod config;
pub mod error;
pub mod extract;
pub mod loader;
pub mod patterns;
pub mod pipeline;
pub mod token;
pub mod tokenizer;

// Re-export commonly used types
pub use error::{Result, TokenizeError};
pub use pipeline::{InputSource, Pipeline, PipelineOptions, PostFeatures, TokenizeOutcome};
pub use token::{TagKind, TaggedToken};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Library name
pub const NAME: &str = env!("CARGO_PKG_NAME");
