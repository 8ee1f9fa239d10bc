//! Tokenization pipeline
//!
//! Sequences the components for one input item:
//!
//! 1. Script gate (optional): text without kana or kanji yields `NON_JAPANESE`
//! 2. Entity extraction, freeform or structured
//! 3. Morphological analysis of the residual text
//! 4. Keyword merging
//!
//! The pattern library is built once and shared; everything mutable lives
//! inside a single `tokenize` call, so one pipeline can serve many threads.

mod features;
mod input;

pub use features::PostFeatures;
pub use input::{InputSource, TokenizeOutcome, NON_JAPANESE};

use crate::error::Result;
use crate::extract::{EntityExtractor, DEFAULT_URL_TIMEOUT};
use crate::loader::StructuredPost;
use crate::patterns::PatternLibrary;
use crate::token::{MorphToken, TaggedToken};
use crate::tokenizer::{prepare_tokens, KeywordMerger, KeywordSpec, MorphAnalyzer};
use std::sync::Arc;
use std::time::Duration;

/// Pipeline behaviour switches
#[derive(Debug, Clone)]
pub struct PipelineOptions {
    /// Keywords to re-merge and to filter posts by
    pub keywords: KeywordSpec,
    /// Reject input without kana or kanji
    pub japanese_only: bool,
    /// Budget for the URL pass
    pub url_timeout: Duration,
    /// Emit lemmas instead of surfaces (structured posts only)
    pub output_lemma: bool,
}

impl Default for PipelineOptions {
    fn default() -> Self {
        Self {
            keywords: KeywordSpec::default(),
            japanese_only: true,
            url_timeout: DEFAULT_URL_TIMEOUT,
            output_lemma: false,
        }
    }
}

/// Entity extraction and tagged tokenization for one input at a time
pub struct Pipeline<A> {
    patterns: Arc<PatternLibrary>,
    analyzer: A,
    options: PipelineOptions,
}

impl<A: MorphAnalyzer> Pipeline<A> {
    /// Create a pipeline over shared recognizers
    pub fn new(patterns: Arc<PatternLibrary>, analyzer: A, options: PipelineOptions) -> Self {
        tracing::info!(
            keywords = options.keywords.len(),
            japanese_only = options.japanese_only,
            url_timeout = ?options.url_timeout,
            "Pipeline ready"
        );
        Self {
            patterns,
            analyzer,
            options,
        }
    }

    /// Create a pipeline with the bundled emoji pattern
    pub fn with_bundled_patterns(analyzer: A, options: PipelineOptions) -> Result<Self> {
        let patterns = PatternLibrary::with_bundled_emoji()?;
        Ok(Self::new(Arc::new(patterns), analyzer, options))
    }

    pub fn patterns(&self) -> &Arc<PatternLibrary> {
        &self.patterns
    }

    pub fn options(&self) -> &PipelineOptions {
        &self.options
    }

    /// Tokenize one item
    ///
    /// Fails only for this item: URL timeouts and analyzer failures leave
    /// the pipeline usable for the next one.
    pub fn tokenize(&self, input: &InputSource) -> Result<TokenizeOutcome> {
        match input {
            InputSource::Text(text) => self.tokenize_text(text),
            InputSource::Post(post) => self.tokenize_post(post),
        }
    }

    /// Tokenize plain text
    ///
    /// Symbols are dropped and surfaces are emitted.
    pub fn tokenize_text(&self, text: &str) -> Result<TokenizeOutcome> {
        if !self.passes_script_gate(text) {
            return Ok(TokenizeOutcome::NonJapanese);
        }

        let extraction = self.extractor().extract_freeform(text)?;
        let morphs = prepare_tokens(self.analyzer.analyze(&extraction.remaining)?, true);
        Ok(self.assemble(extraction.entities, morphs, false))
    }

    /// Tokenize a structured post
    ///
    /// Symbols are kept; lemmas replace surfaces when `output_lemma` is set.
    pub fn tokenize_post(&self, post: &StructuredPost) -> Result<TokenizeOutcome> {
        if !self.passes_script_gate(&post.text) {
            return Ok(TokenizeOutcome::NonJapanese);
        }

        let hints = post.entity_hints();
        let extraction = self.extractor().extract_structured(&post.text, &hints)?;
        let morphs = prepare_tokens(self.analyzer.analyze(&extraction.remaining)?, false);
        Ok(self.assemble(extraction.entities, morphs, self.options.output_lemma))
    }

    /// Tokenize many items, one result per item
    pub fn tokenize_batch(&self, inputs: &[InputSource]) -> Vec<Result<TokenizeOutcome>> {
        inputs
            .iter()
            .enumerate()
            .map(|(index, input)| {
                let outcome = self.tokenize(input);
                if let Err(e) = &outcome {
                    tracing::warn!(index, error = %e, "Failed to tokenize item");
                }
                outcome
            })
            .collect()
    }

    /// Each configured keyword once per occurrence in `text`
    pub fn find_keywords(&self, text: &str) -> Vec<String> {
        self.options.keywords.find_in(text)
    }

    /// Retweet/reply flags and the keyword and script filters
    pub fn features(&self, input: &InputSource) -> Result<PostFeatures> {
        let text = input.raw_text();
        let mut features = match input {
            InputSource::Text(text) => PostFeatures::from_text(text),
            InputSource::Post(post) => {
                let rt_account = post.retweeted_account();
                PostFeatures {
                    is_rt: rt_account.is_some(),
                    is_reply: rt_account.is_none() && post.is_reply(),
                    exclude: false,
                    rt_account,
                }
            }
        };

        if !self.options.keywords.is_empty() && self.find_keywords(text).is_empty() {
            features.exclude = true;
        }
        if !self.passes_script_gate(text) {
            features.exclude = true;
        }

        Ok(features)
    }

    fn passes_script_gate(&self, text: &str) -> bool {
        !self.options.japanese_only || self.patterns.has_target_script(text)
    }

    fn extractor(&self) -> EntityExtractor<'_> {
        EntityExtractor::new(&self.patterns).with_url_timeout(self.options.url_timeout)
    }

    fn assemble(
        &self,
        entities: Vec<TaggedToken>,
        morphs: Vec<MorphToken>,
        use_lemma: bool,
    ) -> TokenizeOutcome {
        let merged = KeywordMerger::new(&self.options.keywords).merge(morphs);
        let mut tokens = entities;
        tokens.extend(merged.into_iter().map(|t| t.into_tagged(use_lemma)));
        TokenizeOutcome::Tokens(tokens)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::TokenizeError;
    use crate::token::TagKind;

    /// (surface, lemma, part of speech); no entry is a prefix of another
    const LEXICON: &[(&str, &str, &str)] = &[
        ("東京", "東京", "名詞"),
        ("タワ", "タワ", "名詞"),
        ("ー", "ー", "名詞"),
        ("行っ", "行く", "動詞"),
        ("た", "た", "助動詞"),
        ("綺麗", "綺麗", "名詞"),
        ("bar", "bar", "名詞"),
        ("。", "。", "記号"),
        ("RT", "RT", "名詞"),
    ];

    /// Minimal segmenter for the handful of words used below; anything else
    /// is one token per character
    struct LexiconAnalyzer;

    impl MorphAnalyzer for LexiconAnalyzer {
        fn analyze(&self, text: &str) -> Result<Vec<MorphToken>> {
            let mut tokens = Vec::new();
            let mut rest = text;
            while let Some(c) = rest.chars().next() {
                let token = match LEXICON.iter().find(|(surface, _, _)| rest.starts_with(surface)) {
                    Some(&(surface, lemma, pos)) => MorphToken::new(surface, lemma, pos),
                    None => {
                        let pos = if c.is_whitespace() { "記号" } else { "名詞" };
                        MorphToken::new(c.to_string(), c.to_string(), pos)
                    }
                };
                rest = &rest[token.surface.len()..];
                tokens.push(token);
            }
            Ok(tokens)
        }
    }

    struct FailingAnalyzer;

    impl MorphAnalyzer for FailingAnalyzer {
        fn analyze(&self, _text: &str) -> Result<Vec<MorphToken>> {
            Err(TokenizeError::Analysis("dictionary unavailable".to_string()))
        }
    }

    fn pipeline(options: PipelineOptions) -> Pipeline<LexiconAnalyzer> {
        Pipeline::with_bundled_patterns(LexiconAnalyzer, options).unwrap()
    }

    fn keywords(words: &[&str]) -> PipelineOptions {
        PipelineOptions {
            keywords: KeywordSpec::new(words.iter().copied()),
            ..PipelineOptions::default()
        }
    }

    fn pairs(outcome: &TokenizeOutcome) -> Vec<(String, String)> {
        outcome
            .tokens()
            .unwrap()
            .iter()
            .map(|t| (t.text().to_string(), t.tag().to_string()))
            .collect()
    }

    #[test]
    fn test_non_japanese_sentinel() {
        let pipeline = pipeline(PipelineOptions::default());
        let outcome = pipeline.tokenize(&InputSource::text("hello world :)")).unwrap();
        assert!(outcome.is_non_japanese());
    }

    #[test]
    fn test_script_gate_can_be_disabled() {
        let options = PipelineOptions {
            japanese_only: false,
            ..PipelineOptions::default()
        };
        let outcome = pipeline(options).tokenize_text("#foo bar").unwrap();
        assert_eq!(
            pairs(&outcome),
            vec![
                ("#foo".to_string(), "HASHTAG".to_string()),
                ("bar".to_string(), "名詞".to_string()),
            ]
        );
    }

    #[test]
    fn test_freeform_entities_then_tokens() {
        let pipeline = pipeline(keywords(&["東京タワー"]));
        let outcome = pipeline.tokenize_text("RT @taro: 東京タワー行った(笑)。").unwrap();

        assert_eq!(
            pairs(&outcome),
            vec![
                ("@taro".to_string(), "USERNAME".to_string()),
                ("(笑)".to_string(), "PAREN_INTERJECTION".to_string()),
                ("RT".to_string(), "RT_MARKER".to_string()),
                (":".to_string(), "名詞".to_string()),
                ("東京タワー".to_string(), "PROJECT_KEYWORD".to_string()),
                ("行っ".to_string(), "動詞".to_string()),
                ("た".to_string(), "助動詞".to_string()),
            ]
        );
    }

    #[test]
    fn test_structured_keeps_symbols_and_lemmas() {
        let options = PipelineOptions {
            output_lemma: true,
            ..keywords(&["東京タワー"])
        };
        let post = StructuredPost::from_json(
            r##"{"text": "#夜景 東京タワー行った。", "entities": {"hashtags": [{"text": "夜景"}]}}"##,
        )
        .unwrap();
        let outcome = pipeline(options).tokenize(&InputSource::post(post)).unwrap();

        assert_eq!(
            pairs(&outcome),
            vec![
                ("#夜景".to_string(), "HASHTAG".to_string()),
                ("東京タワー".to_string(), "PROJECT_KEYWORD".to_string()),
                ("行く".to_string(), "動詞".to_string()),
                ("た".to_string(), "助動詞".to_string()),
                ("。".to_string(), "記号".to_string()),
            ]
        );
    }

    #[test]
    fn test_url_timeout_is_isolated_per_item() {
        let options = PipelineOptions {
            url_timeout: Duration::ZERO,
            ..PipelineOptions::default()
        };
        let pipeline = pipeline(options);
        // The spent budget only bites where the URL pass runs
        let post = StructuredPost::from_json(r#"{"text": "綺麗(^_^)", "entities": {}}"#).unwrap();
        let inputs = vec![
            InputSource::text("綺麗 http://example.com/((((a))))"),
            InputSource::post(post),
        ];

        let results = pipeline.tokenize_batch(&inputs);

        assert_eq!(results.len(), 2);
        assert!(results[0].as_ref().unwrap_err().is_timeout());
        assert_eq!(
            pairs(results[1].as_ref().unwrap()),
            vec![
                ("(^_^)".to_string(), "KAOMOJI".to_string()),
                ("綺麗".to_string(), "名詞".to_string()),
            ]
        );
    }

    #[test]
    fn test_analyzer_failure_propagates() {
        let pipeline =
            Pipeline::with_bundled_patterns(FailingAnalyzer, PipelineOptions::default()).unwrap();
        let err = pipeline.tokenize_text("こんにちは").unwrap_err();
        assert!(matches!(err, TokenizeError::Analysis(_)));
    }

    #[test]
    fn test_find_keywords() {
        let pipeline = pipeline(keywords(&["東京", "大阪"]));
        assert_eq!(
            pipeline.find_keywords("東京から大阪、また東京"),
            vec!["東京", "東京", "大阪"]
        );
    }

    #[test]
    fn test_features_keyword_and_script_filters() {
        let pipeline = pipeline(keywords(&["東京"]));

        let hit = pipeline.features(&InputSource::text("東京は雨")).unwrap();
        assert!(!hit.exclude);

        let miss = pipeline.features(&InputSource::text("大阪は雨")).unwrap();
        assert!(miss.exclude);

        let english = pipeline.features(&InputSource::text("RT @a: Tokyo")).unwrap();
        assert!(english.exclude);
        assert!(english.is_rt);
    }

    #[test]
    fn test_features_from_post_metadata() {
        let pipeline = pipeline(PipelineOptions::default());
        let retweet = StructuredPost::from_json(
            r#"{"text": "綺麗", "entities": {}, "retweeted_status": {"user": {"screen_name": "hanako"}}}"#,
        )
        .unwrap();
        let features = pipeline.features(&InputSource::post(retweet)).unwrap();
        assert!(features.is_rt);
        assert!(!features.is_reply);
        assert_eq!(features.rt_account.as_deref(), Some("@hanako"));

        let reply = StructuredPost::from_json(
            r#"{"text": "そうだね", "entities": {}, "in_reply_to_screen_name": "taro"}"#,
        )
        .unwrap();
        let features = pipeline.features(&InputSource::post(reply)).unwrap();
        assert!(features.is_reply);
        assert!(!features.is_rt);
    }

    #[test]
    fn test_entity_literal_texts_never_reach_analyzer() {
        let pipeline = pipeline(PipelineOptions::default());
        let outcome = pipeline.tokenize_text("#foo bar @baz (笑) ╥﹏╥ です").unwrap();
        let tokens = outcome.tokens().unwrap();
        let entity_count = tokens.iter().filter(|t| t.tag().is_entity()).count();
        assert_eq!(entity_count, 4);
        for token in tokens.iter().filter(|t| !t.tag().is_entity()) {
            for fragment in ["#", "@", "笑", "╥", "﹏"] {
                assert!(!token.text().contains(fragment));
            }
        }
        assert_eq!(tokens[4], TaggedToken::new("bar", TagKind::from("名詞")));
    }
}
