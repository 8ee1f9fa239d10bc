//! Shared fixtures for integration tests
//!
//! `TableAnalyzer` segments text by longest match against a fixed word
//! list, so expectations do not move with dictionary versions.

#![allow(dead_code)]

use tsubuyaki::token::MorphToken;
use tsubuyaki::tokenizer::MorphAnalyzer;
use tsubuyaki::{Pipeline, PipelineOptions, Result};

/// (surface, lemma, part of speech)
const WORDS: &[(&str, &str, &str)] = &[
    ("東京", "東京", "名詞"),
    ("タワ", "タワ", "名詞"),
    ("ー", "ー", "名詞"),
    ("スカイ", "スカイ", "名詞"),
    ("ツリー", "ツリー", "名詞"),
    ("今日", "今日", "名詞"),
    ("は", "は", "助詞"),
    ("に", "に", "助詞"),
    ("を", "を", "助詞"),
    ("行っ", "行く", "動詞"),
    ("見", "見る", "動詞"),
    ("た", "た", "助動詞"),
    ("です", "です", "助動詞"),
    ("綺麗", "綺麗", "名詞"),
    ("楽しい", "楽しい", "形容詞"),
    ("RT", "RT", "名詞"),
    ("。", "。", "記号"),
    ("、", "、", "記号"),
    ("！", "！", "記号"),
    (":", ":", "記号"),
];

pub struct TableAnalyzer;

impl MorphAnalyzer for TableAnalyzer {
    fn analyze(&self, text: &str) -> Result<Vec<MorphToken>> {
        let mut tokens = Vec::new();
        let mut rest = text;
        while let Some(c) = rest.chars().next() {
            let known = WORDS
                .iter()
                .filter(|(surface, _, _)| rest.starts_with(surface))
                .max_by_key(|(surface, _, _)| surface.len());
            let token = match known {
                Some(&(surface, lemma, pos)) => MorphToken::new(surface, lemma, pos),
                None if c.is_whitespace() => MorphToken::new(c.to_string(), c.to_string(), "記号"),
                None => MorphToken::new(c.to_string(), c.to_string(), "名詞"),
            };
            rest = &rest[token.surface.len()..];
            tokens.push(token);
        }
        Ok(tokens)
    }
}

pub fn pipeline(options: PipelineOptions) -> Pipeline<TableAnalyzer> {
    Pipeline::with_bundled_patterns(TableAnalyzer, options).unwrap()
}

pub fn with_keywords(keywords: &[&str]) -> PipelineOptions {
    PipelineOptions {
        keywords: tsubuyaki::tokenizer::KeywordSpec::new(keywords.iter().copied()),
        ..PipelineOptions::default()
    }
}

/// Tokens as (text, tag) string pairs
pub fn pairs(outcome: &tsubuyaki::TokenizeOutcome) -> Vec<(String, String)> {
    outcome
        .tokens()
        .expect("expected tokens")
        .iter()
        .map(|t| (t.text().to_string(), t.tag().to_string()))
        .collect()
}
