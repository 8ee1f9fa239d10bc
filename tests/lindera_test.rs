//! Pipeline tests with the real Lindera analyzer
//!
//! Assertions stay loose on segmentation details that depend on the
//! dictionary build.

use tsubuyaki::tokenizer::{KeywordSpec, LinderaAnalyzer};
use tsubuyaki::{InputSource, Pipeline, PipelineOptions, TagKind};

fn pipeline(keywords: &[&str]) -> Pipeline<LinderaAnalyzer> {
    let options = PipelineOptions {
        keywords: KeywordSpec::new(keywords.iter().copied()),
        ..PipelineOptions::default()
    };
    Pipeline::with_bundled_patterns(LinderaAnalyzer::new().unwrap(), options).unwrap()
}

#[test]
fn test_keyword_survives_real_segmentation() {
    let pipeline = pipeline(&["東京スカイツリー"]);
    let outcome = pipeline
        .tokenize(&InputSource::text("昨日、東京スカイツリーに行きました。"))
        .unwrap();
    let tokens = outcome.tokens().unwrap();

    let keywords: Vec<_> = tokens
        .iter()
        .filter(|t| t.tag() == &TagKind::ProjectKeyword)
        .collect();
    assert_eq!(keywords.len(), 1);
    assert_eq!(keywords[0].text(), "東京スカイツリー");
    assert!(tokens.iter().all(|t| t.text() != "スカイツリー"));
}

#[test]
fn test_freeform_drops_punctuation() {
    let pipeline = pipeline(&[]);
    let outcome = pipeline
        .tokenize(&InputSource::text("今日はいい天気ですね。(^_^)"))
        .unwrap();
    let tokens = outcome.tokens().unwrap();

    assert_eq!(tokens[0].tag(), &TagKind::Kaomoji);
    assert!(tokens.iter().all(|t| t.text() != "。"));
    assert!(tokens.iter().any(|t| t.text() == "天気"));
}

#[test]
fn test_retweet_marker_from_analyzer() {
    let pipeline = pipeline(&[]);
    let outcome = pipeline
        .tokenize(&InputSource::text("RT @someone: 猫がかわいい"))
        .unwrap();
    let tokens = outcome.tokens().unwrap();

    assert!(tokens
        .iter()
        .any(|t| t.text() == "RT" && t.tag() == &TagKind::RtMarker));
    assert!(tokens
        .iter()
        .any(|t| t.text() == "@someone" && t.tag() == &TagKind::Username));
}
