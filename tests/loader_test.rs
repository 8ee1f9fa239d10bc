//! Input loading tests
//!
//! Directory walking, JSONL posts with malformed lines, and the batch of
//! loaded items going through the pipeline one by one.

mod common;

use std::fs;
use tempfile::TempDir;
use tsubuyaki::loader::{collect_input_files, JsonlLoader, LineLoader};
use tsubuyaki::{InputSource, PipelineOptions, TokenizeError};

const POSTS: &str = r##"{"text": "#朝 おはよう(^_^)", "entities": {"hashtags": [{"text": "朝"}]}}
{"text": "壊れた行", "entities":
{"entities": {}}
{"text": "@taro 綺麗です", "entities": {"user_mentions": [{"screen_name": "taro"}]}, "in_reply_to_screen_name": "taro"}
"##;

#[test]
fn test_jsonl_posts_from_directory() {
    let temp_dir = TempDir::new().unwrap();
    let nested = temp_dir.path().join("2014-06");
    fs::create_dir_all(&nested).unwrap();
    fs::write(nested.join("posts.jsonl"), POSTS).unwrap();

    let files = collect_input_files(&[temp_dir.path().to_path_buf()]).unwrap();
    assert_eq!(files.len(), 1);

    let posts = JsonlLoader::load_from_file(&files[0]).unwrap();
    assert_eq!(posts.len(), 4);
    assert_eq!(
        posts.iter().map(|p| p.line_number).collect::<Vec<_>>(),
        vec![1, 2, 3, 4]
    );
    assert!(posts[0].post.is_ok());
    assert!(matches!(posts[1].post, Err(TokenizeError::UnexpectedInputShape(_))));
    assert!(matches!(posts[2].post, Err(TokenizeError::UnexpectedInputShape(_))));
    assert!(posts[3].post.is_ok());
}

#[test]
fn test_loaded_posts_through_pipeline() {
    let pipeline = common::pipeline(PipelineOptions::default());
    let inputs: Vec<InputSource> = JsonlLoader::load_from_string(POSTS)
        .unwrap()
        .into_iter()
        .filter_map(|loaded| loaded.post.ok())
        .map(InputSource::post)
        .collect();

    let results = pipeline.tokenize_batch(&inputs);
    assert_eq!(results.len(), 2);

    let first = common::pairs(results[0].as_ref().unwrap());
    assert_eq!(first[0], ("#朝".to_string(), "HASHTAG".to_string()));
    assert_eq!(first[1], ("(^_^)".to_string(), "KAOMOJI".to_string()));

    let features = pipeline.features(&inputs[1]).unwrap();
    assert!(features.is_reply);
    assert!(!features.is_rt);
}

#[test]
fn test_plain_lines_become_text_items() {
    let temp_dir = TempDir::new().unwrap();
    let path = temp_dir.path().join("lines.txt");
    fs::write(&path, "今日は晴れ\n\nRT @a: 綺麗\n").unwrap();

    let lines = LineLoader::load_from_file(&path).unwrap();
    assert_eq!(lines, vec!["今日は晴れ", "RT @a: 綺麗"]);

    let pipeline = common::pipeline(PipelineOptions::default());
    let features = pipeline.features(&InputSource::from(lines[1].as_str())).unwrap();
    assert!(features.is_rt);
    assert_eq!(features.rt_account.as_deref(), Some("@a"));
}
