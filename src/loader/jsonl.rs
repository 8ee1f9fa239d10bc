//! JSONL post loader
//!
//! Reads structured posts, one JSON object per line. A malformed line does
//! not abort the load: it comes back as a failed record carrying its line
//! number, so the caller can report it and keep going.

use super::StructuredPost;
use crate::error::Result as ItemResult;
use anyhow::{Context, Result};
use std::fs::File;
use std::io::{BufRead, BufReader, Read};
use std::path::Path;

/// One line of a JSONL input
#[derive(Debug)]
pub struct LoadedPost {
    /// 1-based line number in the source
    pub line_number: usize,
    /// The parsed post, or why the line could not be used
    pub post: ItemResult<StructuredPost>,
}

/// JSONL loader for structured posts
pub struct JsonlLoader;

impl JsonlLoader {
    /// Load posts from a reader (e.g., stdin)
    ///
    /// Empty lines are skipped. Read failures abort the load; parse failures
    /// are returned per line.
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<LoadedPost>> {
        let buf_reader = BufReader::new(reader);
        let mut posts = Vec::new();

        for (index, line_result) in buf_reader.lines().enumerate() {
            let line_number = index + 1;
            let line = line_result.with_context(|| format!("Failed to read line {}", line_number))?;

            let trimmed = line.trim();
            if trimmed.is_empty() {
                continue;
            }

            let post = StructuredPost::from_json(trimmed);
            if let Err(e) = &post {
                tracing::warn!(line_number, error = %e, "Skipping malformed post");
            }
            posts.push(LoadedPost { line_number, post });
        }

        Ok(posts)
    }

    /// Load posts from a string
    pub fn load_from_string(content: &str) -> Result<Vec<LoadedPost>> {
        Self::load_from_reader(content.as_bytes())
    }

    /// Load posts from a file
    pub fn load_from_file(path: &Path) -> Result<Vec<LoadedPost>> {
        let file = File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        Self::load_from_reader(file)
    }
}
