//! Input loading module
//!
//! Plain-text inputs are read one item per line; structured posts one JSON
//! object per line. Directories are walked recursively.

mod jsonl;
mod post;

pub use jsonl::{JsonlLoader, LoadedPost};
pub use post::{
    HashtagEntity, MentionEntity, PostEntities, PostUser, RetweetedStatus, StructuredPost,
    UrlEntity,
};

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// Loader for plain text, one item per line
pub struct LineLoader;

impl LineLoader {
    /// Read non-empty lines from a reader
    pub fn load_from_reader<R: Read>(reader: R) -> Result<Vec<String>> {
        let mut lines = Vec::new();
        for (index, line) in BufReader::new(reader).lines().enumerate() {
            let line = line.with_context(|| format!("Failed to read line {}", index + 1))?;
            if !line.trim().is_empty() {
                lines.push(line);
            }
        }
        Ok(lines)
    }

    /// Read non-empty lines from a string
    pub fn load_from_string(content: &str) -> Result<Vec<String>> {
        Self::load_from_reader(content.as_bytes())
    }

    /// Read non-empty lines from a file
    pub fn load_from_file(path: &Path) -> Result<Vec<String>> {
        let file =
            std::fs::File::open(path).with_context(|| format!("Failed to open file: {:?}", path))?;
        Self::load_from_reader(file)
    }
}

/// Expand inputs into a sorted list of files
///
/// Files are kept as given; directories are walked recursively, skipping
/// hidden entries.
pub fn collect_input_files(inputs: &[PathBuf]) -> Result<Vec<PathBuf>> {
    let mut files = Vec::new();

    for input in inputs {
        if input.is_file() {
            files.push(input.clone());
            continue;
        }
        if !input.is_dir() {
            anyhow::bail!("Input not found: {:?}", input);
        }

        let mut found = Vec::new();
        let walker = WalkDir::new(input)
            .follow_links(true)
            .into_iter()
            .filter_entry(|e| e.depth() == 0 || !e.file_name().to_string_lossy().starts_with('.'));
        for entry in walker {
            let entry = entry.with_context(|| format!("Failed to walk {:?}", input))?;
            if entry.file_type().is_file() {
                found.push(entry.into_path());
            }
        }
        found.sort();
        tracing::debug!(dir = ?input, files = found.len(), "Collected input files");
        files.extend(found);
    }

    Ok(files)
}
