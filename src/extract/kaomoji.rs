//! Kaomoji boundary splitting
//!
//! The kaomoji recognizer is greedy and regularly returns two or three faces
//! run together, or a face plus stray brackets. Kaomoji have no grammar that
//! would delimit one from the next, so splitting is heuristic:
//!
//! 1. Candidates of at most 10 characters are one face.
//! 2. Longer candidates with at most 4 text characters are one face (faces
//!    are dense in symbols, sparse in letters and kana).
//! 3. Otherwise re-match the recognizer, anchored, against the first third
//!    of the candidate; on success split that leading match again and then
//!    whatever the recognizer finds in the rest of the candidate.
//! 4. Failing that, the same with the first half.
//! 5. Failing that, keep the whole candidate.
//!
//! Every successful split recurses on strictly shorter strings, so recursion
//! is bounded by the candidate length. Faces only come out of steps 1, 2 and
//! 5, which makes splitting idempotent on its own output.

use crate::patterns::{count_text_chars, PatternLibrary};

/// Candidates up to this many characters are never split
pub const ATOMIC_MAX_CHARS: usize = 10;

/// Candidates with at most this many text characters are never split
pub const MAX_TEXT_CHARS: usize = 4;

/// Divisors tried in order when looking for a leading face
const SPLIT_DIVISORS: [usize; 2] = [3, 2];

/// Splits over-matched kaomoji candidates into individual faces
#[derive(Debug, Clone, Copy)]
pub struct KaomojiSplitter<'a> {
    patterns: &'a PatternLibrary,
}

impl<'a> KaomojiSplitter<'a> {
    /// Create a splitter over the shared recognizers
    pub fn new(patterns: &'a PatternLibrary) -> Self {
        Self { patterns }
    }

    /// Find every kaomoji in `text` and split each candidate
    pub fn find_all(&self, text: &str) -> Vec<String> {
        let mut faces = Vec::new();
        for candidate in self.patterns.find_kaomoji(text) {
            self.split_into(&candidate, &mut faces);
        }
        faces
    }

    /// Split one raw candidate into faces, in order
    pub fn split(&self, candidate: &str) -> Vec<String> {
        let mut faces = Vec::new();
        self.split_into(candidate, &mut faces);
        faces
    }

    fn split_into(&self, candidate: &str, faces: &mut Vec<String>) {
        // Surrounding noise may include whitespace; faces are emitted trimmed
        let candidate = candidate.trim();
        if candidate.is_empty() {
            return;
        }
        let len = candidate.chars().count();
        if len <= ATOMIC_MAX_CHARS || count_text_chars(candidate) <= MAX_TEXT_CHARS {
            faces.push(candidate.to_string());
            return;
        }

        for divisor in SPLIT_DIVISORS {
            let head: String = candidate.chars().take(len / divisor).collect();
            let Some(face) = self.patterns.match_kaomoji_prefix(&head) else {
                continue;
            };
            if face.is_empty() {
                continue;
            }

            tracing::debug!(candidate, face = face.as_str(), divisor, "Split kaomoji");
            self.split_into(&face, faces);

            // The rest is scanned on its own copy; sibling candidates of the
            // caller never see this removal.
            let rest = candidate.replacen(face.as_str(), "", 1);
            for sub in self.patterns.find_kaomoji(&rest) {
                self.split_into(&sub, faces);
            }
            return;
        }

        faces.push(candidate.to_string());
    }
}
