//! Entity extraction engine
//!
//! Runs the structured-pattern passes over a working copy of the input. Each
//! pass tags what it matches and blanks the matched characters out of the
//! working text so later passes never see them:
//!
//! - Freeform: emoji, mentions, hashtags, URLs (deadline-guarded), ellipsis
//!   removal, parenthetical interjections, kaomoji
//! - Structured: platform-supplied entities, whitespace collapse, emoji,
//!   URLs (only if `http` survives), ellipsis removal, parenthetical
//!   interjections, kaomoji
//!
//! Emoji go first because they can sit in the noise around a kaomoji and
//! shift its boundaries. Kaomoji go last: weakest heuristic, most expensive.

pub mod deadline;
pub mod kaomoji;

pub use deadline::{Deadline, DEFAULT_URL_TIMEOUT};
pub use kaomoji::KaomojiSplitter;

use crate::error::{Result, TokenizeError};
use crate::patterns::PatternLibrary;
use crate::token::{TagKind, TaggedToken};
use once_cell::sync::Lazy;
use regex::{Regex, RegexBuilder};
use std::ops::Range;
use std::time::Duration;

/// Runs of whitespace, collapsed after entity masking
static WHITESPACE_RUN: Lazy<Regex> = Lazy::new(|| Regex::new(r"\s+").expect("Invalid regex"));

/// Discarded outright, never tagged
const ELLIPSIS: char = '…';

/// How erased characters appear in the residual text
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Residual {
    /// Erased characters stay as spaces
    Placeholder,
    /// Erased characters are removed
    Delete,
}

/// Mutable text buffer being stripped of recognized spans
///
/// Erasing replaces each character with one space, so character offsets stay
/// valid for the lifetime of the buffer (until `collapse_whitespace`).
#[derive(Debug, Clone)]
pub struct WorkingText {
    buf: String,
    erased: Vec<Range<usize>>,
}

impl WorkingText {
    /// Wrap a copy of `text`
    pub fn new(text: &str) -> Self {
        Self {
            buf: text.to_string(),
            erased: Vec::new(),
        }
    }

    /// Current contents
    pub fn as_str(&self) -> &str {
        &self.buf
    }

    /// Length in characters
    pub fn char_len(&self) -> usize {
        self.buf.chars().count()
    }

    /// Whether `needle` is still present
    pub fn contains(&self, needle: &str) -> bool {
        self.buf.contains(needle)
    }

    /// Blank out byte ranges, returning the character offset of each
    ///
    /// Ranges must be ascending and non-overlapping, as `find_iter` yields them.
    pub fn erase(&mut self, ranges: &[Range<usize>]) -> Vec<usize> {
        let mut out = String::with_capacity(self.buf.len());
        let mut offsets = Vec::with_capacity(ranges.len());
        let mut last = 0;
        let mut chars_before = 0;

        for range in ranges {
            let head = &self.buf[last..range.start];
            chars_before += head.chars().count();
            out.push_str(head);

            let width = self.buf[range.clone()].chars().count();
            out.extend(std::iter::repeat(' ').take(width));
            offsets.push(chars_before);
            self.erased.push(chars_before..chars_before + width);

            chars_before += width;
            last = range.end;
        }
        out.push_str(&self.buf[last..]);

        self.buf = out;
        offsets
    }

    /// Blank out the first occurrence of `needle`, returning its character offset
    pub fn erase_first(&mut self, needle: &str) -> Option<usize> {
        let start = self.buf.find(needle)?;
        self.erase(&[start..start + needle.len()]).pop()
    }

    /// Collapse whitespace runs to one space
    ///
    /// Offsets recorded before this call no longer apply; erased spans are
    /// whitespace by now and fold into their neighbours.
    pub fn collapse_whitespace(&mut self) {
        self.buf = WHITESPACE_RUN.replace_all(&self.buf, " ").into_owned();
        self.erased.clear();
    }

    /// Text left over for the analyzer
    pub fn residual(&self, mode: Residual) -> String {
        match mode {
            Residual::Placeholder => self.buf.clone(),
            Residual::Delete => self
                .buf
                .chars()
                .enumerate()
                .filter(|(i, _)| !self.erased.iter().any(|r| r.contains(i)))
                .map(|(_, c)| c)
                .collect(),
        }
    }
}

/// An entity the source platform already extracted
///
/// `text` is the literal as it should appear in the post, e.g. `#東京`,
/// `@someone`, or the shortened URL.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntityHint {
    pub text: String,
    pub tag: TagKind,
}

impl EntityHint {
    pub fn new(text: impl Into<String>, tag: TagKind) -> Self {
        Self {
            text: text.into(),
            tag,
        }
    }
}

/// Output of one extraction run
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Extraction {
    /// Tagged entities in encounter order
    pub entities: Vec<TaggedToken>,
    /// Text handed on to the analyzer
    pub remaining: String,
}

/// A tagged span with its position, used for ordering
#[derive(Debug)]
struct Span {
    phase: u8,
    offset: usize,
    token: TaggedToken,
}

/// Per-run span collector
#[derive(Debug, Default)]
struct Spans {
    phase: u8,
    items: Vec<Span>,
}

impl Spans {
    fn push(&mut self, offset: usize, text: impl Into<String>, tag: TagKind) {
        self.items.push(Span {
            phase: self.phase,
            offset,
            token: TaggedToken::new(text, tag),
        });
    }

    fn next_phase(&mut self) {
        self.phase += 1;
    }

    fn into_tokens(mut self) -> Vec<TaggedToken> {
        self.items.sort_by_key(|s| (s.phase, s.offset));
        self.items.into_iter().map(|s| s.token).collect()
    }
}

/// Runs the ordered extraction passes
#[derive(Debug, Clone, Copy)]
pub struct EntityExtractor<'a> {
    patterns: &'a PatternLibrary,
    url_timeout: Duration,
}

impl<'a> EntityExtractor<'a> {
    /// Create an extractor with the default URL budget
    pub fn new(patterns: &'a PatternLibrary) -> Self {
        Self {
            patterns,
            url_timeout: DEFAULT_URL_TIMEOUT,
        }
    }

    /// Set the URL pass budget
    pub fn with_url_timeout(mut self, timeout: Duration) -> Self {
        self.url_timeout = timeout;
        self
    }

    /// Extract entities from plain text
    ///
    /// Erased spans become spaces in the residual text.
    pub fn extract_freeform(&self, text: &str) -> Result<Extraction> {
        let mut work = WorkingText::new(text);
        let mut spans = Spans::default();

        self.take_all(&mut work, &mut spans, self.patterns.emoji(), TagKind::Emoji);
        self.take_all(&mut work, &mut spans, self.patterns.mention(), TagKind::Username);
        self.take_all(&mut work, &mut spans, self.patterns.hashtag(), TagKind::Hashtag);
        self.take_urls(&mut work, &mut spans)?;
        self.take_tail(&mut work, &mut spans);

        Ok(Extraction {
            entities: spans.into_tokens(),
            remaining: work.residual(Residual::Placeholder),
        })
    }

    /// Extract entities from a post whose platform supplied entity metadata
    ///
    /// Erased spans are deleted from the residual text.
    pub fn extract_structured(&self, text: &str, hints: &[EntityHint]) -> Result<Extraction> {
        let mut spans = Spans::default();
        let (mut work, masked) = mask_entities(text, hints)?;
        for (offset, token) in masked {
            spans.push(offset, token.0, token.1);
        }

        work.collapse_whitespace();
        spans.next_phase();

        self.take_all(&mut work, &mut spans, self.patterns.emoji(), TagKind::Emoji);
        if work.contains("http") {
            tracing::debug!("URL missed by entity metadata, running URL pass");
            self.take_urls(&mut work, &mut spans)?;
        }
        self.take_tail(&mut work, &mut spans);

        Ok(Extraction {
            entities: spans.into_tokens(),
            remaining: work.residual(Residual::Delete),
        })
    }

    /// Tag and erase every match of `regex`
    fn take_all(&self, work: &mut WorkingText, spans: &mut Spans, regex: &Regex, tag: TagKind) {
        let (ranges, texts): (Vec<_>, Vec<_>) = regex
            .find_iter(work.as_str())
            .map(|m| (m.range(), m.as_str().to_string()))
            .unzip();
        if ranges.is_empty() {
            return;
        }

        tracing::debug!(tag = tag.as_str(), count = ranges.len(), "Extracted entities");
        for (offset, text) in work.erase(&ranges).into_iter().zip(texts) {
            spans.push(offset, text, tag.clone());
        }
    }

    /// URL pass under a wall-clock deadline
    fn take_urls(&self, work: &mut WorkingText, spans: &mut Spans) -> Result<()> {
        let deadline = Deadline::after(self.url_timeout);
        deadline.check(work.as_str())?;

        let mut ranges = Vec::new();
        let mut texts = Vec::new();
        for m in self.patterns.url().find_iter(work.as_str()) {
            deadline.check(work.as_str())?;
            ranges.push(m.range());
            texts.push(m.as_str().to_string());
        }

        if !ranges.is_empty() {
            tracing::debug!(count = ranges.len(), "Extracted URLs");
        }
        for (offset, text) in work.erase(&ranges).into_iter().zip(texts) {
            spans.push(offset, text, TagKind::Url);
        }
        Ok(())
    }

    /// Ellipsis removal, parenthetical interjections, kaomoji
    fn take_tail(&self, work: &mut WorkingText, spans: &mut Spans) {
        let ellipses: Vec<Range<usize>> = work
            .as_str()
            .match_indices(ELLIPSIS)
            .map(|(start, s)| start..start + s.len())
            .collect();
        work.erase(&ellipses);

        self.take_all(
            work,
            spans,
            self.patterns.paren_interjection(),
            TagKind::ParenInterjection,
        );

        let faces = KaomojiSplitter::new(self.patterns).find_all(work.as_str());
        for face in faces {
            match work.erase_first(&face) {
                Some(offset) => spans.push(offset, face, TagKind::Kaomoji),
                None => tracing::debug!(face = face.as_str(), "Kaomoji already consumed"),
            }
        }
    }
}

/// Blank each platform entity out of `text`, one occurrence per hint
///
/// Occurrences are found case-insensitively, since mention screen names do
/// not always match the casing used in the text. The buffer keeps exactly the
/// input's character length. Each entity comes back with its character
/// offset; entities missing from the text are placed at the end.
pub fn mask_entities(
    text: &str,
    hints: &[EntityHint],
) -> Result<(WorkingText, Vec<(usize, TaggedToken)>)> {
    let mut work = WorkingText::new(text);
    let end = work.char_len();
    let mut found = Vec::with_capacity(hints.len());

    for hint in hints {
        if hint.text.is_empty() {
            continue;
        }
        let finder = RegexBuilder::new(&regex::escape(&hint.text))
            .case_insensitive(true)
            .build()?;
        let located = finder
            .find(work.as_str())
            .map(|m| (m.range(), m.as_str().to_string()));

        match located {
            Some((range, literal)) => {
                let offset = work.erase(&[range]).pop().unwrap_or(end);
                found.push((offset, TaggedToken::new(literal, hint.tag.clone())));
            }
            None => {
                tracing::debug!(entity = hint.text.as_str(), "Entity not found in text");
                found.push((end, TaggedToken::new(hint.text.clone(), hint.tag.clone())));
            }
        }
    }

    ensure_char_len(&work, text.chars().count())?;
    Ok((work, found))
}

/// Masking must leave the buffer exactly as long as the input
fn ensure_char_len(work: &WorkingText, expected: usize) -> Result<()> {
    let actual = work.char_len();
    if actual != expected {
        return Err(TokenizeError::MaskLength { expected, actual });
    }
    Ok(())
}
