//! Transcript chunking
//!
//! Splits a transcript into sentence fragments and packs them greedily into
//! chunks of at most `max_chars` characters. A single fragment longer than
//! the budget is never split further; it becomes its own oversized chunk.

use regex::Regex;
use serde::{Deserialize, Serialize};
use std::sync::OnceLock;

use crate::summarize::error::ChunkingError;

/// Default per-chunk character budget.
pub const DEFAULT_MAX_CHARS: usize = 2500;

/// Sentence delimiter used by [`SplitMode::Delimiter`].
pub const SENTENCE_DELIMITER: &str = ". ";

/// How the transcript is cut into sentence fragments.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SplitMode {
    /// Split on the literal `". "`; chunks re-join with `". "`.
    #[default]
    Delimiter,
    /// Split after `.`, `!`, `?` (and closing quotes or brackets) followed by
    /// whitespace, and at line breaks; fragments keep their terminators.
    Sentence,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Chunker {
    max_chars: usize,
    mode: SplitMode,
}

impl Chunker {
    pub fn new(max_chars: usize, mode: SplitMode) -> Result<Self, ChunkingError> {
        if max_chars == 0 {
            return Err(ChunkingError::InvalidMaxChars(max_chars));
        }
        Ok(Self { max_chars, mode })
    }

    pub fn max_chars(&self) -> usize {
        self.max_chars
    }

    pub fn mode(&self) -> SplitMode {
        self.mode
    }

    /// Split `text` into ordered chunks. Empty input yields no chunks.
    pub fn chunk(&self, text: &str) -> Vec<String> {
        if text.is_empty() {
            return Vec::new();
        }

        match self.mode {
            SplitMode::Delimiter => {
                let mut packer = Packer::new(SENTENCE_DELIMITER, self.max_chars);
                for fragment in text.split(SENTENCE_DELIMITER) {
                    packer.push(fragment);
                }
                packer.finish()
            }
            SplitMode::Sentence => {
                let mut packer = Packer::new("", self.max_chars);
                for fragment in sentence_fragments(text) {
                    packer.push(fragment);
                }
                packer.finish()
            }
        }
    }
}

impl Default for Chunker {
    fn default() -> Self {
        Self {
            max_chars: DEFAULT_MAX_CHARS,
            mode: SplitMode::Delimiter,
        }
    }
}

/// Split `text` on `". "` into chunks of at most `max_chars` characters.
pub fn chunk(text: &str, max_chars: usize) -> Result<Vec<String>, ChunkingError> {
    Ok(Chunker::new(max_chars, SplitMode::Delimiter)?.chunk(text))
}

/// Greedy accumulator. A chunk is closed when the next fragment (plus the
/// separator) would push it past the budget. Empty chunks are never emitted.
struct Packer<'s> {
    separator: &'s str,
    separator_len: usize,
    max_chars: usize,
    chunks: Vec<String>,
    current: String,
    current_len: usize,
    open: bool,
    /// Whether `current` holds any non-empty fragment.
    has_content: bool,
}

impl<'s> Packer<'s> {
    fn new(separator: &'s str, max_chars: usize) -> Self {
        Self {
            separator,
            separator_len: separator.chars().count(),
            max_chars,
            chunks: Vec::new(),
            current: String::new(),
            current_len: 0,
            open: false,
            has_content: false,
        }
    }

    fn push(&mut self, fragment: &str) {
        let fragment_len = fragment.chars().count();

        if self.open && self.current_len + self.separator_len + fragment_len <= self.max_chars {
            self.current.push_str(self.separator);
            self.current.push_str(fragment);
            self.current_len += self.separator_len + fragment_len;
            self.has_content |= !fragment.is_empty();
            return;
        }

        // An empty fragment that does not fit is only a trailing separator.
        if self.open && fragment.is_empty() {
            return;
        }

        if self.has_content {
            self.chunks.push(std::mem::take(&mut self.current));
        }
        self.current.clear();
        self.current.push_str(fragment);
        self.current_len = fragment_len;
        self.open = true;
        self.has_content = !fragment.is_empty();
    }

    fn finish(mut self) -> Vec<String> {
        if self.has_content {
            self.chunks.push(self.current);
        }
        self.chunks
    }
}

fn sentence_boundary() -> &'static Regex {
    static BOUNDARY: OnceLock<Regex> = OnceLock::new();
    BOUNDARY.get_or_init(|| {
        Regex::new(r#"[.!?]+["'\u{201D}\u{2019})\]]*\s+|\n\s*"#).expect("static regex compile")
    })
}

fn sentence_fragments(text: &str) -> Vec<&str> {
    let mut fragments = Vec::new();
    let mut start = 0;

    for boundary in sentence_boundary().find_iter(text) {
        fragments.push(&text[start..boundary.end()]);
        start = boundary.end();
    }
    if start < text.len() {
        fragments.push(&text[start..]);
    }

    fragments
}
