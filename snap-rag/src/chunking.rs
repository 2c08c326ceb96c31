//! Recursive character splitting of the manual text into embedding-sized,
//! overlapping chunks.
//!
//! Splitting prefers coarse structural separators and only falls back to
//! finer ones for pieces that are still too large: paragraph (`"\n\n"`),
//! then line (`"\n"`), then word (`" "`), then raw characters. The raw
//! character fallback guarantees termination for any chunk size, including
//! sizes smaller than a single word.

use std::collections::VecDeque;

use crate::types::RagError;

/// Default maximum chunk length, in characters.
pub const DEFAULT_CHUNK_SIZE: usize = 500;
/// Default overlap between adjacent chunks, in characters.
pub const DEFAULT_CHUNK_OVERLAP: usize = 50;

/// Separator candidates, coarsest first. The empty string means raw
/// character splitting and always matches.
const SEPARATORS: [&str; 4] = ["\n\n", "\n", " ", ""];

/// Splits text into chunks of at most `chunk_size` characters with
/// approximately `chunk_overlap` characters shared between neighbors.
///
/// Deterministic: the same input and parameters always yield the same
/// chunk sequence, in document order.
#[derive(Debug, Clone)]
pub struct TextSplitter {
    chunk_size: usize,
    chunk_overlap: usize,
}

impl Default for TextSplitter {
    fn default() -> Self {
        Self {
            chunk_size: DEFAULT_CHUNK_SIZE,
            chunk_overlap: DEFAULT_CHUNK_OVERLAP,
        }
    }
}

impl TextSplitter {
    /// Creates a splitter, rejecting degenerate parameter combinations.
    pub fn new(chunk_size: usize, chunk_overlap: usize) -> Result<Self, RagError> {
        if chunk_size == 0 {
            return Err(RagError::InvalidConfig(
                "chunk size must be at least 1".into(),
            ));
        }
        if chunk_overlap >= chunk_size {
            return Err(RagError::InvalidConfig(format!(
                "chunk overlap ({chunk_overlap}) must be smaller than chunk size ({chunk_size})"
            )));
        }
        Ok(Self {
            chunk_size,
            chunk_overlap,
        })
    }

    /// Maximum chunk length in characters.
    pub fn chunk_size(&self) -> usize {
        self.chunk_size
    }

    /// Splits `text` into chunks in document order. Empty or all-whitespace
    /// input yields no chunks.
    pub fn split(&self, text: &str) -> Vec<String> {
        self.split_with(text, &SEPARATORS)
    }

    fn split_with(&self, text: &str, separators: &[&str]) -> Vec<String> {
        // Pick the coarsest separator that actually occurs in this text;
        // the raw-character separator at the end always matches.
        let position = separators
            .iter()
            .position(|sep| sep.is_empty() || text.contains(sep))
            .unwrap_or(separators.len().saturating_sub(1));
        let separator = separators.get(position).copied().unwrap_or("");
        let finer = &separators[(position + 1).min(separators.len())..];

        let pieces: Vec<String> = if separator.is_empty() {
            text.chars().map(String::from).collect()
        } else {
            text.split(separator)
                .filter(|piece| !piece.is_empty())
                .map(str::to_string)
                .collect()
        };

        let mut chunks = Vec::new();
        let mut pending: Vec<String> = Vec::new();
        for piece in pieces {
            if char_len(&piece) <= self.chunk_size {
                pending.push(piece);
                continue;
            }
            // Flush what fits, then re-split the oversized piece with the
            // next finer separator.
            if !pending.is_empty() {
                chunks.extend(self.merge(std::mem::take(&mut pending), separator));
            }
            if finer.is_empty() {
                chunks.push(piece);
            } else {
                chunks.extend(self.split_with(&piece, finer));
            }
        }
        if !pending.is_empty() {
            chunks.extend(self.merge(pending, separator));
        }
        chunks
    }

    /// Greedily packs consecutive pieces into chunks of at most
    /// `chunk_size` characters, carrying roughly `chunk_overlap` trailing
    /// characters into the next chunk.
    fn merge(&self, pieces: Vec<String>, separator: &str) -> Vec<String> {
        let sep_len = char_len(separator);
        let mut chunks = Vec::new();
        let mut window: VecDeque<String> = VecDeque::new();
        let mut total = 0usize;

        for piece in pieces {
            let piece_len = char_len(&piece);
            let joined_len = total + piece_len + if window.is_empty() { 0 } else { sep_len };
            if joined_len > self.chunk_size && !window.is_empty() {
                if let Some(chunk) = join_window(&window, separator) {
                    chunks.push(chunk);
                }
                // Shrink the window to the overlap budget, and further if the
                // incoming piece would still not fit.
                while total > self.chunk_overlap
                    || (total + piece_len + if window.is_empty() { 0 } else { sep_len }
                        > self.chunk_size
                        && total > 0)
                {
                    let Some(dropped) = window.pop_front() else {
                        break;
                    };
                    total -= char_len(&dropped) + if window.is_empty() { 0 } else { sep_len };
                }
            }
            total += piece_len + if window.is_empty() { 0 } else { sep_len };
            window.push_back(piece);
        }

        if let Some(chunk) = join_window(&window, separator) {
            chunks.push(chunk);
        }
        chunks
    }
}

fn char_len(text: &str) -> usize {
    text.chars().count()
}

/// Joins the window with its separator and trims boundary whitespace;
/// returns `None` when nothing printable remains.
fn join_window(window: &VecDeque<String>, separator: &str) -> Option<String> {
    let joined = window
        .iter()
        .map(String::as_str)
        .collect::<Vec<_>>()
        .join(separator);
    let trimmed = joined.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
