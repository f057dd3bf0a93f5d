//! The two-level interval tree stored per episode: lines owning words.

use serde::Serialize;

use crate::interval::{Interval, Span};
use crate::search::{search_end_ge, search_start_le};

/// A single word and the slice of its line's time attributed to it.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct WordInterval {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

impl WordInterval {
    pub fn new(span: Span, text: impl Into<String>) -> Self {
        Self {
            start_seconds: span.start_seconds,
            end_seconds: span.end_seconds,
            text: text.into(),
        }
    }
}

impl Interval for WordInterval {
    fn start(&self) -> f64 {
        self.start_seconds
    }

    fn end(&self) -> f64 {
        self.end_seconds
    }
}

/// One timestamped transcript line and the words it owns.
///
/// `words` is ordered and non-overlapping, so it is sorted ascending on both endpoints.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LineInterval {
    start_seconds: f64,
    end_seconds: f64,
    text: String,
    words: Vec<WordInterval>,
}

impl LineInterval {
    pub(crate) fn new(span: Span, text: String, words: Vec<WordInterval>) -> Self {
        Self {
            start_seconds: span.start_seconds,
            end_seconds: span.end_seconds,
            text,
            words,
        }
    }

    /// The line as transcribed.
    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn words(&self) -> &[WordInterval] {
        &self.words
    }

    /// Words overlapping the closed range `[start, end]`.
    ///
    /// Empty when the line has no word inside the range, which can happen even for a line that
    /// itself overlaps it: word bounds are shrunk independently of the line's.
    pub fn overlapping_words(&self, start: f64, end: f64) -> &[WordInterval] {
        match (
            search_end_ge(&self.words, start),
            search_start_le(&self.words, end),
        ) {
            (Some(lo), Some(hi)) if lo <= hi => &self.words[lo..=hi],
            _ => &[],
        }
    }
}

impl Interval for LineInterval {
    fn start(&self) -> f64 {
        self.start_seconds
    }

    fn end(&self) -> f64 {
        self.end_seconds
    }
}

/// A fully indexed transcript. Immutable once built.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Episode {
    id: String,
    lines: Vec<LineInterval>,
}

impl Episode {
    pub(crate) fn new(id: String, lines: Vec<LineInterval>) -> Self {
        Self { id, lines }
    }

    pub fn id(&self) -> &str {
        &self.id
    }

    pub fn lines(&self) -> &[LineInterval] {
        &self.lines
    }

    pub fn word_count(&self) -> usize {
        self.lines.iter().map(|line| line.words.len()).sum()
    }

    /// Every word of the episode in time order.
    pub fn words(&self) -> impl Iterator<Item = &WordInterval> {
        self.lines.iter().flat_map(|line| line.words.iter())
    }

    /// Words overlapping the closed range `[start, end]`, in time order.
    ///
    /// A reversed range (`start > end`) or a NaN bound matches nothing.
    ///
    /// Narrows to the candidate lines first (`end >= start`, `start <= end` at line level),
    /// then runs the same two-sided search inside each candidate's words.
    pub fn overlapping_words(&self, start: f64, end: f64) -> Vec<&WordInterval> {
        if start.is_nan() || end.is_nan() || start > end {
            return Vec::new();
        }

        let (Some(lo), Some(hi)) = (
            search_end_ge(&self.lines, start),
            search_start_le(&self.lines, end),
        ) else {
            return Vec::new();
        };

        if lo > hi {
            return Vec::new();
        }

        self.lines[lo..=hi]
            .iter()
            .flat_map(|line| line.overlapping_words(start, end))
            .collect()
    }
}
