//! High-level API: build episodes from transcripts and query them by time range.
//!
//! `TranscriptionIndex` owns every indexed episode. Build with `add` (or `add_transcript` for
//! raw text), query with `search`. The index is a plain owned value with no interior
//! mutability: share it across threads behind whatever lock the host prefers, so that `add`
//! calls serialize while searches run concurrently.

use std::collections::HashMap;
use std::io::{BufWriter, Write};
use std::path::Path;

use tracing::{debug, info};

use crate::Result;
use crate::episode::{Episode, WordInterval};
use crate::json_array_encoder::JsonArrayEncoder;
use crate::opts::Opts;
use crate::output_type::OutputType;
use crate::parser::coarse_lines;
use crate::segments::{CoarseLine, build_episode};
use crate::text_encoder::TextEncoder;
use crate::tokenizer::{Tokenizer, WhitespaceTokenizer};
use crate::vtt_encoder::VttEncoder;
use crate::word_encoder::WordEncoder;

/// Episodes keyed by id, each a two-level (line, then word) interval tree.
pub struct TranscriptionIndex<T: Tokenizer = WhitespaceTokenizer> {
    tokenizer: T,
    episodes: HashMap<String, Episode>,
}

impl TranscriptionIndex<WhitespaceTokenizer> {
    /// An empty index that splits lines on whitespace.
    pub fn new() -> Self {
        Self::with_tokenizer(WhitespaceTokenizer)
    }
}

impl Default for TranscriptionIndex<WhitespaceTokenizer> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Tokenizer> TranscriptionIndex<T> {
    /// An empty index that splits lines into words with `tokenizer`.
    ///
    /// The tokenizer is fixed for the life of the index, so every episode's words are
    /// produced the same way.
    pub fn with_tokenizer(tokenizer: T) -> Self {
        Self {
            tokenizer,
            episodes: HashMap::new(),
        }
    }

    /// Index an episode from its coarse lines, replacing any episode with the same id.
    ///
    /// `lines` must cover the timeline contiguously in time order; this is not validated.
    /// Pass [`crate::UNKNOWN_EPISODE_LENGTH`] as `episode_length` when the final line has no
    /// known end.
    pub fn add<I>(&mut self, episode_id: impl Into<String>, lines: I, episode_length: f64)
    where
        I: IntoIterator<Item = CoarseLine>,
    {
        let episode_id = episode_id.into();

        // Build fully before touching the map so a replaced episode is swapped in one step.
        let episode = build_episode(&self.tokenizer, episode_id.clone(), lines, episode_length);
        let lines = episode.lines().len();
        let words = episode.word_count();

        info!(%episode_id, lines, words, "indexed episode");
        if self.episodes.insert(episode_id, episode).is_some() {
            debug!("replaced previously indexed episode");
        }
    }

    /// Parse a raw transcript and index it.
    ///
    /// On a parse error nothing is indexed and any previous episode with the same id stays.
    pub fn add_transcript(
        &mut self,
        episode_id: impl Into<String>,
        content: &str,
        episode_length: f64,
    ) -> Result<()> {
        let lines = coarse_lines(content, episode_length)?;
        self.add(episode_id, lines, episode_length);
        Ok(())
    }

    /// Read a UTF-8 transcript file and index it.
    ///
    /// I/O errors surface as [`crate::Error::Other`]; parse errors as in `add_transcript`.
    pub fn add_transcript_file(
        &mut self,
        episode_id: impl Into<String>,
        path: impl AsRef<Path>,
        episode_length: f64,
    ) -> Result<()> {
        let content = std::fs::read_to_string(path.as_ref())?;
        self.add_transcript(episode_id, &content, episode_length)
    }

    /// The words spoken between `start` and `end`, joined by single spaces.
    ///
    /// Never fails: an unknown episode, a zero-width or reversed range, or a range outside
    /// the indexed time all give an empty string.
    pub fn search(&self, episode_id: &str, start: f64, end: f64) -> String {
        let words = self.search_words(episode_id, start, end);
        let mut out = String::with_capacity(words.iter().map(|w| w.text.len() + 1).sum());
        for (i, word) in words.iter().enumerate() {
            if i > 0 {
                out.push(' ');
            }
            out.push_str(&word.text);
        }
        out
    }

    /// The word intervals overlapping the closed range `[start, end]`, in time order.
    ///
    /// The range must be forward and non-empty (`start < end`); anything else, NaN bounds
    /// included, matches nothing.
    pub fn search_words(&self, episode_id: &str, start: f64, end: f64) -> Vec<&WordInterval> {
        let Some(episode) = self.episodes.get(episode_id) else {
            debug!(episode_id, "search on unknown episode");
            return Vec::new();
        };

        if !is_forward_range(start, end) {
            return Vec::new();
        }

        let words = episode.overlapping_words(start, end);
        if words.is_empty() {
            debug!(episode_id, start, end, "search matched no words");
        }
        words
    }

    /// Run `search_words` and stream the result through the encoder chosen by `opts`.
    ///
    /// Returns how many words were written. The encoder is always closed, even after a failed
    /// write, so JSON output stays a complete array whenever the writer itself still works.
    pub fn write_search<W: Write>(
        &self,
        episode_id: &str,
        start: f64,
        end: f64,
        w: W,
        opts: &Opts,
    ) -> Result<usize> {
        let words = self.search_words(episode_id, start, end);
        let writer = BufWriter::new(w);

        match opts.output_type {
            OutputType::Text => encode_all(&words, TextEncoder::new(writer))?,
            OutputType::Json => encode_all(&words, JsonArrayEncoder::new(writer))?,
            OutputType::Vtt => encode_all(&words, VttEncoder::new(writer))?,
        }
        Ok(words.len())
    }

    /// The indexed episode with this id, if any.
    pub fn episode(&self, episode_id: &str) -> Option<&Episode> {
        self.episodes.get(episode_id)
    }

    /// Whether an episode with this id has been indexed.
    pub fn contains(&self, episode_id: &str) -> bool {
        self.episodes.contains_key(episode_id)
    }

    /// Ids of all indexed episodes, in no particular order.
    pub fn episode_ids(&self) -> impl Iterator<Item = &str> {
        self.episodes.keys().map(String::as_str)
    }

    /// Number of indexed episodes.
    pub fn len(&self) -> usize {
        self.episodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.episodes.is_empty()
    }

    /// The tokenizer used for every episode in this index.
    pub fn tokenizer(&self) -> &T {
        &self.tokenizer
    }
}

fn is_forward_range(start: f64, end: f64) -> bool {
    matches!(start.partial_cmp(&end), Some(std::cmp::Ordering::Less))
}

/// Feed every word to `encoder`, then close it even if a write failed.
fn encode_all<E: WordEncoder>(words: &[&WordInterval], mut encoder: E) -> Result<()> {
    let run_res = words.iter().try_for_each(|word| encoder.write_word(word));
    merge_run_and_close(run_res, encoder.close())
}

/// Prefer the first write error; otherwise report a failed close.
fn merge_run_and_close(run_res: Result<()>, close_res: Result<()>) -> Result<()> {
    match (run_res, close_res) {
        (Ok(()), Ok(())) => Ok(()),
        (Ok(()), Err(close_err)) => Err(close_err),
        (Err(err), _) => Err(err),
    }
}
