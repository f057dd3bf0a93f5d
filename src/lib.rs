//! `transcript_index` answers "what words were spoken between time A and time B" for
//! transcripts that only carry coarse, per-line timestamps.
//!
//! This crate provides:
//! - Transcript parsing into timestamped lines
//! - Word-level interval reconstruction (even time distribution within a line)
//! - Two-level binary search range queries (line, then word)
//! - Pluggable tokenizers and output encoders (text, JSON, VTT)
//!
//! ```
//! use transcript_index::TranscriptionIndex;
//!
//! let mut index = TranscriptionIndex::new();
//! index.add_transcript("episode_1", "0:01\n a b c\n\n0:04\n d e f\n", 7.0)?;
//! assert_eq!(index.search("episode_1", 1.0, 4.0), "a b c");
//! # Ok::<(), transcript_index::Error>(())
//! ```

// High-level API (most consumers should start here).
pub mod index;
pub mod opts;

// Interval model and search.
pub mod episode;
pub mod interval;
pub mod search;

// Building episodes from transcripts.
pub mod parser;
pub mod segments;
pub mod tokenizer;

// Output selection and encoder interfaces.
pub mod output_type;
pub mod word_encoder;

// Output encoders that serialize matched words into various formats.
pub mod json_array_encoder;
pub mod text_encoder;
pub mod vtt_encoder;

// Logging configuration and control.
#[cfg(feature = "logging")]
pub mod logging;

mod error;

pub use episode::{Episode, LineInterval, WordInterval};
pub use error::{Error, Result};
pub use index::TranscriptionIndex;
pub use interval::{Endpoint, Interval, Span};
pub use opts::Opts;
pub use output_type::OutputType;
pub use segments::{CoarseLine, SHRINK_EPSILON, UNKNOWN_EPISODE_LENGTH};
pub use tokenizer::{RegexTokenizer, Tokenizer, WhitespaceTokenizer};

#[cfg(feature = "logging")]
pub use logging::init as init_logging;
