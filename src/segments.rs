//! Turning coarse, line-level timestamps into word-level intervals.

use serde::{Deserialize, Serialize};

use crate::episode::{Episode, LineInterval, WordInterval};
use crate::interval::Span;
use crate::tokenizer::Tokenizer;
use crate::{Error, Result};

/// How far every stored interval is moved inward at each end, in seconds.
///
/// Must stay well below the shortest realistic word duration (tens of milliseconds).
pub const SHRINK_EPSILON: f64 = 1e-10;

/// Episode length to use when the real length is unknown.
///
/// Words of the final line get zero-width intervals at the line's start, since there is no
/// end time to distribute.
pub const UNKNOWN_EPISODE_LENGTH: f64 = f64::INFINITY;

/// One transcribed line with the time range it covers (a "coarse triple").
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CoarseLine {
    pub start_seconds: f64,
    pub end_seconds: f64,
    pub text: String,
}

impl CoarseLine {
    pub fn new(start_seconds: f64, end_seconds: f64, text: impl Into<String>) -> Self {
        Self {
            start_seconds,
            end_seconds,
            text: text.into(),
        }
    }

    fn is_unbounded(&self, episode_length: f64) -> bool {
        episode_length == UNKNOWN_EPISODE_LENGTH && self.end_seconds == episode_length
    }
}

/// Check that coarse lines supplied directly (rather than parsed from a transcript) form a
/// valid timeline: finite starts, strictly increasing, each line ending no later than the next
/// one starts, and the last one ending at `episode_length`.
pub fn check_lines(lines: &[CoarseLine], episode_length: f64) -> Result<()> {
    if episode_length.is_nan() {
        return Err(Error::invalid_content("episode length is not a number"));
    }

    for (i, line) in lines.iter().enumerate() {
        if !line.start_seconds.is_finite() || line.end_seconds.is_nan() {
            return Err(Error::invalid_content(format!("line {i} has an invalid time range")));
        }
        if line.end_seconds < line.start_seconds {
            return Err(Error::invalid_content(format!(
                "line {i} ends at {}s before it starts at {}s",
                line.end_seconds, line.start_seconds
            )));
        }
        if let Some(next) = lines.get(i + 1) {
            if next.start_seconds <= line.start_seconds || line.end_seconds > next.start_seconds {
                return Err(Error::invalid_content(format!(
                    "line {} at {}s does not follow line {i}",
                    i + 1,
                    next.start_seconds
                )));
            }
        }
    }

    match lines.last() {
        Some(last) if last.end_seconds != episode_length => Err(Error::invalid_content(format!(
            "last line ends at {}s, not at the episode length {episode_length}s",
            last.end_seconds
        ))),
        _ => Ok(()),
    }
}

/// Build a whole episode from its coarse lines.
///
/// Lines keep their input order, which is already time-ascending when the input covers the
/// timeline contiguously. That is not checked here.
pub fn build_episode<T, I>(
    tokenizer: &T,
    episode_id: impl Into<String>,
    lines: I,
    episode_length: f64,
) -> Episode
where
    T: Tokenizer + ?Sized,
    I: IntoIterator<Item = CoarseLine>,
{
    let lines = lines
        .into_iter()
        .map(|line| {
            let unbounded = line.is_unbounded(episode_length);
            build_line(tokenizer, line, unbounded)
        })
        .collect();

    Episode::new(episode_id.into(), lines)
}

/// Tokenize a coarse line and give every word its share of the line's time.
///
/// Time is split evenly across words (a uniform speech rate within the line). When
/// `unbounded` is set, every word instead gets the zero-width interval `[start, start]`,
/// stored without shrinking.
pub fn build_line<T>(tokenizer: &T, line: CoarseLine, unbounded: bool) -> LineInterval
where
    T: Tokenizer + ?Sized,
{
    let tokens = tokenizer.tokenize(&line.text);
    let start = line.start_seconds;
    let span = Span::new(start, line.end_seconds);

    let words = if unbounded {
        tokens
            .into_iter()
            .map(|token| WordInterval::new(Span::point(start), token))
            .collect()
    } else {
        distribute(span, tokens)
    };

    LineInterval::new(span.shrink(SHRINK_EPSILON), line.text, words)
}

fn distribute(span: Span, tokens: Vec<String>) -> Vec<WordInterval> {
    if tokens.is_empty() {
        return Vec::new();
    }

    let step = span.duration() / tokens.len() as f64;
    tokens
        .into_iter()
        .enumerate()
        .map(|(i, token)| {
            let word_start = span.start_seconds + i as f64 * step;
            let word_end = span.start_seconds + (i + 1) as f64 * step;
            WordInterval::new(Span::new(word_start, word_end).shrink(SHRINK_EPSILON), token)
        })
        .collect()
}
