//! Parsing raw transcripts into coarse lines.
//!
//! The expected layout is a timestamp line, one line of transcript, then blank lines:
//!
//! ```text
//! 0:00
//! First line of speech
//!
//! 1:02
//! Second line of speech
//! ```
//!
//! Lines that are neither a timestamp nor the transcript following one (headers, credits)
//! are skipped.

use std::str::Split;
use std::sync::LazyLock;

use regex::Regex;
use tracing::trace;

use crate::segments::CoarseLine;
use crate::{Error, Result};

static TIMESTAMP_PATTERN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^(?:(\d+):)?(\d+):(\d\d)").expect("timestamp pattern must be valid")
});

/// Parse an `h:m:ss` or `m:ss` timestamp at the start of `text` into whole seconds.
///
/// Returns `Ok(None)` when `text` does not start with a timestamp.
pub fn parse_timestamp(text: &str) -> Result<Option<u64>> {
    let Some(caps) = TIMESTAMP_PATTERN.captures(text) else {
        return Ok(None);
    };

    let field = |idx: usize| -> Result<u64> {
        match caps.get(idx) {
            None => Ok(0),
            Some(m) => m
                .as_str()
                .parse::<u64>()
                .map_err(|_| Error::InvalidTimestamp(text.to_owned())),
        }
    };

    let hours = field(1)?;
    let minutes = field(2)?;
    let seconds = field(3)?;
    if seconds > 60 {
        return Err(Error::InvalidTimestamp(text.to_owned()));
    }

    hours
        .checked_mul(3600)
        .and_then(|h| minutes.checked_mul(60).and_then(|m| h.checked_add(m)))
        .and_then(|hm| hm.checked_add(seconds))
        .map(Some)
        .ok_or_else(|| Error::InvalidTimestamp(text.to_owned()))
}

/// Parse a time given either as plain seconds (`482`, `482.5`) or as a timestamp (`8:02`).
///
/// `inf` is accepted and reads as an unknown length. `NaN` is rejected.
pub fn parse_seconds(text: &str) -> Result<f64> {
    let text = text.trim();
    if let Ok(seconds) = text.parse::<f64>() {
        if seconds.is_nan() {
            return Err(Error::InvalidTimestamp(text.to_owned()));
        }
        return Ok(seconds);
    }

    match parse_timestamp(text)? {
        Some(seconds) => Ok(seconds as f64),
        None => Err(Error::InvalidTimestamp(text.to_owned())),
    }
}

/// A transcript line and the timestamp that precedes it.
#[derive(Debug, Clone, PartialEq)]
pub struct TimedLine {
    pub start_seconds: f64,
    pub text: String,
}

/// Iterator over the `(timestamp, line)` pairs of a raw transcript.
pub struct TimedLines<'a> {
    lines: Split<'a, char>,
    pending: Option<u64>,
}

impl<'a> TimedLines<'a> {
    pub fn new(content: &'a str) -> Self {
        Self {
            lines: content.split('\n'),
            pending: None,
        }
    }
}

impl Iterator for TimedLines<'_> {
    type Item = Result<TimedLine>;

    fn next(&mut self) -> Option<Self::Item> {
        for raw in self.lines.by_ref() {
            let line = raw.trim();
            if line.is_empty() {
                continue;
            }

            match self.pending.take() {
                Some(seconds) => {
                    return Some(Ok(TimedLine {
                        start_seconds: seconds as f64,
                        text: line.to_owned(),
                    }));
                }
                None => match parse_timestamp(line) {
                    Ok(Some(seconds)) => self.pending = Some(seconds),
                    Ok(None) => trace!(line, "skipping line outside a timestamped entry"),
                    Err(err) => return Some(Err(err)),
                },
            }
        }

        None
    }
}

/// Parse a raw transcript into contiguous coarse lines.
///
/// Each line ends where the next one starts; the last one ends at `episode_length`, which
/// must not be NaN.
pub fn coarse_lines(content: &str, episode_length: f64) -> Result<Vec<CoarseLine>> {
    if episode_length.is_nan() {
        return Err(Error::invalid_content("episode length is not a number"));
    }

    let timed = TimedLines::new(content).collect::<Result<Vec<_>>>()?;

    let mut out = Vec::with_capacity(timed.len());
    let mut iter = timed.into_iter().peekable();
    while let Some(line) = iter.next() {
        let end = match iter.peek() {
            Some(next) => {
                if next.start_seconds <= line.start_seconds {
                    return Err(Error::invalid_content(format!(
                        "timestamp {}s does not follow {}s",
                        next.start_seconds, line.start_seconds
                    )));
                }
                next.start_seconds
            }
            None => {
                if episode_length < line.start_seconds {
                    return Err(Error::invalid_content(format!(
                        "episode length {episode_length}s ends before the last line at {}s",
                        line.start_seconds
                    )));
                }
                episode_length
            }
        };

        out.push(CoarseLine::new(line.start_seconds, end, line.text));
    }

    Ok(out)
}
