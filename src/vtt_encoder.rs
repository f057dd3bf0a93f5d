use std::io::Write;

use crate::episode::WordInterval;
use crate::word_encoder::WordEncoder;
use crate::{Error, Result};

/// A `WordEncoder` that writes one WebVTT cue per matched word.
///
/// Design:
/// - Each word becomes its own cue, timed by the word's stored interval. Players then show
///   the words one at a time, which is the finest timing the index has.
/// - The `WEBVTT` header is written lazily on the first word, so a search that matches
///   nothing produces no output at all.
pub struct VttEncoder<W: Write> {
    /// Destination for the cue text.
    w: W,

    /// Whether the `WEBVTT` header has been written.
    started: bool,

    /// Set by `close`; later writes are refused.
    closed: bool,
}

impl<W: Write> VttEncoder<W> {
    /// Wrap `w`. Nothing is written until the first word.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            closed: false,
        }
    }

    /// Write the header, a mandatory `WEBVTT` line plus a blank line, exactly once.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"WEBVTT\n\n")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> WordEncoder for VttEncoder<W> {
    /// Write one cue: the timing line, the word, then the blank separator line.
    fn write_word(&mut self, word: &WordInterval) -> Result<()> {
        if self.closed {
            return Err(Error::msg("cannot write word: encoder is already closed"));
        }

        self.start_if_needed()?;

        let start = format_timestamp_vtt(word.start_seconds);
        let end = format_timestamp_vtt(word.end_seconds);

        writeln!(&mut self.w, "{start} --> {end}")?;
        // Written verbatim; transcript text is not expected to contain `-->`.
        writeln!(&mut self.w, "{}", word.text)?;
        writeln!(&mut self.w)?;

        Ok(())
    }

    /// Flush the writer. Idempotent; there is no trailer to write.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        self.w.flush()?;
        self.closed = true;

        Ok(())
    }
}

/// Format seconds into a WebVTT timestamp (`HH:MM:SS.mmm`), rounded to the nearest
/// millisecond. Negative and non-finite inputs clamp to zero.
fn format_timestamp_vtt(seconds: f64) -> String {
    let total_ms = if seconds.is_finite() && seconds > 0.0 {
        (seconds * 1000.0).round() as u64
    } else {
        0
    };

    let ms = total_ms % 1000;
    let total_s = total_ms / 1000;

    let s = total_s % 60;
    let total_m = total_s / 60;

    let m = total_m % 60;
    let h = total_m / 60;

    format!("{h:02}:{m:02}:{s:02}.{ms:03}")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Span;

    fn word(start: f64, end: f64, text: &str) -> WordInterval {
        WordInterval::new(Span::new(start, end), text)
    }

    #[test]
    fn vtt_close_without_words_emits_nothing() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "");
        Ok(())
    }

    #[test]
    fn vtt_writes_header_once_and_formats_cues() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);

        enc.write_word(&word(480.0000000001, 480.3636363635, "when"))?;
        enc.write_word(&word(3661.2, 3662.0, "the"))?;
        enc.close()?;

        let s = std::str::from_utf8(&out)?;
        assert!(s.starts_with("WEBVTT\n\n"));
        assert!(s.contains("00:08:00.000 --> 00:08:00.364\nwhen\n\n"));
        assert!(s.contains("01:01:01.200 --> 01:01:02.000\nthe\n\n"));
        assert_eq!(s.matches("WEBVTT").count(), 1);
        Ok(())
    }

    #[test]
    fn vtt_format_timestamp_clamps_invalid_input() {
        assert_eq!(format_timestamp_vtt(-1.0), "00:00:00.000");
        assert_eq!(format_timestamp_vtt(f64::INFINITY), "00:00:00.000");
        assert_eq!(format_timestamp_vtt(61.5), "00:01:01.500");
    }

    #[test]
    fn vtt_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = VttEncoder::new(&mut out);
        enc.close()?;
        let err = enc.write_word(&word(0.0, 1.0, "nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
