use std::io::Write;

use crate::Result;
use crate::episode::WordInterval;
use crate::word_encoder::WordEncoder;

/// A `WordEncoder` that writes matched words as a single JSON array.
///
/// Design:
/// - Words are serialized straight into the writer one at a time, so a long search result
///   is never held as one big JSON value.
/// - The opening `[` is deferred until the first word or `close`, which keeps the output a
///   valid array (`[]`) when nothing matched.
///
/// Example output:
/// ```json
/// [
///   { "start_seconds": 4.0000000001, "end_seconds": 4.9999999999, "text": "when" },
///   { "start_seconds": 5.0000000001, "end_seconds": 5.9999999999, "text": "the" }
/// ]
/// ```
pub struct JsonArrayEncoder<W: Write> {
    /// Destination for the JSON text.
    w: W,

    /// Whether the opening `[` has been written.
    started: bool,

    /// Whether the next element is the first, so no comma precedes it.
    first: bool,

    /// Set by `close`; later writes are refused.
    closed: bool,
}

impl<W: Write> JsonArrayEncoder<W> {
    /// Wrap `w`. Nothing is written until the first word or `close`.
    pub fn new(w: W) -> Self {
        Self {
            w,
            started: false,
            first: true,
            closed: false,
        }
    }

    /// Emit the opening `[` exactly once.
    fn start_if_needed(&mut self) -> Result<()> {
        if !self.started {
            self.w.write_all(b"[")?;
            self.started = true;
        }
        Ok(())
    }
}

impl<W: Write> WordEncoder for JsonArrayEncoder<W> {
    /// Append one word object to the array.
    fn write_word(&mut self, word: &WordInterval) -> Result<()> {
        if self.closed {
            return Err(crate::Error::msg(
                "cannot write word: encoder is already closed",
            ));
        }

        self.start_if_needed()?;

        // Separator before every element but the first.
        if !self.first {
            self.w.write_all(b",")?;
        }
        self.first = false;

        serde_json::to_writer(&mut self.w, word)?;
        Ok(())
    }

    /// Finalize the JSON array and flush.
    ///
    /// Idempotent: a second call does nothing, and any write after the first call fails.
    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        // An empty result still needs its `[` before the closing bracket.
        self.start_if_needed()?;
        self.w.write_all(b"]")?;
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Span;

    fn word(start: f64, end: f64, text: &str) -> WordInterval {
        WordInterval::new(Span::new(start, end), text)
    }

    #[test]
    fn json_array_close_without_words_emits_empty_array() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.close()?;
        assert_eq!(std::str::from_utf8(&out)?, "[]");
        Ok(())
    }

    #[test]
    fn json_array_writes_word_intervals() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);

        enc.write_word(&word(0.0, 1.0, "hello"))?;
        enc.write_word(&word(1.0, 2.5, "world"))?;
        enc.close()?;

        let parsed: serde_json::Value = serde_json::from_slice(&out)?;
        let arr = parsed.as_array().expect("expected JSON array");
        assert_eq!(arr.len(), 2);
        assert_eq!(arr[0]["text"], "hello");
        assert_eq!(arr[1]["text"], "world");
        assert_eq!(arr[1]["start_seconds"], 1.0);
        assert_eq!(arr[1]["end_seconds"], 2.5);
        Ok(())
    }

    #[test]
    fn json_array_write_after_close_errors() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = JsonArrayEncoder::new(&mut out);
        enc.close()?;
        enc.close()?;
        let err = enc.write_word(&word(0.0, 1.0, "nope")).unwrap_err();
        assert!(err.to_string().contains("already closed"));
        Ok(())
    }
}
