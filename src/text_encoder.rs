use std::io::Write;

use crate::episode::WordInterval;
use crate::word_encoder::WordEncoder;
use crate::{Error, Result};

/// A `WordEncoder` that writes matched words separated by single spaces.
///
/// The body is exactly what `TranscriptionIndex::search` returns; a trailing newline is added
/// on close when at least one word was written.
pub struct TextEncoder<W: Write> {
    w: W,

    /// Whether no word has been written yet.
    first: bool,

    closed: bool,
}

impl<W: Write> TextEncoder<W> {
    pub fn new(w: W) -> Self {
        Self {
            w,
            first: true,
            closed: false,
        }
    }
}

impl<W: Write> WordEncoder for TextEncoder<W> {
    fn write_word(&mut self, word: &WordInterval) -> Result<()> {
        if self.closed {
            return Err(Error::msg("cannot write word: encoder is already closed"));
        }

        if !self.first {
            self.w.write_all(b" ")?;
        }
        self.first = false;

        self.w.write_all(word.text.as_bytes())?;
        Ok(())
    }

    fn close(&mut self) -> Result<()> {
        if self.closed {
            return Ok(());
        }

        if !self.first {
            self.w.write_all(b"\n")?;
        }
        self.w.flush()?;

        self.closed = true;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::interval::Span;

    #[test]
    fn text_joins_words_with_single_spaces() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        for (i, text) in ["when", "the", "honeycrisp"].into_iter().enumerate() {
            let start = i as f64;
            enc.write_word(&WordInterval::new(Span::new(start, start + 1.0), text))?;
        }
        enc.close()?;

        assert_eq!(std::str::from_utf8(&out)?, "when the honeycrisp\n");
        Ok(())
    }

    #[test]
    fn text_close_without_words_emits_nothing() -> anyhow::Result<()> {
        let mut out = Vec::new();
        let mut enc = TextEncoder::new(&mut out);
        enc.close()?;
        enc.close()?;
        assert!(out.is_empty());
        Ok(())
    }
}
