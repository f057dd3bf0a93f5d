use crate::Result;
use crate::episode::WordInterval;

/// A sink for the words matched by a search, written in time order.
///
/// Implementations stream into an underlying writer and may hold state between words
/// (separators, a lazily written header).
pub trait WordEncoder {
    /// Encode one matched word. Fails once the encoder has been closed.
    fn write_word(&mut self, word: &WordInterval) -> Result<()>;

    /// Write any trailer and flush. Safe to call more than once.
    fn close(&mut self) -> Result<()>;
}
