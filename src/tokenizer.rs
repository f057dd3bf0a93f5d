use regex::Regex;

use crate::Result;

/// Splits a transcript line into words.
///
/// Implementations must be deterministic and total, and must keep left-to-right word order.
/// Whitespace normalization is expected: joining the output with single spaces does not need
/// to reproduce the input.
pub trait Tokenizer {
    fn tokenize(&self, text: &str) -> Vec<String>;
}

impl<T: Tokenizer + ?Sized> Tokenizer for Box<T> {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

impl<T: Tokenizer + ?Sized> Tokenizer for &T {
    fn tokenize(&self, text: &str) -> Vec<String> {
        (**self).tokenize(text)
    }
}

/// Treats every maximal run of non-whitespace characters as a word.
#[derive(Debug, Clone, Copy, Default)]
pub struct WhitespaceTokenizer;

impl Tokenizer for WhitespaceTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        text.split_whitespace().map(str::to_owned).collect()
    }
}

/// Treats every non-overlapping match of a pattern as a word.
#[derive(Debug, Clone)]
pub struct RegexTokenizer {
    pattern: Regex,
}

impl RegexTokenizer {
    pub fn new(pattern: &str) -> Result<Self> {
        Ok(Self {
            pattern: Regex::new(pattern)?,
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }
}

impl Tokenizer for RegexTokenizer {
    fn tokenize(&self, text: &str) -> Vec<String> {
        self.pattern
            .find_iter(text)
            .map(|m| m.as_str().to_owned())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn whitespace_tokenizer_splits_simple_text() {
        let tokens = WhitespaceTokenizer.tokenize("this is a test.");
        assert_eq!(tokens, ["this", "is", "a", "test."]);
    }

    #[test]
    fn whitespace_tokenizer_collapses_repeated_whitespace() {
        let tokens = WhitespaceTokenizer.tokenize("    this  is \t      a test.    ");
        assert_eq!(tokens, ["this", "is", "a", "test."]);
    }

    #[test]
    fn whitespace_tokenizer_on_blank_text_is_empty() {
        assert!(WhitespaceTokenizer.tokenize("   ").is_empty());
    }

    #[test]
    fn regex_tokenizer_keeps_only_matches() -> anyhow::Result<()> {
        let tokenizer = RegexTokenizer::new(r"[\w']+")?;
        let tokens = tokenizer.tokenize("Well, it's -- fine.");
        assert_eq!(tokens, ["Well", "it's", "fine"]);
        Ok(())
    }

    #[test]
    fn regex_tokenizer_rejects_invalid_patterns() {
        assert!(RegexTokenizer::new("(").is_err());
    }

    #[test]
    fn boxed_tokenizers_delegate() {
        let tokenizer: Box<dyn Tokenizer> = Box::new(WhitespaceTokenizer);
        assert_eq!(tokenizer.tokenize("a b"), ["a", "b"]);
    }
}
