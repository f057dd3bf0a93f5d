use std::fmt;
use std::str::FromStr;

use crate::Error;

/// The supported output formats for matched words.
///
/// Each variant maps to a concrete `WordEncoder` implementation.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
#[cfg_attr(feature = "cli", derive(clap::ValueEnum))]
pub enum OutputType {
    /// Words joined by single spaces, the same string `search` returns.
    #[default]
    Text,

    /// Word intervals as a JSON array.
    Json,

    /// One WebVTT cue per word.
    Vtt,
}

impl FromStr for OutputType {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "text" | "txt" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            "vtt" | "webvtt" => Ok(Self::Vtt),
            other => Err(Error::msg(format!("unsupported output type: {other}"))),
        }
    }
}

impl fmt::Display for OutputType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Text => "text",
            Self::Json => "json",
            Self::Vtt => "vtt",
        };
        f.write_str(name)
    }
}
