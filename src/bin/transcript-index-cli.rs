use std::io;
use std::path::PathBuf;

use anyhow::{Context, Result, anyhow};
use clap::Parser;

use transcript_index::output_type::OutputType;
use transcript_index::parser::parse_seconds;
use transcript_index::{
    Opts, RegexTokenizer, Tokenizer, TranscriptionIndex, UNKNOWN_EPISODE_LENGTH,
    WhitespaceTokenizer,
};

fn main() -> Result<()> {
    transcript_index::logging::init_pretty();
    let params = Params::parse();

    let episode_id = match params.episode_id {
        Some(id) => id,
        None => params
            .transcript_path
            .file_stem()
            .and_then(|stem| stem.to_str())
            .map(str::to_owned)
            .ok_or_else(|| anyhow!("cannot derive an episode id; pass --episode-id"))?,
    };

    let episode_length = match params.episode_length.as_deref() {
        Some(raw) => parse_seconds(raw).context("invalid --episode-length")?,
        None => UNKNOWN_EPISODE_LENGTH,
    };
    let start = parse_seconds(&params.start).context("invalid --start")?;
    let end = parse_seconds(&params.end).context("invalid --end")?;

    let tokenizer: Box<dyn Tokenizer> = match params.token_pattern.as_deref() {
        Some(pattern) => Box::new(RegexTokenizer::new(pattern)?),
        None => Box::new(WhitespaceTokenizer),
    };

    let mut index = TranscriptionIndex::with_tokenizer(tokenizer);
    index
        .add_transcript_file(&episode_id, &params.transcript_path, episode_length)
        .with_context(|| {
            format!(
                "failed to index transcript: {}",
                params.transcript_path.display()
            )
        })?;

    let opts = Opts {
        output_type: params.output_type,
    };
    let stdout = io::stdout();
    index.write_search(&episode_id, start, end, stdout.lock(), &opts)?;
    Ok(())
}

#[derive(Parser, Debug)]
#[command(name = "transcript-index")]
#[command(about = "Print the words spoken between two times of a transcript")]
struct Params {
    /// Transcript file: a timestamp line (`m:ss` or `h:mm:ss`), a line of speech, a blank line.
    #[arg(short = 'i', long = "transcript")]
    transcript_path: PathBuf,

    /// Episode id; defaults to the transcript's file stem.
    #[arg(long = "episode-id")]
    episode_id: Option<String>,

    /// Episode length (seconds or timestamp). Unknown when omitted.
    #[arg(short = 'l', long = "episode-length")]
    episode_length: Option<String>,

    /// Query start (seconds or timestamp).
    #[arg(short = 's', long = "start")]
    start: String,

    /// Query end (seconds or timestamp).
    #[arg(short = 'e', long = "end")]
    end: String,

    #[arg(
        short = 'o',
        long = "output-type",
        value_enum,
        default_value_t = OutputType::Text
    )]
    output_type: OutputType,

    /// Regex whose matches are the words of a line; whitespace splitting when omitted.
    #[arg(long = "token-pattern")]
    token_pattern: Option<String>,
}
