use tracing::level_filters::LevelFilter;
use tracing_subscriber::EnvFilter;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

/// Environment variable holding the log filter directives (e.g. `transcript_index=debug`).
pub const LOG_ENV_VAR: &str = "TRANSCRIPT_INDEX_LOG";

fn filter() -> EnvFilter {
    EnvFilter::builder()
        .with_env_var(LOG_ENV_VAR)
        .with_default_directive(LevelFilter::WARN.into())
        .from_env_lossy()
}

/// Initialize structured JSON logging on stderr.
///
/// Defaults to `warn` level unless overridden by `TRANSCRIPT_INDEX_LOG`. Only the first
/// initialization in a process takes effect.
pub fn init() {
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .json()
                .with_writer(std::io::stderr)
                .with_current_span(true)
                .with_span_list(true),
        )
        .try_init();
}

/// Initialize human-readable logging on stderr, for interactive use.
pub fn init_pretty() {
    let _ = tracing_subscriber::registry()
        .with(filter())
        .with(
            tracing_subscriber::fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(true),
        )
        .try_init();
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn init_is_idempotent() {
        init();
        init();
        init_pretty();
    }
}
