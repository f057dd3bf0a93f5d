use std::net::SocketAddr;
use std::path::{Path, PathBuf};
use std::sync::{Arc, RwLock};

use anyhow::{Context, Result};
use axum::extract::{DefaultBodyLimit, Path as UrlPath, Query, State};
use axum::http::{HeaderMap, HeaderValue, StatusCode, header};
use axum::middleware::from_fn;
use axum::response::{IntoResponse, Response};
use axum::routing::{get, put};
use axum::{Json, Router};
use clap::Parser;
use serde::{Deserialize, Serialize};
use tokio::net::TcpListener;
use tower_http::trace::{DefaultMakeSpan, DefaultOnFailure, DefaultOnResponse, TraceLayer};
use tracing::{Level, error, info, warn};

mod metrics;

use transcript_index::parser::{coarse_lines, parse_seconds};
use transcript_index::segments::check_lines;
use transcript_index::{
    CoarseLine, Opts, OutputType, TranscriptionIndex, UNKNOWN_EPISODE_LENGTH,
};

#[derive(Parser, Debug)]
#[command(name = "transcript-index-server")]
#[command(about = "HTTP server for time range queries over transcripts")]
struct Params {
    /// Host interface to bind to.
    #[arg(long = "host", default_value = "127.0.0.1")]
    host: String,

    /// TCP port to listen on.
    #[arg(long = "port", default_value_t = 8080)]
    port: u16,

    /// Maximum request body size (bytes).
    #[arg(long = "max-bytes", default_value_t = 16 * 1024 * 1024)]
    max_bytes: usize,

    /// Directory of `*.txt` transcripts to index at startup, keyed by file stem.
    #[arg(long = "transcript-dir")]
    transcript_dir: Option<PathBuf>,
}

#[derive(Clone)]
struct AppState {
    index: Arc<RwLock<TranscriptionIndex>>,
}

#[derive(Debug, Deserialize)]
struct AddQuery {
    /// Seconds or a transcript timestamp. Unknown when omitted.
    #[serde(default)]
    episode_length: Option<String>,
}

#[derive(Debug, Deserialize)]
struct SearchQuery {
    start: f64,
    end: f64,
    #[serde(default, alias = "output_type")]
    output: Option<String>,
}

#[derive(Debug, Serialize)]
struct EpisodesResponse {
    episode_ids: Vec<String>,
}

#[derive(Debug, Serialize)]
struct ErrorBody {
    error: String,
}

struct AppError {
    status: StatusCode,
    message: String,
}

impl AppError {
    fn bad_request(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            message: message.into(),
        }
    }

    fn internal(message: impl Into<String>) -> Self {
        Self {
            status: StatusCode::INTERNAL_SERVER_ERROR,
            message: message.into(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let body = Json(ErrorBody {
            error: self.message,
        });
        (self.status, body).into_response()
    }
}

#[tokio::main]
async fn main() {
    transcript_index::init_logging();

    if let Err(err) = run().await {
        error!(error = ?err, "transcript-index-server failed");
        std::process::exit(1);
    }
}

async fn run() -> Result<()> {
    let params = Params::parse();

    metrics::init();

    let addr: SocketAddr = format!("{}:{}", params.host, params.port)
        .parse()
        .context("invalid host/port bind address")?;

    let mut index = TranscriptionIndex::new();
    if let Some(dir) = &params.transcript_dir {
        preload_transcripts(&mut index, dir)?;
    }
    metrics::set_episodes(index.len());

    let state = AppState {
        index: Arc::new(RwLock::new(index)),
    };

    let app = Router::new()
        .route("/", get(root))
        .route("/healthz", get(healthz))
        .route("/metrics", get(metrics::prometheus_metrics))
        .route("/v1/episodes", get(list_episodes))
        .route("/v1/episodes/{id}", put(add_episode))
        .route("/v1/episodes/{id}/search", get(search_episode))
        .route_layer(from_fn(metrics::count_requests))
        .with_state(state)
        .layer(DefaultBodyLimit::max(params.max_bytes))
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(
                    DefaultMakeSpan::new()
                        .level(Level::INFO)
                        .include_headers(false),
                )
                .on_response(DefaultOnResponse::new().level(Level::INFO))
                .on_failure(DefaultOnFailure::new().level(Level::ERROR)),
        );

    let listener = TcpListener::bind(addr).await.context("bind failed")?;
    info!(%addr, "listening");
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("server error")?;

    Ok(())
}

fn preload_transcripts(index: &mut TranscriptionIndex, dir: &Path) -> Result<()> {
    let entries = std::fs::read_dir(dir)
        .with_context(|| format!("failed to read transcript dir: {}", dir.display()))?;

    for entry in entries {
        let path = entry?.path();
        if path.extension().and_then(|ext| ext.to_str()) != Some("txt") {
            continue;
        }

        let Some(episode_id) = path.file_stem().and_then(|stem| stem.to_str()) else {
            warn!(path = %path.display(), "skipping transcript with a non UTF-8 name");
            continue;
        };

        index
            .add_transcript_file(episode_id, &path, UNKNOWN_EPISODE_LENGTH)
            .with_context(|| format!("failed to index transcript: {}", path.display()))?;
    }

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        warn!(error = ?err, "failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    info!("shutting down");
}

async fn root() -> &'static str {
    "transcript-index-server: PUT /v1/episodes/{id} (transcript text or JSON lines), GET /v1/episodes/{id}/search?start=&end="
}

async fn healthz() -> &'static str {
    "ok"
}

async fn list_episodes(
    State(state): State<AppState>,
) -> std::result::Result<Json<EpisodesResponse>, AppError> {
    let index = state
        .index
        .read()
        .map_err(|_| AppError::internal("index lock poisoned"))?;

    let mut episode_ids: Vec<String> = index.episode_ids().map(str::to_owned).collect();
    episode_ids.sort_unstable();

    Ok(Json(EpisodesResponse { episode_ids }))
}

/// Index the request body as an episode.
///
/// The body is a raw transcript, or a JSON array of `{start_seconds, end_seconds, text}`
/// lines when sent as `application/json`.
async fn add_episode(
    State(state): State<AppState>,
    UrlPath(episode_id): UrlPath<String>,
    Query(query): Query<AddQuery>,
    headers: HeaderMap,
    body: String,
) -> std::result::Result<StatusCode, AppError> {
    let episode_length = match query.episode_length.as_deref() {
        Some(raw) => parse_seconds(raw).map_err(|err| AppError::bad_request(err.to_string()))?,
        None => UNKNOWN_EPISODE_LENGTH,
    };

    // Parse outside the lock; only the final swap needs exclusive access.
    let lines = parse_lines(&headers, &body, episode_length).map_err(|err| {
        metrics::record_rejected_transcript();
        AppError::bad_request(format!("{err:#}"))
    })?;

    let mut index = state
        .index
        .write()
        .map_err(|_| AppError::internal("index lock poisoned"))?;
    index.add(episode_id, lines, episode_length);
    metrics::set_episodes(index.len());

    Ok(StatusCode::NO_CONTENT)
}

fn parse_lines(headers: &HeaderMap, body: &str, episode_length: f64) -> Result<Vec<CoarseLine>> {
    let is_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"));

    if !is_json {
        return Ok(coarse_lines(body, episode_length)?);
    }

    let lines: Vec<CoarseLine> =
        serde_json::from_str(body).context("body is not a JSON array of lines")?;
    check_lines(&lines, episode_length)?;
    Ok(lines)
}

async fn search_episode(
    State(state): State<AppState>,
    UrlPath(episode_id): UrlPath<String>,
    Query(query): Query<SearchQuery>,
) -> std::result::Result<Response, AppError> {
    let output_type = match query.output.as_deref() {
        Some(raw) => raw
            .parse::<OutputType>()
            .map_err(|err| AppError::bad_request(err.to_string()))?,
        None => OutputType::Text,
    };
    let opts = Opts { output_type };

    let mut buf = Vec::new();
    {
        let index = state
            .index
            .read()
            .map_err(|_| AppError::internal("index lock poisoned"))?;
        let matched = index
            .write_search(&episode_id, query.start, query.end, &mut buf, &opts)
            .map_err(|err| AppError::internal(err.to_string()))?;
        metrics::record_search(matched);
    }

    let content_type = match opts.output_type {
        OutputType::Text => HeaderValue::from_static("text/plain; charset=utf-8"),
        OutputType::Json => HeaderValue::from_static("application/json; charset=utf-8"),
        OutputType::Vtt => HeaderValue::from_static("text/vtt; charset=utf-8"),
    };

    Ok(([(header::CONTENT_TYPE, content_type)], buf).into_response())
}
