//! Prometheus metrics for the index server.

use std::sync::OnceLock;

use axum::body::Body;
use axum::extract::MatchedPath;
use axum::http::{HeaderValue, Request, StatusCode, header};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use prometheus::core::Collector;
use prometheus::{
    Encoder, Histogram, HistogramOpts, IntCounter, IntCounterVec, IntGauge, Opts as PromOpts,
    Registry, TextEncoder,
};

/// Buckets for the number of words a single search returns.
const MATCHED_WORD_BUCKETS: &[f64] = &[0.0, 1.0, 5.0, 10.0, 25.0, 50.0, 100.0, 250.0, 1000.0];

struct Metrics {
    registry: Registry,

    /// Requests by matched route and response status.
    requests: IntCounterVec,

    /// Transcripts refused at ingestion (parse or timeline errors).
    rejected_transcripts: IntCounter,

    /// Words returned per search.
    matched_words: Histogram,

    /// Episodes currently held by the index.
    episodes: IntGauge,
}

static METRICS: OnceLock<Metrics> = OnceLock::new();

fn register<C: Collector + Clone + 'static>(registry: &Registry, collector: C) -> C {
    registry
        .register(Box::new(collector.clone()))
        .expect("metric names must be unique");
    collector
}

fn metrics() -> &'static Metrics {
    METRICS.get_or_init(|| {
        let registry = Registry::new();

        let requests = IntCounterVec::new(
            PromOpts::new(
                "transcript_index_requests_total",
                "Requests served, by route and status.",
            ),
            &["route", "status"],
        )
        .expect("metrics definition must be valid");

        let rejected_transcripts = IntCounter::new(
            "transcript_index_rejected_transcripts_total",
            "Transcripts refused because they could not be parsed or checked.",
        )
        .expect("metrics definition must be valid");

        let matched_words = Histogram::with_opts(
            HistogramOpts::new(
                "transcript_index_search_matched_words",
                "Number of words returned by a search.",
            )
            .buckets(MATCHED_WORD_BUCKETS.to_vec()),
        )
        .expect("metrics definition must be valid");

        let episodes = IntGauge::new(
            "transcript_index_episodes",
            "Number of episodes currently held by the index.",
        )
        .expect("metrics definition must be valid");

        Metrics {
            requests: register(&registry, requests),
            rejected_transcripts: register(&registry, rejected_transcripts),
            matched_words: register(&registry, matched_words),
            episodes: register(&registry, episodes),
            registry,
        }
    })
}

pub fn init() {
    let _ = metrics();
}

pub fn set_episodes(count: usize) {
    metrics()
        .episodes
        .set(i64::try_from(count).unwrap_or(i64::MAX));
}

pub fn record_rejected_transcript() {
    metrics().rejected_transcripts.inc();
}

pub fn record_search(matched: usize) {
    metrics().matched_words.observe(matched as f64);
}

pub async fn prometheus_metrics() -> Response {
    let mut buf = Vec::new();
    if let Err(err) = TextEncoder::new().encode(&metrics().registry.gather(), &mut buf) {
        return (StatusCode::INTERNAL_SERVER_ERROR, err.to_string()).into_response();
    }

    (
        [(
            header::CONTENT_TYPE,
            HeaderValue::from_static("text/plain; version=0.0.4; charset=utf-8"),
        )],
        buf,
    )
        .into_response()
}

/// Count every request against its route template, so `/v1/episodes/{id}` stays one series.
pub async fn count_requests(req: Request<Body>, next: Next) -> Response {
    let route = req
        .extensions()
        .get::<MatchedPath>()
        .map_or("unmatched", MatchedPath::as_str)
        .to_owned();

    let response = next.run(req).await;
    let status = response.status();
    metrics()
        .requests
        .with_label_values(&[route.as_str(), status.as_str()])
        .inc();

    response
}
