//! Idempotency replay middleware and its backing store.
//!
//! Mutating requests must carry an `Idempotency-Key` header with a non-nil
//! UUID. The first request under a key runs the handler and records the
//! response; retries under the same key get the recorded response replayed
//! without re-running the handler. Two truly simultaneous first attempts
//! may both run the handler; only sequential retries are deduplicated.
//!
//! The replay store is best-effort: a read failure is a cache miss and a
//! write failure never fails the original request.

use crate::state::AppState;
use async_trait::async_trait;
use axum::body::Body;
use axum::extract::{Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::http::{HeaderMap, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use dashmap::DashMap;
use dramshelf_core::{CachedResponse, IdempotencyKey};
use serde::Serialize;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};
use uuid::Uuid;

/// Header carrying the client-supplied idempotency key.
pub const IDEMPOTENCY_KEY_HEADER: &str = "idempotency-key";

/// URN identifying idempotency-key validation failures.
const IDEMPOTENCY_PROBLEM_TYPE: &str = "urn:dramshelf:validation-error:idempotency-key";

/// Fixed validation-problem document returned for a missing or malformed
/// idempotency key.
#[derive(Debug, Serialize)]
pub struct ValidationProblem {
    #[serde(rename = "type")]
    pub problem_type: String,
    pub title: String,
    pub status: u16,
    pub errors: HashMap<String, Vec<String>>,
}

impl ValidationProblem {
    /// The fixed document for idempotency-key violations.
    pub fn idempotency_key() -> Self {
        let mut errors = HashMap::new();
        errors.insert(
            "idempotencyKey".to_string(),
            vec!["The Idempotency-Key header must be a non-empty, non-zero UUID.".to_string()],
        );
        Self {
            problem_type: IDEMPOTENCY_PROBLEM_TYPE.to_string(),
            title: "Missing or empty idempotency key".to_string(),
            status: 400,
            errors,
        }
    }
}

impl IntoResponse for ValidationProblem {
    fn into_response(self) -> Response {
        (StatusCode::BAD_REQUEST, axum::Json(self)).into_response()
    }
}

/// Replay store error. Callers treat any error as a miss or a dropped
/// write; the variant detail only feeds the logs.
#[derive(Debug, thiserror::Error)]
#[error("replay store error: {0}")]
pub struct ReplayStoreError(pub String);

/// Key/value store holding serialized cached responses.
///
/// Single-key get/set are assumed atomic. Eviction and expiry are the
/// store's own concern.
#[async_trait]
pub trait ReplayStore: Send + Sync {
    /// Fetch the stored value for a key, if any.
    async fn get(&self, key: &IdempotencyKey) -> Result<Option<String>, ReplayStoreError>;

    /// Store a value under a key, optionally expiring after `ttl`.
    async fn set(
        &self,
        key: &IdempotencyKey,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), ReplayStoreError>;
}

struct StoredValue {
    value: String,
    expires_at: Option<Instant>,
}

/// In-memory replay store with TTL-based expiry.
#[derive(Default)]
pub struct MemoryReplayStore {
    entries: DashMap<Uuid, StoredValue>,
}

impl MemoryReplayStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Drop expired entries. Called periodically from the sweeper task.
    ///
    /// Removals are counted inside the retain pass; comparing lengths
    /// before and after would underflow when writes land concurrently.
    pub fn sweep_expired(&self) {
        let now = Instant::now();
        let mut removed = 0usize;
        self.entries.retain(|_, v| {
            let keep = v.expires_at.map(|at| at > now).unwrap_or(true);
            if !keep {
                removed += 1;
            }
            keep
        });
        if removed > 0 {
            tracing::debug!(removed, "swept expired replay cache entries");
        }
    }

    /// Number of live entries (expired entries may still be counted until
    /// the next sweep or read).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

#[async_trait]
impl ReplayStore for MemoryReplayStore {
    async fn get(&self, key: &IdempotencyKey) -> Result<Option<String>, ReplayStoreError> {
        match self.entries.get(key.as_uuid()) {
            Some(entry) => {
                if let Some(at) = entry.expires_at {
                    if at <= Instant::now() {
                        drop(entry);
                        self.entries.remove(key.as_uuid());
                        return Ok(None);
                    }
                }
                Ok(Some(entry.value.clone()))
            }
            None => Ok(None),
        }
    }

    async fn set(
        &self,
        key: &IdempotencyKey,
        value: String,
        ttl: Option<Duration>,
    ) -> Result<(), ReplayStoreError> {
        self.entries.insert(
            *key.as_uuid(),
            StoredValue {
                value,
                expires_at: ttl.map(|ttl| Instant::now() + ttl),
            },
        );
        Ok(())
    }
}

/// Store-and-replay cache for mutating requests.
///
/// Thin wrapper over a [`ReplayStore`] that serializes
/// [`CachedResponse`] records and applies the configured TTL.
#[derive(Clone)]
pub struct ReplayCache {
    store: Arc<dyn ReplayStore>,
    ttl: Duration,
}

impl ReplayCache {
    pub fn new(store: Arc<dyn ReplayStore>, ttl: Duration) -> Self {
        Self { store, ttl }
    }

    /// Look up a previously recorded response.
    ///
    /// Store errors, missing keys, and values that do not parse as a
    /// response record all come back as `None`.
    pub async fn try_get_cached(&self, key: &IdempotencyKey) -> Option<CachedResponse> {
        match self.store.get(key).await {
            Ok(Some(value)) => CachedResponse::from_store_value(&value),
            Ok(None) => None,
            Err(e) => {
                tracing::warn!(%key, error = %e, "replay store read failed, treating as miss");
                None
            }
        }
    }

    /// Record a response under a key, best-effort.
    pub async fn add_to_cache(&self, key: &IdempotencyKey, response: &CachedResponse) {
        let value = match response.to_store_value() {
            Ok(value) => value,
            Err(e) => {
                tracing::warn!(%key, error = %e, "failed to serialize response for replay cache");
                return;
            }
        };
        if let Err(e) = self.store.set(key, value, Some(self.ttl)).await {
            tracing::warn!(%key, error = %e, "replay store write failed, response not cached");
        }
    }
}

/// Spawn the periodic expiry sweeper for an in-memory store.
pub fn spawn_sweeper(store: Arc<MemoryReplayStore>, interval: Duration) {
    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        loop {
            ticker.tick().await;
            store.sweep_expired();
        }
    });
}

/// Collect replayable headers from a response, excluding the entity
/// headers the replay path manages itself.
fn collect_headers(headers: &HeaderMap) -> Vec<(String, Vec<String>)> {
    let mut collected: Vec<(String, Vec<String>)> = Vec::new();
    for (name, value) in headers {
        let name_str = name.as_str();
        if name_str.eq_ignore_ascii_case("content-type")
            || name_str.eq_ignore_ascii_case("content-length")
        {
            continue;
        }
        let Ok(value_str) = value.to_str() else {
            continue;
        };
        match collected.iter_mut().find(|(n, _)| n == name_str) {
            Some((_, values)) => values.push(value_str.to_string()),
            None => collected.push((name_str.to_string(), vec![value_str.to_string()])),
        }
    }
    collected
}

/// Build the replayed response from a recorded one.
///
/// A blank recorded body gates both the body and the content-type: neither
/// is emitted, even if a content-type was recorded.
fn replay_response(cached: &CachedResponse) -> Response {
    let mut builder = Response::builder().status(cached.status_code);
    for (name, values) in &cached.headers {
        for value in values {
            builder = builder.header(name, value);
        }
    }

    let result = if cached.has_body() {
        if let Some(content_type) = &cached.content_type {
            builder = builder.header(CONTENT_TYPE, content_type);
        }
        builder.body(Body::from(cached.body.clone()))
    } else {
        builder.body(Body::empty())
    };

    result.unwrap_or_else(|e| {
        tracing::error!(error = %e, "failed to rebuild cached response");
        StatusCode::INTERNAL_SERVER_ERROR.into_response()
    })
}

/// Request filter wrapping every mutating route.
///
/// Non-mutating methods pass straight through. For mutating methods:
/// 1. a missing or malformed key short-circuits with the fixed 400
///    validation problem, without invoking the handler;
/// 2. a cache hit replays the recorded response, without invoking the
///    handler;
/// 3. a miss runs the handler, records its response (body permitting) and
///    returns it unchanged.
pub async fn idempotency_middleware(
    State(state): State<AppState>,
    req: Request,
    next: Next,
) -> Response {
    let mutating = matches!(
        *req.method(),
        Method::POST | Method::PUT | Method::DELETE | Method::PATCH
    );
    if !mutating {
        return next.run(req).await;
    }

    let header = req
        .headers()
        .get(IDEMPOTENCY_KEY_HEADER)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("");
    let key = match IdempotencyKey::parse(header) {
        Ok(key) => key,
        Err(_) => return ValidationProblem::idempotency_key().into_response(),
    };

    if let Some(cached) = state.replay.try_get_cached(&key).await {
        tracing::debug!(%key, status = cached.status_code, "replaying cached response");
        return replay_response(&cached);
    }

    let response = next.run(req).await;

    let (parts, body) = response.into_parts();
    let bytes = match axum::body::to_bytes(body, usize::MAX).await {
        Ok(bytes) => bytes,
        Err(e) => {
            tracing::error!(%key, error = %e, "failed to buffer response body");
            return StatusCode::INTERNAL_SERVER_ERROR.into_response();
        }
    };

    let max_body_bytes = state.config.idempotency.max_body_bytes;
    if bytes.len() > max_body_bytes {
        tracing::warn!(
            %key,
            body_bytes = bytes.len(),
            max_body_bytes,
            "response body exceeds replay limit, not cached"
        );
        return Response::from_parts(parts, Body::from(bytes));
    }

    let cached = CachedResponse {
        status_code: parts.status.as_u16(),
        body: String::from_utf8_lossy(&bytes).into_owned(),
        content_type: parts
            .headers
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .map(str::to_string),
        headers: collect_headers(&parts.headers),
    };
    state.replay.add_to_cache(&key, &cached).await;

    Response::from_parts(parts, Body::from(bytes))
}
