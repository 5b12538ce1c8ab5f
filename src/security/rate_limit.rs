//! Per-client fixed-window rate limiting.

use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{ConnectInfo, State},
    http::{header::RETRY_AFTER, HeaderName, HeaderValue, Request, StatusCode},
    middleware::Next,
    response::{IntoResponse, Response},
};
use dashmap::DashMap;
use tokio::sync::broadcast;
use tokio::time::{self, Instant};

use crate::config::RateLimitConfig;
use crate::observability::metrics;

pub const X_RATELIMIT_LIMIT: HeaderName = HeaderName::from_static("x-ratelimit-limit");
pub const X_RATELIMIT_REMAINING: HeaderName = HeaderName::from_static("x-ratelimit-remaining");

/// Counter for one client's current window.
#[derive(Debug, Clone, Copy)]
struct Window {
    started: Instant,
    count: u32,
}

/// Outcome of a single [`RateLimiter::check`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Decision {
    Allowed { remaining: u32 },
    Limited { retry_after: Duration },
}

/// Fixed-window limiter keyed by client. A window opens on the client's first
/// request and lasts `window`; at most `max_requests` pass within it.
pub struct RateLimiter {
    windows: DashMap<String, Window>,
    window: Duration,
    max_requests: u32,
    message: String,
}

impl RateLimiter {
    pub fn new(window: Duration, max_requests: u32, message: impl Into<String>) -> Self {
        Self {
            windows: DashMap::new(),
            window,
            max_requests,
            message: message.into(),
        }
    }

    pub fn from_config(config: &RateLimitConfig) -> Self {
        Self::new(
            Duration::from_secs(config.window_secs),
            config.max_requests,
            config.message.clone(),
        )
    }

    pub fn max_requests(&self) -> u32 {
        self.max_requests
    }

    /// Atomically count a request against `key`. The entry's shard lock is
    /// held across the read and the increment.
    pub fn check(&self, key: &str) -> Decision {
        let now = Instant::now();
        let mut entry = self
            .windows
            .entry(key.to_string())
            .or_insert(Window { started: now, count: 0 });

        let elapsed = now.duration_since(entry.started);
        if elapsed >= self.window {
            *entry = Window { started: now, count: 0 };
        }

        if entry.count < self.max_requests {
            entry.count += 1;
            Decision::Allowed { remaining: self.max_requests - entry.count }
        } else {
            Decision::Limited {
                retry_after: self.window.saturating_sub(now.duration_since(entry.started)),
            }
        }
    }

    /// Drop expired windows; returns how many remain.
    pub fn sweep(&self) -> usize {
        let now = Instant::now();
        self.windows
            .retain(|_, w| now.duration_since(w.started) < self.window);
        self.windows.len()
    }

    /// Periodically [`sweep`](Self::sweep) until shutdown.
    pub async fn run_sweeper(self: Arc<Self>, every: Duration, mut shutdown: broadcast::Receiver<()>) {
        let mut ticker = time::interval(every);
        ticker.tick().await;

        loop {
            tokio::select! {
                _ = ticker.tick() => {
                    let remaining = self.sweep();
                    metrics::record_rate_limit_windows(remaining);
                    tracing::trace!(remaining, "Rate limit windows swept");
                }
                _ = shutdown.recv() => {
                    tracing::debug!("Rate limit sweeper received shutdown signal, exiting loop");
                    break;
                }
            }
        }
    }
}

/// Middleware rejecting clients (by source IP) that exceed their window.
/// Rejected requests never reach the handler.
pub async fn rate_limit_middleware(
    ConnectInfo(addr): ConnectInfo<SocketAddr>,
    State(limiter): State<Arc<RateLimiter>>,
    request: Request<Body>,
    next: Next,
) -> Response {
    let key = addr.ip().to_string();
    let limit = HeaderValue::from(limiter.max_requests());

    match limiter.check(&key) {
        Decision::Allowed { remaining } => {
            let mut response = next.run(request).await;
            let headers = response.headers_mut();
            headers.insert(X_RATELIMIT_LIMIT, limit);
            headers.insert(X_RATELIMIT_REMAINING, HeaderValue::from(remaining));
            response
        }
        Decision::Limited { retry_after } => {
            tracing::warn!(client = %key, retry_after = ?retry_after, "Rate limit exceeded");
            metrics::record_rate_limited();

            let retry_after_secs = retry_after.as_secs() + u64::from(retry_after.subsec_nanos() > 0);
            (
                StatusCode::TOO_MANY_REQUESTS,
                [
                    (RETRY_AFTER, HeaderValue::from(retry_after_secs)),
                    (X_RATELIMIT_LIMIT, limit),
                    (X_RATELIMIT_REMAINING, HeaderValue::from(0u32)),
                ],
                limiter.message.clone(),
            )
                .into_response()
        }
    }
}
