//! Shared application state for the Axum server.

use std::sync::Arc;
use std::time::{Duration, Instant};

use crate::resolver::PathResolver;

/// Default request timeout (30 seconds).
pub const DEFAULT_REQUEST_TIMEOUT: Duration = Duration::from_secs(30);
/// Default max concurrent requests.
pub const DEFAULT_CONCURRENCY_LIMIT: usize = 256;

/// Shared state accessible to all route handlers.
#[derive(Clone)]
pub struct AppState {
    inner: Arc<Inner>,
}

struct Inner {
    resolver: PathResolver,
    request_timeout: Duration,
    concurrency_limit: usize,
    started_at: Instant,
}

impl AppState {
    /// Create app state serving files through `resolver`.
    pub fn new(resolver: PathResolver) -> Self {
        Self::with_limits(resolver, DEFAULT_REQUEST_TIMEOUT, DEFAULT_CONCURRENCY_LIMIT)
    }

    /// Create app state with explicit middleware limits.
    pub fn with_limits(resolver: PathResolver, request_timeout: Duration, concurrency_limit: usize) -> Self {
        Self {
            inner: Arc::new(Inner {
                resolver,
                request_timeout,
                concurrency_limit: concurrency_limit.max(1),
                started_at: Instant::now(),
            }),
        }
    }

    pub fn resolver(&self) -> &PathResolver {
        &self.inner.resolver
    }

    pub fn request_timeout(&self) -> Duration {
        self.inner.request_timeout
    }

    pub fn concurrency_limit(&self) -> usize {
        self.inner.concurrency_limit
    }

    /// Get server uptime in seconds.
    pub fn uptime_secs(&self) -> u64 {
        self.inner.started_at.elapsed().as_secs()
    }
}
