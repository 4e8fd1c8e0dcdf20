//! Transport logging middleware.
//!
//! Wraps the bundled transport (or any `Service<Request>`) and records each
//! exchange with `tracing`: the target (password removed), both announced
//! body lengths, the status and the elapsed time. Debug mode adds headers.

use std::future::Future;
use std::pin::Pin;
use std::task::{Context, Poll};
use std::time::Instant;

use clasp_core::redact_password;
use tower::{Layer, Service};
use tracing::{Instrument, debug, info, info_span, warn};

use crate::{Error, Request, Response, Result};

/// Layer that logs every exchange going through the transport.
///
/// # Example
///
/// ```
/// use clasp::HyperClient;
/// use clasp::middleware::LoggingLayer;
///
/// let transport = HyperClient::builder()
///     .layer(LoggingLayer::debug())
///     .build();
/// ```
#[derive(Debug, Clone, Copy, Default)]
pub struct LoggingLayer {
    level: LogLevel,
}

/// How much the logging middleware records.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum LogLevel {
    /// Info summary plus request and response headers at debug level.
    Debug,
    /// One info (or warn) event per exchange.
    #[default]
    Info,
}

impl LoggingLayer {
    /// Summary logging.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Summary logging plus headers.
    #[must_use]
    pub fn debug() -> Self {
        Self {
            level: LogLevel::Debug,
        }
    }

    /// Level this layer logs at.
    #[must_use]
    pub const fn level(&self) -> LogLevel {
        self.level
    }
}

impl<S> Layer<S> for LoggingLayer {
    type Service = Logging<S>;

    fn layer(&self, inner: S) -> Self::Service {
        Logging {
            inner,
            level: self.level,
        }
    }
}

/// Service produced by [`LoggingLayer`].
#[derive(Debug, Clone)]
pub struct Logging<S> {
    inner: S,
    level: LogLevel,
}

fn log_outcome(result: &Result<Response>, elapsed_ms: u64, level: LogLevel) {
    match result {
        Ok(response) => {
            let status = response.status();
            let content_length = response.content_length();
            if level == LogLevel::Debug {
                debug!(headers = ?response.headers(), "response headers");
            }
            if response.is_client_error() || response.is_server_error() {
                warn!(status, ?content_length, elapsed_ms, "exchange completed with HTTP error");
            } else {
                info!(status, ?content_length, elapsed_ms, "exchange completed");
            }
        }
        Err(err) => {
            warn!(error = %err, timeout = err.is_timeout(), elapsed_ms, "exchange failed");
        }
    }
}

impl<S> Service<Request> for Logging<S>
where
    S: Service<Request, Response = Response, Error = Error> + Clone + Send + 'static,
    S::Future: Send,
{
    type Response = Response;
    type Error = Error;
    type Future = Pin<Box<dyn Future<Output = Result<Self::Response>> + Send>>;

    fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<()>> {
        self.inner.poll_ready(cx)
    }

    fn call(&mut self, request: Request) -> Self::Future {
        let span = info_span!(
            "transport",
            method = %request.method(),
            uri = %redact_password(request.uri()),
            request_length = ?request.content_length(),
        );
        if self.level == LogLevel::Debug {
            span.in_scope(|| debug!(headers = ?request.headers(), "request headers"));
        }

        let level = self.level;
        let mut inner = self.inner.clone();
        Box::pin(
            async move {
                let start = Instant::now();
                let result = inner.call(request).await;
                let elapsed_ms = u64::try_from(start.elapsed().as_millis()).unwrap_or(u64::MAX);
                log_outcome(&result, elapsed_ms, level);
                result
            }
            .instrument(span),
        )
    }
}
