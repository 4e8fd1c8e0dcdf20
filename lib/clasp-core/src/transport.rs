//! HTTP transport traits.
//!
//! - [`HttpClient`] - Low-level HTTP execution, implemented by concrete transports
//! - [`Transport`] - Object-safe view of an [`HttpClient`], shared behind an `Arc`
//!
//! Every [`HttpClient`] is a [`Transport`] through a blanket implementation, so
//! implementing [`HttpClient`] is enough to plug a custom transport (or a fake
//! one in tests) into a client.

use std::future::Future;
use std::pin::Pin;

use crate::{Request, Response, Result};

/// Boxed, sendable future.
pub type BoxFuture<'a, T> = Pin<Box<dyn Future<Output = T> + Send + 'a>>;

/// Core HTTP client trait.
///
/// Implementations own connection pooling and may be shared between tasks.
pub trait HttpClient: Send + Sync {
    /// Execute an HTTP request and return the buffered response.
    ///
    /// # Errors
    ///
    /// Returns an error if the request fails for any reason:
    /// - Network errors
    /// - TLS errors
    /// - Timeouts
    /// - Invalid response
    fn execute(&self, request: Request) -> impl Future<Output = Result<Response>> + Send;
}

/// Object-safe transport.
pub trait Transport: Send + Sync {
    /// Send `request` and wait for the full response.
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response>>;
}

impl<C: HttpClient> Transport for C {
    fn send(&self, request: Request) -> BoxFuture<'_, Result<Response>> {
        Box::pin(self.execute(request))
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::sync::atomic::{AtomicUsize, Ordering};

    use http::HeaderMap;

    use super::*;
    use crate::Method;

    #[derive(Default)]
    struct Echo {
        calls: AtomicUsize,
    }

    impl HttpClient for Echo {
        async fn execute(&self, request: Request) -> Result<Response> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(Response::new(
                200,
                HeaderMap::new(),
                request.uri().path().to_string(),
            ))
        }
    }

    fn block_on<F: Future>(future: F) -> F::Output {
        use std::task::{Context, Poll, Waker};

        let mut future = Box::pin(future);
        let mut cx = Context::from_waker(Waker::noop());
        loop {
            if let Poll::Ready(output) = future.as_mut().poll(&mut cx) {
                return output;
            }
        }
    }

    #[test]
    fn http_client_is_a_transport() {
        let echo = Arc::new(Echo::default());
        let transport: Arc<dyn Transport> = echo.clone();

        let uri = http::Uri::from_static("http://localhost/ping");
        let response = block_on(transport.send(Request::builder(Method::Get, uri).build()))
            .expect("response");

        assert_eq!(response.text().expect("text"), "/ping");
        assert_eq!(echo.calls.load(Ordering::SeqCst), 1);
    }
}
