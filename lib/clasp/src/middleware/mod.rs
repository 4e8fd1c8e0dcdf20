//! Tower middleware layers for the bundled [`HyperClient`](crate::HyperClient) transport.
//!
//! Layers wrap the transport, so they see every request after the client's
//! request mutators and every response before its response mutators.
//!
//! - [`LoggingLayer`] - Logs requests/responses using `tracing`
//!
//! Any other tower layer over [`Request`](crate::Request) /
//! [`Response`](crate::Response) works through
//! [`HyperClientBuilder::layer`](crate::HyperClientBuilder::layer).

mod logging;

pub use logging::{LogLevel, Logging, LoggingLayer};

// Re-export tower types for convenience
pub use tower::{Layer, ServiceBuilder};
