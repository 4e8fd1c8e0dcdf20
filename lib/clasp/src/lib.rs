//! Thin REST client for Rust.
//!
//! A [`Client`] is bound to a base URL and carries default headers and query
//! parameters, pluggable body codecs, request/response [mutators](Mutator)
//! and a transport. Each call takes [`Params`]: a path relative to the base
//! URL, header and query overrides, an optional body, and an optional
//! [`DecodeMap`] telling where to decode the response body for each status.
//!
//! # Example
//!
//! ```no_run
//! use clasp::{Client, Params, setup_for_json};
//! use serde::Deserialize;
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct User {
//!     id: u64,
//!     name: String,
//! }
//!
//! #[derive(Debug, Default, Deserialize)]
//! struct Problem {
//!     detail: String,
//! }
//!
//! # async fn run() -> Result<(), clasp::CallError> {
//! let mut client = Client::new("https://api.example.com/v1")?;
//! setup_for_json(&mut client);
//!
//! let mut user = User::default();
//! let mut problem = Problem::default();
//! let response = client
//!     .get(
//!         Params::new("/users/42")
//!             .on(200, &mut user)
//!             .on(404, &mut problem),
//!     )
//!     .await?;
//!
//! if response.is_success() {
//!     println!("{}", user.name);
//! }
//! # Ok(())
//! # }
//! ```
//!
//! # Pipeline
//!
//! 1. the path is appended to the base URL, default and per-call headers and
//!    query are merged (per-call values replace defaults key by key)
//! 2. the body is marshaled (`POST`, `PUT`, `PATCH`, `OPTIONS` only)
//! 3. request mutators run, in order
//! 4. the transport sends the request
//! 5. response mutators run, in order
//! 6. the body is decoded into the destinations registered for the status
//!
//! Failures from step 5 on come back as a [`CallError`] that still carries
//! the response.

mod client;
mod config;
mod connector;
mod dispatch;
mod hyper_client;
mod json;
pub mod middleware;
mod mutator;
mod params;
pub mod prelude;

pub use client::Client;
pub use config::TransportConfig;
pub use dispatch::{CallError, CallResult};
pub use hyper_client::{BoxedService, HyperClient, HyperClientBuilder, ServiceFuture};
pub use json::setup_for_json;
pub use mutator::{Mutator, RequestMutator, ResponseMutator, json_accept, json_content_type};
pub use params::{DecodeMap, Params};

// Re-export tower for middleware composition
pub use tower;

// Re-export core types
pub use clasp_core::{
    BodyLength, BoxFuture, ContentType, Destination, Error, HttpClient, Marshaler, Method, Payload,
    QueryParams, Request, RequestBody, RequestBuilder, Response, Result, Transport, Unmarshaler,
    from_json, json_marshaler, json_unmarshaler, merge_headers, merge_query, redact_password,
    text_marshaler, text_unmarshaler, to_json,
};

// Re-export http types for status codes and headers
pub use clasp_core::{HeaderMap, StatusCode, Uri, header};

pub use url;
