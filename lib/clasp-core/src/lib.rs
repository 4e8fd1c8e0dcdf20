//! Core types and traits for the clasp HTTP client.
//!
//! This crate provides the foundational types used by clasp:
//! - [`Method`] - HTTP method enum
//! - [`Request`] and [`RequestBuilder`] - HTTP request types
//! - [`Response`] - HTTP response type
//! - [`Error`] and [`Result`] - Error handling
//! - [`HttpClient`] and [`Transport`] - Transport traits for HTTP execution
//! - [`Marshaler`], [`Unmarshaler`] and [`Destination`] - Pluggable body codecs
//! - [`QueryParams`], [`merge_headers`] and [`merge_query`] - Default/override merging
//! - [`StatusCode`] - HTTP status codes (re-exported from `http` crate)
//! - [`header`] - HTTP header names (re-exported from `http` crate)

mod base;
mod body;
mod codec;
mod error;
mod merge;
mod method;
pub mod prelude;
mod request;
mod response;
mod transport;

pub use base::{compose, normalize_base, redact_password, replace_query};
pub use body::{BodyLength, ContentType, Payload, RequestBody, from_json, to_json};
pub use codec::{
    Destination, Marshaler, Unmarshaler, json_marshaler, json_unmarshaler, text_marshaler,
    text_unmarshaler,
};
pub use error::{Error, Result};
pub use merge::{QueryParams, merge_headers, merge_query};
pub use method::Method;
pub use request::{Request, RequestBuilder};
pub use response::Response;
pub use transport::{BoxFuture, HttpClient, Transport};

// Re-export http crate types for status codes and headers
pub use http::{HeaderMap, StatusCode, Uri, header};
