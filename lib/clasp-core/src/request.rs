//! HTTP request building.
//!
//! Use [`Request::builder`] to construct requests with headers, query parameters, and bodies.
//!
//! # Example
//!
//! ```
//! use clasp_core::{Method, Payload, Request};
//!
//! # fn main() -> clasp_core::Result<()> {
//! let request = Request::builder(Method::Post, "https://api.example.com/notes".parse().unwrap())
//!     .header("accept", "text/plain")?
//!     .query("draft", "true")?
//!     .payload(Payload::from_text("hello"))
//!     .build();
//!
//! assert_eq!(request.uri(), "https://api.example.com/notes?draft=true");
//! assert_eq!(request.content_length(), Some(5));
//! # Ok(())
//! # }
//! ```

use bytes::Bytes;
use http::Uri;
use http::header::{HeaderMap, HeaderName, HeaderValue};

use crate::{Error, Method, Payload, Result, replace_query};

/// An HTTP request with method, target URI, headers, and optional body.
#[derive(Debug, Clone)]
pub struct Request {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    body: Option<Bytes>,
    content_length: Option<u64>,
}

impl Request {
    /// Creates a new [`RequestBuilder`].
    #[must_use]
    pub fn builder(method: Method, uri: Uri) -> RequestBuilder {
        RequestBuilder::new(method, uri)
    }

    /// HTTP method.
    #[must_use]
    pub const fn method(&self) -> Method {
        self.method
    }

    /// Target URI, path kept as composed.
    #[must_use]
    pub fn uri(&self) -> &Uri {
        &self.uri
    }

    /// Mutable access to the target URI.
    #[must_use]
    pub fn uri_mut(&mut self) -> &mut Uri {
        &mut self.uri
    }

    /// Encoded query, if any.
    #[must_use]
    pub fn query(&self) -> Option<&str> {
        self.uri.query()
    }

    /// Request headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to headers.
    #[must_use]
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// First value of a header, if it is visible ASCII.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name).and_then(|value| value.to_str().ok())
    }

    /// Request body.
    #[must_use]
    pub const fn body(&self) -> Option<&Bytes> {
        self.body.as_ref()
    }

    /// Announced body length: `Some(0)` without a body, `None` when the
    /// marshaler declared the length unknown.
    #[must_use]
    pub const fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// Consume into (method, uri, headers, body).
    #[must_use]
    pub fn into_parts(self) -> (Method, Uri, HeaderMap, Option<Bytes>) {
        (self.method, self.uri, self.headers, self.body)
    }
}

/// Builder for constructing [`Request`] instances.
#[derive(Debug, Clone)]
pub struct RequestBuilder {
    method: Method,
    uri: Uri,
    headers: HeaderMap,
    payload: Option<Payload>,
}

impl RequestBuilder {
    /// Creates a new builder.
    #[must_use]
    pub fn new(method: Method, uri: Uri) -> Self {
        Self {
            method,
            uri,
            headers: HeaderMap::new(),
            payload: None,
        }
    }

    /// Appends a header, parsing name and value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHeader`] if the name or value is not a valid header.
    pub fn header(mut self, name: &str, value: &str) -> Result<Self> {
        let name =
            HeaderName::try_from(name).map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
        let value = HeaderValue::try_from(value)
            .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
        self.headers.append(name, value);
        Ok(self)
    }

    /// Replaces all headers.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Appends a form-encoded query parameter to the URI.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidTarget`] if the existing query cannot be carried over.
    pub fn query(mut self, name: &str, value: &str) -> Result<Self> {
        let existing = self.uri.query().unwrap_or_default().to_owned();
        let query = url::form_urlencoded::Serializer::for_suffix(existing, 0)
            .append_pair(name, value)
            .finish();
        self.uri = replace_query(&self.uri, Some(&query))?;
        Ok(self)
    }

    /// Sets the marshaled body.
    #[must_use]
    pub fn payload(mut self, payload: Payload) -> Self {
        self.payload = Some(payload);
        self
    }

    /// Builds the [`Request`].
    #[must_use]
    pub fn build(self) -> Request {
        let (body, content_length) = match self.payload {
            Some(payload) => {
                let length = payload.content_length();
                (Some(payload.into_bytes()), length)
            }
            None => (None, Some(0)),
        };
        Request {
            method: self.method,
            uri: self.uri,
            headers: self.headers,
            body,
            content_length,
        }
    }
}
