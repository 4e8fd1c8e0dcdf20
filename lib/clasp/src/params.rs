//! Per-call parameters and the status-keyed decode map.

use std::collections::HashMap;

use clasp_core::header::{HeaderName, HeaderValue, IntoHeaderName};
use clasp_core::{Destination, HeaderMap, QueryParams, RequestBody};

use crate::{Error, Result};

/// Where to decode a response body, keyed by HTTP status code.
///
/// A status may map to several destinations: each one is decoded in turn,
/// stopping at the first failure. A status mapped to no destination, and a
/// status missing from the map, are both skipped without error.
///
/// # Example
///
/// ```
/// use clasp::{DecodeMap, StatusCode};
///
/// let mut created = String::new();
/// let mut problem = String::new();
///
/// let map = DecodeMap::new()
///     .on(201, &mut created)
///     .on(StatusCode::NOT_FOUND.as_u16(), &mut problem);
/// assert_eq!(map.len(), 2);
/// ```
#[derive(Debug, Default)]
pub struct DecodeMap<'a> {
    entries: HashMap<u16, Vec<Destination<'a>>>,
}

impl<'a> DecodeMap<'a> {
    /// Empty map.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Decode `status` responses into `target`.
    #[must_use]
    pub fn on<T>(mut self, status: u16, target: &'a mut T) -> Self
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        self.insert(status, Destination::new(target));
        self
    }

    /// Register a by-value destination for `status`.
    ///
    /// Decoding can never reach the caller through a value, so a matching
    /// response fails with [`Error::PassByValue`].
    #[must_use]
    pub fn on_value<T: 'static>(mut self, status: u16, value: T) -> Self {
        self.insert(status, Destination::from_value(value));
        self
    }

    /// Register `status` with no destination.
    #[must_use]
    pub fn skip(mut self, status: u16) -> Self {
        self.entries.entry(status).or_default();
        self
    }

    /// Add a destination for `status`, after any already registered.
    pub fn insert(&mut self, status: u16, destination: Destination<'a>) -> &mut Self {
        self.entries
            .entry(status)
            .or_default()
            .push(destination);
        self
    }

    /// Returns `true` if `status` has an entry (possibly without destination).
    #[must_use]
    pub fn contains(&self, status: u16) -> bool {
        self.entries.contains_key(&status)
    }

    /// Destinations registered for `status`.
    pub fn get_mut(&mut self, status: u16) -> Option<&mut [Destination<'a>]> {
        self.entries.get_mut(&status).map(Vec::as_mut_slice)
    }

    /// Number of status entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns `true` if no status is registered.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Parameters of a single call.
///
/// Only the path is required. Headers and query given here override the
/// client defaults key by key.
#[derive(Debug, Default)]
pub struct Params<'a> {
    path: String,
    headers: HeaderMap,
    query: QueryParams,
    body: Option<RequestBody>,
    decode: Option<DecodeMap<'a>>,
}

impl<'a> Params<'a> {
    /// Call `path`, relative to the client base URL.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    /// Append a header override.
    #[must_use]
    pub fn header<K: IntoHeaderName>(mut self, name: K, value: HeaderValue) -> Self {
        self.headers.append(name, value);
        self
    }

    /// Append a header override, parsing name and value.
    ///
    /// # Errors
    ///
    /// [`Error::InvalidHeader`] if the name or value is not a valid header.
    pub fn try_header(self, name: &str, value: &str) -> Result<Self> {
        let name = HeaderName::try_from(name)
            .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
        let value = HeaderValue::try_from(value)
            .map_err(|e| Error::invalid_header(format!("{name}: {e}")))?;
        Ok(self.header(name, value))
    }

    /// Replace all header overrides.
    #[must_use]
    pub fn headers(mut self, headers: HeaderMap) -> Self {
        self.headers = headers;
        self
    }

    /// Append a query override value.
    #[must_use]
    pub fn query(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.query.add(key, value);
        self
    }

    /// Replace all query overrides.
    #[must_use]
    pub fn query_params(mut self, query: QueryParams) -> Self {
        self.query = query;
        self
    }

    /// Request body, encoded by the client marshaler.
    ///
    /// Ignored by `GET`, `HEAD` and `DELETE`.
    #[must_use]
    pub fn body<T>(mut self, body: T) -> Self
    where
        T: serde::Serialize + Send + Sync + 'static,
    {
        self.body = Some(RequestBody::new(body));
        self
    }

    /// Decode the response with `decode`. Ignored by `HEAD`.
    #[must_use]
    pub fn decode(mut self, decode: DecodeMap<'a>) -> Self {
        self.decode = Some(decode);
        self
    }

    /// Decode `status` responses into `target`, creating the decode map if needed.
    #[must_use]
    pub fn on<T>(mut self, status: u16, target: &'a mut T) -> Self
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        self.decode = Some(self.decode.take().unwrap_or_default().on(status, target));
        self
    }

    /// Relative path.
    #[must_use]
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Header overrides.
    #[must_use]
    pub fn header_overrides(&self) -> &HeaderMap {
        &self.headers
    }

    /// Query overrides.
    #[must_use]
    pub fn query_overrides(&self) -> &QueryParams {
        &self.query
    }

    /// Body, if any.
    #[must_use]
    pub fn request_body(&self) -> Option<&RequestBody> {
        self.body.as_ref()
    }

    /// Returns `true` if a decode map was given.
    #[must_use]
    pub fn has_decode_map(&self) -> bool {
        self.decode.is_some()
    }

    pub(crate) fn into_parts(
        self,
    ) -> (
        String,
        HeaderMap,
        QueryParams,
        Option<RequestBody>,
        Option<DecodeMap<'a>>,
    ) {
        (self.path, self.headers, self.query, self.body, self.decode)
    }
}
