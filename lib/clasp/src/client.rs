//! The client: base URL, defaults, codecs, mutators and transport.

use std::fmt;
use std::sync::{Arc, OnceLock};

use clasp_core::{HeaderMap, Marshaler, QueryParams, Transport, Unmarshaler, normalize_base};
use url::Url;

use crate::{HyperClient, RequestMutator, ResponseMutator, Result};

static DEFAULT_TRANSPORT: OnceLock<Arc<dyn Transport>> = OnceLock::new();

/// Process-wide transport used by clients that have none set.
fn default_transport() -> Arc<dyn Transport> {
    Arc::clone(DEFAULT_TRANSPORT.get_or_init(|| Arc::new(HyperClient::new())))
}

/// REST client bound to a base URL.
///
/// Holds default headers and query parameters, mutator chains, the body
/// codecs and the transport. Cloning deep-copies everything except the
/// transport, which clones share.
///
/// Calls are made with the verb methods ([`get`](Self::get),
/// [`post`](Self::post), ...); configuration setters take `&mut self`, so a
/// client is never reconfigured while a call borrows it.
///
/// # Example
///
/// ```
/// use clasp::Client;
///
/// # fn main() -> clasp::Result<()> {
/// let mut client = Client::new("https://api.example.com/v1?ignored=1")?;
/// client.query_mut().set("api-version", "2");
///
/// assert_eq!(client.base_url().as_str(), "https://api.example.com/v1");
/// # Ok(())
/// # }
/// ```
#[derive(Clone)]
pub struct Client {
    pub(crate) base_url: Url,
    pub(crate) headers: HeaderMap,
    pub(crate) query: QueryParams,
    pub(crate) request_mutators: Vec<RequestMutator>,
    pub(crate) response_mutators: Vec<ResponseMutator>,
    pub(crate) transport: Option<Arc<dyn Transport>>,
    pub(crate) marshaler: Marshaler,
    pub(crate) unmarshaler: Unmarshaler,
}

impl fmt::Debug for Client {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Client")
            .field("base_url", &self.base_url.as_str())
            .field("headers", &self.headers)
            .field("query", &self.query)
            .field("request_mutators", &self.request_mutators)
            .field("response_mutators", &self.response_mutators)
            .field("custom_transport", &self.transport.is_some())
            .field("marshaler", &self.marshaler)
            .field("unmarshaler", &self.unmarshaler)
            .finish()
    }
}

impl Client {
    /// Client for the base URL `base_url`.
    ///
    /// # Errors
    ///
    /// - [`Error::InvalidUrl`](crate::Error::InvalidUrl) if the URL does not parse
    /// - [`Error::Configuration`](crate::Error::Configuration) if it cannot be a base URL
    pub fn new(base_url: impl AsRef<str>) -> Result<Self> {
        Self::with_url(Url::parse(base_url.as_ref())?)
    }

    /// Client for an already parsed base URL. Any query on it is dropped.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`](crate::Error::Configuration) if the URL cannot be a base URL.
    pub fn with_url(base_url: Url) -> Result<Self> {
        Ok(Self {
            base_url: normalize_base(base_url)?,
            headers: HeaderMap::new(),
            query: QueryParams::new(),
            request_mutators: Vec::new(),
            response_mutators: Vec::new(),
            transport: None,
            marshaler: Marshaler::default(),
            unmarshaler: Unmarshaler::default(),
        })
    }

    /// Base URL, never carrying a query.
    #[must_use]
    pub fn base_url(&self) -> &Url {
        &self.base_url
    }

    /// Replace the base URL, dropping its query.
    ///
    /// # Errors
    ///
    /// [`Error::Configuration`](crate::Error::Configuration) if the URL cannot be
    /// a base URL; the current one is kept.
    pub fn set_base_url(&mut self, base_url: Url) -> Result<()> {
        self.base_url = normalize_base(base_url)?;
        Ok(())
    }

    /// Default headers.
    #[must_use]
    pub fn headers(&self) -> &HeaderMap {
        &self.headers
    }

    /// Mutable access to the default headers.
    pub fn headers_mut(&mut self) -> &mut HeaderMap {
        &mut self.headers
    }

    /// Replace the default headers.
    pub fn set_headers(&mut self, headers: HeaderMap) {
        self.headers = headers;
    }

    /// Default query parameters.
    #[must_use]
    pub fn query(&self) -> &QueryParams {
        &self.query
    }

    /// Mutable access to the default query parameters.
    pub fn query_mut(&mut self) -> &mut QueryParams {
        &mut self.query
    }

    /// Replace the default query parameters.
    pub fn set_query(&mut self, query: QueryParams) {
        self.query = query;
    }

    /// Body marshaler (text unless set).
    #[must_use]
    pub fn marshaler(&self) -> &Marshaler {
        &self.marshaler
    }

    /// Replace the body marshaler.
    pub fn set_marshaler(&mut self, marshaler: Marshaler) {
        self.marshaler = marshaler;
    }

    /// Body unmarshaler (text unless set).
    #[must_use]
    pub fn unmarshaler(&self) -> &Unmarshaler {
        &self.unmarshaler
    }

    /// Replace the body unmarshaler.
    pub fn set_unmarshaler(&mut self, unmarshaler: Unmarshaler) {
        self.unmarshaler = unmarshaler;
    }

    /// Transport calls go through: the one set, or the shared default.
    #[must_use]
    pub fn transport(&self) -> Arc<dyn Transport> {
        self.transport.clone().unwrap_or_else(default_transport)
    }

    /// Send calls through `transport`.
    ///
    /// Any [`HttpClient`](crate::HttpClient) is a [`Transport`].
    pub fn set_transport<T: Transport + 'static>(&mut self, transport: T) {
        self.transport = Some(Arc::new(transport));
    }

    /// Send calls through an already shared transport.
    pub fn set_shared_transport(&mut self, transport: Arc<dyn Transport>) {
        self.transport = Some(transport);
    }

    /// Go back to the shared default transport.
    pub fn reset_transport(&mut self) {
        self.transport = None;
    }

    /// Request mutators, in run order.
    #[must_use]
    pub fn request_mutators(&self) -> &[RequestMutator] {
        &self.request_mutators
    }

    /// Append request mutators.
    pub fn add_request_mutators(
        &mut self,
        mutators: impl IntoIterator<Item = RequestMutator>,
    ) -> &mut Self {
        self.request_mutators.extend(mutators);
        self
    }

    /// Replace all request mutators.
    pub fn set_request_mutators(
        &mut self,
        mutators: impl IntoIterator<Item = RequestMutator>,
    ) -> &mut Self {
        self.request_mutators = mutators.into_iter().collect();
        self
    }

    /// Response mutators, in run order.
    #[must_use]
    pub fn response_mutators(&self) -> &[ResponseMutator] {
        &self.response_mutators
    }

    /// Append response mutators.
    pub fn add_response_mutators(
        &mut self,
        mutators: impl IntoIterator<Item = ResponseMutator>,
    ) -> &mut Self {
        self.response_mutators.extend(mutators);
        self
    }

    /// Replace all response mutators.
    pub fn set_response_mutators(
        &mut self,
        mutators: impl IntoIterator<Item = ResponseMutator>,
    ) -> &mut Self {
        self.response_mutators = mutators.into_iter().collect();
        self
    }
}
