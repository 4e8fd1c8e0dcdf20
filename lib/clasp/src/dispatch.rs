//! Per-call pipeline: build, mutate, send, mutate, decode.

use derive_more::{Display, Error};
use tracing::{Instrument, debug, debug_span, trace};

use clasp_core::{
    QueryParams, RequestBody, Uri, compose, merge_headers, merge_query, redact_password,
};

use crate::mutator::run_all;
use crate::params::DecodeMap;
use crate::{Client, HeaderMap, Method, Params, Request, Response};

/// Failed call.
///
/// Failures after the response arrived (a response mutator or decoding)
/// still hand the response back.
#[derive(Debug, Display, Error)]
#[display("{error}")]
pub struct CallError {
    #[error(source)]
    error: clasp_core::Error,
    response: Option<Response>,
}

/// Result of a call.
pub type CallResult = std::result::Result<Response, CallError>;

impl CallError {
    /// Failure before any response was received.
    #[must_use]
    pub const fn new(error: clasp_core::Error) -> Self {
        Self {
            error,
            response: None,
        }
    }

    /// Failure after `response` was received.
    #[must_use]
    pub const fn with_response(error: clasp_core::Error, response: Response) -> Self {
        Self {
            error,
            response: Some(response),
        }
    }

    /// Underlying error.
    #[must_use]
    pub const fn error(&self) -> &clasp_core::Error {
        &self.error
    }

    /// Response, when the failure happened after receiving it.
    #[must_use]
    pub const fn response(&self) -> Option<&Response> {
        self.response.as_ref()
    }

    /// Consume into the underlying error.
    #[must_use]
    pub fn into_error(self) -> clasp_core::Error {
        self.error
    }

    /// Consume into (error, response).
    #[must_use]
    pub fn into_parts(self) -> (clasp_core::Error, Option<Response>) {
        (self.error, self.response)
    }
}

impl From<clasp_core::Error> for CallError {
    fn from(error: clasp_core::Error) -> Self {
        Self::new(error)
    }
}

impl Client {
    /// `GET` `params.path`. Any body is ignored.
    pub async fn get(&self, params: Params<'_>) -> CallResult {
        self.execute(Method::Get, params).await
    }

    /// `POST` `params.path`.
    pub async fn post(&self, params: Params<'_>) -> CallResult {
        self.execute(Method::Post, params).await
    }

    /// `PUT` `params.path`.
    pub async fn put(&self, params: Params<'_>) -> CallResult {
        self.execute(Method::Put, params).await
    }

    /// `PATCH` `params.path`.
    pub async fn patch(&self, params: Params<'_>) -> CallResult {
        self.execute(Method::Patch, params).await
    }

    /// `HEAD` `params.path`. Body and decode map are ignored.
    pub async fn head(&self, params: Params<'_>) -> CallResult {
        self.execute(Method::Head, params).await
    }

    /// `OPTIONS` `params.path`.
    pub async fn options(&self, params: Params<'_>) -> CallResult {
        self.execute(Method::Options, params).await
    }

    /// `DELETE` `params.path`. Any body is ignored.
    pub async fn delete(&self, params: Params<'_>) -> CallResult {
        self.execute(Method::Delete, params).await
    }

    /// Run one call.
    ///
    /// The body is only marshaled for methods that send one, and decoding
    /// only happens for methods that decode, when the response may carry a
    /// body (announced length not zero) and its status has destinations.
    ///
    /// # Errors
    ///
    /// - marshaling, request mutator and transport failures, without response
    /// - response mutator and decoding failures, with the response
    pub async fn execute(&self, method: Method, params: Params<'_>) -> CallResult {
        let (path, headers, query, body, decode) = params.into_parts();
        let uri = compose(&self.base_url, &path)?;
        let span = debug_span!("http_call", %method, uri = %redact_password(&uri));

        self.dispatch(method, uri, &headers, &query, body, decode)
            .instrument(span)
            .await
    }

    async fn dispatch(
        &self,
        method: Method,
        uri: Uri,
        headers: &HeaderMap,
        query: &QueryParams,
        body: Option<RequestBody>,
        decode: Option<DecodeMap<'_>>,
    ) -> CallResult {
        let mut request = self
            .prepare(method, uri, headers, query, body)
            .inspect_err(|err| debug!(error = %err, "failed to build request"))?;

        run_all(&self.request_mutators, &mut request)?;

        debug!(query = ?request.query(), "sending request");
        let mut response = self
            .transport()
            .send(request)
            .await
            .inspect_err(|err| debug!(error = %err, "transport failed"))?;
        debug!(status = response.status(), "response received");

        if let Err(error) = run_all(&self.response_mutators, &mut response) {
            return Err(CallError::with_response(error, response));
        }

        let Some(mut decode) = decode.filter(|_| method.decodes_response()) else {
            return Ok(response);
        };
        match self.decode(&mut decode, &response) {
            Ok(()) => Ok(response),
            Err(error) => {
                debug!(error = %error, "failed to decode response");
                Err(CallError::with_response(error, response))
            }
        }
    }

    fn prepare(
        &self,
        method: Method,
        mut uri: Uri,
        headers: &HeaderMap,
        query: &QueryParams,
        body: Option<RequestBody>,
    ) -> clasp_core::Result<Request> {
        merge_query(&self.query, query).apply_to(&mut uri)?;

        let builder =
            Request::builder(method, uri).headers(merge_headers(&self.headers, headers));

        let builder = match body.filter(|_| method.sends_body()) {
            Some(body) => {
                let payload = self.marshaler.marshal(&body)?;
                trace!(
                    marshaler = self.marshaler.name(),
                    content_length = ?payload.content_length(),
                    "body marshaled"
                );
                builder.payload(payload)
            }
            None => builder,
        };

        Ok(builder.build())
    }

    fn decode(&self, decode: &mut DecodeMap<'_>, response: &Response) -> clasp_core::Result<()> {
        if !response.may_have_body() {
            trace!("empty response body, nothing to decode");
            return Ok(());
        }
        let Some(destinations) = decode.get_mut(response.status()) else {
            trace!(status = response.status(), "no destination for status");
            return Ok(());
        };
        for destination in destinations {
            trace!(
                unmarshaler = self.unmarshaler.name(),
                destination = destination.type_name(),
                "decoding response"
            );
            self.unmarshaler.unmarshal(response.body(), destination)?;
        }
        Ok(())
    }
}
