//! Request/response mutators.
//!
//! A mutator is a shared callback that edits the in-flight request (before it
//! reaches the transport) or the received response (before decoding). Mutators
//! run in registration order and the first failure stops the chain.

use std::fmt;
use std::sync::Arc;

use clasp_core::ContentType;
use clasp_core::header::{ACCEPT, CONTENT_TYPE, HeaderValue};

use crate::{Request, Response, Result};

type MutatorFn<T> = dyn Fn(&mut T) -> Result<()> + Send + Sync;

/// Shared callback editing a `T` in place.
pub struct Mutator<T> {
    name: &'static str,
    mutate: Arc<MutatorFn<T>>,
}

/// Mutator applied to outbound requests.
pub type RequestMutator = Mutator<Request>;

/// Mutator applied to inbound responses.
pub type ResponseMutator = Mutator<Response>;

impl<T> Mutator<T> {
    /// Wrap a closure.
    #[must_use]
    pub fn new<F>(mutate: F) -> Self
    where
        F: Fn(&mut T) -> Result<()> + Send + Sync + 'static,
    {
        Self::named("anonymous", mutate)
    }

    /// Wrap a closure under a name shown in logs and `Debug` output.
    #[must_use]
    pub fn named<F>(name: &'static str, mutate: F) -> Self
    where
        F: Fn(&mut T) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name,
            mutate: Arc::new(mutate),
        }
    }

    /// Name given at construction.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Apply to `target`.
    pub fn apply(&self, target: &mut T) -> Result<()> {
        (self.mutate)(target)
    }
}

impl<T> Clone for Mutator<T> {
    fn clone(&self) -> Self {
        Self {
            name: self.name,
            mutate: Arc::clone(&self.mutate),
        }
    }
}

impl<T> fmt::Debug for Mutator<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Mutator").field(&self.name).finish()
    }
}

impl<T, F> From<F> for Mutator<T>
where
    F: Fn(&mut T) -> Result<()> + Send + Sync + 'static,
{
    fn from(mutate: F) -> Self {
        Self::new(mutate)
    }
}

/// Run `mutators` in order, stopping at the first failure.
pub(crate) fn run_all<T>(mutators: &[Mutator<T>], target: &mut T) -> Result<()> {
    for mutator in mutators {
        tracing::trace!(mutator = mutator.name(), "applying mutator");
        mutator.apply(target).inspect_err(|err| {
            tracing::debug!(mutator = mutator.name(), error = %err, "mutator failed");
        })?;
    }
    Ok(())
}

/// Appends `Content-Type: application/json` to the request.
#[must_use]
pub fn json_content_type() -> RequestMutator {
    Mutator::named("json_content_type", |request: &mut Request| {
        request.headers_mut().append(
            CONTENT_TYPE,
            HeaderValue::from_static(ContentType::Json.as_str()),
        );
        Ok(())
    })
}

/// Appends `Accept: application/json` to the request.
#[must_use]
pub fn json_accept() -> RequestMutator {
    Mutator::named("json_accept", |request: &mut Request| {
        request.headers_mut().append(
            ACCEPT,
            HeaderValue::from_static(ContentType::Json.as_str()),
        );
        Ok(())
    })
}
