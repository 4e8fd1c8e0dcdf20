//! Request bodies and serialization helpers.
//!
//! A [`RequestBody`] is the caller's value, type-erased so a single client can
//! accept bodies of any type. A marshaler turns it into a [`Payload`]: the
//! bytes to send plus the length to announce.

use std::any::{Any, type_name};
use std::fmt;

use bytes::Bytes;

use crate::{Error, Result};

/// Media types set by the bundled mutators.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentType {
    /// JSON content type (`application/json`).
    Json,
}

impl ContentType {
    /// Get the MIME type string.
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Json => "application/json",
        }
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Announced length of a [`Payload`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BodyLength {
    /// Exact number of bytes.
    Known(u64),
    /// The marshaler does not commit to a length.
    Unknown,
}

/// Marshaled request body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Payload {
    bytes: Bytes,
    length: BodyLength,
}

impl Payload {
    /// Payload whose length is the exact byte count.
    #[must_use]
    pub fn from_bytes(bytes: impl Into<Bytes>) -> Self {
        let bytes = bytes.into();
        let length = BodyLength::Known(bytes.len() as u64);
        Self { bytes, length }
    }

    /// Payload holding UTF-8 text.
    #[must_use]
    pub fn from_text(text: impl Into<String>) -> Self {
        Self::from_bytes(text.into())
    }

    /// Payload that declares its length as unknown.
    #[must_use]
    pub fn with_unknown_length(bytes: impl Into<Bytes>) -> Self {
        Self {
            bytes: bytes.into(),
            length: BodyLength::Unknown,
        }
    }

    /// Announced length.
    #[must_use]
    pub const fn length(&self) -> BodyLength {
        self.length
    }

    /// Exact length, if known.
    #[must_use]
    pub const fn content_length(&self) -> Option<u64> {
        match self.length {
            BodyLength::Known(len) => Some(len),
            BodyLength::Unknown => None,
        }
    }

    /// Payload bytes.
    #[must_use]
    pub const fn bytes(&self) -> &Bytes {
        &self.bytes
    }

    /// Consume into the payload bytes.
    #[must_use]
    pub fn into_bytes(self) -> Bytes {
        self.bytes
    }
}

type JsonEncoder = fn(&(dyn Any + Send + Sync)) -> Result<Bytes>;

/// A type-erased request body value.
///
/// The concrete type is kept so marshalers can inspect it at runtime
/// ([`RequestBody::downcast_ref`]) and so the JSON marshaler can serialize it.
pub struct RequestBody {
    value: Box<dyn Any + Send + Sync>,
    type_name: &'static str,
    encode_json: JsonEncoder,
}

impl RequestBody {
    /// Wrap a body value.
    #[must_use]
    pub fn new<T>(value: T) -> Self
    where
        T: serde::Serialize + Send + Sync + 'static,
    {
        Self {
            value: Box::new(value),
            type_name: type_name::<T>(),
            encode_json: encode_json::<T>,
        }
    }

    /// Rust type name of the wrapped value.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Borrow the value as `T`, if it is one.
    #[must_use]
    pub fn downcast_ref<T: 'static>(&self) -> Option<&T> {
        self.value.downcast_ref()
    }

    /// Serialize the value as JSON.
    pub fn to_json(&self) -> Result<Bytes> {
        (self.encode_json)(self.value.as_ref())
    }
}

impl fmt::Debug for RequestBody {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RequestBody")
            .field("type_name", &self.type_name)
            .finish_non_exhaustive()
    }
}

impl From<String> for RequestBody {
    fn from(value: String) -> Self {
        Self::new(value)
    }
}

impl From<&'static str> for RequestBody {
    fn from(value: &'static str) -> Self {
        Self::new(value)
    }
}

fn encode_json<T>(value: &(dyn Any + Send + Sync)) -> Result<Bytes>
where
    T: serde::Serialize + 'static,
{
    let value = value
        .downcast_ref::<T>()
        .ok_or(Error::UnsupportedBody {
            marshaler: "json",
            type_name: type_name::<T>(),
        })?;
    to_json(value)
}

/// Serialize a value to JSON bytes.
///
/// # Errors
///
/// Returns an error if JSON serialization fails.
///
/// # Example
///
/// ```
/// use clasp_core::to_json;
/// use serde::Serialize;
///
/// #[derive(Serialize)]
/// struct User { name: String }
///
/// let user = User { name: "Alice".to_string() };
/// let bytes = to_json(&user).expect("serialize");
/// assert_eq!(bytes.as_ref(), br#"{"name":"Alice"}"#);
/// ```
pub fn to_json<T: serde::Serialize + ?Sized>(value: &T) -> Result<Bytes> {
    serde_json::to_vec(value)
        .map(Bytes::from)
        .map_err(Into::into)
}

/// Deserialize JSON bytes to a value with path-aware error messages.
///
/// # Errors
///
/// Returns an error if JSON deserialization fails, with the error message
/// including the path to the problematic field (e.g. `user.address.city`).
pub fn from_json<T: serde::de::DeserializeOwned>(bytes: &[u8]) -> Result<T> {
    let mut deserializer = serde_json::Deserializer::from_slice(bytes);
    serde_path_to_error::deserialize(&mut deserializer)
        .map_err(|e| Error::json_deserialization(e.path().to_string(), e.inner().to_string()))
}
