//! Pluggable body codecs.
//!
//! A [`Marshaler`] turns a [`RequestBody`] into a [`Payload`]; an
//! [`Unmarshaler`] writes response bytes into a caller-owned [`Destination`].
//! The two sides are independent, so a client can send text and decode JSON.
//!
//! # Example
//!
//! ```
//! use clasp_core::{Destination, Marshaler, RequestBody, Unmarshaler};
//!
//! let payload = Marshaler::text()
//!     .marshal(&RequestBody::from("hello"))
//!     .expect("marshal");
//!
//! let mut echoed = String::new();
//! Unmarshaler::text()
//!     .unmarshal(payload.bytes(), &mut Destination::new(&mut echoed))
//!     .expect("unmarshal");
//! assert_eq!(echoed, "hello");
//! ```

use std::any::{Any, type_name};
use std::borrow::Cow;
use std::fmt;
use std::sync::Arc;

use crate::{Error, Payload, RequestBody, Result, from_json};

type JsonDecoder = fn(&[u8], &mut (dyn Any + Send)) -> Result<()>;

enum Slot<'a> {
    Reference {
        target: &'a mut (dyn Any + Send),
        decode_json: JsonDecoder,
    },
    Value,
}

/// A caller-owned value that decoding writes into.
///
/// Built from a mutable reference with [`Destination::new`]. A destination
/// built from a plain value ([`Destination::from_value`]) is accepted by the
/// type system but rejected by every unmarshaler with
/// [`Error::PassByValue`]: the decoded data would have nowhere to go.
pub struct Destination<'a> {
    type_name: &'static str,
    slot: Slot<'a>,
}

impl<'a> Destination<'a> {
    /// Destination writing into `target`.
    #[must_use]
    pub fn new<T>(target: &'a mut T) -> Self
    where
        T: serde::de::DeserializeOwned + Send + 'static,
    {
        Self {
            type_name: type_name::<T>(),
            slot: Slot::Reference {
                target,
                decode_json: decode_json::<T>,
            },
        }
    }

    /// Destination built from a value instead of a reference.
    #[must_use]
    pub fn from_value<T: 'static>(value: T) -> Self {
        drop(value);
        Self {
            type_name: type_name::<T>(),
            slot: Slot::Value,
        }
    }

    /// Rust type name of the destination.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        self.type_name
    }

    /// Returns `true` if decoding can reach the caller's value.
    #[must_use]
    pub const fn is_reference(&self) -> bool {
        matches!(self.slot, Slot::Reference { .. })
    }

    /// Borrow the target as `T`.
    ///
    /// `unmarshaler` names the codec asking, for the error message.
    pub fn downcast_mut<T: 'static>(&mut self, unmarshaler: &'static str) -> Result<&mut T> {
        let type_name = self.type_name;
        match &mut self.slot {
            Slot::Reference { target, .. } => {
                target
                    .downcast_mut::<T>()
                    .ok_or(Error::UnsupportedDestination {
                        unmarshaler,
                        type_name,
                    })
            }
            Slot::Value => Err(Error::PassByValue { type_name }),
        }
    }

    /// Replace the target with the JSON document in `bytes`.
    pub fn decode_json(&mut self, bytes: &[u8]) -> Result<()> {
        match &mut self.slot {
            Slot::Reference {
                target,
                decode_json,
            } => {
                let decode = *decode_json;
                decode(bytes, &mut **target)
            }
            Slot::Value => Err(Error::PassByValue {
                type_name: self.type_name,
            }),
        }
    }
}

impl fmt::Debug for Destination<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Destination")
            .field("type_name", &self.type_name)
            .field("is_reference", &self.is_reference())
            .finish()
    }
}

fn decode_json<T>(bytes: &[u8], target: &mut (dyn Any + Send)) -> Result<()>
where
    T: serde::de::DeserializeOwned + 'static,
{
    let slot = target
        .downcast_mut::<T>()
        .ok_or(Error::UnsupportedDestination {
            unmarshaler: "json",
            type_name: type_name::<T>(),
        })?;
    *slot = from_json(bytes)?;
    Ok(())
}

type MarshalFn = dyn Fn(&RequestBody) -> Result<Payload> + Send + Sync;
type UnmarshalFn = dyn Fn(&[u8], &mut Destination<'_>) -> Result<()> + Send + Sync;

/// Shared marshal function.
#[derive(Clone)]
pub struct Marshaler {
    name: &'static str,
    marshal: Arc<MarshalFn>,
}

impl Marshaler {
    /// Wrap a custom marshal function.
    pub fn new<F>(name: &'static str, marshal: F) -> Self
    where
        F: Fn(&RequestBody) -> Result<Payload> + Send + Sync + 'static,
    {
        Self {
            name,
            marshal: Arc::new(marshal),
        }
    }

    /// Marshaler for string-like bodies, see [`text_marshaler`].
    #[must_use]
    pub fn text() -> Self {
        Self::new("text", text_marshaler)
    }

    /// JSON marshaler, see [`json_marshaler`].
    #[must_use]
    pub fn json() -> Self {
        Self::new("json", json_marshaler)
    }

    /// Name given at construction.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Encode `body`.
    pub fn marshal(&self, body: &RequestBody) -> Result<Payload> {
        (self.marshal)(body)
    }
}

impl Default for Marshaler {
    fn default() -> Self {
        Self::text()
    }
}

impl fmt::Debug for Marshaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Marshaler").field(&self.name).finish()
    }
}

/// Shared unmarshal function.
#[derive(Clone)]
pub struct Unmarshaler {
    name: &'static str,
    unmarshal: Arc<UnmarshalFn>,
}

impl Unmarshaler {
    /// Wrap a custom unmarshal function.
    pub fn new<F>(name: &'static str, unmarshal: F) -> Self
    where
        F: Fn(&[u8], &mut Destination<'_>) -> Result<()> + Send + Sync + 'static,
    {
        Self {
            name,
            unmarshal: Arc::new(unmarshal),
        }
    }

    /// Unmarshaler for `String` destinations, see [`text_unmarshaler`].
    #[must_use]
    pub fn text() -> Self {
        Self::new("text", text_unmarshaler)
    }

    /// JSON unmarshaler, see [`json_unmarshaler`].
    #[must_use]
    pub fn json() -> Self {
        Self::new("json", json_unmarshaler)
    }

    /// Name given at construction.
    #[must_use]
    pub const fn name(&self) -> &'static str {
        self.name
    }

    /// Decode `bytes` into `destination`.
    pub fn unmarshal(&self, bytes: &[u8], destination: &mut Destination<'_>) -> Result<()> {
        (self.unmarshal)(bytes, destination)
    }
}

impl Default for Unmarshaler {
    fn default() -> Self {
        Self::text()
    }
}

impl fmt::Debug for Unmarshaler {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Unmarshaler").field(&self.name).finish()
    }
}

/// Marshal string-like bodies as raw text.
///
/// Accepts `String`, `&'static str`, `Box<str>` and `Cow<'static, str>`.
///
/// # Errors
///
/// [`Error::UnsupportedBody`] for any other type.
pub fn text_marshaler(body: &RequestBody) -> Result<Payload> {
    let text = body
        .downcast_ref::<String>()
        .map(String::as_str)
        .or_else(|| body.downcast_ref::<&'static str>().copied())
        .or_else(|| body.downcast_ref::<Box<str>>().map(AsRef::as_ref))
        .or_else(|| body.downcast_ref::<Cow<'static, str>>().map(AsRef::as_ref));

    text.map(Payload::from_text)
        .ok_or(Error::UnsupportedBody {
            marshaler: "text",
            type_name: body.type_name(),
        })
}

/// Marshal any body as JSON.
pub fn json_marshaler(body: &RequestBody) -> Result<Payload> {
    body.to_json().map(Payload::from_bytes)
}

/// Write the response text into a `String` destination.
///
/// # Errors
///
/// - [`Error::PassByValue`] for a by-value destination
/// - [`Error::UnsupportedDestination`] if the destination is not a `String`
/// - [`Error::InvalidText`] if the bytes are not UTF-8
pub fn text_unmarshaler(bytes: &[u8], destination: &mut Destination<'_>) -> Result<()> {
    let target = destination.downcast_mut::<String>("text")?;
    let text = std::str::from_utf8(bytes)?;
    text.clone_into(target);
    Ok(())
}

/// Deserialize the response JSON into the destination's type.
pub fn json_unmarshaler(bytes: &[u8], destination: &mut Destination<'_>) -> Result<()> {
    destination.decode_json(bytes)
}

#[cfg(test)]
mod tests {
    use assert2::{check, let_assert};

    use super::*;

    #[derive(Debug, Default, PartialEq, serde::Serialize, serde::Deserialize)]
    struct Greeting {
        name: String,
    }

    #[test]
    fn text_round_trip() {
        let payload = text_marshaler(&RequestBody::from("hello")).expect("marshal");
        check!(payload.content_length() == Some(5));

        let mut result = String::new();
        text_unmarshaler(payload.bytes(), &mut Destination::new(&mut result)).expect("unmarshal");
        check!(result == "hello");
    }

    #[test]
    fn text_marshaler_accepts_string_like_values() {
        for body in [
            RequestBody::new(String::from("cosa")),
            RequestBody::new("cosa"),
            RequestBody::new(Box::<str>::from("cosa")),
            RequestBody::new(Cow::<'static, str>::Borrowed("cosa")),
        ] {
            let payload = text_marshaler(&body).expect("marshal");
            check!(payload.bytes().as_ref() == b"cosa");
        }
    }

    #[test]
    fn text_marshaler_rejects_other_values() {
        let result = text_marshaler(&RequestBody::new(Greeting::default()));
        let_assert!(Err(Error::UnsupportedBody { marshaler, type_name }) = result);
        check!(marshaler == "text");
        check!(type_name.ends_with("Greeting"));
    }

    #[test]
    fn text_unmarshaler_rejects_by_value_destination() {
        let result = text_unmarshaler(b"cosa", &mut Destination::from_value(String::new()));
        let_assert!(Err(err) = result);
        check!(err.to_string().contains("must be passed by reference"));
    }

    #[test]
    fn text_unmarshaler_rejects_other_types() {
        let mut number = 0_u32;
        let result = text_unmarshaler(b"12", &mut Destination::new(&mut number));
        let_assert!(Err(Error::UnsupportedDestination { unmarshaler, type_name }) = result);
        check!(unmarshaler == "text");
        check!(type_name == "u32");
    }

    #[test]
    fn text_unmarshaler_rejects_invalid_utf8() {
        let mut result = String::from("untouched");
        let err = text_unmarshaler(&[0xff, 0xfe], &mut Destination::new(&mut result))
            .expect_err("invalid utf-8");
        check!(matches!(err, Error::InvalidText(_)));
        check!(result == "untouched");
    }

    #[test]
    fn json_round_trip() {
        let payload = json_marshaler(&RequestBody::new(Greeting {
            name: "test".to_string(),
        }))
        .expect("marshal");
        check!(payload.bytes().as_ref() == br#"{"name":"test"}"#);

        let mut greeting = Greeting::default();
        json_unmarshaler(payload.bytes(), &mut Destination::new(&mut greeting)).expect("unmarshal");
        check!(greeting.name == "test");
    }

    #[test]
    fn json_unmarshaler_rejects_by_value_destination() {
        let result = json_unmarshaler(
            br#"{"name":"test"}"#,
            &mut Destination::from_value(Greeting::default()),
        );
        let_assert!(Err(Error::PassByValue { type_name }) = result);
        check!(type_name.ends_with("Greeting"));
    }

    #[test]
    fn json_unmarshaler_reports_path() {
        let mut greeting = Greeting::default();
        let err = json_unmarshaler(br#"{"name":1}"#, &mut Destination::new(&mut greeting))
            .expect_err("type mismatch");
        check!(err.to_string().contains("'name'"));
    }

    #[test]
    fn codec_handles_are_named() {
        check!(Marshaler::default().name() == "text");
        check!(Unmarshaler::json().name() == "json");
        check!(format!("{:?}", Marshaler::json()) == r#"Marshaler("json")"#);
    }

    #[test]
    fn custom_unmarshaler_can_fill_byte_destinations() {
        let raw = Unmarshaler::new("raw", |bytes, destination| {
            destination.downcast_mut::<Vec<u8>>("raw")?.extend_from_slice(bytes);
            Ok(())
        });

        let mut collected: Vec<u8> = Vec::new();
        raw.unmarshal(b"abc", &mut Destination::new(&mut collected))
            .expect("unmarshal");
        check!(collected == b"abc");
    }
}
