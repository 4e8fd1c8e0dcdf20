//! Error types for clasp.

use derive_more::{Display, Error, From};

/// Main error type for clasp operations.
#[derive(Debug, Display, Error, From)]
pub enum Error {
    /// URL parsing error.
    #[display("invalid URL: {_0}")]
    #[from]
    InvalidUrl(url::ParseError),

    /// A composed request target is not a valid URI.
    #[display("invalid request target: {_0}")]
    #[from(skip)]
    InvalidTarget(#[error(not(source))] String),

    /// Unusable client configuration (e.g. a base URL that cannot carry a path).
    #[display("invalid configuration: {_0}")]
    #[from(skip)]
    Configuration(#[error(not(source))] String),

    /// Network/connection errors.
    #[display("connection error: {_0}")]
    #[from(skip)]
    Connection(#[error(not(source))] String),

    /// TLS/SSL errors.
    #[display("TLS error: {_0}")]
    #[from(skip)]
    Tls(#[error(not(source))] String),

    /// Request timeout.
    #[display("request timeout")]
    #[from(skip)]
    Timeout,

    /// The request could not be turned into a wire request.
    #[display("invalid request: {_0}")]
    #[from(skip)]
    InvalidRequest(#[error(not(source))] String),

    /// Header name or value rejected.
    #[display("invalid header: {_0}")]
    #[from(skip)]
    InvalidHeader(#[error(not(source))] String),

    /// A request or response mutator reported a failure.
    #[display("mutator failed: {_0}")]
    #[from(skip)]
    Mutator(#[error(not(source))] String),

    /// The configured marshaler does not know how to encode the body value.
    #[display("the {marshaler} marshaler cannot encode a body of type `{type_name}`")]
    #[from(skip)]
    UnsupportedBody {
        /// Marshaler name (e.g. `text`).
        marshaler: &'static str,
        /// Rust type name of the rejected body.
        type_name: &'static str,
    },

    /// JSON serialization error.
    #[display("JSON serialization error: {_0}")]
    #[from]
    JsonSerialization(serde_json::Error),

    /// A destination was handed over by value, so decoding could never reach the caller.
    #[display(
        "destination of type `{type_name}` must be passed by reference, e.g. `Destination::new(&mut value)`"
    )]
    #[from(skip)]
    PassByValue {
        /// Rust type name of the destination value.
        type_name: &'static str,
    },

    /// The configured unmarshaler does not know how to fill the destination type.
    #[display("the {unmarshaler} unmarshaler cannot decode into `{type_name}`")]
    #[from(skip)]
    UnsupportedDestination {
        /// Unmarshaler name (e.g. `text`).
        unmarshaler: &'static str,
        /// Rust type name of the destination.
        type_name: &'static str,
    },

    /// Response body is not valid UTF-8 text.
    #[display("response body is not valid UTF-8: {_0}")]
    #[from]
    InvalidText(std::str::Utf8Error),

    /// JSON deserialization error with path context.
    #[display("JSON deserialization error at '{path}': {message}")]
    #[from(skip)]
    JsonDeserialization {
        /// JSON path to the error (e.g., "user.address.city").
        path: String,
        /// Error message.
        message: String,
    },
}

/// Result type alias using [`crate::Error`].
pub type Result<T> = std::result::Result<T, Error>;

impl Error {
    /// Create a configuration error.
    #[must_use]
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }

    /// Create an invalid request target error.
    #[must_use]
    pub fn invalid_target(message: impl Into<String>) -> Self {
        Self::InvalidTarget(message.into())
    }

    /// Create a connection error.
    #[must_use]
    pub fn connection(message: impl Into<String>) -> Self {
        Self::Connection(message.into())
    }

    /// Create a TLS error.
    #[must_use]
    pub fn tls(message: impl Into<String>) -> Self {
        Self::Tls(message.into())
    }

    /// Create an invalid request error.
    #[must_use]
    pub fn invalid_request(message: impl Into<String>) -> Self {
        Self::InvalidRequest(message.into())
    }

    /// Create an invalid header error.
    #[must_use]
    pub fn invalid_header(message: impl Into<String>) -> Self {
        Self::InvalidHeader(message.into())
    }

    /// Create a mutator error.
    ///
    /// Mutators are free to return any other variant; this one is for
    /// failures that have no better home.
    #[must_use]
    pub fn mutator(message: impl Into<String>) -> Self {
        Self::Mutator(message.into())
    }

    /// Create a JSON deserialization error with path context.
    #[must_use]
    pub fn json_deserialization(path: impl Into<String>, message: impl Into<String>) -> Self {
        Self::JsonDeserialization {
            path: path.into(),
            message: message.into(),
        }
    }

    /// Returns `true` if this is a timeout error.
    #[must_use]
    pub const fn is_timeout(&self) -> bool {
        matches!(self, Self::Timeout)
    }

    /// Returns `true` if this is a connection error.
    #[must_use]
    pub const fn is_connection(&self) -> bool {
        matches!(self, Self::Connection(_))
    }

    /// Returns `true` if the error comes from the network layer
    /// (connection, TLS, timeout or an unsendable request).
    #[must_use]
    pub const fn is_transport(&self) -> bool {
        matches!(
            self,
            Self::Connection(_) | Self::Tls(_) | Self::Timeout | Self::InvalidRequest(_)
        )
    }

    /// Returns `true` if encoding the request body failed.
    #[must_use]
    pub const fn is_marshal(&self) -> bool {
        matches!(
            self,
            Self::UnsupportedBody { .. } | Self::JsonSerialization(_)
        )
    }

    /// Returns `true` if decoding the response body failed.
    #[must_use]
    pub const fn is_unmarshal(&self) -> bool {
        matches!(
            self,
            Self::PassByValue { .. }
                | Self::UnsupportedDestination { .. }
                | Self::InvalidText(_)
                | Self::JsonDeserialization { .. }
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display() {
        let err = Error::Timeout;
        assert_eq!(err.to_string(), "request timeout");

        let err = Error::connection("failed to connect");
        assert_eq!(err.to_string(), "connection error: failed to connect");

        let err = Error::json_deserialization("user.address.city", "missing field `city`");
        assert_eq!(
            err.to_string(),
            "JSON deserialization error at 'user.address.city': missing field `city`"
        );
    }

    #[test]
    fn pass_by_value_display() {
        let err = Error::PassByValue {
            type_name: "alloc::string::String",
        };
        insta::assert_snapshot!(
            err.to_string(),
            @"destination of type `alloc::string::String` must be passed by reference, e.g. `Destination::new(&mut value)`"
        );
    }

    #[test]
    fn unsupported_body_display() {
        let err = Error::UnsupportedBody {
            marshaler: "text",
            type_name: "u32",
        };
        insta::assert_snapshot!(err.to_string(), @"the text marshaler cannot encode a body of type `u32`");
    }

    #[test]
    fn error_categories() {
        assert!(Error::Timeout.is_transport());
        assert!(Error::tls("bad cert").is_transport());
        assert!(!Error::mutator("nope").is_transport());

        assert!(
            Error::UnsupportedBody {
                marshaler: "text",
                type_name: "u32"
            }
            .is_marshal()
        );
        assert!(Error::PassByValue { type_name: "u32" }.is_unmarshal());
        assert!(Error::json_deserialization("", "eof").is_unmarshal());
        assert!(!Error::configuration("no base").is_unmarshal());
    }

    #[test]
    fn error_is_timeout() {
        assert!(Error::Timeout.is_timeout());
        assert!(!Error::connection("refused").is_timeout());
    }

    #[test]
    fn error_is_connection() {
        assert!(Error::connection("failed").is_connection());
        assert!(!Error::Timeout.is_connection());
    }

    #[test]
    fn url_error_converts() {
        let err: Error = url::Url::parse("not a url")
            .expect_err("should not parse")
            .into();
        assert!(matches!(err, Error::InvalidUrl(_)));
    }

    #[test]
    fn invalid_target_display() {
        let err = Error::invalid_target("http://host/a b: invalid uri character");
        insta::assert_snapshot!(
            err.to_string(),
            @"invalid request target: http://host/a b: invalid uri character"
        );
        assert!(!err.is_transport());
    }
}
