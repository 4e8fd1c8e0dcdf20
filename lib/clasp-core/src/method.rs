//! HTTP method types.

use derive_more::Display;

/// HTTP verbs a client can dispatch.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Display)]
pub enum Method {
    /// `GET`
    #[display("GET")]
    Get,
    /// `POST`
    #[display("POST")]
    Post,
    /// `PUT`
    #[display("PUT")]
    Put,
    /// `PATCH`
    #[display("PATCH")]
    Patch,
    /// `HEAD`
    #[display("HEAD")]
    Head,
    /// `OPTIONS`
    #[display("OPTIONS")]
    Options,
    /// `DELETE`
    #[display("DELETE")]
    Delete,
}

impl Method {
    /// Every supported method, in dispatch-table order.
    pub const ALL: [Self; 7] = [
        Self::Get,
        Self::Post,
        Self::Put,
        Self::Patch,
        Self::Head,
        Self::Options,
        Self::Delete,
    ];

    /// Returns `true` if a request body given for this method is marshaled and sent.
    ///
    /// `GET`, `HEAD` and `DELETE` requests are always sent without a body.
    #[must_use]
    pub const fn sends_body(&self) -> bool {
        matches!(self, Self::Post | Self::Put | Self::Patch | Self::Options)
    }

    /// Returns `true` if the response of this method may be decoded.
    ///
    /// A `HEAD` response never carries a body.
    #[must_use]
    pub const fn decodes_response(&self) -> bool {
        !matches!(self, Self::Head)
    }
}

impl From<Method> for http::Method {
    fn from(method: Method) -> Self {
        match method {
            Method::Get => Self::GET,
            Method::Post => Self::POST,
            Method::Put => Self::PUT,
            Method::Patch => Self::PATCH,
            Method::Head => Self::HEAD,
            Method::Options => Self::OPTIONS,
            Method::Delete => Self::DELETE,
        }
    }
}
