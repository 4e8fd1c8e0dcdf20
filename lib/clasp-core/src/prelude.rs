//! Prelude module for convenient imports.
//!
//! ```
//! use clasp_core::prelude::*;
//! ```

pub use crate::{
    ContentType, Destination, Error, HeaderMap, HttpClient, Marshaler, Method, Payload,
    QueryParams, Request, RequestBody, RequestBuilder, Response, Result, Transport, Unmarshaler,
    from_json, to_json,
};
