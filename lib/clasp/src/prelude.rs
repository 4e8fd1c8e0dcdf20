//! Prelude module for convenient imports.
//!
//! ```
//! use clasp::prelude::*;
//! ```

pub use crate::{
    CallError, CallResult, Client, ContentType, DecodeMap, Destination, Error, HeaderMap,
    HttpClient, HyperClient, Marshaler, Method, Params, QueryParams, Request, RequestMutator,
    Response, ResponseMutator, Result, StatusCode, Transport, TransportConfig, Unmarshaler,
    header, setup_for_json,
};
pub use serde::{Deserialize, Serialize};
