//! Parsed request head.
//!
//! A request in this protocol subset is only its request line and header
//! fields; no body is ever read. The head does not own the connection it came
//! from: the connection hands a `&mut` of itself to the handler together with
//! the head, see [`Handler`](crate::handler::Handler).

use http::Method;

use crate::protocol::HeaderFields;

/// The request line and header fields of one request.
///
/// Built once by the [`RequestDecoder`](crate::codec::RequestDecoder) and not
/// modified afterwards.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RequestHead {
    method: Method,
    path: String,
    version: String,
    headers: HeaderFields,
}

impl RequestHead {
    pub fn new(method: Method, path: impl Into<String>, version: impl Into<String>, headers: HeaderFields) -> Self {
        Self { method, path: path.into(), version: version.into(), headers }
    }

    /// Returns a reference to the request's method, always a run of `A-Z`.
    pub fn method(&self) -> &Method {
        &self.method
    }

    /// Returns the request target exactly as sent, neither decoded nor normalized.
    pub fn path(&self) -> &str {
        &self.path
    }

    /// Returns the protocol version token as sent, e.g. `HTTP/1.1`.
    pub fn version(&self) -> &str {
        &self.version
    }

    pub fn headers(&self) -> &HeaderFields {
        &self.headers
    }
}
