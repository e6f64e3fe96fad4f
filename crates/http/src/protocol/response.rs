//! HTTP response head.
//!
//! Responses are always written as `HTTP/1.0`, whatever version the request
//! named. Header names keep the capitalization they were given.

use http::StatusCode;

/// Value of the `Server` header carried by every response.
pub const SERVER_NAME: &str = "NginxDumper/0.0.1";

/// Status and header fields of a response, before any payload.
///
/// `Content-Length` is filled in by the
/// [`ResponseEncoder`](crate::codec::ResponseEncoder) from the payload size.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ResponseHead {
    status: StatusCode,
    headers: Vec<(&'static str, String)>,
}

impl ResponseHead {
    /// Creates a head with the given status and the `Server` header.
    pub fn new(status: StatusCode) -> Self {
        Self { status, headers: vec![("Server", SERVER_NAME.to_owned())] }
    }

    /// Appends a header field, keeping insertion order on the wire.
    #[must_use]
    pub fn header(mut self, name: &'static str, value: impl Into<String>) -> Self {
        self.headers.push((name, value.into()));
        self
    }

    pub fn status(&self) -> StatusCode {
        self.status
    }

    pub fn headers(&self) -> impl Iterator<Item = (&'static str, &str)> {
        self.headers.iter().map(|(n, v)| (*n, v.as_str()))
    }

    pub(crate) fn set(&mut self, name: &'static str, value: String) {
        match self.headers.iter_mut().find(|(n, _)| n.eq_ignore_ascii_case(name)) {
            Some((_, stored)) => *stored = value,
            None => self.headers.push((name, value)),
        }
    }
}
