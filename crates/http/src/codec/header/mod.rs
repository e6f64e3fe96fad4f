//! Request head grammar and response head serialization
//!
//! - [`header_decoder`]: validates the request line and header lines one line
//!   at a time, used by [`RequestDecoder`](crate::codec::RequestDecoder)
//! - [`HeaderEncoder`]: writes the `HTTP/1.0` status line and header fields

mod header_decoder;
mod header_encoder;

pub(crate) use header_decoder::{RequestLine, is_terminator, parse_header_line, parse_request_line};
pub use header_encoder::HeaderEncoder;
