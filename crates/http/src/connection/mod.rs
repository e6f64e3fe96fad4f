//! Connection handling
//!
//! [`HttpConnection`] owns one accepted connection for its whole life: it
//! reads a single request head through [`RequestDecoder`](crate::codec::RequestDecoder),
//! passes it to a [`Handler`](crate::handler::Handler) and offers the handler
//! the ways to answer:
//!
//! - a complete response with a known length
//! - a bare status line
//! - a head followed by a close-delimited body written straight to the socket

mod http_connection;

pub use http_connection::HttpConnection;
