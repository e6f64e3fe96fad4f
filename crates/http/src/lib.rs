//! The HTTP subset spoken by the flv relay
//!
//! This crate reads exactly one request per connection, the request line and
//! header fields only, and writes `HTTP/1.0` responses back. It is built on
//! tokio and `tokio-util` codecs.
//!
//! # Features
//!
//! - Line-oriented request parsing with a strict grammar and literal error reports
//! - Case-sensitive header names, repeated names folded with `", "`
//! - Fixed-length, empty and close-delimited response bodies
//! - Direct access to the write half for streaming bodies produced elsewhere
//!
//! # Example
//!
//! ```no_run
//! use async_trait::async_trait;
//! use bytes::Bytes;
//! use http::StatusCode;
//! use tokio::net::TcpListener;
//! use tokio::net::tcp::{OwnedReadHalf, OwnedWriteHalf};
//! use tracing::{error, info};
//! use flv_http::connection::HttpConnection;
//! use flv_http::handler::Handler;
//! use flv_http::protocol::{HttpError, RequestHead, ResponseHead};
//!
//! struct Hello;
//!
//! #[async_trait]
//! impl Handler<OwnedReadHalf, OwnedWriteHalf> for Hello {
//!     async fn call(
//!         &self,
//!         request: RequestHead,
//!         connection: &mut HttpConnection<OwnedReadHalf, OwnedWriteHalf>,
//!     ) -> Result<(), HttpError> {
//!         info!(path = request.path(), "receive request");
//!         let head = ResponseHead::new(StatusCode::OK).header("Content-Type", "text/plain; charset=UTF-8");
//!         connection.send_response(head, Bytes::from_static(b"hello")).await?;
//!         Ok(())
//!     }
//! }
//!
//! #[tokio::main]
//! async fn main() -> std::io::Result<()> {
//!     let listener = TcpListener::bind("127.0.0.1:8080").await?;
//!     loop {
//!         let (stream, peer_addr) = listener.accept().await?;
//!         tokio::spawn(async move {
//!             let (reader, writer) = stream.into_split();
//!             let mut connection = HttpConnection::new(reader, writer, peer_addr);
//!             if let Err(e) = connection.process(&Hello).await {
//!                 error!(cause = %e, "service has error, connection shutdown");
//!             }
//!             let _ = connection.close().await;
//!         });
//!     }
//! }
//! ```
//!
//! # Architecture
//!
//! - [`connection`]: one connection's lifecycle, [`connection::HttpConnection`]
//! - [`protocol`]: request/response types and errors
//! - [`codec`]: the request decoder and response encoder
//! - [`handler`]: the [`handler::Handler`] trait a connection dispatches to
//!
//! # Error Handling
//!
//! - [`protocol::HttpError`]: Top-level error type
//! - [`protocol::ParseError`]: the request did not match the grammar
//! - [`protocol::SendError`]: the response could not be produced or written
//!
//! # Limitations
//!
//! - One request per connection, no keep-alive
//! - Request bodies are never read
//! - No chunked transfer encoding, no TLS
//! - Maximum head size: 8KB
//! - Maximum number of header lines: 64

pub mod codec;
pub mod connection;
pub mod handler;
pub mod protocol;

mod utils;
pub(crate) use utils::ensure;
