//! HTTP codec module for decoding request heads and encoding responses
//!
//! - [`RequestDecoder`]: line-oriented decoder for the request line and header
//!   fields, built on the line grammar of the request head
//! - [`ResponseEncoder`]: writes the `HTTP/1.0` response head and then the
//!   payload according to its [`PayloadSize`](crate::protocol::PayloadSize)
//!
//! Both plug into `tokio_util::codec::{FramedRead, FramedWrite}`.
//!
//! # Example
//!
//! ```
//! use flv_http::codec::ResponseEncoder;
//! use flv_http::protocol::{Message, PayloadSize, ResponseHead};
//! use tokio_util::codec::Encoder;
//! use bytes::{Bytes, BytesMut};
//! use http::StatusCode;
//!
//! let mut encoder = ResponseEncoder::new();
//! let mut buffer = BytesMut::new();
//! let head = ResponseHead::new(StatusCode::BAD_REQUEST);
//! encoder.encode(Message::<_, Bytes>::Header((head, PayloadSize::Empty)), &mut buffer).unwrap();
//! assert!(buffer.starts_with(b"HTTP/1.0 400 Bad Request\r\n"));
//! ```

mod body;
mod header;
mod request_decoder;
mod response_encoder;

pub use request_decoder::RequestDecoder;
pub use response_encoder::ResponseEncoder;
