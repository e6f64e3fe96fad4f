//! Response body encoding
//!
//! - [`LengthEncoder`](length_encoder::LengthEncoder): writes exactly the
//!   announced `Content-Length` bytes
//! - [`PayloadEncoder`]: picks the strategy from a
//!   [`PayloadSize`](crate::protocol::PayloadSize), including the HTTP/1.0
//!   close-delimited body
//!
//! Request bodies are never decoded, the protocol subset stops after the head.

mod length_encoder;
mod payload_encoder;

pub use payload_encoder::PayloadEncoder;
