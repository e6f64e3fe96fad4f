//! HTTP header encoder implementation for serializing response heads
//!
//! The status line is always `HTTP/1.0`. `Content-Length` is derived from the
//! [`PayloadSize`]: set for a known length, `0` for an empty body, and left out
//! for a close-delimited body whose end is the connection closing.

use crate::protocol::{PayloadSize, ResponseHead, SendError};

use bytes::{BufMut, BytesMut};

use std::io;
use std::io::Write;
use tokio_util::codec::Encoder;

/// Initial buffer size allocated for header serialization
const INIT_HEADER_SIZE: usize = 512;

const CONTENT_LENGTH: &str = "Content-Length";

/// Encoder for HTTP response heads implementing the [`Encoder`] trait.
#[derive(Debug)]
pub struct HeaderEncoder;

impl Encoder<(ResponseHead, PayloadSize)> for HeaderEncoder {
    type Error = SendError;

    fn encode(&mut self, item: (ResponseHead, PayloadSize), dst: &mut BytesMut) -> Result<(), Self::Error> {
        let (mut head, payload_size) = item;

        dst.reserve(INIT_HEADER_SIZE);
        let status = head.status();
        write!(FastWrite(dst), "HTTP/1.0 {} {}\r\n", status.as_str(), status.canonical_reason().unwrap_or("Unknown"))?;

        match payload_size {
            PayloadSize::Length(n) => head.set(CONTENT_LENGTH, n.to_string()),
            PayloadSize::Empty => head.set(CONTENT_LENGTH, "0".to_owned()),
            PayloadSize::CloseDelimited => {}
        }

        for (name, value) in head.headers() {
            dst.put_slice(name.as_bytes());
            dst.put_slice(b": ");
            dst.put_slice(value.as_bytes());
            dst.put_slice(b"\r\n");
        }
        dst.put_slice(b"\r\n");
        Ok(())
    }
}

/// Adapts `BytesMut` to `io::Write` so the status line can use `write!`.
struct FastWrite<'a>(&'a mut BytesMut);

impl Write for FastWrite<'_> {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.put_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
