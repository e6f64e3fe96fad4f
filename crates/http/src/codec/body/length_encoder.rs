use crate::protocol::{PayloadItem, SendError};
use bytes::{Buf, BufMut, BytesMut};
use tokio_util::codec::Encoder;
use tracing::warn;

/// Writes exactly the announced `Content-Length` bytes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LengthEncoder {
    length: u64,
}

impl LengthEncoder {
    pub fn new(length: u64) -> Self {
        Self { length }
    }

    pub fn is_finish(&self) -> bool {
        self.length == 0
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for LengthEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            PayloadItem::Chunk(bytes) => {
                if !bytes.has_remaining() {
                    return Ok(());
                }
                let size = bytes.remaining() as u64;
                if size > self.length {
                    warn!(size, remaining = self.length, "payload chunk exceeds content-length");
                    return Err(SendError::invalid_body(format!("chunk of {size} bytes exceeds remaining length {}", self.length)));
                }
                dst.put(bytes);
                self.length -= size;
                Ok(())
            }
            PayloadItem::Eof => Ok(()),
        }
    }
}
