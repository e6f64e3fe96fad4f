use crate::codec::body::length_encoder::LengthEncoder;
use crate::protocol::{PayloadItem, PayloadSize, SendError};
use bytes::{Buf, BufMut, BytesMut};

use tokio_util::codec::Encoder;

/// encode payload for response body
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PayloadEncoder {
    kind: Kind,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Kind {
    /// content-length payload
    Length(LengthEncoder),

    /// payload without a declared length, passed through until eof
    CloseDelimited { eof: bool },

    /// have no body with the response
    NoBody,
}

impl PayloadEncoder {
    /// create an empty `PayloadEncoder`
    pub fn empty() -> Self {
        Self { kind: Kind::NoBody }
    }

    /// create a close delimited `PayloadEncoder`
    pub fn close_delimited() -> Self {
        Self { kind: Kind::CloseDelimited { eof: false } }
    }

    /// create a fixed length `PayloadEncoder`
    pub fn fix_length(size: u64) -> Self {
        Self { kind: Kind::Length(LengthEncoder::new(size)) }
    }

    pub fn is_finish(&self) -> bool {
        match &self.kind {
            Kind::Length(encoder) => encoder.is_finish(),
            Kind::CloseDelimited { eof } => *eof,
            Kind::NoBody => true,
        }
    }
}

impl From<PayloadSize> for PayloadEncoder {
    fn from(payload_size: PayloadSize) -> Self {
        match payload_size {
            PayloadSize::Length(size) => PayloadEncoder::fix_length(size),
            PayloadSize::CloseDelimited => PayloadEncoder::close_delimited(),
            PayloadSize::Empty => PayloadEncoder::empty(),
        }
    }
}

impl<D: Buf> Encoder<PayloadItem<D>> for PayloadEncoder {
    type Error = SendError;

    fn encode(&mut self, item: PayloadItem<D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match &mut self.kind {
            Kind::Length(encoder) => encoder.encode(item, dst),
            Kind::CloseDelimited { eof } => {
                match item {
                    PayloadItem::Chunk(bytes) => dst.put(bytes),
                    PayloadItem::Eof => *eof = true,
                }
                Ok(())
            }
            Kind::NoBody => Ok(()),
        }
    }
}
