use crate::codec::body::PayloadEncoder;
use crate::codec::header::HeaderEncoder;
use crate::protocol::{Message, PayloadSize, ResponseHead, SendError};
use bytes::{Buf, BytesMut};
use tokio_util::codec::Encoder;
use tracing::error;

/// Encodes a response head followed by its payload items.
///
/// The payload strategy is picked from the [`PayloadSize`] sent along with the
/// head; a head arriving while a payload is still open is rejected.
#[derive(Debug)]
pub struct ResponseEncoder {
    header_encoder: HeaderEncoder,
    payload_encoder: Option<PayloadEncoder>,
}

impl ResponseEncoder {
    pub fn new() -> Self {
        Default::default()
    }
}

impl Default for ResponseEncoder {
    fn default() -> Self {
        Self { header_encoder: HeaderEncoder, payload_encoder: None }
    }
}

impl<D: Buf> Encoder<Message<(ResponseHead, PayloadSize), D>> for ResponseEncoder {
    type Error = SendError;

    fn encode(&mut self, item: Message<(ResponseHead, PayloadSize), D>, dst: &mut BytesMut) -> Result<(), Self::Error> {
        match item {
            Message::Header((head, payload_size)) => {
                if self.payload_encoder.is_some() {
                    error!("expect payload item but receive response head");
                    return Err(SendError::invalid_body("response head sent before previous payload finished"));
                }

                let payload_encoder = PayloadEncoder::from(payload_size);
                if !payload_encoder.is_finish() {
                    self.payload_encoder = Some(payload_encoder);
                }
                self.header_encoder.encode((head, payload_size), dst)
            }

            Message::Payload(payload_item) => {
                let Some(payload_encoder) = &mut self.payload_encoder else {
                    error!("expect response header but receive payload item");
                    return Err(SendError::invalid_body("payload sent before response head"));
                };

                let result = payload_encoder.encode(payload_item, dst);

                if payload_encoder.is_finish() {
                    self.payload_encoder.take();
                }

                result
            }
        }
    }
}
