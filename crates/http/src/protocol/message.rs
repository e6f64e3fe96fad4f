use bytes::{Buf, Bytes};

/// Represents a HTTP message that can either be a header or payload.
///
/// The generic parameter `T` is the head type (on the write side a
/// [`ResponseHead`](crate::protocol::ResponseHead) plus its [`PayloadSize`]),
/// while `Data` is the type of the payload chunks (defaults to `Bytes`).
#[derive(Debug)]
pub enum Message<T, Data: Buf = Bytes> {
    /// Contains the header information of type `T`
    Header(T),
    /// Contains a chunk of payload data or EOF marker
    Payload(PayloadItem<Data>),
}

/// Represents an item in the HTTP message payload stream.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PayloadItem<Data: Buf = Bytes> {
    /// A chunk of payload data
    Chunk(Data),
    /// Marks the end of the payload stream
    Eof,
}

/// Represents the size information of a response payload.
///
/// HTTP/1.0 has no chunked framing, so a body of unknown length is delimited by
/// closing the connection.
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub enum PayloadSize {
    /// Payload with known length in bytes, announced through `Content-Length`
    Length(u64),
    /// Payload of unknown length, it ends when the connection is closed
    CloseDelimited,
    /// Empty payload (no body)
    Empty,
}

/// Converts bytes into a payload Message
impl<T> From<Bytes> for Message<T> {
    fn from(bytes: Bytes) -> Self {
        Self::Payload(PayloadItem::Chunk(bytes))
    }
}
