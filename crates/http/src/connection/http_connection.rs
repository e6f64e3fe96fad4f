use std::net::SocketAddr;

use bytes::Bytes;
use futures::{SinkExt, StreamExt};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio_util::codec::{FramedRead, FramedWrite};
use tracing::{error, warn};

use crate::codec::{RequestDecoder, ResponseEncoder};
use crate::handler::Handler;
use crate::protocol::{HttpError, Message, ParseError, PayloadItem, PayloadSize, RequestHead, ResponseHead, SendError};

type ResponseMessage = Message<(ResponseHead, PayloadSize)>;

/// One accepted connection: its read half, its write half and the peer address.
///
/// The peer address is captured at accept time, since it can't be queried any
/// more once the socket is closed. A connection serves exactly one request; the
/// owner drops it, or calls [`close`](Self::close), when the handler is done.
///
/// # Type Parameters
///
/// * `R`: The async readable stream type
/// * `W`: The async writable stream type
#[derive(Debug)]
pub struct HttpConnection<R, W> {
    framed_read: FramedRead<R, RequestDecoder>,
    framed_write: FramedWrite<W, ResponseEncoder>,
    peer_addr: SocketAddr,
}

impl<R, W> HttpConnection<R, W>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    pub fn new(reader: R, writer: W, peer_addr: SocketAddr) -> Self {
        Self {
            framed_read: FramedRead::with_capacity(reader, RequestDecoder::new(), 8 * 1024),
            framed_write: FramedWrite::new(writer, ResponseEncoder::new()),
            peer_addr,
        }
    }

    pub fn peer_addr(&self) -> SocketAddr {
        self.peer_addr
    }

    /// Parses one request and hands it to `handler`.
    ///
    /// A request that can't be parsed is answered with `400 Bad Request`
    /// (best effort) and returned as [`HttpError::RequestError`]. Handler
    /// errors are returned as they are.
    pub async fn process<H>(&mut self, handler: &H) -> Result<(), HttpError>
    where
        H: Handler<R, W> + ?Sized,
    {
        let request = match self.read_request().await {
            Ok(request) => request,
            Err(e) => {
                error!(peer = %self.peer_addr, cause = %e, "can't parse request");
                if let Err(send_error) = self.send_status(StatusCode::BAD_REQUEST).await {
                    warn!(peer = %self.peer_addr, cause = %send_error, "can't send bad request response");
                }
                return Err(e.into());
            }
        };

        handler.call(request, self).await
    }

    /// Reads exactly one request head. End of stream before a complete head is
    /// an error, never an empty request.
    pub async fn read_request(&mut self) -> Result<RequestHead, ParseError> {
        match self.framed_read.next().await {
            Some(result) => result,
            None => Err(ParseError::unexpected_eof(self.framed_read.read_buffer())),
        }
    }

    /// Sends a complete response whose `Content-Length` is the length of `body`.
    pub async fn send_response(&mut self, head: ResponseHead, body: Bytes) -> Result<(), SendError> {
        if body.is_empty() {
            return self.send_head(head, PayloadSize::Empty).await;
        }

        let length = body.len() as u64;
        self.framed_write.feed(ResponseMessage::Header((head, PayloadSize::Length(length)))).await?;
        self.framed_write.send(ResponseMessage::Payload(PayloadItem::Chunk(body))).await
    }

    /// Sends a bodyless response with the given status.
    pub async fn send_status(&mut self, status: StatusCode) -> Result<(), SendError> {
        self.send_head(ResponseHead::new(status), PayloadSize::Empty).await
    }

    /// Sends only the head and flushes it to the peer.
    ///
    /// With [`PayloadSize::CloseDelimited`] the body is then written straight
    /// to [`writer_mut`](Self::writer_mut) and ends when the connection closes.
    pub async fn send_head(&mut self, head: ResponseHead, payload_size: PayloadSize) -> Result<(), SendError> {
        self.framed_write.send(ResponseMessage::Header((head, payload_size))).await
    }

    /// The raw write half, for bodies that bypass the encoder.
    ///
    /// Anything fed to the encoder must have been flushed before writing here.
    pub fn writer_mut(&mut self) -> &mut W {
        self.framed_write.get_mut()
    }

    /// Flushes pending bytes and shuts down the write half.
    pub async fn close(&mut self) -> Result<(), SendError> {
        SinkExt::<ResponseMessage>::close(&mut self.framed_write).await
    }
}
