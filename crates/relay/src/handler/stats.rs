use bytes::Bytes;
use flv_http::connection::HttpConnection;
use flv_http::protocol::{HttpError, ResponseHead};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::debug;

pub const STATS_BODY: &str = "stats";
pub const TEXT_PLAIN_UTF_8: &str = "text/plain; charset=UTF-8";

/// Answers `/stats` with a fixed plain text body.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatsHandler;

impl StatsHandler {
    pub fn body(&self) -> Bytes {
        Bytes::from_static(STATS_BODY.as_bytes())
    }

    pub async fn serve<R, W>(&self, connection: &mut HttpConnection<R, W>) -> Result<(), HttpError>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let head = ResponseHead::new(StatusCode::OK).header("Content-Type", TEXT_PLAIN_UTF_8);
        connection.send_response(head, self.body()).await?;
        debug!(peer = %connection.peer_addr(), "stats sent");
        Ok(())
    }
}
