use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite};

use crate::connection::HttpConnection;
use crate::protocol::{HttpError, RequestHead};

/// Serves one parsed request.
///
/// The handler receives the request together with a mutable borrow of the
/// connection it came from; the connection stays owned by the caller, which
/// closes it once the handler returns, whatever the outcome.
#[async_trait]
pub trait Handler<R, W>: Send + Sync
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn call(&self, request: RequestHead, connection: &mut HttpConnection<R, W>) -> Result<(), HttpError>;
}
