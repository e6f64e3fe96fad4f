use async_trait::async_trait;
use flv_http::connection::HttpConnection;
use flv_http::handler::Handler;
use flv_http::protocol::{HttpError, RequestHead};
use http::{Method, StatusCode};
use tokio::io::{AsyncRead, AsyncWrite};
use tracing::{info, warn};

use crate::config::DecoderConfig;
use crate::handler::{StatsHandler, StreamProxy};

pub const STATS_PATH: &str = "/stats";

/// Where a request goes, decided by its method and exact path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route<'a> {
    Stats,
    StreamProxy { path: &'a str },
    MethodNotSupported,
}

impl<'a> Route<'a> {
    pub fn of(request: &'a RequestHead) -> Self {
        if request.method() != Method::GET {
            return Route::MethodNotSupported;
        }

        match request.path() {
            STATS_PATH => Route::Stats,
            path => Route::StreamProxy { path },
        }
    }
}

/// The relay's request handler.
#[derive(Debug, Clone, Default)]
pub struct Relay {
    stats: StatsHandler,
    stream_proxy: StreamProxy,
}

impl Relay {
    pub fn new(decoder: DecoderConfig) -> Self {
        Self { stats: StatsHandler, stream_proxy: StreamProxy::new(decoder) }
    }
}

#[async_trait]
impl<R, W> Handler<R, W> for Relay
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn call(&self, request: RequestHead, connection: &mut HttpConnection<R, W>) -> Result<(), HttpError> {
        info!(peer = %connection.peer_addr(), method = %request.method(), path = request.path(), "request");

        match Route::of(&request) {
            Route::Stats => self.stats.serve(connection).await,
            Route::StreamProxy { path } => self.stream_proxy.serve(path, connection).await,
            Route::MethodNotSupported => {
                warn!(peer = %connection.peer_addr(), method = %request.method(), "method not supported");
                connection.send_status(StatusCode::BAD_REQUEST).await?;
                Ok(())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use flv_http::protocol::HeaderFields;

    fn request(method: Method, path: &str) -> RequestHead {
        RequestHead::new(method, path.to_owned(), "HTTP/1.1".to_owned(), HeaderFields::new())
    }

    #[test]
    fn routes() {
        let stats = request(Method::GET, "/stats");
        let stream = request(Method::GET, "/live/foo");
        let post = request(Method::POST, "/stats");
        let head = request(Method::HEAD, "/live/foo");

        assert_eq!(Route::of(&stats), Route::Stats);
        assert_eq!(Route::of(&stream), Route::StreamProxy { path: "/live/foo" });
        assert_eq!(Route::of(&post), Route::MethodNotSupported);
        assert_eq!(Route::of(&head), Route::MethodNotSupported);
    }

    #[test]
    fn stats_path_is_exact() {
        let query = request(Method::GET, "/stats?x=1");
        let trailing = request(Method::GET, "/stats/");
        let root = request(Method::GET, "/");

        assert_eq!(Route::of(&query), Route::StreamProxy { path: "/stats?x=1" });
        assert_eq!(Route::of(&trailing), Route::StreamProxy { path: "/stats/" });
        assert_eq!(Route::of(&root), Route::StreamProxy { path: "/" });
    }

    #[tokio::test]
    async fn unsupported_method_gets_bad_request() {
        let mut connection = HttpConnection::new(&b"POST /stats HTTP/1.0\r\n\r\n"[..], Vec::new(), "127.0.0.1:40000".parse().unwrap());
        connection.process(&Relay::default()).await.unwrap();

        assert_eq!(
            String::from_utf8(connection.writer_mut().clone()).unwrap(),
            "HTTP/1.0 400 Bad Request\r\nServer: NginxDumper/0.0.1\r\nContent-Length: 0\r\n\r\n"
        );
    }

    #[tokio::test]
    async fn stats_request() {
        let mut connection = HttpConnection::new(&b"GET /stats HTTP/1.0\r\n\r\n"[..], Vec::new(), "127.0.0.1:40000".parse().unwrap());
        connection.process(&Relay::default()).await.unwrap();

        let written = String::from_utf8(connection.writer_mut().clone()).unwrap();
        assert!(written.starts_with("HTTP/1.0 200 OK\r\n"));
        assert!(written.ends_with("\r\n\r\nstats"));
    }
}
