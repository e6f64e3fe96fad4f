use std::io;
use std::process::Stdio;

use flv_http::connection::HttpConnection;
use flv_http::protocol::{HttpError, PayloadSize, ResponseHead, SendError};
use http::StatusCode;
use tokio::io::{AsyncRead, AsyncWrite};
use tokio::process::{Child, Command};
use tracing::{info, warn};

use crate::config::DecoderConfig;

pub const FLV_CONTENT_TYPE: &str = "video/x-flv";

/// The argument vector of one decoder run.
///
/// The decoder is always executed directly, never through a shell, so the
/// request path reaches it as a single argument whatever it contains.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderCommand {
    program: String,
    locator: String,
    args: Vec<String>,
}

impl DecoderCommand {
    pub fn new(config: &DecoderConfig, path: &str) -> Self {
        let locator = config.locator(path);
        let args = vec![
            "--live".to_owned(),
            format!("--timeout={}", config.timeout_secs()),
            "--quiet".to_owned(),
            "-r".to_owned(),
            locator.clone(),
            "-o".to_owned(),
            "-".to_owned(),
        ];
        Self { program: config.program().to_owned(), locator, args }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    pub fn locator(&self) -> &str {
        &self.locator
    }

    pub fn args(&self) -> &[String] {
        &self.args
    }

    /// Starts the decoder with its standard output piped back to us.
    ///
    /// Standard error is inherited and the child is killed if its handle is
    /// dropped before it was waited for.
    pub fn spawn(&self) -> io::Result<Child> {
        Command::new(&self.program)
            .args(&self.args)
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::inherit())
            .kill_on_drop(true)
            .spawn()
    }
}

/// Relays a live stream: the decoder's standard output becomes the response body.
#[derive(Debug, Clone, Default)]
pub struct StreamProxy {
    decoder: DecoderConfig,
}

impl StreamProxy {
    pub fn new(decoder: DecoderConfig) -> Self {
        Self { decoder }
    }

    /// Sends the `200 OK` head, then copies decoder output to the peer until
    /// either side ends.
    ///
    /// The head goes out before the decoder is started, so a decoder that
    /// can't be spawned leaves the peer with a head and no body. A decoder
    /// exiting with a failure status is a normal end of stream.
    pub async fn serve<R, W>(&self, path: &str, connection: &mut HttpConnection<R, W>) -> Result<(), HttpError>
    where
        R: AsyncRead + Unpin + Send,
        W: AsyncWrite + Unpin + Send,
    {
        let peer = connection.peer_addr();
        let head = ResponseHead::new(StatusCode::OK).header("Content-Type", FLV_CONTENT_TYPE);
        connection.send_head(head, PayloadSize::CloseDelimited).await?;

        let command = DecoderCommand::new(&self.decoder, path);
        let mut child = command.spawn().map_err(|e| SendError::spawn(command.program(), e))?;
        info!(peer = %peer, program = command.program(), locator = command.locator(), pid = child.id(), "decoder started");

        let Some(mut stdout) = child.stdout.take() else {
            kill(&mut child).await;
            return Err(SendError::io(io::Error::other("decoder stdout is not piped")).into());
        };

        match tokio::io::copy(&mut stdout, connection.writer_mut()).await {
            Ok(bytes) => {
                let status = child.wait().await.map_err(SendError::io)?;
                if status.success() {
                    info!(peer = %peer, bytes, "stream finished");
                } else {
                    warn!(peer = %peer, bytes, %status, "decoder exited with failure");
                }
                Ok(())
            }
            Err(e) => {
                kill(&mut child).await;
                Err(SendError::io(e).into())
            }
        }
    }
}

async fn kill(child: &mut Child) {
    if let Err(e) = child.kill().await {
        warn!(cause = %e, "can't kill decoder");
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_decoder_arguments() {
        let command = DecoderCommand::new(&DecoderConfig::default(), "/live/foo");

        assert_eq!(command.program(), "rtmpdump");
        assert_eq!(command.locator(), "rtmp://localhost/live/foo");
        assert_eq!(command.args(), ["--live", "--timeout=20", "--quiet", "-r", "rtmp://localhost/live/foo", "-o", "-"]);
    }

    #[test]
    fn path_is_one_argument() {
        let command = DecoderCommand::new(&DecoderConfig::default(), "/live/a;rm$x");

        assert_eq!(command.args().len(), 7);
        assert_eq!(command.args()[4], "rtmp://localhost/live/a;rm$x");
    }

    #[test]
    fn configured_decoder() {
        let config = DecoderConfig::new("/opt/bin/rtmpdump", "rtmp://media.lan:1935", 5);
        let command = DecoderCommand::new(&config, "/app/stream");

        assert_eq!(command.program(), "/opt/bin/rtmpdump");
        assert_eq!(command.args()[1], "--timeout=5");
        assert_eq!(command.locator(), "rtmp://media.lan:1935/app/stream");
    }

    #[tokio::test]
    async fn missing_decoder_fails_after_head() {
        let config = DecoderConfig::new("/nonexistent/flv-relay-decoder", "rtmp://localhost", 20);
        let mut connection = HttpConnection::new(&b""[..], Vec::new(), "127.0.0.1:40000".parse().unwrap());

        let err = StreamProxy::new(config).serve("/live/foo", &mut connection).await.unwrap_err();

        assert!(matches!(err, HttpError::ResponseError { source: SendError::Spawn { .. } }));
        assert_eq!(
            String::from_utf8(connection.writer_mut().clone()).unwrap(),
            "HTTP/1.0 200 OK\r\nServer: NginxDumper/0.0.1\r\nContent-Type: video/x-flv\r\n\r\n"
        );
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn decoder_output_is_the_body() {
        let config = DecoderConfig::new("echo", "rtmp://localhost", 20);
        let mut connection = HttpConnection::new(&b""[..], Vec::new(), "127.0.0.1:40000".parse().unwrap());

        StreamProxy::new(config).serve("/live/foo", &mut connection).await.unwrap();

        let written = String::from_utf8(connection.writer_mut().clone()).unwrap();
        assert_eq!(
            written,
            "HTTP/1.0 200 OK\r\nServer: NginxDumper/0.0.1\r\nContent-Type: video/x-flv\r\n\r\n\
             --live --timeout=20 --quiet -r rtmp://localhost/live/foo -o -\n"
        );
    }
}
