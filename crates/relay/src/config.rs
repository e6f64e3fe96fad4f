//! Server configuration and the command line that produces it.
//!
//! [`ServerConfig`] is immutable once built; the [`Server`](crate::Server)
//! owns it for its whole lifetime.

use std::time::Duration;

use clap::Parser;
use tracing::Level;

pub const DEFAULT_HOST: &str = "0.0.0.0";
pub const DEFAULT_PORT: u16 = 6000;
pub const DEFAULT_DECODER: &str = "rtmpdump";
pub const DEFAULT_UPSTREAM: &str = "rtmp://localhost";
pub const DEFAULT_DECODER_TIMEOUT_SECS: u64 = 20;

/// How the external decoder is invoked for a stream request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DecoderConfig {
    program: String,
    upstream: String,
    timeout_secs: u64,
}

impl DecoderConfig {
    pub fn new(program: impl Into<String>, upstream: impl Into<String>, timeout_secs: u64) -> Self {
        Self { program: program.into(), upstream: upstream.into(), timeout_secs }
    }

    /// Executable to spawn, looked up in `PATH` when not a path.
    pub fn program(&self) -> &str {
        &self.program
    }

    /// Scheme and host prefixed to the request path, e.g. `rtmp://localhost`.
    pub fn upstream(&self) -> &str {
        &self.upstream
    }

    /// Seconds the decoder waits for the live stream before giving up.
    pub fn timeout_secs(&self) -> u64 {
        self.timeout_secs
    }

    /// Source locator of the stream named by a request path.
    pub fn locator(&self, path: &str) -> String {
        format!("{}{}", self.upstream, path)
    }
}

impl Default for DecoderConfig {
    fn default() -> Self {
        Self::new(DEFAULT_DECODER, DEFAULT_UPSTREAM, DEFAULT_DECODER_TIMEOUT_SECS)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ServerConfig {
    host: String,
    port: u16,
    decoder: DecoderConfig,
    shutdown_grace: Option<Duration>,
    log_level: Level,
}

impl ServerConfig {
    pub fn builder() -> ServerConfigBuilder {
        ServerConfigBuilder::default()
    }

    /// `host:port`, with IPv6 hosts in brackets.
    pub fn address(&self) -> String {
        if self.host.contains(':') && !self.host.starts_with('[') {
            format!("[{}]:{}", self.host, self.port)
        } else {
            format!("{}:{}", self.host, self.port)
        }
    }

    pub fn decoder(&self) -> &DecoderConfig {
        &self.decoder
    }

    /// Upper bound on how long in-flight connections may keep the process
    /// alive after an interrupt. `None` waits for all of them to end.
    pub fn shutdown_grace(&self) -> Option<Duration> {
        self.shutdown_grace
    }

    pub fn log_level(&self) -> Level {
        self.log_level
    }
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self::builder().build()
    }
}

#[derive(Debug, Default)]
pub struct ServerConfigBuilder {
    host: Option<String>,
    port: Option<u16>,
    decoder: Option<DecoderConfig>,
    shutdown_grace: Option<Duration>,
    log_level: Option<Level>,
}

impl ServerConfigBuilder {
    pub fn host(mut self, host: impl Into<String>) -> Self {
        self.host = Some(host.into());
        self
    }

    pub fn port(mut self, port: u16) -> Self {
        self.port = Some(port);
        self
    }

    pub fn decoder(mut self, decoder: DecoderConfig) -> Self {
        self.decoder = Some(decoder);
        self
    }

    pub fn shutdown_grace(mut self, shutdown_grace: Duration) -> Self {
        self.shutdown_grace = Some(shutdown_grace);
        self
    }

    pub fn log_level(mut self, log_level: Level) -> Self {
        self.log_level = Some(log_level);
        self
    }

    pub fn build(self) -> ServerConfig {
        ServerConfig {
            host: self.host.unwrap_or_else(|| DEFAULT_HOST.to_owned()),
            port: self.port.unwrap_or(DEFAULT_PORT),
            decoder: self.decoder.unwrap_or_default(),
            shutdown_grace: self.shutdown_grace,
            log_level: self.log_level.unwrap_or(Level::INFO),
        }
    }
}

/// Command line of the `flv-relay` binary.
#[derive(Parser, Debug)]
#[command(name = "flv-relay", version, about = "Serve live RTMP streams to HTTP-FLV players")]
pub struct Cli {
    /// Address to listen on
    #[arg(long, default_value = DEFAULT_HOST)]
    pub host: String,

    /// Port to listen on
    #[arg(short, long, default_value_t = DEFAULT_PORT)]
    pub port: u16,

    /// Decoder executable that writes the stream to its standard output
    #[arg(long, value_name = "PROGRAM", default_value = DEFAULT_DECODER)]
    pub decoder: String,

    /// Scheme and host the request path is appended to
    #[arg(long, value_name = "URL", default_value = DEFAULT_UPSTREAM)]
    pub upstream: String,

    /// Seconds the decoder waits for the live stream
    #[arg(long, value_name = "SECS", default_value_t = DEFAULT_DECODER_TIMEOUT_SECS)]
    pub decoder_timeout: u64,

    /// Give up waiting for in-flight connections this many seconds after an
    /// interrupt [default: wait until all of them end]
    #[arg(long, value_name = "SECS")]
    pub shutdown_grace: Option<u64>,

    /// Log level (error, warn, info, debug, trace)
    #[arg(long, default_value = "info")]
    pub log_level: Level,
}

impl From<Cli> for ServerConfig {
    fn from(cli: Cli) -> Self {
        let builder = ServerConfig::builder()
            .host(cli.host)
            .port(cli.port)
            .decoder(DecoderConfig::new(cli.decoder, cli.upstream, cli.decoder_timeout))
            .log_level(cli.log_level);

        match cli.shutdown_grace {
            Some(secs) => builder.shutdown_grace(Duration::from_secs(secs)).build(),
            None => builder.build(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults() {
        let config = ServerConfig::from(Cli::try_parse_from(["flv-relay"]).unwrap());

        assert_eq!(config, ServerConfig::default());
        assert_eq!(config.address(), "0.0.0.0:6000");
        assert_eq!(config.decoder().program(), "rtmpdump");
        assert_eq!(config.decoder().upstream(), "rtmp://localhost");
        assert_eq!(config.decoder().timeout_secs(), 20);
        assert_eq!(config.shutdown_grace(), None);
        assert_eq!(config.log_level(), Level::INFO);
    }

    #[test]
    fn overrides() {
        let cli = Cli::try_parse_from([
            "flv-relay",
            "--host",
            "127.0.0.1",
            "-p",
            "8080",
            "--decoder",
            "/usr/local/bin/rtmpdump",
            "--upstream",
            "rtmp://media.lan:1935",
            "--decoder-timeout",
            "5",
            "--shutdown-grace",
            "3",
            "--log-level",
            "debug",
        ])
        .unwrap();
        let config = ServerConfig::from(cli);

        assert_eq!(config.address(), "127.0.0.1:8080");
        assert_eq!(config.decoder(), &DecoderConfig::new("/usr/local/bin/rtmpdump", "rtmp://media.lan:1935", 5));
        assert_eq!(config.shutdown_grace(), Some(Duration::from_secs(3)));
        assert_eq!(config.log_level(), Level::DEBUG);
    }

    #[test]
    fn ipv6_host_is_bracketed() {
        let config = ServerConfig::builder().host("::").port(6000).build();
        assert_eq!(config.address(), "[::]:6000");
    }

    #[test]
    fn rejects_bad_port() {
        assert!(Cli::try_parse_from(["flv-relay", "--port", "70000"]).is_err());
    }

    #[test]
    fn locator_prefixes_path() {
        assert_eq!(DecoderConfig::default().locator("/live/foo"), "rtmp://localhost/live/foo");
    }
}
