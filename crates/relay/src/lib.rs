//! A minimal HTTP-FLV relay
//!
//! Players ask for a live stream with `GET /<app>/<stream>`; the relay starts
//! an external decoder (`rtmpdump` by default) against
//! `rtmp://localhost/<app>/<stream>` and pipes its standard output back as a
//! `video/x-flv` body until either side hangs up. `GET /stats` answers with a
//! fixed body, any other method with `400 Bad Request`.
//!
//! Each accepted connection is served by its own task, a connection unit;
//! a failure inside one unit is logged and never affects the accept loop or
//! any other unit.
//!
//! # Example
//!
//! ```no_run
//! use flv_relay::{Relay, Server, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), flv_relay::ServerError> {
//!     let config = ServerConfig::builder().host("127.0.0.1").port(6000).build();
//!     let relay = Relay::new(config.decoder().clone());
//!     Server::new(config, relay).run().await
//! }
//! ```

pub mod config;
pub mod handler;
pub mod logging;
pub mod router;
pub mod server;

pub use config::{Cli, DecoderConfig, ServerConfig};
pub use router::{Relay, Route};
pub use server::{Server, ServerError};
