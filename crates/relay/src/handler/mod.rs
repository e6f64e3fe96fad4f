//! Request handlers behind the [`Relay`](crate::router::Relay) router.

mod stats;
mod stream_proxy;

pub use stats::{STATS_BODY, StatsHandler, TEXT_PLAIN_UTF_8};
pub use stream_proxy::{DecoderCommand, FLV_CONTENT_TYPE, StreamProxy};
