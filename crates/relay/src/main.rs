use std::process::ExitCode;

use clap::Parser;
use flv_relay::{Cli, Relay, Server, ServerConfig, logging};
use tracing::error;

#[tokio::main]
async fn main() -> ExitCode {
    let config = ServerConfig::from(Cli::parse());

    if let Err(e) = logging::init(config.log_level()) {
        eprintln!("setting default subscriber failed: {e}");
        return ExitCode::FAILURE;
    }

    let relay = Relay::new(config.decoder().clone());
    match Server::new(config, relay).run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!(cause = %e, "server stopped");
            ExitCode::FAILURE
        }
    }
}
