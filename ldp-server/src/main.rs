//! LDP server CLI
//!
//! Run with: `cargo run -p ldp-server -- --help`

use clap::{CommandFactory, FromArgMatches};
use ldp_server::{
    telemetry::{init_logging, TelemetryConfig},
    LdpServer, ServerConfig,
};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Parse CLI + env via clap
    let matches = ServerConfig::command().get_matches();
    let config = ServerConfig::from_arg_matches(&matches)?;

    let telemetry_config = TelemetryConfig::with_server_config(&config);
    init_logging(&telemetry_config);

    tracing::info!(
        version = env!("CARGO_PKG_VERSION"),
        addr = %config.listen_addr,
        base_uri = %config.base_uri(),
        container_type = ?config.container_type,
        put = config.put_enabled(),
        patch = config.patch_enabled(),
        delete = config.delete_enabled(),
        if_match_required = config.require_if_match(),
        cors = config.cors_enabled,
        log_format = ?telemetry_config.log_format,
        "Starting LDP server"
    );

    let server = LdpServer::new(config)?;
    server.run().await.map_err(Into::into)
}
