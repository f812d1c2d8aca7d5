//! hearthd - Hearth game server daemon.

use std::sync::Arc;

use hearthd::chat::GlobalChat;
use hearthd::cmd::{CommandDescriptor, CommandRegistry, Output, ParamInfo};
use hearthd::config::Config;
use hearthd::network::Gateway;
use tracing::{error, info};
use tracing_subscriber::EnvFilter;

/// Messages a slow client may fall behind on global chat before missing some.
const CHAT_CAPACITY: usize = 1024;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(true)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "config.toml".to_string());

    let config = Config::load(&config_path).map_err(|e| {
        error!(path = %config_path, error = %e, "Failed to load config");
        e
    })?;

    info!(server = %config.server.name, "Starting hearthd");

    let commands = Arc::new(CommandRegistry::new());
    register_builtins(&commands, &config.server.name);

    let chat = GlobalChat::new(CHAT_CAPACITY);
    let gateway = Gateway::bind(config.listen.address, config.session.clone(), chat, commands).await?;

    tokio::select! {
        res = gateway.run() => res?,
        _ = tokio::signal::ctrl_c() => {
            info!("Received shutdown signal");
        }
    }

    info!("Server shutdown complete");
    Ok(())
}

fn register_builtins(commands: &CommandRegistry, server_name: &str) {
    let server_name = server_name.to_string();
    commands.register(
        CommandDescriptor::new("version", "Shows the server version")
            .with_aliases(["ver", "about"])
            .with_overload(vec![ParamInfo::new("verbose", false).optional()]),
        move |_source: &str, args: &str, output: &mut Output| {
            output.print(format!(
                "This server is running {} v{}",
                env!("CARGO_PKG_NAME"),
                env!("CARGO_PKG_VERSION")
            ));
            if matches!(args.trim(), "true" | "1") {
                output.print(format!("Server name: {server_name}"));
                output.print(format!("Protocol version: {}", hearth_proto::PROTOCOL_VERSION));
            }
        },
    );
}
