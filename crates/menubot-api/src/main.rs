//! menubot CLI and webhook server entry point.
//!
//! Binary name: `menubot`
//!
//! Loads configuration, installs the tracing subscriber, then dispatches to
//! the command handler or starts the webhook server.

mod cli;
mod http;
mod state;

use clap::Parser;
use clap_complete::generate;

use menubot_infra::config::load_config;
use menubot_infra::flows::resolve_flows;
use menubot_observe::tracing_setup::{init_tracing, shutdown_tracing};

use cli::{Cli, Commands};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Shell completions don't need configuration
    if let Commands::Completions { shell } = &cli.command {
        let mut cmd = <Cli as clap::CommandFactory>::command();
        generate(*shell, &mut cmd, "menubot", &mut std::io::stdout());
        return Ok(());
    }

    let config = load_config(&cli.config).await?;

    // Only the server logs at the configured level; one-shot commands stay quiet.
    let (level, otel) = match cli.command {
        Commands::Serve { .. } => (cli.log_level(&config.logging.level), config.logging.otel),
        _ => (cli.log_level("warn"), false),
    };
    init_tracing(level, otel).map_err(|e| anyhow::anyhow!("failed to initialize tracing: {e}"))?;

    let result = match cli.command {
        Commands::Serve { host, port } => cli::serve::serve(config, host, port).await,
        Commands::Flows => {
            let flows = resolve_flows(&config).await?;
            cli::flows::list_flows(&flows, cli.json)
        }
        Commands::Check => {
            let flows = resolve_flows(&config).await?;
            cli::check::check_flows(&flows, cli.json)
        }
        Commands::Completions { .. } => unreachable!("handled above"),
    };

    shutdown_tracing();
    result
}
