//! CLI command definitions for the `menubot` binary.
//!
//! Uses clap derive macros for argument parsing.

pub mod check;
pub mod flows;
pub mod serve;

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use clap_complete::Shell;

use menubot_infra::config::DEFAULT_CONFIG_FILE;

/// WhatsApp menu chatbot service.
#[derive(Parser)]
#[command(name = "menubot", version, about, long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    /// Path to the configuration file.
    #[arg(long, short, global = true, env = "MENUBOT_CONFIG", default_value = DEFAULT_CONFIG_FILE)]
    pub config: PathBuf,

    /// Output machine-readable JSON instead of styled text.
    #[arg(long, global = true)]
    pub json: bool,

    /// Detailed output (-v for debug, -vv for trace).
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// Start the webhook server.
    Serve {
        /// Host to bind to (overrides config).
        #[arg(long)]
        host: Option<String>,

        /// Port to listen on (overrides config).
        #[arg(short, long)]
        port: Option<u16>,
    },

    /// List the flow table.
    #[command(alias = "ls")]
    Flows,

    /// Validate the flow table.
    Check,

    /// Generate shell completions.
    Completions {
        /// Shell to generate completions for.
        shell: Shell,
    },
}

impl Cli {
    /// Filter directive for the tracing subscriber.
    ///
    /// `-v` flags win over the configured level.
    pub fn log_level<'a>(&self, configured: &'a str) -> &'a str {
        match self.verbose {
            0 => configured,
            1 => "debug",
            _ => "trace",
        }
    }
}
