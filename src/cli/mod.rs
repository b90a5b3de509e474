//! CLI module for academe.
//!
//! Subcommands:
//! - `ping`: Connect to all three stores and report readiness
//! - `warm`: Build both materialized views ahead of first use

mod ping;
mod warm;

use clap::{Parser, Subcommand};

/// academe - Academic World persistence facade
#[derive(Parser)]
#[command(name = "academe")]
#[command(about = "Polyglot persistence facade over the Academic World stores")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Connect to every store, fail-fast, and report readiness
    Ping,

    /// Build both materialized views so first requests skip the build cost
    Warm,
}

impl App {
    /// Run the CLI application.
    pub async fn run(self) -> color_eyre::Result<()> {
        match self.command {
            Command::Ping => self.run_ping().await,
            Command::Warm => self.run_warm().await,
        }
    }
}
