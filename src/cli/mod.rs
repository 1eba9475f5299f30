//! The `decklist` binary: `parse`, `check`, `stats` and `resolve`, each
//! reading a deck list from a file or stdin.

use anyhow::Result;
use clap::{Parser, Subcommand};

pub mod check;
pub mod common;
pub mod parse;
pub mod resolve;
pub mod stats;
pub mod utils;

/// Parsed CLI entrypoint for the `decklist` binary.
#[derive(Parser, Debug)]
#[command(name = "decklist", version, about = "Plaintext deck-list toolkit")]
pub struct Cli {
    /// Log debug output (overridden by RUST_LOG).
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    /// Classify every line of a deck list.
    Parse(parse::ParseArgs),
    /// Report lines that no grammar rule recognises.
    Check(check::CheckArgs),
    /// Summarise a deck list.
    Stats(stats::StatsArgs),
    /// Look up every card entry in a local card database.
    Resolve(resolve::ResolveArgs),
}

/// Install the `env_logger` backend. `RUST_LOG` wins over `--verbose`.
pub fn init_logging(verbose: bool) {
    let default = if verbose { "debug" } else { "warn" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(default)).init();
}

/// Execute the requested command.
pub fn run(cli: Cli) -> Result<()> {
    match cli.command {
        Command::Parse(args) => parse::handle(args),
        Command::Check(args) => check::handle(args),
        Command::Stats(args) => stats::handle(args),
        Command::Resolve(args) => resolve::handle(args),
    }
}
