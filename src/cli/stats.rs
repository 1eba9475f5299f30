//! `decklist stats`: summary counts.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use decklist::Decklist;

use crate::cli::common::OutputFormat;
use crate::cli::utils::read_input;

/// Arguments for `decklist stats`.
#[derive(Args, Debug)]
pub struct StatsArgs {
    /// Deck list file (default: stdin).
    pub file: Option<PathBuf>,
    /// Output format.
    #[arg(long, default_value_t = OutputFormat::Text, value_enum)]
    pub format: OutputFormat,
}

pub fn handle(args: StatsArgs) -> Result<()> {
    let input = read_input(args.file.as_ref())?;
    let stats = Decklist::parse(&input).stats();
    if args.format == OutputFormat::Json {
        let json = serde_json::to_string_pretty(&stats).context("failed to serialize stats")?;
        println!("{}", json);
        return Ok(());
    }
    println!("Cards: {}", stats.total_count);
    println!("Distinct names: {}", stats.distinct_names);
    println!("Entry lines: {}", stats.cards);
    println!("Comments: {}", stats.comments);
    println!("Blank lines: {}", stats.blank);
    println!("Uncertain lines: {}", stats.uncertain);
    Ok(())
}
