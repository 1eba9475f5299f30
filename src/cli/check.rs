//! `decklist check`: report unrecognised lines.

use std::path::PathBuf;

use anyhow::{Result, anyhow};
use clap::Args;
use decklist::Decklist;

use crate::cli::utils::read_input;

/// Arguments for `decklist check`.
#[derive(Args, Debug)]
pub struct CheckArgs {
    /// Deck list file (default: stdin).
    pub file: Option<PathBuf>,
}

/// Print one diagnostic per uncertain line; fail if there were any.
pub fn handle(args: CheckArgs) -> Result<()> {
    let input = read_input(args.file.as_ref())?;
    let diagnostics = Decklist::diagnose(&input);
    for diagnostic in &diagnostics {
        println!("{}", diagnostic);
    }
    if diagnostics.is_empty() {
        println!("all lines recognised");
        return Ok(());
    }
    Err(anyhow!("{} uncertain line(s)", diagnostics.len()))
}
