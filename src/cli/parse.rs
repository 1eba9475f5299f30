//! `decklist parse`: classify and print every line.

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Args;
use decklist::{Decklist, RenderStyle};

use crate::cli::common::{OutputFormat, RenderStyleArg};
use crate::cli::utils::{read_input, write_output};

/// Arguments for `decklist parse`.
#[derive(Args, Debug)]
pub struct ParseArgs {
    /// Deck list file (default: stdin).
    pub file: Option<PathBuf>,
    /// Output file (`-` for stdout).
    #[arg(short = 'o', long = "output", default_value = "-")]
    pub output: PathBuf,
    /// Output format.
    #[arg(long, default_value_t = OutputFormat::Text, value_enum)]
    pub format: OutputFormat,
    /// Text rendering style.
    #[arg(long, default_value_t = RenderStyleArg::Plain, value_enum)]
    pub style: RenderStyleArg,
}

pub fn handle(args: ParseArgs) -> Result<()> {
    let input = read_input(args.file.as_ref())?;
    let deck = Decklist::parse(&input);
    let rendered = match args.format {
        OutputFormat::Text => {
            let style: RenderStyle = args.style.into();
            log::debug!("rendering {} lines in {} style", deck.lines().len(), style);
            deck.render(style)
        }
        OutputFormat::Json => {
            let mut json =
                serde_json::to_string_pretty(&deck).context("failed to serialize deck list")?;
            json.push('\n');
            json
        }
    };
    write_output(&args.output, &rendered)
}
