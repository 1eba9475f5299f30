//! Shared clap helper types for CLI commands.

use clap::ValueEnum;
use decklist::RenderStyle;

/// Render styles accepted by `--style`.
#[derive(ValueEnum, Debug, Clone, Copy)]
pub enum RenderStyleArg {
    Plain,
    Links,
}

impl From<RenderStyleArg> for RenderStyle {
    fn from(value: RenderStyleArg) -> Self {
        match value {
            RenderStyleArg::Plain => RenderStyle::Plain,
            RenderStyleArg::Links => RenderStyle::Links,
        }
    }
}

/// Output encodings accepted by `--format`.
#[derive(ValueEnum, Debug, Clone, Copy, PartialEq, Eq)]
pub enum OutputFormat {
    Text,
    Json,
}
