//! Deck-list input and rendered output for the command handlers.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

fn is_stdio(path: &Path) -> bool {
    path.as_os_str() == "-"
}

/// Deck-list text from `path`, or from stdin when no path (or `-`) is given.
pub fn read_input(path: Option<&PathBuf>) -> Result<String> {
    match path {
        Some(path) if !is_stdio(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read deck list {}", path.display())),
        _ => io::read_to_string(io::stdin().lock()).context("failed to read deck list from stdin"),
    }
}

/// Send rendered output to `path`, with `-` meaning stdout.
pub fn write_output(path: &Path, content: &str) -> Result<()> {
    if !is_stdio(path) {
        return fs::write(path, content)
            .with_context(|| format!("failed to write {}", path.display()));
    }
    let mut stdout = io::stdout().lock();
    stdout
        .write_all(content.as_bytes())
        .and_then(|()| stdout.flush())
        .context("failed to write to stdout")
}
