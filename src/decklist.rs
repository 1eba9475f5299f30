use std::collections::BTreeSet;
use std::fmt::{self, Write};

use serde::{Deserialize, Serialize};

use crate::grammar::{parse_line, try_parse_line};
use crate::line::{CardEntry, LineError, ParsedLine};

const SCRYFALL_SEARCH: &str = "https://scryfall.com/search?q=!%22";

/// A whole deck-list file, one classified entry per input line.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Decklist {
    lines: Vec<ParsedLine>,
}

impl Decklist {
    /// Parse every line of `text`. Both `\n` and `\r\n` endings are accepted.
    pub fn parse(text: &str) -> Self {
        Self {
            lines: text.lines().map(parse_line).collect(),
        }
    }

    pub fn lines(&self) -> &[ParsedLine] {
        &self.lines
    }

    pub fn entries(&self) -> impl Iterator<Item = &CardEntry> {
        self.lines.iter().filter_map(ParsedLine::as_card)
    }

    /// Diagnostics for every line that would be classified as uncertain.
    pub fn diagnose(text: &str) -> Vec<LineDiagnostic> {
        text.lines()
            .enumerate()
            .filter_map(|(idx, line)| {
                try_parse_line(line).err().map(|error| LineDiagnostic {
                    line: idx + 1,
                    error,
                })
            })
            .collect()
    }

    pub fn stats(&self) -> DeckStats {
        let mut stats = DeckStats::default();
        let mut names = BTreeSet::new();
        for line in &self.lines {
            match line {
                ParsedLine::Comment { .. } => stats.comments += 1,
                ParsedLine::Card(entry) => {
                    stats.cards += 1;
                    stats.total_count += u64::from(entry.count);
                    names.insert(entry.card_name.to_lowercase());
                }
                ParsedLine::Uncertain { .. } => stats.uncertain += 1,
                ParsedLine::Blank => stats.blank += 1,
            }
        }
        stats.distinct_names = names.len();
        stats
    }

    /// Render one output line per input line.
    pub fn render(&self, style: RenderStyle) -> String {
        let mut out = String::new();
        for line in &self.lines {
            match line {
                ParsedLine::Comment { text } => out.push_str(text),
                ParsedLine::Card(entry) => render_entry(&mut out, entry, style),
                ParsedLine::Uncertain { text } => {
                    out.push_str("? ");
                    out.push_str(text);
                }
                ParsedLine::Blank => {}
            }
            out.push('\n');
        }
        out
    }
}

fn render_entry(out: &mut String, entry: &CardEntry, style: RenderStyle) {
    if entry.count > 1 {
        write!(out, "{}x ", entry.count).ok();
    }
    out.push_str(&entry.card_name);
    match (&entry.set_code, entry.collector_number) {
        (Some(set), Some(number)) => write!(out, " ({} #{})", set, number).ok(),
        (Some(set), None) => write!(out, " ({})", set).ok(),
        _ => None,
    };
    if entry.foil {
        out.push_str(" *F*");
    }
    if let RenderStyle::Links = style {
        write!(out, " <{}>", scryfall_link(&entry.card_name)).ok();
    }
}

/// Exact-name Scryfall search URL for a card.
pub fn scryfall_link(card_name: &str) -> String {
    let mut url = String::from(SCRYFALL_SEARCH);
    for byte in card_name.bytes() {
        if byte.is_ascii_alphanumeric() || b"-_.~".contains(&byte) {
            url.push(char::from(byte));
        } else {
            write!(&mut url, "%{:02X}", byte).ok();
        }
    }
    url.push_str("%22");
    url
}

/// An uncertain line together with its 1-based line number.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LineDiagnostic {
    pub line: usize,
    pub error: LineError,
}

impl fmt::Display for LineDiagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "line {}: {}", self.line, self.error)
    }
}

/// Per-kind line counts for a deck list.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct DeckStats {
    pub comments: usize,
    pub cards: usize,
    pub uncertain: usize,
    pub blank: usize,
    /// Sum of all card counts.
    pub total_count: u64,
    /// Card names seen, compared case-insensitively.
    pub distinct_names: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderStyle {
    /// Card names only.
    Plain,
    /// Card names followed by a Scryfall search link.
    Links,
}

impl fmt::Display for RenderStyle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RenderStyle::Plain => write!(f, "plain"),
            RenderStyle::Links => write!(f, "links"),
        }
    }
}
