use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Classification of a single deck-list line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ParsedLine {
    /// A `#` or `//` comment, kept verbatim.
    Comment { text: String },
    Card(CardEntry),
    /// A line no grammar rule accepted, kept verbatim.
    Uncertain { text: String },
    Blank,
}

impl ParsedLine {
    pub fn as_card(&self) -> Option<&CardEntry> {
        match self {
            ParsedLine::Card(entry) => Some(entry),
            _ => None,
        }
    }

    pub fn is_blank(&self) -> bool {
        matches!(self, ParsedLine::Blank)
    }

    pub fn is_uncertain(&self) -> bool {
        matches!(self, ParsedLine::Uncertain { .. })
    }
}

/// A card with its quantity and, when the line named one, a specific printing.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardEntry {
    pub card_name: String,
    pub count: u32,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub set_code: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub collector_number: Option<u32>,
    #[serde(default, skip_serializing_if = "std::ops::Not::not")]
    pub foil: bool,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub tags: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub ear_color: Option<String>,
}

impl CardEntry {
    pub fn new<S: Into<String>>(card_name: S, count: u32) -> Self {
        Self {
            card_name: card_name.into(),
            count,
            set_code: None,
            collector_number: None,
            foil: false,
            tags: Vec::new(),
            ear_color: None,
        }
    }

    /// Attach a set code and optional collector number.
    pub fn with_printing<S: Into<String>>(mut self, set_code: S, number: Option<u32>) -> Self {
        self.set_code = Some(set_code.into());
        self.collector_number = number;
        self
    }
}

/// Why a non-blank line could not be classified.
///
/// `offset` is the byte offset of the furthest point any grammar rule reached.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("expected {expected} at offset {offset} in {text:?}")]
pub struct LineError {
    pub expected: String,
    pub offset: usize,
    pub text: String,
}
