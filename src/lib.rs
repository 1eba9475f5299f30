//! Parser-combinator grammar for plaintext deck lists.
//!
//! Every line of a deck list is classified as a comment, a card entry, a
//! blank line, or an uncertain line that no rule recognised.

pub mod combinator;

mod cards;
mod decklist;
mod grammar;
mod line;

pub use cards::{
    CardCache, CardData, CardResolver, CardSource, JsonCardSource, Lookup, LookupError,
};
pub use decklist::{DeckStats, Decklist, LineDiagnostic, RenderStyle, scryfall_link};
pub use grammar::{parse_line, try_parse_line};
pub use line::{CardEntry, LineError, ParsedLine};
