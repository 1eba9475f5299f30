//! `decklist resolve`: look up entries in a local card database.

use std::path::PathBuf;

use anyhow::Result;
use clap::Args;
use decklist::{CardCache, CardResolver, Decklist, JsonCardSource, Lookup};

use crate::cli::utils::read_input;

/// Arguments for `decklist resolve`.
#[derive(Args, Debug)]
pub struct ResolveArgs {
    /// Deck list file (default: stdin).
    pub file: Option<PathBuf>,
    /// JSON array of Scryfall-style card objects.
    #[arg(short = 'c', long = "cards")]
    pub cards: PathBuf,
    /// Fetch attempts per card before giving up on transient errors.
    #[arg(long, default_value_t = CardResolver::<JsonCardSource>::DEFAULT_ATTEMPTS)]
    pub attempts: u32,
}

pub fn handle(args: ResolveArgs) -> Result<()> {
    let input = read_input(args.file.as_ref())?;
    let deck = Decklist::parse(&input);
    let resolver =
        CardResolver::new(JsonCardSource::load(&args.cards)?).with_max_attempts(args.attempts);
    log::debug!(
        "loaded {} cards from {}",
        resolver.source().len(),
        args.cards.display()
    );
    let mut cache = CardCache::new();

    let mut missing = 0usize;
    for entry in deck.entries() {
        match resolver.resolve_entry(&mut cache, entry)? {
            Lookup::Found(card) => {
                let type_line = card.type_line.as_deref().unwrap_or("-");
                let mana_cost = card.mana_cost.as_deref().unwrap_or("");
                println!(
                    "{:>3} {:<32} {:<8} {}",
                    entry.count, card.name, mana_cost, type_line
                );
            }
            Lookup::NotFound => {
                missing += 1;
                println!("{:>3} {:<32} (not found)", entry.count, entry.card_name);
            }
        }
    }
    println!(
        "Resolved {} distinct lookups, {} entries not found",
        cache.len(),
        missing
    );
    Ok(())
}
