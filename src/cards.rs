//! Card metadata lookup with an explicit, never-evicting cache.
//!
//! Confirmed misses are cached just like hits. Transient failures are never
//! cached, so a later call can recover once the source does.

use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::line::CardEntry;

/// Card metadata, in the shape of a Scryfall card object.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CardData {
    pub name: String,
    #[serde(default)]
    pub set: Option<String>,
    #[serde(default)]
    pub collector_number: Option<String>,
    #[serde(default)]
    pub type_line: Option<String>,
    #[serde(default)]
    pub mana_cost: Option<String>,
    #[serde(default)]
    pub scryfall_uri: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum LookupError {
    /// The source confirmed that no such card exists.
    #[error("card not found: {name}")]
    NotFound { name: String },
    #[error("card lookup failed: {0}")]
    Transient(String),
}

/// Where card metadata comes from.
pub trait CardSource {
    fn fetch(&self, name: &str, set_code: Option<&str>) -> Result<CardData, LookupError>;
}

impl<S: CardSource + ?Sized> CardSource for &S {
    fn fetch(&self, name: &str, set_code: Option<&str>) -> Result<CardData, LookupError> {
        (**self).fetch(name, set_code)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Lookup {
    Found(CardData),
    NotFound,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
struct CacheKey {
    name: String,
    set_code: Option<String>,
}

impl CacheKey {
    fn new(name: &str, set_code: Option<&str>) -> Self {
        Self {
            name: name.to_lowercase(),
            set_code: set_code.map(str::to_ascii_uppercase),
        }
    }
}

/// Results of earlier lookups. Grows without bound.
#[derive(Debug, Clone, Default)]
pub struct CardCache {
    entries: HashMap<CacheKey, Lookup>,
}

impl CardCache {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str, set_code: Option<&str>) -> Option<&Lookup> {
        self.entries.get(&CacheKey::new(name, set_code))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// Resolves card names through a [`CardSource`], retrying transient failures.
#[derive(Debug, Clone)]
pub struct CardResolver<S> {
    source: S,
    max_attempts: u32,
}

impl<S: CardSource> CardResolver<S> {
    pub const DEFAULT_ATTEMPTS: u32 = 3;

    pub fn new(source: S) -> Self {
        Self {
            source,
            max_attempts: Self::DEFAULT_ATTEMPTS,
        }
    }

    /// Total fetch attempts per uncached lookup; at least one.
    pub fn with_max_attempts(mut self, attempts: u32) -> Self {
        self.max_attempts = attempts.max(1);
        self
    }

    pub fn source(&self) -> &S {
        &self.source
    }

    pub fn resolve(
        &self,
        cache: &mut CardCache,
        name: &str,
        set_code: Option<&str>,
    ) -> Result<Lookup, LookupError> {
        let key = CacheKey::new(name, set_code);
        if let Some(hit) = cache.entries.get(&key) {
            log::debug!("cache hit for {name:?} ({set_code:?})");
            return Ok(hit.clone());
        }

        let mut last_error = None;
        for attempt in 1..=self.max_attempts {
            match self.source.fetch(name, set_code) {
                Ok(card) => {
                    let lookup = Lookup::Found(card);
                    cache.entries.insert(key, lookup.clone());
                    return Ok(lookup);
                }
                Err(LookupError::NotFound { .. }) => {
                    log::debug!("{name:?} not found; caching miss");
                    cache.entries.insert(key, Lookup::NotFound);
                    return Ok(Lookup::NotFound);
                }
                Err(err) => {
                    log::warn!(
                        "lookup of {name:?} failed (attempt {attempt}/{}): {err}",
                        self.max_attempts
                    );
                    last_error = Some(err);
                }
            }
        }
        Err(last_error.unwrap_or_else(|| LookupError::Transient("no attempts made".to_string())))
    }

    /// Resolve a parsed entry by its name and set code.
    pub fn resolve_entry(
        &self,
        cache: &mut CardCache,
        entry: &CardEntry,
    ) -> Result<Lookup, LookupError> {
        self.resolve(cache, &entry.card_name, entry.set_code.as_deref())
    }
}

/// Card source backed by a local JSON array of card objects.
#[derive(Debug, Clone, Default)]
pub struct JsonCardSource {
    cards: Vec<CardData>,
    by_name: HashMap<String, Vec<usize>>,
}

impl JsonCardSource {
    pub fn load(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("failed to read card database {}", path.display()))?;
        Self::from_json(&raw)
            .with_context(|| format!("failed to parse card database {}", path.display()))
    }

    pub fn from_json(raw: &str) -> serde_json::Result<Self> {
        let cards: Vec<CardData> = serde_json::from_str(raw)?;
        Ok(Self::from_cards(cards))
    }

    pub fn from_cards(cards: Vec<CardData>) -> Self {
        let mut by_name: HashMap<String, Vec<usize>> = HashMap::new();
        for (idx, card) in cards.iter().enumerate() {
            by_name.entry(card.name.to_lowercase()).or_default().push(idx);
        }
        Self { cards, by_name }
    }

    pub fn len(&self) -> usize {
        self.cards.len()
    }

    pub fn is_empty(&self) -> bool {
        self.cards.is_empty()
    }
}

impl CardSource for JsonCardSource {
    /// Prefers the printing from `set_code`, falling back to the first printing by name.
    fn fetch(&self, name: &str, set_code: Option<&str>) -> Result<CardData, LookupError> {
        let printings = self
            .by_name
            .get(&name.to_lowercase())
            .ok_or_else(|| LookupError::NotFound {
                name: name.to_string(),
            })?;
        let in_set = set_code.and_then(|code| {
            printings.iter().find(|&&idx| {
                self.cards[idx]
                    .set
                    .as_deref()
                    .is_some_and(|set| set.eq_ignore_ascii_case(code))
            })
        });
        let idx = in_set.or_else(|| printings.first()).ok_or_else(|| {
            LookupError::NotFound {
                name: name.to_string(),
            }
        })?;
        Ok(self.cards[*idx].clone())
    }
}
