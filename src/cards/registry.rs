//! Theme registry for deck lookup.
//!
//! The `ThemeRegistry` stores the ordered card list of every content theme.
//! Deck order is fixed per theme; the registry hands out copies so a session
//! can consume its deck without touching the registered content.

use rustc_hash::FxHashMap;

use super::definition::{Card, CardId};
use super::themes;

/// Registry of themed decks.
///
/// ## Example
///
/// ```
/// use ember_cards::cards::{Card, ResponseMode, ThemeRegistry};
///
/// let mut registry = ThemeRegistry::new();
/// registry.register("Tiny", vec![
///     Card::new("tiny-1", "Favourite snack?", ResponseMode::BothRespond, "Joy"),
/// ]);
///
/// let deck = registry.deck("Tiny").unwrap();
/// assert_eq!(deck[0].id.as_str(), "tiny-1");
/// ```
#[derive(Clone, Debug, Default)]
pub struct ThemeRegistry {
    decks: FxHashMap<String, Vec<Card>>,
    /// Theme names in registration order.
    order: Vec<String>,
}

impl ThemeRegistry {
    /// Create a new empty registry.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create a registry holding the four built-in themes.
    #[must_use]
    pub fn builtin() -> Self {
        let mut registry = Self::new();
        for (name, cards) in themes::builtin_decks() {
            registry.register(name, cards);
        }
        registry
    }

    /// Register a theme deck.
    ///
    /// Panics if the theme is already registered or a card ID is reused
    /// within the deck.
    pub fn register(&mut self, theme: impl Into<String>, cards: Vec<Card>) {
        let theme = theme.into();
        if self.decks.contains_key(&theme) {
            panic!("Theme {:?} already registered", theme);
        }

        let mut seen: Vec<&CardId> = Vec::with_capacity(cards.len());
        for card in &cards {
            if seen.contains(&&card.id) {
                panic!("Card {} appears twice in theme {:?}", card.id, theme);
            }
            seen.push(&card.id);
        }

        self.order.push(theme.clone());
        self.decks.insert(theme, cards);
    }

    /// Get a copy of a theme's deck, in draw order.
    #[must_use]
    pub fn deck(&self, theme: &str) -> Option<Vec<Card>> {
        self.decks.get(theme).cloned()
    }

    /// Check if a theme is registered.
    #[must_use]
    pub fn contains(&self, theme: &str) -> bool {
        self.decks.contains_key(theme)
    }

    /// Get the number of registered themes.
    #[must_use]
    pub fn len(&self) -> usize {
        self.decks.len()
    }

    /// Check if the registry is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.decks.is_empty()
    }

    /// Iterate over theme names in registration order.
    pub fn themes(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Find a card by ID across all themes.
    #[must_use]
    pub fn find_card(&self, id: &CardId) -> Option<&Card> {
        self.decks.values().flatten().find(|c| &c.id == id)
    }
}
