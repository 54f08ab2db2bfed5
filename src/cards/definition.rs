//! Card definitions - static prompt content.
//!
//! A `Card` is produced by a deck provider and never mutated afterwards.
//! Sessions move cards between the deck, the current slot and the drawn
//! list, but the card itself stays the same value.

use serde::{Deserialize, Serialize};

/// Unique identifier for a prompt card (e.g. `"deep-3"`).
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CardId(pub String);

impl CardId {
    /// Create a new card ID.
    #[must_use]
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    /// Get the raw ID value.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for CardId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for CardId {
    fn from(s: &str) -> Self {
        Self::new(s)
    }
}

impl From<String> for CardId {
    fn from(s: String) -> Self {
        Self(s)
    }
}

/// Who answers a prompt once it is flipped.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ResponseMode {
    /// The player who did not draw the card answers.
    OtherResponds,
    /// Both players share their answer.
    BothRespond,
}

/// A prompt card.
///
/// ## Example
///
/// ```
/// use ember_cards::cards::{Card, ResponseMode};
///
/// let card = Card::new("deep-1", "What shaped you?", ResponseMode::BothRespond, "Identity");
///
/// assert_eq!(card.id.as_str(), "deep-1");
/// assert!(card.is_shared());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Card {
    /// Unique identifier.
    pub id: CardId,

    /// Prompt text shown when the card is flipped.
    pub prompt: String,

    /// Who responds to the prompt.
    pub response_mode: ResponseMode,

    /// Free-text category label (display only).
    pub category: String,
}

impl Card {
    /// Create a new card.
    #[must_use]
    pub fn new(
        id: impl Into<CardId>,
        prompt: impl Into<String>,
        response_mode: ResponseMode,
        category: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            prompt: prompt.into(),
            response_mode,
            category: category.into(),
        }
    }

    /// Check if both players answer this card.
    #[must_use]
    pub fn is_shared(&self) -> bool {
        self.response_mode == ResponseMode::BothRespond
    }
}
