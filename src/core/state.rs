//! Session state.
//!
//! ## GameState
//!
//! The live session: players, whose turn it is, impactful markings, theme
//! choices and the current `SessionPhase`.
//!
//! ## SessionPhase
//!
//! Status as a tagged union. Only the `Playing` and `Finished` variants carry
//! cards, and `Playing` always has a current card, so "playing without a
//! card" cannot be represented.
//!
//! Collections are `im` persistent structures: transitions build a new
//! `GameState` from the old one, and cloning a state is O(1).

use im::{OrdSet, Vector};
use serde::{Deserialize, Serialize};
use std::str::FromStr;

use super::player::{PlayerId, Players};
use crate::cards::{Card, CardId, DEFAULT_THEME};

/// Presentation-only colour scheme, carried through state as a preference.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum VisualTheme {
    #[default]
    Ember,
    Ocean,
    Twilight,
    Forest,
}

impl VisualTheme {
    /// All visual themes, in display order.
    pub const ALL: [VisualTheme; 4] = [
        VisualTheme::Ember,
        VisualTheme::Ocean,
        VisualTheme::Twilight,
        VisualTheme::Forest,
    ];

    /// Display name.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            VisualTheme::Ember => "Ember",
            VisualTheme::Ocean => "Ocean",
            VisualTheme::Twilight => "Twilight",
            VisualTheme::Forest => "Forest",
        }
    }
}

impl std::fmt::Display for VisualTheme {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for VisualTheme {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Self::ALL
            .into_iter()
            .find(|theme| theme.name().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| format!("unknown visual theme {:?}", s))
    }
}

/// Identifier of one deck request. A response only applies while the
/// session is still loading for the same request.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeckRequestId(pub u64);

impl DeckRequestId {
    /// The request after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        Self(self.0 + 1)
    }
}

impl std::fmt::Display for DeckRequestId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "request#{}", self.0)
    }
}

/// Flat status tag, for callers that only need to branch on the phase.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Status {
    Setup,
    Loading,
    Playing,
    Finished,
}

impl std::fmt::Display for Status {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let name = match self {
            Status::Setup => "setup",
            Status::Loading => "loading",
            Status::Playing => "playing",
            Status::Finished => "finished",
        };
        f.write_str(name)
    }
}

/// Session phase with the data each phase owns.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "status", rename_all = "lowercase")]
pub enum SessionPhase {
    /// Choosing players and themes. No cards.
    Setup,

    /// Waiting on the deck provider.
    Loading {
        request: DeckRequestId,
    },

    /// Cards are being drawn.
    Playing {
        /// Undrawn cards; the head is drawn next.
        deck: Vector<Card>,
        /// Previously shown cards in display order, excluding the current one.
        #[serde(rename = "drawnCards")]
        drawn_cards: Vector<Card>,
        /// The card on the table.
        #[serde(rename = "currentCard")]
        current_card: Card,
    },

    /// Session over; every shown card is in `drawn_cards`.
    Finished {
        #[serde(rename = "drawnCards")]
        drawn_cards: Vector<Card>,
    },
}

impl SessionPhase {
    /// Get the status tag.
    #[must_use]
    pub fn status(&self) -> Status {
        match self {
            SessionPhase::Setup => Status::Setup,
            SessionPhase::Loading { .. } => Status::Loading,
            SessionPhase::Playing { .. } => Status::Playing,
            SessionPhase::Finished { .. } => Status::Finished,
        }
    }
}

/// Who answers the current card.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Responder {
    /// Both players share their answer.
    Both,
    /// Only this player answers.
    Player(PlayerId),
}

/// Draw progress through the session deck.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Progress {
    /// Cards already moved to the drawn list.
    pub drawn: usize,
    /// Cards still in the deck.
    pub remaining: usize,
    /// All cards of the session, including the current one.
    pub total: usize,
}

impl Progress {
    /// Fraction of the deck completed, in `0.0..=1.0`.
    #[must_use]
    pub fn fraction(&self) -> f64 {
        if self.total == 0 {
            return 0.0;
        }
        self.drawn as f64 / self.total as f64
    }
}

/// The live session state.
///
/// Serializes to the persisted record layout: a camelCase object with a
/// `status` tag and phase-specific card fields.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GameState {
    /// Player names in seat order.
    pub players: Players,

    /// Whose turn it is.
    #[serde(rename = "activePlayerIndex")]
    pub active_player: PlayerId,

    /// Cards marked impactful this session.
    #[serde(rename = "impactfulCardIds")]
    pub impactful: OrdSet<CardId>,

    /// Content theme the deck was requested for.
    pub theme: String,

    /// Presentation preference, kept across resets.
    pub visual_theme: VisualTheme,

    /// Current phase and its cards.
    #[serde(flatten)]
    pub phase: SessionPhase,
}

impl Default for GameState {
    fn default() -> Self {
        Self::setup(DEFAULT_THEME, VisualTheme::default())
    }
}

impl GameState {
    /// A fresh setup state.
    #[must_use]
    pub fn setup(theme: impl Into<String>, visual_theme: VisualTheme) -> Self {
        Self {
            players: Players::empty(),
            active_player: PlayerId::FIRST,
            impactful: OrdSet::new(),
            theme: theme.into(),
            visual_theme,
            phase: SessionPhase::Setup,
        }
    }

    /// Get the status tag.
    #[must_use]
    pub fn status(&self) -> Status {
        self.phase.status()
    }

    /// Check if cards are being drawn.
    #[must_use]
    pub fn is_playing(&self) -> bool {
        matches!(self.phase, SessionPhase::Playing { .. })
    }

    /// Get the card on the table, if playing.
    #[must_use]
    pub fn current_card(&self) -> Option<&Card> {
        match &self.phase {
            SessionPhase::Playing { current_card, .. } => Some(current_card),
            _ => None,
        }
    }

    /// Get the undrawn cards, if playing.
    #[must_use]
    pub fn deck(&self) -> Option<&Vector<Card>> {
        match &self.phase {
            SessionPhase::Playing { deck, .. } => Some(deck),
            _ => None,
        }
    }

    /// Get the drawn list, if the phase has one.
    #[must_use]
    pub fn drawn_cards(&self) -> Option<&Vector<Card>> {
        match &self.phase {
            SessionPhase::Playing { drawn_cards, .. } | SessionPhase::Finished { drawn_cards } => {
                Some(drawn_cards)
            }
            _ => None,
        }
    }

    /// Get the pending deck request, if loading.
    #[must_use]
    pub fn pending_request(&self) -> Option<DeckRequestId> {
        match self.phase {
            SessionPhase::Loading { request } => Some(request),
            _ => None,
        }
    }

    /// Number of undrawn cards.
    #[must_use]
    pub fn deck_len(&self) -> usize {
        self.deck().map_or(0, Vector::len)
    }

    /// Check if the next intent should be `finish` rather than `advance_turn`.
    #[must_use]
    pub fn is_deck_empty(&self) -> bool {
        self.deck_len() == 0
    }

    /// Every card shown so far, in display order, including the current one.
    pub fn shown_cards(&self) -> impl Iterator<Item = &Card> {
        self.drawn_cards()
            .into_iter()
            .flatten()
            .chain(self.current_card())
    }

    /// Check if a card has been on the table this session.
    #[must_use]
    pub fn has_shown(&self, id: &CardId) -> bool {
        self.shown_cards().any(|card| &card.id == id)
    }

    /// Check if a card is marked impactful.
    #[must_use]
    pub fn is_impactful(&self, id: &CardId) -> bool {
        self.impactful.contains(id)
    }

    /// Shown cards marked impactful, in display order.
    #[must_use]
    pub fn impactful_cards(&self) -> Vec<&Card> {
        self.shown_cards()
            .filter(|card| self.impactful.contains(&card.id))
            .collect()
    }

    /// Deck progress. The current card counts toward the total but not
    /// toward `drawn`.
    #[must_use]
    pub fn progress(&self) -> Progress {
        let drawn = self.drawn_cards().map_or(0, Vector::len);
        let remaining = self.deck_len();
        let current = usize::from(self.current_card().is_some());
        Progress {
            drawn,
            remaining,
            total: drawn + remaining + current,
        }
    }

    /// Name of the player whose turn it is.
    #[must_use]
    pub fn active_player_name(&self) -> &str {
        self.players.get(self.active_player)
    }

    /// Name of the player waiting.
    #[must_use]
    pub fn other_player_name(&self) -> &str {
        self.players.get(self.active_player.other())
    }

    /// Who answers the current card, if one is on the table.
    #[must_use]
    pub fn responder(&self) -> Option<Responder> {
        self.current_card().map(|card| {
            if card.is_shared() {
                Responder::Both
            } else {
                Responder::Player(self.active_player.other())
            }
        })
    }
}
