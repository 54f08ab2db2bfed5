//! Intents: what the presentation layer asks the session to do.
//!
//! Intents are plain data so a front end can queue, log or replay them.
//! `SessionMachine::dispatch` maps each intent onto the matching
//! operation; session-mutating intents that are illegal in the current
//! phase are no-ops.

use serde::{Deserialize, Serialize};

use super::state::VisualTheme;
use crate::cards::CardId;

/// A user intent.
///
/// ## Example
///
/// ```
/// use ember_cards::core::{Intent, VisualTheme};
///
/// let start = Intent::start("Ava", "Ben", "Deep Connections", VisualTheme::Ocean);
/// assert!(start.mutates_session());
/// assert!(!Intent::ClearHistory.mutates_session());
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "intent", rename_all = "camelCase")]
pub enum Intent {
    /// Begin a session with two players and a theme.
    #[serde(rename_all = "camelCase")]
    Start {
        player1: String,
        player2: String,
        theme: String,
        visual_theme: VisualTheme,
    },
    /// Move the current card to the drawn list and draw the next one.
    AdvanceTurn,
    /// Mark or unmark a card as impactful.
    #[serde(rename_all = "camelCase")]
    ToggleImpactful { card_id: CardId },
    /// End the session and archive it.
    Finish,
    /// Discard the session and return to setup.
    Reset,
    /// Look up an archived session.
    ReviewSession { id: String },
    /// Drop every archived session.
    ClearHistory,
}

impl Intent {
    /// Create a start intent.
    #[must_use]
    pub fn start(
        player1: impl Into<String>,
        player2: impl Into<String>,
        theme: impl Into<String>,
        visual_theme: VisualTheme,
    ) -> Self {
        Intent::Start {
            player1: player1.into(),
            player2: player2.into(),
            theme: theme.into(),
            visual_theme,
        }
    }

    /// Create a toggle intent.
    #[must_use]
    pub fn toggle(card_id: impl Into<CardId>) -> Self {
        Intent::ToggleImpactful {
            card_id: card_id.into(),
        }
    }

    /// Check if this intent can change the live session.
    #[must_use]
    pub fn mutates_session(&self) -> bool {
        !matches!(self, Intent::ReviewSession { .. } | Intent::ClearHistory)
    }
}
