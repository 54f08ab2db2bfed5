//! Core session types: players, state, intents, configuration.
//!
//! This module holds the data the state machine works on. The rules that
//! move a `GameState` from one phase to the next live in `rules`.

pub mod player;
pub mod config;
pub mod action;
pub mod state;

pub use player::{PlayerId, Players, PLAYER_COUNT};
pub use config::{SessionConfig, ThemeFallback, HISTORY_KEY, HISTORY_LIMIT, SESSION_KEY};
pub use action::Intent;
pub use state::{DeckRequestId, GameState, Progress, Responder, SessionPhase, Status, VisualTheme};
