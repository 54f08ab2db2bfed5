//! # ember-cards
//!
//! Session engine for a two-player conversation-card game. Players take
//! turns drawing prompt cards from a themed deck, mark the prompts that
//! mattered as impactful, and finished sessions are kept in a bounded
//! history log.
//!
//! ## Design Principles
//!
//! 1. **Pure Transitions**: `rules::transition` maps a state and an event to
//!    the next state plus effects. It never touches storage or the network.
//!
//! 2. **Unrepresentable Bad States**: `SessionPhase` is a tagged union, so a
//!    playing session always has a current card and a setup session has no
//!    cards at all.
//!
//! 3. **Persistence as an Observer**: `SessionMachine` mirrors every change
//!    into a `KeyValueStore`. Storage failures are logged and never block
//!    play.
//!
//! ## Architecture
//!
//! - **Persistent Data Structures**: decks and history use `im-rs`, so
//!   building the next state from the previous one is cheap.
//!
//! - **Sequenced Deck Requests**: each start carries a `DeckRequestId`;
//!   answers for a superseded request are dropped.
//!
//! ## Modules
//!
//! - `core`: Players, session state, intents, configuration
//! - `cards`: Prompt cards and the built-in themed decks
//! - `deck`: Async deck provider seam
//! - `rules`: Pure session transitions
//! - `history`: Archived session records
//! - `storage`: Key-value stores and session persistence
//! - `session`: The driver tying it together

pub mod core;
pub mod cards;
pub mod deck;
pub mod rules;
pub mod history;
pub mod storage;
pub mod session;
pub mod error;

#[cfg(feature = "cli")]
pub mod cli;

// Re-export commonly used types
pub use crate::core::{
    PlayerId, Players,
    SessionConfig, ThemeFallback,
    Intent,
    DeckRequestId, GameState, Progress, Responder, SessionPhase, Status, VisualTheme,
};

pub use crate::cards::{Card, CardId, ResponseMode, ThemeRegistry, DEFAULT_THEME, THEMES};

pub use crate::deck::{DeckProvider, StaticDeckProvider};

pub use crate::rules::{transition, Effect, Event, Transition};

pub use crate::history::{HistoryArchive, PastSession, SessionStamp};

pub use crate::storage::{FileStore, KeyValueStore, MemoryStore, Persistence};

pub use crate::session::{Clock, FixedClock, Outcome, SessionMachine, SystemClock};

pub use crate::error::{DeckError, SessionError, StorageError};
