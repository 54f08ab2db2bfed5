//! Deck acquisition.
//!
//! A session asks a `DeckProvider` for the cards of its theme when it
//! starts. This is the only asynchronous step in a session's life.

mod provider;

pub use provider::{DeckProvider, StaticDeckProvider};
