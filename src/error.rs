//! Error types.
//!
//! Only failures a caller can act on are errors. Illegal transitions are
//! no-ops, deck failures send the session back to setup, and corrupt
//! records fall back to defaults; those paths log instead of returning
//! errors to the presentation layer.

use thiserror::Error;

use crate::core::PlayerId;

/// Deck provider failures.
#[derive(Debug, Error)]
pub enum DeckError {
    /// The theme is not known and the provider does not fall back.
    #[error("unknown theme: {0}")]
    UnknownTheme(String),

    /// The provider returned no cards.
    #[error("theme {0:?} produced an empty deck")]
    EmptyDeck(String),

    /// Any other provider failure.
    #[error("deck provider unavailable: {0}")]
    Unavailable(String),
}

/// Key-value store failures.
#[derive(Debug, Error)]
pub enum StorageError {
    /// Reading or writing the backing medium failed.
    #[error("storage I/O error for key {key:?}: {source}")]
    Io {
        key: String,
        #[source]
        source: std::io::Error,
    },

    /// The key cannot be mapped onto the backing medium.
    #[error("invalid storage key: {0:?}")]
    InvalidKey(String),

    /// A stored record could not be decoded.
    #[error("corrupt record under key {key:?}: {source}")]
    Corrupt {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    /// A record could not be encoded.
    #[error("failed to encode record for key {key:?}: {source}")]
    Encode {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

/// Errors returned by session operations.
#[derive(Debug, Error)]
pub enum SessionError {
    /// A player name is blank after trimming.
    #[error("{0} needs a name")]
    EmptyPlayerName(PlayerId),
}
