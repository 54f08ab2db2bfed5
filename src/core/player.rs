//! Player identification and the two-seat name table.
//!
//! ## PlayerId
//!
//! Seat index of one of the two players. Turns alternate strictly between
//! seat 0 and seat 1.
//!
//! ## Players
//!
//! The two display names in fixed seat order, indexable by `PlayerId`.

use serde::{Deserialize, Serialize};
use std::ops::Index;

/// Number of seats in a session.
pub const PLAYER_COUNT: usize = 2;

/// Seat identifier: `PlayerId(0)` or `PlayerId(1)`.
///
/// Serialized as the bare index so persisted records read
/// `"activePlayerIndex": 1`.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub struct PlayerId(u8);

impl PlayerId {
    /// The seat that opens every session.
    pub const FIRST: PlayerId = PlayerId(0);

    /// The second seat.
    pub const SECOND: PlayerId = PlayerId(1);

    /// Create a player ID from a seat index.
    ///
    /// Returns `None` for anything other than 0 or 1.
    #[must_use]
    pub const fn new(index: u8) -> Option<Self> {
        if (index as usize) < PLAYER_COUNT {
            Some(Self(index))
        } else {
            None
        }
    }

    /// Get the raw seat index (0-based).
    #[must_use]
    pub const fn index(self) -> usize {
        self.0 as usize
    }

    /// The seat that plays after this one.
    ///
    /// ```
    /// use ember_cards::core::PlayerId;
    ///
    /// assert_eq!(PlayerId::FIRST.next(), PlayerId::SECOND);
    /// assert_eq!(PlayerId::SECOND.next(), PlayerId::FIRST);
    /// ```
    #[must_use]
    pub const fn next(self) -> Self {
        Self((self.0 + 1) % PLAYER_COUNT as u8)
    }

    /// The seat that is not this one.
    #[must_use]
    pub const fn other(self) -> Self {
        self.next()
    }
}

impl TryFrom<u8> for PlayerId {
    type Error = String;

    fn try_from(index: u8) -> Result<Self, Self::Error> {
        Self::new(index).ok_or_else(|| format!("player index {} out of range", index))
    }
}

impl From<PlayerId> for u8 {
    fn from(id: PlayerId) -> Self {
        id.0
    }
}

impl std::fmt::Display for PlayerId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "Player {}", self.0 + 1)
    }
}

/// The two player names in seat order.
///
/// ```
/// use ember_cards::core::{PlayerId, Players};
///
/// let players = Players::new("Ava", "Ben");
/// assert_eq!(&players[PlayerId::FIRST], "Ava");
/// assert_eq!(&players[PlayerId::SECOND], "Ben");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Players([String; PLAYER_COUNT]);

impl Players {
    /// Create from two names, in seat order.
    #[must_use]
    pub fn new(first: impl Into<String>, second: impl Into<String>) -> Self {
        Self([first.into(), second.into()])
    }

    /// Both seats empty, as on the setup screen.
    #[must_use]
    pub fn empty() -> Self {
        Self::default()
    }

    /// Check that both names are non-blank.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.0.iter().all(|name| !name.trim().is_empty())
    }

    /// Get a player's name.
    #[must_use]
    pub fn get(&self, player: PlayerId) -> &str {
        &self.0[player.index()]
    }

    /// Iterate over (PlayerId, name) pairs.
    pub fn iter(&self) -> impl Iterator<Item = (PlayerId, &str)> {
        self.0
            .iter()
            .enumerate()
            .map(|(i, name)| (PlayerId(i as u8), name.as_str()))
    }

    /// Borrow the names as an array.
    #[must_use]
    pub fn as_array(&self) -> &[String; PLAYER_COUNT] {
        &self.0
    }
}

impl Index<PlayerId> for Players {
    type Output = str;

    fn index(&self, player: PlayerId) -> &Self::Output {
        self.get(player)
    }
}

impl std::fmt::Display for Players {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{} & {}", self.0[0], self.0[1])
    }
}
