//! Bounded log of finished sessions.

use im::Vector;

use super::record::PastSession;
use crate::core::HISTORY_LIMIT;

/// Newest-first history of finished sessions, capped at `limit` entries.
///
/// ## Example
///
/// ```
/// use ember_cards::core::Players;
/// use ember_cards::history::{HistoryArchive, PastSession};
///
/// let mut archive = HistoryArchive::with_limit(2);
/// for i in 0..3 {
///     archive.append(PastSession {
///         id: i.to_string(),
///         date: "1/1/2024".into(),
///         players: Players::new("Ava", "Ben"),
///         theme: "Hard Truths".into(),
///         impactful_prompts: vec![],
///         card_count: 7,
///     });
/// }
///
/// let ids: Vec<_> = archive.iter().map(|s| s.id.as_str()).collect();
/// assert_eq!(ids, vec!["2", "1"]);
/// ```
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HistoryArchive {
    sessions: Vector<PastSession>,
    limit: usize,
}

impl Default for HistoryArchive {
    fn default() -> Self {
        Self::with_limit(HISTORY_LIMIT)
    }
}

impl HistoryArchive {
    /// Create an empty archive with the standard cap.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an empty archive with a custom cap.
    #[must_use]
    pub fn with_limit(limit: usize) -> Self {
        Self {
            sessions: Vector::new(),
            limit,
        }
    }

    /// Rebuild an archive from a stored newest-first list.
    ///
    /// Entries beyond the cap are dropped.
    #[must_use]
    pub fn from_sessions(sessions: impl IntoIterator<Item = PastSession>, limit: usize) -> Self {
        Self {
            sessions: sessions.into_iter().take(limit).collect(),
            limit,
        }
    }

    /// Prepend a session, evicting the oldest entries beyond the cap.
    pub fn append(&mut self, session: PastSession) {
        self.sessions.push_front(session);
        if self.sessions.len() > self.limit {
            self.sessions.truncate(self.limit);
        }
    }

    /// Drop every entry.
    pub fn clear(&mut self) {
        self.sessions.clear();
    }

    /// Look up a session by ID.
    #[must_use]
    pub fn get(&self, id: &str) -> Option<&PastSession> {
        self.sessions.iter().find(|s| s.id == id)
    }

    /// Iterate newest first.
    pub fn iter(&self) -> impl Iterator<Item = &PastSession> {
        self.sessions.iter()
    }

    /// Snapshot of the entries, newest first. O(1).
    #[must_use]
    pub fn sessions(&self) -> Vector<PastSession> {
        self.sessions.clone()
    }

    /// The most recent entry.
    #[must_use]
    pub fn latest(&self) -> Option<&PastSession> {
        self.sessions.front()
    }

    /// Number of entries.
    #[must_use]
    pub fn len(&self) -> usize {
        self.sessions.len()
    }

    /// Check if the archive is empty.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.sessions.is_empty()
    }

    /// The cap.
    #[must_use]
    pub fn limit(&self) -> usize {
        self.limit
    }
}
