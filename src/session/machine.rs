//! The session driver.
//!
//! `SessionMachine` owns the live `GameState`, the `HistoryArchive` and the
//! `Persistence` layer. Every operation runs one rules transition, mirrors
//! the result into the store and carries out the returned effects.
//!
//! ## Starting a session
//!
//! Starting is split in two so the deck fetch can happen anywhere:
//!
//! - `begin_start` validates names, moves to `loading` and returns the
//!   `DeckRequestId` to answer.
//! - `complete_start` feeds the provider's answer back. Answers for a
//!   request that has since been superseded are dropped.
//!
//! `start` does both around an awaited `DeckProvider` call.

use smallvec::SmallVec;
use tracing::{debug, error, info, warn};

use super::clock::{Clock, SystemClock};
use crate::cards::{Card, CardId};
use crate::core::{DeckRequestId, GameState, Intent, Players, SessionConfig, VisualTheme};
use crate::deck::DeckProvider;
use crate::error::{DeckError, SessionError};
use crate::history::{HistoryArchive, PastSession, SessionStamp};
use crate::rules::{transition, Effect, Event, Transition};
use crate::storage::{KeyValueStore, MemoryStore, Persistence};

/// Stored stamps further ahead of the clock than this are ignored.
const MAX_STAMP_SKEW_MS: i64 = 24 * 60 * 60 * 1000;

/// What a dispatched intent did.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Outcome {
    /// The session or history changed.
    Applied,
    /// The intent was not legal in the current phase.
    Ignored,
    /// The session finished and this record was archived.
    Archived(PastSession),
    /// Result of a history lookup.
    Review(Option<PastSession>),
}

/// Drives one session and its history over a `KeyValueStore`.
pub struct SessionMachine<S> {
    state: GameState,
    history: HistoryArchive,
    persistence: Persistence<S>,
    config: SessionConfig,
    clock: Box<dyn Clock>,
    last_request: DeckRequestId,
    last_stamp: i64,
}

impl SessionMachine<MemoryStore> {
    /// A machine over a fresh in-memory store with the default config.
    #[must_use]
    pub fn in_memory() -> Self {
        Self::open(MemoryStore::new(), SessionConfig::default())
    }
}

impl<S: KeyValueStore> SessionMachine<S> {
    /// Open a machine over `store`, rehydrating the saved session and
    /// history.
    ///
    /// The session record is rewritten immediately so a rehydration that
    /// changed the state (for example `loading` back to `setup`) is
    /// reflected in the store.
    pub fn open(store: S, config: SessionConfig) -> Self {
        let persistence = Persistence::new(store, &config);
        let state = persistence.load_session();
        let history = persistence.load_history();
        let last_stamp = history
            .iter()
            .filter_map(|session| session.id.parse::<i64>().ok())
            .max()
            .unwrap_or(0);

        info!(
            status = %state.status(),
            history = history.len(),
            "session machine opened"
        );

        let mut machine = Self {
            state,
            history,
            persistence,
            config,
            clock: Box::new(SystemClock),
            last_request: DeckRequestId::default(),
            last_stamp,
        };
        machine.persist_session();
        machine
    }

    /// Use `clock` for archive stamps.
    #[must_use]
    pub fn with_clock(mut self, clock: impl Clock + 'static) -> Self {
        self.clock = Box::new(clock);
        self
    }

    /// Current session state.
    #[must_use]
    pub fn state(&self) -> &GameState {
        &self.state
    }

    /// Archived sessions, newest first.
    #[must_use]
    pub fn history(&self) -> &HistoryArchive {
        &self.history
    }

    /// Active configuration.
    #[must_use]
    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    /// Get the underlying store.
    #[must_use]
    pub fn store(&self) -> &S {
        self.persistence.store()
    }

    /// Consume the machine and return its store.
    pub fn into_store(self) -> S {
        self.persistence.into_store()
    }

    /// Validate names and move to `loading`.
    ///
    /// Returns the request the deck answer must carry, or `None` if the
    /// session is already playing or finished. Names are stored trimmed.
    pub fn begin_start(
        &mut self,
        player1: &str,
        player2: &str,
        theme: &str,
        visual_theme: VisualTheme,
    ) -> Result<Option<DeckRequestId>, SessionError> {
        let players = Players::new(player1.trim(), player2.trim());
        for (id, name) in players.iter() {
            if name.is_empty() {
                return Err(SessionError::EmptyPlayerName(id));
            }
        }

        let request = self.last_request.next();
        let effects = self.apply(Event::Start {
            players,
            theme: theme.to_string(),
            visual_theme,
            request,
        });
        if effects.is_none() {
            return Ok(None);
        }

        self.last_request = request;
        debug!(%request, theme, "deck requested");
        Ok(Some(request))
    }

    /// Feed a deck answer back. Returns `false` if the answer was stale.
    ///
    /// An empty deck is treated as a failed request.
    pub fn complete_start(
        &mut self,
        request: DeckRequestId,
        result: Result<Vec<Card>, DeckError>,
    ) -> bool {
        let event = match result {
            Ok(cards) if cards.is_empty() => Event::DeckFailed {
                request,
                reason: DeckError::EmptyDeck(self.state.theme.clone()).to_string(),
            },
            Ok(cards) => Event::DeckLoaded { request, cards },
            Err(e) => Event::DeckFailed {
                request,
                reason: e.to_string(),
            },
        };
        self.apply(event).is_some()
    }

    /// Start a session, fetching the deck from `provider`.
    ///
    /// Deck failures are not errors: the session returns to `setup`.
    pub async fn start<P>(
        &mut self,
        provider: &P,
        player1: &str,
        player2: &str,
        theme: &str,
        visual_theme: VisualTheme,
    ) -> Result<(), SessionError>
    where
        P: DeckProvider + ?Sized,
    {
        let Some(request) = self.begin_start(player1, player2, theme, visual_theme)? else {
            return Ok(());
        };
        let result = provider.request_deck(theme).await;
        self.complete_start(request, result);
        Ok(())
    }

    /// Draw the next card. Returns `false` if nothing changed.
    pub fn advance_turn(&mut self) -> bool {
        self.apply(Event::AdvanceTurn).is_some()
    }

    /// Flip the impactful marking of a shown card.
    pub fn toggle_impactful(&mut self, card_id: &CardId) -> bool {
        self.apply(Event::ToggleImpactful(card_id.clone())).is_some()
    }

    /// Finish the session and archive it.
    ///
    /// Returns the new record, or `None` if the session was not playing.
    pub fn finish(&mut self) -> Option<PastSession> {
        if !self.state.is_playing() {
            debug!(status = %self.state.status(), "finish ignored outside play");
            return None;
        }

        let stamp = self.next_stamp();
        self.apply(Event::Finish(stamp))?
            .into_iter()
            .find_map(|effect| match effect {
                Effect::Archive(record) => Some(record),
                Effect::RequestDeck { .. } => None,
            })
    }

    /// Discard the session, keeping only the visual theme.
    pub fn reset(&mut self) {
        self.apply(Event::Reset {
            default_theme: self.config.default_theme.clone(),
        });
    }

    /// Look up an archived session.
    #[must_use]
    pub fn review(&self, id: &str) -> Option<&PastSession> {
        self.history.get(id)
    }

    /// Drop every archived session.
    pub fn clear_history(&mut self) {
        let dropped = self.history.len();
        self.history.clear();
        self.persist_history();
        info!(dropped, "history cleared");
    }

    /// Run `intent`, fetching decks from `provider` when starting.
    pub async fn dispatch<P>(&mut self, intent: Intent, provider: &P) -> Result<Outcome, SessionError>
    where
        P: DeckProvider + ?Sized,
    {
        let applied = |changed: bool| {
            if changed {
                Outcome::Applied
            } else {
                Outcome::Ignored
            }
        };

        let outcome = match intent {
            Intent::Start {
                player1,
                player2,
                theme,
                visual_theme,
            } => match self.begin_start(&player1, &player2, &theme, visual_theme)? {
                Some(request) => {
                    let result = provider.request_deck(&theme).await;
                    self.complete_start(request, result);
                    Outcome::Applied
                }
                None => Outcome::Ignored,
            },
            Intent::AdvanceTurn => applied(self.advance_turn()),
            Intent::ToggleImpactful { card_id } => applied(self.toggle_impactful(&card_id)),
            Intent::Finish => self.finish().map_or(Outcome::Ignored, Outcome::Archived),
            Intent::Reset => {
                self.reset();
                Outcome::Applied
            }
            Intent::ReviewSession { id } => Outcome::Review(self.review(&id).cloned()),
            Intent::ClearHistory => {
                self.clear_history();
                Outcome::Applied
            }
        };
        Ok(outcome)
    }

    /// Run one transition, persist on change and archive records.
    ///
    /// Returns the remaining effects, or `None` if the event was ignored.
    fn apply(&mut self, event: Event) -> Option<SmallVec<[Effect; 1]>> {
        let state = std::mem::take(&mut self.state);
        let Transition {
            state,
            effects,
            changed,
        } = transition(state, event);
        self.state = state;

        if !changed {
            return None;
        }
        self.persist_session();

        for effect in &effects {
            if let Effect::Archive(record) = effect {
                self.history.append(record.clone());
                self.persist_history();
            }
        }
        Some(effects)
    }

    fn next_stamp(&mut self) -> SessionStamp {
        let now = self.clock.now();
        let now_millis = now.timestamp_millis();
        let floor = if self.last_stamp.saturating_sub(now_millis) > MAX_STAMP_SKEW_MS {
            warn!(last = self.last_stamp, "stored stamp is far in the future, ignoring it");
            now_millis
        } else {
            self.last_stamp.saturating_add(1)
        };
        let millis = now_millis.max(floor);
        self.last_stamp = millis;
        SessionStamp {
            id: millis.to_string(),
            date: SessionStamp::at(now).date,
        }
    }

    fn persist_session(&mut self) {
        if let Err(e) = self.persistence.save_session(&self.state) {
            error!(error = %e, "failed to persist session");
        }
    }

    fn persist_history(&mut self) {
        if let Err(e) = self.persistence.save_history(&self.history) {
            error!(error = %e, "failed to persist history");
        }
    }
}

impl<S> std::fmt::Debug for SessionMachine<S> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionMachine")
            .field("state", &self.state)
            .field("history", &self.history.len())
            .field("last_request", &self.last_request)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ResponseMode;
    use crate::core::{PlayerId, Status};
    use crate::error::StorageError;
    use crate::session::FixedClock;
    use chrono::{Local, TimeZone};

    fn cards(n: usize) -> Vec<Card> {
        (1..=n)
            .map(|i| {
                Card::new(
                    format!("c-{}", i),
                    format!("Prompt {}", i),
                    ResponseMode::OtherResponds,
                    "Test",
                )
            })
            .collect()
    }

    fn playing(machine: &mut SessionMachine<MemoryStore>, n: usize) {
        let request = machine
            .begin_start("Ava", "Ben", "Test", VisualTheme::Ocean)
            .unwrap()
            .unwrap();
        assert!(machine.complete_start(request, Ok(cards(n))));
    }

    #[test]
    fn test_blank_name_rejected() {
        let mut machine = SessionMachine::in_memory();
        let result = machine.begin_start("Ava", "   ", "Test", VisualTheme::Ember);

        assert!(matches!(result, Err(SessionError::EmptyPlayerName(p)) if p == PlayerId::SECOND));
        assert_eq!(machine.state(), &GameState::default());
    }

    #[test]
    fn test_names_stored_trimmed() {
        let mut machine = SessionMachine::in_memory();
        machine
            .begin_start("  Ava ", "Ben\n", "Test", VisualTheme::Ember)
            .unwrap();

        assert_eq!(machine.state().players, Players::new("Ava", "Ben"));
        assert_eq!(machine.state().status(), Status::Loading);
    }

    #[test]
    fn test_second_start_supersedes_first() {
        let mut machine = SessionMachine::in_memory();
        let first = machine
            .begin_start("Ava", "Ben", "Test", VisualTheme::Ember)
            .unwrap()
            .unwrap();
        let second = machine
            .begin_start("Ava", "Ben", "Other", VisualTheme::Ember)
            .unwrap()
            .unwrap();
        assert_ne!(first, second);

        assert!(!machine.complete_start(first, Ok(cards(3))));
        assert_eq!(machine.state().status(), Status::Loading);

        assert!(machine.complete_start(second, Ok(cards(2))));
        assert_eq!(machine.state().theme, "Other");
        assert_eq!(machine.state().deck_len(), 1);
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let mut machine = SessionMachine::in_memory();
        playing(&mut machine, 3);

        let again = machine
            .begin_start("Cy", "Di", "Test", VisualTheme::Ember)
            .unwrap();
        assert_eq!(again, None);
        assert_eq!(machine.state().players, Players::new("Ava", "Ben"));
    }

    #[test]
    fn test_empty_deck_returns_to_setup() {
        let mut machine = SessionMachine::in_memory();
        let request = machine
            .begin_start("Ava", "Ben", "Test", VisualTheme::Ember)
            .unwrap()
            .unwrap();

        assert!(machine.complete_start(request, Ok(Vec::new())));
        assert_eq!(machine.state().status(), Status::Setup);
        assert!(!machine.store().contains("ember_active_session"));
    }

    #[test]
    fn test_finish_stamps_are_unique() {
        let instant = Local.with_ymd_and_hms(2024, 3, 9, 20, 15, 0).unwrap();
        let mut machine = SessionMachine::in_memory().with_clock(FixedClock(instant));

        playing(&mut machine, 1);
        let first = machine.finish().unwrap();
        machine.reset();
        playing(&mut machine, 1);
        let second = machine.finish().unwrap();

        assert_eq!(first.date, "3/9/2024");
        assert_eq!(first.id, instant.timestamp_millis().to_string());
        assert_eq!(second.id, (instant.timestamp_millis() + 1).to_string());
        assert_eq!(machine.history().latest(), Some(&second));
    }

    #[test]
    fn test_far_future_stamp_in_history_is_ignored() {
        let instant = Local.with_ymd_and_hms(2024, 3, 9, 20, 15, 0).unwrap();
        let stored = vec![PastSession {
            id: i64::MAX.to_string(),
            date: "1/1/2024".into(),
            players: Players::new("Cy", "Di"),
            theme: "Test".into(),
            impactful_prompts: vec![],
            card_count: 3,
        }];
        let mut store = MemoryStore::new();
        store
            .set("ember_journey_history", &serde_json::to_string(&stored).unwrap())
            .unwrap();

        let mut machine =
            SessionMachine::open(store, SessionConfig::default()).with_clock(FixedClock(instant));
        playing(&mut machine, 1);
        let first = machine.finish().unwrap();
        machine.reset();
        playing(&mut machine, 1);
        let second = machine.finish().unwrap();

        assert_eq!(first.id, instant.timestamp_millis().to_string());
        assert_eq!(second.id, (instant.timestamp_millis() + 1).to_string());
        assert_eq!(machine.history().len(), 3);
    }

    #[test]
    fn test_finish_twice_archives_once() {
        let mut machine = SessionMachine::in_memory();
        playing(&mut machine, 2);

        assert!(machine.finish().is_some());
        assert!(machine.finish().is_none());
        assert_eq!(machine.history().len(), 1);
        assert_eq!(machine.state().status(), Status::Finished);
    }

    #[test]
    fn test_clear_history_persists_empty_list() {
        let mut machine = SessionMachine::in_memory();
        playing(&mut machine, 1);
        machine.finish();
        machine.clear_history();

        assert!(machine.history().is_empty());
        assert_eq!(
            machine.store().get("ember_journey_history").unwrap().as_deref(),
            Some("[]")
        );
    }

    #[derive(Default)]
    struct BrokenStore;

    impl KeyValueStore for BrokenStore {
        fn get(&self, _key: &str) -> Result<Option<String>, StorageError> {
            Ok(None)
        }

        fn set(&mut self, key: &str, _value: &str) -> Result<(), StorageError> {
            Err(StorageError::InvalidKey(key.to_string()))
        }

        fn remove(&mut self, _key: &str) -> Result<(), StorageError> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_does_not_block_transition() {
        let mut machine = SessionMachine::open(BrokenStore, SessionConfig::default());
        let request = machine
            .begin_start("Ava", "Ben", "Test", VisualTheme::Ember)
            .unwrap()
            .unwrap();
        machine.complete_start(request, Ok(cards(2)));
        machine.advance_turn();

        assert_eq!(machine.state().status(), Status::Playing);
        assert!(machine.finish().is_some());
        assert_eq!(machine.history().len(), 1);
    }
}
