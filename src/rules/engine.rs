//! Session transition rules.
//!
//! `transition` takes the current state and an event and returns the next
//! state plus the effects the driver must carry out. It performs no I/O:
//! deck requests and archiving are returned as `Effect` data.
//!
//! Events that are illegal in the current phase leave the state unchanged
//! and report `changed: false`.
//!
//! ```text
//! setup --Start--> loading --DeckLoaded--> playing --Finish--> finished
//!   ^                 |  ^                    |                    |
//!   |<--DeckFailed----+  +--Start (supersede) |                    |
//!   +<--------------------------- Reset ------+--------------------+
//! ```

use im::{OrdSet, Vector};
use smallvec::{smallvec, SmallVec};
use tracing::{debug, info, warn};

use crate::cards::{Card, CardId};
use crate::core::{DeckRequestId, GameState, PlayerId, Players, SessionPhase, VisualTheme};
use crate::history::{PastSession, SessionStamp};

/// Something that happened to the session.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Event {
    /// Players asked to begin; `request` identifies the deck request.
    Start {
        players: Players,
        theme: String,
        visual_theme: VisualTheme,
        request: DeckRequestId,
    },
    /// The deck provider answered `request` with `cards`.
    DeckLoaded {
        request: DeckRequestId,
        cards: Vec<Card>,
    },
    /// The deck provider failed `request`.
    DeckFailed {
        request: DeckRequestId,
        reason: String,
    },
    /// Draw the next card.
    AdvanceTurn,
    /// Flip the impactful marking of a card.
    ToggleImpactful(CardId),
    /// End the session; `stamp` identifies the archive record.
    Finish(SessionStamp),
    /// Return to setup with `default_theme` selected.
    Reset { default_theme: String },
}

/// Work the driver performs after a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Effect {
    /// Ask the deck provider for `theme`.
    RequestDeck {
        request: DeckRequestId,
        theme: String,
    },
    /// Prepend `record` to the history archive.
    Archive(PastSession),
}

/// Result of a transition.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Transition {
    /// The state after the event.
    pub state: GameState,
    /// Effects to carry out, in order.
    pub effects: SmallVec<[Effect; 1]>,
    /// False when the event was ignored.
    pub changed: bool,
}

impl Transition {
    fn new(state: GameState, effects: SmallVec<[Effect; 1]>) -> Self {
        Self {
            state,
            effects,
            changed: true,
        }
    }

    fn to(state: GameState) -> Self {
        Self::new(state, SmallVec::new())
    }

    fn no_change(state: GameState) -> Self {
        Self {
            state,
            effects: SmallVec::new(),
            changed: false,
        }
    }
}

/// Apply `event` to `state`.
pub fn transition(state: GameState, event: Event) -> Transition {
    match event {
        Event::Start {
            players,
            theme,
            visual_theme,
            request,
        } => start(state, players, theme, visual_theme, request),
        Event::DeckLoaded { request, cards } => deck_loaded(state, request, cards),
        Event::DeckFailed { request, reason } => deck_failed(state, request, &reason),
        Event::AdvanceTurn => advance_turn(state),
        Event::ToggleImpactful(card_id) => toggle_impactful(state, card_id),
        Event::Finish(stamp) => finish(state, stamp),
        Event::Reset { default_theme } => reset(state, default_theme),
    }
}

fn start(
    state: GameState,
    players: Players,
    theme: String,
    visual_theme: VisualTheme,
    request: DeckRequestId,
) -> Transition {
    match state.phase {
        SessionPhase::Setup | SessionPhase::Loading { .. } => {}
        _ => {
            debug!(status = %state.status(), "start ignored outside setup");
            return Transition::no_change(state);
        }
    }
    if !players.is_complete() {
        debug!("start ignored: player name missing");
        return Transition::no_change(state);
    }
    if let Some(previous) = state.pending_request() {
        info!(%previous, %request, "deck request superseded");
    }

    let effect = Effect::RequestDeck {
        request,
        theme: theme.clone(),
    };
    let next = GameState {
        players,
        theme,
        visual_theme,
        impactful: OrdSet::new(),
        phase: SessionPhase::Loading { request },
        ..state
    };
    Transition::new(next, smallvec![effect])
}

fn deck_loaded(state: GameState, request: DeckRequestId, cards: Vec<Card>) -> Transition {
    if state.pending_request() != Some(request) {
        debug!(%request, "stale deck response dropped");
        return Transition::no_change(state);
    }

    let mut deck: Vector<Card> = cards.into_iter().collect();
    let Some(current_card) = deck.pop_front() else {
        warn!(theme = %state.theme, "deck provider returned no cards, back to setup");
        return Transition::to(GameState {
            phase: SessionPhase::Setup,
            ..state
        });
    };

    info!(theme = %state.theme, cards = deck.len() + 1, "session playing");
    Transition::to(GameState {
        active_player: PlayerId::FIRST,
        phase: SessionPhase::Playing {
            deck,
            drawn_cards: Vector::new(),
            current_card,
        },
        ..state
    })
}

fn deck_failed(state: GameState, request: DeckRequestId, reason: &str) -> Transition {
    if state.pending_request() != Some(request) {
        debug!(%request, "stale deck failure dropped");
        return Transition::no_change(state);
    }

    warn!(theme = %state.theme, reason, "deck preparation failed, back to setup");
    Transition::to(GameState {
        phase: SessionPhase::Setup,
        ..state
    })
}

fn advance_turn(state: GameState) -> Transition {
    let SessionPhase::Playing {
        deck,
        drawn_cards,
        current_card,
    } = &state.phase
    else {
        debug!(status = %state.status(), "advance ignored outside play");
        return Transition::no_change(state);
    };

    let mut deck = deck.clone();
    let Some(next_card) = deck.pop_front() else {
        debug!("advance ignored: deck empty");
        return Transition::no_change(state);
    };

    let mut drawn_cards = drawn_cards.clone();
    drawn_cards.push_back(current_card.clone());

    Transition::to(GameState {
        active_player: state.active_player.next(),
        phase: SessionPhase::Playing {
            deck,
            drawn_cards,
            current_card: next_card,
        },
        ..state
    })
}

fn toggle_impactful(state: GameState, card_id: CardId) -> Transition {
    if !state.is_playing() || !state.has_shown(&card_id) {
        debug!(card = %card_id, "toggle ignored: card not on the table");
        return Transition::no_change(state);
    }

    let mut impactful = state.impactful.clone();
    if impactful.remove(&card_id).is_none() {
        impactful.insert(card_id);
    }

    Transition::to(GameState { impactful, ..state })
}

fn finish(state: GameState, stamp: SessionStamp) -> Transition {
    let SessionPhase::Playing {
        drawn_cards,
        current_card,
        ..
    } = &state.phase
    else {
        debug!(status = %state.status(), "finish ignored outside play");
        return Transition::no_change(state);
    };

    let mut final_drawn = drawn_cards.clone();
    final_drawn.push_back(current_card.clone());

    let record = PastSession {
        id: stamp.id,
        date: stamp.date,
        players: state.players.clone(),
        theme: state.theme.clone(),
        impactful_prompts: final_drawn
            .iter()
            .filter(|card| state.impactful.contains(&card.id))
            .map(|card| card.prompt.clone())
            .collect(),
        card_count: final_drawn.len(),
    };

    info!(
        id = %record.id,
        cards = record.card_count,
        impactful = record.impactful_prompts.len(),
        "session finished"
    );
    Transition::new(
        GameState {
            phase: SessionPhase::Finished {
                drawn_cards: final_drawn,
            },
            ..state
        },
        smallvec![Effect::Archive(record)],
    )
}

fn reset(state: GameState, default_theme: String) -> Transition {
    Transition::to(GameState::setup(default_theme, state.visual_theme))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::cards::ResponseMode;
    use crate::core::Status;

    fn cards(n: usize) -> Vec<Card> {
        (1..=n)
            .map(|i| {
                Card::new(
                    format!("t-{}", i),
                    format!("Prompt {}", i),
                    ResponseMode::BothRespond,
                    "Test",
                )
            })
            .collect()
    }

    fn stamp(id: &str) -> SessionStamp {
        SessionStamp {
            id: id.to_string(),
            date: "1/1/2024".to_string(),
        }
    }

    fn start_event(request: u64) -> Event {
        Event::Start {
            players: Players::new("Ava", "Ben"),
            theme: "Test".to_string(),
            visual_theme: VisualTheme::Forest,
            request: DeckRequestId(request),
        }
    }

    fn playing(n: usize) -> GameState {
        let loading = transition(GameState::default(), start_event(1)).state;
        transition(
            loading,
            Event::DeckLoaded {
                request: DeckRequestId(1),
                cards: cards(n),
            },
        )
        .state
    }

    #[test]
    fn test_start_requests_deck() {
        let result = transition(GameState::default(), start_event(1));

        assert!(result.changed);
        assert_eq!(result.state.status(), Status::Loading);
        assert_eq!(result.state.players, Players::new("Ava", "Ben"));
        assert_eq!(result.state.visual_theme, VisualTheme::Forest);
        assert_eq!(
            result.effects.as_slice(),
            &[Effect::RequestDeck {
                request: DeckRequestId(1),
                theme: "Test".to_string()
            }]
        );
    }

    #[test]
    fn test_start_with_blank_name_ignored() {
        let event = Event::Start {
            players: Players::new("Ava", " "),
            theme: "Test".to_string(),
            visual_theme: VisualTheme::Ember,
            request: DeckRequestId(1),
        };
        let result = transition(GameState::default(), event);

        assert!(!result.changed);
        assert_eq!(result.state, GameState::default());
    }

    #[test]
    fn test_start_ignored_while_playing() {
        let state = playing(3);
        let result = transition(state.clone(), start_event(2));

        assert!(!result.changed);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_deck_loaded_deals_first_card() {
        let state = playing(3);

        assert_eq!(state.status(), Status::Playing);
        assert_eq!(state.current_card().unwrap().id, CardId::new("t-1"));
        assert_eq!(state.deck_len(), 2);
        assert_eq!(state.drawn_cards().unwrap().len(), 0);
        assert_eq!(state.active_player, PlayerId::FIRST);
    }

    #[test]
    fn test_empty_deck_returns_to_setup() {
        let loading = transition(GameState::default(), start_event(1)).state;
        let result = transition(
            loading,
            Event::DeckLoaded {
                request: DeckRequestId(1),
                cards: Vec::new(),
            },
        );

        assert_eq!(result.state.status(), Status::Setup);
        assert_eq!(result.state.players, Players::new("Ava", "Ben"));
    }

    #[test]
    fn test_superseded_request_is_stale() {
        let first = transition(GameState::default(), start_event(1)).state;
        let second = transition(first, start_event(2)).state;

        let stale = transition(
            second,
            Event::DeckLoaded {
                request: DeckRequestId(1),
                cards: cards(2),
            },
        );
        assert!(!stale.changed);
        assert_eq!(stale.state.pending_request(), Some(DeckRequestId(2)));

        let fresh = transition(
            stale.state,
            Event::DeckLoaded {
                request: DeckRequestId(2),
                cards: cards(2),
            },
        );
        assert_eq!(fresh.state.status(), Status::Playing);
    }

    #[test]
    fn test_deck_failure_keeps_fields() {
        let loading = transition(GameState::default(), start_event(4)).state;
        let result = transition(
            loading,
            Event::DeckFailed {
                request: DeckRequestId(4),
                reason: "offline".to_string(),
            },
        );

        assert_eq!(result.state.status(), Status::Setup);
        assert_eq!(result.state.theme, "Test");
        assert_eq!(result.state.visual_theme, VisualTheme::Forest);
    }

    #[test]
    fn test_advance_turn_moves_cards() {
        let state = transition(playing(3), Event::AdvanceTurn).state;

        assert_eq!(state.current_card().unwrap().id, CardId::new("t-2"));
        assert_eq!(state.drawn_cards().unwrap()[0].id, CardId::new("t-1"));
        assert_eq!(state.deck_len(), 1);
        assert_eq!(state.active_player, PlayerId::SECOND);
    }

    #[test]
    fn test_advance_turn_on_empty_deck_is_noop() {
        let state = playing(1);
        let result = transition(state.clone(), Event::AdvanceTurn);

        assert!(!result.changed);
        assert_eq!(result.state, state);
    }

    #[test]
    fn test_previous_state_is_untouched() {
        let before = playing(3);
        let after = transition(before.clone(), Event::AdvanceTurn).state;

        assert_eq!(before.deck_len(), 2);
        assert_eq!(after.deck_len(), 1);
    }

    #[test]
    fn test_toggle_requires_shown_card() {
        let state = playing(3);

        let unseen = transition(state.clone(), Event::ToggleImpactful(CardId::new("t-3")));
        assert!(!unseen.changed);

        let marked = transition(state, Event::ToggleImpactful(CardId::new("t-1"))).state;
        assert!(marked.is_impactful(&CardId::new("t-1")));

        let unmarked = transition(marked, Event::ToggleImpactful(CardId::new("t-1"))).state;
        assert!(!unmarked.is_impactful(&CardId::new("t-1")));
    }

    #[test]
    fn test_toggle_ignored_when_not_playing() {
        let result = transition(GameState::default(), Event::ToggleImpactful(CardId::new("t-1")));
        assert!(!result.changed);
    }

    #[test]
    fn test_finish_archives_once() {
        let mut state = playing(3);
        state = transition(state, Event::ToggleImpactful(CardId::new("t-1"))).state;
        state = transition(state, Event::AdvanceTurn).state;

        let finished = transition(state, Event::Finish(stamp("42")));
        assert_eq!(finished.state.status(), Status::Finished);
        assert_eq!(finished.state.drawn_cards().unwrap().len(), 2);

        let [Effect::Archive(record)] = finished.effects.as_slice() else {
            panic!("expected one archive effect, got {:?}", finished.effects);
        };
        assert_eq!(record.id, "42");
        assert_eq!(record.card_count, 2);
        assert_eq!(record.impactful_prompts, vec!["Prompt 1".to_string()]);

        let again = transition(finished.state, Event::Finish(stamp("43")));
        assert!(!again.changed);
        assert!(again.effects.is_empty());
    }

    #[test]
    fn test_reset_keeps_visual_theme() {
        let reset = |theme: &str| Event::Reset {
            default_theme: theme.to_string(),
        };
        let state = transition(playing(2), reset("Deep Connections")).state;

        assert_eq!(state.status(), Status::Setup);
        assert_eq!(state.players, Players::empty());
        assert_eq!(state.visual_theme, VisualTheme::Forest);
        assert_eq!(state.theme, "Deep Connections");

        let custom = transition(playing(2), reset("Hard Truths")).state;
        assert_eq!(custom.theme, "Hard Truths");
    }
}
