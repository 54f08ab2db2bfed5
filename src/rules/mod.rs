//! Session rules.
//!
//! The rules are a pure function from `(GameState, Event)` to the next
//! state plus the `Effect`s a driver must perform. `SessionMachine` is the
//! driver used by this crate; other front ends can drive `transition`
//! directly.

pub mod engine;

pub use engine::{transition, Effect, Event, Transition};
