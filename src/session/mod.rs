//! Session driver: owns state, history and persistence.

mod clock;
mod machine;

pub use clock::{Clock, FixedClock, SystemClock};
pub use machine::{Outcome, SessionMachine};
