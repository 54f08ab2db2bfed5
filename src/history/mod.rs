//! History of finished sessions.
//!
//! - `PastSession`: immutable record built once when a session finishes
//! - `HistoryArchive`: newest-first, capped list of records

pub mod archive;
pub mod record;

pub use archive::HistoryArchive;
pub use record::{PastSession, SessionStamp};
