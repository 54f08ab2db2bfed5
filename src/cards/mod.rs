//! Card system: prompt cards and themed decks.
//!
//! ## Key Types
//!
//! - `CardId`: String identifier of a prompt card
//! - `ResponseMode`: Who answers a prompt
//! - `Card`: Immutable prompt content
//! - `ThemeRegistry`: Theme name to ordered deck lookup

pub mod definition;
pub mod registry;
pub mod themes;

pub use definition::{Card, CardId, ResponseMode};
pub use registry::ThemeRegistry;
pub use themes::{DEFAULT_THEME, THEMES};
