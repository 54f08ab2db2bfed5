//! Session configuration.
//!
//! Everything a `SessionMachine` needs to know besides its collaborators:
//! - Storage keys for the active session and the history log
//! - The history cap
//! - The default content theme and how unknown themes are handled
//!
//! Configs are plain serde values, so a partial JSON document overrides
//! only the fields it names.

use serde::{Deserialize, Serialize};

use crate::cards::DEFAULT_THEME;

/// Storage key of the active session record.
pub const SESSION_KEY: &str = "ember_active_session";

/// Storage key of the history record.
pub const HISTORY_KEY: &str = "ember_journey_history";

/// Maximum number of archived sessions kept.
pub const HISTORY_LIMIT: usize = 50;

/// What a deck provider does with a theme name it doesn't know.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ThemeFallback {
    /// Serve the default theme's deck instead.
    #[default]
    Default,
    /// Fail the request; the session returns to setup.
    Reject,
}

/// Configuration for a session machine and its persistence.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Key under which the live session is stored.
    pub session_key: String,

    /// Key under which the history list is stored.
    pub history_key: String,

    /// Maximum archived sessions. Oldest entries beyond this are dropped.
    pub history_limit: usize,

    /// Theme selected on a fresh setup screen and used as fallback deck.
    pub default_theme: String,

    /// Handling of unrecognized theme names.
    pub theme_fallback: ThemeFallback,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            session_key: SESSION_KEY.to_string(),
            history_key: HISTORY_KEY.to_string(),
            history_limit: HISTORY_LIMIT,
            default_theme: DEFAULT_THEME.to_string(),
            theme_fallback: ThemeFallback::default(),
        }
    }
}

impl SessionConfig {
    /// Create a configuration with the standard keys and limits.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a configuration from JSON. Missing fields keep their defaults.
    pub fn from_json(json: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(json)
    }

    /// Set both storage keys.
    #[must_use]
    pub fn with_keys(mut self, session_key: impl Into<String>, history_key: impl Into<String>) -> Self {
        self.session_key = session_key.into();
        self.history_key = history_key.into();
        self
    }

    /// Set the history cap.
    #[must_use]
    pub fn with_history_limit(mut self, limit: usize) -> Self {
        self.history_limit = limit;
        self
    }

    /// Set the default theme.
    #[must_use]
    pub fn with_default_theme(mut self, theme: impl Into<String>) -> Self {
        self.default_theme = theme.into();
        self
    }

    /// Set unknown-theme handling.
    #[must_use]
    pub fn with_theme_fallback(mut self, fallback: ThemeFallback) -> Self {
        self.theme_fallback = fallback;
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_config() {
        let config = SessionConfig::new();

        assert_eq!(config.session_key, "ember_active_session");
        assert_eq!(config.history_key, "ember_journey_history");
        assert_eq!(config.history_limit, 50);
        assert_eq!(config.default_theme, "Deep Connections");
        assert_eq!(config.theme_fallback, ThemeFallback::Default);
    }

    #[test]
    fn test_config_builder() {
        let config = SessionConfig::new()
            .with_keys("s", "h")
            .with_history_limit(5)
            .with_default_theme("Hard Truths")
            .with_theme_fallback(ThemeFallback::Reject);

        assert_eq!(config.session_key, "s");
        assert_eq!(config.history_key, "h");
        assert_eq!(config.history_limit, 5);
        assert_eq!(config.default_theme, "Hard Truths");
        assert_eq!(config.theme_fallback, ThemeFallback::Reject);
    }

    #[test]
    fn test_partial_json_config() {
        let config = SessionConfig::from_json(r#"{"history_limit": 10, "theme_fallback": "reject"}"#).unwrap();

        assert_eq!(config.history_limit, 10);
        assert_eq!(config.theme_fallback, ThemeFallback::Reject);
        assert_eq!(config.session_key, SESSION_KEY);
    }

    #[test]
    fn test_bad_json_config() {
        assert!(SessionConfig::from_json("{not json").is_err());
    }
}
