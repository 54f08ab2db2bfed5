//! Deck provider trait and the built-in static implementation.

use async_trait::async_trait;
use tracing::{debug, warn};

use crate::cards::{Card, ThemeRegistry};
use crate::core::{SessionConfig, ThemeFallback};
use crate::error::DeckError;

/// Source of session decks.
///
/// Implementations return the ordered cards for a theme. The first card is
/// shown immediately; the rest are drawn in order.
#[async_trait]
pub trait DeckProvider: Send + Sync {
    /// Fetch the deck for `theme`.
    async fn request_deck(&self, theme: &str) -> Result<Vec<Card>, DeckError>;
}

/// Deck provider backed by a `ThemeRegistry`.
///
/// ```
/// use ember_cards::deck::{DeckProvider, StaticDeckProvider};
///
/// # tokio_test_block(async {
/// let provider = StaticDeckProvider::builtin();
/// let deck = provider.request_deck("Hard Truths").await.unwrap();
/// assert_eq!(deck[0].id.as_str(), "truth-1");
/// # });
/// # fn tokio_test_block<F: std::future::Future>(f: F) {
/// #     tokio::runtime::Builder::new_current_thread().build().unwrap().block_on(f);
/// # }
/// ```
#[derive(Clone, Debug)]
pub struct StaticDeckProvider {
    registry: ThemeRegistry,
    default_theme: String,
    fallback: ThemeFallback,
}

impl StaticDeckProvider {
    /// Create a provider over `registry`, falling back to `default_theme`
    /// for unknown names.
    #[must_use]
    pub fn new(registry: ThemeRegistry, default_theme: impl Into<String>) -> Self {
        Self {
            registry,
            default_theme: default_theme.into(),
            fallback: ThemeFallback::Default,
        }
    }

    /// Provider over the built-in themes with the default configuration.
    #[must_use]
    pub fn builtin() -> Self {
        Self::from_config(ThemeRegistry::builtin(), &SessionConfig::default())
    }

    /// Provider over `registry` using the theme settings of `config`.
    #[must_use]
    pub fn from_config(registry: ThemeRegistry, config: &SessionConfig) -> Self {
        Self::new(registry, config.default_theme.clone()).with_fallback(config.theme_fallback)
    }

    /// Set unknown-theme handling.
    #[must_use]
    pub fn with_fallback(mut self, fallback: ThemeFallback) -> Self {
        self.fallback = fallback;
        self
    }

    /// Get the underlying registry.
    #[must_use]
    pub fn registry(&self) -> &ThemeRegistry {
        &self.registry
    }

    fn resolve(&self, theme: &str) -> Result<Vec<Card>, DeckError> {
        if let Some(deck) = self.registry.deck(theme) {
            return Ok(deck);
        }

        match self.fallback {
            ThemeFallback::Default => {
                warn!(theme, fallback = %self.default_theme, "unknown theme, serving default deck");
                self.registry
                    .deck(&self.default_theme)
                    .ok_or_else(|| DeckError::UnknownTheme(theme.to_string()))
            }
            ThemeFallback::Reject => Err(DeckError::UnknownTheme(theme.to_string())),
        }
    }
}

#[async_trait]
impl DeckProvider for StaticDeckProvider {
    async fn request_deck(&self, theme: &str) -> Result<Vec<Card>, DeckError> {
        let deck = self.resolve(theme)?;
        debug!(theme, cards = deck.len(), "deck resolved");
        Ok(deck)
    }
}
