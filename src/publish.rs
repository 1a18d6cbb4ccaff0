//! Publication of the effective configuration.
//!
//! [`EffectiveConfig`] is the reference caller of the resolution pipeline:
//! it resolves and validates a raw configuration and only then swaps it in
//! for readers. A configuration that violates an invariant is never
//! published; the last known-good configuration stays current.

use std::sync::Arc;

use tokio::sync::watch;
use tokio_stream::wrappers::WatchStream;
use tokio_stream::{Stream, StreamExt};
use tracing::{info, warn};

use crate::config::{ConfigError, RawConfiguration, ResolvedConfiguration, Validator};

#[cfg(test)]
#[path = "publish_tests.rs"]
mod tests;

/// Shared handle to the currently published configuration.
type Published = Option<Arc<ResolvedConfiguration>>;

/// Holds the effective configuration and publishes replacements atomically.
///
/// Readers either take a snapshot with [`current`](Self::current) or follow
/// swaps through [`subscribe`](Self::subscribe) / [`updates`](Self::updates).
/// Published configurations are immutable; adopting a new one replaces the
/// `Arc`, it never mutates the previous instance.
#[derive(Debug)]
pub struct EffectiveConfig {
    validator: Validator,
    sender: watch::Sender<Published>,
}

impl EffectiveConfig {
    /// Creates an empty handle (nothing published yet).
    #[must_use]
    pub fn new(validator: Validator) -> Self {
        let (sender, _) = watch::channel(None);
        Self { validator, sender }
    }

    /// Resolves, validates and publishes a raw configuration.
    ///
    /// # Errors
    ///
    /// Returns the invariant violation if validation fails. Nothing is
    /// published in that case and the previous configuration remains current.
    pub fn adopt(
        &self,
        raw: &RawConfiguration,
    ) -> Result<Arc<ResolvedConfiguration>, ConfigError> {
        let resolved = match self.validator.resolve(raw) {
            Ok(resolved) => Arc::new(resolved),
            Err(e) => {
                warn!(
                    keeping_previous = self.current().is_some(),
                    "Rejected configuration: {e}"
                );
                return Err(e);
            }
        };

        self.sender.send_replace(Some(Arc::clone(&resolved)));
        info!("Adopted configuration: {resolved}");

        Ok(resolved)
    }

    /// Returns the last adopted configuration, if any.
    #[must_use]
    pub fn current(&self) -> Option<Arc<ResolvedConfiguration>> {
        self.sender.borrow().clone()
    }

    /// Returns a receiver that observes every publication.
    #[must_use]
    pub fn subscribe(&self) -> watch::Receiver<Published> {
        self.sender.subscribe()
    }

    /// Returns a stream of published configurations.
    ///
    /// The stream yields the current configuration first (if one is
    /// published), then each subsequent adoption. Intermediate values may be
    /// skipped if the consumer lags; the latest is always delivered.
    pub fn updates(&self) -> impl Stream<Item = Arc<ResolvedConfiguration>> + use<> {
        WatchStream::new(self.sender.subscribe()).filter_map(std::convert::identity)
    }

    /// Returns the validator used for adoption.
    #[must_use]
    pub const fn validator(&self) -> &Validator {
        &self.validator
    }
}

impl Default for EffectiveConfig {
    fn default() -> Self {
        Self::new(Validator::standard())
    }
}
