//! Application state.

use std::sync::Arc;

use playforge_store::RocksStore;

use crate::config::ServiceConfig;
use crate::locks::KeyedLocks;
use crate::mailer::Mailer;

/// Application state shared across handlers.
#[derive(Clone)]
pub struct AppState {
    /// The storage backend.
    pub store: Arc<RocksStore>,

    /// Service configuration.
    pub config: ServiceConfig,

    /// Mail client for purchase notifications (optional).
    pub mailer: Option<Arc<Mailer>>,

    /// Per-game locks guarding content staging.
    pub content_locks: Arc<KeyedLocks>,
}

impl AppState {
    /// Create a new application state.
    #[must_use]
    pub fn new(store: Arc<RocksStore>, config: ServiceConfig) -> Self {
        let mailer = config
            .mail_api_url
            .as_ref()
            .zip(config.mail_api_key.as_ref())
            .map(|(url, key)| {
                tracing::info!(mail_url = %url, "Mail integration enabled");
                Arc::new(Mailer::new(url, key, &config.mail_from))
            });

        if mailer.is_none() {
            tracing::warn!("Mail not configured - purchase notifications will not be sent");
        }

        Self {
            store,
            config,
            mailer,
            content_locks: Arc::new(KeyedLocks::new()),
        }
    }

    /// Check if the mailer is configured.
    #[must_use]
    pub fn has_mailer(&self) -> bool {
        self.mailer.is_some()
    }
}
