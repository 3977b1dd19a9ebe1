//! services/api/src/web/state.rs
//!
//! Defines the application's shared state.

use crate::config::Config;
use auracare_core::journal::Journal;
use auracare_core::ports::{ReplyService, SentimentService, WellnessStore};
use std::sync::Arc;

/// The shared application state, created once at startup and passed to all handlers.
#[derive(Clone)]
pub struct AppState {
    /// The session/mood-logging service over the store.
    pub journal: Journal,
    /// Direct store access for accounts, auth, and catalog handlers.
    pub store: Arc<dyn WellnessStore>,
    pub config: Arc<Config>,
    pub reply_adapter: Arc<dyn ReplyService>,
    pub classifier_adapter: Arc<dyn SentimentService>,
}

impl AppState {
    pub fn new(
        store: Arc<dyn WellnessStore>,
        config: Arc<Config>,
        reply_adapter: Arc<dyn ReplyService>,
        classifier_adapter: Arc<dyn SentimentService>,
    ) -> Self {
        Self {
            journal: Journal::new(store.clone()),
            store,
            config,
            reply_adapter,
            classifier_adapter,
        }
    }
}
