use std::sync::Arc;

use crate::{
    services::identity_service::SessionTokens,
    store::{MemoryStore, StorefrontStore},
};

#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn StorefrontStore>,
    pub tokens: Arc<SessionTokens>,
}

impl AppState {
    pub fn new(store: Arc<dyn StorefrontStore>, tokens: SessionTokens) -> Self {
        Self {
            store,
            tokens: Arc::new(tokens),
        }
    }

    /// State over a fresh [`MemoryStore`], for local runs and tests.
    pub fn in_memory(jwt_secret: &str) -> Self {
        Self::new(
            Arc::new(MemoryStore::new()),
            SessionTokens::new(jwt_secret, 24),
        )
    }
}
