use std::collections::HashMap;
use std::sync::Arc;

use tokio::sync::RwLock;

use crate::config::EngineSettings;
use crate::services::{catalog::RecipeCatalog, providers::RecipeProvider, user_context::UserContext};

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub provider: Arc<dyn RecipeProvider>,
    /// Used when the primary provider's search fails
    pub backup: Option<Arc<dyn RecipeProvider>>,
    pub settings: Arc<EngineSettings>,
    pub inner: Arc<RwLock<AppStateInner>>,
}

/// Inner state that can be modified
#[derive(Default)]
pub struct AppStateInner {
    /// Shared, append-only recipe feature table
    pub catalog: RecipeCatalog,
    /// One context per user id
    pub users: HashMap<String, UserContext>,
}

impl AppStateInner {
    /// Context for a user, created with neutral preferences on first use
    pub fn user_mut(&mut self, user_id: &str) -> &mut UserContext {
        self.users
            .entry(user_id.to_string())
            .or_insert_with(|| UserContext::new(user_id))
    }
}

impl AppState {
    /// Creates a new application state with an empty catalog and no users
    pub fn new(
        provider: Arc<dyn RecipeProvider>,
        backup: Option<Arc<dyn RecipeProvider>>,
        settings: EngineSettings,
    ) -> Self {
        Self {
            provider,
            backup,
            settings: Arc::new(settings),
            inner: Arc::new(RwLock::new(AppStateInner::default())),
        }
    }
}
