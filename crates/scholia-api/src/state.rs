use std::sync::Arc;

use scholia_persist::PersistenceClient;
use scholia_tutor::TutorClient;

use crate::config::Config;

/// Shared application state passed to all handlers
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<Config>,
    pub persist: Arc<dyn PersistenceClient>,
    pub tutor: Arc<dyn TutorClient>,
}

impl AppState {
    pub fn new(
        config: Config,
        persist: Arc<dyn PersistenceClient>,
        tutor: Arc<dyn TutorClient>,
    ) -> Self {
        Self {
            config: Arc::new(config),
            persist,
            tutor,
        }
    }
}
