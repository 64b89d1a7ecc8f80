use std::sync::Arc;

use crate::config::AppConfig;
use crate::database::RepairsStore;

/// Shared by every request handler and middleware
#[derive(Clone)]
pub struct AppState {
    pub store: Arc<dyn RepairsStore>,
    pub config: Arc<AppConfig>,
}

impl AppState {
    pub fn new(store: Arc<dyn RepairsStore>, config: AppConfig) -> Self {
        Self {
            store,
            config: Arc::new(config),
        }
    }
}
