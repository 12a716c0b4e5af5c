//! Application state shared by every handler.

use std::sync::Arc;

use application::Dispatcher;
use domain::services::SpeechInput;
use infrastructure::config::Config;
use tokio::sync::RwLock;

#[derive(Clone)]
pub struct AppState {
    pub dispatcher: Arc<Dispatcher>,
    pub listener: Option<Arc<dyn SpeechInput>>,
    pub config: Arc<RwLock<Config>>,
}

impl AppState {
    pub fn new(
        dispatcher: Arc<Dispatcher>,
        listener: Option<Arc<dyn SpeechInput>>,
        config: Config,
    ) -> Self {
        Self {
            dispatcher,
            listener,
            config: Arc::new(RwLock::new(config)),
        }
    }
}
