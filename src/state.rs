use std::sync::Arc;

use crate::ai::{AiClient, AiError, AiService};
use crate::config::Config;
use crate::db::Database;

/// Shared handler state.
pub struct AppState {
    pub config: Config,
    pub db: Database,
    pub ai: AiService,
}

pub type SharedState = Arc<AppState>;

impl AppState {
    pub fn new(config: Config, db: Database, ai: AiService) -> SharedState {
        Arc::new(Self { config, db, ai })
    }

    /// Build the AI chain from the environment named in `config`.
    pub fn from_config(config: Config, db: Database) -> Result<SharedState, AiError> {
        let ai = AiService::new(AiClient::from_config(&config.ai)?);
        Ok(Self::new(config, db, ai))
    }
}
