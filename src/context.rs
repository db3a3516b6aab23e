use std::sync::Arc;

use crate::config::AppConfig;
use crate::services::{GenerationService, HistoryService, MailService};

/// Process-wide read-only wiring shared by every pipeline run. Runs never
/// mutate it, so concurrent events need no synchronization beyond the Arcs.
#[derive(Clone)]
pub struct AppContext {
    pub config: AppConfig,
    pub history: Arc<dyn HistoryService>,
    pub generator: Arc<dyn GenerationService>,
    pub mailer: Arc<dyn MailService>,
}

impl AppContext {
    pub fn new(
        config: AppConfig,
        history: Arc<dyn HistoryService>,
        generator: Arc<dyn GenerationService>,
        mailer: Arc<dyn MailService>,
    ) -> Self {
        Self {
            config,
            history,
            generator,
            mailer,
        }
    }
}
