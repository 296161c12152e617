// Application state module
// Holds the loaded configuration and the immutable template index

use std::sync::Arc;

use super::types::Config;
use crate::templates::TemplateIndex;

/// Application state shared by every connection
pub struct AppState {
    pub config: Config,
    pub index: Arc<TemplateIndex>,
}

impl AppState {
    pub fn new(config: Config, index: TemplateIndex) -> Self {
        Self {
            config,
            index: Arc::new(index),
        }
    }
}
