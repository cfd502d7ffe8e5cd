mod actor;
mod handle;
pub mod models;

pub use handle::SuggestionsHandle;

use crate::config::Config;
use crate::db::HoursDb;
use crate::error::HoursResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Suggestions component for the hours-correction review workflow
#[derive(Default)]
pub struct Suggestions {
    handle: RwLock<Option<SuggestionsHandle>>,
}

impl Suggestions {
    /// Create a new Suggestions component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<SuggestionsHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Suggestions {
    fn name(&self) -> &'static str {
        "suggestions"
    }

    async fn init(&self, db: Arc<dyn HoursDb>, config: Arc<RwLock<Config>>) -> HoursResult<()> {
        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(SuggestionsHandle::new(config, db));
        }

        Ok(())
    }

    async fn shutdown(&self) -> HoursResult<()> {
        // Shutdown the handle if it exists
        let handle_lock = self.handle.read().await;
        if let Some(handle) = &*handle_lock {
            handle.shutdown().await?;
        }

        Ok(())
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }
}
