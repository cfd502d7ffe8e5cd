mod actor;
mod handle;
pub mod models;
pub mod status;

pub use handle::HoursHandle;

use crate::config::Config;
use crate::db::HoursDb;
use crate::error::HoursResult;
use async_trait::async_trait;
use std::sync::Arc;
use tokio::sync::RwLock;

/// Hours component for reading hospital operating hours and deriving
/// their live open status
#[derive(Default)]
pub struct Hours {
    handle: RwLock<Option<HoursHandle>>,
}

impl Hours {
    /// Create a new Hours component
    pub fn new() -> Self {
        Self {
            handle: RwLock::new(None),
        }
    }

    /// Get the handle if it exists
    pub async fn get_handle(&self) -> Option<HoursHandle> {
        let handle_lock = self.handle.read().await;
        handle_lock.clone()
    }
}

#[async_trait]
impl super::Component for Hours {
    fn name(&self) -> &'static str {
        "hours"
    }

    async fn init(&self, db: Arc<dyn HoursDb>, config: Arc<RwLock<Config>>) -> HoursResult<()> {
        // Create a new handle if one doesn't exist
        let mut handle_lock = self.handle.write().await;
        if handle_lock.is_none() {
            *handle_lock = Some(HoursHandle::new(config, db));
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
