use super::actor::{HoursActor, HoursActorHandle};
use super::models::{OpenStatus, ScheduleDoc};
use crate::config::Config;
use crate::db::HoursDb;
use crate::error::HoursResult;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the Hours actor
#[derive(Clone)]
pub struct HoursHandle {
    actor_handle: HoursActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl HoursHandle {
    /// Create a new HoursHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>, db: Arc<dyn HoursDb>) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = HoursActor::new(config, db);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Get the stored schedule document for a hospital
    pub async fn get_schedule(
        &self,
        hospital_id: impl Into<String>,
    ) -> HoursResult<Option<ScheduleDoc>> {
        self.actor_handle.get_schedule(hospital_id).await
    }

    /// Derive a hospital's open status at the given local time
    pub async fn status_at(
        &self,
        hospital_id: impl Into<String>,
        at: NaiveDateTime,
    ) -> HoursResult<OpenStatus> {
        self.actor_handle.status_at(hospital_id, at).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> HoursResult<()> {
        self.actor_handle.shutdown().await
    }
}
