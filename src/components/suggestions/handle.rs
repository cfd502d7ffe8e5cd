use super::actor::{SuggestionsActor, SuggestionsActorHandle};
use super::models::{HoursCorrectionProposal, ListFilter, NewSuggestion};
use crate::config::Config;
use crate::db::HoursDb;
use crate::error::HoursResult;
use std::sync::Arc;
use tokio::sync::RwLock;
use tokio::task::JoinHandle;

/// Handle for interacting with the Suggestions actor
#[derive(Clone)]
pub struct SuggestionsHandle {
    actor_handle: SuggestionsActorHandle,
    _actor_task: Arc<JoinHandle<()>>,
}

impl SuggestionsHandle {
    /// Create a new SuggestionsHandle and spawn the actor
    pub fn new(config: Arc<RwLock<Config>>, db: Arc<dyn HoursDb>) -> Self {
        // Create the actor and get its handle
        let (mut actor, handle) = SuggestionsActor::new(config, db);

        // Spawn a task to run the actor
        let actor_task = tokio::spawn(async move {
            actor.run().await;
        });

        Self {
            actor_handle: handle,
            _actor_task: Arc::new(actor_task),
        }
    }

    /// Submit a new correction proposal
    pub async fn submit(
        &self,
        submission: NewSuggestion,
    ) -> HoursResult<HoursCorrectionProposal> {
        self.actor_handle.submit(submission).await
    }

    /// List proposals matching the filter, newest first
    pub async fn list(&self, filter: ListFilter) -> HoursResult<Vec<HoursCorrectionProposal>> {
        self.actor_handle.list(filter).await
    }

    /// Approve a pending proposal and apply its schedule
    pub async fn approve(
        &self,
        id: impl Into<String>,
        reviewer: impl Into<String>,
    ) -> HoursResult<HoursCorrectionProposal> {
        self.actor_handle.approve(id, reviewer).await
    }

    /// Reject a pending proposal with a reviewer note
    pub async fn reject(
        &self,
        id: impl Into<String>,
        reviewer: impl Into<String>,
        note: impl Into<String>,
    ) -> HoursResult<HoursCorrectionProposal> {
        self.actor_handle.reject(id, reviewer, note).await
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> HoursResult<()> {
        self.actor_handle.shutdown().await
    }
}
