use crate::components::suggestions::models::{
    HoursCorrectionProposal, ListFilter, NewSuggestion, ProposalStatus,
};
use crate::config::Config;
use crate::db::{HoursDb, ReviewVerdict};
use crate::error::{component_error, Error, HoursResult};
use chrono::Utc;
use rust_i18n::t;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::info;

/// The Suggestions actor that processes messages
pub struct SuggestionsActor {
    _config: Arc<RwLock<Config>>,
    db: Arc<dyn HoursDb>,
    command_rx: mpsc::Receiver<SuggestionsCommand>,
}

/// Commands that can be sent to the Suggestions actor
pub enum SuggestionsCommand {
    Submit(
        NewSuggestion,
        mpsc::Sender<HoursResult<HoursCorrectionProposal>>,
    ),
    List(
        ListFilter,
        mpsc::Sender<HoursResult<Vec<HoursCorrectionProposal>>>,
    ),
    Approve(
        String,
        String,
        mpsc::Sender<HoursResult<HoursCorrectionProposal>>,
    ),
    Reject(
        String,
        String,
        String,
        mpsc::Sender<HoursResult<HoursCorrectionProposal>>,
    ),
    Shutdown,
}

/// Handle for communicating with the Suggestions actor
#[derive(Clone)]
pub struct SuggestionsActorHandle {
    command_tx: mpsc::Sender<SuggestionsCommand>,
}

impl SuggestionsActorHandle {
    /// Submit a new correction proposal
    pub async fn submit(
        &self,
        submission: NewSuggestion,
    ) -> HoursResult<HoursCorrectionProposal> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(SuggestionsCommand::Submit(submission, response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// List proposals matching the filter, newest first
    pub async fn list(&self, filter: ListFilter) -> HoursResult<Vec<HoursCorrectionProposal>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(SuggestionsCommand::List(filter, response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Approve a pending proposal and apply its schedule
    pub async fn approve(
        &self,
        id: impl Into<String>,
        reviewer: impl Into<String>,
    ) -> HoursResult<HoursCorrectionProposal> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(SuggestionsCommand::Approve(
                id.into(),
                reviewer.into(),
                response_tx,
            ))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Reject a pending proposal with a reviewer note
    pub async fn reject(
        &self,
        id: impl Into<String>,
        reviewer: impl Into<String>,
        note: impl Into<String>,
    ) -> HoursResult<HoursCorrectionProposal> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(SuggestionsCommand::Reject(
                id.into(),
                reviewer.into(),
                note.into(),
                response_tx,
            ))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> HoursResult<()> {
        let _ = self.command_tx.send(SuggestionsCommand::Shutdown).await;
        Ok(())
    }
}

impl SuggestionsActor {
    /// Create a new actor and return its handle
    pub fn new(
        config: Arc<RwLock<Config>>,
        db: Arc<dyn HoursDb>,
    ) -> (Self, SuggestionsActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            _config: config,
            db,
            command_rx,
        };

        let handle = SuggestionsActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Suggestions actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                SuggestionsCommand::Submit(submission, response_tx) => {
                    let result = self.submit(submission).await;
                    let _ = response_tx.send(result).await;
                }
                SuggestionsCommand::List(filter, response_tx) => {
                    let result = self.list(filter).await;
                    let _ = response_tx.send(result).await;
                }
                SuggestionsCommand::Approve(id, reviewer, response_tx) => {
                    let result = self.approve(&id, &reviewer).await;
                    let _ = response_tx.send(result).await;
                }
                SuggestionsCommand::Reject(id, reviewer, note, response_tx) => {
                    let result = self.reject(&id, &reviewer, &note).await;
                    let _ = response_tx.send(result).await;
                }
                SuggestionsCommand::Shutdown => {
                    info!("Suggestions actor shutting down");
                    break;
                }
            }
        }

        info!("Suggestions actor shut down");
    }

    /// Snapshot the live schedule and store a fresh pending proposal
    async fn submit(&self, submission: NewSuggestion) -> HoursResult<HoursCorrectionProposal> {
        let snapshot = self.db.get_schedule(&submission.hospital_id).await?;
        let proposal = HoursCorrectionProposal::new(
            submission.hospital_id,
            submission.hospital_name,
            snapshot,
            submission.proposed_schedule,
            submission.justification,
            submission.submitter_id,
        );
        self.db.insert_proposal(&proposal).await?;

        info!(
            "Suggestion {} submitted for hospital {}",
            proposal.id, proposal.hospital_id
        );
        Ok(proposal)
    }

    /// List stored proposals matching the filter
    async fn list(&self, filter: ListFilter) -> HoursResult<Vec<HoursCorrectionProposal>> {
        let proposals = self.db.list_proposals().await?;
        Ok(proposals
            .into_iter()
            .filter(|p| filter.matches(p.status))
            .collect())
    }

    /// Approve a proposal and overwrite the hospital's schedule with it
    async fn approve(&self, id: &str, reviewer: &str) -> HoursResult<HoursCorrectionProposal> {
        let verdict = ReviewVerdict {
            status: ProposalStatus::Approved,
            reviewed_at: Utc::now(),
            reviewed_by: reviewer.to_string(),
            reviewer_note: t!("suggestion_approved_note").to_string(),
            apply_schedule: true,
        };
        let proposal = self.db.complete_review(id, &verdict).await?;

        info!("Suggestion {} approved by {}", id, reviewer);
        Ok(proposal)
    }

    /// Reject a proposal, leaving the hospital's schedule untouched
    async fn reject(
        &self,
        id: &str,
        reviewer: &str,
        note: &str,
    ) -> HoursResult<HoursCorrectionProposal> {
        let note = note.trim();
        if note.is_empty() {
            return Err(Error::MissingJustification);
        }

        let verdict = ReviewVerdict {
            status: ProposalStatus::Rejected,
            reviewed_at: Utc::now(),
            reviewed_by: reviewer.to_string(),
            reviewer_note: note.to_string(),
            apply_schedule: false,
        };
        let proposal = self.db.complete_review(id, &verdict).await?;

        info!("Suggestion {} rejected by {}", id, reviewer);
        Ok(proposal)
    }
}
