use crate::components::hours::models::ScheduleDoc;
use crate::components::suggestions::models::{HoursCorrectionProposal, ProposalStatus};
use crate::error::{db_error, invalid_transition, Error, HoursResult};
use async_trait::async_trait;
use chrono::{DateTime, Utc};
use redis::{AsyncCommands, Client as RedisClient};
use std::collections::HashMap;
use tracing::{info, warn};

/// Redis keys for directory records and correction proposals
mod keys {
    pub const SCHEDULE_PREFIX: &str = "hours:schedule:";
    pub const SUGGESTION_PREFIX: &str = "hours:suggestion:";
    /// Suggestion ids in submission order
    pub const SUGGESTION_INDEX: &str = "hours:suggestions";
    /// One entry per hospital with an open proposal
    pub const PENDING_PREFIX: &str = "hours:pending:";
}

/// How many times a watched transaction is retried before giving up
const TXN_ATTEMPTS: usize = 3;

/// A reviewer's verdict applied to a pending proposal
#[derive(Debug, Clone)]
pub struct ReviewVerdict {
    /// Terminal state, `Approved` or `Rejected`
    pub status: ProposalStatus,
    pub reviewed_at: DateTime<Utc>,
    pub reviewed_by: String,
    pub reviewer_note: String,
    /// Overwrite the hospital's schedule with the proposal's contents
    pub apply_schedule: bool,
}

/// Database trait for directory schedules and correction proposals
///
/// Implementations must make `insert_proposal` and `complete_review` atomic
/// within their own storage: the pending-per-hospital guard, the status
/// check-and-set and the schedule write-back all happen in one unit of work,
/// so a proposal can never be observed approved without its schedule applied.
#[async_trait]
pub trait HoursDb: Send + Sync + 'static {
    /// Get the authoritative schedule for a hospital
    async fn get_schedule(&self, hospital_id: &str) -> HoursResult<Option<ScheduleDoc>>;

    /// Store the authoritative schedule for a hospital
    async fn set_schedule(&self, hospital_id: &str, schedule: &ScheduleDoc) -> HoursResult<()>;

    /// Insert a new pending proposal
    ///
    /// Fails with [`Error::DuplicatePending`] while the hospital already has
    /// an open proposal.
    async fn insert_proposal(&self, proposal: &HoursCorrectionProposal) -> HoursResult<()>;

    /// Fetch a single proposal by id
    async fn get_proposal(&self, id: &str) -> HoursResult<Option<HoursCorrectionProposal>>;

    /// All proposals, newest submission first
    async fn list_proposals(&self) -> HoursResult<Vec<HoursCorrectionProposal>>;

    /// Atomically move a pending proposal to its terminal state
    ///
    /// Only the first verdict on a proposal wins; any later one fails with
    /// [`Error::InvalidTransition`]. Returns the updated proposal.
    async fn complete_review(
        &self,
        id: &str,
        verdict: &ReviewVerdict,
    ) -> HoursResult<HoursCorrectionProposal>;
}

#[derive(Debug, Default)]
struct MemState {
    schedules: HashMap<String, ScheduleDoc>,
    proposals: HashMap<String, HoursCorrectionProposal>,
    /// Proposal ids in submission order
    order: Vec<String>,
    /// hospital_id -> id of its pending proposal
    pending: HashMap<String, String>,
}

/// In-memory implementation of the database (for testing and as a fallback)
#[derive(Debug, Default)]
pub struct InMemoryDb {
    state: tokio::sync::RwLock<MemState>,
}

#[async_trait]
impl HoursDb for InMemoryDb {
    async fn get_schedule(&self, hospital_id: &str) -> HoursResult<Option<ScheduleDoc>> {
        let state = self.state.read().await;
        Ok(state.schedules.get(hospital_id).cloned())
    }

    async fn set_schedule(&self, hospital_id: &str, schedule: &ScheduleDoc) -> HoursResult<()> {
        let mut state = self.state.write().await;
        state
            .schedules
            .insert(hospital_id.to_string(), schedule.clone());
        Ok(())
    }

    async fn insert_proposal(&self, proposal: &HoursCorrectionProposal) -> HoursResult<()> {
        let mut state = self.state.write().await;
        if state.pending.contains_key(&proposal.hospital_id) {
            return Err(Error::DuplicatePending(proposal.hospital_id.clone()));
        }
        state
            .pending
            .insert(proposal.hospital_id.clone(), proposal.id.clone());
        state.order.push(proposal.id.clone());
        state
            .proposals
            .insert(proposal.id.clone(), proposal.clone());
        Ok(())
    }

    async fn get_proposal(&self, id: &str) -> HoursResult<Option<HoursCorrectionProposal>> {
        let state = self.state.read().await;
        Ok(state.proposals.get(id).cloned())
    }

    async fn list_proposals(&self) -> HoursResult<Vec<HoursCorrectionProposal>> {
        let state = self.state.read().await;
        Ok(state
            .order
            .iter()
            .rev()
            .filter_map(|id| state.proposals.get(id).cloned())
            .collect())
    }

    async fn complete_review(
        &self,
        id: &str,
        verdict: &ReviewVerdict,
    ) -> HoursResult<HoursCorrectionProposal> {
        let mut state = self.state.write().await;
        let updated = {
            let proposal = state
                .proposals
                .get_mut(id)
                .ok_or_else(|| Error::SuggestionNotFound(id.to_string()))?;
            if proposal.status != ProposalStatus::Pending {
                return Err(invalid_transition(id, &proposal.status.to_string()));
            }
            proposal.status = verdict.status;
            proposal.reviewed_at = Some(verdict.reviewed_at);
            proposal.reviewed_by = Some(verdict.reviewed_by.clone());
            proposal.reviewer_note = Some(verdict.reviewer_note.clone());
            proposal.clone()
        };
        state.pending.remove(&updated.hospital_id);
        if verdict.apply_schedule {
            state.schedules.insert(
                updated.hospital_id.clone(),
                updated.proposed_schedule.clone(),
            );
        }
        Ok(updated)
    }
}

/// Direct Redis database implementation
pub struct RedisDB {
    client: RedisClient,
}

impl RedisDB {
    /// Create a new Redis database connection
    pub fn new(redis_url: &str) -> HoursResult<Self> {
        info!("Connecting to Redis at {}", redis_url);

        let client = RedisClient::open(redis_url)
            .map_err(|e| db_error(&format!("Failed to create Redis client: {}", e)))?;

        Ok(Self { client })
    }

    /// Get a Redis connection from the client
    ///
    /// Each caller gets its own connection, which keeps WATCH state from
    /// leaking between concurrent operations.
    async fn get_connection(&self) -> HoursResult<redis::aio::MultiplexedConnection> {
        self.client
            .get_multiplexed_async_connection()
            .await
            .map_err(|e| db_error(&format!("Failed to connect to Redis: {}", e)))
    }
}

#[async_trait]
impl HoursDb for RedisDB {
    async fn get_schedule(&self, hospital_id: &str) -> HoursResult<Option<ScheduleDoc>> {
        let key = format!("{}{}", keys::SCHEDULE_PREFIX, hospital_id);
        let mut conn = self.get_connection().await?;

        let data: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| db_error(&format!("Redis GET error: {}", e)))?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn set_schedule(&self, hospital_id: &str, schedule: &ScheduleDoc) -> HoursResult<()> {
        let key = format!("{}{}", keys::SCHEDULE_PREFIX, hospital_id);
        let mut conn = self.get_connection().await?;

        let json = serde_json::to_string(schedule)?;
        let _: () = conn
            .set(&key, &json)
            .await
            .map_err(|e| db_error(&format!("Redis SET error: {}", e)))?;

        info!("Stored schedule for hospital {}", hospital_id);
        Ok(())
    }

    async fn insert_proposal(&self, proposal: &HoursCorrectionProposal) -> HoursResult<()> {
        let suggestion_key = format!("{}{}", keys::SUGGESTION_PREFIX, proposal.id);
        let pending_key = format!("{}{}", keys::PENDING_PREFIX, proposal.hospital_id);
        let json = serde_json::to_string(proposal)?;

        let mut conn = self.get_connection().await?;

        for _ in 0..TXN_ATTEMPTS {
            let _: () = redis::cmd("WATCH")
                .arg(&pending_key)
                .query_async(&mut conn)
                .await
                .map_err(|e| db_error(&format!("Redis WATCH error: {}", e)))?;

            let open: Option<String> = conn
                .get(&pending_key)
                .await
                .map_err(|e| db_error(&format!("Redis GET error: {}", e)))?;
            if open.is_some() {
                let _: redis::RedisResult<()> =
                    redis::cmd("UNWATCH").query_async(&mut conn).await;
                return Err(Error::DuplicatePending(proposal.hospital_id.clone()));
            }

            let mut pipe = redis::pipe();
            pipe.atomic()
                .set(&suggestion_key, &json)
                .ignore()
                .set(&pending_key, &proposal.id)
                .ignore()
                .rpush(keys::SUGGESTION_INDEX, &proposal.id)
                .ignore();

            let exec: Option<()> = pipe
                .query_async(&mut conn)
                .await
                .map_err(|e| db_error(&format!("Redis EXEC error: {}", e)))?;
            if exec.is_some() {
                info!(
                    "Stored suggestion {} for hospital {}",
                    proposal.id, proposal.hospital_id
                );
                return Ok(());
            }
            // Another writer touched the pending marker, re-check it
        }

        Err(db_error("Redis transaction kept failing while storing a suggestion"))
    }

    async fn get_proposal(&self, id: &str) -> HoursResult<Option<HoursCorrectionProposal>> {
        let key = format!("{}{}", keys::SUGGESTION_PREFIX, id);
        let mut conn = self.get_connection().await?;

        let data: Option<String> = conn
            .get(&key)
            .await
            .map_err(|e| db_error(&format!("Redis GET error: {}", e)))?;

        match data {
            Some(json) => Ok(Some(serde_json::from_str(&json)?)),
            None => Ok(None),
        }
    }

    async fn list_proposals(&self) -> HoursResult<Vec<HoursCorrectionProposal>> {
        let mut conn = self.get_connection().await?;

        let ids: Vec<String> = conn
            .lrange(keys::SUGGESTION_INDEX, 0, -1)
            .await
            .map_err(|e| db_error(&format!("Redis LRANGE error: {}", e)))?;

        let mut proposals = Vec::with_capacity(ids.len());
        for id in &ids {
            let key = format!("{}{}", keys::SUGGESTION_PREFIX, id);
            let data: Option<String> = conn
                .get(&key)
                .await
                .map_err(|e| db_error(&format!("Redis GET error: {}", e)))?;
            match data {
                Some(json) => proposals.push(serde_json::from_str(&json)?),
                None => warn!("Suggestion {} is indexed but missing", id),
            }
        }

        // Index is in submission order; listings want newest first
        proposals.reverse();
        Ok(proposals)
    }

    async fn complete_review(
        &self,
        id: &str,
        verdict: &ReviewVerdict,
    ) -> HoursResult<HoursCorrectionProposal> {
        let suggestion_key = format!("{}{}", keys::SUGGESTION_PREFIX, id);
        let mut conn = self.get_connection().await?;

        for _ in 0..TXN_ATTEMPTS {
            let _: () = redis::cmd("WATCH")
                .arg(&suggestion_key)
                .query_async(&mut conn)
                .await
                .map_err(|e| db_error(&format!("Redis WATCH error: {}", e)))?;

            let data: Option<String> = conn
                .get(&suggestion_key)
                .await
                .map_err(|e| db_error(&format!("Redis GET error: {}", e)))?;
            let Some(json) = data else {
                let _: redis::RedisResult<()> =
                    redis::cmd("UNWATCH").query_async(&mut conn).await;
                return Err(Error::SuggestionNotFound(id.to_string()));
            };

            let mut proposal: HoursCorrectionProposal = serde_json::from_str(&json)?;
            if proposal.status != ProposalStatus::Pending {
                let _: redis::RedisResult<()> =
                    redis::cmd("UNWATCH").query_async(&mut conn).await;
                return Err(invalid_transition(id, &proposal.status.to_string()));
            }

            proposal.status = verdict.status;
            proposal.reviewed_at = Some(verdict.reviewed_at);
            proposal.reviewed_by = Some(verdict.reviewed_by.clone());
            proposal.reviewer_note = Some(verdict.reviewer_note.clone());

            let updated_json = serde_json::to_string(&proposal)?;
            let pending_key = format!("{}{}", keys::PENDING_PREFIX, proposal.hospital_id);

            let mut pipe = redis::pipe();
            pipe.atomic()
                .set(&suggestion_key, &updated_json)
                .ignore()
                .del(&pending_key)
                .ignore();
            if verdict.apply_schedule {
                let schedule_key = format!("{}{}", keys::SCHEDULE_PREFIX, proposal.hospital_id);
                let schedule_json = serde_json::to_string(&proposal.proposed_schedule)?;
                pipe.set(&schedule_key, schedule_json).ignore();
            }

            let exec: Option<()> = pipe
                .query_async(&mut conn)
                .await
                .map_err(|e| db_error(&format!("Redis EXEC error: {}", e)))?;
            if exec.is_some() {
                info!("Suggestion {} moved to {}", proposal.id, proposal.status);
                return Ok(proposal);
            }
            // Lost the race; the re-read above decides between retry and
            // reporting the transition as invalid
        }

        Err(db_error("Redis transaction kept failing while reviewing a suggestion"))
    }
}
