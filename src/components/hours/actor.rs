use crate::components::hours::models::{OpenStatus, ScheduleDoc, TimeField};
use crate::components::hours::status::{derive_status, MINUTES_PER_DAY};
use crate::config::Config;
use crate::db::HoursDb;
use crate::error::{component_error, HoursResult};
use crate::utils::time;
use chrono::NaiveDateTime;
use std::sync::Arc;
use tokio::sync::{mpsc, RwLock};
use tracing::{info, warn};

/// The Hours actor that processes messages
pub struct HoursActor {
    _config: Arc<RwLock<Config>>,
    db: Arc<dyn HoursDb>,
    command_rx: mpsc::Receiver<HoursCommand>,
}

/// Commands that can be sent to the Hours actor
pub enum HoursCommand {
    GetSchedule(String, mpsc::Sender<HoursResult<Option<ScheduleDoc>>>),
    StatusAt(String, NaiveDateTime, mpsc::Sender<HoursResult<OpenStatus>>),
    Shutdown,
}

/// Handle for communicating with the Hours actor
#[derive(Clone)]
pub struct HoursActorHandle {
    command_tx: mpsc::Sender<HoursCommand>,
}

impl HoursActorHandle {
    /// Get the stored schedule document for a hospital
    pub async fn get_schedule(
        &self,
        hospital_id: impl Into<String>,
    ) -> HoursResult<Option<ScheduleDoc>> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(HoursCommand::GetSchedule(hospital_id.into(), response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Derive a hospital's open status at the given local time
    pub async fn status_at(
        &self,
        hospital_id: impl Into<String>,
        at: NaiveDateTime,
    ) -> HoursResult<OpenStatus> {
        let (response_tx, mut response_rx) = mpsc::channel(1);
        self.command_tx
            .send(HoursCommand::StatusAt(hospital_id.into(), at, response_tx))
            .await
            .map_err(|e| component_error(&format!("Actor mailbox error: {}", e)))?;

        response_rx
            .recv()
            .await
            .ok_or_else(|| component_error("Response channel closed"))?
    }

    /// Shutdown the actor
    pub async fn shutdown(&self) -> HoursResult<()> {
        let _ = self.command_tx.send(HoursCommand::Shutdown).await;
        Ok(())
    }
}

impl HoursActor {
    /// Create a new actor and return its handle
    pub fn new(config: Arc<RwLock<Config>>, db: Arc<dyn HoursDb>) -> (Self, HoursActorHandle) {
        let (command_tx, command_rx) = mpsc::channel(32);

        let actor = Self {
            _config: config,
            db,
            command_rx,
        };

        let handle = HoursActorHandle { command_tx };

        (actor, handle)
    }

    /// Start the actor's processing loop
    pub async fn run(&mut self) {
        info!("Hours actor started");

        // Process commands
        while let Some(cmd) = self.command_rx.recv().await {
            match cmd {
                HoursCommand::GetSchedule(hospital_id, response_tx) => {
                    let result = self.db.get_schedule(&hospital_id).await;
                    let _ = response_tx.send(result).await;
                }
                HoursCommand::StatusAt(hospital_id, at, response_tx) => {
                    let result = self.status_at(&hospital_id, at).await;
                    let _ = response_tx.send(result).await;
                }
                HoursCommand::Shutdown => {
                    info!("Hours actor shutting down");
                    break;
                }
            }
        }

        info!("Hours actor shut down");
    }

    /// Load a hospital's schedule and derive its status at the given time
    ///
    /// A hospital with no stored document gets an empty schedule, which
    /// derives to `Unknown` rather than an error.
    async fn status_at(&self, hospital_id: &str, at: NaiveDateTime) -> HoursResult<OpenStatus> {
        let doc = self.db.get_schedule(hospital_id).await?.unwrap_or_default();
        let schedule = doc.normalize();

        let unusable = doc
            .day_pairs()
            .iter()
            .zip(schedule.weekdays.iter())
            .filter(|((start, end), slot)| match slot {
                None => has_time_value(start) || has_time_value(end),
                Some(slot) => slot.open >= MINUTES_PER_DAY || slot.close >= MINUTES_PER_DAY,
            })
            .count();
        if unusable > 0 {
            warn!(
                "Hospital {} has {} day(s) with unusable time data",
                hospital_id, unusable
            );
        }

        Ok(derive_status(&schedule, at))
    }
}

/// Whether a raw field carries an actual time value, as opposed to being
/// absent or one of the "no data" sentinels
fn has_time_value(field: &Option<TimeField>) -> bool {
    match field {
        Some(TimeField::Num(_)) => true,
        Some(TimeField::Text(s)) => !time::is_no_data(s),
        None => false,
    }
}
