//! Live sleep session: start at bedtime, stop on waking.
//!
//! Times are local wall-clock times. The record is filed under the date
//! the session stopped on.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::info;

use super::{QualityThresholds, SleepLog, SleepRecord};
use crate::error::{Result, TrackingError};
use crate::storage::{keys, load_json, save_json, KeyValueStore};

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TrackingState {
    pub is_tracking: bool,
    pub start_time: Option<NaiveDateTime>,
}

impl TrackingState {
    /// Start time of a running session.
    pub fn running_since(&self) -> Option<NaiveDateTime> {
        if self.is_tracking {
            self.start_time
        } else {
            None
        }
    }
}

pub struct SleepTracker<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    thresholds: QualityThresholds,
}

impl<'a, S: KeyValueStore + ?Sized> SleepTracker<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_thresholds(store, QualityThresholds::default())
    }

    pub fn with_thresholds(store: &'a S, thresholds: QualityThresholds) -> Self {
        Self { store, thresholds }
    }

    /// # Errors
    /// Returns an error if the tracking record cannot be read.
    pub fn state(&self) -> Result<TrackingState> {
        Ok(load_json(self.store, keys::SLEEP_TRACKING)?.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error if the sleep log cannot be read.
    pub fn log(&self) -> Result<SleepLog> {
        Ok(load_json(self.store, keys::SLEEP_LOG)?.unwrap_or_default())
    }

    /// Begin a session at `now`.
    ///
    /// # Errors
    /// Fails if a session is already running or storage fails.
    pub fn start(&self, now: NaiveDateTime) -> Result<TrackingState> {
        if let Some(since) = self.state()?.running_since() {
            return Err(TrackingError::AlreadyTracking { since }.into());
        }
        let state = TrackingState {
            is_tracking: true,
            start_time: Some(now),
        };
        save_json(self.store, keys::SLEEP_TRACKING, &state)?;
        info!(start = %now, "sleep tracking started");
        Ok(state)
    }

    /// End the running session at `now`, file a record and clear the state.
    ///
    /// Hours are rounded to one decimal before grading.
    ///
    /// # Errors
    /// Fails if no session is running, `now` precedes the start, or storage
    /// fails.
    pub fn stop(&self, now: NaiveDateTime) -> Result<SleepRecord> {
        let start = self
            .state()?
            .running_since()
            .ok_or(TrackingError::NotTracking)?;
        if now < start {
            return Err(TrackingError::StopBeforeStart { start, stop: now }.into());
        }

        let seconds = (now - start).num_seconds() as f64;
        let hours = (seconds / 3600.0 * 10.0).round() / 10.0;
        let record = SleepRecord {
            date: now.date(),
            hours,
            quality: self.thresholds.classify(hours),
            bedtime: start.format("%H:%M").to_string(),
            wakeup_time: now.format("%H:%M").to_string(),
        };

        let mut log = self.log()?;
        log.upsert(record.clone());
        save_json(self.store, keys::SLEEP_LOG, &log)?;
        save_json(self.store, keys::SLEEP_TRACKING, &TrackingState::default())?;

        info!(date = %record.date, hours = record.hours, quality = %record.quality, "sleep tracking stopped");
        Ok(record)
    }
}
