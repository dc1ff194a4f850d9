//! Home screen summary.

use chrono::{Duration, NaiveDate};
use serde::Serialize;

use crate::error::Result;
use crate::profile::UserProfile;
use crate::sleep::{SleepRecord, SleepTracker, TemplateLibrary, TrackingState};
use crate::storage::{keys, load_json, KeyValueStore};

const AVERAGE_WINDOW_DAYS: u32 = 7;

#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Dashboard {
    pub today: NaiveDate,
    pub profile: Option<UserProfile>,
    /// Record filed for today, falling back to yesterday.
    pub last_night: Option<SleepRecord>,
    pub weekly_average: Option<f64>,
    pub tracking: TrackingState,
    pub template_count: usize,
}

impl Dashboard {
    /// # Errors
    /// Returns an error if any record cannot be read or decoded.
    pub fn load<S: KeyValueStore + ?Sized>(store: &S, today: NaiveDate) -> Result<Self> {
        let profile = load_json(store, keys::USER_PROFILE)?;
        let tracker = SleepTracker::new(store);
        let log = tracker.log()?;
        let last_night = log
            .get(today)
            .or_else(|| log.get(today - Duration::days(1)))
            .cloned();
        let templates = TemplateLibrary::new(store).list()?;

        Ok(Self {
            today,
            profile,
            last_night,
            weekly_average: log.average_hours(today, AVERAGE_WINDOW_DAYS),
            tracking: tracker.state()?,
            template_count: templates.len(),
        })
    }

    pub fn greeting_name(&self) -> &str {
        self.profile.as_ref().map_or("there", |p| p.name.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::sleep::{SleepLog, SleepQuality};
    use crate::storage::{save_json, MemoryStore};

    fn day(s: &str) -> NaiveDate {
        s.parse().unwrap()
    }

    #[test]
    fn empty_store_gives_empty_dashboard() {
        let store = MemoryStore::new();
        let dash = Dashboard::load(&store, day("2025-03-05")).unwrap();
        assert!(dash.profile.is_none());
        assert!(dash.last_night.is_none());
        assert_eq!(dash.weekly_average, None);
        assert!(!dash.tracking.is_tracking);
        assert_eq!(dash.greeting_name(), "there");
    }

    #[test]
    fn picks_yesterday_when_today_missing() {
        let store = MemoryStore::new();
        let mut log = SleepLog::new();
        for (date, hours) in [("2025-03-03", 6.0), ("2025-03-04", 8.0)] {
            log.upsert(SleepRecord {
                date: day(date),
                hours,
                quality: SleepQuality::Good,
                bedtime: "23:00".into(),
                wakeup_time: "07:00".into(),
            });
        }
        save_json(&store, keys::SLEEP_LOG, &log).unwrap();

        let dash = Dashboard::load(&store, day("2025-03-05")).unwrap();
        assert_eq!(dash.last_night.unwrap().date, day("2025-03-04"));
        assert_eq!(dash.weekly_average, Some(7.0));
    }
}
