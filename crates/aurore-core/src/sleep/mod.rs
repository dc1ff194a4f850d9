//! Sleep log, live tracking and sleep templates.

mod template;
mod tracker;

pub use template::{template_hours, NewTemplate, SleepTemplate, TemplateKind, TemplateLibrary, TemplatePatch};
pub use tracker::{SleepTracker, TrackingState};

use chrono::{Datelike, Duration, NaiveDate};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub enum SleepQuality {
    Poor,
    Fair,
    Good,
    Excellent,
}

impl fmt::Display for SleepQuality {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SleepQuality::Poor => "Poor",
            SleepQuality::Fair => "Fair",
            SleepQuality::Good => "Good",
            SleepQuality::Excellent => "Excellent",
        };
        f.write_str(s)
    }
}

/// Minimum hours for each quality grade. Anything below `fair` is poor.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct QualityThresholds {
    pub excellent: f64,
    pub good: f64,
    pub fair: f64,
}

impl Default for QualityThresholds {
    fn default() -> Self {
        Self {
            excellent: 8.0,
            good: 7.0,
            fair: 6.0,
        }
    }
}

impl QualityThresholds {
    pub fn classify(&self, hours: f64) -> SleepQuality {
        if hours >= self.excellent {
            SleepQuality::Excellent
        } else if hours >= self.good {
            SleepQuality::Good
        } else if hours >= self.fair {
            SleepQuality::Fair
        } else {
            SleepQuality::Poor
        }
    }
}

/// One night of sleep.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepRecord {
    pub date: NaiveDate,
    pub hours: f64,
    pub quality: SleepQuality,
    pub bedtime: String,
    pub wakeup_time: String,
}

/// Sleep records keyed by date. At most one record per date; a later
/// record for the same date replaces the earlier one.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SleepLog(BTreeMap<NaiveDate, SleepRecord>);

impl SleepLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn upsert(&mut self, record: SleepRecord) {
        self.0.insert(record.date, record);
    }

    pub fn get(&self, date: NaiveDate) -> Option<&SleepRecord> {
        self.0.get(&date)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn latest(&self) -> Option<&SleepRecord> {
        self.0.values().next_back()
    }

    pub fn iter(&self) -> impl Iterator<Item = &SleepRecord> {
        self.0.values()
    }

    /// Records of one calendar month, oldest first.
    pub fn month(&self, year: i32, month: u32) -> Vec<&SleepRecord> {
        self.0
            .values()
            .filter(|r| r.date.year() == year && r.date.month() == month)
            .collect()
    }

    /// Mean hours over the `days` days ending at `until` (inclusive).
    /// `None` when no record falls in the window.
    pub fn average_hours(&self, until: NaiveDate, days: u32) -> Option<f64> {
        if days == 0 {
            return None;
        }
        let from = until - Duration::days(i64::from(days) - 1);
        let hours: Vec<f64> = self.0.range(from..=until).map(|(_, r)| r.hours).collect();
        if hours.is_empty() {
            None
        } else {
            Some(hours.iter().sum::<f64>() / hours.len() as f64)
        }
    }
}
