//! User profile record and the answer-to-profile mapping.
//!
//! The profile is persisted as one JSON object under
//! [`keys::USER_PROFILE`](crate::storage::keys::USER_PROFILE). Its field
//! names stay camelCase so records written by earlier app versions still
//! load; `schemaVersion` defaults to 1 when missing.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::error::ValidationError;
use crate::form::AnswerMap;

pub const PROFILE_SCHEMA_VERSION: u32 = 1;

/// Question ids the profile is derived from.
pub mod answer_keys {
    pub const NAME: &str = "name";
    pub const BEDTIME: &str = "bedtime";
    pub const WAKEUP_TIME: &str = "wakeupTime";
    pub const SLEEP_GOAL: &str = "sleepGoal";
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SleepGoal {
    #[default]
    Restorative,
    Deep,
    Lucid,
    Light,
}

impl SleepGoal {
    pub const ALL: [SleepGoal; 4] = [
        SleepGoal::Restorative,
        SleepGoal::Deep,
        SleepGoal::Lucid,
        SleepGoal::Light,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            SleepGoal::Restorative => "restorative",
            SleepGoal::Deep => "deep",
            SleepGoal::Lucid => "lucid",
            SleepGoal::Light => "light",
        }
    }

    /// Label used on the home screen.
    pub fn label(self) -> &'static str {
        match self {
            SleepGoal::Restorative => "Restorative sleep",
            SleepGoal::Deep => "Deep sleep",
            SleepGoal::Lucid => "Lucid dreams",
            SleepGoal::Light => "Light sleep",
        }
    }
}

impl fmt::Display for SleepGoal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SleepGoal {
    type Err = ValidationError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SleepGoal::ALL
            .into_iter()
            .find(|g| g.as_str().eq_ignore_ascii_case(s.trim()))
            .ok_or_else(|| ValidationError::InvalidValue {
                field: answer_keys::SLEEP_GOAL.to_string(),
                message: format!("unknown sleep goal '{s}'"),
            })
    }
}

fn default_schema_version() -> u32 {
    PROFILE_SCHEMA_VERSION
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UserProfile {
    #[serde(default = "default_schema_version")]
    pub schema_version: u32,
    pub name: String,
    pub bedtime: String,
    pub wakeup_time: String,
    #[serde(default)]
    pub sleep_goal: SleepGoal,
    #[serde(default)]
    pub has_completed_onboarding: bool,
}

/// Substitutes for fields the user did not answer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProfileDefaults {
    pub name: String,
    pub bedtime: String,
    pub wakeup_time: String,
    pub sleep_goal: SleepGoal,
}

impl Default for ProfileDefaults {
    fn default() -> Self {
        Self {
            name: "User".to_string(),
            bedtime: "10:00 pm".to_string(),
            wakeup_time: "6:00 am".to_string(),
            sleep_goal: SleepGoal::Restorative,
        }
    }
}

impl ProfileDefaults {
    /// A profile made only of defaults, onboarding not completed.
    pub fn profile(&self) -> UserProfile {
        UserProfile {
            schema_version: PROFILE_SCHEMA_VERSION,
            name: self.name.clone(),
            bedtime: self.bedtime.clone(),
            wakeup_time: self.wakeup_time.clone(),
            sleep_goal: self.sleep_goal,
            has_completed_onboarding: false,
        }
    }

    /// Derive a profile from questionnaire answers.
    ///
    /// Missing or empty answers take the default. An unrecognised sleep goal
    /// also falls back to the default goal.
    pub fn from_answers(&self, answers: &AnswerMap) -> UserProfile {
        let text = |key: &str, fallback: &String| {
            answers
                .non_empty(key)
                .map(str::to_string)
                .unwrap_or_else(|| fallback.clone())
        };
        let sleep_goal = match answers.non_empty(answer_keys::SLEEP_GOAL) {
            Some(raw) => raw.parse().unwrap_or_else(|_| {
                tracing::warn!(value = raw, "unrecognised sleep goal, using default");
                self.sleep_goal
            }),
            None => self.sleep_goal,
        };

        UserProfile {
            schema_version: PROFILE_SCHEMA_VERSION,
            name: text(answer_keys::NAME, &self.name),
            bedtime: text(answer_keys::BEDTIME, &self.bedtime),
            wakeup_time: text(answer_keys::WAKEUP_TIME, &self.wakeup_time),
            sleep_goal,
            has_completed_onboarding: false,
        }
    }
}

/// Partial profile update. `None` leaves a field as it is.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ProfileFields {
    pub name: Option<String>,
    pub bedtime: Option<String>,
    pub wakeup_time: Option<String>,
    pub sleep_goal: Option<SleepGoal>,
}

impl ProfileFields {
    pub fn is_empty(&self) -> bool {
        self.name.is_none()
            && self.bedtime.is_none()
            && self.wakeup_time.is_none()
            && self.sleep_goal.is_none()
    }
}

impl UserProfile {
    pub fn apply(&mut self, fields: ProfileFields) {
        if let Some(name) = fields.name {
            self.name = name;
        }
        if let Some(bedtime) = fields.bedtime {
            self.bedtime = bedtime;
        }
        if let Some(wakeup_time) = fields.wakeup_time {
            self.wakeup_time = wakeup_time;
        }
        if let Some(goal) = fields.sleep_goal {
            self.sleep_goal = goal;
        }
    }
}
