//! Saved bedtime/wake-up presets.

use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use uuid::Uuid;

use crate::error::{CoreError, Result};
use crate::profile::SleepGoal;
use crate::storage::{keys, load_json, save_json, KeyValueStore};

const FALLBACK_HOURS: f64 = 8.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum TemplateKind {
    #[serde(rename = "Restorative sleep")]
    Restorative,
    #[serde(rename = "Deep sleep")]
    Deep,
    #[serde(rename = "Lucid dreams")]
    Lucid,
    #[serde(rename = "Light sleep")]
    Light,
}

impl From<SleepGoal> for TemplateKind {
    fn from(goal: SleepGoal) -> Self {
        match goal {
            SleepGoal::Restorative => TemplateKind::Restorative,
            SleepGoal::Deep => TemplateKind::Deep,
            SleepGoal::Lucid => TemplateKind::Lucid,
            SleepGoal::Light => TemplateKind::Light,
        }
    }
}

impl From<TemplateKind> for SleepGoal {
    fn from(kind: TemplateKind) -> Self {
        match kind {
            TemplateKind::Restorative => SleepGoal::Restorative,
            TemplateKind::Deep => SleepGoal::Deep,
            TemplateKind::Lucid => SleepGoal::Lucid,
            TemplateKind::Light => SleepGoal::Light,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SleepTemplate {
    pub id: String,
    pub title: String,
    #[serde(rename = "type")]
    pub kind: TemplateKind,
    pub bedtime: String,
    #[serde(rename = "wakeUpTime")]
    pub wake_up_time: String,
    pub hours: f64,
}

/// Input for [`TemplateLibrary::add`]. `hours` is derived from the times
/// when not given.
#[derive(Debug, Clone, PartialEq)]
pub struct NewTemplate {
    pub title: String,
    pub kind: TemplateKind,
    pub bedtime: String,
    pub wake_up_time: String,
    pub hours: Option<f64>,
}

/// Partial update. `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct TemplatePatch {
    pub title: Option<String>,
    #[serde(rename = "type")]
    pub kind: Option<TemplateKind>,
    pub bedtime: Option<String>,
    #[serde(rename = "wakeUpTime")]
    pub wake_up_time: Option<String>,
    pub hours: Option<f64>,
}

impl TemplatePatch {
    fn changes_times(&self) -> bool {
        self.bedtime.is_some() || self.wake_up_time.is_some()
    }
}

/// Leading hour of a time string such as `"10:30 pm"`.
fn leading_hour(time: &str) -> Option<i64> {
    let head = time.trim().split(':').next()?;
    let digits: String = head.chars().take_while(char::is_ascii_digit).collect();
    digits.parse().ok()
}

/// Hours between a bedtime and a wake-up time on a 12-hour dial.
///
/// Only the hour component counts. A `pm` bedtime followed by an `am`
/// wake-up wraps across midnight. Anything non-positive or unparsable
/// yields 8.
pub fn template_hours(bedtime: &str, wake_up_time: &str) -> f64 {
    let (Some(bed), Some(wake)) = (leading_hour(bedtime), leading_hour(wake_up_time)) else {
        return FALLBACK_HOURS;
    };
    let bed_lower = bedtime.to_ascii_lowercase();
    let wake_lower = wake_up_time.to_ascii_lowercase();
    let hours = if bed_lower.contains("pm") && wake_lower.contains("am") {
        12 - bed + wake
    } else {
        wake - bed
    };
    if hours > 0 {
        hours as f64
    } else {
        FALLBACK_HOURS
    }
}

/// Template list persisted under [`keys::TEMPLATES`], in insertion order.
pub struct TemplateLibrary<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> TemplateLibrary<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// # Errors
    /// Returns an error if the template record cannot be read.
    pub fn list(&self) -> Result<Vec<SleepTemplate>> {
        Ok(load_json(self.store, keys::TEMPLATES)?.unwrap_or_default())
    }

    /// # Errors
    /// Returns an error if no template has `id` or storage fails.
    pub fn get(&self, id: &str) -> Result<SleepTemplate> {
        self.list()?
            .into_iter()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))
    }

    /// # Errors
    /// Returns an error if the list cannot be read or written.
    pub fn add(&self, new: NewTemplate) -> Result<SleepTemplate> {
        let hours = new
            .hours
            .unwrap_or_else(|| template_hours(&new.bedtime, &new.wake_up_time));
        let template = SleepTemplate {
            id: Uuid::new_v4().to_string(),
            title: new.title,
            kind: new.kind,
            bedtime: new.bedtime,
            wake_up_time: new.wake_up_time,
            hours,
        };

        let mut templates = self.list()?;
        templates.push(template.clone());
        self.save(&templates)?;
        info!(id = %template.id, title = %template.title, "template added");
        Ok(template)
    }

    /// Merge `patch` into the template with `id`. Hours are recomputed when
    /// the times change and the patch carries no explicit hours.
    ///
    /// # Errors
    /// Returns an error if no template has `id` or storage fails.
    pub fn update(&self, id: &str, patch: TemplatePatch) -> Result<SleepTemplate> {
        let mut templates = self.list()?;
        let template = templates
            .iter_mut()
            .find(|t| t.id == id)
            .ok_or_else(|| not_found(id))?;

        let recompute = patch.changes_times() && patch.hours.is_none();
        if let Some(title) = patch.title {
            template.title = title;
        }
        if let Some(kind) = patch.kind {
            template.kind = kind;
        }
        if let Some(bedtime) = patch.bedtime {
            template.bedtime = bedtime;
        }
        if let Some(wake) = patch.wake_up_time {
            template.wake_up_time = wake;
        }
        if let Some(hours) = patch.hours {
            template.hours = hours;
        } else if recompute {
            template.hours = template_hours(&template.bedtime, &template.wake_up_time);
        }

        let updated = template.clone();
        self.save(&templates)?;
        debug!(id, "template updated");
        Ok(updated)
    }

    /// # Errors
    /// Returns an error if no template has `id` or storage fails.
    pub fn delete(&self, id: &str) -> Result<()> {
        let mut templates = self.list()?;
        let before = templates.len();
        templates.retain(|t| t.id != id);
        if templates.len() == before {
            return Err(not_found(id));
        }
        self.save(&templates)?;
        info!(id, "template deleted");
        Ok(())
    }

    fn save(&self, templates: &[SleepTemplate]) -> Result<()> {
        save_json(self.store, keys::TEMPLATES, templates)?;
        Ok(())
    }
}

fn not_found(id: &str) -> CoreError {
    CoreError::NotFound {
        kind: "template",
        id: id.to_string(),
    }
}
