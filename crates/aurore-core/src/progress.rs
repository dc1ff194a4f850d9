//! Onboarding progress service.
//!
//! The only writer of the progress flags. Screens call one of the
//! completion actions and navigate to the route it returns; the
//! [`ProgressGate`] reads the same records on the next navigation.

use tracing::{error, info};

use crate::error::{Result, StorageError};
use crate::form::AnswerMap;
use crate::gate::{read_flags, GateDecision, ProgressFlags, ProgressGate, Route};
use crate::profile::{ProfileDefaults, ProfileFields, UserProfile};
use crate::storage::{keys, load_json, save_json, KeyValueStore};

pub struct ProgressService<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
    defaults: ProfileDefaults,
}

impl<'a, S: KeyValueStore + ?Sized> ProgressService<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self::with_defaults(store, ProfileDefaults::default())
    }

    pub fn with_defaults(store: &'a S, defaults: ProfileDefaults) -> Self {
        Self { store, defaults }
    }

    pub fn defaults(&self) -> &ProfileDefaults {
        &self.defaults
    }

    pub fn gate(&self) -> ProgressGate<'a, S> {
        ProgressGate::new(self.store)
    }

    /// Gate check for a route change.
    pub fn check(&self, route: &Route) -> GateDecision {
        self.gate().check(route)
    }

    /// # Errors
    /// Returns the first storage error encountered.
    pub fn flags(&self) -> Result<ProgressFlags> {
        Ok(read_flags(self.store)?)
    }

    /// # Errors
    /// Returns an error if the profile record cannot be read.
    pub fn profile(&self) -> Result<Option<UserProfile>> {
        Ok(load_json(self.store, keys::USER_PROFILE)?)
    }

    /// # Errors
    /// Returns an error if the questionnaire record cannot be read.
    pub fn questionnaire_answers(&self) -> Result<Option<AnswerMap>> {
        Ok(load_json(self.store, keys::QUESTIONNAIRE)?)
    }

    /// Acknowledge the welcome screen. Returns the next route.
    ///
    /// # Errors
    /// Returns an error if the flag cannot be read or written.
    pub fn mark_welcome_seen(&self) -> Result<Route> {
        if self.store.get(keys::SEEN_WELCOME)?.as_deref() != Some("true") {
            self.write(keys::SEEN_WELCOME, |store| store.set(keys::SEEN_WELCOME, "true"))?;
            info!("welcome acknowledged");
        }
        Ok(Route::Questionnaire)
    }

    /// Store the questionnaire answers and the profile derived from them.
    ///
    /// The profile is marked onboarding-complete, so the user goes straight
    /// to the main tabs.
    ///
    /// # Errors
    /// Returns an error if either record cannot be written. The answers
    /// record is written first; a failure on the profile leaves it in place.
    pub fn submit_questionnaire(&self, answers: &AnswerMap) -> Result<Route> {
        self.write(keys::QUESTIONNAIRE, |store| {
            save_json(store, keys::QUESTIONNAIRE, answers)
        })?;

        let mut profile = self.defaults.from_answers(answers);
        profile.has_completed_onboarding = true;
        self.write(keys::USER_PROFILE, |store| {
            save_json(store, keys::USER_PROFILE, &profile)
        })?;

        info!(name = %profile.name, goal = %profile.sleep_goal, "questionnaire submitted");
        Ok(Route::MainTabs)
    }

    /// Merge `fields` into the stored profile and mark onboarding complete.
    ///
    /// Starts from the defaults when no profile exists, or when the stored
    /// one cannot be decoded.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be read or written.
    pub fn complete_onboarding(&self, fields: ProfileFields) -> Result<Route> {
        let mut profile = self.load_profile_or_defaults()?;
        profile.apply(fields);
        profile.has_completed_onboarding = true;
        self.write(keys::USER_PROFILE, |store| {
            save_json(store, keys::USER_PROFILE, &profile)
        })?;
        info!(name = %profile.name, "onboarding completed");
        Ok(Route::Root)
    }

    /// Update profile fields without touching the onboarding flag.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be read or written.
    pub fn update_profile(&self, fields: ProfileFields) -> Result<UserProfile> {
        let mut profile = self.load_profile_or_defaults()?;
        profile.apply(fields);
        self.write(keys::USER_PROFILE, |store| {
            save_json(store, keys::USER_PROFILE, &profile)
        })?;
        Ok(profile)
    }

    /// Log out: clear the onboarding flag, keep the rest of the profile.
    ///
    /// # Errors
    /// Returns an error if the profile cannot be read or written.
    pub fn log_out(&self) -> Result<Route> {
        if let Some(mut profile) = self.profile()? {
            profile.has_completed_onboarding = false;
            self.write(keys::USER_PROFILE, |store| {
                save_json(store, keys::USER_PROFILE, &profile)
            })?;
            info!("logged out");
        }
        Ok(Route::Onboarding)
    }

    fn load_profile_or_defaults(&self) -> Result<UserProfile> {
        match load_json::<UserProfile, _>(self.store, keys::USER_PROFILE) {
            Ok(Some(profile)) => Ok(profile),
            Ok(None) => Ok(self.defaults.profile()),
            Err(StorageError::Malformed { key, source }) => {
                tracing::warn!(%key, error = %source, "replacing malformed profile record");
                Ok(self.defaults.profile())
            }
            Err(e) => Err(e.into()),
        }
    }

    fn write<F>(&self, key: &str, op: F) -> Result<()>
    where
        F: FnOnce(&S) -> std::result::Result<(), StorageError>,
    {
        op(self.store).map_err(|e| {
            error!(key, error = %e, "failed to persist record");
            e.into()
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::profile::SleepGoal;
    use crate::storage::MemoryStore;

    #[test]
    fn welcome_is_idempotent() {
        let store = MemoryStore::new();
        let service = ProgressService::new(&store);
        assert_eq!(service.mark_welcome_seen().unwrap(), Route::Questionnaire);
        assert_eq!(service.mark_welcome_seen().unwrap(), Route::Questionnaire);
        assert_eq!(store.get(keys::SEEN_WELCOME).unwrap().as_deref(), Some("true"));
        assert_eq!(store.keys().unwrap().len(), 1);
    }

    #[test]
    fn submit_persists_answers_verbatim_and_profile() {
        let store = MemoryStore::new();
        let service = ProgressService::new(&store);
        let answers: AnswerMap = [("name", "Ana"), ("bedtime", "22:00"), ("age", "31")]
            .into_iter()
            .collect();

        assert_eq!(service.submit_questionnaire(&answers).unwrap(), Route::MainTabs);

        assert_eq!(service.questionnaire_answers().unwrap().unwrap(), answers);
        let profile = service.profile().unwrap().unwrap();
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.bedtime, "22:00");
        assert_eq!(profile.wakeup_time, "6:00 am");
        assert_eq!(profile.sleep_goal, SleepGoal::Restorative);
        assert!(profile.has_completed_onboarding);
    }

    #[test]
    fn complete_onboarding_merges_into_existing_profile() {
        let store = MemoryStore::new();
        let service = ProgressService::new(&store);
        let answers: AnswerMap = [("name", "Ana"), ("sleepGoal", "deep")].into_iter().collect();
        service.submit_questionnaire(&answers).unwrap();

        let route = service
            .complete_onboarding(ProfileFields {
                bedtime: Some("11:00 pm".into()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(route, Route::Root);

        let profile = service.profile().unwrap().unwrap();
        assert_eq!(profile.name, "Ana");
        assert_eq!(profile.bedtime, "11:00 pm");
        assert_eq!(profile.sleep_goal, SleepGoal::Deep);
        assert!(profile.has_completed_onboarding);
    }

    #[test]
    fn complete_onboarding_without_profile_uses_defaults() {
        let store = MemoryStore::new();
        let service = ProgressService::new(&store);
        service
            .complete_onboarding(ProfileFields {
                name: Some("Bea".into()),
                ..Default::default()
            })
            .unwrap();
        let profile = service.profile().unwrap().unwrap();
        assert_eq!(profile.name, "Bea");
        assert_eq!(profile.wakeup_time, "6:00 am");
    }

    #[test]
    fn log_out_clears_only_onboarding_flag() {
        let store = MemoryStore::new();
        let service = ProgressService::new(&store);
        service.mark_welcome_seen().unwrap();
        service
            .submit_questionnaire(&[("name", "Ana")].into_iter().collect::<AnswerMap>())
            .unwrap();

        assert_eq!(service.log_out().unwrap(), Route::Onboarding);

        let flags = service.flags().unwrap();
        assert!(flags.seen_welcome);
        assert!(flags.questionnaire_completed);
        assert!(!flags.onboarding_completed);
        assert_eq!(service.profile().unwrap().unwrap().name, "Ana");
        assert_eq!(
            service.check(&Route::Root),
            GateDecision::Redirect(Route::Onboarding)
        );
    }

    #[test]
    fn full_flow_reaches_main_tabs() {
        let store = MemoryStore::new();
        let service = ProgressService::new(&store);
        assert_eq!(service.check(&Route::Root), GateDecision::Redirect(Route::Welcome));

        let next = service.mark_welcome_seen().unwrap();
        assert_eq!(service.check(&next), GateDecision::Allow);
        assert_eq!(
            service.check(&Route::Root),
            GateDecision::Redirect(Route::Questionnaire)
        );

        let next = service.submit_questionnaire(&AnswerMap::new()).unwrap();
        assert_eq!(service.check(&next), GateDecision::Allow);
        assert_eq!(service.check(&Route::Root), GateDecision::Redirect(Route::MainTabs));
    }
}
