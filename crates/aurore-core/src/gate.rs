//! Navigation gate for the onboarding flow.
//!
//! On every route change the gate reads the persisted progress flags, in
//! order, and sends the user to the first step they have not finished:
//!
//! ```text
//! seen welcome? -> questionnaire done? -> onboarding done? -> allow
//! ```
//!
//! Reads stop at the first unmet flag. A failed read counts as unmet and
//! lands on the welcome screen.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::form::AnswerMap;
use crate::profile::UserProfile;
use crate::storage::{keys, load_json, KeyValueStore};

/// A screen the app can navigate to.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Route {
    /// `/`, the entry point.
    Root,
    Welcome,
    Questionnaire,
    Onboarding,
    /// `/(tabs)`, the main tabbed interface.
    MainTabs,
    /// A screen inside the tabs, e.g. `/(tabs)/calendar`.
    Tab(String),
    /// Anything else.
    Other(String),
}

impl Route {
    /// Parse a path. Leading and trailing slashes are ignored.
    pub fn parse(path: &str) -> Self {
        let trimmed = path.trim().trim_matches('/');
        match trimmed {
            "" | "index" => Route::Root,
            "welcome" => Route::Welcome,
            "questionnaire" => Route::Questionnaire,
            "onboarding" => Route::Onboarding,
            "(tabs)" | "(tabs)/index" => Route::MainTabs,
            _ => match trimmed.strip_prefix("(tabs)/") {
                Some(tab) => Route::Tab(tab.to_string()),
                None => Route::Other(trimmed.to_string()),
            },
        }
    }

    pub fn path(&self) -> String {
        match self {
            Route::Root => "/".to_string(),
            Route::Welcome => "/welcome".to_string(),
            Route::Questionnaire => "/questionnaire".to_string(),
            Route::Onboarding => "/onboarding".to_string(),
            Route::MainTabs => "/(tabs)".to_string(),
            Route::Tab(tab) => format!("/(tabs)/{tab}"),
            Route::Other(path) => format!("/{path}"),
        }
    }

    /// Onboarding screens are always reachable.
    pub fn is_exempt(&self) -> bool {
        matches!(self, Route::Welcome | Route::Questionnaire | Route::Onboarding)
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.path())
    }
}

/// Snapshot of the three persisted progress flags.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ProgressFlags {
    pub seen_welcome: bool,
    pub questionnaire_completed: bool,
    pub onboarding_completed: bool,
}

impl ProgressFlags {
    pub fn all_done() -> Self {
        Self {
            seen_welcome: true,
            questionnaire_completed: true,
            onboarding_completed: true,
        }
    }
}

/// What the navigator should do.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "decision", content = "route", rename_all = "snake_case")]
pub enum GateDecision {
    /// Stay on the requested route.
    Allow,
    Redirect(Route),
}

impl GateDecision {
    pub fn redirect_target(&self) -> Option<&Route> {
        match self {
            GateDecision::Allow => None,
            GateDecision::Redirect(route) => Some(route),
        }
    }
}

/// Decide a route against a known flag snapshot.
pub fn decide(route: &Route, flags: ProgressFlags) -> GateDecision {
    if route.is_exempt() {
        return GateDecision::Allow;
    }
    if !flags.seen_welcome {
        return GateDecision::Redirect(Route::Welcome);
    }
    if !flags.questionnaire_completed {
        return GateDecision::Redirect(Route::Questionnaire);
    }
    if !flags.onboarding_completed {
        return GateDecision::Redirect(Route::Onboarding);
    }
    if *route == Route::Root {
        return GateDecision::Redirect(Route::MainTabs);
    }
    GateDecision::Allow
}

pub(crate) fn read_seen_welcome<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<bool, StorageError> {
    Ok(store.get(keys::SEEN_WELCOME)?.as_deref() == Some("true"))
}

pub(crate) fn read_questionnaire_completed<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<bool, StorageError> {
    Ok(load_json::<AnswerMap, _>(store, keys::QUESTIONNAIRE)?.is_some())
}

pub(crate) fn read_onboarding_completed<S: KeyValueStore + ?Sized>(
    store: &S,
) -> Result<bool, StorageError> {
    Ok(load_json::<UserProfile, _>(store, keys::USER_PROFILE)?
        .is_some_and(|p| p.has_completed_onboarding))
}

/// Read all three flags. Unlike [`ProgressGate::check`] this reads every
/// flag and reports failures to the caller.
///
/// # Errors
/// Returns the first storage error encountered.
pub fn read_flags<S: KeyValueStore + ?Sized>(store: &S) -> Result<ProgressFlags, StorageError> {
    Ok(ProgressFlags {
        seen_welcome: read_seen_welcome(store)?,
        questionnaire_completed: read_questionnaire_completed(store)?,
        onboarding_completed: read_onboarding_completed(store)?,
    })
}

/// Route guard over a record store. Holds no state between checks; every
/// check re-reads the store.
pub struct ProgressGate<'a, S: KeyValueStore + ?Sized> {
    store: &'a S,
}

impl<'a, S: KeyValueStore + ?Sized> ProgressGate<'a, S> {
    pub fn new(store: &'a S) -> Self {
        Self { store }
    }

    /// Decide whether `route` may be shown.
    ///
    /// Never fails: a storage error redirects to the welcome screen.
    pub fn check(&self, route: &Route) -> GateDecision {
        if route.is_exempt() {
            return GateDecision::Allow;
        }

        let decision = self.check_flags(route).unwrap_or_else(|err| {
            warn!(route = %route, error = %err, "progress read failed, redirecting to welcome");
            GateDecision::Redirect(Route::Welcome)
        });
        debug!(route = %route, ?decision, "gate decision");
        decision
    }

    /// Parse `path` and [`check`](Self::check) it.
    pub fn check_path(&self, path: &str) -> GateDecision {
        self.check(&Route::parse(path))
    }

    fn check_flags(&self, route: &Route) -> Result<GateDecision, StorageError> {
        let mut flags = ProgressFlags::default();

        flags.seen_welcome = read_seen_welcome(self.store)?;
        if !flags.seen_welcome {
            return Ok(decide(route, flags));
        }
        flags.questionnaire_completed = read_questionnaire_completed(self.store)?;
        if !flags.questionnaire_completed {
            return Ok(decide(route, flags));
        }
        flags.onboarding_completed = read_onboarding_completed(self.store)?;
        Ok(decide(route, flags))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::MemoryStore;

    #[test]
    fn route_parse_handles_slashes_and_tabs() {
        assert_eq!(Route::parse("/"), Route::Root);
        assert_eq!(Route::parse(""), Route::Root);
        assert_eq!(Route::parse("/welcome/"), Route::Welcome);
        assert_eq!(Route::parse("questionnaire"), Route::Questionnaire);
        assert_eq!(Route::parse("/(tabs)"), Route::MainTabs);
        assert_eq!(Route::parse("/(tabs)/calendar"), Route::Tab("calendar".into()));
        assert_eq!(Route::parse("/profile"), Route::Other("profile".into()));
    }

    #[test]
    fn route_path_round_trips_through_parse() {
        for route in [
            Route::Root,
            Route::Welcome,
            Route::Questionnaire,
            Route::Onboarding,
            Route::MainTabs,
            Route::Tab("sleep".into()),
            Route::Other("templates".into()),
        ] {
            assert_eq!(Route::parse(&route.path()), route);
        }
    }

    #[test]
    fn nothing_done_redirects_to_welcome() {
        let decision = decide(&Route::parse("/profile"), ProgressFlags::default());
        assert_eq!(decision, GateDecision::Redirect(Route::Welcome));
    }

    #[test]
    fn exempt_route_is_never_redirected() {
        let flags = ProgressFlags {
            seen_welcome: true,
            ..Default::default()
        };
        assert_eq!(decide(&Route::Welcome, flags), GateDecision::Allow);
        assert_eq!(decide(&Route::Onboarding, ProgressFlags::default()), GateDecision::Allow);
    }

    #[test]
    fn first_unmet_flag_wins() {
        let flags = ProgressFlags {
            seen_welcome: true,
            questionnaire_completed: false,
            onboarding_completed: true,
        };
        assert_eq!(
            decide(&Route::MainTabs, flags),
            GateDecision::Redirect(Route::Questionnaire)
        );

        let flags = ProgressFlags {
            seen_welcome: true,
            questionnaire_completed: true,
            onboarding_completed: false,
        };
        assert_eq!(
            decide(&Route::Tab("calendar".into()), flags),
            GateDecision::Redirect(Route::Onboarding)
        );
    }

    #[test]
    fn finished_user_at_root_goes_to_tabs() {
        assert_eq!(
            decide(&Route::Root, ProgressFlags::all_done()),
            GateDecision::Redirect(Route::MainTabs)
        );
        assert_eq!(decide(&Route::MainTabs, ProgressFlags::all_done()), GateDecision::Allow);
        assert_eq!(
            decide(&Route::Other("templates".into()), ProgressFlags::all_done()),
            GateDecision::Allow
        );
    }

    #[test]
    fn gate_reads_store_each_time() {
        let store = MemoryStore::new();
        let gate = ProgressGate::new(&store);
        assert_eq!(gate.check(&Route::Root), GateDecision::Redirect(Route::Welcome));

        store.set(keys::SEEN_WELCOME, "true").unwrap();
        assert_eq!(
            gate.check(&Route::Root),
            GateDecision::Redirect(Route::Questionnaire)
        );
    }

    #[test]
    fn seen_welcome_requires_literal_true() {
        let store = MemoryStore::new();
        store.set(keys::SEEN_WELCOME, "yes").unwrap();
        assert!(!read_seen_welcome(&store).unwrap());
    }

    #[test]
    fn malformed_profile_redirects_to_welcome() {
        let store = MemoryStore::new();
        store.set(keys::SEEN_WELCOME, "true").unwrap();
        store.set(keys::QUESTIONNAIRE, "{}").unwrap();
        store.set(keys::USER_PROFILE, "{broken").unwrap();
        assert_eq!(
            ProgressGate::new(&store).check_path("/(tabs)"),
            GateDecision::Redirect(Route::Welcome)
        );
    }
}
