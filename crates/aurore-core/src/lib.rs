//! # Aurore Core Library
//!
//! Core logic for Aurore, a sleep-habit companion. Every operation is
//! available through the standalone `aurore` CLI; any GUI is a thin layer
//! over this crate.
//!
//! ## Architecture
//!
//! - **Form engine**: a section-by-section questionnaire state machine.
//!   Section changes are committed by the engine and only *announced* to
//!   the renderer through [`FormEvent`]s, so animation never blocks state.
//! - **Progress gate**: decides, on every navigation, whether the user is
//!   sent back to the first unfinished onboarding step.
//! - **Progress service**: the only writer of the onboarding flags.
//! - **Sleep**: live tracking, the per-night log and saved templates.
//! - **Storage**: a string key-value store (SQLite or in-memory) holding
//!   JSON records, and TOML configuration.
//!
//! ## Key Components
//!
//! - [`FormEngine`]: questionnaire state machine
//! - [`ProgressGate`]: navigation guard
//! - [`ProgressService`]: welcome, questionnaire and onboarding completion
//! - [`Database`]: on-disk record store
//! - [`Config`]: application configuration

pub mod dashboard;
pub mod error;
pub mod events;
pub mod form;
pub mod gate;
pub mod profile;
pub mod progress;
pub mod sleep;
pub mod storage;

pub use dashboard::Dashboard;
pub use error::{ConfigError, CoreError, StorageError, TrackingError, ValidationError};
pub use events::FormEvent;
pub use form::{AnswerMap, EngineConfig, FormDefinition, FormEngine, NavigationMode, StepOutcome};
pub use gate::{GateDecision, ProgressFlags, ProgressGate, Route};
pub use profile::{ProfileDefaults, ProfileFields, SleepGoal, UserProfile};
pub use progress::ProgressService;
pub use sleep::{SleepLog, SleepQuality, SleepRecord, SleepTemplate, SleepTracker, TemplateLibrary};
pub use storage::{Config, Database, KeyValueStore, MemoryStore};
