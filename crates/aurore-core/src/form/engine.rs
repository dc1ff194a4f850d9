//! Multi-step form engine.
//!
//! The engine walks a [`FormDefinition`] one section at a time, collecting
//! answers into an [`AnswerMap`] and handing the full map to a completion
//! callback once the last section is confirmed.
//!
//! ## State Transitions
//!
//! ```text
//! 0 -> 1 -> ... -> N-1 -> Submitted
//! ```
//!
//! Section changes may be animated. A fade-out runs before the index moves
//! and a fade-in runs after, but the engine never waits on a timer: the
//! caller reports the end of the fade-out with [`FormEngine::complete_transition`].
//! With zero-length timings every step commits immediately.
//!
//! ## Usage
//!
//! ```ignore
//! let mut engine = FormEngine::new(form).on_submit(|answers| save(answers));
//! engine.set_answer("name", "Ana");
//! engine.advance();              // Transitioning { from: 0, to: 1 }
//! engine.complete_transition();  // Moved { from: 0, to: 1 }
//! ```

use serde::{Deserialize, Serialize};
use tracing::debug;

use super::{AnswerMap, FormDefinition, Section};
use crate::events::FormEvent;

/// Whether the user may step back to an earlier section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum NavigationMode {
    /// Forward only; `back()` is ignored.
    #[default]
    OneWay,
    /// `back()` moves to the previous section.
    BackEnabled,
}

/// Fade durations for section changes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TransitionTiming {
    pub fade_out_ms: u64,
    pub fade_in_ms: u64,
}

impl TransitionTiming {
    /// No animation: every step commits immediately.
    pub fn instant() -> Self {
        Self {
            fade_out_ms: 0,
            fade_in_ms: 0,
        }
    }
}

impl Default for TransitionTiming {
    fn default() -> Self {
        Self {
            fade_out_ms: 300,
            fade_in_ms: 300,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct EngineConfig {
    pub navigation: NavigationMode,
    pub timing: TransitionTiming,
}

impl EngineConfig {
    pub fn instant(navigation: NavigationMode) -> Self {
        Self {
            navigation,
            timing: TransitionTiming::instant(),
        }
    }
}

/// Animation phase of the visible section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "phase", rename_all = "snake_case")]
pub enum TransitionPhase {
    Idle,
    /// The outgoing section is fading; input is closed.
    FadingOut { from: usize, to: usize },
    /// The new section is fading in; it already accepts input.
    FadingIn { section: usize },
}

/// Result of a navigation request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "outcome", rename_all = "snake_case")]
pub enum StepOutcome {
    /// The section index changed.
    Moved { from: usize, to: usize },
    /// A fade-out started; the index changes on `complete_transition`.
    Transitioning { from: usize, to: usize },
    /// The answers were handed to the completion callback.
    Submitted,
    /// Nothing happened.
    Ignored { reason: IgnoredReason },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum IgnoredReason {
    AlreadySubmitted,
    TransitionInProgress,
    NoTransition,
    AtFirstSection,
    BackDisabled,
}

impl StepOutcome {
    fn ignored(reason: IgnoredReason) -> Self {
        StepOutcome::Ignored { reason }
    }
}

/// Snapshot of where the user is in the form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormProgress {
    pub section_index: usize,
    pub section_count: usize,
    pub section_title: String,
    pub answered: usize,
    pub is_last_section: bool,
    pub is_submitted: bool,
}

type SubmitCallback = Box<dyn FnMut(AnswerMap)>;

/// Section-by-section form walker.
pub struct FormEngine {
    form: FormDefinition,
    config: EngineConfig,
    index: usize,
    answers: AnswerMap,
    phase: TransitionPhase,
    submitted: bool,
    events: Vec<FormEvent>,
    on_submit: Option<SubmitCallback>,
}

impl std::fmt::Debug for FormEngine {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FormEngine")
            .field("index", &self.index)
            .field("sections", &self.form.len())
            .field("answers", &self.answers)
            .field("phase", &self.phase)
            .field("submitted", &self.submitted)
            .field("on_submit", &self.on_submit.is_some())
            .finish()
    }
}

impl FormEngine {
    /// Create an engine at section 0 with default (animated, one-way) config.
    pub fn new(form: FormDefinition) -> Self {
        Self::with_config(form, EngineConfig::default())
    }

    pub fn with_config(form: FormDefinition, config: EngineConfig) -> Self {
        Self {
            form,
            config,
            index: 0,
            answers: AnswerMap::new(),
            phase: TransitionPhase::Idle,
            submitted: false,
            events: Vec::new(),
            on_submit: None,
        }
    }

    /// Register the completion callback. It receives a copy of the answers.
    pub fn on_submit<F>(mut self, callback: F) -> Self
    where
        F: FnMut(AnswerMap) + 'static,
    {
        self.on_submit = Some(Box::new(callback));
        self
    }

    // ── Queries ──────────────────────────────────────────────────────

    pub fn section_index(&self) -> usize {
        self.index
    }

    pub fn section_count(&self) -> usize {
        self.form.len()
    }

    pub fn current_section(&self) -> &Section {
        // index is always kept within 0..len and the form is non-empty
        &self.form.sections()[self.index]
    }

    pub fn form(&self) -> &FormDefinition {
        &self.form
    }

    pub fn config(&self) -> &EngineConfig {
        &self.config
    }

    pub fn answers(&self) -> &AnswerMap {
        &self.answers
    }

    pub fn into_answers(self) -> AnswerMap {
        self.answers
    }

    /// What a widget for `question_id` should show: the answer, else the
    /// question's default.
    pub fn value_for(&self, question_id: &str) -> Option<&str> {
        self.answers.get(question_id).or_else(|| {
            self.form
                .question(question_id)
                .and_then(|q| q.default_value.as_deref())
        })
    }

    pub fn is_last_section(&self) -> bool {
        self.index + 1 == self.form.len()
    }

    pub fn is_submitted(&self) -> bool {
        self.submitted
    }

    pub fn phase(&self) -> TransitionPhase {
        self.phase
    }

    /// Whether `set_answer` would currently be accepted.
    pub fn accepts_input(&self) -> bool {
        !self.submitted && !matches!(self.phase, TransitionPhase::FadingOut { .. })
    }

    pub fn progress(&self) -> FormProgress {
        FormProgress {
            section_index: self.index,
            section_count: self.form.len(),
            section_title: self.current_section().title.clone(),
            answered: self.answers.len(),
            is_last_section: self.is_last_section(),
            is_submitted: self.submitted,
        }
    }

    /// Take all events queued since the last drain.
    pub fn drain_events(&mut self) -> Vec<FormEvent> {
        std::mem::take(&mut self.events)
    }

    // ── Commands ─────────────────────────────────────────────────────

    /// Insert or overwrite an answer. Any string is accepted.
    ///
    /// Returns `false` without touching the answers while the outgoing
    /// section is fading out, or after submission.
    pub fn set_answer(&mut self, question_id: &str, value: impl Into<String>) -> bool {
        if !self.accepts_input() {
            debug!(question_id, "answer dropped, section not accepting input");
            return false;
        }
        self.answers.set(question_id, value);
        true
    }

    /// Move to the next section, or submit from the last one.
    ///
    /// Submitting happens once. Later calls return
    /// `Ignored { AlreadySubmitted }` and do not invoke the callback again.
    pub fn advance(&mut self) -> StepOutcome {
        if self.submitted {
            return StepOutcome::ignored(IgnoredReason::AlreadySubmitted);
        }
        match self.phase {
            TransitionPhase::FadingOut { .. } => {
                return StepOutcome::ignored(IgnoredReason::TransitionInProgress)
            }
            TransitionPhase::FadingIn { .. } => {
                self.finish_fade_in();
            }
            TransitionPhase::Idle => {}
        }

        if self.is_last_section() {
            self.submit();
            return StepOutcome::Submitted;
        }
        self.begin_transition(self.index + 1)
    }

    /// Move to the previous section. Only in [`NavigationMode::BackEnabled`].
    pub fn back(&mut self) -> StepOutcome {
        if self.config.navigation == NavigationMode::OneWay {
            return StepOutcome::ignored(IgnoredReason::BackDisabled);
        }
        if self.submitted {
            return StepOutcome::ignored(IgnoredReason::AlreadySubmitted);
        }
        match self.phase {
            TransitionPhase::FadingOut { .. } => {
                return StepOutcome::ignored(IgnoredReason::TransitionInProgress)
            }
            TransitionPhase::FadingIn { .. } => {
                self.finish_fade_in();
            }
            TransitionPhase::Idle => {}
        }
        if self.index == 0 {
            return StepOutcome::ignored(IgnoredReason::AtFirstSection);
        }
        self.begin_transition(self.index - 1)
    }

    /// Report that the fade-out animation finished; commits the index change.
    pub fn complete_transition(&mut self) -> StepOutcome {
        match self.phase {
            TransitionPhase::FadingOut { from, to } => {
                self.commit(to);
                StepOutcome::Moved { from, to }
            }
            _ => StepOutcome::ignored(IgnoredReason::NoTransition),
        }
    }

    /// Report that the fade-in animation finished.
    ///
    /// Returns `false` when no fade-in was running.
    pub fn finish_fade_in(&mut self) -> bool {
        if let TransitionPhase::FadingIn { section } = self.phase {
            self.phase = TransitionPhase::Idle;
            self.events.push(FormEvent::FadeInFinished { section });
            true
        } else {
            false
        }
    }

    fn begin_transition(&mut self, to: usize) -> StepOutcome {
        let from = self.index;
        if self.config.timing.fade_out_ms == 0 {
            self.commit(to);
            return StepOutcome::Moved { from, to };
        }
        self.phase = TransitionPhase::FadingOut { from, to };
        self.events.push(FormEvent::FadeOutStarted {
            from,
            to,
            duration_ms: self.config.timing.fade_out_ms,
        });
        debug!(from, to, "section fade-out started");
        StepOutcome::Transitioning { from, to }
    }

    fn commit(&mut self, to: usize) {
        let from = self.index;
        self.index = to;
        self.events.push(FormEvent::SectionChanged { from, to });
        debug!(from, to, "section changed");

        let fade_in_ms = self.config.timing.fade_in_ms;
        if fade_in_ms == 0 {
            self.phase = TransitionPhase::Idle;
        } else {
            self.phase = TransitionPhase::FadingIn { section: to };
            self.events.push(FormEvent::FadeInStarted {
                section: to,
                duration_ms: fade_in_ms,
            });
        }
    }

    fn submit(&mut self) {
        self.submitted = true;
        let answers = self.answers.clone();
        debug!(answered = answers.len(), "form submitted");
        self.events.push(FormEvent::Submitted {
            answers: answers.clone(),
        });
        if let Some(callback) = self.on_submit.as_mut() {
            callback(answers);
        }
    }
}
