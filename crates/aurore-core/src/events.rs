use serde::{Deserialize, Serialize};

use crate::form::AnswerMap;

/// Every state change of a [`FormEngine`](crate::form::FormEngine) produces
/// an event. Renderers drain them to drive fade animations; the engine never
/// waits on the renderer to change its own state.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type")]
pub enum FormEvent {
    /// The outgoing section started fading out.
    FadeOutStarted {
        from: usize,
        to: usize,
        duration_ms: u64,
    },
    /// The section index changed. This is the authoritative transition.
    SectionChanged { from: usize, to: usize },
    /// The incoming section started fading in.
    FadeInStarted { section: usize, duration_ms: u64 },
    /// The incoming section is fully visible.
    FadeInFinished { section: usize },
    /// The last section was confirmed and the answers handed off.
    Submitted { answers: AnswerMap },
}
