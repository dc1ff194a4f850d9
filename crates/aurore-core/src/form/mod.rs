mod answers;
mod definition;
mod engine;
pub mod questionnaire;

pub use answers::AnswerMap;
pub use definition::{FormDefinition, FormOption, Question, QuestionKind, Section};
pub use engine::{
    EngineConfig, FormEngine, FormProgress, IgnoredReason, NavigationMode, StepOutcome,
    TransitionPhase, TransitionTiming,
};
