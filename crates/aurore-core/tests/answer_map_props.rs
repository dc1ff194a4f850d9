//! Property-based tests for answer collection.
//!
//! The final answers depend only on the last value written per question,
//! whatever order the questions were answered in.

use std::collections::BTreeMap;

use proptest::prelude::*;

use aurore_core::form::{EngineConfig, FormDefinition, FormEngine, NavigationMode, Question, Section};
use aurore_core::AnswerMap;

const IDS: [&str; 4] = ["name", "age", "bedtime", "sleepGoal"];

/// Strategy for a sequence of (question index, value) writes.
fn writes() -> impl Strategy<Value = Vec<(usize, String)>> {
    prop::collection::vec((0..IDS.len(), "[a-z0-9 ]{0,8}"), 0..24)
}

fn single_section_form() -> FormDefinition {
    let questions = IDS.iter().map(|id| Question::input(*id, *id)).collect();
    FormDefinition::new(vec![Section::new("All", questions)]).unwrap()
}

fn expected(writes: &[(usize, String)]) -> BTreeMap<String, String> {
    let mut last = BTreeMap::new();
    for (idx, value) in writes {
        last.insert(IDS[*idx].to_string(), value.clone());
    }
    last
}

proptest! {
    /// Property: the map holds exactly the last write per key.
    #[test]
    fn prop_answer_map_is_last_write_wins(writes in writes()) {
        let mut answers = AnswerMap::new();
        for (idx, value) in &writes {
            answers.set(IDS[*idx], value.clone());
        }

        let want = expected(&writes);
        prop_assert_eq!(answers.len(), want.len());
        for (key, value) in &want {
            prop_assert_eq!(answers.get(key), Some(value.as_str()));
        }
    }

    /// Property: reordering writes to different keys does not change the
    /// result, as long as each key's own writes keep their order.
    #[test]
    fn prop_interleaving_across_keys_is_irrelevant(writes in writes()) {
        let mut by_key = AnswerMap::new();
        for id in IDS {
            for (idx, value) in writes.iter().filter(|(i, _)| IDS[*i] == id) {
                by_key.set(IDS[*idx], value.clone());
            }
        }

        let in_order: AnswerMap = writes
            .iter()
            .map(|(idx, value)| (IDS[*idx], value.clone()))
            .collect();

        prop_assert_eq!(by_key, in_order);
    }

    /// Property: the engine hands the callback the same map.
    #[test]
    fn prop_engine_submits_last_values(writes in writes()) {
        let mut engine = FormEngine::with_config(
            single_section_form(),
            EngineConfig::instant(NavigationMode::OneWay),
        );
        for (idx, value) in &writes {
            prop_assert!(engine.set_answer(IDS[*idx], value.clone()));
        }
        engine.advance();
        prop_assert!(engine.is_submitted());

        let got: BTreeMap<String, String> = engine
            .answers()
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        prop_assert_eq!(got, expected(&writes));
    }
}
