//! Accumulated answers of a form.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

/// Question id to answer value.
///
/// Entries are added or overwritten, never removed. Serialises as a flat
/// JSON object, which is also the persisted questionnaire shape.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct AnswerMap(BTreeMap<String, String>);

impl AnswerMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite the value for `question_id`.
    pub fn set(&mut self, question_id: impl Into<String>, value: impl Into<String>) {
        self.0.insert(question_id.into(), value.into());
    }

    pub fn get(&self, question_id: &str) -> Option<&str> {
        self.0.get(question_id).map(String::as_str)
    }

    /// The value for `question_id` unless it is absent or empty.
    pub fn non_empty(&self, question_id: &str) -> Option<&str> {
        self.get(question_id).filter(|v| !v.is_empty())
    }

    pub fn contains(&self, question_id: &str) -> bool {
        self.0.contains_key(question_id)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.0.iter().map(|(k, v)| (k.as_str(), v.as_str()))
    }
}

impl<K: Into<String>, V: Into<String>> FromIterator<(K, V)> for AnswerMap {
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        let mut map = AnswerMap::new();
        for (k, v) in iter {
            map.set(k, v);
        }
        map
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn last_write_wins() {
        let mut answers = AnswerMap::new();
        answers.set("name", "Ana");
        answers.set("name", "Bea");
        assert_eq!(answers.get("name"), Some("Bea"));
        assert_eq!(answers.len(), 1);
    }

    #[test]
    fn empty_string_is_kept_but_not_non_empty() {
        let mut answers = AnswerMap::new();
        answers.set("name", "");
        assert!(answers.contains("name"));
        assert_eq!(answers.get("name"), Some(""));
        assert_eq!(answers.non_empty("name"), None);
    }

    #[test]
    fn serialises_as_flat_object() {
        let answers: AnswerMap = [("bedtime", "10:00 pm"), ("name", "Ana")].into_iter().collect();
        let json = serde_json::to_string(&answers).unwrap();
        assert_eq!(json, r#"{"bedtime":"10:00 pm","name":"Ana"}"#);
    }
}
