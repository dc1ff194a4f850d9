//! Form structure: sections of questions.
//!
//! The serialised shape matches the section literals of the mobile app
//! (`type`, `placeholder`, `options`, `defaultValue`), so a form can be
//! loaded from a JSON file as well as built in code.

use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashSet};

use crate::error::ValidationError;

/// How a question collects its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum QuestionKind {
    /// Free text.
    Input,
    /// Single selection from a list.
    Dropdown,
    /// Exclusive choice among listed options.
    Radio,
}

impl QuestionKind {
    pub fn requires_options(self) -> bool {
        matches!(self, QuestionKind::Dropdown | QuestionKind::Radio)
    }
}

/// A selectable option.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FormOption {
    pub label: String,
    pub value: String,
}

impl FormOption {
    pub fn new(label: impl Into<String>, value: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            value: value.into(),
        }
    }
}

/// One form field.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Question {
    pub id: String,
    pub label: String,
    #[serde(rename = "type")]
    pub kind: QuestionKind,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub placeholder: Option<String>,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub options: Vec<FormOption>,
    /// For choice questions this is what the widget shows before the user
    /// picks anything. It is not written into the answers.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default_value: Option<String>,
}

impl Question {
    pub fn input(id: impl Into<String>, label: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            label: label.into(),
            kind: QuestionKind::Input,
            placeholder: None,
            options: Vec::new(),
            default_value: None,
        }
    }

    pub fn dropdown(
        id: impl Into<String>,
        label: impl Into<String>,
        options: Vec<FormOption>,
    ) -> Self {
        Self {
            kind: QuestionKind::Dropdown,
            options,
            ..Self::input(id, label)
        }
    }

    pub fn radio(id: impl Into<String>, label: impl Into<String>, options: Vec<FormOption>) -> Self {
        Self {
            kind: QuestionKind::Radio,
            options,
            ..Self::input(id, label)
        }
    }

    pub fn with_placeholder(mut self, placeholder: impl Into<String>) -> Self {
        self.placeholder = Some(placeholder.into());
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    /// The option whose value equals `value`, if any.
    pub fn option_for(&self, value: &str) -> Option<&FormOption> {
        self.options.iter().find(|o| o.value == value)
    }

    /// Check the kind/options invariant.
    ///
    /// # Errors
    /// Returns an error for a blank id or a choice question without options.
    pub fn validate(&self, section: &str) -> Result<(), ValidationError> {
        if self.id.trim().is_empty() {
            return Err(ValidationError::EmptyQuestionId {
                section: section.to_string(),
            });
        }
        if self.kind.requires_options() && self.options.is_empty() {
            return Err(ValidationError::MissingOptions {
                id: self.id.clone(),
            });
        }
        Ok(())
    }
}

/// One page of a form.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Section {
    pub title: String,
    pub questions: Vec<Question>,
}

impl Section {
    pub fn new(title: impl Into<String>, questions: Vec<Question>) -> Self {
        Self {
            title: title.into(),
            questions,
        }
    }

    /// # Errors
    /// Returns the first invalid question or a duplicate id within the section.
    pub fn validate(&self) -> Result<(), ValidationError> {
        let mut seen = HashSet::new();
        for question in &self.questions {
            question.validate(&self.title)?;
            if !seen.insert(question.id.as_str()) {
                return Err(ValidationError::DuplicateQuestion {
                    section: self.title.clone(),
                    id: question.id.clone(),
                });
            }
        }
        Ok(())
    }
}

/// A validated, non-empty list of sections.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct FormDefinition {
    sections: Vec<Section>,
}

impl FormDefinition {
    /// # Errors
    /// Returns an error if there are no sections or any section is invalid.
    pub fn new(sections: Vec<Section>) -> Result<Self, ValidationError> {
        if sections.is_empty() {
            return Err(ValidationError::EmptyForm);
        }
        for section in &sections {
            section.validate()?;
        }
        Ok(Self { sections })
    }

    /// Parse and validate a JSON array of sections.
    ///
    /// # Errors
    /// Returns an error if the JSON does not match or validation fails.
    pub fn from_json(json: &str) -> crate::error::Result<Self> {
        let sections: Vec<Section> = serde_json::from_str(json)?;
        Ok(Self::new(sections)?)
    }

    pub fn sections(&self) -> &[Section] {
        &self.sections
    }

    pub fn section(&self, index: usize) -> Option<&Section> {
        self.sections.get(index)
    }

    pub fn len(&self) -> usize {
        self.sections.len()
    }

    /// Always false; kept for clippy's `len_without_is_empty`.
    pub fn is_empty(&self) -> bool {
        self.sections.is_empty()
    }

    /// Look a question up by id across all sections (first match).
    pub fn question(&self, id: &str) -> Option<&Question> {
        self.sections
            .iter()
            .flat_map(|s| s.questions.iter())
            .find(|q| q.id == id)
    }

    /// Question ids that appear in more than one section.
    ///
    /// These are legal but share one slot in the answers, so the later
    /// section overwrites the earlier one.
    pub fn duplicate_ids(&self) -> Vec<String> {
        let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
        for question in self.sections.iter().flat_map(|s| s.questions.iter()) {
            *counts.entry(question.id.as_str()).or_default() += 1;
        }
        counts
            .into_iter()
            .filter(|(_, n)| *n > 1)
            .map(|(id, _)| id.to_string())
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn times() -> Vec<FormOption> {
        vec![
            FormOption::new("9:00 PM", "9:00 pm"),
            FormOption::new("10:00 PM", "10:00 pm"),
        ]
    }

    #[test]
    fn empty_form_is_rejected() {
        assert_eq!(FormDefinition::new(vec![]), Err(ValidationError::EmptyForm));
    }

    #[test]
    fn choice_question_needs_options() {
        let section = Section::new("Habits", vec![Question::dropdown("bedtime", "Bedtime", vec![])]);
        assert_eq!(
            FormDefinition::new(vec![section]),
            Err(ValidationError::MissingOptions {
                id: "bedtime".into()
            })
        );
    }

    #[test]
    fn input_question_needs_no_options() {
        let section = Section::new("Info", vec![Question::input("name", "Name")]);
        assert!(FormDefinition::new(vec![section]).is_ok());
    }

    #[test]
    fn duplicate_id_within_section_is_rejected() {
        let section = Section::new(
            "Info",
            vec![Question::input("name", "Name"), Question::input("name", "Again")],
        );
        assert!(matches!(
            FormDefinition::new(vec![section]),
            Err(ValidationError::DuplicateQuestion { .. })
        ));
    }

    #[test]
    fn duplicate_id_across_sections_is_allowed_and_reported() {
        let form = FormDefinition::new(vec![
            Section::new("One", vec![Question::input("name", "Name")]),
            Section::new("Two", vec![Question::radio("name", "Name again", times())]),
        ])
        .unwrap();
        assert_eq!(form.duplicate_ids(), vec!["name".to_string()]);
    }

    #[test]
    fn from_json_reads_app_shape() {
        let json = r#"[
            {"title": "Sleep Habits", "questions": [
                {"id": "bedtime", "label": "Bed?", "type": "dropdown",
                 "defaultValue": "Choose time",
                 "options": [{"label": "9:00 PM", "value": "9:00 pm"}]}
            ]}
        ]"#;
        let form = FormDefinition::from_json(json).unwrap();
        let question = form.question("bedtime").unwrap();
        assert_eq!(question.kind, QuestionKind::Dropdown);
        assert_eq!(question.default_value.as_deref(), Some("Choose time"));
        assert_eq!(question.option_for("9:00 pm").unwrap().label, "9:00 PM");
    }
}
