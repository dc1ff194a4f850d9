//! The built-in onboarding questionnaire.

use super::{FormDefinition, FormOption, Question, Section};
use crate::profile::answer_keys;

fn options(pairs: &[(&str, &str)]) -> Vec<FormOption> {
    pairs
        .iter()
        .map(|(label, value)| FormOption::new(*label, *value))
        .collect()
}

/// Sections of the sleep questionnaire shown after the welcome screen.
pub fn sleep_questionnaire_sections() -> Vec<Section> {
    vec![
        Section::new(
            "Personal Info",
            vec![
                Question::input(answer_keys::NAME, "Your Name").with_placeholder("Enter your name"),
                Question::input("age", "Your Age").with_placeholder("Enter your age"),
            ],
        ),
        Section::new(
            "Sleep Habits",
            vec![
                Question::dropdown(
                    answer_keys::BEDTIME,
                    "What time do you usually go to bed?",
                    options(&[
                        ("9:00 PM", "9:00 pm"),
                        ("10:00 PM", "10:00 pm"),
                        ("11:00 PM", "11:00 pm"),
                        ("12:00 AM", "12:00 am"),
                    ]),
                )
                .with_default("Choose time"),
                Question::dropdown(
                    answer_keys::WAKEUP_TIME,
                    "What time do you usually wake up?",
                    options(&[
                        ("5:00 AM", "5:00 am"),
                        ("6:00 AM", "6:00 am"),
                        ("7:00 AM", "7:00 am"),
                        ("8:00 AM", "8:00 am"),
                    ]),
                )
                .with_default("Choose time"),
            ],
        ),
        Section::new(
            "Sleep Challenges",
            vec![
                Question::radio(
                    "difficulty",
                    "Do you have difficulty falling asleep?",
                    options(&[
                        ("Yes, regularly", "yes"),
                        ("Sometimes", "sometimes"),
                        ("Rarely", "rarely"),
                    ]),
                )
                .with_default("sometimes"),
                Question::radio(
                    "wakeUp",
                    "Do you wake up during the night?",
                    options(&[
                        ("Multiple times", "multiple"),
                        ("Sometimes", "sometimes"),
                        ("Rarely", "rarely"),
                    ]),
                )
                .with_default("sometimes"),
            ],
        ),
        Section::new(
            "Sleep Goal",
            vec![Question::radio(
                answer_keys::SLEEP_GOAL,
                "What's your primary sleep goal?",
                options(&[
                    ("Restorative Sleep", "restorative"),
                    ("Deep Sleep", "deep"),
                    ("Lucid Dreams", "lucid"),
                    ("Light Sleep", "light"),
                ]),
            )
            .with_default("restorative")],
        ),
    ]
}

/// The sleep questionnaire as a validated form.
pub fn sleep_questionnaire() -> FormDefinition {
    FormDefinition::new(sleep_questionnaire_sections())
        .unwrap_or_else(|e| unreachable!("built-in questionnaire is invalid: {e}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::form::QuestionKind;
    use crate::profile::SleepGoal;

    #[test]
    fn has_four_sections_and_no_cross_section_duplicates() {
        let form = sleep_questionnaire();
        assert_eq!(form.len(), 4);
        assert!(form.duplicate_ids().is_empty());
    }

    #[test]
    fn covers_every_profile_field() {
        let form = sleep_questionnaire();
        for id in [
            answer_keys::NAME,
            answer_keys::BEDTIME,
            answer_keys::WAKEUP_TIME,
            answer_keys::SLEEP_GOAL,
        ] {
            assert!(form.question(id).is_some(), "missing question {id}");
        }
    }

    #[test]
    fn sleep_goal_options_parse_as_goals() {
        let form = sleep_questionnaire();
        let goal = form.question(answer_keys::SLEEP_GOAL).unwrap();
        assert_eq!(goal.kind, QuestionKind::Radio);
        for option in &goal.options {
            assert!(option.value.parse::<SleepGoal>().is_ok(), "{}", option.value);
        }
    }
}
