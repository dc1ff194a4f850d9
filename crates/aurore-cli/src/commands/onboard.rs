//! Onboarding commands: welcome, questionnaire, profile completion.
//!
//! The questionnaire runs the same form engine as the app. Without
//! `--answer` flags it prompts on stdin, one question at a time.

use std::io::{self, BufRead, Write};
use std::path::PathBuf;

use aurore_core::form::{questionnaire, Question, QuestionKind, StepOutcome};
use aurore_core::{
    AnswerMap, EngineConfig, FormDefinition, FormEngine, ProfileFields, ProgressService, SleepGoal,
};
use clap::Subcommand;
use tracing::debug;

use super::{load_config, open_store, print_json, CmdResult};

/// Typed on a prompt to return to the previous section.
const BACK_COMMAND: &str = ":back";

#[derive(Subcommand)]
pub enum OnboardAction {
    /// Acknowledge the welcome screen
    Welcome,
    /// Fill in and submit the questionnaire
    Questionnaire {
        /// Answer as question=value; skips the interactive prompts
        #[arg(long = "answer", short = 'a')]
        answers: Vec<String>,
        /// Load the form from a JSON file instead of the built-in one
        #[arg(long)]
        form: Option<PathBuf>,
    },
    /// Finish onboarding, optionally overriding profile fields
    Complete {
        #[arg(long)]
        name: Option<String>,
        #[arg(long)]
        bedtime: Option<String>,
        #[arg(long)]
        wake: Option<String>,
        /// restorative, deep, lucid or light
        #[arg(long)]
        goal: Option<String>,
    },
    /// Print the progress flags
    Status,
}

pub fn run(action: OnboardAction) -> CmdResult {
    let config = load_config();
    let db = open_store()?;
    let service = ProgressService::with_defaults(&db, config.profile_defaults());

    match action {
        OnboardAction::Welcome => {
            let next = service.mark_welcome_seen()?;
            println!("Welcome acknowledged. Next: {next}");
        }
        OnboardAction::Questionnaire { answers, form } => {
            let form = match form {
                Some(path) => FormDefinition::from_json(&std::fs::read_to_string(path)?)?,
                None => questionnaire::sleep_questionnaire(),
            };
            let collected = if answers.is_empty() {
                prompt_form(form, config.engine_config())?
            } else {
                fill_form(form, config.engine_config(), &parse_answers(&answers)?)?
            };
            let next = service.submit_questionnaire(&collected)?;
            println!("Questionnaire saved ({} answers). Next: {next}", collected.len());
        }
        OnboardAction::Complete {
            name,
            bedtime,
            wake,
            goal,
        } => {
            let fields = ProfileFields {
                name,
                bedtime,
                wakeup_time: wake,
                sleep_goal: goal.map(|g| g.parse::<SleepGoal>()).transpose()?,
            };
            let next = service.complete_onboarding(fields)?;
            println!("Onboarding complete. Next: {next}");
        }
        OnboardAction::Status => {
            print_json(&service.flags()?)?;
        }
    }
    Ok(())
}

fn parse_answers(raw: &[String]) -> Result<Vec<(String, String)>, Box<dyn std::error::Error>> {
    raw.iter()
        .map(|pair| {
            pair.split_once('=')
                .map(|(k, v)| (k.trim().to_string(), v.to_string()))
                .ok_or_else(|| {
                    Box::<dyn std::error::Error>::from(format!(
                        "expected question=value, got '{pair}'"
                    ))
                })
        })
        .collect()
}

/// Advance once, completing any fade-out right away. The terminal has no
/// animation to wait for.
fn step(engine: &mut FormEngine, back: bool) -> StepOutcome {
    let outcome = if back { engine.back() } else { engine.advance() };
    let outcome = match outcome {
        StepOutcome::Transitioning { .. } => engine.complete_transition(),
        other => other,
    };
    for event in engine.drain_events() {
        debug!(?event, "form event");
    }
    outcome
}

fn fill_form(
    form: FormDefinition,
    config: EngineConfig,
    answers: &[(String, String)],
) -> Result<AnswerMap, Box<dyn std::error::Error>> {
    if let Some((id, _)) = answers.iter().find(|(id, _)| form.question(id).is_none()) {
        return Err(format!("unknown question '{id}'").into());
    }

    let mut engine = FormEngine::with_config(form, config);
    loop {
        let ids: Vec<String> = engine
            .current_section()
            .questions
            .iter()
            .map(|q| q.id.clone())
            .collect();
        for (id, value) in answers.iter().filter(|(id, _)| ids.contains(id)) {
            engine.set_answer(id, value.clone());
        }
        match step(&mut engine, false) {
            StepOutcome::Submitted => break,
            StepOutcome::Ignored { reason } => {
                return Err(format!("questionnaire stalled: {reason:?}").into())
            }
            _ => {}
        }
    }
    Ok(engine.into_answers())
}

fn prompt_form(
    form: FormDefinition,
    config: EngineConfig,
) -> Result<AnswerMap, Box<dyn std::error::Error>> {
    let mut engine = FormEngine::with_config(form, config);
    let stdin = io::stdin();
    let mut lines = stdin.lock().lines();

    'sections: loop {
        let section = engine.current_section().clone();
        println!();
        println!(
            "[{}/{}] {}",
            engine.section_index() + 1,
            engine.section_count(),
            section.title
        );

        for question in &section.questions {
            print_question(&engine, question);
            io::stdout().flush()?;
            let line = match lines.next() {
                Some(line) => line?,
                None => String::new(),
            };
            let input = line.trim();

            if input == BACK_COMMAND {
                match step(&mut engine, true) {
                    StepOutcome::Moved { .. } => continue 'sections,
                    StepOutcome::Ignored { reason } => println!("  (cannot go back: {reason:?})"),
                    _ => {}
                }
                continue;
            }
            if let Some(value) = resolve_input(question, input) {
                engine.set_answer(&question.id, value);
            }
        }

        match step(&mut engine, false) {
            StepOutcome::Submitted => break,
            StepOutcome::Ignored { reason } => {
                return Err(format!("questionnaire stalled: {reason:?}").into())
            }
            _ => {}
        }
    }
    Ok(engine.into_answers())
}

fn print_question(engine: &FormEngine, question: &Question) {
    println!("{}", question.label);
    for (i, option) in question.options.iter().enumerate() {
        println!("  {}) {}", i + 1, option.label);
    }
    match engine.value_for(&question.id) {
        Some(current) => print!("> [{current}] "),
        None => match &question.placeholder {
            Some(hint) => print!("> ({hint}) "),
            None => print!("> "),
        },
    }
}

/// Map raw input to an answer. Empty input leaves the question unanswered;
/// choice questions also accept an option number or label.
fn resolve_input(question: &Question, input: &str) -> Option<String> {
    if input.is_empty() {
        return None;
    }
    if question.kind == QuestionKind::Input {
        return Some(input.to_string());
    }
    if let Ok(n) = input.parse::<usize>() {
        if let Some(option) = n.checked_sub(1).and_then(|i| question.options.get(i)) {
            return Some(option.value.clone());
        }
    }
    let by_label = question
        .options
        .iter()
        .find(|o| o.label.eq_ignore_ascii_case(input))
        .map(|o| o.value.clone());
    Some(by_label.unwrap_or_else(|| input.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use aurore_core::NavigationMode;

    #[test]
    fn parse_answers_splits_on_first_equals() {
        let parsed = parse_answers(&["name=Ana".into(), "note=a=b".into()]).unwrap();
        assert_eq!(parsed[0], ("name".to_string(), "Ana".to_string()));
        assert_eq!(parsed[1], ("note".to_string(), "a=b".to_string()));
        assert!(parse_answers(&["broken".into()]).is_err());
    }

    #[test]
    fn fill_form_walks_every_section() {
        let answers = parse_answers(&[
            "name=Ana".into(),
            "bedtime=11:00 pm".into(),
            "sleepGoal=deep".into(),
        ])
        .unwrap();
        let collected = fill_form(
            questionnaire::sleep_questionnaire(),
            EngineConfig::default(),
            &answers,
        )
        .unwrap();
        assert_eq!(collected.get("name"), Some("Ana"));
        assert_eq!(collected.get("bedtime"), Some("11:00 pm"));
        assert_eq!(collected.get("sleepGoal"), Some("deep"));
        assert_eq!(collected.len(), 3);
    }

    #[test]
    fn fill_form_rejects_unknown_question() {
        let answers = parse_answers(&["shoeSize=42".into()]).unwrap();
        let result = fill_form(
            questionnaire::sleep_questionnaire(),
            EngineConfig::instant(NavigationMode::OneWay),
            &answers,
        );
        assert!(result.is_err());
    }

    #[test]
    fn resolve_input_maps_option_numbers_and_labels() {
        let form = questionnaire::sleep_questionnaire();
        let goal = form.question("sleepGoal").unwrap();
        assert_eq!(resolve_input(goal, "2").as_deref(), Some(goal.options[1].value.as_str()));
        let label = goal.options[0].label.to_uppercase();
        assert_eq!(resolve_input(goal, &label).as_deref(), Some(goal.options[0].value.as_str()));
        assert_eq!(resolve_input(goal, ""), None);

        let name = form.question("name").unwrap();
        assert_eq!(resolve_input(name, "3").as_deref(), Some("3"));
    }
}
