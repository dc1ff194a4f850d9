//! Sleep template management commands for CLI.

use aurore_core::sleep::{NewTemplate, TemplateKind, TemplatePatch};
use aurore_core::{SleepGoal, TemplateLibrary};
use clap::Subcommand;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum TemplateAction {
    /// List saved templates
    List {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Save a new template
    Add {
        title: String,
        /// restorative, deep, lucid or light
        #[arg(long, default_value = "restorative")]
        kind: String,
        #[arg(long)]
        bedtime: String,
        #[arg(long)]
        wake: String,
        /// Override the computed hours
        #[arg(long)]
        hours: Option<f64>,
    },
    /// Change fields of a template
    Update {
        id: String,
        #[arg(long)]
        title: Option<String>,
        #[arg(long)]
        kind: Option<String>,
        #[arg(long)]
        bedtime: Option<String>,
        #[arg(long)]
        wake: Option<String>,
        #[arg(long)]
        hours: Option<f64>,
    },
    /// Delete a template
    Delete { id: String },
}

fn parse_kind(raw: &str) -> Result<TemplateKind, Box<dyn std::error::Error>> {
    Ok(raw.parse::<SleepGoal>()?.into())
}

pub fn run(action: TemplateAction) -> CmdResult {
    let db = open_store()?;
    let library = TemplateLibrary::new(&db);

    match action {
        TemplateAction::List { json } => {
            let templates = library.list()?;
            if json {
                print_json(&templates)?;
            } else if templates.is_empty() {
                println!("No templates. Use 'template add' to create one.");
            } else {
                for t in templates {
                    let goal = SleepGoal::from(t.kind);
                    println!(
                        "{}  {}  [{}]  {} -> {}  {} hours",
                        t.id,
                        t.title,
                        goal.label(),
                        t.bedtime,
                        t.wake_up_time,
                        t.hours
                    );
                }
            }
        }
        TemplateAction::Add {
            title,
            kind,
            bedtime,
            wake,
            hours,
        } => {
            let template = library.add(NewTemplate {
                title,
                kind: parse_kind(&kind)?,
                bedtime,
                wake_up_time: wake,
                hours,
            })?;
            println!("Template created: {}", template.id);
            print_json(&template)?;
        }
        TemplateAction::Update {
            id,
            title,
            kind,
            bedtime,
            wake,
            hours,
        } => {
            let patch = TemplatePatch {
                title,
                kind: kind.as_deref().map(parse_kind).transpose()?,
                bedtime,
                wake_up_time: wake,
                hours,
            };
            let template = library.update(&id, patch)?;
            print_json(&template)?;
        }
        TemplateAction::Delete { id } => {
            library.delete(&id)?;
            println!("Template deleted: {id}");
        }
    }
    Ok(())
}
