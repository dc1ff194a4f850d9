//! Profile commands.

use aurore_core::{ProfileFields, ProgressService, SleepGoal};
use clap::Subcommand;

use super::{load_config, open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum ProfileAction {
    /// Show the stored profile
    Show {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Change profile fields
    Update {
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
    /// Log out; onboarding runs again on next start
    Logout,
}

pub fn run(action: ProfileAction) -> CmdResult {
    let config = load_config();
    let db = open_store()?;
    let service = ProgressService::with_defaults(&db, config.profile_defaults());

    match action {
        ProfileAction::Show { json } => match service.profile()? {
            Some(profile) if json => print_json(&profile)?,
            Some(profile) => {
                println!("Name:       {}", profile.name);
                println!("Bedtime:    {}", profile.bedtime);
                println!("Wake-up:    {}", profile.wakeup_time);
                println!("Sleep goal: {}", profile.sleep_goal.label());
                println!(
                    "Onboarded:  {}",
                    if profile.has_completed_onboarding { "yes" } else { "no" }
                );
            }
            None => println!("No profile yet. Run 'onboard questionnaire' first."),
        },
        ProfileAction::Update {
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
            if fields.is_empty() {
                return Err("nothing to update; pass --name, --bedtime, --wake or --goal".into());
            }
            let profile = service.update_profile(fields)?;
            println!("Profile updated for {}", profile.name);
        }
        ProfileAction::Logout => {
            let next = service.log_out()?;
            println!("Logged out. Next: {next}");
        }
    }
    Ok(())
}
