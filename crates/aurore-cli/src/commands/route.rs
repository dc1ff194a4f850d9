use aurore_core::{GateDecision, ProgressGate, Route};
use clap::Subcommand;

use super::{open_store, print_json, CmdResult};

#[derive(Subcommand)]
pub enum RouteAction {
    /// Decide whether a route may be shown, e.g. "/" or "/(tabs)/calendar"
    Check {
        path: String,
        /// Print the decision as JSON
        #[arg(long)]
        json: bool,
    },
    /// Resolve the screen the app opens on
    Start,
}

pub fn run(action: RouteAction) -> CmdResult {
    let db = open_store()?;
    let gate = ProgressGate::new(&db);

    match action {
        RouteAction::Check { path, json } => {
            let decision = gate.check_path(&path);
            if json {
                print_json(&decision)?;
            } else {
                match decision {
                    GateDecision::Allow => println!("allow {}", Route::parse(&path)),
                    GateDecision::Redirect(target) => println!("redirect {target}"),
                }
            }
        }
        RouteAction::Start => {
            let target = gate
                .check(&Route::Root)
                .redirect_target()
                .cloned()
                .unwrap_or(Route::Root);
            println!("{target}");
        }
    }
    Ok(())
}
