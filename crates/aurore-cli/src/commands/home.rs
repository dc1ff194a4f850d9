use aurore_core::Dashboard;

use super::{open_store, print_json, CmdResult};

pub fn run(json: bool) -> CmdResult {
    let db = open_store()?;
    let today = chrono::Local::now().date_naive();
    let dash = Dashboard::load(&db, today)?;

    if json {
        return print_json(&dash);
    }

    println!("Good to see you, {}.", dash.greeting_name());
    if let Some(profile) = &dash.profile {
        println!(
            "Goal: {}  ({} -> {})",
            profile.sleep_goal.label(),
            profile.bedtime,
            profile.wakeup_time
        );
    }
    match &dash.last_night {
        Some(r) => println!("Last night: {} hours, {}", r.hours, r.quality),
        None => println!("Last night: no record"),
    }
    match dash.weekly_average {
        Some(avg) => println!("7-day average: {avg:.1} hours"),
        None => println!("7-day average: n/a"),
    }
    if let Some(since) = dash.tracking.running_since() {
        println!("Tracking since {}", since.format("%H:%M"));
    }
    println!("Templates: {}", dash.template_count);
    Ok(())
}
