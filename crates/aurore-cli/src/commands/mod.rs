pub mod config;
pub mod home;
pub mod onboard;
pub mod profile;
pub mod route;
pub mod sleep;
pub mod template;

use aurore_core::storage::Database;
use aurore_core::Config;
use chrono::NaiveDateTime;

pub type CmdResult = Result<(), Box<dyn std::error::Error>>;

/// Open the record store in the data directory.
pub fn open_store() -> Result<Database, Box<dyn std::error::Error>> {
    Ok(Database::open()?)
}

/// Load the config file, or defaults when it cannot be read.
pub fn load_config() -> Config {
    Config::load_or_default()
}

/// Parse `--at` style timestamps, defaulting to the local clock.
pub fn parse_time(at: Option<&str>) -> Result<NaiveDateTime, Box<dyn std::error::Error>> {
    match at {
        Some(raw) => NaiveDateTime::parse_from_str(raw.trim(), "%Y-%m-%d %H:%M")
            .map_err(|e| format!("invalid time '{raw}' (expected YYYY-MM-DD HH:MM): {e}").into()),
        None => Ok(chrono::Local::now().naive_local()),
    }
}

pub fn print_json<T: serde::Serialize + ?Sized>(value: &T) -> CmdResult {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
