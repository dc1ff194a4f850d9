use clap::{Parser, Subcommand};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

mod commands;

#[derive(Parser)]
#[command(name = "aurore", version, about = "Aurore sleep companion CLI")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Welcome, questionnaire and onboarding steps
    Onboard {
        #[command(subcommand)]
        action: commands::onboard::OnboardAction,
    },
    /// Navigation gate checks
    Route {
        #[command(subcommand)]
        action: commands::route::RouteAction,
    },
    /// User profile
    Profile {
        #[command(subcommand)]
        action: commands::profile::ProfileAction,
    },
    /// Sleep tracking and log
    Sleep {
        #[command(subcommand)]
        action: commands::sleep::SleepAction,
    },
    /// Sleep template management
    Template {
        #[command(subcommand)]
        action: commands::template::TemplateAction,
    },
    /// Home screen summary
    Home {
        /// Print as JSON
        #[arg(long)]
        json: bool,
    },
    /// Configuration management
    Config {
        #[command(subcommand)]
        action: commands::config::ConfigAction,
    },
}

fn init_logging() {
    let filter =
        EnvFilter::try_from_env("AURORE_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    tracing_subscriber::registry()
        .with(filter)
        .with(
            tracing_subscriber::fmt::layer()
                .with_target(false)
                .with_writer(std::io::stderr),
        )
        .init();
}

fn main() {
    init_logging();

    let cli = Cli::parse();
    let result = match cli.command {
        Commands::Onboard { action } => commands::onboard::run(action),
        Commands::Route { action } => commands::route::run(action),
        Commands::Profile { action } => commands::profile::run(action),
        Commands::Sleep { action } => commands::sleep::run(action),
        Commands::Template { action } => commands::template::run(action),
        Commands::Home { json } => commands::home::run(json),
        Commands::Config { action } => commands::config::run(action),
    };

    if let Err(e) = result {
        eprintln!("error: {e}");
        std::process::exit(1);
    }
}
