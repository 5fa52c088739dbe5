use std::path::PathBuf;

use clap::{Parser, Subcommand};
use eyre::Result;
use lifecount_core::{App, SystemClock};
use lifecount_fs::Config;
use tracing::{debug, Level};

mod play;
mod profile;
mod report;
mod utils;

#[derive(Parser, Debug)]
#[command(name = "lifecount", version, about = "How many more times will you get to do it?")]
struct Cli {
    /// Log more.
    #[arg(long, global = true)]
    debug: bool,

    #[command(subcommand)]
    command: Option<Command>,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Rotate through the cards in the terminal.
    Play {
        /// Seconds per card.
        #[arg(long)]
        dwell: Option<f64>,
        /// Activities file to read instead of the configured one.
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Print every card.
    List {
        /// Include inactive activities.
        #[arg(long)]
        all: bool,
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Overview of the activity data.
    Summary {
        #[arg(long)]
        file: Option<PathBuf>,
    },
    /// Show or change who the countdown is for.
    Profile {
        #[arg(long)]
        birth_year: Option<i32>,
        #[arg(long)]
        birth_month: Option<u32>,
        #[arg(long)]
        expectancy: Option<f64>,
    },
}

/// An app with the given activity file, or the configured one, loaded.
fn load_app(config: &Config, file: Option<PathBuf>) -> Result<App> {
    let path = match file {
        Some(path) => path,
        None => config.activities_path()?,
    };

    let activities = lifecount_fs::load_activities(&path)?;
    let mut app = App::new(config.settings.clone(), config.profile.clone(), SystemClock);
    app.load_activities(activities)?;
    Ok(app)
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_max_level(if cli.debug { Level::DEBUG } else { Level::INFO })
        .init();

    let mut config = Config::load()?;
    debug!("config: {config:?}");

    match cli.command.unwrap_or(Command::Play {
        dwell: None,
        file: None,
    }) {
        Command::Play { dwell, file } => {
            if let Some(dwell) = dwell {
                config.settings.dwell_secs = dwell;
            }
            let app = load_app(&config, file)?;
            play::play(app).await?;
        }
        Command::List { all, file } => {
            let app = load_app(&config, file)?;
            report::list(&app, all)?;
        }
        Command::Summary { file } => {
            let app = load_app(&config, file)?;
            report::summary(&app);
        }
        Command::Profile {
            birth_year,
            birth_month,
            expectancy,
        } => {
            profile::profile(&mut config, birth_year, birth_month, expectancy)?;
        }
    }

    Ok(())
}
