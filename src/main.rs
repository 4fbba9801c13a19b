use clap::{Parser, Subcommand};
use habit_tracker::dates::{DateKey, Locale};
use habit_tracker::handlers;
use habit_tracker::models::{CreateHabitRequest, Frequency, UpdateHabitRequest, PALETTE};
use habit_tracker::{Config, HttpHabitApi};
use std::sync::Arc;
use tracing::{error, info};
use tracing_subscriber::{fmt, EnvFilter};

#[derive(Parser)]
#[command(name = "habits")]
#[command(about = "Track daily habits against a habit API", long_about = None)]
struct Cli {
    /// Base URL of the habit API (overrides HABITS_API_URL)
    #[arg(long, global = true)]
    api_url: Option<String>,
    /// Date display language: en or pt (overrides HABITS_LOCALE)
    #[arg(long, global = true)]
    locale: Option<Locale>,
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// List habits and whether they are done on a day
    List {
        /// Day in YYYY-MM-DD, defaults to today
        #[arg(short, long)]
        date: Option<DateKey>,
    },
    /// Create a habit
    Add {
        name: String,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        /// daily, weekly or custom
        #[arg(short, long, default_value = "daily")]
        frequency: Frequency,
        /// Display color, e.g. #3B82F6
        #[arg(long, default_value = PALETTE[0])]
        color: String,
    },
    /// Show one habit with its statistics
    Show { id: String },
    /// Change a habit
    Edit {
        id: String,
        #[arg(short, long)]
        name: Option<String>,
        #[arg(short, long)]
        description: Option<String>,
        #[arg(short, long)]
        category: Option<String>,
        #[arg(short, long)]
        frequency: Option<Frequency>,
        #[arg(long)]
        color: Option<String>,
    },
    /// Mark a habit complete
    Done {
        id: String,
        #[arg(short, long)]
        date: Option<DateKey>,
    },
    /// Remove a completion
    Undo {
        id: String,
        #[arg(short, long)]
        date: Option<DateKey>,
    },
    /// Complete or un-complete a habit depending on its current state
    Toggle {
        id: String,
        #[arg(short, long)]
        date: Option<DateKey>,
    },
    /// Delete a habit
    Remove { id: String },
    /// Per-habit statistics and totals
    Stats,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("warn".parse()?))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let mut config = Config::from_env()?;
    if let Some(url) = cli.api_url.as_deref() {
        config = config.with_api_url(url)?;
    }
    if let Some(locale) = cli.locale {
        config.locale = locale;
    }
    info!(api_url = %config.api_url, "using habit api");

    let api = Arc::new(HttpHabitApi::new(&config)?);
    let result = match cli.command {
        Commands::List { date } => handlers::list(api.as_ref(), date, config.locale).await,
        Commands::Add {
            name,
            description,
            category,
            frequency,
            color,
        } => {
            let request = CreateHabitRequest {
                name,
                description,
                frequency,
                color,
                category,
            };
            handlers::add(api.as_ref(), request).await
        }
        Commands::Show { id } => handlers::show(api.as_ref(), &id).await,
        Commands::Edit {
            id,
            name,
            description,
            category,
            frequency,
            color,
        } => {
            let request = UpdateHabitRequest {
                name,
                description,
                frequency,
                color,
                category,
            };
            handlers::edit(api.as_ref(), &id, request).await
        }
        Commands::Done { id, date } => handlers::done(api.as_ref(), &id, date).await,
        Commands::Undo { id, date } => handlers::undo(api.as_ref(), &id, date).await,
        Commands::Toggle { id, date } => handlers::toggle(api.clone(), &id, date).await,
        Commands::Remove { id } => handlers::remove(api.as_ref(), &id).await,
        Commands::Stats => handlers::stats(api.as_ref()).await,
    };

    match result {
        Ok(output) => {
            println!("{}", output.trim_end());
            Ok(())
        }
        Err(err) => {
            error!("{err}");
            Err(err.into())
        }
    }
}
