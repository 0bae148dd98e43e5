//! adaptiq CLI: the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "adaptiq", version, about = "Adaptive quiz engine")]
struct Cli {
    /// Config file path
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Create a starter config and a seeded data file
    Init,

    /// Generate a question bank into the data file
    Seed {
        /// Number of questions (default: `seed_questions` from the config)
        #[arg(long)]
        count: Option<usize>,

        /// Replace an existing data file, discarding its responses
        #[arg(long)]
        force: bool,
    },

    /// Select a quiz
    Quiz {
        /// Adapt the quiz to this user's history
        #[arg(long)]
        user: Option<String>,

        /// Output format: text, json
        #[arg(long, default_value = "text")]
        format: String,
    },

    /// Grade and record a user's answers
    Submit {
        /// User id
        #[arg(long)]
        user: String,

        /// JSON array of {question_id, selected_option, time_taken}
        #[arg(long)]
        answers: PathBuf,
    },

    /// Show mastery analytics and recommendations
    Analytics {
        /// User id
        #[arg(long)]
        user: String,

        /// Output format: text, json, markdown
        #[arg(long, default_value = "text")]
        format: String,

        /// Also save the report as JSON to this file
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Check the config and the data file
    Validate,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("adaptiq=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();
    let config = cli.config;

    let result = match cli.command {
        Commands::Init => commands::init::execute(config),
        Commands::Seed { count, force } => commands::seed::execute(count, force, config),
        Commands::Quiz { user, format } => commands::quiz::execute(user, format, config).await,
        Commands::Submit { user, answers } => {
            commands::submit::execute(user, answers, config).await
        }
        Commands::Analytics {
            user,
            format,
            output,
        } => commands::analytics::execute(user, format, output, config).await,
        Commands::Validate => commands::validate::execute(config).await,
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
