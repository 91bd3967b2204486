//! satforge CLI — the user-facing command-line interface.

use std::path::PathBuf;
use std::process;

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(name = "satforge", version, about = "SAT practice test generator")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a practice test from a corpus and an exam plan
    Generate {
        /// Path to the .toml exam plan
        #[arg(long)]
        plan: PathBuf,

        /// Path to the question corpus (.json or compact binary)
        #[arg(long)]
        corpus: PathBuf,

        /// Output HTML file
        #[arg(long, default_value = "./exam.html")]
        output: PathBuf,

        /// Visibility mode: full, answers-only, no-answers
        #[arg(long, default_value = "full")]
        mode: String,

        /// Random seed (overrides the plan's seed)
        #[arg(long)]
        seed: Option<u64>,

        /// Document title (overrides the plan's name)
        #[arg(long)]
        title: Option<String>,
    },

    /// Crawl the question bank into a local corpus
    Fetch {
        /// Output corpus path; a compact binary sibling is written alongside
        #[arg(long, default_value = "./questions.json")]
        output: PathBuf,

        /// Sections to crawl (comma-separated, default: all)
        #[arg(long)]
        sections: Option<String>,

        /// Pause between question fetches, in milliseconds
        #[arg(long, default_value = "250")]
        delay_ms: u64,

        /// Cap on questions per section
        #[arg(long)]
        limit: Option<usize>,

        /// Question bank base URL override
        #[arg(long)]
        base_url: Option<String>,
    },

    /// Validate an exam plan, optionally against a corpus
    Validate {
        /// Path to the .toml exam plan
        #[arg(long)]
        plan: PathBuf,

        /// Corpus to check availability against
        #[arg(long)]
        corpus: Option<PathBuf>,
    },

    /// Create a starter exam plan
    Init,
}

#[tokio::main]
async fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("satforge=info".parse().unwrap()),
        )
        .init();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Generate {
            plan,
            corpus,
            output,
            mode,
            seed,
            title,
        } => commands::generate::execute(plan, corpus, output, mode, seed, title),
        Commands::Fetch {
            output,
            sections,
            delay_ms,
            limit,
            base_url,
        } => commands::fetch::execute(output, sections, delay_ms, limit, base_url).await,
        Commands::Validate { plan, corpus } => commands::validate::execute(plan, corpus),
        Commands::Init => commands::init::execute(),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
