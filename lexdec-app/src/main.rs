//! lexdec: a timed lexical-decision task.

use std::path::PathBuf;
use std::process;

use clap::{Args, Parser, Subcommand};
use tracing_subscriber::EnvFilter;

mod app;
mod commands;
mod config;
mod session;

#[derive(Parser)]
#[command(name = "lexdec", version, about = "Timed word / non-word decision task")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Open the task window
    Run(RunArgs),

    /// Print the summary of the run stored in a session directory
    Results {
        #[arg(long)]
        session_dir: PathBuf,
    },

    /// Remove the run stored in a session directory
    Clear {
        #[arg(long)]
        session_dir: PathBuf,
    },

    /// Validate and list a word list
    Words {
        /// JSON array of {"text", "isWord"} objects (default: built-in list)
        #[arg(long)]
        words: Option<PathBuf>,
    },
}

#[derive(Args, Debug, Clone, Default)]
pub struct RunArgs {
    /// JSON array of {"text", "isWord"} objects (default: built-in list)
    #[arg(long)]
    pub words: Option<PathBuf>,

    /// TrueType font used for all text
    #[arg(long)]
    pub font: Option<PathBuf>,

    /// TOML config file
    #[arg(long)]
    pub config: Option<PathBuf>,

    /// Pause after each answer before the next item
    #[arg(long)]
    pub feedback_delay_ms: Option<u64>,

    /// Present the items in random order
    #[arg(long)]
    pub shuffle: bool,

    /// Seed for --shuffle
    #[arg(long, requires = "shuffle")]
    pub seed: Option<u64>,

    /// Keep the session in this directory instead of in memory
    #[arg(long)]
    pub session_dir: Option<PathBuf>,
}

fn init_tracing() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("lexdec=info"));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

fn main() {
    init_tracing();

    let cli = Cli::parse();

    let result = match cli.command {
        Commands::Run(args) => commands::run::execute(args),
        Commands::Results { session_dir } => commands::results::execute(session_dir),
        Commands::Clear { session_dir } => commands::clear::execute(session_dir),
        Commands::Words { words } => commands::words::execute(words),
    };

    if let Err(e) = result {
        eprintln!("Error: {e:#}");
        process::exit(1);
    }
}
