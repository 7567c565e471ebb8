use std::path::PathBuf;

use clap::{CommandFactory, Parser, Subcommand};
use clap_complete::Shell;

use crate::{
    corpus::DEFAULT_PRECACHE_LIMIT,
    search::{DEFAULT_LIMIT, DEFAULT_MAX_DISTANCE},
};

#[derive(Debug, Parser)]
#[command(
    name = "howto",
    about = "Validate how-to guides and search them, typos and synonyms included"
)]
pub struct Cli {
    /// Override the content directory
    #[arg(long, global = true)]
    pub content_dir: Option<PathBuf>,

    /// Increase log verbosity (can be repeated: -v, -vv)
    #[arg(short, long, action = clap::ArgAction::Count, global = true)]
    pub verbose: u8,

    /// Only log warnings and errors
    #[arg(short, long, global = true, conflicts_with = "verbose")]
    pub quiet: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Subcommand)]
pub enum Command {
    /// Validate every guide in the content directory
    Validate(ValidateArgs),
    /// Search guides
    Search(SearchArgs),
    /// Print a single guide by slug
    Show(ShowArgs),
    /// Show the active intent dictionary
    Intents(IntentsArgs),
    /// List the pages an offline install should cache
    Precache(PrecacheArgs),
    /// Generate shell completions
    #[command(hide = true)]
    Completions(CompletionsArgs),
}

// -- Validate --

#[derive(Debug, Parser)]
pub struct ValidateArgs {
    /// Output the per-file report as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Search --

#[derive(Debug, Parser)]
pub struct SearchArgs {
    /// The search query
    pub query: String,

    /// Number of results to return
    #[arg(short = 'n', long, default_value_t = DEFAULT_LIMIT)]
    pub count: usize,

    /// Largest edit distance still counted as a match
    #[arg(long, default_value_t = DEFAULT_MAX_DISTANCE)]
    pub max_distance: usize,

    /// Intent dictionary file (JSON object of label -> synonyms)
    #[arg(long)]
    pub intents: Option<PathBuf>,

    /// Output results as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Show --

#[derive(Debug, Parser)]
pub struct ShowArgs {
    /// Slug of the guide
    pub slug: String,

    /// Output the validated guide as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Intents --

#[derive(Debug, Parser)]
pub struct IntentsArgs {
    /// Intent dictionary file (JSON object of label -> synonyms)
    #[arg(long)]
    pub intents: Option<PathBuf>,

    /// Output as JSON
    #[arg(long)]
    pub json: bool,
}

// -- Precache --

#[derive(Debug, Parser)]
pub struct PrecacheArgs {
    /// Maximum number of guide pages
    #[arg(long, default_value_t = DEFAULT_PRECACHE_LIMIT)]
    pub limit: usize,

    /// Output as a JSON array
    #[arg(long)]
    pub json: bool,
}

// -- Completions --

#[derive(Debug, Parser)]
pub struct CompletionsArgs {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

impl CompletionsArgs {
    /// Generate shell completions and print to stdout.
    pub fn generate(&self) {
        let mut cmd = Cli::command();
        clap_complete::generate(
            self.shell,
            &mut cmd,
            "howto",
            &mut std::io::stdout(),
        );
    }
}
