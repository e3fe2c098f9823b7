//! CLI module for Vademecum.
//!
//! Subcommands:
//! - `validate`: check content files and report every schema violation
//! - `get`: fetch one entry, optionally a single level
//! - `search`: ranked token search
//! - `category` / `categories`: browse by category
//! - `stats` / `levels`: catalog counts and the complexity tiers
//!
//! Results are printed as JSON on stdout; logs go to stderr.

mod lookup;
mod validate;

use std::path::PathBuf;
use std::process::ExitCode;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use serde::Serialize;
use tracing_subscriber::EnvFilter;

use crate::config::Config;
use crate::error::AppError;
use crate::services::LevelFallback;

/// Vademecum - multi-level clinical knowledge base
#[derive(Parser)]
#[command(name = "vademecum")]
#[command(about = "Query validated clinical topics and decision algorithms")]
#[command(version)]
pub struct App {
    /// Run in verbose mode
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Content file or directory (repeatable); overrides configured paths
    #[arg(long = "content", value_name = "PATH", global = true)]
    pub content: Vec<PathBuf>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Validate content and list every schema violation
    Validate,

    /// Get an entry by id
    Get {
        /// Entry id (e.g. "acute-asthma")
        id: String,

        /// Only return this complexity level: a rank (1-5) or a tier name
        /// (child, patient, nursing, student, physician)
        #[arg(long, allow_negative_numbers = true)]
        level: Option<String>,

        /// Out-of-range level policy: strict, nearest, lowest (defaults to config)
        #[arg(long)]
        fallback: Option<LevelFallback>,
    },

    /// Search entries by keyword
    Search {
        /// Query words
        #[arg(required = true, num_args = 1..)]
        query: Vec<String>,

        /// Maximum number of results (defaults to config)
        #[arg(long)]
        limit: Option<usize>,

        /// Restrict to one category slug
        #[arg(long)]
        category: Option<String>,
    },

    /// List entries in a category
    Category {
        /// Category slug (e.g. "emergency")
        slug: String,
    },

    /// List declared categories with entry counts
    Categories,

    /// Show catalog statistics
    Stats,

    /// Describe the complexity levels
    Levels,
}

impl App {
    /// Run the CLI application.
    pub fn run(self) -> Result<ExitCode> {
        let mut config = Config::load()?;
        if !self.content.is_empty() {
            config.content.paths = self.content.clone();
        }
        init_logging(self.verbose, &config.log.level);

        match self.command {
            Command::Validate => self.run_validate(&config),
            Command::Get {
                ref id,
                ref level,
                fallback,
            } => self.run_get(config, id, level.as_deref(), fallback),
            Command::Search {
                ref query,
                limit,
                ref category,
            } => self.run_search(config, &query.join(" "), limit, category.as_deref()),
            Command::Category { ref slug } => self.run_category(config, slug),
            Command::Categories => self.run_categories(config),
            Command::Stats => self.run_stats(config),
            Command::Levels => self.run_levels(),
        }
    }
}

fn init_logging(verbose: bool, level: &str) {
    let filter = if verbose {
        EnvFilter::new("debug")
    } else {
        EnvFilter::try_new(level).unwrap_or_else(|_| EnvFilter::new("info"))
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

/// Pretty JSON on stdout.
fn print_json<T: Serialize>(value: &T) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}

#[derive(Serialize)]
struct ErrorResponse<'a> {
    error: ErrorBody<'a>,
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    code: &'static str,
    message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    id: Option<&'a str>,
}

/// Prints an expected lookup failure (unknown id, level or tier name) as
/// `{"error": {...}}` and returns a failing exit code.
fn report_lookup_error(err: &AppError, id: Option<&str>) -> Result<ExitCode> {
    tracing::debug!(code = err.code(), "No content found");
    print_json(&ErrorResponse {
        error: ErrorBody {
            code: err.code(),
            message: err.to_string(),
            id,
        },
    })?;
    Ok(ExitCode::FAILURE)
}
