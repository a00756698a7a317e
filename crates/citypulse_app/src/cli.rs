use std::path::PathBuf;

use citypulse_core::MAX_PAGE_SIZE;
use citypulse_engine::{DEFAULT_POINTS_PATH, DEFAULT_STORE_PATH};
use citypulse_logging::LogDestination;
use clap::{Parser, Subcommand};
use log::LevelFilter;

pub const DEFAULT_NER_MODEL: &str = "en_core_web_lg";

#[derive(Debug, Parser)]
#[command(name = "citypulse")]
#[command(about = "Harvest travel forum comments and map the cities they mention")]
#[command(version)]
pub struct Cli {
    /// SQLite store shared by every step
    #[arg(long, global = true, default_value = DEFAULT_STORE_PATH)]
    pub db: PathBuf,

    /// Also append log output to this file
    #[arg(long, global = true)]
    pub log_file: Option<PathBuf>,

    /// Log per-item detail
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Debug, Clone, PartialEq, Eq, Subcommand)]
pub enum Command {
    /// Harvest comments backwards in time, resuming below the oldest stored one
    Comments {
        /// Comments per request (1-100)
        #[arg(long, default_value_t = MAX_PAGE_SIZE, value_parser = parse_page_size)]
        size: usize,
    },

    /// Extract place names from comments not yet scanned by the model
    Ner {
        /// Model identifier handed to the recognizer command
        #[arg(long, default_value = DEFAULT_NER_MODEL)]
        model: String,

        /// Free-text note stored with the run
        #[arg(long)]
        model_description: Option<String>,
    },

    /// Resolve extracted place names to locations
    Geocode,

    /// Rebuild the per-city mention counts
    Cities,

    /// Fetch encyclopedia summaries for cities without one
    Summaries,

    /// Export the cities as map points
    Points {
        #[arg(long, default_value = DEFAULT_POINTS_PATH)]
        out: PathBuf,
    },
}

impl Cli {
    pub fn log_destination(&self) -> LogDestination {
        match &self.log_file {
            Some(path) => LogDestination::TerminalAndFile(path.clone()),
            None => LogDestination::Terminal,
        }
    }

    pub fn log_level(&self) -> LevelFilter {
        if self.verbose {
            LevelFilter::Debug
        } else {
            LevelFilter::Info
        }
    }
}

fn parse_page_size(raw: &str) -> Result<usize, String> {
    let size: usize = raw.parse().map_err(|err| format!("{err}"))?;
    if (1..=MAX_PAGE_SIZE).contains(&size) {
        Ok(size)
    } else {
        Err(format!("page size must be between 1 and {MAX_PAGE_SIZE}"))
    }
}
