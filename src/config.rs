use std::path::PathBuf;
use std::time::Duration;

use clap::{Parser, ValueEnum};

use crate::data::{DEFAULT_QUESTIONS_PATH, DEFAULT_RESULTS_PATH};

/// Which front-end drives the session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum FrontEnd {
    /// Line-oriented prompts on stdin/stdout.
    Console,
    /// Full-screen terminal interface.
    Tui,
}

/// Log output format.
#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum)]
pub enum LogFormat {
    Pretty,
    Json,
}

/// Timed multiple-choice quiz sessions.
#[derive(Parser, Debug, Clone)]
#[command(version, about, long_about = None)]
pub struct Config {
    /// JSON file to load the questions from
    #[arg(short, long, env = "QUIZ_QUESTIONS", default_value = DEFAULT_QUESTIONS_PATH)]
    pub questions: PathBuf,

    /// CSV file session results are appended to
    #[arg(short, long, env = "QUIZ_RESULTS", default_value = DEFAULT_RESULTS_PATH)]
    pub results: PathBuf,

    /// Seconds allowed per question
    #[arg(
        short,
        long = "time-limit",
        env = "QUIZ_TIME_LIMIT",
        default_value_t = 15,
        value_parser = clap::value_parser!(u64).range(1..)
    )]
    pub time_limit: u64,

    /// Front-end to run
    #[arg(long, value_enum, default_value_t = FrontEnd::Console)]
    pub ui: FrontEnd,

    /// Category to start with instead of asking
    #[arg(short, long)]
    pub category: Option<String>,

    /// Seed for reproducible question and option order
    #[arg(long)]
    pub seed: Option<u64>,

    /// Log filter, overridden by RUST_LOG
    #[arg(long, env = "QUIZ_LOG_LEVEL", default_value = "warn")]
    pub log_level: String,

    /// Log output format
    #[arg(long, env = "QUIZ_LOG_FORMAT", value_enum, default_value_t = LogFormat::Pretty)]
    pub log_format: LogFormat,
}

impl Config {
    pub fn time_limit(&self) -> Duration {
        Duration::from_secs(self.time_limit)
    }
}
