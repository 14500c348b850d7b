use std::io;

use clap::Parser;
use tracing::{error, info};
use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use quizmaster::config::{Config, FrontEnd, LogFormat};
use quizmaster::{AnswerCollector, CsvResultStore, PresentationShuffler, Quiz, QuizEngine, QuizError};

#[tokio::main]
async fn main() {
    let config = Config::parse();
    init_logging(&config);

    if let Err(e) = run(config).await {
        error!(error = %e, "Quiz aborted");
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }
}

async fn run(config: Config) -> Result<(), QuizError> {
    let quiz = Quiz::from_json(&config.questions)?;
    info!(
        path = %config.questions.display(),
        categories = quiz.bank().len(),
        "Question bank ready"
    );

    let shuffler = match config.seed {
        Some(seed) => PresentationShuffler::seeded(seed),
        None => PresentationShuffler::from_entropy(),
    };
    let store = CsvResultStore::new(&config.results);
    let start = config.category.as_deref();

    match config.ui {
        FrontEnd::Console => {
            let mut engine = QuizEngine::new(shuffler, AnswerCollector::stdin()?, store)
                .with_time_limit(config.time_limit());
            quiz.run_console(&mut engine, io::stdout(), start).await
        }
        FrontEnd::Tui => quiz.run_tui(shuffler, store, config.time_limit(), start),
    }
}

/// Initialize tracing/logging on stderr.
fn init_logging(config: &Config) {
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    match config.log_format {
        LogFormat::Json => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().json().with_writer(io::stderr))
                .init();
        }
        LogFormat::Pretty => {
            tracing_subscriber::registry()
                .with(env_filter)
                .with(fmt::layer().with_writer(io::stderr))
                .init();
        }
    }
}
