use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Fatal errors raised while loading the question bank.
#[derive(Debug, Error)]
pub enum LoadError {
    /// The question source is missing or could not be read.
    #[error("cannot read question source {path}: {source}")]
    DataSource {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    /// The question source is not JSON of the expected shape.
    #[error("malformed question source {path}: {message}")]
    MalformedFormat { path: PathBuf, message: String },
}

/// Reasons a single question record is rejected. Never fatal to a load.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RecordError {
    #[error("record is not an object")]
    NotAnObject,

    #[error("missing field `{0}`")]
    MissingField(&'static str),

    #[error("field `{field}` must be {expected}")]
    WrongType {
        field: &'static str,
        expected: &'static str,
    },

    #[error("question text is empty")]
    EmptyText,

    #[error("expected at least 2 options, found {count}")]
    TooFewOptions { count: usize },

    #[error("expected at most {max} options, found {count}")]
    TooManyOptions { count: usize, max: usize },

    #[error("correct_option {value} is not a number")]
    NonNumericCorrectOption { value: String },

    #[error("correct_option {index} is out of range for {len} options")]
    CorrectOptionOutOfRange { index: i64, len: usize },
}

/// Failure to append a session summary to the result store.
#[derive(Debug, Error)]
pub enum PersistenceError {
    #[error("cannot write results to {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("cannot encode result row for {path}: {source}")]
    Csv {
        path: PathBuf,
        #[source]
        source: csv::Error,
    },
}

/// Error type for quiz operations.
#[derive(Debug, Error)]
pub enum QuizError {
    /// Error loading questions from file.
    #[error("Failed to load questions: {0}")]
    Load(#[from] LoadError),

    /// The bank loaded but holds no playable category.
    #[error("No categories available in {0}")]
    EmptyBank(PathBuf),

    /// The requested category does not exist in the bank.
    #[error("Unknown category: {0}")]
    UnknownCategory(String),

    /// IO error during quiz execution.
    #[error("IO error: {0}")]
    Io(#[from] io::Error),
}
