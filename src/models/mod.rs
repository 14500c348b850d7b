mod question;
mod session;

pub use question::{Category, CategoryBank, Question, SkippedRecord};
pub use session::{
    option_label, FeedbackBand, PresentedQuestion, SessionOutcome, SessionSummary, MAX_OPTIONS,
    TIMESTAMP_FORMAT,
};

/// Screen currently shown by the terminal front-end.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AppState {
    /// Picking a category.
    Menu,
    /// Answering timed questions.
    Quiz,
    /// Looking at the scored summary.
    Result,
}
