//! The quiz session engine.

mod collector;
mod scorer;
mod session;
mod shuffle;

pub use collector::{parse_choice, AnswerCollector, AnswerFeed, Collected};
pub use scorer::{feedback, percentage, SessionScorer};
pub use session::{QuizEngine, SessionReport, SessionView, DEFAULT_TIME_LIMIT};
pub use shuffle::PresentationShuffler;
