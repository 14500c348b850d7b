use chrono::{Local, NaiveDateTime};

use crate::models::{FeedbackBand, SessionOutcome, SessionSummary};

/// Percentage of `correct` out of `total`, zero for an empty session.
pub fn percentage(correct: usize, total: usize) -> f64 {
    if total > 0 {
        (correct as f64 / total as f64) * 100.0
    } else {
        0.0
    }
}

/// Feedback band for a percentage score.
pub fn feedback(pct: f64) -> FeedbackBand {
    FeedbackBand::for_percentage(pct)
}

/// Accumulates outcomes for one session, in presentation order.
#[derive(Debug, Clone)]
pub struct SessionScorer {
    category: String,
    outcomes: Vec<SessionOutcome>,
}

impl SessionScorer {
    pub fn new(category: impl Into<String>) -> Self {
        Self {
            category: category.into(),
            outcomes: Vec::new(),
        }
    }

    pub fn record(&mut self, outcome: SessionOutcome) {
        self.outcomes.push(outcome);
    }

    pub fn outcomes(&self) -> &[SessionOutcome] {
        &self.outcomes
    }

    pub fn correct_count(&self) -> usize {
        self.outcomes.iter().filter(|o| o.is_correct).count()
    }

    pub fn total(&self) -> usize {
        self.outcomes.len()
    }

    pub fn finalize(self) -> SessionSummary {
        self.finalize_at(Local::now().naive_local())
    }

    /// Summarize with an explicit timestamp.
    pub fn finalize_at(self, timestamp: NaiveDateTime) -> SessionSummary {
        let correct = self.correct_count();
        let total = self.total();
        let pct = percentage(correct, total);

        SessionSummary {
            category: self.category,
            total,
            correct,
            percentage: pct,
            feedback: feedback(pct),
            timestamp,
        }
    }
}
