use std::io;
use std::time::Duration;

use rand::rngs::StdRng;
use rand::Rng;
use tracing::{error, info};

use crate::data::ResultStore;
use crate::error::PersistenceError;
use crate::models::{Category, PresentedQuestion, SessionOutcome, SessionSummary};

use super::collector::{AnswerCollector, Collected};
use super::scorer::SessionScorer;
use super::shuffle::PresentationShuffler;

/// Default time allowed per question.
pub const DEFAULT_TIME_LIMIT: Duration = Duration::from_secs(15);

/// What a front-end shows while a session runs.
pub trait SessionView {
    /// Called before the answer for question `number` (1-based) is collected.
    fn show_question(
        &mut self,
        number: usize,
        total: usize,
        question: &PresentedQuestion<'_>,
        time_limit: Duration,
    ) -> io::Result<()>;

    fn show_verdict(
        &mut self,
        question: &PresentedQuestion<'_>,
        outcome: &SessionOutcome,
        collected: &Collected,
    ) -> io::Result<()>;

    fn show_summary(&mut self, summary: &SessionSummary) -> io::Result<()>;

    fn show_persistence_error(&mut self, error: &PersistenceError) -> io::Result<()>;
}

/// Outcome of a played session.
#[derive(Debug)]
pub struct SessionReport {
    pub summary: SessionSummary,
    pub outcomes: Vec<SessionOutcome>,
    /// Set when the summary could not be stored. The score was still shown.
    pub persistence_error: Option<PersistenceError>,
}

/// Runs sessions: shuffles, collects timed answers, scores, records.
pub struct QuizEngine<S, R = StdRng> {
    shuffler: PresentationShuffler<R>,
    collector: AnswerCollector,
    store: S,
    time_limit: Duration,
}

impl<S: ResultStore, R: Rng> QuizEngine<S, R> {
    pub fn new(shuffler: PresentationShuffler<R>, collector: AnswerCollector, store: S) -> Self {
        Self {
            shuffler,
            collector,
            store,
            time_limit: DEFAULT_TIME_LIMIT,
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn time_limit(&self) -> Duration {
        self.time_limit
    }

    /// Input source shared with menus, so prompts never race the session.
    pub fn collector_mut(&mut self) -> &mut AnswerCollector {
        &mut self.collector
    }

    pub fn store(&self) -> &S {
        &self.store
    }

    /// Play one session over every question of `category`.
    ///
    /// The summary reaches `view` before the store is written; a store
    /// failure is reported on the returned report, never as an error.
    pub async fn play<V: SessionView>(
        &mut self,
        category: &Category,
        view: &mut V,
    ) -> io::Result<SessionReport> {
        let ordered = self.shuffler.order_questions(category.questions());
        let total = ordered.len();
        info!(category = %category.name(), questions = total, "Starting session");

        let mut scorer = SessionScorer::new(category.name());
        for (index, question) in ordered.into_iter().enumerate() {
            let presented = self.shuffler.present(question);
            view.show_question(index + 1, total, &presented, self.time_limit)?;

            let collected = self
                .collector
                .collect_detailed(presented.num_options(), self.time_limit)
                .await;
            let outcome = presented.outcome(collected.index());

            view.show_verdict(&presented, &outcome, &collected)?;
            scorer.record(outcome);
        }

        let outcomes = scorer.outcomes().to_vec();
        let summary = scorer.finalize();
        view.show_summary(&summary)?;
        info!(
            category = %summary.category,
            score = summary.correct,
            total = summary.total,
            percentage = summary.percentage,
            "Session finished"
        );

        let persistence_error = match self.store.append(&summary) {
            Ok(()) => None,
            Err(err) => {
                error!(error = %err, "Failed to record session result");
                view.show_persistence_error(&err)?;
                Some(err)
            }
        };

        Ok(SessionReport {
            summary,
            outcomes,
            persistence_error,
        })
    }
}
