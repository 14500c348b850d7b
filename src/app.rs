use std::time::{Duration, Instant};

use rand::rngs::StdRng;
use tracing::{error, info};

use crate::data::ResultStore;
use crate::engine::{parse_choice, PresentationShuffler, SessionScorer, DEFAULT_TIME_LIMIT};
use crate::models::{
    AppState, Category, CategoryBank, PresentedQuestion, Question, SessionOutcome,
    SessionSummary,
};

/// One line of the result breakdown.
pub struct AnsweredQuestion<'b> {
    pub question: &'b Question,
    pub outcome: SessionOutcome,
}

/// A session in progress.
struct Round<'b> {
    category: &'b Category,
    ordered: Vec<&'b Question>,
    /// Index into `ordered` of the question on screen.
    current_index: usize,
    /// `None` once the current question has been settled.
    current: Option<PresentedQuestion<'b>>,
    deadline: Instant,
    scorer: SessionScorer,
    answered: Vec<AnsweredQuestion<'b>>,
}

/// Terminal front-end state: category menu, timed questions, results.
pub struct App<'b> {
    pub state: AppState,
    bank: &'b CategoryBank,
    shuffler: PresentationShuffler<StdRng>,
    store: Box<dyn ResultStore + 'b>,
    time_limit: Duration,
    selected_category: usize,
    selected_option: usize,
    round: Option<Round<'b>>,
    last_verdict: Option<String>,
    summary: Option<SessionSummary>,
    answered: Vec<AnsweredQuestion<'b>>,
    pending_persist: bool,
    persistence_message: Option<String>,
    result_scroll: usize,
}

impl<'b> App<'b> {
    pub fn new(
        bank: &'b CategoryBank,
        shuffler: PresentationShuffler<StdRng>,
        store: impl ResultStore + 'b,
    ) -> Self {
        Self {
            state: AppState::Menu,
            bank,
            shuffler,
            store: Box::new(store),
            time_limit: DEFAULT_TIME_LIMIT,
            selected_category: 0,
            selected_option: 0,
            round: None,
            last_verdict: None,
            summary: None,
            answered: Vec::new(),
            pending_persist: false,
            persistence_message: None,
            result_scroll: 0,
        }
    }

    pub fn with_time_limit(mut self, time_limit: Duration) -> Self {
        self.time_limit = time_limit;
        self
    }

    pub fn categories(&self) -> &'b [Category] {
        self.bank.categories()
    }

    pub fn selected_category(&self) -> usize {
        self.selected_category
    }

    pub fn select_next_category(&mut self) {
        let count = self.bank.len().max(1);
        self.selected_category = (self.selected_category + 1) % count;
    }

    pub fn select_previous_category(&mut self) {
        let count = self.bank.len().max(1);
        self.selected_category = (self.selected_category + count - 1) % count;
    }

    /// Select a category by name, for starting straight into a quiz.
    pub fn select_category_named(&mut self, name: &str) -> bool {
        match self.bank.categories().iter().position(|c| c.name() == name) {
            Some(index) => {
                self.selected_category = index;
                true
            }
            None => false,
        }
    }

    pub fn start_quiz(&mut self, now: Instant) {
        let Some(category) = self.bank.categories().get(self.selected_category) else {
            return;
        };
        info!(category = %category.name(), questions = category.questions().len(), "Starting session");

        let ordered = self.shuffler.order_questions(category.questions());
        self.round = Some(Round {
            category,
            ordered,
            current_index: 0,
            current: None,
            deadline: now,
            scorer: SessionScorer::new(category.name()),
            answered: Vec::new(),
        });
        self.last_verdict = None;
        self.summary = None;
        self.persistence_message = None;
        self.state = AppState::Quiz;
        self.present_current(now);
    }

    fn present_current(&mut self, now: Instant) {
        let next = self
            .round
            .as_ref()
            .map(|r| r.ordered.get(r.current_index).copied());

        match next {
            Some(Some(question)) => {
                let presented = self.shuffler.present(question);
                if let Some(round) = self.round.as_mut() {
                    round.current = Some(presented);
                    round.deadline = now + self.time_limit;
                }
                self.selected_option = 0;
            }
            Some(None) => self.finish(),
            None => {}
        }
    }

    pub fn current_question(&self) -> Option<&PresentedQuestion<'b>> {
        self.round.as_ref()?.current.as_ref()
    }

    pub fn current_question_number(&self) -> usize {
        self.round.as_ref().map_or(0, |r| r.current_index + 1)
    }

    pub fn total_questions(&self) -> usize {
        self.round.as_ref().map_or(0, |r| r.ordered.len())
    }

    pub fn category_name(&self) -> Option<&'b str> {
        self.round.as_ref().map(|r| r.category.name())
    }

    pub fn selected_option(&self) -> usize {
        self.selected_option
    }

    pub fn last_verdict(&self) -> Option<&str> {
        self.last_verdict.as_deref()
    }

    /// Time left on the current question.
    pub fn remaining(&self, now: Instant) -> Duration {
        self.round
            .as_ref()
            .map_or(Duration::ZERO, |r| r.deadline.saturating_duration_since(now))
    }

    pub fn select_next_option(&mut self) {
        if let Some(count) = self.current_question().map(PresentedQuestion::num_options) {
            self.selected_option = (self.selected_option + 1) % count;
        }
    }

    pub fn select_previous_option(&mut self) {
        if let Some(count) = self.current_question().map(PresentedQuestion::num_options) {
            self.selected_option = (self.selected_option + count - 1) % count;
        }
    }

    pub fn submit_selected(&mut self, now: Instant) {
        let selected = self.selected_option;
        self.settle(Some(selected), now);
    }

    /// Answer with a typed label or numeral. A key naming no option settles
    /// the question with no answer.
    pub fn submit_key(&mut self, key: char, now: Instant) {
        let Some(count) = self.current_question().map(PresentedQuestion::num_options) else {
            return;
        };
        let choice = parse_choice(&key.to_string(), count);
        self.settle(choice, now);
    }

    /// Advance the clock; an expired question is settled with no answer.
    pub fn tick(&mut self, now: Instant) {
        let expired = self
            .round
            .as_ref()
            .is_some_and(|r| r.current.is_some() && now >= r.deadline);
        if self.state == AppState::Quiz && expired {
            self.settle(None, now);
        }
    }

    /// Record the current question exactly once, then move on.
    fn settle(&mut self, chosen: Option<usize>, now: Instant) {
        let Some(round) = self.round.as_mut() else {
            return;
        };
        let Some(presented) = round.current.take() else {
            return;
        };

        let outcome = presented.outcome(chosen);
        self.last_verdict = Some(if outcome.is_correct {
            "Correct!".to_string()
        } else if chosen.is_some() {
            format!(
                "Wrong. Correct answer: {}. {}",
                presented.correct_label(),
                presented.correct_text()
            )
        } else {
            "Time up! No answer recorded.".to_string()
        });

        round.scorer.record(outcome);
        round.answered.push(AnsweredQuestion {
            question: presented.question(),
            outcome,
        });
        round.current_index += 1;
        self.present_current(now);
    }

    fn finish(&mut self) {
        let Some(round) = self.round.take() else {
            return;
        };
        let summary = round.scorer.finalize();
        info!(
            category = %summary.category,
            score = summary.correct,
            total = summary.total,
            "Session finished"
        );

        self.answered = round.answered;
        self.summary = Some(summary);
        self.pending_persist = true;
        self.result_scroll = 0;
        self.state = AppState::Result;
    }

    /// Store the finished summary. Called after the result screen is drawn.
    pub fn persist_pending(&mut self) {
        if !std::mem::take(&mut self.pending_persist) {
            return;
        }
        let Some(summary) = self.summary.as_ref() else {
            return;
        };

        self.persistence_message = Some(match self.store.append(summary) {
            Ok(()) => "Result saved.".to_string(),
            Err(err) => {
                error!(error = %err, "Failed to record session result");
                format!("Could not save result: {}", err)
            }
        });
    }

    pub fn summary(&self) -> Option<&SessionSummary> {
        self.summary.as_ref()
    }

    pub fn answered(&self) -> &[AnsweredQuestion<'b>] {
        &self.answered
    }

    pub fn persistence_message(&self) -> Option<&str> {
        self.persistence_message.as_deref()
    }

    pub fn result_scroll(&self) -> usize {
        self.result_scroll
    }

    pub fn scroll_results_down(&mut self) {
        if self.result_scroll + 1 < self.answered.len() {
            self.result_scroll += 1;
        }
    }

    pub fn scroll_results_up(&mut self) {
        self.result_scroll = self.result_scroll.saturating_sub(1);
    }

    pub fn restart(&mut self) {
        self.state = AppState::Menu;
        self.round = None;
        self.selected_option = 0;
        self.last_verdict = None;
        self.result_scroll = 0;
    }
}
