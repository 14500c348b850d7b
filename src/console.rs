//! Line-oriented front-end: category picker, question prompts, summary.

use std::io::{self, Write};
use std::time::Duration;

use rand::Rng;

use crate::data::ResultStore;
use crate::engine::{AnswerCollector, Collected, QuizEngine, SessionView};
use crate::error::{PersistenceError, QuizError};
use crate::models::{option_label, Category, CategoryBank, PresentedQuestion, SessionOutcome, SessionSummary};

const WRAP_WIDTH: usize = 80;
const RULE: &str = "========================================";

/// Greedy word wrap; runs of whitespace collapse to a single space.
fn wrap(text: &str, width: usize) -> Vec<String> {
    let mut lines = Vec::new();
    let mut current = String::new();

    for word in text.split_whitespace() {
        let needed = if current.is_empty() {
            word.chars().count()
        } else {
            current.chars().count() + 1 + word.chars().count()
        };
        if needed > width && !current.is_empty() {
            lines.push(std::mem::take(&mut current));
        }
        if !current.is_empty() {
            current.push(' ');
        }
        current.push_str(word);
    }
    if !current.is_empty() {
        lines.push(current);
    }
    lines
}

/// Writes prompts and feedback to any `Write` sink.
pub struct ConsoleView<W> {
    out: W,
}

impl<W: Write> ConsoleView<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }

    /// Ask for a category by number or exact name until a valid one is given.
    ///
    /// `None` when input ends or is interrupted.
    pub async fn choose_category<'b>(
        &mut self,
        bank: &'b CategoryBank,
        collector: &mut AnswerCollector,
    ) -> io::Result<Option<&'b Category>> {
        writeln!(self.out, "Available categories:")?;
        for (i, category) in bank.categories().iter().enumerate() {
            writeln!(
                self.out,
                "  {}. {} ({} questions)",
                i + 1,
                category.name(),
                category.questions().len()
            )?;
        }

        loop {
            write!(self.out, "Choose a category (1-{}): ", bank.len())?;
            self.out.flush()?;

            let Some(raw) = collector.read_line().await else {
                writeln!(self.out, "\nExiting.")?;
                return Ok(None);
            };
            let raw = raw.trim();

            let by_number = raw
                .parse::<usize>()
                .ok()
                .and_then(|n| n.checked_sub(1))
                .and_then(|i| bank.categories().get(i));
            if let Some(category) = by_number.or_else(|| bank.get(raw)) {
                return Ok(Some(category));
            }
            writeln!(self.out, "Invalid selection. Try again.")?;
        }
    }

    pub async fn ask_play_again(&mut self, collector: &mut AnswerCollector) -> io::Result<bool> {
        write!(self.out, "Would you like to try another category? (y/n): ")?;
        self.out.flush()?;

        let again = collector
            .read_line()
            .await
            .map(|line| matches!(line.trim().to_lowercase().as_str(), "y" | "yes"))
            .unwrap_or(false);
        Ok(again)
    }

    fn write_line(&mut self, text: &str) -> io::Result<()> {
        writeln!(self.out, "{}", text)
    }
}

impl<W: Write> SessionView for ConsoleView<W> {
    fn show_question(
        &mut self,
        number: usize,
        total: usize,
        question: &PresentedQuestion<'_>,
        time_limit: Duration,
    ) -> io::Result<()> {
        writeln!(self.out, "Question {}/{}:", number, total)?;
        for line in wrap(question.text(), WRAP_WIDTH) {
            self.write_line(&line)?;
        }
        for (index, option) in question.options().enumerate() {
            writeln!(self.out, "  {}. {}", option_label(index), option)?;
        }

        let last = option_label(question.num_options().saturating_sub(1));
        write!(
            self.out,
            "Your answer (A-{}) within {}s: ",
            last,
            time_limit.as_secs()
        )?;
        self.out.flush()
    }

    fn show_verdict(
        &mut self,
        question: &PresentedQuestion<'_>,
        outcome: &SessionOutcome,
        collected: &Collected,
    ) -> io::Result<()> {
        if outcome.is_correct {
            return writeln!(self.out, "Correct!\n");
        }

        match collected {
            Collected::Answer(_) => writeln!(
                self.out,
                "Wrong. Correct answer: {}. {}\n",
                question.correct_label(),
                question.correct_text()
            ),
            Collected::TimedOut => writeln!(self.out, "\nTime up! No answer recorded.\n"),
            Collected::Rejected(_) => writeln!(self.out, "Invalid answer. No answer recorded.\n"),
            Collected::Closed => writeln!(self.out, "\nInput closed. No answer recorded.\n"),
            Collected::Interrupted => writeln!(self.out, "\nInterrupted. No answer recorded.\n"),
        }
    }

    fn show_summary(&mut self, summary: &SessionSummary) -> io::Result<()> {
        writeln!(self.out, "{}", RULE)?;
        writeln!(self.out, "Quiz complete: {}", summary.category)?;
        writeln!(self.out, "Score: {}/{}", summary.correct, summary.total)?;
        writeln!(self.out, "Percentage: {}", summary.percentage_label())?;
        writeln!(
            self.out,
            "Feedback: {}: {}",
            summary.feedback.label(),
            summary.feedback.message()
        )?;
        writeln!(self.out, "{}", RULE)
    }

    fn show_persistence_error(&mut self, error: &PersistenceError) -> io::Result<()> {
        writeln!(self.out, "Could not save result: {}", error)
    }
}

/// Pick categories and play sessions until the player stops.
///
/// `start` names the first category; afterwards the player is asked.
pub async fn run<S, R, W>(
    bank: &CategoryBank,
    engine: &mut QuizEngine<S, R>,
    view: &mut ConsoleView<W>,
    start: Option<&str>,
) -> Result<(), QuizError>
where
    S: ResultStore,
    R: Rng,
    W: Write,
{
    view.write_line("\nWelcome to QuizMaster!\n")?;

    let mut start = start;
    loop {
        let category = match start.take() {
            Some(name) => bank
                .get(name)
                .ok_or_else(|| QuizError::UnknownCategory(name.to_string()))?,
            None => match view.choose_category(bank, engine.collector_mut()).await? {
                Some(category) => category,
                None => return Ok(()),
            },
        };

        view.write_line(&format!("\nStarting quiz: {}\n", category.name()))?;
        engine.play(category, view).await?;

        if !view.ask_play_again(engine.collector_mut()).await? {
            view.write_line("Thanks for playing QuizMaster. Goodbye!")?;
            return Ok(());
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::MemoryResultStore;
    use crate::engine::PresentationShuffler;
    use crate::models::Question;

    fn bank() -> CategoryBank {
        let mut bank = CategoryBank::new();
        for name in ["Math", "Science"] {
            let question = Question::new(
                format!("{} question", name),
                vec!["yes".to_string(), "no".to_string()],
                0,
            )
            .unwrap();
            bank.insert(name, vec![question]);
        }
        bank
    }

    fn output(view: ConsoleView<Vec<u8>>) -> String {
        String::from_utf8(view.into_inner()).unwrap()
    }

    #[test]
    fn test_wrap() {
        assert_eq!(wrap("a  b\tc", 80), ["a b c"]);
        assert_eq!(wrap("aaa bbb ccc", 7), ["aaa bbb", "ccc"]);
        assert_eq!(wrap("averyveryverylongword x", 5), ["averyveryverylongword", "x"]);
        assert!(wrap("   ", 10).is_empty());
    }

    #[tokio::test]
    async fn test_choose_category_retries() {
        let bank = bank();
        let (feed, mut collector) = AnswerCollector::channel();
        feed.send("7");
        feed.send("History");
        feed.send("Science");

        let mut view = ConsoleView::new(Vec::new());
        let chosen = view.choose_category(&bank, &mut collector).await.unwrap();
        assert_eq!(chosen.map(Category::name), Some("Science"));

        let text = output(view);
        assert!(text.contains("  1. Math (1 questions)"));
        assert_eq!(text.matches("Invalid selection. Try again.").count(), 2);
    }

    #[tokio::test]
    async fn test_choose_category_by_number() {
        let bank = bank();
        let (feed, mut collector) = AnswerCollector::channel();
        feed.send("1");

        let mut view = ConsoleView::new(Vec::new());
        let chosen = view.choose_category(&bank, &mut collector).await.unwrap();
        assert_eq!(chosen.map(Category::name), Some("Math"));
    }

    #[tokio::test]
    async fn test_choose_category_end_of_input() {
        let bank = bank();
        let (feed, mut collector) = AnswerCollector::channel();
        drop(feed);

        let mut view = ConsoleView::new(Vec::new());
        assert!(view.choose_category(&bank, &mut collector).await.unwrap().is_none());
        assert!(output(view).contains("Exiting."));
    }

    #[tokio::test]
    async fn test_full_console_run() {
        let bank = bank();
        let (feed, collector) = AnswerCollector::channel();
        // Category, an answer (either verdict is fine here), then decline.
        feed.send("Math");
        feed.send("1");
        feed.send("n");

        let mut engine = QuizEngine::new(
            PresentationShuffler::seeded(3),
            collector,
            MemoryResultStore::new(),
        );
        let mut view = ConsoleView::new(Vec::new());

        run(&bank, &mut engine, &mut view, None).await.unwrap();

        let text = output(view);
        assert!(text.contains("Starting quiz: Math"));
        assert!(text.contains("Question 1/1:"));
        assert!(text.contains("Your answer (A-B) within 15s: "));
        assert!(text.contains("Quiz complete: Math"));
        assert!(text.ends_with("Thanks for playing QuizMaster. Goodbye!\n"));
        assert_eq!(engine.store().rows().len(), 1);
    }

    #[tokio::test]
    async fn test_unknown_start_category() {
        let bank = bank();
        let (_feed, collector) = AnswerCollector::channel();
        let mut engine = QuizEngine::new(
            PresentationShuffler::seeded(3),
            collector,
            MemoryResultStore::new(),
        );
        let mut view = ConsoleView::new(Vec::new());

        let err = run(&bank, &mut engine, &mut view, Some("Poetry")).await.unwrap_err();
        assert!(matches!(err, QuizError::UnknownCategory(name) if name == "Poetry"));
    }

    #[test]
    fn test_verdict_messages() {
        let question = Question::new(
            "Capital of France?",
            vec!["Paris".to_string(), "Rome".to_string()],
            0,
        )
        .unwrap();
        let presented = PresentedQuestion::with_order(&question, vec![1, 0]).unwrap();
        let mut view = ConsoleView::new(Vec::new());

        view.show_verdict(&presented, &presented.outcome(Some(1)), &Collected::Answer(1))
            .unwrap();
        view.show_verdict(&presented, &presented.outcome(Some(0)), &Collected::Answer(0))
            .unwrap();
        view.show_verdict(&presented, &presented.outcome(None), &Collected::TimedOut)
            .unwrap();

        let text = output(view);
        assert!(text.starts_with("Correct!\n"));
        assert!(text.contains("Wrong. Correct answer: B. Paris"));
        assert!(text.contains("Time up! No answer recorded."));
    }
}
