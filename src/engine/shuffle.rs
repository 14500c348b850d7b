use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::{Rng, SeedableRng};

use crate::models::{PresentedQuestion, Question};

/// Randomizes question order and option positions for a session.
pub struct PresentationShuffler<R = StdRng> {
    rng: R,
}

impl PresentationShuffler<StdRng> {
    pub fn from_entropy() -> Self {
        Self::new(StdRng::from_os_rng())
    }

    /// Reproducible shuffling.
    pub fn seeded(seed: u64) -> Self {
        Self::new(StdRng::seed_from_u64(seed))
    }
}

impl<R: Rng> PresentationShuffler<R> {
    pub fn new(rng: R) -> Self {
        Self { rng }
    }

    /// Uniformly random presentation order over `questions`.
    pub fn order_questions<'a>(&mut self, questions: &'a [Question]) -> Vec<&'a Question> {
        let mut ordered: Vec<&Question> = questions.iter().collect();
        ordered.shuffle(&mut self.rng);
        ordered
    }

    /// Shuffle the options of `question` and remap its correct answer.
    pub fn present<'a>(&mut self, question: &'a Question) -> PresentedQuestion<'a> {
        let mut order: Vec<usize> = (0..question.options().len()).collect();
        order.shuffle(&mut self.rng);

        let correct_index = order
            .iter()
            .position(|&canonical| canonical == question.correct_option())
            .unwrap_or_default();
        PresentedQuestion::from_parts(question, order, correct_index)
    }
}
