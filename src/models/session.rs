use std::fmt;

use chrono::NaiveDateTime;

use super::Question;

/// Timestamp layout used by the result store.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Most options a question can carry; one letter label each.
pub const MAX_OPTIONS: usize = 26;

/// Display label for the option at `index`: `A`, `B`, `C`, ...
///
/// Indices past the alphabet map to `?`; `Question::new` never lets one through.
pub fn option_label(index: usize) -> char {
    u8::try_from(index)
        .ok()
        .filter(|&i| usize::from(i) < MAX_OPTIONS)
        .map_or('?', |i| char::from(b'A' + i))
}

/// A question as shown in one session: options permuted, correct index remapped.
#[derive(Debug, Clone)]
pub struct PresentedQuestion<'a> {
    question: &'a Question,
    /// `order[shown] == canonical` index into `question.options()`.
    order: Vec<usize>,
    correct_index: usize,
}

impl<'a> PresentedQuestion<'a> {
    /// Apply `order` to the question's options.
    ///
    /// Returns `None` unless `order` is a permutation of `0..options.len()`.
    pub fn with_order(question: &'a Question, order: Vec<usize>) -> Option<Self> {
        let len = question.options().len();
        if order.len() != len {
            return None;
        }
        let mut seen = vec![false; len];
        for &canonical in &order {
            if canonical >= len || std::mem::replace(&mut seen[canonical], true) {
                return None;
            }
        }

        let correct_index = order
            .iter()
            .position(|&canonical| canonical == question.correct_option())?;

        Some(Self {
            question,
            order,
            correct_index,
        })
    }

    /// `order` must already be a permutation with `correct_index` remapped.
    pub(crate) fn from_parts(question: &'a Question, order: Vec<usize>, correct_index: usize) -> Self {
        Self {
            question,
            order,
            correct_index,
        }
    }

    pub fn question(&self) -> &'a Question {
        self.question
    }

    pub fn text(&self) -> &'a str {
        self.question.text()
    }

    pub fn num_options(&self) -> usize {
        self.order.len()
    }

    /// Option text at displayed position `index`.
    pub fn option(&self, index: usize) -> Option<&'a str> {
        let question = self.question;
        self.order
            .get(index)
            .map(|&canonical| question.options()[canonical].as_str())
    }

    /// Options in displayed order.
    pub fn options(&self) -> impl Iterator<Item = &'a str> + '_ {
        let question = self.question;
        self.order
            .iter()
            .map(move |&canonical| question.options()[canonical].as_str())
    }

    pub fn correct_index(&self) -> usize {
        self.correct_index
    }

    pub fn correct_label(&self) -> char {
        option_label(self.correct_index)
    }

    pub fn correct_text(&self) -> &'a str {
        self.question.correct_text()
    }

    /// Score a collected answer against this presentation.
    pub fn outcome(&self, chosen: Option<usize>) -> SessionOutcome {
        SessionOutcome::new(self.correct_index, chosen)
    }
}

/// The result of one presented question.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SessionOutcome {
    pub correct_index: usize,
    /// `None` when the question timed out or input was interrupted.
    pub chosen: Option<usize>,
    pub is_correct: bool,
}

impl SessionOutcome {
    pub fn new(correct_index: usize, chosen: Option<usize>) -> Self {
        Self {
            correct_index,
            chosen,
            is_correct: chosen == Some(correct_index),
        }
    }

    pub fn is_unanswered(&self) -> bool {
        self.chosen.is_none()
    }
}

/// Qualitative grade for a percentage score.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FeedbackBand {
    Excellent,
    VeryGood,
    Good,
    TryAgain,
}

impl FeedbackBand {
    /// Classify a percentage. Each band includes its lower bound.
    pub fn for_percentage(pct: f64) -> Self {
        if pct >= 90.0 {
            Self::Excellent
        } else if pct >= 75.0 {
            Self::VeryGood
        } else if pct >= 50.0 {
            Self::Good
        } else {
            Self::TryAgain
        }
    }

    pub fn label(self) -> &'static str {
        match self {
            Self::Excellent => "Excellent",
            Self::VeryGood => "Very Good",
            Self::Good => "Good",
            Self::TryAgain => "Try Again",
        }
    }

    /// Encouragement shown next to the label.
    pub fn message(self) -> &'static str {
        match self {
            Self::Excellent => "outstanding performance!",
            Self::VeryGood => "keep it up!",
            Self::Good => "room for improvement.",
            Self::TryAgain => "practice more and try once more.",
        }
    }
}

impl fmt::Display for FeedbackBand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Final, immutable record of a finished session.
#[derive(Debug, Clone, PartialEq)]
pub struct SessionSummary {
    pub category: String,
    pub total: usize,
    pub correct: usize,
    /// Unrounded; formatted to two decimals for display and storage.
    pub percentage: f64,
    pub feedback: FeedbackBand,
    pub timestamp: NaiveDateTime,
}

impl SessionSummary {
    /// Percentage as stored: two decimals, ties to even, and a trailing `%`.
    pub fn percentage_label(&self) -> String {
        format!("{:.2}%", self.percentage)
    }

    pub fn timestamp_label(&self) -> String {
        self.timestamp.format(TIMESTAMP_FORMAT).to_string()
    }
}
