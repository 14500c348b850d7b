use crate::error::RecordError;

use super::MAX_OPTIONS;

/// A multiple-choice question in canonical (unshuffled) option order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Question {
    text: String,
    options: Vec<String>,
    correct_option: usize,
}

impl Question {
    /// Build a validated question.
    ///
    /// Rejects empty text, fewer than two or more than [`MAX_OPTIONS`]
    /// options, and a correct index that does not point at one of them.
    pub fn new(
        text: impl Into<String>,
        options: Vec<String>,
        correct_option: usize,
    ) -> Result<Self, RecordError> {
        let text = text.into();
        if text.trim().is_empty() {
            return Err(RecordError::EmptyText);
        }
        if options.len() < 2 {
            return Err(RecordError::TooFewOptions {
                count: options.len(),
            });
        }
        if options.len() > MAX_OPTIONS {
            return Err(RecordError::TooManyOptions {
                count: options.len(),
                max: MAX_OPTIONS,
            });
        }
        if correct_option >= options.len() {
            return Err(RecordError::CorrectOptionOutOfRange {
                index: correct_option as i64,
                len: options.len(),
            });
        }

        Ok(Self {
            text,
            options,
            correct_option,
        })
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn options(&self) -> &[String] {
        &self.options
    }

    pub fn correct_option(&self) -> usize {
        self.correct_option
    }

    pub fn correct_text(&self) -> &str {
        &self.options[self.correct_option]
    }
}

/// Questions of a single category, in source order.
#[derive(Debug, Clone)]
pub struct Category {
    name: String,
    questions: Vec<Question>,
}

impl Category {
    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }
}

/// A record that failed validation during loading.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SkippedRecord {
    pub category: String,
    /// Position of the record within its category list (0-based).
    pub position: usize,
    pub reason: RecordError,
}

/// All playable categories, in the order the source listed them.
///
/// Every stored category holds at least one question.
#[derive(Debug, Clone, Default)]
pub struct CategoryBank {
    categories: Vec<Category>,
    skipped: Vec<SkippedRecord>,
}

impl CategoryBank {
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert a category. Empty question lists are dropped and a repeated
    /// name replaces the earlier entry in place.
    pub fn insert(&mut self, name: impl Into<String>, questions: Vec<Question>) -> bool {
        let name = name.into();
        if name.is_empty() || questions.is_empty() {
            return false;
        }

        match self.categories.iter_mut().find(|c| c.name == name) {
            Some(existing) => existing.questions = questions,
            None => self.categories.push(Category { name, questions }),
        }
        true
    }

    pub(crate) fn note_skipped(&mut self, record: SkippedRecord) {
        self.skipped.push(record);
    }

    pub fn get(&self, name: &str) -> Option<&Category> {
        self.categories.iter().find(|c| c.name == name)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.categories.iter().map(|c| c.name.as_str())
    }

    pub fn len(&self) -> usize {
        self.categories.len()
    }

    pub fn is_empty(&self) -> bool {
        self.categories.is_empty()
    }

    /// Records rejected while loading, with the reason for each.
    pub fn skipped(&self) -> &[SkippedRecord] {
        &self.skipped
    }
}
