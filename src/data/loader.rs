use std::fs;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use tracing::{info, warn};

use crate::error::{LoadError, RecordError};
use crate::models::{CategoryBank, Question, SkippedRecord};

pub const DEFAULT_QUESTIONS_PATH: &str = "questions.json";

/// Optional wrapper key around the category map.
const CATEGORIES_KEY: &str = "categories";

/// Read and validate a question bank from a JSON file.
///
/// Invalid records are skipped with a warning; only an unreadable file or a
/// document that is not a JSON object fails the load.
pub fn load_questions_from_json<P: AsRef<Path>>(path: P) -> Result<CategoryBank, LoadError> {
    let path = path.as_ref();

    let json_content = fs::read_to_string(path).map_err(|source| LoadError::DataSource {
        path: path.to_path_buf(),
        source,
    })?;

    parse_questions(&json_content, path)
}

/// Parse a question bank document. `origin` only labels errors.
pub fn parse_questions(
    json_content: &str,
    origin: impl Into<PathBuf>,
) -> Result<CategoryBank, LoadError> {
    let origin = origin.into();
    let malformed = |message: String| LoadError::MalformedFormat {
        path: origin.clone(),
        message,
    };

    let document: Value =
        serde_json::from_str(json_content).map_err(|err| malformed(err.to_string()))?;
    let Value::Object(top) = document else {
        return Err(malformed(
            "top level must be an object keyed by category name".to_string(),
        ));
    };

    let categories = match top.get(CATEGORIES_KEY) {
        Some(Value::Object(inner)) => inner,
        _ => &top,
    };

    let bank = build_bank(categories);
    info!(
        path = %origin.display(),
        categories = bank.len(),
        skipped = bank.skipped().len(),
        "Loaded question bank"
    );
    Ok(bank)
}

fn build_bank(categories: &Map<String, Value>) -> CategoryBank {
    let mut bank = CategoryBank::new();

    for (name, records) in categories {
        if name.trim().is_empty() {
            warn!("Skipping category with an empty name");
            continue;
        }
        let Value::Array(records) = records else {
            warn!(category = %name, "Skipping category: expected a list of questions");
            continue;
        };

        let mut questions = Vec::with_capacity(records.len());
        for (position, record) in records.iter().enumerate() {
            match parse_record(record) {
                Ok(question) => questions.push(question),
                Err(reason) => {
                    warn!(
                        category = %name,
                        position,
                        error = %reason,
                        "Skipping invalid question"
                    );
                    bank.note_skipped(SkippedRecord {
                        category: name.clone(),
                        position,
                        reason,
                    });
                }
            }
        }

        if !bank.insert(name.as_str(), questions) {
            warn!(category = %name, "Dropping category with no valid questions");
        }
    }

    bank
}

fn parse_record(record: &Value) -> Result<Question, RecordError> {
    let fields = record.as_object().ok_or(RecordError::NotAnObject)?;

    let text = match required(fields, "question_text")? {
        Value::String(text) => text.as_str(),
        _ => {
            return Err(RecordError::WrongType {
                field: "question_text",
                expected: "a string",
            });
        }
    };

    let options = match required(fields, "options")? {
        Value::Array(items) => items
            .iter()
            .map(|item| item.as_str().map(str::to_string))
            .collect::<Option<Vec<_>>>()
            .ok_or(RecordError::WrongType {
                field: "options",
                expected: "a list of strings",
            })?,
        _ => {
            return Err(RecordError::WrongType {
                field: "options",
                expected: "a list of strings",
            });
        }
    };

    let index = parse_index(required(fields, "correct_option")?)?;
    let correct_option = match usize::try_from(index) {
        Ok(index) => index,
        Err(_) if options.len() < 2 => {
            return Err(RecordError::TooFewOptions {
                count: options.len(),
            });
        }
        Err(_) => {
            return Err(RecordError::CorrectOptionOutOfRange {
                index,
                len: options.len(),
            });
        }
    };

    Question::new(text, options, correct_option)
}

fn required<'a>(fields: &'a Map<String, Value>, field: &'static str) -> Result<&'a Value, RecordError> {
    match fields.get(field) {
        None | Some(Value::Null) => Err(RecordError::MissingField(field)),
        Some(value) => Ok(value),
    }
}

/// Accepts integers, integral floats and numeric strings.
fn parse_index(value: &Value) -> Result<i64, RecordError> {
    let parsed = match value {
        Value::Number(number) => number.as_i64().or_else(|| {
            number
                .as_f64()
                .filter(|f| f.fract() == 0.0 && f.abs() < i64::MAX as f64)
                .map(|f| f as i64)
        }),
        Value::String(text) => text.trim().parse().ok(),
        _ => None,
    };

    parsed.ok_or_else(|| RecordError::NonNumericCorrectOption {
        value: value.to_string(),
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(json: &str) -> CategoryBank {
        parse_questions(json, "inline.json").unwrap()
    }

    #[test]
    fn test_skips_record_missing_options() {
        let bank = parse(
            r#"{
                "Math": [
                    {"question_text": "1 + 1?", "options": ["1", "2"], "correct_option": 1},
                    {"question_text": "2 * 3?", "options": ["6", "5", "8"], "correct_option": 0},
                    {"question_text": "3 - 1?", "correct_option": 0}
                ]
            }"#,
        );

        let math = bank.get("Math").unwrap();
        assert_eq!(math.questions().len(), 2);
        assert_eq!(bank.skipped().len(), 1);
        assert_eq!(bank.skipped()[0].position, 2);
        assert_eq!(bank.skipped()[0].reason, RecordError::MissingField("options"));
    }

    #[test]
    fn test_accepts_categories_wrapper() {
        let bank = parse(
            r#"{"categories": {"Science": [
                {"question_text": "H2O is?", "options": ["Water", "Salt"], "correct_option": 0}
            ]}}"#,
        );
        assert_eq!(bank.names().collect::<Vec<_>>(), ["Science"]);
    }

    #[test]
    fn test_keeps_source_category_order() {
        let bank = parse(
            r#"{
                "Zoology": [{"question_text": "q", "options": ["a", "b"], "correct_option": 0}],
                "Art": [{"question_text": "q", "options": ["a", "b"], "correct_option": 1}]
            }"#,
        );
        assert_eq!(bank.names().collect::<Vec<_>>(), ["Zoology", "Art"]);
    }

    #[test]
    fn test_coerces_numeric_correct_option() {
        let bank = parse(
            r#"{"Mixed": [
                {"question_text": "a", "options": ["x", "y", "z"], "correct_option": "2"},
                {"question_text": "b", "options": ["x", "y"], "correct_option": 1.0},
                {"question_text": "c", "options": ["x", "y"], "correct_option": "one"},
                {"question_text": "d", "options": ["x", "y"], "correct_option": true}
            ]}"#,
        );

        let mixed = bank.get("Mixed").unwrap();
        assert_eq!(mixed.questions().len(), 2);
        assert_eq!(mixed.questions()[0].correct_option(), 2);
        assert_eq!(mixed.questions()[1].correct_option(), 1);
        assert!(matches!(
            bank.skipped()[0].reason,
            RecordError::NonNumericCorrectOption { .. }
        ));
    }

    #[test]
    fn test_rejects_invalid_records() {
        let bank = parse(
            r#"{"Bad": [
                {"question_text": "a", "options": ["x", "y"], "correct_option": 2},
                {"question_text": "b", "options": ["x", "y"], "correct_option": -1},
                {"question_text": "c", "options": ["x"], "correct_option": 0},
                {"question_text": "", "options": ["x", "y"], "correct_option": 0},
                {"question_text": "e", "options": ["x", 3], "correct_option": 0},
                "not a record"
            ]}"#,
        );

        assert!(bank.is_empty());
        let reasons: Vec<_> = bank.skipped().iter().map(|s| s.reason.clone()).collect();
        assert_eq!(
            reasons,
            vec![
                RecordError::CorrectOptionOutOfRange { index: 2, len: 2 },
                RecordError::CorrectOptionOutOfRange { index: -1, len: 2 },
                RecordError::TooFewOptions { count: 1 },
                RecordError::EmptyText,
                RecordError::WrongType {
                    field: "options",
                    expected: "a list of strings"
                },
                RecordError::NotAnObject,
            ]
        );
    }

    #[test]
    fn test_skips_non_list_category() {
        let bank = parse(
            r#"{
                "Broken": {"question_text": "a"},
                "Fine": [{"question_text": "q", "options": ["a", "b"], "correct_option": 0}]
            }"#,
        );
        assert_eq!(bank.names().collect::<Vec<_>>(), ["Fine"]);
    }

    #[test]
    fn test_malformed_document() {
        let err = parse_questions("{ not json", "broken.json").unwrap_err();
        assert!(matches!(err, LoadError::MalformedFormat { .. }));

        let err = parse_questions("[1, 2, 3]", "array.json").unwrap_err();
        assert!(matches!(err, LoadError::MalformedFormat { .. }));
    }

    #[test]
    fn test_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let err = load_questions_from_json(dir.path().join("absent.json")).unwrap_err();
        assert!(matches!(err, LoadError::DataSource { .. }));
    }

    #[test]
    fn test_loads_from_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("questions.json");
        fs::write(
            &path,
            r#"{"History": [{"question_text": "Year?", "options": ["1066", "1492"], "correct_option": 0}]}"#,
        )
        .unwrap();

        let bank = load_questions_from_json(&path).unwrap();
        assert_eq!(bank.get("History").unwrap().questions()[0].text(), "Year?");
    }
}
