//! End-to-end sessions through the public API: load a bank from disk, play
//! with scripted answers, check the CSV result file.

use std::fs;
use std::time::Duration;

use quizmaster::{
    AnswerCollector, CsvResultStore, FeedbackBand, PresentationShuffler, Quiz, QuizEngine,
    RESULT_HEADER,
};

const BANK: &str = r#"{
    "categories": {
        "Math": [
            {"question_text": "2 + 2?", "options": ["3", "4", "5", "22"], "correct_option": 1},
            {"question_text": "3 * 3?", "options": ["9", "6", "33", "0"], "correct_option": 0},
            {"question_text": "10 / 2?", "options": ["2", "8", "5", "20"], "correct_option": 2},
            {"question_text": "7 - 4?", "options": ["11", "4", "28", "3"], "correct_option": 3},
            {"question_text": "Broken record", "correct_option": 0}
        ],
        "Empty": [
            {"question_text": "No options", "options": [], "correct_option": 0}
        ]
    }
}"#;

const SEED: u64 = 2024;

fn correct_labels(quiz: &Quiz, category: &str) -> Vec<char> {
    let questions = quiz.bank().get(category).unwrap().questions();
    let mut preview = PresentationShuffler::seeded(SEED);
    preview
        .order_questions(questions)
        .into_iter()
        .map(|q| preview.present(q).correct_label())
        .collect()
}

#[tokio::test]
async fn test_three_of_four_session_appends_one_row() {
    let dir = tempfile::tempdir().unwrap();
    let questions_path = dir.path().join("questions.json");
    let results_path = dir.path().join("results.csv");
    fs::write(&questions_path, BANK).unwrap();

    let quiz = Quiz::from_json(&questions_path).unwrap();
    assert_eq!(quiz.bank().names().collect::<Vec<_>>(), ["Math"]);
    assert_eq!(quiz.bank().get("Math").unwrap().questions().len(), 4);
    assert_eq!(quiz.bank().skipped().len(), 2);

    let labels = correct_labels(&quiz, "Math");
    let (feed, collector) = AnswerCollector::channel();
    for (i, label) in labels.iter().enumerate() {
        // Miss the last question by answering with a different label.
        let answer = if i == 3 {
            if *label == 'A' { 'B' } else { 'A' }
        } else {
            label.to_ascii_lowercase()
        };
        feed.send(answer.to_string());
    }
    feed.send("n");

    let mut engine = QuizEngine::new(
        PresentationShuffler::seeded(SEED),
        collector,
        CsvResultStore::new(&results_path),
    )
    .with_time_limit(Duration::from_secs(5));

    let mut out = Vec::new();
    quiz.run_console(&mut engine, &mut out, Some("Math"))
        .await
        .unwrap();

    let text = String::from_utf8(out).unwrap();
    assert_eq!(text.matches("Correct!").count(), 3);
    assert_eq!(text.matches("Wrong. Correct answer:").count(), 1);
    assert!(text.contains("Score: 3/4"));
    assert!(text.contains("Percentage: 75.00%"));
    assert!(text.contains(&format!("Feedback: {}", FeedbackBand::VeryGood.label())));

    let content = fs::read_to_string(&results_path).unwrap();
    let lines: Vec<_> = content.lines().collect();
    assert_eq!(lines.len(), 2);
    assert_eq!(lines[0], RESULT_HEADER.join(","));

    let fields: Vec<_> = lines[1].split(',').collect();
    assert_eq!(fields[1..], ["Math", "3", "4", "75.00%"]);
    assert_eq!(fields[0].len(), "2024-01-01 00:00:00".len());
}

#[tokio::test(start_paused = true)]
async fn test_silent_player_scores_zero() {
    let dir = tempfile::tempdir().unwrap();
    let questions_path = dir.path().join("questions.json");
    let results_path = dir.path().join("results.csv");
    fs::write(&questions_path, BANK).unwrap();

    let quiz = Quiz::from_json(&questions_path).unwrap();
    let (_feed, collector) = AnswerCollector::channel();
    let mut engine = QuizEngine::new(
        PresentationShuffler::seeded(SEED),
        collector,
        CsvResultStore::new(&results_path),
    );

    let category = quiz.bank().get("Math").unwrap();
    let mut view = quizmaster::ConsoleView::new(Vec::new());
    let report = engine.play(category, &mut view).await.unwrap();

    assert_eq!(report.summary.correct, 0);
    assert_eq!(report.summary.feedback, FeedbackBand::TryAgain);
    assert!(report.outcomes.iter().all(|o| o.chosen.is_none()));

    let text = String::from_utf8(view.into_inner()).unwrap();
    assert_eq!(text.matches("Time up! No answer recorded.").count(), 4);
    assert!(fs::read_to_string(&results_path).unwrap().ends_with(",Math,0,4,0.00%\n"));
}
