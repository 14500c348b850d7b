use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;
use crate::models::{FeedbackBand, SessionSummary};

const QUESTION_PREVIEW_LENGTH: usize = 55;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let Some(summary) = app.summary() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(8),
        Constraint::Fill(1),
        Constraint::Length(1),
        Constraint::Length(2),
    ])
    .margin(1)
    .split(area);

    render_score_summary(frame, chunks[1], summary);
    render_question_breakdown(frame, chunks[2], app, app.result_scroll());
    render_persistence(frame, chunks[3], app.persistence_message());
    render_controls(frame, chunks[4]);
}

fn grade_color(band: FeedbackBand) -> Color {
    match band {
        FeedbackBand::Excellent => Color::Green,
        FeedbackBand::VeryGood => Color::Cyan,
        FeedbackBand::Good => Color::Yellow,
        FeedbackBand::TryAgain => Color::Red,
    }
}

fn render_score_summary(frame: &mut Frame, area: Rect, summary: &SessionSummary) {
    let color = grade_color(summary.feedback);
    let content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "RESULTS",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(summary.category.as_str().fg(Color::DarkGray)),
        Line::from(""),
        Line::from(Span::styled(
            format!(
                "{} / {}  ({})",
                summary.correct,
                summary.total,
                summary.percentage_label()
            ),
            Style::default().fg(color).bold(),
        )),
        Line::from(Span::styled(
            format!("{}: {}", summary.feedback.label(), summary.feedback.message()),
            Style::default().fg(color),
        )),
        Line::from(""),
    ];

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Color::DarkGray),
    );
    frame.render_widget(widget, area);
}

fn render_question_breakdown(frame: &mut Frame, area: Rect, app: &App, scroll: usize) {
    let lines: Vec<Line> = app
        .answered()
        .iter()
        .enumerate()
        .map(|(index, answered)| {
            let (symbol, color) = if answered.outcome.is_correct {
                ("+", Color::Green)
            } else if answered.outcome.is_unanswered() {
                ("·", Color::DarkGray)
            } else {
                ("-", Color::Red)
            };

            let preview = truncate_question(answered.question.text());

            Line::from(vec![
                Span::styled(format!(" {} ", symbol), Style::default().fg(color)),
                Span::styled(
                    format!("{:2}. ", index + 1),
                    Style::default().fg(Color::DarkGray),
                ),
                Span::styled(preview, Style::default().fg(Color::Gray)),
            ])
        })
        .collect();

    let widget = Paragraph::new(lines)
        .block(Block::default().padding(Padding::horizontal(1)))
        .scroll((scroll as u16, 0));
    frame.render_widget(widget, area);
}

fn render_persistence(frame: &mut Frame, area: Rect, message: Option<&str>) {
    let Some(message) = message else {
        return;
    };
    let color = if message.starts_with("Could not") {
        Color::Red
    } else {
        Color::DarkGray
    };
    let widget = Paragraph::new(message)
        .alignment(Alignment::Center)
        .fg(color);
    frame.render_widget(widget, area);
}

fn truncate_question(text: &str) -> String {
    let char_count = text.chars().count();
    if char_count > QUESTION_PREVIEW_LENGTH {
        let truncated: String = text.chars().take(QUESTION_PREVIEW_LENGTH).collect();
        format!("{}...", truncated)
    } else {
        text.to_string()
    }
}

fn render_controls(frame: &mut Frame, area: Rect) {
    let widget = Paragraph::new("j/k scroll  ·  r menu  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_truncate_question() {
        assert_eq!(truncate_question("short"), "short");
        let long = "x".repeat(60);
        let truncated = truncate_question(&long);
        assert_eq!(truncated.chars().count(), QUESTION_PREVIEW_LENGTH + 3);
        assert!(truncated.ends_with("..."));
    }
}
