use std::time::Instant;

use ratatui::{
    prelude::*,
    widgets::{Paragraph, Wrap},
};

use crate::app::App;
use crate::models::{option_label, PresentedQuestion};

/// Countdown turns red at or below this many seconds.
const WARNING_SECONDS: u64 = 5;

pub fn render(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let Some(question) = app.current_question() else {
        return;
    };

    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Length(1),
        Constraint::Length(4),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(2)
    .split(area);

    render_progress(frame, chunks[0], app, now);
    render_verdict(frame, chunks[1], app.last_verdict());
    render_question_text(frame, chunks[2], question.text());
    render_options(frame, chunks[3], question, app.selected_option());
    render_controls(frame, chunks[4], question);
}

fn render_progress(frame: &mut Frame, area: Rect, app: &App, now: Instant) {
    let halves = Layout::horizontal([Constraint::Fill(1), Constraint::Fill(1)]).split(area);

    let category = Paragraph::new(app.category_name().unwrap_or_default())
        .fg(Color::DarkGray);
    frame.render_widget(category, halves[0]);

    // Round up so the display never shows 0s while time remains.
    let remaining = app.remaining(now);
    let seconds = remaining.as_secs() + u64::from(remaining.subsec_nanos() > 0);
    let clock_color = if seconds <= WARNING_SECONDS {
        Color::Red
    } else {
        Color::DarkGray
    };

    let progress = Line::from(vec![
        Span::styled(format!("{}s", seconds), Style::default().fg(clock_color).bold()),
        Span::styled(
            format!("   {}/{}", app.current_question_number(), app.total_questions()),
            Style::default().fg(Color::DarkGray),
        ),
    ]);
    frame.render_widget(Paragraph::new(progress).alignment(Alignment::Right), halves[1]);
}

fn render_verdict(frame: &mut Frame, area: Rect, verdict: Option<&str>) {
    let Some(verdict) = verdict else {
        return;
    };
    let color = if verdict.starts_with("Correct") {
        Color::Green
    } else {
        Color::Red
    };
    frame.render_widget(Paragraph::new(verdict).fg(color), area);
}

fn render_question_text(frame: &mut Frame, area: Rect, text: &str) {
    let widget = Paragraph::new(text)
        .wrap(Wrap { trim: true })
        .fg(Color::White)
        .bold();
    frame.render_widget(widget, area);
}

fn render_options(frame: &mut Frame, area: Rect, question: &PresentedQuestion<'_>, selected: usize) {
    let mut lines: Vec<Line> = Vec::with_capacity(question.num_options() * 2);

    for (index, option) in question.options().enumerate() {
        let is_selected = index == selected;
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        lines.push(Line::from(vec![
            Span::styled(format!(" {} ", marker), style),
            Span::styled(format!("{}. ", option_label(index)), style),
            Span::styled(option, style),
        ]));
        lines.push(Line::from(""));
    }

    frame.render_widget(Paragraph::new(lines), area);
}

fn render_controls(frame: &mut Frame, area: Rect, question: &PresentedQuestion<'_>) {
    let last = option_label(question.num_options().saturating_sub(1));
    let widget = Paragraph::new(format!(
        "A-{} answer  ·  ↑/↓ navigate  ·  enter select  ·  esc quit",
        last
    ))
    .alignment(Alignment::Center)
    .fg(Color::DarkGray);
    frame.render_widget(widget, area);
}
