use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Padding, Paragraph},
};

use crate::app::App;

pub fn render(frame: &mut Frame, area: Rect, app: &App) {
    let categories = app.categories();
    let list_height = u16::try_from(categories.len())
        .unwrap_or(u16::MAX)
        .saturating_add(8);

    let chunks = Layout::vertical([
        Constraint::Fill(1),
        Constraint::Length(list_height),
        Constraint::Fill(1),
        Constraint::Length(1),
    ])
    .margin(1)
    .split(area);

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled(
            "QUIZMASTER",
            Style::default().fg(Color::Cyan).bold(),
        )),
        Line::from(""),
        Line::from("Choose a category".fg(Color::DarkGray)),
        Line::from(""),
    ];

    for (index, category) in categories.iter().enumerate() {
        let is_selected = index == app.selected_category();
        let style = if is_selected {
            Style::default().fg(Color::Cyan).bold()
        } else {
            Style::default().fg(Color::Gray)
        };
        let marker = if is_selected { ">" } else { " " };

        content.push(Line::from(vec![
            Span::styled(format!("{} ", marker), style),
            Span::styled(category.name(), style),
            Span::styled(
                format!("  ({} questions)", category.questions().len()),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let widget = Paragraph::new(content).alignment(Alignment::Center).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Color::DarkGray)
            .padding(Padding::horizontal(2)),
    );
    frame.render_widget(widget, chunks[1]);

    let controls = Paragraph::new("j/k navigate  ·  enter start  ·  q quit")
        .alignment(Alignment::Center)
        .fg(Color::DarkGray);
    frame.render_widget(controls, chunks[3]);
}
