use crate::app::{AppState, Screen};
use crate::tui::text;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let mut spans = vec![
        Span::styled(
            format!(" jhw v{} ", env!("CARGO_PKG_VERSION")),
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ),
        Span::raw("│ "),
        Span::styled(
            state.config.repo.as_str(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        ),
        Span::styled(
            format!(" @ {}", state.config.server_url),
            Style::default().fg(Color::DarkGray),
        ),
    ];

    if let Screen::Detail(view) = &state.screen {
        spans.push(Span::styled(
            format!(" › #{}", view.number),
            Style::default().fg(Color::Yellow),
        ));
    }

    if state.is_loading {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            text::spinner(state.spinner_frame).to_string(),
            Style::default().fg(Color::Yellow),
        ));
    } else if let Some(at) = state.last_fetch {
        spans.push(Span::styled(
            format!(" updated {}", at.format("%H:%M:%S")),
            Style::default().fg(Color::DarkGray),
        ));
    }

    if state.error_message().is_some() {
        spans.push(Span::raw(" "));
        spans.push(Span::styled(
            "!",
            Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        ));
    }

    let header = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::BOTTOM)
            .border_style(Style::default().fg(Color::DarkGray)),
    );

    f.render_widget(header, area);
}
