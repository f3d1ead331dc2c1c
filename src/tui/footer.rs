use crate::app::AppState;
use ratatui::layout::Rect;
use ratatui::style::{Color, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;

fn hints(state: &AppState, narrow: bool) -> &'static [(&'static str, &'static str)] {
    match (state.is_detail(), narrow) {
        (true, true) => &[("j/k", "scroll"), ("o", "open"), ("q", "back")],
        (true, false) => &[
            ("↑↓/jk", "scroll"),
            ("o", "open in browser"),
            ("Esc/q/h", "back"),
            ("^C", "quit"),
        ],
        (false, true) => &[
            ("j/k", "nav"),
            ("Enter", "open"),
            ("r", "refresh"),
            ("q", "quit"),
        ],
        (false, false) => &[
            ("↑↓/jk", "navigate"),
            ("PgUp/PgDn", "page"),
            ("Enter/click", "details"),
            ("o", "browser"),
            ("r", "refresh"),
            ("q", "quit"),
        ],
    }
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState) {
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;

    let mut spans: Vec<Span> = Vec::new();
    for (i, (key, desc)) in hints(state, narrow).iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" "));
        }
        spans.push(Span::styled(*key, Style::default().fg(Color::Cyan)));
        spans.push(Span::styled(
            format!(" {desc}"),
            Style::default().fg(Color::DarkGray),
        ));
    }

    let footer = Paragraph::new(Line::from(spans)).block(
        Block::default()
            .borders(Borders::TOP)
            .border_style(Style::default().fg(Color::DarkGray)),
    );
    f.render_widget(footer, area);
}
