use crate::app::{AppState, Screen};
use crate::tui::{detail, footer, header, history_table};
use ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Borders, Clear, Paragraph, Wrap};
use ratatui::Frame;

fn split(area: Rect) -> [Rect; 3] {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // header
            Constraint::Min(1),    // body
            Constraint::Length(2), // footer
        ])
        .split(area);
    [chunks[0], chunks[1], chunks[2]]
}

/// Area the active screen draws into; mouse hit-testing uses the same split.
pub fn body_area(area: Rect) -> Rect {
    split(area)[1]
}

pub fn render(f: &mut Frame, state: &AppState) {
    let [header_area, body, footer_area] = split(f.area());

    header::render(f, header_area, state);
    match &state.screen {
        Screen::History(view) => history_table::render(f, body, state, view),
        Screen::Detail(view) => detail::render(f, body, view),
    }
    footer::render(f, footer_area, state);

    if let Some(err) = state.error_message() {
        let area = f.area();
        if area.height > 6 && area.width >= 4 {
            let err_area = Rect {
                x: area.x + 1,
                y: area.y + area.height.saturating_sub(5),
                width: area.width.saturating_sub(2),
                height: 3,
            };
            let err_widget = Paragraph::new(err.to_owned())
                .style(Style::default().fg(Color::Red))
                .block(
                    Block::default()
                        .title(" Error ")
                        .borders(Borders::ALL)
                        .border_style(Style::default().fg(Color::Red)),
                )
                .wrap(Wrap { trim: true });
            f.render_widget(Clear, err_area);
            f.render_widget(err_widget, err_area);
        }
    }
}
