use crate::app::DetailView;
use crate::tui::text;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Paragraph};
use ratatui::Frame;
use unicode_width::UnicodeWidthStr;

pub fn render(f: &mut Frame, area: Rect, view: &DetailView) {
    let block = Block::default()
        .title(format!(" Build #{} ", view.number))
        .title_bottom(Line::from(" Esc/q back · o open ").centered())
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Cyan));

    let entries = view.lines();
    let inner_width = usize::from(area.width.saturating_sub(2));
    let label_width = entries
        .iter()
        .map(|(l, _)| UnicodeWidthStr::width(l.as_str()))
        .max()
        .unwrap_or(0);
    let value_max = inner_width.saturating_sub(label_width + 2);

    let lines: Vec<Line> = entries
        .iter()
        .skip(view.scroll)
        .map(|(label, value)| {
            Line::from(vec![
                Span::styled(
                    format!("{label:>label_width$}  "),
                    Style::default()
                        .fg(Color::Cyan)
                        .add_modifier(Modifier::BOLD),
                ),
                Span::styled(
                    text::truncate(value, value_max),
                    Style::default().fg(Color::White),
                ),
            ])
        })
        .collect();

    f.render_widget(Paragraph::new(lines).block(block), area);
}
