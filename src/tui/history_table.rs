use crate::app::{AppState, HistoryView};
use crate::table::{HistoryTable, HEADER, HEADER_ROW};
use crate::tui::text;
use ratatui::layout::{Constraint, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Cell, Paragraph, Row, Table, TableState};
use ratatui::Frame;

fn table_block(title: String) -> Block<'static> {
    Block::default()
        .borders(Borders::TOP | Borders::LEFT)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(title)
}

fn column_widths(narrow: bool) -> [Constraint; 7] {
    let (ago, text_col) = if narrow { (10, 10) } else { (14, 16) };
    [
        Constraint::Length(6),
        Constraint::Length(ago),
        Constraint::Length(9),
        Constraint::Length(text_col),
        Constraint::Length(text_col),
        Constraint::Min(10),
        Constraint::Length(8),
    ]
}

/// Data rows that fit below the header.
fn visible_rows(inner: Rect) -> usize {
    usize::from(inner.height).saturating_sub(1)
}

/// First data row shown so that the cursor stays on screen.
pub fn scroll_offset(cursor: usize, visible: usize) -> usize {
    let data_idx = cursor.saturating_sub(1);
    if visible > 0 && data_idx >= visible {
        data_idx - visible + 1
    } else {
        0
    }
}

/// Maps an absolute terminal row inside `area` to a rendered-table row index
/// (`HEADER_ROW` for the header). Rows past the data are not clamped; callers
/// check them against the table.
pub fn row_at(area: Rect, cursor: usize, y: u16) -> Option<usize> {
    let inner = table_block(String::new()).inner(area);
    if y < inner.y || y >= inner.y.saturating_add(inner.height) {
        return None;
    }
    let rel = usize::from(y - inner.y);
    if rel == 0 {
        return Some(HEADER_ROW);
    }
    Some(scroll_offset(cursor, visible_rows(inner)) + rel)
}

pub fn render(f: &mut Frame, area: Rect, state: &AppState, view: &HistoryView) {
    let title = match &view.table {
        Some(table) => format!(" {} · {} builds ", state.config.repo, table.data_rows().len()),
        None => format!(" {} ", state.config.repo),
    };
    let block = table_block(title);

    let Some(table) = &view.table else {
        let msg = if state.is_loading {
            Line::styled(
                format!("{} Loading build history…", text::spinner(state.spinner_frame)),
                Style::default().fg(Color::Yellow),
            )
        } else {
            Line::styled(
                "No build history loaded. Press r to retry.",
                Style::default().fg(Color::DarkGray),
            )
        };
        f.render_widget(Paragraph::new(msg).block(block), area);
        return;
    };

    if table.is_empty() {
        let para = Paragraph::new("No builds found")
            .style(Style::default().fg(Color::DarkGray))
            .block(block);
        f.render_widget(para, area);
        return;
    }

    let inner = block.inner(area);
    let narrow = area.width < crate::app::NARROW_WIDTH_THRESHOLD;
    let visible = visible_rows(inner);
    let offset = scroll_offset(view.cursor, visible);

    let widget = Table::new(visible_slice(table, offset, visible), column_widths(narrow))
        .header(
            Row::new(HEADER).style(
                Style::default()
                    .fg(Color::Blue)
                    .add_modifier(Modifier::BOLD),
            ),
        )
        .row_highlight_style(Style::default().bg(Color::Blue))
        .block(block);

    let mut table_state =
        TableState::default().with_selected(view.cursor.checked_sub(1 + offset));
    f.render_stateful_widget(widget, area, &mut table_state);
}

fn visible_slice(table: &HistoryTable, offset: usize, visible: usize) -> Vec<Row<'static>> {
    table
        .data_rows()
        .iter()
        .skip(offset)
        .take(visible)
        .map(|row| {
            Row::new(row.cells.iter().map(|c| Cell::from(c.clone())))
                .style(Style::default().fg(row.color))
        })
        .collect()
}
