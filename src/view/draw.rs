//! Widget rendering for the browser screen.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::Span,
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};

use crate::state::{AppState, Focus, Mode, StatusKind};

const KEYS_HINT: &str =
    "↑/↓: Navigate | Enter: Focus Value | d: Dump Key | a: Dump All | /: Search | h: Help | q: Quit";
const VALUE_HINT: &str = "Value View | ↑/↓: Scroll | Esc: Back to keys";

const HELP_TEXT: &str = "KEY SHORTCUTS

  Arrow Keys   Navigate keys
  Enter        Show selected key's value
  d            Dump key/value to file
  a            Dump all keys to file
  /            Focus search box
  h            Toggle help window
  q            Quit application

IN VALUE VIEW

  Arrow Keys   Scroll value content
  Esc          Return to key list";

/// Paint the whole screen from the current session state.
pub fn render(frame: &mut Frame<'_>, state: &AppState, list_state: &mut ListState) {
    let rows = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(1),
            Constraint::Length(3),
            Constraint::Length(1),
        ])
        .split(frame.area());

    let panes = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Ratio(1, 3), Constraint::Ratio(2, 3)])
        .split(rows[0]);

    render_key_list(frame, state, list_state, panes[0]);
    render_value_pane(frame, state, panes[1]);
    render_search_box(frame, state, rows[1]);
    render_status_bar(frame, state, rows[2]);

    if state.help_visible {
        render_help_overlay(frame, frame.area());
    }
}

fn render_key_list(frame: &mut Frame<'_>, state: &AppState, list_state: &mut ListState, area: Rect) {
    let pager = state.pager();
    let title = if pager.is_empty() {
        " Keys ".to_string()
    } else {
        format!(" Keys ({}/{}) ", state.selected + 1, pager.len())
    };

    let items: Vec<ListItem<'_>> = pager
        .keys()
        .iter()
        .map(|key| ListItem::new(key.display()))
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(title, Style::default().fg(Color::Yellow))),
        )
        .highlight_style(
            Style::default()
                .bg(Color::White)
                .fg(Color::Black)
                .add_modifier(Modifier::BOLD),
        );

    list_state.select((!pager.is_empty()).then_some(state.selected));
    frame.render_stateful_widget(list, area, list_state);
}

fn render_value_pane(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let text = state
        .current()
        .map(|entry| entry.text.clone())
        .unwrap_or_default();

    let paragraph = Paragraph::new(text)
        .wrap(Wrap { trim: false })
        .scroll((state.value_scroll, 0))
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(Span::styled(" Value ", Style::default().fg(Color::Yellow))),
        );
    frame.render_widget(paragraph, area);
}

fn render_search_box(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let style = if state.focus == Focus::Search {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default()
    };

    let paragraph = Paragraph::new(state.filter_text.as_str()).style(style).block(
        Block::default()
            .borders(Borders::ALL)
            .title(" Search: "),
    );
    frame.render_widget(paragraph, area);
}

fn render_status_bar(frame: &mut Frame<'_>, state: &AppState, area: Rect) {
    let (text, style) = match state.status.current() {
        Some((StatusKind::Success, msg)) => (msg.to_string(), Style::default().fg(Color::Green)),
        Some((StatusKind::Error, msg)) => (msg.to_string(), Style::default().fg(Color::Red)),
        Some((StatusKind::Info, msg)) => (msg.to_string(), Style::default()),
        None => {
            let hint = match state.mode {
                Mode::Keys => KEYS_HINT,
                Mode::Value => VALUE_HINT,
            };
            (hint.to_string(), Style::default())
        }
    };

    let paragraph = Paragraph::new(text)
        .style(style)
        .alignment(ratatui::layout::Alignment::Center);
    frame.render_widget(paragraph, area);
}

fn render_help_overlay(frame: &mut Frame<'_>, area: Rect) {
    let popup = centered_rect(50, 70, area);
    frame.render_widget(Clear, popup);
    let paragraph = Paragraph::new(HELP_TEXT).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(" Help ", Style::default().fg(Color::Yellow))),
    );
    frame.render_widget(paragraph, popup);
}

/// Rect centered in `r`, sized as percentages of it.
fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Percentage((100 - percent_y) / 2),
            Constraint::Percentage(percent_y),
            Constraint::Percentage((100 - percent_y) / 2),
        ])
        .split(r);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x) / 2),
            Constraint::Percentage(percent_x),
            Constraint::Percentage((100 - percent_x) / 2),
        ])
        .split(vertical[1])[1]
}
