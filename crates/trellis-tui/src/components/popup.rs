use crate::theme::Theme;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
    Frame,
};

pub fn centered_rect(percent_x: u16, percent_y: u16, r: Rect) -> Rect {
    let popup_layout = Layout::default()
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
        .split(popup_layout[1])[1]
}

/// Clears a centered area, draws a bordered block and returns its inner area.
pub fn render_popup_with_block(
    frame: &mut Frame,
    theme: &Theme,
    title: &str,
    width_percent: u16,
    height_percent: u16,
) -> Rect {
    let area = centered_rect(width_percent, height_percent, frame.area());

    frame.render_widget(Clear, area);

    let block = Block::default()
        .title(Span::styled(format!(" {} ", title), theme.title()))
        .borders(Borders::ALL)
        .border_style(theme.border(true))
        .style(theme.popup());

    let inner = block.inner(area);
    frame.render_widget(block, area);

    inner
}

pub fn render_input_popup(
    frame: &mut Frame,
    theme: &Theme,
    title: &str,
    label: &str,
    input_text: &str,
    cursor_column: usize,
) {
    let inner = render_popup_with_block(frame, theme, title, 60, 30);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Length(1),
            Constraint::Length(3),
            Constraint::Min(0),
        ])
        .split(inner);

    frame.render_widget(Paragraph::new(label).style(theme.muted()), chunks[0]);

    let input = Paragraph::new(input_text).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(theme.border(false)),
    );
    frame.render_widget(input, chunks[1]);

    let cursor_x = chunks[1].x + cursor_column as u16 + 1;
    let cursor_y = chunks[1].y + 1;
    frame.set_cursor_position((cursor_x, cursor_y));
}

pub fn render_confirm_popup(frame: &mut Frame, theme: &Theme, prompt: &str) {
    let inner = render_popup_with_block(frame, theme, "Confirm", 50, 20);

    let lines = vec![
        Line::from(Span::styled(prompt.to_string(), theme.warning())),
        Line::default(),
        Line::from(vec![
            Span::styled("y", theme.key_hint()),
            Span::raw(" confirm   "),
            Span::styled("n", theme.key_hint()),
            Span::raw(" cancel"),
        ]),
    ];
    frame.render_widget(
        Paragraph::new(lines).wrap(Wrap { trim: true }),
        inner,
    );
}
