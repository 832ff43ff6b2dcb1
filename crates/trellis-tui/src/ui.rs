use crate::app::App;
use crate::components::{render_confirm_popup, render_input_popup, render_popup_with_block};
use crate::keymap;
use crate::layout::{num_columns, visible_cards, visible_lists};
use crate::markdown_renderer::render_markdown;
use crate::state::{Mode, View};
use crate::theme::{label_color, Theme};
use chrono::Utc;
use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, List, ListItem, ListState, Paragraph, Wrap},
    Frame,
};
use trellis_domain::{format_due, Card};

pub fn render(app: &App, frame: &mut Frame) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(1),
            Constraint::Min(0),
            Constraint::Length(1),
        ])
        .split(frame.area());

    render_header(app, frame, chunks[0]);
    match app.nav.state().view {
        View::Home => render_home(app, frame, chunks[1]),
        View::Board => render_board(app, frame, chunks[1]),
        View::CardDetail => render_card_detail(app, frame, chunks[1]),
        View::MyCards => render_results(app, frame, chunks[1]),
    }
    render_footer(app, frame, chunks[2]);

    render_mode_popup(app, frame);
    if let Some(confirm) = &app.nav.state().confirm_action {
        render_confirm_popup(frame, &app.theme, &confirm.prompt());
    }
}

fn render_header(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let domain = app.domain.read();
    let mut spans = vec![Span::styled(" trellis ", theme.title())];

    match app.nav.state().view {
        View::Board | View::CardDetail => {
            if let Some(board) = &domain.current_board {
                spans.push(Span::raw(format!("› {} ", board.name)));
            }
        }
        View::MyCards => spans.push(Span::raw(format!("› {} ", app.results_source.title()))),
        View::Home => {}
    }
    if domain.loading {
        spans.push(Span::styled("⟳ loading ", theme.warning()));
    }
    if let Some(synced) = domain.last_synced {
        spans.push(Span::styled(
            format!("synced {}", synced.with_timezone(&chrono::Local).format("%H:%M")),
            theme.muted(),
        ));
    }

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_home(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let domain = app.domain.read();
    let items: Vec<ListItem> = domain
        .boards
        .iter()
        .map(|board| {
            let mut spans = vec![Span::raw(board.name.clone())];
            if !board.desc.is_empty() {
                spans.push(Span::styled(format!("  {}", board.desc), theme.muted()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let title = if items.is_empty() && !domain.loading {
        " Boards (none) "
    } else {
        " Boards "
    };
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(title, theme.title()))
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        )
        .highlight_style(theme.selected())
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(app.board_selection.get());
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_board(app: &App, frame: &mut Frame, area: Rect) {
    let nav = app.nav.state();
    let lists = app.domain.read().lists.clone();
    if lists.is_empty() {
        let message = if app.domain.is_loading() {
            "Loading…"
        } else {
            "No lists. Press L to create one."
        };
        frame.render_widget(
            Paragraph::new(message)
                .style(app.theme.muted())
                .block(Block::default().borders(Borders::ALL)),
            area,
        );
        return;
    }

    let columns = num_columns(app.viewport.width);
    let range = visible_lists(lists.len(), nav.list_scroll_offset, columns);
    let chunks = Layout::default()
        .direction(Direction::Horizontal)
        .constraints(vec![Constraint::Ratio(1, columns as u32); columns])
        .split(area);

    for (slot, index) in range.enumerate() {
        let list = &lists[index];
        let focused = index == nav.selected_list_index;
        let cards = app.visible_cards_in(&list.id);
        let title = format!(" {} {} ({}) ", index + 1, list.name, cards.len());

        let block = Block::default()
            .title(Span::styled(
                title,
                if focused {
                    app.theme.title()
                } else {
                    app.theme.muted()
                },
            ))
            .borders(Borders::ALL)
            .border_style(app.theme.border(focused));
        let inner = block.inner(chunks[slot]);
        frame.render_widget(block, chunks[slot]);

        let selected = if focused { nav.selected_card_index } else { 0 };
        let max_rows = (inner.height as usize).saturating_sub(2).max(1);
        let window = visible_cards(&cards, selected, max_rows);

        let mut lines = Vec::new();
        if window.scroll_top > 0 {
            lines.push(Line::styled(
                format!("▲ {} more", window.scroll_top),
                app.theme.muted(),
            ));
        }
        for (row, card) in window.items.iter().enumerate() {
            let is_selected = focused && window.offset + row == nav.selected_card_index;
            lines.push(card_line(card, &app.theme, is_selected));
        }
        if window.scroll_bottom > 0 {
            lines.push(Line::styled(
                format!("▼ {} more", window.scroll_bottom),
                app.theme.muted(),
            ));
        }
        frame.render_widget(Paragraph::new(lines), inner);
    }
}

fn card_line(card: &Card, theme: &Theme, selected: bool) -> Line<'static> {
    let base = if selected {
        theme.selected()
    } else {
        Style::default()
    };
    let mut spans = vec![Span::styled(card.name.clone(), base)];
    for label in &card.labels {
        spans.push(Span::styled(
            " ●",
            Style::default().fg(label_color(label.color.as_deref())),
        ));
    }
    if let Some(due) = &card.due {
        let style = if card.is_overdue(Utc::now()) {
            theme.error()
        } else {
            theme.muted()
        };
        spans.push(Span::styled(format!(" ⏰ {}", format_due(due)), style));
    }
    if !card.desc.is_empty() {
        spans.push(Span::styled(" ≡", theme.muted()));
    }
    Line::from(spans)
}

fn render_card_detail(app: &App, frame: &mut Frame, area: Rect) {
    let Some(card) = app.selected_card() else {
        frame.render_widget(
            Paragraph::new("Card not found").style(app.theme.muted()),
            area,
        );
        return;
    };
    let theme = &app.theme;

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(6), Constraint::Min(0)])
        .split(area);
    render_card_summary(app, &card, frame, chunks[0]);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(chunks[1]);

    let description = if card.desc.trim().is_empty() {
        vec![Line::styled("No description. Press d to add one.", theme.muted())]
    } else {
        render_markdown(&card.desc)
    };
    frame.render_widget(
        Paragraph::new(description)
            .wrap(Wrap { trim: false })
            .block(
                Block::default()
                    .title(" Description ")
                    .borders(Borders::ALL)
                    .border_style(theme.border(false)),
            ),
        body[0],
    );

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(65), Constraint::Percentage(35)])
        .split(body[1]);
    render_checklists(app, &card, frame, side[0]);
    render_attachments(app, &card, frame, side[1]);
}

fn render_card_summary(app: &App, card: &Card, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let domain = app.domain.read();

    let list_name = domain.list_name(&card.id_list).unwrap_or("?").to_string();
    let due = match &card.due {
        Some(due) if card.is_overdue(Utc::now()) => {
            Span::styled(format!("{} (overdue)", format_due(due)), theme.error())
        }
        Some(due) => Span::raw(format_due(due)),
        None => Span::styled("none", theme.muted()),
    };

    let mut labels = vec![Span::styled("Labels: ", theme.muted())];
    for label in &card.labels {
        labels.push(Span::styled(
            format!("{} ", label.display_name()),
            Style::default().fg(label_color(label.color.as_deref())),
        ));
    }
    let members: Vec<String> = card
        .id_members
        .iter()
        .map(|id| {
            domain
                .members
                .iter()
                .find(|member| &member.id == id)
                .map(|member| member.full_name.clone())
                .unwrap_or_else(|| id.clone())
        })
        .collect();

    let lines = vec![
        Line::from(vec![
            Span::styled("List: ", theme.muted()),
            Span::raw(list_name),
            Span::styled("   Due: ", theme.muted()),
            due,
        ]),
        Line::from(labels),
        Line::from(vec![
            Span::styled("Members: ", theme.muted()),
            Span::raw(members.join(", ")),
        ]),
        Line::styled(card.url.clone(), theme.muted()),
    ];
    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(Span::styled(format!(" {} ", card.name), theme.title()))
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        ),
        area,
    );
}

fn render_checklists(app: &App, card: &Card, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let active = app.nav.state().mode == Mode::ToggleChecklist;
    let focus = &app.checklist_focus;
    let mut lines = Vec::new();

    if card.checklists.is_none() {
        lines.push(Line::styled("Loading…", theme.muted()));
    }
    for (index, checklist) in card.sorted_checklists().into_iter().enumerate() {
        let (done, total) = checklist.progress();
        let header_style = if active && focus.checklist.is_none() && focus.hovered == index {
            theme.selected()
        } else {
            theme.title()
        };
        lines.push(Line::styled(
            format!("{} {} ({}/{})", index + 1, checklist.name, done, total),
            header_style,
        ));

        let items = checklist.sorted_items();
        let keyed = active && focus.checklist == Some(index);
        let (start, end) = if keyed {
            let start = keymap::global_index(focus.page, 0).min(items.len());
            (start, (start + keymap::KEYS_PER_PAGE).min(items.len()))
        } else {
            (0, items.len())
        };

        for (offset, item) in items[start..end].iter().enumerate() {
            let mark = if item.is_complete() { "☑" } else { "☐" };
            let style = if item.is_complete() {
                theme.done()
            } else {
                Style::default()
            };
            let mut spans = Vec::new();
            if keyed {
                let key = keymap::key_for(keymap::key_index(start + offset)).unwrap_or(' ');
                let key_style = if focus.pending_delete {
                    theme.error()
                } else {
                    theme.key_hint()
                };
                spans.push(Span::styled(format!(" [{}]", key), key_style));
            }
            spans.push(Span::raw(format!(" {} ", mark)));
            spans.push(Span::styled(item.name.clone(), style));
            lines.push(Line::from(spans));
        }

        if keyed && keymap::page_count(items.len()) > 1 {
            lines.push(Line::styled(
                format!(
                    " page {}/{} (←/→)",
                    focus.page + 1,
                    keymap::page_count(items.len())
                ),
                theme.muted(),
            ));
        }
    }

    frame.render_widget(
        Paragraph::new(lines).block(
            Block::default()
                .title(" Checklists ")
                .borders(Borders::ALL)
                .border_style(theme.border(active)),
        ),
        area,
    );
}

fn render_attachments(app: &App, card: &Card, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let active = app.nav.state().mode == Mode::ViewAttachments;
    let items: Vec<ListItem> = card
        .attachments
        .iter()
        .flatten()
        .enumerate()
        .map(|(index, attachment)| {
            let mut spans = vec![Span::raw(format!("{} {}", index + 1, attachment.name))];
            if let Some(size) = attachment.size_label() {
                spans.push(Span::styled(format!("  {}", size), theme.muted()));
            }
            ListItem::new(Line::from(spans))
        })
        .collect();

    let list = List::new(items)
        .block(
            Block::default()
                .title(" Attachments ")
                .borders(Borders::ALL)
                .border_style(theme.border(active)),
        )
        .highlight_style(theme.selected());
    let selected = if active {
        app.attachment_selection.get()
    } else {
        None
    };
    let mut state = ListState::default().with_selected(selected);
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_results(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let domain = app.domain.read();
    let items: Vec<ListItem> = app
        .card_results
        .iter()
        .map(|card| {
            let location = match (
                domain.board_name(&card.id_board),
                domain.list_name(&card.id_list),
            ) {
                (Some(board), Some(list)) => format!("  {} / {}", board, list),
                (Some(board), None) => format!("  {}", board),
                _ => String::new(),
            };
            let mut line = card_line(card, theme, false);
            line.spans.push(Span::styled(location, theme.muted()));
            ListItem::new(line)
        })
        .collect();

    let title = format!(" {} ({}) ", app.results_source.title(), items.len());
    let list = List::new(items)
        .block(
            Block::default()
                .title(Span::styled(title, theme.title()))
                .borders(Borders::ALL)
                .border_style(theme.border(true)),
        )
        .highlight_style(theme.selected())
        .highlight_symbol("▶ ");
    let mut state = ListState::default().with_selected(app.results_selection.get());
    frame.render_stateful_widget(list, area, &mut state);
}

fn render_footer(app: &App, frame: &mut Frame, area: Rect) {
    let theme = &app.theme;
    let state = app.nav.state();

    if let Some(status) = &state.status_message {
        let style = if status.is_error() {
            theme.error()
        } else {
            theme.title()
        };
        frame.render_widget(Paragraph::new(Span::styled(status.text.clone(), style)), area);
        return;
    }

    let hints: &[(&str, &str)] = match (state.mode, state.view) {
        (Mode::Normal, View::Home) => &[
            ("↑↓", "select"),
            ("Enter", "open"),
            ("a", "my cards"),
            ("/", "search"),
            ("S", "sync"),
            ("q", "quit"),
        ],
        (Mode::Normal, View::Board) => &[
            ("←→", "list"),
            ("↑↓", "card"),
            ("Enter", "open"),
            ("n", "new"),
            ("m", "move"),
            ("e", "rename"),
            ("l", "labels"),
            ("x", "archive"),
            ("/", "filter"),
            ("Esc", "home"),
        ],
        (Mode::Normal, View::CardDetail) => &[
            ("d", "description"),
            ("D", "due"),
            ("c", "checklists"),
            ("A", "attachments"),
            ("y", "copy url"),
            ("Esc", "back"),
        ],
        (Mode::Normal, View::MyCards) => &[("↑↓", "select"), ("r", "reload"), ("Esc", "back")],
        (Mode::ToggleChecklist, _) if app.checklist_focus.checklist.is_some() => &[
            ("key", "toggle"),
            ("-", "delete item"),
            ("i", "add item"),
            ("Del", "delete list"),
            ("Esc", "back"),
        ],
        (Mode::ToggleChecklist, _) => &[
            ("1-9", "open"),
            ("a", "add"),
            ("Del", "delete"),
            ("Esc", "done"),
        ],
        (Mode::ViewAttachments, _) => &[
            ("1-9", "select"),
            ("y", "copy url"),
            ("x", "delete"),
            ("Esc", "done"),
        ],
        (Mode::EditDesc, _) => &[("Enter", "save"), ("Alt+Enter", "newline"), ("Esc", "cancel")],
        (Mode::MoveCard | Mode::ToggleLabel | Mode::ToggleMember, _) => {
            &[("1-9", "choose"), ("Esc", "done")]
        }
        _ => &[("Enter", "confirm"), ("Esc", "cancel")],
    };

    let mut spans = Vec::new();
    for (key, action) in hints {
        spans.push(Span::styled(format!(" {}", key), theme.key_hint()));
        spans.push(Span::styled(format!(" {} ", action), theme.muted()));
    }
    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn render_mode_popup(app: &App, frame: &mut Frame) {
    let state = app.nav.state();
    let mode = state.mode;
    let theme = &app.theme;

    if mode.is_text_entry() {
        let label = match mode {
            Mode::SetDue => "today, tomorrow, +3d, 2024-05-01 17:00 or none",
            Mode::AddAttachment => "URL or file path",
            Mode::Search if state.mode_origin_view == Some(View::Home) => "Search all cards",
            Mode::Search => "Filter cards by name",
            _ => "Name",
        };
        render_input_popup(
            frame,
            theme,
            mode.prompt_title(),
            label,
            app.input.as_str(),
            app.input.cursor_column(),
        );
        return;
    }

    match mode {
        Mode::EditDesc => {
            let inner = render_popup_with_block(frame, theme, mode.prompt_title(), 70, 60);
            frame.render_widget(
                Paragraph::new(app.editor.render_lines(Style::default())).wrap(Wrap { trim: false }),
                inner,
            );
        }
        Mode::MoveCard => {
            let current = app.selected_card().map(|card| card.id_list);
            let lines = app
                .domain
                .read()
                .lists
                .iter()
                .take(9)
                .enumerate()
                .map(|(index, list)| {
                    let marker = if current.as_deref() == Some(list.id.as_str()) {
                        " (current)"
                    } else {
                        ""
                    };
                    Line::from(vec![
                        Span::styled(format!("{} ", index + 1), theme.key_hint()),
                        Span::raw(format!("{}{}", list.name, marker)),
                    ])
                })
                .collect::<Vec<_>>();
            let inner = render_popup_with_block(frame, theme, mode.prompt_title(), 40, 50);
            frame.render_widget(Paragraph::new(lines), inner);
        }
        Mode::ToggleLabel => {
            let card = app.selected_card();
            let lines = app
                .domain
                .read()
                .board_labels
                .iter()
                .take(9)
                .enumerate()
                .map(|(index, label)| {
                    let on = card.as_ref().is_some_and(|card| card.has_label(&label.id));
                    Line::from(vec![
                        Span::styled(format!("{} ", index + 1), theme.key_hint()),
                        Span::raw(if on { "[x] " } else { "[ ] " }),
                        Span::styled(
                            label.display_name().to_string(),
                            Style::default().fg(label_color(label.color.as_deref())),
                        ),
                    ])
                })
                .collect::<Vec<_>>();
            let inner = render_popup_with_block(frame, theme, mode.prompt_title(), 40, 50);
            frame.render_widget(Paragraph::new(lines), inner);
        }
        Mode::ToggleMember => {
            let card = app.selected_card();
            let lines = app
                .domain
                .read()
                .members
                .iter()
                .take(9)
                .enumerate()
                .map(|(index, member)| {
                    let on = card.as_ref().is_some_and(|card| card.has_member(&member.id));
                    Line::from(vec![
                        Span::styled(format!("{} ", index + 1), theme.key_hint()),
                        Span::raw(if on { "[x] " } else { "[ ] " }),
                        Span::raw(format!("{} (@{})", member.full_name, member.username)),
                    ])
                })
                .collect::<Vec<_>>();
            let inner = render_popup_with_block(frame, theme, mode.prompt_title(), 40, 50);
            frame.render_widget(Paragraph::new(lines), inner);
        }
        _ => {}
    }
}
