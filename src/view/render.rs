//! Drawing of the directory page: the user cards and the modal form.

use ratatui::{
    layout::{Constraint, Direction, Layout, Rect},
    prelude::*,
    style::{Color, Modifier, Style},
    widgets::{Block, Borders, Clear, List, ListItem, ListState, Paragraph, Wrap},
};

use crate::domain::{User, UserField};
use crate::view::input::{FORM_KEYS, LIST_KEYS};
use crate::view::ViewState;

pub enum MessageKind {
    Info,
    Error,
}

pub struct StatusMessage {
    pub kind: MessageKind,
    pub text: String,
}

/// Terminal-only view state layered over the directory's [`ViewState`].
pub struct Screen<'a> {
    /// Highlighted card
    pub selected: usize,
    /// Index into [`UserField::FORM`] of the focused input
    pub focus: usize,
    pub message: Option<&'a StatusMessage>,
}

pub fn draw(frame: &mut Frame, state: &ViewState, screen: &Screen<'_>) {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(4), Constraint::Length(4)].as_ref())
        .split(frame.size());

    draw_header(frame, vertical[0]);
    draw_cards(frame, vertical[1], state, screen.selected);
    draw_status(frame, vertical[2], state, screen.message);

    if state.is_modal_visible() {
        draw_modal(frame, centered_rect(60, 80, frame.size()), state, screen.focus);
    }
}

fn draw_header(frame: &mut Frame, area: Rect) {
    let title = Line::from(vec![
        Span::styled(
            "Users Information",
            Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
        ),
        Span::raw("   "),
        Span::styled("[a] Add User", Style::default().fg(Color::Green)),
    ]);
    frame.render_widget(Paragraph::new(title).block(Block::default().borders(Borders::ALL)), area);
}

fn draw_cards(frame: &mut Frame, area: Rect, state: &ViewState, selected: usize) {
    let block = Block::default()
        .borders(Borders::ALL)
        .title(format!("Users ({})", state.users().len()));

    if state.users().is_empty() {
        let empty = Paragraph::new(Span::styled("(no users)", Style::default().fg(Color::DarkGray)));
        frame.render_widget(empty.block(block), area);
        return;
    }

    let items: Vec<ListItem> = state.users().iter().map(card).collect();
    let list = List::new(items)
        .block(block)
        .highlight_style(Style::new().fg(Color::Cyan).add_modifier(Modifier::BOLD))
        .highlight_symbol("> ");

    let mut list_state = ListState::default();
    list_state.select(Some(selected.min(state.users().len() - 1)));
    frame.render_stateful_widget(list, area, &mut list_state);
}

fn card(user: &User) -> ListItem<'static> {
    let address = &user.address;
    let id = user.id.map(|id| id.to_string()).unwrap_or_else(|| "-".to_string());
    let dim = Style::default().fg(Color::Gray);

    ListItem::new(vec![
        Line::from(Span::styled(
            format!("Name: {}", user.name),
            Style::default().add_modifier(Modifier::BOLD),
        )),
        Line::from(format!("  Username: {}", user.username)),
        Line::from(format!("  Email: {}", user.email)),
        Line::from(format!("  Phone: {}", user.phone)),
        Line::from(format!("  Website: {}", user.website)),
        Line::from(format!(
            "  Address: {}, {}, {}, {}",
            address.street, address.suite, address.city, address.zipcode
        )),
        Line::from(Span::styled(format!("  #{id}  [e] Edit  [d] Delete"), dim)),
        Line::default(),
    ])
}

fn draw_status(frame: &mut Frame, area: Rect, state: &ViewState, message: Option<&StatusMessage>) {
    let keys = if state.is_modal_visible() { FORM_KEYS } else { LIST_KEYS };
    let mut lines = vec![Line::from(Span::styled(keys, Style::default().fg(Color::Gray)))];
    if let Some(message) = message {
        let style = match message.kind {
            MessageKind::Info => Style::default().fg(Color::Gray),
            MessageKind::Error => Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
        };
        lines.push(Line::from(Span::styled(message.text.clone(), style)));
    }

    let status = Paragraph::new(lines)
        .block(Block::default().borders(Borders::ALL).title("Status"))
        .wrap(Wrap { trim: true });
    frame.render_widget(status, area);
}

fn draw_modal(frame: &mut Frame, area: Rect, state: &ViewState, focus: usize) {
    let (title, submit) = if state.is_editing() {
        ("Edit User", "Update User")
    } else {
        ("Add User", "Save User")
    };
    let draft = state.draft();

    let mut lines = Vec::new();
    for (idx, field) in UserField::FORM.into_iter().enumerate() {
        if field.is_address() && !UserField::FORM[idx.saturating_sub(1)].is_address() {
            lines.push(Line::default());
            lines.push(Line::from(Span::styled(
                "Address:",
                Style::default().add_modifier(Modifier::BOLD),
            )));
        }
        lines.push(input_line(field, draft, idx == focus));
    }
    lines.push(Line::default());
    lines.push(Line::from(vec![
        Span::styled(format!("[Enter] {submit}"), Style::default().fg(Color::Green)),
        Span::raw("  "),
        Span::styled("[Esc] Cancel", Style::default().fg(Color::Red)),
    ]));

    let form = Paragraph::new(lines).block(
        Block::default()
            .borders(Borders::ALL)
            .title(Span::styled(
                format!(" {title} "),
                Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD),
            )),
    );
    frame.render_widget(Clear, area);
    frame.render_widget(form, area);
}

fn input_line(field: UserField, draft: &User, focused: bool) -> Line<'static> {
    let marker = if focused { "> " } else { "  " };
    let label_style = if focused {
        Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD)
    } else {
        Style::default()
    };
    let value = field.get(draft);
    let value = if value.is_empty() {
        Span::styled(format!("<{}>", field.label()), Style::default().fg(Color::DarkGray))
    } else {
        Span::raw(value.to_string())
    };

    Line::from(vec![
        Span::styled(format!("{marker}{:<10}", format!("{}:", field.label())), label_style),
        value,
    ])
}

/// A rectangle of `percent_x` by `percent_y` centered in `area`.
fn centered_rect(percent_x: u16, percent_y: u16, area: Rect) -> Rect {
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints(
            [
                Constraint::Percentage((100 - percent_y) / 2),
                Constraint::Percentage(percent_y),
                Constraint::Percentage((100 - percent_y) / 2),
            ]
            .as_ref(),
        )
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints(
            [
                Constraint::Percentage((100 - percent_x) / 2),
                Constraint::Percentage(percent_x),
                Constraint::Percentage((100 - percent_x) / 2),
            ]
            .as_ref(),
        )
        .split(vertical[1])[1]
}

/// Flattens a test terminal's buffer into one string per row.
#[cfg(test)]
pub fn buffer_text(backend: &ratatui::backend::TestBackend) -> String {
    let buffer = backend.buffer();
    let width = usize::from(buffer.area.width);
    buffer
        .content()
        .chunks(width)
        .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
        .collect::<Vec<_>>()
        .join("\n")
}
