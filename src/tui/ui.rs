//! Ratatui rendering for the review TUI.

use bytesize::ByteSize;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::Line;
use ratatui::widgets::{Block, Borders, Clear, Gauge, List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use super::app::{App, AppMode};

/// Render one frame of the application.
pub fn render(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(0),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .split(frame.area());

    render_title(frame, chunks[0]);
    match app.mode() {
        AppMode::Scanning => render_scanning(frame, chunks[1], app),
        _ => render_groups(frame, chunks[1], app),
    }
    render_status(frame, chunks[2], app);
    render_help(frame, chunks[3], app);

    if app.mode() == AppMode::Confirming {
        render_confirm(frame, app);
    }
}

fn render_title(frame: &mut Frame, area: Rect) {
    let title = Paragraph::new(" dupsweep - duplicate review")
        .style(Style::default().add_modifier(Modifier::BOLD));
    frame.render_widget(title, area);
}

fn render_scanning(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().borders(Borders::ALL).title(" Scan in progress ");

    match app.progress() {
        Some(event) if event.is_determinate() => {
            let ratio = (event.processed as f64 / event.total as f64).clamp(0.0, 1.0);
            let gauge = Gauge::default()
                .block(block)
                .gauge_style(Style::default().fg(Color::Cyan))
                .ratio(ratio)
                .label(format!(
                    "{}/{}  {}",
                    event.processed, event.total, event.label
                ));
            frame.render_widget(gauge, area);
        }
        Some(event) => {
            let text = format!("{}: {}", event.phase.label(), event.label);
            frame.render_widget(Paragraph::new(text).block(block), area);
        }
        None => {
            frame.render_widget(Paragraph::new("Starting scan...").block(block), area);
        }
    }
}

fn render_groups(frame: &mut Frame, area: Rect, app: &App) {
    let Some(outcome) = app.outcome() else {
        return;
    };

    if outcome.collection.is_empty() {
        let message = Paragraph::new("No duplicates found.")
            .block(Block::default().borders(Borders::ALL).title(" Results "))
            .style(Style::default().fg(Color::Green));
        frame.render_widget(message, area);
        return;
    }

    let mut items: Vec<ListItem> = Vec::new();
    for group in outcome.collection.groups() {
        items.push(ListItem::new(Line::styled(
            format!(
                "-- {} files x {}  [{}] --",
                group.len(),
                format_size(group.size),
                &group.fingerprint_hex()[..8]
            ),
            Style::default().fg(Color::Yellow),
        )));
        for member in group.members() {
            let marked = app.is_marked(&member.path);
            let style = if marked {
                Style::default().fg(Color::Red)
            } else {
                Style::default()
            };
            items.push(ListItem::new(Line::styled(
                format!(
                    " {} {}  {}",
                    if marked { "[x]" } else { "[ ]" },
                    member.modified_display(),
                    member.path.display()
                ),
                style,
            )));
        }
    }

    let title = format!(
        " {} group(s), {} file(s), {} reclaimable - {} marked ",
        outcome.collection.len(),
        outcome.collection.total_files(),
        format_size(outcome.collection.wasted_bytes()),
        app.marked_count()
    );
    let list = List::new(items)
        .block(Block::default().borders(Borders::ALL).title(title))
        .highlight_style(Style::default().add_modifier(Modifier::REVERSED));

    let mut state = ListState::default();
    state.select(Some(visual_index(app)));
    frame.render_stateful_widget(list, area, &mut state);
}

/// Translate the flat member cursor into a list row index, accounting
/// for the header row above each group.
fn visual_index(app: &App) -> usize {
    let cursor = app.cursor();
    let headers_before = app
        .group_offsets()
        .iter()
        .filter(|&&offset| offset <= cursor)
        .count();
    cursor + headers_before
}

fn render_status(frame: &mut Frame, area: Rect, app: &App) {
    let status = Paragraph::new(format!(" {}", app.status()))
        .style(Style::default().fg(Color::Blue));
    frame.render_widget(status, area);
}

fn render_help(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.mode() {
        AppMode::Scanning => " q quit",
        AppMode::Reviewing => {
            " space mark | o keep oldest | n keep newest | c clear | m move marked | q quit"
        }
        AppMode::Confirming => " y confirm | n cancel",
        AppMode::Quitting => "",
    };
    frame.render_widget(
        Paragraph::new(help).style(Style::default().fg(Color::DarkGray)),
        area,
    );
}

fn render_confirm(frame: &mut Frame, app: &App) {
    let area = centered_rect(frame.area(), 50, 20);
    let text = format!(
        "Move {} marked file(s) to the quarantine folder?\n\n[y] move    [n] cancel",
        app.marked_count()
    );
    let dialog = Paragraph::new(text)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Confirm relocation "),
        )
        .style(Style::default().fg(Color::Red));
    frame.render_widget(Clear, area);
    frame.render_widget(dialog, area);
}

/// Format a byte count for display.
#[must_use]
pub fn format_size(bytes: u64) -> String {
    ByteSize::b(bytes).to_string()
}

/// A rect centered in `area`, sized as a percentage of it.
fn centered_rect(area: Rect, percent_x: u16, percent_y: u16) -> Rect {
    let vertical = Layout::vertical([
        Constraint::Percentage((100 - percent_y) / 2),
        Constraint::Percentage(percent_y),
        Constraint::Percentage((100 - percent_y) / 2),
    ])
    .split(area);
    let horizontal = Layout::horizontal([
        Constraint::Percentage((100 - percent_x) / 2),
        Constraint::Percentage(percent_x),
        Constraint::Percentage((100 - percent_x) / 2),
    ])
    .split(vertical[1]);
    horizontal[1]
}
