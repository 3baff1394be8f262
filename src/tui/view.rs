//! Draws a page's render targets and the toast stack into a ratatui frame

use crate::notify::{Toast, ToastLevel};
use crate::render::{BadgeTone, Content, ListItem, PlaceholderKind, Target, targets};
use ratatui::Frame;
use ratatui::layout::{Constraint, Layout, Rect};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Borders, Clear, List, ListItem as ListRow, Paragraph, Wrap};
use std::collections::BTreeMap;

const KEY_HINTS: &str = "r refresh · n menu · i install · d dismiss · q quit";
const MENU_WIDTH: u16 = 22;
const TOAST_WIDTH: u16 = 44;

/// Everything one frame needs, copied out of the shared state
pub struct ViewModel {
    pub targets: BTreeMap<String, Target>,
    pub toasts: Vec<Toast>,
    pub menu_open: bool,
    pub loading: bool,
}

pub fn draw(frame: &mut Frame, view: &ViewModel) {
    let area = frame.area();
    let [header, body, footer] = Layout::vertical([
        Constraint::Length(3),
        Constraint::Min(0),
        Constraint::Length(1),
    ])
    .areas(area);

    draw_header(frame, header, view);

    let body = if view.menu_open {
        let [menu, rest] =
            Layout::horizontal([Constraint::Length(MENU_WIDTH), Constraint::Min(0)]).areas(body);
        draw_menu(frame, menu);
        rest
    } else {
        body
    };

    if has_dashboard(&view.targets) {
        draw_dashboard(frame, body, &view.targets);
    } else {
        let hint = Paragraph::new("Nothing to show on this page. Press r to open the dashboard.")
            .block(Block::default().borders(Borders::ALL));
        frame.render_widget(hint, body);
    }

    frame.render_widget(
        Paragraph::new(KEY_HINTS).style(Style::default().fg(Color::DarkGray)),
        footer,
    );

    draw_toasts(frame, area, &view.toasts);
}

fn has_dashboard(targets: &BTreeMap<String, Target>) -> bool {
    targets.contains_key(targets::DOCTOR_COUNT)
}

fn text_of<'a>(targets: &'a BTreeMap<String, Target>, id: &str) -> &'a str {
    targets
        .get(id)
        .and_then(|t| t.content.as_text())
        .unwrap_or("-")
}

fn draw_header(frame: &mut Frame, area: Rect, view: &ViewModel) {
    let mut spans = vec![Span::styled(
        "Clinic Dashboard",
        Style::default().add_modifier(Modifier::BOLD),
    )];

    let stamp = view
        .targets
        .get(targets::LAST_UPDATED)
        .and_then(|t| t.content.as_text());
    if let Some(stamp) = stamp {
        spans.push(Span::raw("  "));
        spans.push(Span::styled(stamp.to_string(), Style::default().fg(Color::DarkGray)));
    }
    if view.loading {
        spans.push(Span::styled("  loading…", Style::default().fg(Color::Yellow)));
    }
    if view.targets.get(targets::INSTALL_BUTTON).is_some_and(|t| t.visible) {
        spans.push(Span::styled("  [i] Install app", Style::default().fg(Color::Cyan)));
    }

    let header = Paragraph::new(Line::from(spans)).block(Block::default().borders(Borders::ALL));
    frame.render_widget(header, area);
}

fn draw_menu(frame: &mut Frame, area: Rect) {
    let rows: Vec<ListRow> = ["Dashboard", "Doctors", "Clinics", "Roster", "On-call", "Notifications"]
        .into_iter()
        .map(ListRow::new)
        .collect();
    frame.render_widget(
        List::new(rows).block(Block::default().title("Menu").borders(Borders::ALL)),
        area,
    );
}

fn draw_dashboard(frame: &mut Frame, area: Rect, page: &BTreeMap<String, Target>) {
    let [stats, lists] =
        Layout::vertical([Constraint::Length(4), Constraint::Min(0)]).areas(area);

    let stat_areas = Layout::horizontal([Constraint::Ratio(1, 4); 4]).split(stats);
    let cards = [
        ("Doctors", targets::DOCTOR_COUNT),
        ("Clinics", targets::CLINIC_COUNT),
        ("Today's roster", targets::ROSTER_COUNT),
        ("Pending notifications", targets::NOTIFICATION_COUNT),
    ];
    for ((title, id), card) in cards.into_iter().zip(stat_areas.iter()) {
        let value = Paragraph::new(text_of(page, id))
            .style(Style::default().add_modifier(Modifier::BOLD))
            .block(Block::default().title(title).borders(Borders::ALL));
        frame.render_widget(value, *card);
    }

    let [schedule, on_call] =
        Layout::horizontal([Constraint::Percentage(50), Constraint::Percentage(50)]).areas(lists);
    draw_list_target(frame, schedule, "Today's schedule", page.get(targets::TODAY_SCHEDULE));
    draw_list_target(frame, on_call, "On call today", page.get(targets::ON_CALL_TODAY));
}

fn draw_list_target(frame: &mut Frame, area: Rect, title: &str, target: Option<&Target>) {
    let block = Block::default().title(title.to_string()).borders(Borders::ALL);

    match target.map(|t| &t.content) {
        Some(Content::Items(items)) => {
            let rows: Vec<ListRow> = items.iter().map(list_row).collect();
            frame.render_widget(List::new(rows).block(block), area);
        }
        Some(Content::Placeholder { kind, message }) => {
            let color = match kind {
                PlaceholderKind::Empty => Color::DarkGray,
                PlaceholderKind::Error => Color::Red,
            };
            let placeholder = Paragraph::new(message.clone())
                .style(Style::default().fg(color))
                .wrap(Wrap { trim: true })
                .block(block);
            frame.render_widget(placeholder, area);
        }
        Some(Content::Text(text)) => {
            frame.render_widget(Paragraph::new(text.clone()).block(block), area);
        }
        Some(Content::Blank) | None => frame.render_widget(block, area),
    }
}

fn list_row(item: &ListItem) -> ListRow<'static> {
    let mut title = vec![Span::styled(
        item.title.clone(),
        Style::default().add_modifier(Modifier::BOLD),
    )];
    if let Some(badge) = &item.badge {
        let color = match badge.tone {
            BadgeTone::Success => Color::Green,
            BadgeTone::Warning => Color::Yellow,
            BadgeTone::Neutral => Color::Gray,
        };
        title.push(Span::raw(" "));
        title.push(Span::styled(format!("[{}]", badge.label), Style::default().fg(color)));
    }

    let mut lines = vec![Line::from(title)];
    if let Some(subtitle) = &item.subtitle {
        lines.push(Line::from(format!("  {}", subtitle)));
    }
    for detail in &item.details {
        lines.push(Line::from(format!("  {}", detail)));
    }
    ListRow::new(lines)
}

fn draw_toasts(frame: &mut Frame, area: Rect, toasts: &[Toast]) {
    let width = TOAST_WIDTH.min(area.width);
    let mut y = area.y + 1;

    for toast in toasts.iter().rev() {
        if y + 3 > area.y + area.height {
            break;
        }
        let color = match toast.level {
            ToastLevel::Success => Color::Green,
            ToastLevel::Error => Color::Red,
        };
        let rect = Rect {
            x: area.x + area.width.saturating_sub(width + 1),
            y,
            width,
            height: 3,
        };
        let text = format!("{} {}", toast.level.icon(), toast.message);
        frame.render_widget(Clear, rect);
        frame.render_widget(
            Paragraph::new(text).block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(color)),
            ),
            rect,
        );
        y += 3;
    }
}
