//! Dirty Water rendering (read-only from state).

use std::cell::RefCell;
use std::rc::Rc;

use ratzilla::ratatui::layout::{Constraint, Direction, Layout, Rect};
use ratzilla::ratatui::style::{Color, Modifier, Style};
use ratzilla::ratatui::text::{Line, Span};
use ratzilla::ratatui::widgets::{Block, Borders, Paragraph, Wrap};
use ratzilla::ratatui::Frame;

use crate::input::{is_narrow_layout, ClickState};
use crate::widgets::ClickableList;

use super::actions::choice_action;
use super::data::ItemKind;
use super::logic;
use super::state::{GameState, Phase, Screen};

pub fn render(
    state: &GameState,
    visible: &str,
    typing: bool,
    f: &mut Frame,
    area: Rect,
    click_state: &Rc<RefCell<ClickState>>,
) {
    let is_narrow = is_narrow_layout(area.width);
    let borders = if is_narrow {
        Borders::TOP | Borders::BOTTOM
    } else {
        Borders::ALL
    };
    let width = area.width.saturating_sub(if is_narrow { 0 } else { 2 });
    let screen = logic::screen(state);

    // Sized from the full text so panels do not grow while typing.
    let story_rows = Paragraph::new(screen.text.as_str())
        .wrap(Wrap { trim: false })
        .line_count(width)
        .max(1) as u16;
    let choices = choice_list(&screen);
    let choice_rows = choices.visual_height(width).max(1);

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(4),                             // Status
            Constraint::Min(story_rows + 2),                   // Story
            Constraint::Length(choice_rows + 2),               // Choices
            Constraint::Length(if is_narrow { 5 } else { 8 }), // Log
        ])
        .split(area);

    let choices = if typing || screen.choices.is_empty() {
        waiting_list()
    } else {
        choices
    };

    render_status(state, f, chunks[0], borders, is_narrow);
    render_story(state, visible, f, chunks[1], borders);
    render_choices(choices, f, chunks[2], borders, width, click_state);
    render_log(state, f, chunks[3], borders);
}

// ── Status ─────────────────────────────────────────────────────

fn render_status(state: &GameState, f: &mut Frame, area: Rect, borders: Borders, is_narrow: bool) {
    let status = state.status();
    let bar_width = if is_narrow { 10 } else { 20 };
    let ratio = status.hp.max(0) as f64 / status.max_hp.max(1) as f64;
    let hp_color = if ratio > 0.5 {
        Color::Green
    } else if ratio > 0.25 {
        Color::Yellow
    } else {
        Color::Red
    };

    let lines = vec![
        Line::from(vec![
            Span::styled(" HP ", Style::default().fg(Color::Gray)),
            Span::styled(hp_bar(status.hp, status.max_hp, bar_width), Style::default().fg(hp_color)),
            Span::styled(
                format!(" {}/{}", status.hp.max(0), status.max_hp),
                Style::default().fg(Color::White).add_modifier(Modifier::BOLD),
            ),
            Span::styled("  LV ", Style::default().fg(Color::Gray)),
            Span::styled(
                status.level.to_string(),
                Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
            ),
        ]),
        Line::from(vec![
            Span::styled(" INV ", Style::default().fg(Color::Gray)),
            Span::styled(inventory_summary(status.inventory), Style::default().fg(Color::Yellow)),
        ]),
    ];

    let title = if is_narrow { " Dirty Water " } else { " Dirty Water - a walk gone wrong " };
    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Blue))
        .title(Span::styled(
            title,
            Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD),
        ));
    f.render_widget(Paragraph::new(lines).block(block), area);
}

fn hp_bar(hp: i32, max_hp: i32, width: usize) -> String {
    let ratio = (hp.max(0) as f64 / max_hp.max(1) as f64).min(1.0);
    let filled = (ratio * width as f64).round() as usize;
    "█".repeat(filled) + &"░".repeat(width - filled)
}

/// "Beer x2, Rubber Ball" in first-seen order.
fn inventory_summary(inventory: &[ItemKind]) -> String {
    if inventory.is_empty() {
        return "(empty)".to_string();
    }
    let mut counts: Vec<(ItemKind, usize)> = Vec::new();
    for &item in inventory {
        match counts.iter_mut().find(|(k, _)| *k == item) {
            Some((_, n)) => *n += 1,
            None => counts.push((item, 1)),
        }
    }
    counts
        .iter()
        .map(|&(item, n)| {
            if n > 1 {
                format!("{} x{}", item.name(), n)
            } else {
                item.name().to_string()
            }
        })
        .collect::<Vec<_>>()
        .join(", ")
}

// ── Story ──────────────────────────────────────────────────────

fn render_story(state: &GameState, visible: &str, f: &mut Frame, area: Rect, borders: Borders) {
    let color = match state.phase {
        Phase::GameOver => Color::Red,
        Phase::FightMenu | Phase::AttackMenu | Phase::ItemMenu => Color::LightRed,
        Phase::LevelUp | Phase::Found(_) => Color::LightGreen,
        _ => Color::White,
    };
    let lines: Vec<Line> = visible
        .lines()
        .map(|l| Line::from(Span::styled(l.to_string(), Style::default().fg(color))))
        .collect();

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray));
    let widget = Paragraph::new(lines).block(block).wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

// ── Choices ────────────────────────────────────────────────────

fn choice_list(screen: &Screen) -> ClickableList<'static> {
    let mut cl = ClickableList::new();
    for (i, c) in screen.choices.iter().enumerate() {
        push_choice(&mut cl, i, &c.label);
    }
    cl
}

/// Shown while text is still typing or before an automatic follow-up.
fn waiting_list() -> ClickableList<'static> {
    let mut cl = ClickableList::new();
    cl.push(Line::from(Span::styled(" ...", Style::default().fg(Color::DarkGray))));
    cl
}

fn render_choices(
    cl: ClickableList<'static>,
    f: &mut Frame,
    area: Rect,
    borders: Borders,
    width: u16,
    click_state: &Rc<RefCell<ClickState>>,
) {
    {
        let mut cs = click_state.borrow_mut();
        cl.register_targets(area, &mut cs, 1, 1, width);
    }

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::Yellow));
    let widget = Paragraph::new(cl.into_lines()).block(block).wrap(Wrap { trim: false });
    f.render_widget(widget, area);
}

/// Digit key shown for the first nine choices; the rest are tap-only.
fn push_choice(cl: &mut ClickableList<'static>, index: usize, label: &str) {
    let key = if index < 9 {
        format!(" [{}] ", index + 1)
    } else {
        "     ".to_string()
    };
    cl.push_clickable(
        Line::from(vec![
            Span::styled(key, Style::default().fg(Color::Yellow).add_modifier(Modifier::BOLD)),
            Span::styled(label.to_string(), Style::default().fg(Color::White)),
        ]),
        choice_action(index),
    );
}

// ── Log ────────────────────────────────────────────────────────

fn render_log(state: &GameState, f: &mut Frame, area: Rect, borders: Borders) {
    let visible = area.height.saturating_sub(2) as usize;
    let skip = state.log.len().saturating_sub(visible);
    let lines: Vec<Line> = state.log[skip..]
        .iter()
        .map(|msg| Line::from(Span::styled(format!(" {}", msg), Style::default().fg(Color::Gray))))
        .collect();

    let block = Block::default()
        .borders(borders)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(" Log ");
    f.render_widget(Paragraph::new(lines).block(block), area);
}
