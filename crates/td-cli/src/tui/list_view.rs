use std::collections::HashMap;

use anyhow::Result;
use chrono::NaiveDate;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Modifier, Style};
use ratatui::text::{Line, Span};
use ratatui::widgets::{List, ListItem, ListState, Paragraph};
use ratatui::Frame;

use td_core::list::{Effect, ListController, ListEvent};
use td_core::store::TaskStore;

use super::terminal::{install_panic_hook, Tui};
use crate::editor;

const HELP: &str = "j/k move  h/l period  space toggle  e edit  q quit";

pub fn list_event(key: KeyEvent) -> Option<ListEvent> {
    if key.modifiers.contains(KeyModifiers::CONTROL) {
        return match key.code {
            KeyCode::Char('c') => Some(ListEvent::Quit),
            _ => None,
        };
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => Some(ListEvent::Quit),
        KeyCode::Char('k') | KeyCode::Up => Some(ListEvent::Up),
        KeyCode::Char('j') | KeyCode::Down => Some(ListEvent::Down),
        KeyCode::Char('h') | KeyCode::Left => Some(ListEvent::Previous),
        KeyCode::Char('l') | KeyCode::Right => Some(ListEvent::Next),
        KeyCode::Char(' ') | KeyCode::Enter => Some(ListEvent::Toggle),
        KeyCode::Char('e') => Some(ListEvent::Edit),
        _ => None,
    }
}

/// Formats one row the same way the plain `show` command does, plus the cursor column.
pub fn row_text(selected: bool, checked: bool, text: &str) -> String {
    let cursor = if selected { ">" } else { " " };
    let mark = if checked { "x" } else { " " };
    format!("{cursor} [{mark}] {text}")
}

fn render(frame: &mut Frame, list: &ListController) {
    let state = list.state();
    let [header_area, body_area, status_area, help_area] = Layout::vertical([
        Constraint::Length(1),
        Constraint::Min(1),
        Constraint::Length(1),
        Constraint::Length(1),
    ])
    .areas(frame.area());

    let header = list.header();
    frame.render_widget(
        Paragraph::new(header.trim_end()).style(Style::default().add_modifier(Modifier::BOLD)),
        header_area,
    );

    let items: Vec<ListItem> = state
        .tasks
        .iter()
        .enumerate()
        .map(|(idx, task)| {
            let color = if task.checked { Color::Green } else { Color::White };
            let mut style = Style::default().fg(color);
            if idx == state.cursor {
                style = style.add_modifier(Modifier::BOLD);
            }
            ListItem::new(Line::from(Span::styled(
                row_text(idx == state.cursor, task.checked, &task.text),
                style,
            )))
        })
        .collect();
    if items.is_empty() {
        frame.render_widget(List::new(vec![ListItem::new("  (no tasks)")]), body_area);
    } else {
        // Selecting the cursor row makes ratatui scroll it into view.
        let mut list_state = ListState::default().with_selected(Some(state.cursor));
        frame.render_stateful_widget(List::new(items), body_area, &mut list_state);
    }

    if let Some(status) = state.status.as_deref() {
        frame.render_widget(
            Paragraph::new(status).style(Style::default().fg(Color::Red)),
            status_area,
        );
    }
    frame.render_widget(
        Paragraph::new(HELP).style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

/// Interactive list for `date` until the user quits.
pub fn run(store: &TaskStore, date: NaiveDate, env: &HashMap<String, String>) -> Result<()> {
    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut list = ListController::new(store, date);

    loop {
        tui.draw(|frame| render(frame, &list))?;
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        let Some(action) = list_event(key) else {
            continue;
        };
        match list.handle(action) {
            Effect::None => {}
            Effect::Quit => break,
            Effect::OpenEditor { path, line } => {
                tui.suspend()?;
                let result = editor::open(&path, line, env);
                tui.resume()?;
                list.handle(ListEvent::Reload);
                if let Err(err) = result {
                    tracing::warn!(error = %format!("{err:#}"), "editor failed");
                    list.report(format!("{err:#}"));
                }
            }
        }
    }

    tui.restore()?;
    Ok(())
}
