use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use ratatui::layout::{Constraint, Layout};
use ratatui::style::{Color, Style};
use ratatui::widgets::{Block, Gauge, Paragraph};
use ratatui::Frame;

use td_core::timer::{format_clock, FocusTimer, TimerState};

use super::terminal::{install_panic_hook, Tui};

const TICK: Duration = Duration::from_millis(200);

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerAction {
    TogglePause,
    Quit,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TimerOutcome {
    Completed,
    Quit,
}

pub fn timer_action(key: KeyEvent) -> Option<TimerAction> {
    match key.code {
        KeyCode::Char('c') if key.modifiers.contains(KeyModifiers::CONTROL) => {
            Some(TimerAction::Quit)
        }
        KeyCode::Char('q') | KeyCode::Esc => Some(TimerAction::Quit),
        KeyCode::Char('p') | KeyCode::Char(' ') => Some(TimerAction::TogglePause),
        _ => None,
    }
}

fn render(frame: &mut Frame, timer: &FocusTimer, now: Instant, category: &str) {
    let [gauge_area, help_area] =
        Layout::vertical([Constraint::Length(3), Constraint::Length(1)]).areas(frame.area());

    let paused = timer.state() == TimerState::Paused;
    let title = if paused {
        format!(" {category} (paused) ")
    } else {
        format!(" {category} ")
    };
    let label = format!(
        "{} elapsed / {} left",
        format_clock(timer.elapsed(now)),
        format_clock(timer.remaining(now))
    );
    let color = if paused { Color::Yellow } else { Color::Red };
    frame.render_widget(
        Gauge::default()
            .block(Block::bordered().title(title))
            .gauge_style(Style::default().fg(color))
            .ratio(timer.progress(now).clamp(0.0, 1.0))
            .label(label),
        gauge_area,
    );
    frame.render_widget(
        Paragraph::new("p/space pause  q quit").style(Style::default().fg(Color::DarkGray)),
        help_area,
    );
}

/// Runs a focus session in the terminal.
///
/// Quitting early returns [`TimerOutcome::Quit`]; the caller only notifies on completion.
pub fn run(duration: Duration, category: &str) -> Result<TimerOutcome> {
    install_panic_hook();
    let mut tui = Tui::new()?;
    let mut timer = FocusTimer::start(duration, Instant::now());

    let outcome = loop {
        let now = Instant::now();
        if timer.tick(now) {
            break TimerOutcome::Completed;
        }
        tui.draw(|frame| render(frame, &timer, now, category))?;
        if !event::poll(TICK)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        if key.kind != KeyEventKind::Press {
            continue;
        }
        match timer_action(key) {
            Some(TimerAction::Quit) => break TimerOutcome::Quit,
            Some(TimerAction::TogglePause) => timer.toggle_pause(Instant::now()),
            None => {}
        }
    };

    tui.restore()?;
    Ok(outcome)
}
