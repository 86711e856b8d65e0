//! State machine behind the interactive task list.
//!
//! The terminal runtime owns the event loop; it feeds [`ListEvent`]s in and acts
//! on the returned [`Effect`]. Store failures are recorded in `status` and the
//! list keeps its previous contents.

use std::path::PathBuf;

use chrono::NaiveDate;
use tracing::warn;

use crate::checkbox;
use crate::store::{StoreError, Task, TaskStore};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ListEvent {
    Up,
    Down,
    Previous,
    Next,
    Toggle,
    Edit,
    Reload,
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    None,
    /// Hand the terminal to the editor, then send [`ListEvent::Reload`].
    OpenEditor { path: PathBuf, line: usize },
    Quit,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ListState {
    pub cursor: usize,
    pub date: NaiveDate,
    pub tasks: Vec<Task>,
    pub status: Option<String>,
}

pub struct ListController<'a> {
    store: &'a TaskStore,
    state: ListState,
}

impl<'a> ListController<'a> {
    /// Loads the tasks for `date`. A failed load starts with an empty list and a status message.
    pub fn new(store: &'a TaskStore, date: NaiveDate) -> Self {
        let mut controller = Self {
            store,
            state: ListState {
                cursor: 0,
                date,
                tasks: Vec::new(),
                status: None,
            },
        };
        controller.reload();
        controller
    }

    pub fn state(&self) -> &ListState {
        &self.state
    }

    pub fn header(&self) -> String {
        self.store.period().header(self.state.date)
    }

    pub fn selected(&self) -> Option<&Task> {
        self.state.tasks.get(self.state.cursor)
    }

    pub fn handle(&mut self, event: ListEvent) -> Effect {
        match event {
            ListEvent::Quit => return Effect::Quit,
            ListEvent::Up => {
                self.state.cursor = self.state.cursor.saturating_sub(1);
            }
            ListEvent::Down => {
                if self.state.cursor + 1 < self.state.tasks.len() {
                    self.state.cursor += 1;
                }
            }
            ListEvent::Previous => {
                self.state.date = self.store.period().previous(self.state.date);
                self.reload();
            }
            ListEvent::Next => {
                self.state.date = self.store.period().next(self.state.date);
                self.reload();
            }
            ListEvent::Toggle => self.toggle(),
            ListEvent::Edit => return self.edit(),
            ListEvent::Reload => self.reload(),
        }
        Effect::None
    }

    fn reload(&mut self) {
        match self.store.load_tasks(self.state.date) {
            Ok(tasks) => {
                self.state.tasks = tasks;
                self.state.status = None;
            }
            Err(err) => self.fail(err),
        }
        self.clamp_cursor();
    }

    fn clamp_cursor(&mut self) {
        let max = self.state.tasks.len().saturating_sub(1);
        self.state.cursor = self.state.cursor.min(max);
    }

    fn toggle(&mut self) {
        let Some(task) = self.state.tasks.get(self.state.cursor) else {
            return;
        };
        let checked = !task.checked;
        // The raw line carries the marker, so headers or prose that merely
        // mention the text are never matched.
        match self
            .store
            .set_task_status(self.state.date, &task.raw_line, checked)
        {
            Ok(()) => {
                let task = &mut self.state.tasks[self.state.cursor];
                task.checked = checked;
                task.raw_line = checkbox::set_marker(&task.raw_line, checked);
                self.state.status = None;
            }
            Err(err) => self.fail(err),
        }
    }

    fn edit(&mut self) -> Effect {
        let text = self.selected().map(|task| task.text.clone());
        let line = match text {
            Some(text) => match self.store.locate_line(self.state.date, &text) {
                Ok(line) => line.max(1),
                Err(err) => {
                    self.fail(err);
                    return Effect::None;
                }
            },
            None => 1,
        };
        match self.store.prepare_for_edit(self.state.date) {
            Ok(path) => Effect::OpenEditor { path, line },
            Err(err) => {
                self.fail(err);
                Effect::None
            }
        }
    }

    /// Records a failure coming from outside the controller, e.g. the editor process.
    pub fn report(&mut self, message: impl Into<String>) {
        self.state.status = Some(message.into());
    }

    fn fail(&mut self, err: StoreError) {
        warn!(error = %err, "task list operation failed");
        self.state.status = Some(err.to_string());
    }
}
