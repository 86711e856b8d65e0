//! Terminal front ends for the task list and the focus timer.

pub mod list_view;
pub mod terminal;
pub mod timer_view;
