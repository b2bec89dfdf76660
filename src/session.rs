use crate::dates::{format_key, visible_window_at, MAX_VISIBLE_DAYS};
use crate::grid::build_grid;
use crate::models::{Document, GridView, Task, ViewMode};
use crate::notification::Notification;
use crate::registration::{register_task, ValidationError};
use chrono::NaiveDate;
use tokio::time::Instant;

#[derive(Debug, Clone, Default)]
pub struct Session {
    pub document: Document,
    pub view_mode: ViewMode,
    pub notification: Notification,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ToggleOutcome {
    Toggled(bool),
    Ignored,
}

impl Session {
    pub fn new(document: Document) -> Self {
        Self {
            document,
            ..Self::default()
        }
    }

    pub fn ensure_today(&mut self, today: &str) -> bool {
        self.document.ensure_entry(today)
    }

    pub fn grid(&self, today: NaiveDate) -> GridView {
        let window = visible_window_at(today, MAX_VISIBLE_DAYS);
        build_grid(&self.document, &window, &format_key(today))
    }

    pub fn toggle(&mut self, today: &str, date: &str, task_id: &str) -> ToggleOutcome {
        if date != today {
            return ToggleOutcome::Ignored;
        }
        ToggleOutcome::Toggled(self.document.toggle(date, task_id))
    }

    pub fn register(&mut self, name: &str, emoji: &str) -> Result<Task, ValidationError> {
        register_task(&mut self.document, name, emoji)
    }

    pub fn notify(&mut self, text: impl Into<String>, now: Instant) {
        self.notification.show(text, now);
    }

    pub fn toggle_view_mode(&mut self) -> ViewMode {
        self.view_mode = self.view_mode.toggled();
        self.view_mode
    }
}
