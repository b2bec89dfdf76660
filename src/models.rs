use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Entry = BTreeMap<String, bool>;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    pub id: String,
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, Default)]
pub struct Document {
    pub tasks: Vec<Task>,
    pub entries: BTreeMap<String, Entry>,
}

impl Document {
    pub fn is_checked(&self, date: &str, task_id: &str) -> bool {
        self.entries
            .get(date)
            .and_then(|entry| entry.get(task_id))
            .copied()
            .unwrap_or(false)
    }

    pub fn toggle(&mut self, date: &str, task_id: &str) -> bool {
        let entry = self.entries.entry(date.to_string()).or_default();
        let flag = entry.entry(task_id.to_string()).or_insert(false);
        *flag = !*flag;
        *flag
    }

    pub fn ensure_entry(&mut self, date: &str) -> bool {
        if self.entries.contains_key(date) {
            return false;
        }
        self.entries.insert(date.to_string(), Entry::new());
        true
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum ViewMode {
    #[default]
    Focused,
    Full,
}

impl ViewMode {
    pub fn toggled(self) -> Self {
        match self {
            ViewMode::Focused => ViewMode::Full,
            ViewMode::Full => ViewMode::Focused,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            ViewMode::Focused => "focused",
            ViewMode::Full => "full",
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct CellView {
    pub task_id: String,
    pub task_name: String,
    pub checked: bool,
    pub text: &'static str,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct RowView {
    pub date: String,
    pub label: String,
    pub mutable: bool,
    pub opacity: f64,
    pub cells: Vec<CellView>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct HeaderCell {
    pub task_id: String,
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GridView {
    pub today: String,
    pub rows: Vec<RowView>,
    pub footer: Vec<HeaderCell>,
    pub scroll_top: u32,
}

impl GridView {
    pub fn accepts_toggle(&self, date: &str) -> bool {
        self.rows.iter().any(|row| row.mutable && row.date == date)
    }
}

#[derive(Debug, Deserialize)]
pub struct ToggleRequest {
    pub date: String,
    pub task_id: String,
}

#[derive(Debug, Serialize, Deserialize)]
pub struct ToggleResponse {
    pub date: String,
    pub task_id: String,
    pub checked: bool,
    pub applied: bool,
}

#[derive(Debug, Deserialize)]
pub struct NewTaskRequest {
    pub name: String,
    pub emoji: String,
}

#[derive(Debug, Deserialize)]
pub struct NotifyRequest {
    pub name: String,
}
