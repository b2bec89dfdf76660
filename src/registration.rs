use crate::models::{Document, Task};
use regex::Regex;
use std::sync::OnceLock;
use unicode_segmentation::UnicodeSegmentation;
use uuid::Uuid;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("Please enter full routine name.")]
    EmptyName,
    #[error("Emoji field must contain a valid emoji.")]
    InvalidEmoji,
}

impl ValidationError {
    pub fn field(&self) -> &'static str {
        match self {
            ValidationError::EmptyName => "name",
            ValidationError::InvalidEmoji => "emoji",
        }
    }
}

fn pictographic() -> &'static Regex {
    static PATTERN: OnceLock<Regex> = OnceLock::new();
    PATTERN.get_or_init(|| {
        Regex::new(r"\p{Extended_Pictographic}").expect("pictographic pattern compiles")
    })
}

pub fn is_single_emoji(value: &str) -> bool {
    let mut clusters = value.graphemes(true);
    match (clusters.next(), clusters.next()) {
        (Some(cluster), None) => pictographic().is_match(cluster),
        _ => false,
    }
}

pub fn register_task(
    document: &mut Document,
    name: &str,
    emoji: &str,
) -> Result<Task, ValidationError> {
    let name = name.trim();
    if name.is_empty() {
        return Err(ValidationError::EmptyName);
    }

    let emoji = emoji.trim();
    if !is_single_emoji(emoji) {
        return Err(ValidationError::InvalidEmoji);
    }

    let task = Task {
        id: Uuid::new_v4().to_string(),
        name: name.to_string(),
        emoji: emoji.to_string(),
    };
    document.tasks.push(task.clone());
    Ok(task)
}
