use crate::errors::AppError;
use crate::models::{Document, Entry, Task};
use serde_json::Value;
use std::{env, path::Path, path::PathBuf};
use tokio::fs;
use tracing::{error, warn};

pub const STORAGE_KEY: &str = "daily-tasks-checker-v1";

pub fn resolve_data_path() -> Result<PathBuf, std::io::Error> {
    if let Ok(path) = env::var("APP_DATA_PATH") {
        return Ok(PathBuf::from(path));
    }

    Ok(PathBuf::from("data").join(format!("{STORAGE_KEY}.json")))
}

/// Reads the stored document. Absent, unreadable or malformed payloads all
/// come back as the empty document.
pub async fn load_document(path: &Path) -> Document {
    match fs::read(path).await {
        Ok(bytes) => match serde_json::from_slice::<Value>(&bytes) {
            Ok(value) => document_from_value(value),
            Err(err) => {
                error!("failed to parse data file: {err}");
                Document::default()
            }
        },
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => Document::default(),
        Err(err) => {
            error!("failed to read data file: {err}");
            Document::default()
        }
    }
}

pub fn document_from_value(value: Value) -> Document {
    let Value::Object(mut root) = value else {
        warn!("stored document is not an object, starting empty");
        return Document::default();
    };

    let (Some(Value::Array(items)), Some(Value::Object(days))) =
        (root.remove("tasks"), root.remove("entries"))
    else {
        warn!("stored document has the wrong shape, starting empty");
        return Document::default();
    };

    let tasks = items
        .into_iter()
        .filter_map(|item| match serde_json::from_value::<Task>(item) {
            Ok(task) => Some(task),
            Err(err) => {
                warn!("dropping malformed task: {err}");
                None
            }
        })
        .collect();

    let entries = days
        .into_iter()
        .filter_map(|(date, day)| match day {
            Value::Object(flags) => Some((date, entry_from_flags(flags))),
            _ => None,
        })
        .collect();

    Document { tasks, entries }
}

fn entry_from_flags(flags: serde_json::Map<String, Value>) -> Entry {
    flags
        .into_iter()
        .filter_map(|(task_id, flag)| flag.as_bool().map(|flag| (task_id, flag)))
        .collect()
}

pub async fn save_document(path: &Path, document: &Document) -> Result<(), AppError> {
    let payload = serde_json::to_vec_pretty(document).map_err(AppError::internal)?;
    let tmp_path = temp_path_for(path);
    fs::write(&tmp_path, payload).await?;
    if let Err(err) = fs::rename(&tmp_path, path).await {
        let _ = fs::remove_file(&tmp_path).await;
        return Err(err.into());
    }
    Ok(())
}

fn temp_path_for(path: &Path) -> PathBuf {
    let mut name = path
        .file_name()
        .map(|name| name.to_os_string())
        .unwrap_or_else(|| STORAGE_KEY.into());
    name.push(".tmp");
    path.with_file_name(name)
}
