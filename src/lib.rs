pub mod app;
pub mod config;
pub mod dates;
pub mod errors;
pub mod grid;
pub mod handlers;
pub mod models;
pub mod notification;
pub mod offline;
pub mod registration;
pub mod session;
pub mod state;
pub mod storage;
pub mod ui;

pub use app::router;
pub use config::{AppConfig, ProxyConfig};
pub use session::Session;
pub use state::AppState;
pub use storage::{load_document, resolve_data_path, save_document};
