pub mod cache;
pub mod fetch;
pub mod lifecycle;
pub mod proxy;
pub mod worker;

pub use cache::{Cache, CacheStorage};
pub use fetch::{CachedResponse, Fetch, FetchRequest, HttpFetcher};
pub use lifecycle::{ExtendableEvent, WorkerHost, WorkerState};
pub use worker::{Interception, ServiceWorker, APP_SHELL, CACHE_NAME};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum OfflineError {
    #[error("network request failed: {0}")]
    Network(String),
    #[error("Network request failed and no cached response found.")]
    Offline,
    #[error("invalid url `{0}`")]
    InvalidUrl(String),
    #[error("failed to cache {url}: {reason}")]
    Install { url: String, reason: String },
    #[error("worker is {0:?}, expected Installed")]
    NotInstalled(WorkerState),
    #[error("lifecycle task failed: {0}")]
    TaskFailed(String),
}
