use super::cache::CacheStorage;
use super::fetch::{CachedResponse, Fetch, FetchRequest};
use super::lifecycle::ExtendableEvent;
use super::OfflineError;
use axum::http::Method;
use reqwest::Url;
use std::sync::Arc;
use tracing::{debug, info, warn};

pub const CACHE_NAME: &str = "daily-tasks-checker-cache-v1";

pub const APP_SHELL: [&str; 7] = [
    "./",
    "./index.html",
    "./styles.css",
    "./app.js",
    "./manifest.webmanifest",
    "./icons/icon-192.svg",
    "./icons/icon-512.svg",
];

#[derive(Debug, Clone, PartialEq)]
pub enum Interception {
    PassThrough,
    Respond(Result<CachedResponse, OfflineError>),
}

pub struct ServiceWorker<F> {
    scope: Url,
    cache_name: String,
    shell: Vec<String>,
    caches: CacheStorage,
    fetcher: Arc<F>,
}

impl<F: Fetch> ServiceWorker<F> {
    pub fn new(scope: Url, caches: CacheStorage, fetcher: Arc<F>) -> Self {
        Self {
            scope,
            cache_name: CACHE_NAME.to_string(),
            shell: APP_SHELL.iter().map(|asset| asset.to_string()).collect(),
            caches,
            fetcher,
        }
    }

    pub fn with_cache_name(mut self, name: impl Into<String>) -> Self {
        self.cache_name = name.into();
        self
    }

    pub fn cache_name(&self) -> &str {
        &self.cache_name
    }

    pub fn caches(&self) -> &CacheStorage {
        &self.caches
    }

    pub fn shell_urls(&self) -> Result<Vec<Url>, OfflineError> {
        self.shell
            .iter()
            .map(|asset| {
                self.scope
                    .join(asset)
                    .map_err(|_| OfflineError::InvalidUrl(asset.clone()))
            })
            .collect()
    }

    pub fn on_install(&self, event: &mut ExtendableEvent) {
        let caches = self.caches.clone();
        let fetcher = Arc::clone(&self.fetcher);
        let name = self.cache_name.clone();
        let urls = self.shell_urls();

        event.wait_until(async move {
            let urls = urls?;
            let cache = caches.open(&name).await;
            cache.add_all(fetcher.as_ref(), &urls).await?;
            info!(cache = %name, assets = urls.len(), "precached app shell");
            Ok(())
        });
    }

    pub fn on_activate(&self, event: &mut ExtendableEvent) {
        let caches = self.caches.clone();
        let name = self.cache_name.clone();

        event.wait_until(async move {
            for key in caches.keys().await {
                if key != name {
                    caches.delete(&key).await;
                    info!(cache = %key, "deleted stale cache generation");
                }
            }
            Ok(())
        });
    }

    pub async fn on_fetch(&self, request: &FetchRequest) -> Interception {
        if request.method != Method::GET {
            return Interception::PassThrough;
        }

        if !self.is_same_origin(&request.url) || !self.is_app_shell_asset(&request.url) {
            return Interception::Respond(self.cache_then_network(request).await);
        }

        Interception::Respond(self.network_first(request).await)
    }

    pub fn is_same_origin(&self, url: &Url) -> bool {
        url.origin() == self.scope.origin()
    }

    /// Suffix match of the path against the manifest, with the leading `./`
    /// of each entry read as `/`. The `./` entry therefore matches any path
    /// ending in a slash.
    pub fn is_app_shell_asset(&self, url: &Url) -> bool {
        let path = url.path();
        self.shell
            .iter()
            .any(|asset| path.ends_with(&asset.replacen("./", "/", 1)))
    }

    async fn cache_then_network(&self, request: &FetchRequest) -> Result<CachedResponse, OfflineError> {
        if let Some(cached) = self.caches.match_request(request).await {
            debug!(url = %request.url, "served from cache");
            return Ok(cached);
        }
        self.fetcher.fetch(request).await
    }

    async fn network_first(&self, request: &FetchRequest) -> Result<CachedResponse, OfflineError> {
        let cache = self.caches.open(&self.cache_name).await;

        match self.fetcher.fetch(request).await {
            Ok(response) => {
                cache.put(request, response.clone()).await;
                Ok(response)
            }
            Err(err) => {
                warn!(url = %request.url, "network failed, falling back to cache: {err}");
                cache
                    .match_request(request)
                    .await
                    .ok_or(OfflineError::Offline)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::http::StatusCode;

    struct Unreachable;

    impl Fetch for Unreachable {
        async fn fetch(&self, request: &FetchRequest) -> Result<CachedResponse, OfflineError> {
            Err(OfflineError::Network(format!("unreachable {}", request.url)))
        }
    }

    fn worker() -> ServiceWorker<Unreachable> {
        ServiceWorker::new(
            Url::parse("http://localhost:8080/").unwrap(),
            CacheStorage::default(),
            Arc::new(Unreachable),
        )
    }

    fn url(raw: &str) -> Url {
        Url::parse(raw).unwrap()
    }

    #[test]
    fn shell_matching_uses_path_suffix() {
        let worker = worker();
        assert!(worker.is_app_shell_asset(&url("http://localhost:8080/")));
        assert!(worker.is_app_shell_asset(&url("http://localhost:8080/app.js?v=3")));
        assert!(worker.is_app_shell_asset(&url("http://localhost:8080/nested/styles.css")));
        assert!(worker.is_app_shell_asset(&url("http://localhost:8080/api/")));
        assert!(!worker.is_app_shell_asset(&url("http://localhost:8080/api/grid")));
        assert!(!worker.is_app_shell_asset(&url("http://localhost:8080/icons/icon-64.svg")));
    }

    #[test]
    fn origin_compares_scheme_host_and_port() {
        let worker = worker();
        assert!(worker.is_same_origin(&url("http://localhost:8080/x")));
        assert!(!worker.is_same_origin(&url("http://localhost:9090/x")));
        assert!(!worker.is_same_origin(&url("https://localhost:8080/x")));
    }

    #[test]
    fn shell_urls_resolve_against_scope() {
        let urls = worker().shell_urls().unwrap();
        assert_eq!(urls[0].as_str(), "http://localhost:8080/");
        assert_eq!(urls[6].as_str(), "http://localhost:8080/icons/icon-512.svg");
    }

    #[tokio::test]
    async fn non_get_passes_through() {
        let mut request = FetchRequest::get(url("http://localhost:8080/app.js"));
        request.method = Method::POST;
        assert_eq!(worker().on_fetch(&request).await, Interception::PassThrough);
    }

    #[tokio::test]
    async fn cross_origin_prefers_any_cached_copy() {
        let worker = worker();
        let request = FetchRequest::get(url("https://cdn.example.com/app.js"));
        worker
            .caches()
            .open("other")
            .await
            .put(&request, CachedResponse::new(StatusCode::OK, "cdn"))
            .await;

        match worker.on_fetch(&request).await {
            Interception::Respond(Ok(response)) => assert_eq!(response.body, "cdn"),
            other => panic!("unexpected interception: {other:?}"),
        }
    }
}
