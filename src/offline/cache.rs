use super::fetch::{CachedResponse, Fetch, FetchRequest};
use super::OfflineError;
use reqwest::Url;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug, Default)]
pub struct Cache {
    entries: RwLock<HashMap<String, CachedResponse>>,
}

impl Cache {
    pub async fn put(&self, request: &FetchRequest, response: CachedResponse) {
        self.entries
            .write()
            .await
            .insert(request.cache_key(), response);
    }

    pub async fn match_request(&self, request: &FetchRequest) -> Option<CachedResponse> {
        self.entries.read().await.get(&request.cache_key()).cloned()
    }

    pub async fn len(&self) -> usize {
        self.entries.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.len().await == 0
    }

    /// Fetches every url and stores the results only if all of them came back
    /// with a success status.
    pub async fn add_all<F: Fetch>(&self, fetcher: &F, urls: &[Url]) -> Result<(), OfflineError> {
        let mut fetched = Vec::with_capacity(urls.len());
        for url in urls {
            let request = FetchRequest::get(url.clone());
            let response = fetcher
                .fetch(&request)
                .await
                .map_err(|err| OfflineError::Install {
                    url: url.to_string(),
                    reason: err.to_string(),
                })?;
            if !response.status.is_success() {
                return Err(OfflineError::Install {
                    url: url.to_string(),
                    reason: format!("status {}", response.status),
                });
            }
            fetched.push((request, response));
        }

        let mut entries = self.entries.write().await;
        for (request, response) in fetched {
            debug!(url = %request.url, "cached shell asset");
            entries.insert(request.cache_key(), response);
        }
        Ok(())
    }
}

#[derive(Debug, Clone, Default)]
pub struct CacheStorage {
    generations: Arc<RwLock<Vec<(String, Arc<Cache>)>>>,
}

impl CacheStorage {
    pub async fn open(&self, name: &str) -> Arc<Cache> {
        let mut generations = self.generations.write().await;
        if let Some((_, cache)) = generations.iter().find(|(key, _)| key == name) {
            return Arc::clone(cache);
        }
        let cache = Arc::new(Cache::default());
        generations.push((name.to_string(), Arc::clone(&cache)));
        cache
    }

    pub async fn has(&self, name: &str) -> bool {
        self.generations
            .read()
            .await
            .iter()
            .any(|(key, _)| key == name)
    }

    pub async fn keys(&self) -> Vec<String> {
        self.generations
            .read()
            .await
            .iter()
            .map(|(key, _)| key.clone())
            .collect()
    }

    pub async fn delete(&self, name: &str) -> bool {
        let mut generations = self.generations.write().await;
        let before = generations.len();
        generations.retain(|(key, _)| key != name);
        generations.len() != before
    }

    pub async fn match_request(&self, request: &FetchRequest) -> Option<CachedResponse> {
        let generations: Vec<Arc<Cache>> = self
            .generations
            .read()
            .await
            .iter()
            .map(|(_, cache)| Arc::clone(cache))
            .collect();
        for cache in generations {
            if let Some(response) = cache.match_request(request).await {
                return Some(response);
            }
        }
        None
    }
}
