use super::fetch::{CachedResponse, Fetch, FetchRequest};
use super::lifecycle::WorkerHost;
use super::worker::Interception;
use super::OfflineError;
use axum::{
    body::{to_bytes, Body},
    extract::{Request, State},
    http::{HeaderMap, HeaderName, Method, StatusCode},
    response::{IntoResponse, Response},
    Router,
};
use reqwest::Url;
use std::sync::Arc;
use tracing::warn;

const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

const HOP_BY_HOP: [&str; 9] = [
    "connection",
    "content-length",
    "host",
    "keep-alive",
    "proxy-connection",
    "te",
    "trailer",
    "transfer-encoding",
    "upgrade",
];

pub struct ProxyState<F> {
    pub host: Arc<WorkerHost<F>>,
    pub fetcher: Arc<F>,
    pub upstream: Url,
}

impl<F> Clone for ProxyState<F> {
    fn clone(&self) -> Self {
        Self {
            host: Arc::clone(&self.host),
            fetcher: Arc::clone(&self.fetcher),
            upstream: self.upstream.clone(),
        }
    }
}

impl<F> ProxyState<F> {
    pub fn new(host: Arc<WorkerHost<F>>, fetcher: Arc<F>, upstream: Url) -> Self {
        Self {
            host,
            fetcher,
            upstream,
        }
    }
}

pub fn proxy_router<F: Fetch>(state: ProxyState<F>) -> Router {
    Router::new().fallback(intercept::<F>).with_state(state)
}

async fn intercept<F: Fetch>(State(state): State<ProxyState<F>>, request: Request) -> Response {
    let request = match to_fetch_request(&state.upstream, request).await {
        Ok(request) => request,
        Err(err) => return (StatusCode::BAD_REQUEST, err.to_string()).into_response(),
    };

    let worker = state.host.worker();
    if !worker.is_same_origin(&request.url) {
        let cached = if request.method == Method::GET {
            worker.caches().match_request(&request).await
        } else {
            None
        };
        return match cached {
            Some(cached) => into_response(cached),
            None => {
                warn!(method = %request.method, url = %request.url, "refusing cross-origin request");
                (StatusCode::FORBIDDEN, "cross-origin requests are served from cache only")
                    .into_response()
            }
        };
    }

    let result = match state.host.handle(&request).await {
        Interception::PassThrough => state.fetcher.fetch(&request).await,
        Interception::Respond(result) => result,
    };

    match result {
        Ok(response) => into_response(response),
        Err(err) => {
            warn!(method = %request.method, url = %request.url, "request failed: {err}");
            (StatusCode::BAD_GATEWAY, "network error").into_response()
        }
    }
}

/// Origin-form targets resolve against the upstream; absolute-form targets
/// keep their own origin and are only ever answered from the cache.
pub async fn to_fetch_request(upstream: &Url, request: Request) -> Result<FetchRequest, OfflineError> {
    let (parts, body) = request.into_parts();

    let target = parts.uri.to_string();
    let parsed = if parts.uri.scheme().is_some() {
        Url::parse(&target)
    } else {
        let path = parts
            .uri
            .path_and_query()
            .map(|value| value.as_str())
            .unwrap_or("/");
        upstream.join(path)
    };
    let url = parsed.map_err(|_| OfflineError::InvalidUrl(target))?;

    let body = to_bytes(body, MAX_BODY_BYTES)
        .await
        .map_err(|err| OfflineError::Network(err.to_string()))?;

    Ok(FetchRequest {
        method: parts.method,
        url,
        headers: strip_hop_by_hop(&parts.headers),
        body,
    })
}

pub fn into_response(cached: CachedResponse) -> Response {
    let mut response = Response::new(Body::from(cached.body));
    *response.status_mut() = cached.status;
    *response.headers_mut() = strip_hop_by_hop(&cached.headers);
    response
}

fn strip_hop_by_hop(headers: &HeaderMap) -> HeaderMap {
    let mut kept = HeaderMap::with_capacity(headers.len());
    for (name, value) in headers {
        if !is_hop_by_hop(name) {
            kept.append(name.clone(), value.clone());
        }
    }
    kept
}

fn is_hop_by_hop(name: &HeaderName) -> bool {
    HOP_BY_HOP.contains(&name.as_str())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::offline::{CacheStorage, ServiceWorker};
    use axum::http::header;
    use std::sync::atomic::{AtomicUsize, Ordering};

    #[tokio::test]
    async fn origin_form_resolves_against_upstream() {
        let upstream = Url::parse("http://127.0.0.1:8080/").unwrap();
        let request = axum::http::Request::builder()
            .method("POST")
            .uri("/toggle?x=1")
            .header(header::HOST, "127.0.0.1:8081")
            .header(header::CONTENT_TYPE, "application/x-www-form-urlencoded")
            .body(Body::from("date=2026-01-01&task_id=a"))
            .unwrap();

        let fetch = to_fetch_request(&upstream, request).await.unwrap();
        assert_eq!(fetch.url.as_str(), "http://127.0.0.1:8080/toggle?x=1");
        assert_eq!(fetch.method, "POST");
        assert!(fetch.headers.get(header::HOST).is_none());
        assert!(fetch.headers.get(header::CONTENT_TYPE).is_some());
        assert_eq!(fetch.body, "date=2026-01-01&task_id=a");
    }

    #[tokio::test]
    async fn absolute_form_keeps_its_origin() {
        let upstream = Url::parse("http://127.0.0.1:8080/").unwrap();
        let request = axum::http::Request::builder()
            .uri("http://cdn.example.com/font.woff2")
            .body(Body::empty())
            .unwrap();

        let fetch = to_fetch_request(&upstream, request).await.unwrap();
        assert_eq!(fetch.url.as_str(), "http://cdn.example.com/font.woff2");
    }

    struct Counting {
        calls: AtomicUsize,
    }

    impl Fetch for Counting {
        async fn fetch(&self, _request: &FetchRequest) -> Result<CachedResponse, OfflineError> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            Ok(CachedResponse::new(StatusCode::OK, "fetched"))
        }
    }

    #[tokio::test]
    async fn cross_origin_targets_never_reach_the_network() {
        let upstream = Url::parse("http://127.0.0.1:8080/").unwrap();
        let fetcher = Arc::new(Counting {
            calls: AtomicUsize::new(0),
        });
        let caches = CacheStorage::default();
        let worker = ServiceWorker::new(upstream.clone(), caches.clone(), Arc::clone(&fetcher));
        let state = ProxyState::new(Arc::new(WorkerHost::new(worker)), Arc::clone(&fetcher), upstream);

        let font = Url::parse("http://cdn.example.com/font.woff2").unwrap();
        caches
            .open("fonts")
            .await
            .put(&FetchRequest::get(font), CachedResponse::new(StatusCode::OK, "woff"))
            .await;

        let cached = axum::http::Request::builder()
            .uri("http://cdn.example.com/font.woff2")
            .body(Body::empty())
            .unwrap();
        let response = intercept(State(state.clone()), cached).await;
        assert_eq!(response.status(), StatusCode::OK);
        let body = to_bytes(response.into_body(), MAX_BODY_BYTES).await.unwrap();
        assert_eq!(body, "woff");

        let uncached = axum::http::Request::builder()
            .method("POST")
            .uri("http://example.org/login")
            .body(Body::from("user=x"))
            .unwrap();
        let response = intercept(State(state), uncached).await;
        assert_eq!(response.status(), StatusCode::FORBIDDEN);
        assert_eq!(fetcher.calls.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn response_drops_hop_by_hop_headers() {
        let mut cached = CachedResponse::new(StatusCode::OK, "body");
        cached
            .headers
            .insert(header::TRANSFER_ENCODING, "chunked".parse().unwrap());
        cached
            .headers
            .insert(header::CONTENT_TYPE, "text/css".parse().unwrap());

        let response = into_response(cached);
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().get(header::TRANSFER_ENCODING).is_none());
        assert_eq!(response.headers()[header::CONTENT_TYPE], "text/css");
    }
}
