// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Interceptor chain
//!
//! Interceptors wrap the backend in registration order: the first
//! interceptor sees the request first and the response last. Each one
//! receives the request and a [`Next`] handle and decides whether to
//! forward a (possibly rewritten) request, or answer by itself.
//!
//! # Example
//!
//! ```rust,no_run
//! use async_trait::async_trait;
//! use hxclient::network::{HttpInterceptor, Next};
//! use hxclient::{HttpRequest, HttpResponse, Result};
//!
//! struct ApiVersion;
//!
//! #[async_trait]
//! impl HttpInterceptor for ApiVersion {
//!     async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
//!         next.run(request.with_header("X-Api-Version", "2")).await
//!     }
//! }
//! ```

use std::sync::Arc;
use std::time::Instant;

use async_trait::async_trait;

use crate::error::Result;
use crate::http::{names, HeaderValues, HttpHandler, HttpRequest, HttpResponse};

/// Request/response interceptor
#[async_trait]
pub trait HttpInterceptor: Send + Sync {
    /// Handle `request`, usually by calling `next.run` with it
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse>;
}

/// The remainder of a chain, handed to each interceptor
#[derive(Clone, Copy)]
pub struct Next<'a> {
    interceptors: &'a [Arc<dyn HttpInterceptor>],
    backend: &'a dyn HttpHandler,
}

impl<'a> Next<'a> {
    /// Pass the request to the next interceptor, or to the backend
    pub async fn run(self, request: HttpRequest) -> Result<HttpResponse> {
        match self.interceptors.split_first() {
            Some((first, rest)) => {
                let next = Next {
                    interceptors: rest,
                    backend: self.backend,
                };
                first.intercept(request, next).await
            }
            None => self.backend.handle(request).await,
        }
    }
}

/// Interceptors in front of a backend
pub struct InterceptorChain {
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    backend: Arc<dyn HttpHandler>,
}

impl InterceptorChain {
    /// Create a chain with no interceptors
    pub fn new<B: HttpHandler + 'static>(backend: B) -> Self {
        Self::from_arc(Arc::new(backend))
    }

    /// Create a chain around a shared backend
    pub fn from_arc(backend: Arc<dyn HttpHandler>) -> Self {
        Self {
            interceptors: Vec::new(),
            backend,
        }
    }

    /// Add an interceptor after the ones already registered
    pub fn with<I: HttpInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.push(Arc::new(interceptor));
        self
    }

    /// Add a shared interceptor after the ones already registered
    pub fn push(&mut self, interceptor: Arc<dyn HttpInterceptor>) {
        self.interceptors.push(interceptor);
    }

    /// Number of interceptors
    pub fn len(&self) -> usize {
        self.interceptors.len()
    }

    pub fn is_empty(&self) -> bool {
        self.interceptors.is_empty()
    }
}

#[async_trait]
impl HttpHandler for InterceptorChain {
    async fn handle(&self, request: HttpRequest) -> Result<HttpResponse> {
        Next {
            interceptors: &self.interceptors,
            backend: self.backend.as_ref(),
        }
        .run(request)
        .await
    }
}

/// Sets fixed headers on every request
pub struct HeaderInjector {
    /// Headers to set
    headers: Vec<(String, HeaderValues)>,
    /// Hosts to inject into (empty = all, relative URLs included)
    domains: Vec<String>,
}

impl HeaderInjector {
    /// Create a new header injector
    pub fn new() -> Self {
        Self {
            headers: Vec::new(),
            domains: Vec::new(),
        }
    }

    /// Add a bearer token
    pub fn bearer_token(self, token: impl Into<String>) -> Self {
        self.header(names::AUTHORIZATION, format!("Bearer {}", token.into()))
    }

    /// Add custom header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<HeaderValues>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    /// Restrict to specific hosts
    pub fn for_domains(mut self, domains: Vec<String>) -> Self {
        self.domains = domains;
        self
    }

    fn applies_to(&self, request: &HttpRequest) -> bool {
        if self.domains.is_empty() {
            return true;
        }

        url::Url::parse(&request.url)
            .ok()
            .and_then(|url| url.host_str().map(String::from))
            .map(|host| {
                self.domains
                    .iter()
                    .any(|d| host == *d || host.ends_with(&format!(".{}", d)))
            })
            .unwrap_or(false)
    }
}

impl Default for HeaderInjector {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl HttpInterceptor for HeaderInjector {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        if !self.applies_to(&request) {
            return next.run(request).await;
        }

        let headers = self
            .headers
            .iter()
            .fold(request.headers.clone(), |headers, (name, value)| {
                headers.set(name.clone(), value.clone())
            });
        next.run(request.with_headers(headers)).await
    }
}

/// Request logger interceptor
#[derive(Default)]
pub struct LoggingInterceptor {
    /// Log request headers
    pub log_headers: bool,
    /// Log response bodies
    pub log_responses: bool,
    /// Filter by URL pattern
    pub url_filter: Option<String>,
}

#[async_trait]
impl HttpInterceptor for LoggingInterceptor {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        if let Some(ref filter) = self.url_filter {
            if !request.url.contains(filter.as_str()) {
                return next.run(request).await;
            }
        }

        let start = Instant::now();
        let method = request.method.clone();
        let url = request.url_with_params();

        tracing::info!(method = %method, url = %url, "Request");
        if self.log_headers {
            tracing::debug!(headers = ?request.headers, "Request headers");
        }

        let result = next.run(request).await;
        let time_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(response) => {
                tracing::info!(url = %url, status = %response.status, time_ms, "Response");
                if self.log_responses {
                    tracing::debug!(body = %response.text_lossy(), "Response body");
                }
            }
            Err(error) => {
                tracing::warn!(method = %method, url = %url, time_ms, error = %error, "Request failed");
            }
        }

        result
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::Headers;
    use parking_lot::Mutex;
    use reqwest::StatusCode;

    /// Backend echoing request headers back as response headers
    struct EchoBackend;

    #[async_trait]
    impl HttpHandler for EchoBackend {
        async fn handle(&self, request: HttpRequest) -> Result<HttpResponse> {
            Ok(HttpResponse::new(StatusCode::OK, request.headers.clone(), request.url))
        }
    }

    /// Records its name on the way in and on the way out
    struct Tracer {
        name: &'static str,
        log: Arc<Mutex<Vec<String>>>,
    }

    #[async_trait]
    impl HttpInterceptor for Tracer {
        async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
            self.log.lock().push(format!("{} in", self.name));
            let response = next.run(request.append_header("X-Seen", self.name)).await;
            self.log.lock().push(format!("{} out", self.name));
            response
        }
    }

    struct ShortCircuit;

    #[async_trait]
    impl HttpInterceptor for ShortCircuit {
        async fn intercept(&self, _request: HttpRequest, _next: Next<'_>) -> Result<HttpResponse> {
            Ok(HttpResponse::new(StatusCode::NOT_MODIFIED, Headers::new(), "cached"))
        }
    }

    #[tokio::test]
    async fn test_registration_order() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new(EchoBackend)
            .with(Tracer { name: "a", log: log.clone() })
            .with(Tracer { name: "b", log: log.clone() });

        let response = chain.handle(HttpRequest::get("/x")).await.unwrap();

        assert_eq!(response.headers.get_all("x-seen").unwrap(), ["a", "b"]);
        assert_eq!(*log.lock(), vec!["a in", "b in", "b out", "a out"]);
    }

    #[tokio::test]
    async fn test_short_circuit_skips_backend() {
        let log = Arc::new(Mutex::new(Vec::new()));
        let chain = InterceptorChain::new(EchoBackend)
            .with(ShortCircuit)
            .with(Tracer { name: "never", log: log.clone() });

        let response = chain.handle(HttpRequest::get("/x")).await.unwrap();

        assert_eq!(response.status, StatusCode::NOT_MODIFIED);
        assert_eq!(response.text().unwrap(), "cached");
        assert!(log.lock().is_empty());
    }

    #[tokio::test]
    async fn test_empty_chain_reaches_backend() {
        let chain = InterceptorChain::new(EchoBackend);
        assert!(chain.is_empty());

        let response = chain.handle(HttpRequest::get("/direct")).await.unwrap();
        assert_eq!(response.text().unwrap(), "/direct");
    }

    #[tokio::test]
    async fn test_header_injector() {
        let chain = InterceptorChain::new(EchoBackend).with(
            HeaderInjector::new()
                .bearer_token("token")
                .header("X-Custom", "value"),
        );

        let request = HttpRequest::get("/x").with_header("x-custom", "old");
        let response = chain.handle(request.clone()).await.unwrap();

        assert_eq!(response.header("authorization"), Some("Bearer token"));
        assert_eq!(response.headers.get_all("x-custom").unwrap(), ["value"]);
        assert_eq!(request.headers.get("x-custom"), Some("old"));
    }

    #[tokio::test]
    async fn test_header_injector_domain_filter() {
        let chain = InterceptorChain::new(EchoBackend).with(
            HeaderInjector::new()
                .bearer_token("token")
                .for_domains(vec!["api.example.com".to_string()]),
        );

        let matching = chain
            .handle(HttpRequest::get("https://api.example.com/me"))
            .await
            .unwrap();
        assert!(matching.headers.has("authorization"));

        let other = chain
            .handle(HttpRequest::get("https://cdn.example.net/a.js"))
            .await
            .unwrap();
        assert!(!other.headers.has("authorization"));

        let subdomain = chain
            .handle(HttpRequest::get("https://eu.api.example.com/me"))
            .await
            .unwrap();
        assert!(subdomain.headers.has("authorization"));

        let look_alike = chain
            .handle(HttpRequest::get("https://api.example.com.evil.net/me"))
            .await
            .unwrap();
        assert!(!look_alike.headers.has("authorization"));

        let prefixed = chain
            .handle(HttpRequest::get("https://notapi.example.com/me"))
            .await
            .unwrap();
        assert!(!prefixed.headers.has("authorization"));

        let relative = chain.handle(HttpRequest::get("/me")).await.unwrap();
        assert!(!relative.headers.has("authorization"));
    }

    #[tokio::test]
    async fn test_logging_interceptor_passes_through() {
        let chain = InterceptorChain::new(EchoBackend).with(LoggingInterceptor {
            log_headers: true,
            ..Default::default()
        });
        let response = chain.handle(HttpRequest::get("/logged")).await.unwrap();
        assert_eq!(response.text().unwrap(), "/logged");
    }
}
