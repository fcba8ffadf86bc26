// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! XSRF token injection
//!
//! The server drops an anti-forgery token into a cookie; mutating requests to
//! relative URLs echo it back in a header.

use std::sync::Arc;

use async_trait::async_trait;
use parking_lot::Mutex;
use reqwest::Method;
use url::Url;

use super::interceptor::{HttpInterceptor, Next};
use crate::error::Result;
use crate::http::{parse_cookie_value, CookieJar, HttpRequest, HttpResponse};

/// Default cookie carrying the token
pub const XSRF_COOKIE_NAME: &str = "XSRF-TOKEN";

/// Default header the token is sent in
pub const XSRF_HEADER_NAME: &str = "X-XSRF-TOKEN";

/// Source of the current XSRF token
pub trait XsrfTokenExtractor: Send + Sync {
    fn token(&self) -> Option<String>;
}

#[derive(Default)]
struct TokenCache {
    last_cookie_string: Option<String>,
    last_token: Option<String>,
    parse_count: usize,
}

/// Reads the token from the document cookies of the application origin
pub struct CookieXsrfExtractor {
    jar: CookieJar,
    document_url: Url,
    cookie_name: String,
    cache: Mutex<TokenCache>,
}

impl CookieXsrfExtractor {
    pub fn new(jar: CookieJar, document_url: Url, cookie_name: impl Into<String>) -> Self {
        Self {
            jar,
            document_url,
            cookie_name: cookie_name.into(),
            cache: Mutex::new(TokenCache::default()),
        }
    }

    /// How many times the cookie string has been parsed
    pub fn parse_count(&self) -> usize {
        self.cache.lock().parse_count
    }
}

impl XsrfTokenExtractor for CookieXsrfExtractor {
    fn token(&self) -> Option<String> {
        let cookie_string = self.jar.document_cookie(&self.document_url);
        let mut cache = self.cache.lock();

        if cache.last_cookie_string.as_deref() != Some(cookie_string.as_str()) {
            cache.parse_count += 1;
            cache.last_token = parse_cookie_value(&cookie_string, &self.cookie_name);
            cache.last_cookie_string = Some(cookie_string);
        }

        cache.last_token.clone()
    }
}

/// Adds the XSRF header to mutating requests for relative URLs
pub struct XsrfInterceptor {
    extractor: Arc<dyn XsrfTokenExtractor>,
    header_name: String,
}

impl XsrfInterceptor {
    pub fn new(extractor: Arc<dyn XsrfTokenExtractor>, header_name: impl Into<String>) -> Self {
        Self {
            extractor,
            header_name: header_name.into(),
        }
    }

    fn applies_to(request: &HttpRequest) -> bool {
        // Absolute URLs are treated as cross-origin
        let url = request.url.to_lowercase();
        request.method != Method::GET
            && request.method != Method::HEAD
            && !url.starts_with("http://")
            && !url.starts_with("https://")
    }
}

#[async_trait]
impl HttpInterceptor for XsrfInterceptor {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        if !Self::applies_to(&request) {
            return next.run(request).await;
        }

        let request = match self.extractor.token() {
            Some(token) if !request.headers.has(&self.header_name) => {
                tracing::debug!(header = %self.header_name, url = %request.url, "Adding XSRF token");
                request.with_header(self.header_name.clone(), token)
            }
            _ => request,
        };

        next.run(request).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::http::{Cookie, HttpHandler};
    use crate::network::InterceptorChain;
    use reqwest::StatusCode;

    struct EchoBackend;

    #[async_trait]
    impl HttpHandler for EchoBackend {
        async fn handle(&self, request: HttpRequest) -> Result<HttpResponse> {
            Ok(HttpResponse::new(StatusCode::OK, request.headers.clone(), ""))
        }
    }

    struct FixedToken(Option<&'static str>);

    impl XsrfTokenExtractor for FixedToken {
        fn token(&self) -> Option<String> {
            self.0.map(String::from)
        }
    }

    fn chain(token: Option<&'static str>) -> InterceptorChain {
        InterceptorChain::new(EchoBackend).with(XsrfInterceptor::new(
            Arc::new(FixedToken(token)),
            XSRF_HEADER_NAME,
        ))
    }

    #[tokio::test]
    async fn test_adds_header_to_relative_post() {
        let response = chain(Some("tok"))
            .handle(HttpRequest::post("/api/save", "x"))
            .await
            .unwrap();
        assert_eq!(response.header("x-xsrf-token"), Some("tok"));
    }

    #[tokio::test]
    async fn test_skips_get_and_head() {
        let chain = chain(Some("tok"));

        let get = chain.handle(HttpRequest::get("/api")).await.unwrap();
        assert!(!get.headers.has(XSRF_HEADER_NAME));

        let head = chain
            .handle(HttpRequest::new(Method::HEAD, "/api"))
            .await
            .unwrap();
        assert!(!head.headers.has(XSRF_HEADER_NAME));
    }

    #[tokio::test]
    async fn test_skips_absolute_urls() {
        let chain = chain(Some("tok"));
        for url in ["http://other.example/api", "HTTPS://other.example/api"] {
            let response = chain.handle(HttpRequest::post(url, "x")).await.unwrap();
            assert!(!response.headers.has(XSRF_HEADER_NAME), "{}", url);
        }
    }

    #[tokio::test]
    async fn test_keeps_existing_header() {
        let request = HttpRequest::post("/api", "x").with_header("X-XSRF-TOKEN", "mine");
        let response = chain(Some("tok")).handle(request).await.unwrap();
        assert_eq!(response.headers.get_all("x-xsrf-token").unwrap(), ["mine"]);
    }

    #[tokio::test]
    async fn test_no_token_no_header() {
        let response = chain(None)
            .handle(HttpRequest::post("/api", "x"))
            .await
            .unwrap();
        assert!(response.headers.is_empty());
    }

    #[test]
    fn test_cookie_extractor_caches_until_cookie_changes() {
        let jar = CookieJar::new();
        let url = Url::parse("https://app.example.com/").unwrap();
        let extractor = CookieXsrfExtractor::new(jar.clone(), url.clone(), XSRF_COOKIE_NAME);

        assert_eq!(extractor.token(), None);
        assert_eq!(extractor.parse_count(), 1);

        jar.add(Cookie::new("XSRF-TOKEN", "first").domain("app.example.com"));
        assert_eq!(extractor.token().as_deref(), Some("first"));
        assert_eq!(extractor.token().as_deref(), Some("first"));
        assert_eq!(extractor.parse_count(), 2);

        jar.add(Cookie::new("XSRF-TOKEN", "second").domain("app.example.com"));
        assert_eq!(extractor.token().as_deref(), Some("second"));
        assert_eq!(extractor.parse_count(), 3);
    }
}
