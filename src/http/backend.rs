// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request handlers and the reqwest-backed transport

use std::time::Instant;

use async_trait::async_trait;
use reqwest::header::{HeaderValue, CONTENT_TYPE, COOKIE};
use reqwest::redirect::Policy;
use reqwest::Client;
use url::Url;

use super::cookie::CookieJar;
use super::headers::Headers;
use super::names;
use super::request::HttpRequest;
use super::response::HttpResponse;
use crate::config::HttpClientConfig;
use crate::error::{Error, Result};

/// Anything that turns a request into a response
///
/// Backends perform transport and sit at the end of an
/// [`InterceptorChain`](crate::network::InterceptorChain); the chain itself
/// is also a handler.
#[async_trait]
pub trait HttpHandler: Send + Sync {
    async fn handle(&self, request: HttpRequest) -> Result<HttpResponse>;
}

/// Transport backend built on reqwest
///
/// Relative request URLs are resolved against the configured base URL.
/// Cookies received from the server are stored in the cookie jar and sent
/// back to the same origin, or to any origin for `with_credentials` requests.
#[derive(Clone)]
pub struct ReqwestBackend {
    client: Client,
    base_url: Option<Url>,
    cookie_jar: CookieJar,
}

impl ReqwestBackend {
    /// Create a backend with default configuration
    pub fn new() -> Result<Self> {
        Self::with_config(&HttpClientConfig::default(), CookieJar::new())
    }

    /// Create a backend from client configuration
    pub fn with_config(config: &HttpClientConfig, cookie_jar: CookieJar) -> Result<Self> {
        let base_url = config
            .base_url
            .as_deref()
            .map(Url::parse)
            .transpose()
            .map_err(|e| Error::Config(format!("Invalid base URL: {}", e)))?;

        let client = Client::builder()
            .user_agent(&config.user_agent)
            .timeout(config.timeout())
            .redirect(Policy::limited(config.max_redirects))
            .build()?;

        Ok(Self {
            client,
            base_url,
            cookie_jar,
        })
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Absolute URL for a request, including query parameters
    pub fn resolve(&self, request: &HttpRequest) -> Result<Url> {
        let raw = request.url_with_params();
        match &self.base_url {
            Some(base) => Ok(base.join(&raw)?),
            None => Ok(Url::parse(&raw)?),
        }
    }

    fn same_origin(&self, url: &Url) -> bool {
        self.base_url
            .as_ref()
            .map(|base| base.origin() == url.origin())
            .unwrap_or(false)
    }
}

#[async_trait]
impl HttpHandler for ReqwestBackend {
    async fn handle(&self, request: HttpRequest) -> Result<HttpResponse> {
        let start = Instant::now();
        let url = self.resolve(&request)?;

        let mut headers = request.headers.to_header_map();
        if !headers.contains_key(CONTENT_TYPE) {
            if let Some(content_type) = request.detect_content_type() {
                headers.insert(CONTENT_TYPE, HeaderValue::from_static(content_type));
            }
        }

        if request.with_credentials || self.same_origin(&url) {
            if let Some(cookie_header) = self.cookie_jar.get_cookie_header(&url) {
                if let Ok(value) = HeaderValue::from_str(&cookie_header) {
                    headers.insert(COOKIE, value);
                }
            }
        }

        let mut builder = self
            .client
            .request(request.method.clone(), url.clone())
            .headers(headers);

        if let Some(ref body) = request.body {
            builder = builder.body(body.to_bytes());
        }

        if let Some(timeout) = request.timeout {
            builder = builder.timeout(timeout);
        }

        let response = builder.send().await?;

        let final_url = response.url().clone();
        let status = response.status();
        let headers = Headers::from(response.headers());

        for cookie in headers.get_all(names::SET_COOKIE).unwrap_or(&[]) {
            self.cookie_jar.add_from_header(cookie, &final_url);
        }

        let body = response.bytes().await?;

        tracing::debug!(
            url = %final_url,
            status = status.as_u16(),
            time_ms = start.elapsed().as_millis() as u64,
            "Backend response"
        );

        if !status.is_success() {
            return Err(Error::status(
                status.as_u16(),
                status.canonical_reason().unwrap_or(""),
                final_url.as_str(),
                String::from_utf8_lossy(&body),
            ));
        }

        Ok(HttpResponse::new(status, headers, body).with_url(final_url.as_str()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    fn backend_for(server: &MockServer) -> ReqwestBackend {
        let config = HttpClientConfig::new().base_url(server.uri());
        ReqwestBackend::with_config(&config, CookieJar::new()).unwrap()
    }

    #[test]
    fn test_resolve_relative_url() {
        let config = HttpClientConfig::new().base_url("https://api.example.com/v1/");
        let backend = ReqwestBackend::with_config(&config, CookieJar::new()).unwrap();

        let req = HttpRequest::get("items").with_param("page", "2");
        assert_eq!(
            backend.resolve(&req).unwrap().as_str(),
            "https://api.example.com/v1/items?page=2"
        );
    }

    #[test]
    fn test_relative_url_without_base_fails() {
        let backend = ReqwestBackend::new().unwrap();
        assert!(matches!(
            backend.resolve(&HttpRequest::get("/items")),
            Err(Error::Url(_))
        ));
    }

    #[tokio::test]
    async fn test_sends_headers_and_parses_response() {
        let server = MockServer::start().await;
        Mock::given(method("POST"))
            .and(path("/items"))
            .and(header("x-trace", "abc"))
            .and(header("content-type", "application/json"))
            .respond_with(
                ResponseTemplate::new(201)
                    .insert_header("X-Id", "42")
                    .set_body_string(r#"{"ok":true}"#),
            )
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        let req = HttpRequest::new(reqwest::Method::POST, "/items")
            .with_json(&serde_json::json!({"name": "a"}))
            .unwrap()
            .with_header("X-Trace", "abc");

        let resp = backend.handle(req).await.unwrap();
        assert_eq!(resp.status_code(), 201);
        assert_eq!(resp.header("x-id"), Some("42"));
        assert_eq!(resp.text().unwrap(), r#"{"ok":true}"#);
    }

    #[tokio::test]
    async fn test_error_status_becomes_error() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/missing"))
            .respond_with(ResponseTemplate::new(404).set_body_string("nope"))
            .mount(&server)
            .await;

        let err = backend_for(&server)
            .handle(HttpRequest::get("/missing"))
            .await
            .unwrap_err();

        match err {
            Error::Status { status, body, .. } => {
                assert_eq!(status, 404);
                assert_eq!(body, "nope");
            }
            other => panic!("Expected status error, got {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_stores_and_replays_cookies() {
        let server = MockServer::start().await;
        Mock::given(method("GET"))
            .and(path("/login"))
            .respond_with(
                ResponseTemplate::new(200).insert_header("Set-Cookie", "XSRF-TOKEN=tok; Path=/"),
            )
            .mount(&server)
            .await;
        Mock::given(method("GET"))
            .and(path("/me"))
            .and(header("cookie", "XSRF-TOKEN=tok"))
            .respond_with(ResponseTemplate::new(200))
            .mount(&server)
            .await;

        let backend = backend_for(&server);
        backend.handle(HttpRequest::get("/login")).await.unwrap();
        assert_eq!(backend.cookie_jar().len(), 1);

        let resp = backend.handle(HttpRequest::get("/me")).await.unwrap();
        assert!(resp.ok());
    }
}
