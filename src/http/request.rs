// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP request types
//!
//! Requests are treated as immutable values: interceptors derive modified
//! copies with the `with_*` methods instead of mutating in place.

use std::time::Duration;

use bytes::Bytes;
use lazy_static::lazy_static;
use reqwest::Method;
use serde::Serialize;

use super::headers::{HeaderValues, Headers};
use crate::error::Result;

lazy_static! {
    /// Extension method marking a JSONP request
    pub static ref JSONP: Method =
        Method::from_bytes(b"JSONP").expect("JSONP is a valid method token");
}

/// How the response body is expected to be consumed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ResponseType {
    #[default]
    Json,
    Text,
    Bytes,
}

/// Request payload
#[derive(Debug, Clone, PartialEq)]
pub enum RequestBody {
    /// Serialized JSON document
    Json(Bytes),
    /// Plain text
    Text(String),
    /// Raw bytes, no content type is inferred
    Bytes(Bytes),
}

impl RequestBody {
    /// Serialize a value as a JSON body
    pub fn json<T: Serialize>(data: &T) -> Result<Self> {
        Ok(RequestBody::Json(Bytes::from(serde_json::to_vec(data)?)))
    }

    /// Content type implied by the payload kind
    pub fn content_type(&self) -> Option<&'static str> {
        match self {
            RequestBody::Json(_) => Some("application/json"),
            RequestBody::Text(_) => Some("text/plain"),
            RequestBody::Bytes(_) => None,
        }
    }

    /// Wire bytes
    pub fn to_bytes(&self) -> Bytes {
        match self {
            RequestBody::Json(bytes) | RequestBody::Bytes(bytes) => bytes.clone(),
            RequestBody::Text(text) => Bytes::from(text.clone()),
        }
    }
}

impl From<&str> for RequestBody {
    fn from(text: &str) -> Self {
        RequestBody::Text(text.to_string())
    }
}

impl From<String> for RequestBody {
    fn from(text: String) -> Self {
        RequestBody::Text(text)
    }
}

impl From<Bytes> for RequestBody {
    fn from(bytes: Bytes) -> Self {
        RequestBody::Bytes(bytes)
    }
}

impl From<Vec<u8>> for RequestBody {
    fn from(bytes: Vec<u8>) -> Self {
        RequestBody::Bytes(Bytes::from(bytes))
    }
}

/// HTTP request representation
#[derive(Debug, Clone)]
pub struct HttpRequest {
    /// Request method
    pub method: Method,
    /// Target URL, relative or absolute
    pub url: String,
    /// Query parameters appended to the URL
    pub params: Vec<(String, String)>,
    /// Request headers
    pub headers: Headers,
    /// Request body
    pub body: Option<RequestBody>,
    /// Send cookies for cross-origin requests
    pub with_credentials: bool,
    /// Expected response body kind
    pub response_type: ResponseType,
    /// Per-request timeout
    pub timeout: Option<Duration>,
}

impl HttpRequest {
    /// Create a new request with arbitrary method
    pub fn new(method: Method, url: impl Into<String>) -> Self {
        Self {
            method,
            url: url.into(),
            params: Vec::new(),
            headers: Headers::new(),
            body: None,
            with_credentials: false,
            response_type: ResponseType::default(),
            timeout: None,
        }
    }

    /// Create a new GET request
    pub fn get(url: impl Into<String>) -> Self {
        Self::new(Method::GET, url)
    }

    /// Create a new POST request
    pub fn post(url: impl Into<String>, body: impl Into<RequestBody>) -> Self {
        Self::new(Method::POST, url).with_body(body)
    }

    /// Create a new JSONP request
    pub fn jsonp(url: impl Into<String>) -> Self {
        Self::new(JSONP.clone(), url)
    }

    /// Copy with a header set to `value`
    pub fn with_header(&self, name: impl Into<String>, value: impl Into<HeaderValues>) -> Self {
        Self {
            headers: self.headers.set(name, value),
            ..self.clone()
        }
    }

    /// Copy with `value` appended to a header
    pub fn append_header(&self, name: impl Into<String>, value: impl Into<HeaderValues>) -> Self {
        Self {
            headers: self.headers.append(name, value),
            ..self.clone()
        }
    }

    /// Copy with the header collection replaced
    pub fn with_headers(&self, headers: Headers) -> Self {
        Self {
            headers,
            ..self.clone()
        }
    }

    /// Copy with a different URL
    pub fn with_url(&self, url: impl Into<String>) -> Self {
        Self {
            url: url.into(),
            ..self.clone()
        }
    }

    /// Copy with a query parameter added
    pub fn with_param(&self, name: impl Into<String>, value: impl Into<String>) -> Self {
        let mut params = self.params.clone();
        params.push((name.into(), value.into()));
        Self {
            params,
            ..self.clone()
        }
    }

    /// Set the request body
    pub fn with_body(mut self, body: impl Into<RequestBody>) -> Self {
        self.body = Some(body.into());
        self
    }

    /// Set a JSON body
    pub fn with_json<T: Serialize>(self, data: &T) -> Result<Self> {
        Ok(self.with_body(RequestBody::json(data)?))
    }

    /// Set credentials mode
    pub fn with_credentials(mut self, with_credentials: bool) -> Self {
        self.with_credentials = with_credentials;
        self
    }

    /// Set the expected response type
    pub fn with_response_type(mut self, response_type: ResponseType) -> Self {
        self.response_type = response_type;
        self
    }

    /// Set timeout
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Whether this is a JSONP request
    pub fn is_jsonp(&self) -> bool {
        self.method == *JSONP
    }

    /// Content type implied by the body, if any
    pub fn detect_content_type(&self) -> Option<&'static str> {
        self.body.as_ref().and_then(RequestBody::content_type)
    }

    /// URL including the encoded query parameters
    pub fn url_with_params(&self) -> String {
        if self.params.is_empty() {
            return self.url.clone();
        }

        let query = url::form_urlencoded::Serializer::new(String::new())
            .extend_pairs(self.params.iter())
            .finish();

        let separator = match self.url.find('?') {
            None => "?",
            Some(idx) if idx + 1 < self.url.len() && !self.url.ends_with('&') => "&",
            Some(_) => "",
        };

        format!("{}{}{}", self.url, separator, query)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_request_creation() {
        let req = HttpRequest::get("/api/items");
        assert_eq!(req.method, Method::GET);
        assert_eq!(req.url, "/api/items");
        assert!(req.headers.is_empty());
        assert!(!req.is_jsonp());
    }

    #[test]
    fn test_with_header_leaves_original() {
        let req = HttpRequest::get("/a").with_header("X-Custom", "1");
        let changed = req.with_header("x-custom", "2");

        assert_eq!(req.headers.get("x-custom"), Some("1"));
        assert_eq!(changed.headers.get("x-custom"), Some("2"));
    }

    #[test]
    fn test_append_header() {
        let req = HttpRequest::get("/a")
            .append_header("Accept", "text/html")
            .append_header("accept", "application/json");
        assert_eq!(
            req.headers.get_all("ACCEPT").unwrap(),
            ["text/html", "application/json"]
        );
    }

    #[test]
    fn test_url_with_params() {
        let req = HttpRequest::get("/search")
            .with_param("q", "rust lang")
            .with_param("page", "2");
        assert_eq!(req.url_with_params(), "/search?q=rust+lang&page=2");

        let req = HttpRequest::get("/search?x=1").with_param("y", "2");
        assert_eq!(req.url_with_params(), "/search?x=1&y=2");

        let req = HttpRequest::get("/search?").with_param("y", "2");
        assert_eq!(req.url_with_params(), "/search?y=2");

        assert_eq!(HttpRequest::get("/plain").url_with_params(), "/plain");
    }

    #[test]
    fn test_detect_content_type() {
        assert_eq!(
            HttpRequest::post("/a", "hello").detect_content_type(),
            Some("text/plain")
        );
        let json = HttpRequest::new(Method::PUT, "/a")
            .with_json(&serde_json::json!({"a": 1}))
            .unwrap();
        assert_eq!(json.detect_content_type(), Some("application/json"));
        assert_eq!(
            HttpRequest::post("/a", vec![1u8, 2]).detect_content_type(),
            None
        );
        assert_eq!(HttpRequest::get("/a").detect_content_type(), None);
    }

    #[test]
    fn test_jsonp_method() {
        let req = HttpRequest::jsonp("/cb?callback=JSONP_CALLBACK");
        assert!(req.is_jsonp());
        assert_eq!(req.method.as_str(), "JSONP");
    }
}
