// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP response types

use bytes::Bytes;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;

use super::headers::Headers;
use super::names;
use crate::error::{Error, Result};

/// HTTP response representation
#[derive(Debug, Clone)]
pub struct HttpResponse {
    /// Response status code
    pub status: StatusCode,
    /// Reason phrase
    pub status_text: String,
    /// Response headers
    pub headers: Headers,
    /// Response body
    pub body: Bytes,
    /// Final URL (after redirects), when known
    pub url: Option<String>,
}

impl HttpResponse {
    /// Create a new response
    pub fn new(status: StatusCode, headers: Headers, body: impl Into<Bytes>) -> Self {
        Self {
            status,
            status_text: status.canonical_reason().unwrap_or("").to_string(),
            headers,
            body: body.into(),
            url: None,
        }
    }

    /// Create a response from a raw header block, as delivered by a transport
    pub fn from_raw(status: StatusCode, raw_headers: &str, body: impl Into<Bytes>) -> Self {
        Self::new(status, Headers::parse(raw_headers), body)
    }

    /// Set the final URL
    pub fn with_url(mut self, url: impl Into<String>) -> Self {
        self.url = Some(url.into());
        self
    }

    /// Set the reason phrase
    pub fn with_status_text(mut self, status_text: impl Into<String>) -> Self {
        self.status_text = status_text.into();
        self
    }

    /// Check if status is success (2xx)
    pub fn ok(&self) -> bool {
        self.status.is_success()
    }

    /// Get status code as u16
    pub fn status_code(&self) -> u16 {
        self.status.as_u16()
    }

    /// Get body as text
    pub fn text(&self) -> Result<String> {
        String::from_utf8(self.body.to_vec()).map_err(|e| Error::Other(e.to_string()))
    }

    /// Get body as text, lossy conversion
    pub fn text_lossy(&self) -> String {
        String::from_utf8_lossy(&self.body).into_owned()
    }

    /// Parse body as JSON
    pub fn json<T: DeserializeOwned>(&self) -> Result<T> {
        serde_json::from_slice(&self.body).map_err(Error::from)
    }

    /// Get a header value
    pub fn header(&self, name: &str) -> Option<&str> {
        self.headers.get(name)
    }

    /// Get content type
    pub fn content_type(&self) -> Option<&str> {
        self.header(names::CONTENT_TYPE)
    }

    /// Check if content type is JSON
    pub fn is_json(&self) -> bool {
        self.content_type()
            .map(|ct| ct.contains("application/json"))
            .unwrap_or(false)
    }

    /// Get Set-Cookie headers
    pub fn set_cookies(&self) -> &[String] {
        self.headers.get_all(names::SET_COOKIE).unwrap_or(&[])
    }

    /// Get body length
    pub fn body_len(&self) -> usize {
        self.body.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_response_status() {
        let resp = HttpResponse::new(StatusCode::OK, Headers::new(), Bytes::new());
        assert!(resp.ok());
        assert_eq!(resp.status_code(), 200);
        assert_eq!(resp.status_text, "OK");

        let resp = HttpResponse::new(StatusCode::NOT_FOUND, Headers::new(), "");
        assert!(!resp.ok());
    }

    #[test]
    fn test_response_from_raw_headers() {
        let resp = HttpResponse::from_raw(
            StatusCode::OK,
            "Content-Type: application/json; charset=utf-8\r\nSet-Cookie: a=1\r\nSet-Cookie: b=2\r\n",
            r#"{"id": 7}"#,
        );

        assert!(resp.is_json());
        assert_eq!(resp.set_cookies(), ["a=1", "b=2"]);

        let value: serde_json::Value = resp.json().unwrap();
        assert_eq!(value["id"], 7);
    }

    #[test]
    fn test_response_text() {
        let resp = HttpResponse::new(StatusCode::OK, Headers::new(), "Hello, World!")
            .with_url("https://example.com/");
        assert_eq!(resp.text().unwrap(), "Hello, World!");
        assert_eq!(resp.url.as_deref(), Some("https://example.com/"));
        assert!(resp.set_cookies().is_empty());
    }
}
