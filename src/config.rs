// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Client configuration

use std::path::Path;
use std::time::Duration;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::error::{ErrorContext, Result};
use crate::http::DEFAULT_USER_AGENT;
use crate::network::{XSRF_COOKIE_NAME, XSRF_HEADER_NAME};

/// XSRF cookie and header names
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct XsrfConfig {
    /// Cookie the token is read from
    pub cookie_name: String,
    /// Header the token is sent in
    pub header_name: String,
}

impl Default for XsrfConfig {
    fn default() -> Self {
        Self {
            cookie_name: XSRF_COOKIE_NAME.to_string(),
            header_name: XSRF_HEADER_NAME.to_string(),
        }
    }
}

impl XsrfConfig {
    pub fn new(cookie_name: impl Into<String>, header_name: impl Into<String>) -> Self {
        Self {
            cookie_name: cookie_name.into(),
            header_name: header_name.into(),
        }
    }
}

/// HTTP client configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct HttpClientConfig {
    /// Base URL relative request URLs are resolved against
    pub base_url: Option<String>,
    /// Default timeout in seconds
    pub timeout_secs: u64,
    /// Maximum redirects to follow
    pub max_redirects: usize,
    /// User agent string
    pub user_agent: String,
    /// Headers set on every request
    pub default_headers: IndexMap<String, String>,
    /// Explicit XSRF names; defaults apply when absent
    pub xsrf: Option<XsrfConfig>,
    /// Turn off XSRF protection entirely
    pub disable_xsrf: bool,
    /// Enable JSONP support
    pub jsonp: bool,
    /// Log every request and response
    pub log_requests: bool,
}

impl Default for HttpClientConfig {
    fn default() -> Self {
        Self {
            base_url: None,
            timeout_secs: 30,
            max_redirects: 10,
            user_agent: DEFAULT_USER_AGENT.to_string(),
            default_headers: IndexMap::new(),
            xsrf: None,
            disable_xsrf: false,
            jsonp: false,
            log_requests: false,
        }
    }
}

impl HttpClientConfig {
    /// Create a new client config
    pub fn new() -> Self {
        Self::default()
    }

    /// Parse a JSON configuration document
    pub fn from_json(json: &str) -> Result<Self> {
        Ok(serde_json::from_str(json)?)
    }

    /// Load a JSON configuration file
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = std::fs::read_to_string(path).context(&path.display().to_string())?;
        Self::from_json(&contents).context(&path.display().to_string())
    }

    /// Default timeout
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    /// Set base URL
    pub fn base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// Set timeout
    pub fn timeout_secs(mut self, secs: u64) -> Self {
        self.timeout_secs = secs;
        self
    }

    /// Set user agent
    pub fn user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Add default header
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.default_headers.insert(name.into(), value.into());
        self
    }

    /// Enable JSONP support
    pub fn jsonp(mut self, enabled: bool) -> Self {
        self.jsonp = enabled;
        self
    }

    /// Enable request logging
    pub fn log_requests(mut self, enabled: bool) -> Self {
        self.log_requests = enabled;
        self
    }
}
