// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! # hxclient - Interceptor-driven HTTP client
//!
//! Requests flow through an ordered chain of interceptors before reaching a
//! transport backend. Headers are immutable, copy-on-write collections that
//! defer parsing and copying until they are first read, so interceptors can
//! rebuild them freely.
//!
//! ## Features
//!
//! - Lazy headers: case-insensitive multi-map with O(1) `set`/`append`/`delete`
//! - Interceptor chain: rewrite requests, short-circuit, observe responses
//! - XSRF protection: cookie token copied into a header for mutating requests
//! - JSONP: callback substitution and payload unwrapping
//! - Cookie jar shared between transport and XSRF extraction
//!
//! ## Example
//!
//! ```rust,no_run
//! use hxclient::{HttpClientBuilder, HttpClientConfig};
//!
//! #[tokio::main]
//! async fn main() -> hxclient::Result<()> {
//!     let config = HttpClientConfig::new().base_url("https://api.example.com/");
//!     let client = HttpClientBuilder::from_config(config)
//!         .document_url("https://api.example.com/".parse()?)
//!         .jsonp_support()
//!         .build()?;
//!
//!     let response = client.get("/items").await?;
//!     for name in response.headers.keys() {
//!         println!("{}: {:?}", name, response.headers.get_all(name));
//!     }
//!
//!     Ok(())
//! }
//! ```

pub mod config;
pub mod error;
pub mod http;
pub mod network;

// Re-exports for convenience

// Configuration
pub use config::{HttpClientConfig, XsrfConfig};

// Errors
pub use error::{Error, ErrorContext, Result};

// HTTP
pub use http::{
    Cookie, CookieJar, HeaderValues, Headers, HttpClient, HttpClientBuilder, HttpHandler,
    HttpRequest, HttpResponse, RequestBody, ReqwestBackend, ResponseType,
};

// Pipeline
pub use network::{
    CookieXsrfExtractor, HeaderInjector, HttpInterceptor, InterceptorChain, JsonpBackend,
    JsonpInterceptor, LoggingInterceptor, Next, XsrfInterceptor, XsrfTokenExtractor,
};

/// hxclient version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
