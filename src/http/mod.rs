// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP layer for hxclient
//!
//! Lazily materialized header collections, immutable request/response
//! types, cookie storage and the reqwest transport.

mod backend;
mod client;
mod cookie;
mod headers;
mod request;
mod response;

pub use backend::{HttpHandler, ReqwestBackend};
pub use client::{HttpClient, HttpClientBuilder};
pub use cookie::{parse_cookie_value, Cookie, CookieJar};
pub use headers::{HeaderValues, Headers};
pub use request::{HttpRequest, RequestBody, ResponseType, JSONP};
pub use response::HttpResponse;

/// Default user agent string
pub const DEFAULT_USER_AGENT: &str = concat!("hxclient/", env!("CARGO_PKG_VERSION"));

/// Common HTTP header names
pub mod names {
    pub const AUTHORIZATION: &str = "Authorization";
    pub const CONTENT_TYPE: &str = "Content-Type";
    pub const SET_COOKIE: &str = "Set-Cookie";
}
