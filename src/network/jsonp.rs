// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! JSONP support
//!
//! A JSONP request carries the `JSONP` method and a URL containing the
//! [`JSONP_CALLBACK_PLACEHOLDER`]. The backend swaps the placeholder for a
//! unique callback name, loads the script, and unwraps the `callback(...)`
//! invocation into a plain JSON response.

use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use lazy_static::lazy_static;
use regex::Regex;
use reqwest::StatusCode;

use super::interceptor::{HttpInterceptor, Next};
use crate::error::{Error, Result};
use crate::http::{names, Headers, HttpHandler, HttpRequest, HttpResponse, ResponseType};

/// Placeholder replaced by the generated callback name
pub const JSONP_CALLBACK_PLACEHOLDER: &str = "JSONP_CALLBACK";

const ERR_WRONG_METHOD: &str = "JSONP requests must use JSONP request method.";
const ERR_WRONG_RESPONSE_TYPE: &str = "JSONP requests must use Json response type.";
const ERR_HEADERS_NOT_SUPPORTED: &str = "JSONP requests do not support headers.";
const ERR_NO_CALLBACK: &str = "JSONP injected script did not invoke callback.";

static NEXT_REQUEST_ID: AtomicUsize = AtomicUsize::new(0);

lazy_static! {
    static ref CALLBACK_PARAM: Regex =
        Regex::new(&format!("={}(&|$)", JSONP_CALLBACK_PLACEHOLDER)).expect("valid regex");
    static ref CALLBACK_INVOCATION: Regex =
        Regex::new(r"^\s*([A-Za-z_$][\w$.]*)\s*\(([\s\S]*)\)\s*;?\s*$").expect("valid regex");
}

/// Unique callback name for the next JSONP request
pub fn next_callback_name() -> String {
    format!(
        "ng_jsonp_callback_{}",
        NEXT_REQUEST_ID.fetch_add(1, Ordering::Relaxed)
    )
}

/// Replace `=JSONP_CALLBACK` in a URL's query with `=<callback>`
pub fn substitute_callback(url: &str, callback: &str) -> String {
    CALLBACK_PARAM
        .replace(url, format!("={}${{1}}", callback).as_str())
        .into_owned()
}

/// Extract the JSON payload of `callback(<payload>);`
///
/// Returns `None` when the script does not invoke `callback`.
pub fn unwrap_callback<'a>(script: &'a str, callback: &str) -> Option<&'a str> {
    let captures = CALLBACK_INVOCATION.captures(script)?;
    if captures.get(1)?.as_str() != callback {
        return None;
    }
    captures.get(2).map(|payload| payload.as_str().trim())
}

/// Performs JSONP requests by loading the script through another handler
pub struct JsonpBackend {
    loader: Arc<dyn HttpHandler>,
}

impl JsonpBackend {
    pub fn new(loader: Arc<dyn HttpHandler>) -> Self {
        Self { loader }
    }
}

#[async_trait]
impl HttpHandler for JsonpBackend {
    async fn handle(&self, request: HttpRequest) -> Result<HttpResponse> {
        if !request.is_jsonp() {
            return Err(Error::jsonp(ERR_WRONG_METHOD));
        }
        if request.response_type != ResponseType::Json {
            return Err(Error::jsonp(ERR_WRONG_RESPONSE_TYPE));
        }
        if !request.headers.is_empty() {
            return Err(Error::jsonp(ERR_HEADERS_NOT_SUPPORTED));
        }

        let callback = next_callback_name();
        let url = substitute_callback(&request.url_with_params(), &callback);
        tracing::debug!(url = %url, callback = %callback, "Loading JSONP script");

        let mut script_request = HttpRequest::get(url.clone())
            .with_credentials(request.with_credentials)
            .with_response_type(ResponseType::Text);
        script_request.timeout = request.timeout;

        let script = self.loader.handle(script_request).await?;
        let text = script.text_lossy();

        let payload = unwrap_callback(&text, &callback).ok_or_else(|| Error::jsonp(ERR_NO_CALLBACK))?;
        // Reject payloads that are not JSON before handing them on
        serde_json::from_str::<serde_json::Value>(payload)?;

        let headers = Headers::from_record([(names::CONTENT_TYPE, "application/json")]);
        Ok(HttpResponse::new(StatusCode::OK, headers, payload.to_string()).with_url(url))
    }
}

/// Routes `JSONP` requests to a [`JsonpBackend`]; everything else goes on
pub struct JsonpInterceptor {
    backend: JsonpBackend,
}

impl JsonpInterceptor {
    pub fn new(backend: JsonpBackend) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl HttpInterceptor for JsonpInterceptor {
    async fn intercept(&self, request: HttpRequest, next: Next<'_>) -> Result<HttpResponse> {
        if request.is_jsonp() {
            return self.backend.handle(request).await;
        }
        next.run(request).await
    }
}
