// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! HTTP client and its builder
//!
//! The builder assembles the request pipeline in front of the transport
//! backend. The JSONP router comes first so JSONP requests never pick up
//! headers. Default headers and user interceptors follow, then the XSRF
//! interceptor and request logging.

use std::sync::Arc;

use reqwest::Method;
use serde::de::DeserializeOwned;
use url::Url;

use super::backend::{HttpHandler, ReqwestBackend};
use super::cookie::CookieJar;
use super::request::{HttpRequest, RequestBody};
use super::response::HttpResponse;
use crate::config::{HttpClientConfig, XsrfConfig};
use crate::error::{Error, Result};
use crate::network::{
    CookieXsrfExtractor, HeaderInjector, HttpInterceptor, InterceptorChain, JsonpBackend,
    JsonpInterceptor, LoggingInterceptor, XsrfInterceptor, XsrfTokenExtractor,
    JSONP_CALLBACK_PLACEHOLDER,
};

/// HTTP client dispatching through an interceptor chain
#[derive(Clone)]
pub struct HttpClient {
    handler: Arc<dyn HttpHandler>,
    cookie_jar: CookieJar,
}

impl HttpClient {
    /// Create a client over any handler
    pub fn new<H: HttpHandler + 'static>(handler: H) -> Self {
        Self {
            handler: Arc::new(handler),
            cookie_jar: CookieJar::new(),
        }
    }

    /// Start building a client
    pub fn builder() -> HttpClientBuilder {
        HttpClientBuilder::new()
    }

    /// Get the cookie jar
    pub fn cookie_jar(&self) -> &CookieJar {
        &self.cookie_jar
    }

    /// Send a request through the pipeline
    pub async fn request(&self, request: HttpRequest) -> Result<HttpResponse> {
        self.handler.handle(request).await
    }

    /// Execute a GET request
    pub async fn get(&self, url: impl Into<String>) -> Result<HttpResponse> {
        self.request(HttpRequest::get(url)).await
    }

    /// Execute a GET request and decode the JSON body
    pub async fn get_json<T: DeserializeOwned>(&self, url: impl Into<String>) -> Result<T> {
        self.get(url).await?.json()
    }

    /// Execute a DELETE request
    pub async fn delete(&self, url: impl Into<String>) -> Result<HttpResponse> {
        self.request(HttpRequest::new(Method::DELETE, url)).await
    }

    /// Execute a HEAD request
    pub async fn head(&self, url: impl Into<String>) -> Result<HttpResponse> {
        self.request(HttpRequest::new(Method::HEAD, url)).await
    }

    /// Execute an OPTIONS request
    pub async fn options(&self, url: impl Into<String>) -> Result<HttpResponse> {
        self.request(HttpRequest::new(Method::OPTIONS, url)).await
    }

    /// Execute a POST request
    pub async fn post(
        &self,
        url: impl Into<String>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        self.request(HttpRequest::post(url, body)).await
    }

    /// Execute a PUT request
    pub async fn put(
        &self,
        url: impl Into<String>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        self.request(HttpRequest::new(Method::PUT, url).with_body(body))
            .await
    }

    /// Execute a PATCH request
    pub async fn patch(
        &self,
        url: impl Into<String>,
        body: impl Into<RequestBody>,
    ) -> Result<HttpResponse> {
        self.request(HttpRequest::new(Method::PATCH, url).with_body(body))
            .await
    }

    /// Execute a JSONP request, passing the callback name in `callback_param`
    pub async fn jsonp(
        &self,
        url: impl Into<String>,
        callback_param: &str,
    ) -> Result<HttpResponse> {
        let request = HttpRequest::jsonp(url).with_param(callback_param, JSONP_CALLBACK_PLACEHOLDER);
        self.request(request).await
    }
}

/// Assembles an [`HttpClient`] from features
pub struct HttpClientBuilder {
    config: HttpClientConfig,
    backend: Option<Arc<dyn HttpHandler>>,
    interceptors: Vec<Arc<dyn HttpInterceptor>>,
    cookie_jar: CookieJar,
    document_url: Option<Url>,
    xsrf_extractor: Option<Arc<dyn XsrfTokenExtractor>>,
}

impl Default for HttpClientBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl HttpClientBuilder {
    pub fn new() -> Self {
        Self::from_config(HttpClientConfig::default())
    }

    /// Start from a loaded configuration
    pub fn from_config(config: HttpClientConfig) -> Self {
        Self {
            config,
            backend: None,
            interceptors: Vec::new(),
            cookie_jar: CookieJar::new(),
            document_url: None,
            xsrf_extractor: None,
        }
    }

    /// Use a custom transport instead of reqwest
    pub fn backend<B: HttpHandler + 'static>(mut self, backend: B) -> Self {
        self.backend = Some(Arc::new(backend));
        self
    }

    /// Register an interceptor; interceptors run in registration order
    pub fn interceptor<I: HttpInterceptor + 'static>(mut self, interceptor: I) -> Self {
        self.interceptors.push(Arc::new(interceptor));
        self
    }

    /// Use custom XSRF cookie and header names
    pub fn xsrf(mut self, xsrf: XsrfConfig) -> Self {
        self.config.xsrf = Some(xsrf);
        self
    }

    /// Disable XSRF protection
    pub fn no_xsrf_protection(mut self) -> Self {
        self.config.disable_xsrf = true;
        self
    }

    /// Route `JSONP` requests to the JSONP backend
    pub fn jsonp_support(mut self) -> Self {
        self.config.jsonp = true;
        self
    }

    /// Share a cookie jar with the transport and XSRF extractor
    pub fn cookie_jar(mut self, jar: CookieJar) -> Self {
        self.cookie_jar = jar;
        self
    }

    /// Origin whose cookies hold the XSRF token
    pub fn document_url(mut self, url: Url) -> Self {
        self.document_url = Some(url);
        self
    }

    /// Supply the XSRF token from somewhere other than the cookie jar
    pub fn xsrf_extractor<E: XsrfTokenExtractor + 'static>(mut self, extractor: E) -> Self {
        self.xsrf_extractor = Some(Arc::new(extractor));
        self
    }

    /// Log every request and response
    pub fn logging(mut self, enabled: bool) -> Self {
        self.config.log_requests = enabled;
        self
    }

    /// Build the client
    pub fn build(self) -> Result<HttpClient> {
        if self.config.xsrf.is_some() && self.config.disable_xsrf {
            return Err(Error::config(
                "found both an XSRF configuration and disabled XSRF protection",
            ));
        }

        let backend: Arc<dyn HttpHandler> = match self.backend {
            Some(backend) => backend,
            None => Arc::new(ReqwestBackend::with_config(
                &self.config,
                self.cookie_jar.clone(),
            )?),
        };

        let mut chain = InterceptorChain::from_arc(backend.clone());

        // JSONP requests must leave the chain before any header is added
        if self.config.jsonp {
            chain.push(Arc::new(JsonpInterceptor::new(JsonpBackend::new(backend))));
        }

        if !self.config.default_headers.is_empty() {
            let injector = self
                .config
                .default_headers
                .iter()
                .fold(HeaderInjector::new(), |injector, (name, value)| {
                    injector.header(name.clone(), value.clone())
                });
            chain.push(Arc::new(injector));
        }

        for interceptor in self.interceptors {
            chain.push(interceptor);
        }

        if !self.config.disable_xsrf {
            let xsrf = self.config.xsrf.clone().unwrap_or_default();
            let extractor = match (self.xsrf_extractor, self.document_url) {
                (Some(extractor), _) => Some(extractor),
                (None, Some(url)) => Some(Arc::new(CookieXsrfExtractor::new(
                    self.cookie_jar.clone(),
                    url,
                    xsrf.cookie_name.clone(),
                )) as Arc<dyn XsrfTokenExtractor>),
                (None, None) => {
                    tracing::warn!("XSRF protection enabled without a document URL; skipping");
                    None
                }
            };
            if let Some(extractor) = extractor {
                chain.push(Arc::new(XsrfInterceptor::new(extractor, xsrf.header_name)));
            }
        }

        if self.config.log_requests {
            chain.push(Arc::new(LoggingInterceptor::default()));
        }

        tracing::debug!(interceptors = chain.len(), "Built HTTP client");

        Ok(HttpClient {
            handler: Arc::new(chain),
            cookie_jar: self.cookie_jar,
        })
    }
}
