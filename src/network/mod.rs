// Copyright (c) 2026 Bountyy Oy. All rights reserved.
// This software is proprietary and confidential.

//! Request pipeline
//!
//! Interceptor chaining plus the built-in XSRF and JSONP interceptors.

mod interceptor;
mod jsonp;
mod xsrf;

pub use interceptor::{HeaderInjector, HttpInterceptor, InterceptorChain, LoggingInterceptor, Next};
pub use jsonp::{
    next_callback_name, substitute_callback, unwrap_callback, JsonpBackend, JsonpInterceptor,
    JSONP_CALLBACK_PLACEHOLDER,
};
pub use xsrf::{
    CookieXsrfExtractor, XsrfInterceptor, XsrfTokenExtractor, XSRF_COOKIE_NAME, XSRF_HEADER_NAME,
};
