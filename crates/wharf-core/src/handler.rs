// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Request-pipeline types for HTTP middleware.
//!
//! A [`Middleware`] is a transform from the next [`Handler`] to a handler
//! that wraps it. Bodies are fully buffered.

use std::future::Future;
use std::sync::Arc;

use bytes::Bytes;
use futures_core::future::BoxFuture;

pub type HttpRequest = http::Request<Bytes>;
pub type HttpResponse = http::Response<Bytes>;

/// An asynchronous request handler.
pub type Handler = Arc<dyn Fn(HttpRequest) -> BoxFuture<'static, HttpResponse> + Send + Sync>;

/// Wraps the next handler in the pipeline.
pub type Middleware = Arc<dyn Fn(Handler) -> Handler + Send + Sync>;

/// Builds a [`Handler`] from an async closure.
pub fn handler_fn<F, Fut>(f: F) -> Handler
where
    F: Fn(HttpRequest) -> Fut + Send + Sync + 'static,
    Fut: Future<Output = HttpResponse> + Send + 'static,
{
    Arc::new(move |req| Box::pin(f(req)))
}

/// Builds a [`Middleware`] from a closure over the next handler.
pub fn middleware_fn<F>(f: F) -> Middleware
where
    F: Fn(Handler) -> Handler + Send + Sync + 'static,
{
    Arc::new(f)
}

/// A bodyless response with the given status.
pub fn status_response(status: http::StatusCode) -> HttpResponse {
    let mut response = http::Response::new(Bytes::new());
    *response.status_mut() = status;
    response
}
