// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP middleware factories.
//!
//! Each factory validates its metadata when the pipeline is assembled and
//! returns a transform from the next handler to a wrapping handler.

use std::num::NonZeroU32;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use bytes::Bytes;
use http::StatusCode;
use http::header::AUTHORIZATION;
use tokio::time::Instant;
use tracing::debug;
use wharf_core::handler::{handler_fn, middleware_fn, status_response};
use wharf_core::{
    Category, Handler, HttpRequest, Metadata, Middleware, MiddlewareConfigError, SharedDeps,
};

pub const UPPERCASE: &str = "uppercase";
pub const RATELIMIT: &str = "ratelimit";
pub const BEARER: &str = "bearer";

const RATE_WINDOW: Duration = Duration::from_secs(1);

/// Uppercases the request body before passing it on.
pub fn uppercase(_metadata: &Metadata, _deps: &SharedDeps) -> Result<Middleware, MiddlewareConfigError> {
    Ok(middleware_fn(|next: Handler| {
        handler_fn(move |req: HttpRequest| {
            let next = next.clone();
            async move {
                let (parts, body) = req.into_parts();
                let upper = match std::str::from_utf8(&body) {
                    Ok(text) => Bytes::from(text.to_uppercase()),
                    Err(_) => Bytes::from(body.to_ascii_uppercase()),
                };
                next(http::Request::from_parts(parts, upper)).await
            }
        })
    }))
}

#[derive(Debug)]
struct FixedWindow {
    limit: u32,
    started: Instant,
    admitted: u32,
}

impl FixedWindow {
    fn admit(&mut self, now: Instant) -> bool {
        if now.duration_since(self.started) >= RATE_WINDOW {
            self.started = now;
            self.admitted = 0;
        }
        if self.admitted < self.limit {
            self.admitted += 1;
            true
        } else {
            false
        }
    }
}

/// Admits at most `maxRequests` requests per second, answering 429 beyond that.
pub fn ratelimit(metadata: &Metadata, deps: &SharedDeps) -> Result<Middleware, MiddlewareConfigError> {
    let limit: NonZeroU32 = metadata.require_parsed("maxRequests")?;
    deps.logger().component_span(Category::HttpMiddleware, RATELIMIT).in_scope(|| {
        debug!(max_requests = limit.get(), "rate limiter configured");
    });

    let window = Arc::new(Mutex::new(FixedWindow {
        limit: limit.get(),
        started: Instant::now(),
        admitted: 0,
    }));

    Ok(middleware_fn(move |next: Handler| {
        let window = window.clone();
        handler_fn(move |req: HttpRequest| {
            let next = next.clone();
            let admitted = window
                .lock()
                .unwrap_or_else(PoisonError::into_inner)
                .admit(Instant::now());
            async move {
                if admitted {
                    next(req).await
                } else {
                    status_response(StatusCode::TOO_MANY_REQUESTS)
                }
            }
        })
    }))
}

/// Rejects requests whose `Authorization` header is not `Bearer <token>`.
pub fn bearer(metadata: &Metadata, _deps: &SharedDeps) -> Result<Middleware, MiddlewareConfigError> {
    let expected: Arc<str> = format!("Bearer {}", metadata.require("token")?).into();

    Ok(middleware_fn(move |next: Handler| {
        let expected = expected.clone();
        handler_fn(move |req: HttpRequest| {
            let next = next.clone();
            let authorized = req
                .headers()
                .get(AUTHORIZATION)
                .is_some_and(|value| value.as_bytes() == expected.as_bytes());
            async move {
                if authorized {
                    next(req).await
                } else {
                    status_response(StatusCode::UNAUTHORIZED)
                }
            }
        })
    }))
}
