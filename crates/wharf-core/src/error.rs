// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Error types for the Wharf host.

use thiserror::Error;

use crate::types::{Category, LifecycleState};

/// The primary error type used across registries, composition, and the lifecycle.
#[derive(Debug, Error)]
pub enum WharfError {
    /// A second registration under an existing (category, name) pair.
    #[error("{category} component `{name}` is already registered")]
    DuplicateName { category: Category, name: String },

    /// Lookup of a name that was never registered in the category.
    #[error("{category} component `{name}` is not registered")]
    NotFound { category: Category, name: String },

    /// A registration's declared structure is invalid.
    #[error("invalid {category} component `{name}`: {reason}")]
    Config {
        category: Category,
        name: String,
        reason: String,
    },

    /// A middleware factory rejected the pipeline metadata it was given.
    #[error("http middleware `{name}` rejected its metadata: {source}")]
    MiddlewareConfig {
        name: String,
        #[source]
        source: MiddlewareConfigError,
    },

    /// Composition failed; the host never entered `Running`.
    #[error("fatal startup error: {0}")]
    FatalStartup(#[source] Box<WharfError>),

    /// A lifecycle transition that would revisit or step back a state.
    #[error("invalid lifecycle transition from {from} to {to}")]
    InvalidTransition {
        from: LifecycleState,
        to: LifecycleState,
    },

    /// New work was offered after the drain began.
    #[error("host is shutting down")]
    ShuttingDown,

    /// A conditional state write or delete named a stale or absent etag.
    #[error("etag mismatch for key `{key}`")]
    EtagMismatch { key: String },

    /// A component instance failed while serving a request.
    #[error("{category} component error: {message}")]
    Component {
        category: Category,
        message: String,
        #[source]
        source: Option<Box<dyn std::error::Error + Send + Sync>>,
    },

    /// I/O failures (binding listeners, reading component files).
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),

    /// Internal or unexpected errors.
    #[error("internal error: {0}")]
    Internal(String),
}

impl WharfError {
    /// Shorthand for a sourceless [`WharfError::Component`].
    pub fn component(category: Category, message: impl Into<String>) -> Self {
        WharfError::Component {
            category,
            message: message.into(),
            source: None,
        }
    }

    /// Returns the error wrapped by [`WharfError::FatalStartup`], or `self`.
    pub fn root(&self) -> &WharfError {
        match self {
            WharfError::FatalStartup(inner) => inner.root(),
            other => other,
        }
    }
}

/// Error returned by a middleware factory when its metadata is malformed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{reason}")]
pub struct MiddlewareConfigError {
    pub reason: String,
}

impl MiddlewareConfigError {
    pub fn new(reason: impl Into<String>) -> Self {
        Self {
            reason: reason.into(),
        }
    }

    /// A required metadata key was absent.
    pub fn missing_key(key: &str) -> Self {
        Self::new(format!("missing required metadata key `{key}`"))
    }
}
