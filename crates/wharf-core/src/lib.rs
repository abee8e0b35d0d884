// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Core library for the Wharf component host.
//!
//! This crate provides the component categories, the capability contract for
//! each category, the HTTP middleware types, the shared-dependency object
//! handed to every factory, and the error type used across the workspace.

pub mod deps;
pub mod error;
pub mod handler;
pub mod traits;
pub mod types;

pub use deps::{ComponentLogger, SharedDeps};
pub use error::{MiddlewareConfigError, WharfError};
pub use handler::{Handler, HttpRequest, HttpResponse, Middleware};
pub use types::{Category, LifecycleState, Metadata};

pub use traits::{
    Component, ConfigurationStore, InputBinding, NameResolver, OutputBinding, PubSub,
    SecretStore, StateStore,
};
