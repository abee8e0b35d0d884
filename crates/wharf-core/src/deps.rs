// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Dependencies shared by every factory invocation.
//!
//! `SharedDeps` is passed explicitly to each factory rather than captured by
//! it, so the only state two instances share is visible at the call site.

use std::sync::Arc;

use tracing::Span;

use crate::types::Category;

/// Shared dependencies injected once at composition time.
#[derive(Debug, Clone)]
pub struct SharedDeps {
    app_id: Arc<str>,
    logger: ComponentLogger,
}

impl SharedDeps {
    pub fn new(app_id: impl Into<Arc<str>>) -> Self {
        let app_id = app_id.into();
        let logger = ComponentLogger::new(&app_id);
        Self { app_id, logger }
    }

    /// Identifier of the application this host serves.
    pub fn app_id(&self) -> &str {
        &self.app_id
    }

    pub fn logger(&self) -> &ComponentLogger {
        &self.logger
    }
}

/// Logging sink handed to components: a parent span for all component events.
#[derive(Debug, Clone)]
pub struct ComponentLogger {
    span: Span,
}

impl ComponentLogger {
    fn new(app_id: &str) -> Self {
        Self {
            span: tracing::info_span!(target: "wharf::contrib", "contrib", app_id = %app_id),
        }
    }

    pub fn span(&self) -> &Span {
        &self.span
    }

    /// A child span identifying one component instance.
    pub fn component_span(&self, category: Category, name: &str) -> Span {
        tracing::info_span!(
            target: "wharf::contrib",
            parent: &self.span,
            "component",
            category = %category,
            name = %name
        )
    }
}
