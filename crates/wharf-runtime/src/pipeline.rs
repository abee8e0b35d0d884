// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Ordered HTTP middleware pipeline assembled from registered factories.

use std::sync::Arc;

use tracing::info;
use wharf_core::{Handler, Metadata, Middleware, SharedDeps, WharfError};
use wharf_registry::{MiddlewareFactory, Registry};

/// One declared pipeline stage: a middleware name plus its metadata.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineEntry {
    pub name: String,
    pub metadata: Metadata,
}

impl PipelineEntry {
    pub fn new(name: impl Into<String>, metadata: Metadata) -> Self {
        Self {
            name: name.into(),
            metadata,
        }
    }
}

struct Stage {
    name: String,
    middleware: Middleware,
}

/// Built middleware chain. Cheap to clone.
#[derive(Clone, Default)]
pub struct Pipeline {
    stages: Arc<[Stage]>,
}

impl std::fmt::Debug for Pipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl Pipeline {
    /// Invoke each declared middleware factory in order.
    ///
    /// Any failure aborts assembly; no stage is skipped.
    pub fn assemble(
        registry: &Registry<MiddlewareFactory>,
        entries: &[PipelineEntry],
        deps: &SharedDeps,
    ) -> Result<Self, WharfError> {
        let stages = entries
            .iter()
            .map(|entry| {
                let middleware = registry.build(&entry.name, &entry.metadata, deps)?;
                Ok(Stage {
                    name: entry.name.clone(),
                    middleware,
                })
            })
            .collect::<Result<Vec<_>, WharfError>>()?;

        let pipeline = Self {
            stages: stages.into(),
        };
        info!(count = pipeline.len(), stages = ?pipeline.names(), "http pipeline assembled");
        Ok(pipeline)
    }

    pub fn names(&self) -> Vec<&str> {
        self.stages.iter().map(|s| s.name.as_str()).collect()
    }

    pub fn len(&self) -> usize {
        self.stages.len()
    }

    pub fn is_empty(&self) -> bool {
        self.stages.is_empty()
    }

    /// Wrap `next` so the first declared stage sees the request first.
    pub fn apply(&self, next: Handler) -> Handler {
        self.stages
            .iter()
            .rev()
            .fold(next, |handler, stage| (stage.middleware)(handler))
    }
}

#[cfg(test)]
mod tests {
    use bytes::Bytes;
    use wharf_core::handler::{handler_fn, middleware_fn};
    use wharf_core::{HttpRequest, MiddlewareConfigError};

    use super::*;

    /// Middleware appending `tag` to the request body.
    fn tagging(tag: &'static str) -> Middleware {
        middleware_fn(move |next: Handler| {
            handler_fn(move |req: HttpRequest| {
                let next = next.clone();
                async move {
                    let (parts, body) = req.into_parts();
                    let mut tagged = body.to_vec();
                    tagged.extend_from_slice(tag.as_bytes());
                    next(http::Request::from_parts(parts, Bytes::from(tagged))).await
                }
            })
        })
    }

    fn registry() -> Registry<MiddlewareFactory> {
        let mut registry =
            Registry::<MiddlewareFactory>::new(wharf_core::Category::HttpMiddleware);
        registry
            .register("a", |_: &Metadata, _: &SharedDeps| Ok(tagging("a")))
            .unwrap();
        registry
            .register("b", |_: &Metadata, _: &SharedDeps| Ok(tagging("b")))
            .unwrap();
        registry
            .register("strict", |metadata: &Metadata, _: &SharedDeps| {
                metadata.require("mode")?;
                Ok(tagging("s"))
            })
            .unwrap();
        registry
    }

    fn echo() -> Handler {
        handler_fn(|req: HttpRequest| async move { http::Response::new(req.into_body()) })
    }

    #[tokio::test]
    async fn first_declared_stage_runs_first() {
        let deps = SharedDeps::new("test");
        let entries = [
            PipelineEntry::new("b", Metadata::new()),
            PipelineEntry::new("a", Metadata::new()),
        ];
        let pipeline = Pipeline::assemble(&registry(), &entries, &deps).unwrap();
        assert_eq!(pipeline.names(), vec!["b", "a"]);

        let handler = pipeline.apply(echo());
        let response = handler(http::Request::new(Bytes::new())).await;
        assert_eq!(response.body().as_ref(), b"ba");
    }

    #[tokio::test]
    async fn empty_pipeline_passes_through() {
        let pipeline = Pipeline::default();
        assert!(pipeline.is_empty());
        let response = pipeline.apply(echo())(http::Request::new(Bytes::from_static(b"x"))).await;
        assert_eq!(response.body().as_ref(), b"x");
    }

    #[test]
    fn factory_failure_aborts_assembly() {
        let deps = SharedDeps::new("test");
        let entries = [
            PipelineEntry::new("a", Metadata::new()),
            PipelineEntry::new("strict", Metadata::new()),
        ];
        let err = Pipeline::assemble(&registry(), &entries, &deps).unwrap_err();
        match err {
            WharfError::MiddlewareConfig { name, source } => {
                assert_eq!(name, "strict");
                assert_eq!(source, MiddlewareConfigError::missing_key("mode"));
            }
            other => panic!("expected MiddlewareConfig, got {other:?}"),
        }
    }

    #[test]
    fn unknown_middleware_is_not_found() {
        let deps = SharedDeps::new("test");
        let entries = [PipelineEntry::new("missing", Metadata::new())];
        assert!(matches!(
            Pipeline::assemble(&registry(), &entries, &deps),
            Err(WharfError::NotFound { .. })
        ));
    }
}
