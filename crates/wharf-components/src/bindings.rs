// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Output binding that records invocations as tracing events.

use async_trait::async_trait;
use tracing::{Span, info};
use wharf_core::types::{BindingRequest, BindingResponse};
use wharf_core::{Category, Component, OutputBinding, SharedDeps, WharfError};

pub const LOG: &str = "log";

const OPERATION_CREATE: &str = "create";

/// Emits one `info!` event per `create` invocation inside the component span.
#[derive(Debug)]
pub struct LogBinding {
    span: Span,
}

impl LogBinding {
    pub fn new(deps: &SharedDeps) -> Self {
        Self {
            span: deps.logger().component_span(Category::OutputBinding, LOG),
        }
    }
}

#[async_trait]
impl Component for LogBinding {
    fn kind(&self) -> &str {
        LOG
    }

    fn category(&self) -> Category {
        Category::OutputBinding
    }
}

#[async_trait]
impl OutputBinding for LogBinding {
    fn operations(&self) -> Vec<String> {
        vec![OPERATION_CREATE.to_string()]
    }

    async fn invoke(&self, request: BindingRequest) -> Result<BindingResponse, WharfError> {
        if request.operation != OPERATION_CREATE {
            return Err(WharfError::component(
                Category::OutputBinding,
                format!(
                    "operation `{}` is not supported by the log binding",
                    request.operation
                ),
            ));
        }

        self.span.in_scope(|| {
            info!(
                bytes = request.data.len(),
                body = %String::from_utf8_lossy(&request.data),
                metadata = ?request.metadata,
                "output binding invoked"
            )
        });
        Ok(BindingResponse::default())
    }
}
