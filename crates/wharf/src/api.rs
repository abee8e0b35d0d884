// SPDX-FileCopyrightText: 2026 Wharf Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! HTTP data plane.
//!
//! Every request is collected into a body buffer, tracked as in-flight work,
//! and passed through the composed middleware pipeline before reaching the
//! `/v1.0` routes.

use std::sync::Arc;

use async_trait::async_trait;
use axum::Router;
use axum::extract::{Request, State};
use axum::response::{IntoResponse, Response};
use bytes::Bytes;
use http::header::{CONTENT_TYPE, ETAG, IF_MATCH};
use http::{HeaderValue, StatusCode};
use serde_json::{Value, json};
use tokio::net::TcpListener;
use tracing::{debug, info};
use wharf_core::handler::{handler_fn, status_response};
use wharf_core::types::{BindingRequest, PubSubMessage, SetRequest};
use wharf_core::{Handler, HttpRequest, HttpResponse, Metadata, WharfError};
use wharf_runtime::{DataPlane, PlaneContext, ShutdownCoordinator};

use crate::active::ActiveComponents;

/// Largest request body accepted, in bytes.
const MAX_BODY_BYTES: usize = 4 * 1024 * 1024;

/// Serves the `/v1.0` API on a bound listener until shutdown.
pub struct HttpPlane {
    listener: TcpListener,
    components: Arc<ActiveComponents>,
}

impl HttpPlane {
    pub fn new(listener: TcpListener, components: Arc<ActiveComponents>) -> Self {
        Self {
            listener,
            components,
        }
    }
}

#[async_trait]
impl DataPlane for HttpPlane {
    async fn serve(self, ctx: PlaneContext) -> Result<(), WharfError> {
        let addr = self.listener.local_addr()?;
        let shutdown = ctx.shutdown_token();
        let app = router(ctx, self.components);

        info!(%addr, "http data plane listening");
        axum::serve(self.listener, app)
            .with_graceful_shutdown(shutdown.cancelled_owned())
            .await?;
        info!("http data plane stopped");
        Ok(())
    }
}

struct AppState {
    handler: Handler,
    coordinator: ShutdownCoordinator,
}

/// Build the axum app: a single fallback feeding the middleware pipeline.
pub fn router(ctx: PlaneContext, components: Arc<ActiveComponents>) -> Router {
    let handler = ctx.pipeline().apply(api(ctx.clone(), components));
    let state = Arc::new(AppState {
        handler,
        coordinator: ctx.coordinator().clone(),
    });
    Router::new().fallback(dispatch).with_state(state)
}

async fn dispatch(State(state): State<Arc<AppState>>, request: Request) -> Response {
    let Ok(in_flight) = state.coordinator.track() else {
        return StatusCode::SERVICE_UNAVAILABLE.into_response();
    };

    let (parts, body) = request.into_parts();
    let body = match axum::body::to_bytes(body, MAX_BODY_BYTES).await {
        Ok(body) => body,
        Err(_) => return StatusCode::PAYLOAD_TOO_LARGE.into_response(),
    };

    let response = tokio::select! {
        response = (state.handler)(http::Request::from_parts(parts, body)) => response,
        _ = in_flight.cancelled() => status_response(StatusCode::SERVICE_UNAVAILABLE),
    };
    response.map(axum::body::Body::from).into_response()
}

fn api(ctx: PlaneContext, components: Arc<ActiveComponents>) -> Handler {
    handler_fn(move |req: HttpRequest| {
        let ctx = ctx.clone();
        let components = components.clone();
        async move { route(&ctx, &components, req).await }
    })
}

async fn route(ctx: &PlaneContext, components: &ActiveComponents, req: HttpRequest) -> HttpResponse {
    let path = req.uri().path().trim_matches('/').to_string();
    let segments: Vec<&str> = path.split('/').collect();
    let method = req.method().as_str().to_string();
    debug!(method = method.as_str(), path = path.as_str(), "request");

    match (method.as_str(), segments.as_slice()) {
        ("GET", ["v1.0", "healthz"]) => status_response(StatusCode::NO_CONTENT),
        ("GET", ["v1.0", "metadata"]) => json_response(StatusCode::OK, &metadata(ctx, components)),
        ("POST", ["v1.0", "echo"]) => http::Response::new(req.into_body()),
        ("GET", ["v1.0", "state", store, key]) => get_state(components, store, key).await,
        ("POST" | "PUT", ["v1.0", "state", store, key]) => {
            let etag = header(&req, IF_MATCH);
            save_state(components, store, key, req.into_body(), etag).await
        }
        ("DELETE", ["v1.0", "state", store, key]) => {
            let etag = header(&req, IF_MATCH);
            delete_state(components, store, key, etag).await
        }
        ("POST", ["v1.0", "publish", pubsub, topic]) => {
            publish(components, pubsub, topic, req.into_body()).await
        }
        ("POST", ["v1.0", "bindings", name]) => invoke_binding(components, name, req.into_body()).await,
        ("GET", ["v1.0", "secrets", store, name]) => get_secret(components, store, name).await,
        ("GET", ["v1.0", "configuration", store]) => get_configuration(components, store).await,
        ("GET", ["v1.0", "resolve", resolver, app_id]) => resolve(components, resolver, app_id).await,
        _ => status_response(StatusCode::NOT_FOUND),
    }
}

fn metadata(ctx: &PlaneContext, components: &ActiveComponents) -> Value {
    let active: Vec<Value> = components
        .declared()
        .iter()
        .map(|(category, name)| json!({ "category": category, "name": name }))
        .collect();

    json!({
        "id": ctx.deps().app_id(),
        "runtimeVersion": env!("CARGO_PKG_VERSION"),
        "state": ctx.state(),
        "registeredComponents": ctx.components().summary(),
        "activeComponents": active,
        "httpPipeline": ctx.pipeline().names(),
    })
}

fn header(req: &HttpRequest, name: http::header::HeaderName) -> Option<String> {
    req.headers()
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string)
}

fn json_response(status: StatusCode, body: &Value) -> HttpResponse {
    let mut response = http::Response::new(Bytes::from(body.to_string()));
    *response.status_mut() = status;
    response
        .headers_mut()
        .insert(CONTENT_TYPE, HeaderValue::from_static("application/json"));
    response
}

fn error_response(status: StatusCode, code: &str, message: impl std::fmt::Display) -> HttpResponse {
    json_response(
        status,
        &json!({ "errorCode": code, "message": message.to_string() }),
    )
}

fn not_configured(kind: &str, name: &str) -> HttpResponse {
    error_response(
        StatusCode::NOT_FOUND,
        "ERR_COMPONENT_NOT_FOUND",
        format!("{kind} `{name}` is not configured"),
    )
}

fn component_error(e: WharfError) -> HttpResponse {
    error_response(StatusCode::INTERNAL_SERVER_ERROR, "ERR_COMPONENT", e)
}

/// Stale etags are a client conflict; anything else is a store failure.
fn state_error(code: &str, e: WharfError) -> HttpResponse {
    let status = match e {
        WharfError::EtagMismatch { .. } => StatusCode::CONFLICT,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    };
    error_response(status, code, e)
}

async fn get_state(components: &ActiveComponents, store: &str, key: &str) -> HttpResponse {
    let Some(state) = components.state_store(store) else {
        return not_configured("state store", store);
    };
    match state.get(key).await {
        Ok(Some(item)) => {
            let mut response = http::Response::new(item.value);
            if let Some(etag) = item.etag.and_then(|e| HeaderValue::from_str(&e).ok()) {
                response.headers_mut().insert(ETAG, etag);
            }
            response
        }
        Ok(None) => status_response(StatusCode::NO_CONTENT),
        Err(e) => component_error(e),
    }
}

async fn save_state(
    components: &ActiveComponents,
    store: &str,
    key: &str,
    value: Bytes,
    etag: Option<String>,
) -> HttpResponse {
    let Some(state) = components.state_store(store) else {
        return not_configured("state store", store);
    };
    let request = SetRequest {
        key: key.to_string(),
        value,
        etag,
    };
    match state.set(request).await {
        Ok(etag) => {
            let mut response = status_response(StatusCode::NO_CONTENT);
            if let Ok(etag) = HeaderValue::from_str(&etag) {
                response.headers_mut().insert(ETAG, etag);
            }
            response
        }
        Err(e) => state_error("ERR_STATE_SAVE", e),
    }
}

async fn delete_state(
    components: &ActiveComponents,
    store: &str,
    key: &str,
    etag: Option<String>,
) -> HttpResponse {
    let Some(state) = components.state_store(store) else {
        return not_configured("state store", store);
    };
    match state.delete(key, etag.as_deref()).await {
        Ok(()) => status_response(StatusCode::NO_CONTENT),
        Err(e) => state_error("ERR_STATE_DELETE", e),
    }
}

async fn publish(components: &ActiveComponents, pubsub: &str, topic: &str, data: Bytes) -> HttpResponse {
    let Some(broker) = components.pubsub(pubsub) else {
        return not_configured("pubsub", pubsub);
    };
    let message = PubSubMessage {
        topic: topic.to_string(),
        data,
        metadata: Metadata::new(),
    };
    match broker.publish(message).await {
        Ok(()) => status_response(StatusCode::NO_CONTENT),
        Err(e) => component_error(e),
    }
}

async fn invoke_binding(components: &ActiveComponents, name: &str, data: Bytes) -> HttpResponse {
    let Some(binding) = components.output_binding(name) else {
        return not_configured("output binding", name);
    };
    let request = BindingRequest {
        operation: "create".to_string(),
        data,
        metadata: Metadata::new(),
    };
    match binding.invoke(request).await {
        Ok(response) if response.data.is_empty() => status_response(StatusCode::NO_CONTENT),
        Ok(response) => http::Response::new(response.data),
        Err(e) => component_error(e),
    }
}

async fn get_secret(components: &ActiveComponents, store: &str, name: &str) -> HttpResponse {
    let Some(secrets) = components.secret_store(store) else {
        return not_configured("secret store", store);
    };
    match secrets.get_secret(name, &Metadata::new()).await {
        Ok(values) => json_response(StatusCode::OK, &json!(values)),
        Err(e) => error_response(StatusCode::NOT_FOUND, "ERR_SECRET_GET", e),
    }
}

async fn get_configuration(components: &ActiveComponents, store: &str) -> HttpResponse {
    let Some(configuration) = components.configuration_store(store) else {
        return not_configured("configuration store", store);
    };
    match configuration.get(&[]).await {
        Ok(items) => {
            let body: serde_json::Map<String, Value> = items
                .into_iter()
                .map(|(key, item)| {
                    (key, json!({ "value": item.value, "version": item.version }))
                })
                .collect();
            json_response(StatusCode::OK, &Value::Object(body))
        }
        Err(e) => component_error(e),
    }
}

async fn resolve(components: &ActiveComponents, resolver: &str, app_id: &str) -> HttpResponse {
    let Some(names) = components.name_resolver(resolver) else {
        return not_configured("name resolver", resolver);
    };
    match names.resolve(app_id).await {
        Ok(address) => json_response(StatusCode::OK, &json!({ "appId": app_id, "address": address })),
        Err(e) => error_response(StatusCode::NOT_FOUND, "ERR_RESOLVE", e),
    }
}
