//! Entry points: a synchronous call interface and an axum router

use std::sync::Arc;

use axum::Router;
use axum::body::Body;
use axum::extract::State;
use bytes::Bytes;
use http::HeaderName;
use restree_errors::RestError;
use tracing::error;

use crate::config::ServeConfig;
use crate::dispatch::dispatch;
use crate::links::join_path;
use crate::middleware::{contain, method_override};
use crate::request::Request;
use crate::resource::ResourceRef;
use crate::response::Response;
use crate::writers::ResponseWriter;

/// Serves a resource tree. Cheap to clone; all clones share the tree.
#[derive(Clone)]
pub struct ResourceService {
    root: ResourceRef,
    writers: Arc<Vec<ResponseWriter>>,
    config: Arc<ServeConfig>,
}

impl ResourceService {
    #[must_use]
    pub fn new(root: ResourceRef) -> Self {
        Self {
            root,
            writers: Arc::new(Vec::new()),
            config: Arc::new(ServeConfig::default()),
        }
    }

    /// Writers consulted before resource and default ones, for every request.
    #[must_use]
    pub fn with_writers(mut self, writers: Vec<ResponseWriter>) -> Self {
        self.writers = Arc::new(writers);
        self
    }

    #[must_use]
    pub fn with_config(mut self, config: ServeConfig) -> Self {
        self.config = Arc::new(config);
        self
    }

    #[must_use]
    pub fn config(&self) -> &ServeConfig {
        &self.config
    }

    /// Dispatch a normalized request. Never fails: every error becomes a response.
    #[must_use]
    pub fn dispatch(&self, mut request: Request) -> Response {
        request
            .response_writers
            .extend(self.writers.iter().cloned());
        if self.config.method_override {
            request = method_override(request);
        }
        let instance = join_path(&request.path);
        let root = Arc::clone(&self.root);
        contain(&instance, || dispatch(root, None, request, &self.config))
    }

    /// Dispatch, report the status line and headers to `start_response`, return the body.
    #[must_use]
    pub fn respond<F>(&self, request: Request, start_response: F) -> Bytes
    where
        F: FnOnce(&str, &[(HeaderName, String)]),
    {
        let response = self.dispatch(request);
        start_response(&response.status_line(), &response.headers);
        response.body
    }

    #[must_use]
    pub fn handle(&self, request: http::Request<Bytes>) -> http::Response<Bytes> {
        self.dispatch(Request::from_http(request)).into_http()
    }

    /// Router answering every path and method from the tree.
    ///
    /// Bodies are buffered up to `max_body_bytes`; dispatch runs on the blocking pool.
    #[must_use]
    pub fn into_router(self) -> Router {
        Router::new().fallback(serve).with_state(self)
    }
}

async fn serve(
    State(service): State<ResourceService>,
    request: axum::extract::Request,
) -> http::Response<Body> {
    let (parts, body) = request.into_parts();
    let limit = service.config.max_body_bytes;
    let bytes = match axum::body::to_bytes(body, limit).await {
        Ok(bytes) => bytes,
        Err(err) => {
            let err = RestError::bad_request(format!("unreadable request body: {err}"));
            return Response::from_error(&err, parts.uri.path()).into_http().map(Body::from);
        }
    };
    let request = http::Request::from_parts(parts, bytes);

    match tokio::task::spawn_blocking(move || service.handle(request)).await {
        Ok(response) => response.map(Body::from),
        Err(err) => {
            error!(error = %err, "dispatch task failed");
            Response::internal_error().into_http().map(Body::from)
        }
    }
}
