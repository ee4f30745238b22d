//! HTTP server setup and configuration.
//!
//! # Responsibilities
//! - Create Axum Router with all handlers
//! - Wire up middleware (request ID, tracing, route guard)
//! - Mount the proxy relay under the configured prefix
//! - Mount OAuth completion/initiation and logout endpoints
//! - Bind server to listener with graceful shutdown

use std::sync::Arc;

use axum::{
    body::Body,
    http::{Request, StatusCode},
    middleware,
    response::Response,
    routing::get,
    Json, Router,
};
use serde_json::json;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::trace::TraceLayer;

use crate::auth::{logout, oauth_authorize, oauth_callback};
use crate::config::GatewayConfig;
use crate::http::middleware::route_guard_middleware;
use crate::http::request::{propagate_request_id_layer, set_request_id_layer, RequestIdExt};
use crate::http::response::json_message;
use crate::lifecycle::ShutdownSignal;
use crate::proxy::{relay, UpstreamClient};
use crate::routing::RouteTable;
use crate::session::SessionCookies;

/// Liveness endpoint, answered without touching upstream.
pub const HEALTH_PATH: &str = "/healthz";

/// Error type for server construction and serving.
#[derive(Debug, thiserror::Error)]
pub enum ServerError {
    #[error("failed to build upstream client: {0}")]
    Client(#[from] reqwest::Error),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Application state injected into handlers.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<GatewayConfig>,
    pub upstream: Arc<UpstreamClient>,
    pub routes: Arc<RouteTable>,
    pub cookies: Arc<SessionCookies>,
    proxy_prefix: Arc<str>,
}

impl AppState {
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        let upstream = UpstreamClient::new(&config)?;
        let routes = RouteTable::from_config(&config.routes);
        let cookies = SessionCookies::from_config(&config);
        let proxy_prefix: Arc<str> = Arc::from(config.proxy.prefix.trim_end_matches('/'));

        Ok(Self {
            config: Arc::new(config),
            upstream: Arc::new(upstream),
            routes: Arc::new(routes),
            cookies: Arc::new(cookies),
            proxy_prefix,
        })
    }

    /// Proxy prefix without trailing slash, e.g. `/api`.
    pub fn proxy_prefix(&self) -> &str {
        &self.proxy_prefix
    }
}

/// HTTP server for the session gateway.
pub struct HttpServer {
    state: AppState,
    pages: Router,
}

impl HttpServer {
    /// Create a new HTTP server with the given configuration.
    pub fn new(config: GatewayConfig) -> Result<Self, ServerError> {
        Ok(Self {
            state: AppState::new(config)?,
            pages: Router::new(),
        })
    }

    /// Mount UI routes behind the route guard.
    pub fn with_pages(mut self, pages: Router) -> Self {
        self.pages = self.pages.merge(pages);
        self
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    /// Build the complete router with all middleware layers.
    pub fn into_router(self) -> Router {
        build_router(self.state, self.pages)
    }

    /// Run the server, accepting connections on the given listener until
    /// `shutdown` fires.
    pub async fn run(
        self,
        listener: TcpListener,
        shutdown: ShutdownSignal,
    ) -> Result<(), ServerError> {
        let addr = listener.local_addr()?;
        tracing::info!(
            address = %addr,
            upstream = %self.state.upstream.base_url(),
            environment = %self.state.config.environment,
            "HTTP server starting"
        );

        let app = self.into_router();
        axum::serve(listener, app)
            .with_graceful_shutdown(shutdown.recv())
            .await?;

        tracing::info!("HTTP server stopped");
        Ok(())
    }
}

fn build_router(state: AppState, pages: Router) -> Router {
    let config = Arc::clone(&state.config);
    let proxy_route = format!("{}/{{*tail}}", state.proxy_prefix());
    let authorize_route = format!(
        "{}/{{provider}}",
        config.oauth.authorize_prefix.trim_end_matches('/')
    );

    Router::new()
        .route(HEALTH_PATH, get(health))
        .route(
            &proxy_route,
            get(relay).post(relay).put(relay).delete(relay).patch(relay),
        )
        .route(&config.oauth.callback_path, get(oauth_callback))
        .route(&config.oauth.logout_path, get(logout).post(logout))
        .route(&authorize_route, get(oauth_authorize))
        .with_state(state.clone())
        .merge(pages)
        .fallback(not_found)
        .layer(middleware::from_fn_with_state(state, route_guard_middleware))
        .layer(
            ServiceBuilder::new()
                .layer(set_request_id_layer())
                .layer(TraceLayer::new_for_http().make_span_with(|req: &Request<Body>| {
                    // Path only: the callback query carries the token.
                    tracing::info_span!(
                        "request",
                        method = %req.method(),
                        path = %req.uri().path(),
                        request_id = %req.request_id(),
                    )
                }))
                .layer(propagate_request_id_layer()),
        )
}

async fn health() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok" }))
}

async fn not_found() -> Response {
    json_message(StatusCode::NOT_FOUND, "Not found")
}

#[cfg(test)]
mod tests {
    use super::*;
    use tower::ServiceExt;

    #[test]
    fn proxy_prefix_is_trimmed() {
        let mut config = GatewayConfig::default();
        config.proxy.prefix = "/api/".into();
        let state = AppState::new(config).unwrap();
        assert_eq!(state.proxy_prefix(), "/api");
    }

    #[tokio::test]
    async fn health_endpoint() {
        let app = HttpServer::new(GatewayConfig::default()).unwrap().into_router();
        let response = app
            .oneshot(Request::builder().uri("/healthz").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert!(response.headers().contains_key("x-request-id"));
    }

    #[tokio::test]
    async fn unknown_path_is_json_404() {
        let app = HttpServer::new(GatewayConfig::default()).unwrap().into_router();
        let response = app
            .oneshot(Request::builder().uri("/nowhere").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn unsupported_method_on_proxy_is_405() {
        let app = HttpServer::new(GatewayConfig::default()).unwrap().into_router();
        let response = app
            .oneshot(
                Request::builder()
                    .method("OPTIONS")
                    .uri("/api/v1/questions")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::METHOD_NOT_ALLOWED);
    }
}
