use std::net::SocketAddr;

use axum::{
    Router, middleware,
    routing::{get, put},
};
use tower_http::{
    compression::CompressionLayer, cors::CorsLayer, timeout::TimeoutLayer, trace::TraceLayer,
};

use masterblog_storage::DynStorage;

use crate::{
    config::{AppConfig, PaginationConfig},
    handlers, middleware as app_middleware,
};

/// Shared state handed to every handler.
#[derive(Clone)]
pub struct AppState {
    pub storage: DynStorage,
    pub pagination: PaginationConfig,
}

pub struct MasterblogServer {
    addr: SocketAddr,
    app: Router,
}

pub fn build_app(cfg: &AppConfig, storage: DynStorage) -> Router {
    let body_limit = cfg.server.body_limit_bytes;
    let state = AppState {
        storage,
        pagination: cfg.pagination.clone(),
    };
    Router::new()
        // Health and info endpoints
        .route("/", get(handlers::root))
        .route("/healthz", get(handlers::healthz))
        .route("/readyz", get(handlers::readyz))
        // Browser favicon shortcut
        .route("/favicon.ico", get(handlers::favicon))
        // Post collection: list and create
        .route(
            "/api/posts",
            get(handlers::list_posts).post(handlers::create_post),
        )
        // Static segment must be registered alongside the {id} routes
        .route("/api/posts/search", get(handlers::search_posts))
        .route(
            "/api/posts/{id}",
            put(handlers::update_post).delete(handlers::delete_post),
        )
        .route(
            "/api/posts/{id}/comments",
            get(handlers::list_comments).post(handlers::create_comment),
        )
        .with_state(state)
        // Middleware stack, innermost first; request_id is added last so it
        // runs outermost and stamps every response, including rejections
        // produced by the layers below.
        .layer(middleware::from_fn(app_middleware::content_negotiation))
        .layer(CorsLayer::permissive())
        .layer(CompressionLayer::new())
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(|req: &axum::http::Request<_>| {
                    use tracing::field::Empty;
                    // Skip creating a span for browser favicon requests to avoid noisy logs
                    if req.uri().path() == "/favicon.ico" {
                        return tracing::span!(tracing::Level::TRACE, "noop");
                    }
                    let method = req.method().clone();
                    let uri = req.uri().clone();
                    let req_id = req
                        .extensions()
                        .get::<axum::http::HeaderValue>()
                        .and_then(|v| v.to_str().ok())
                        .unwrap_or("")
                        .to_string();
                    tracing::info_span!(
                        "http.request",
                        http.method = %method,
                        http.target = %uri,
                        http.route = Empty,
                        http.status_code = Empty,
                        request_id = %req_id
                    )
                })
                .on_response(|res: &axum::http::Response<_>, latency: std::time::Duration, span: &tracing::Span| {
                    // Record status on the span; the noop favicon span is skipped below
                    span.record("http.status_code", &tracing::field::display(res.status().as_u16()));
                    if let Some(meta) = span.metadata() {
                        if meta.name() != "noop" {
                            tracing::info!(
                                http.status = %res.status().as_u16(),
                                elapsed_ms = %latency.as_millis(),
                                "request handled"
                            );
                        }
                    }
                })
        )
        .layer(TimeoutLayer::new(cfg.request_timeout()))
        .layer(axum::extract::DefaultBodyLimit::max(body_limit))
        .layer(middleware::from_fn(app_middleware::request_id))
}

pub struct ServerBuilder {
    addr: SocketAddr,
    config: AppConfig,
    storage: DynStorage,
}

impl ServerBuilder {
    pub fn new() -> Self {
        let cfg = AppConfig::default();
        Self {
            addr: cfg.addr(),
            config: cfg,
            storage: masterblog_db_memory::create_storage(),
        }
    }

    pub fn with_addr(mut self, addr: SocketAddr) -> Self {
        self.addr = addr;
        self
    }

    pub fn with_config(mut self, cfg: AppConfig) -> Self {
        self.addr = cfg.addr();
        self.config = cfg;
        self
    }

    pub fn with_storage(mut self, storage: DynStorage) -> Self {
        self.storage = storage;
        self
    }

    pub fn build(self) -> MasterblogServer {
        let app = build_app(&self.config, self.storage);

        MasterblogServer {
            addr: self.addr,
            app,
        }
    }
}

impl Default for ServerBuilder {
    fn default() -> Self {
        Self::new()
    }
}

impl MasterblogServer {
    pub async fn run(self) -> anyhow::Result<()> {
        let listener = tokio::net::TcpListener::bind(self.addr).await?;
        tracing::info!("listening on {}", self.addr);
        axum::serve(listener, self.app)
            .with_graceful_shutdown(shutdown_signal())
            .await?;
        Ok(())
    }
}

async fn shutdown_signal() {
    // Wait for Ctrl+C
    let _ = tokio::signal::ctrl_c().await;
    tracing::info!("shutdown signal received");
}
