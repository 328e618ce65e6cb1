// HTTP API Server module

use std::net::SocketAddr;
use std::sync::Arc;

use anyhow::{Context, Result};
use axum::{
    body::Body,
    extract::{ConnectInfo, DefaultBodyLimit},
    http::{header, HeaderName, HeaderValue, Method, Request},
    middleware::{self, Next},
    response::Response,
    routing::{get, post},
    Router,
};
use parking_lot::Mutex;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;
use tower::ServiceBuilder;
use tower_http::cors::{AllowOrigin, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::config::{AppConfig, ServerConfig};
use crate::prompts::PromptTemplateStore;
use crate::proxy::{ProviderAdapter, ProviderRegistry};

pub mod errors;
pub mod gemini;
pub mod handlers;
pub mod validation;

/// Shared, read-only state for every request.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<AppConfig>,
    pub providers: ProviderRegistry,
    pub adapter: ProviderAdapter,
    pub templates: &'static PromptTemplateStore,
}

impl AppState {
    pub fn new(config: Arc<AppConfig>, providers: ProviderRegistry) -> Self {
        let adapter = ProviderAdapter::new(config.ai.request_timeout());
        Self {
            config,
            providers,
            adapter,
            templates: PromptTemplateStore::builtin(),
        }
    }
}

/// Request logging middleware
async fn log_request(request: Request<Body>, next: Next) -> Response {
    let user_agent = request
        .headers()
        .get(header::USER_AGENT)
        .and_then(|v| v.to_str().ok())
        .unwrap_or("")
        .to_string();
    let peer = request
        .extensions()
        .get::<ConnectInfo<SocketAddr>>()
        .map(|ConnectInfo(addr)| addr.to_string())
        .unwrap_or_default();

    tracing::info!(
        user_agent = %user_agent,
        ip = %peer,
        "{} {}",
        request.method(),
        request.uri().path()
    );

    next.run(request).await
}

pub fn cors_layer(server: &ServerConfig) -> Result<CorsLayer> {
    let origins = server
        .cors_origins
        .iter()
        .map(|origin| {
            HeaderValue::from_str(origin).with_context(|| format!("Invalid CORS origin '{}'", origin))
        })
        .collect::<Result<Vec<_>>>()?;

    Ok(CorsLayer::new()
        .allow_origin(AllowOrigin::list(origins))
        .allow_credentials(true)
        .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE, Method::OPTIONS])
        .allow_headers([
            header::CONTENT_TYPE,
            header::AUTHORIZATION,
            HeaderName::from_static("x-requested-with"),
            header::ACCEPT,
        ]))
}

pub fn router(state: AppState) -> Result<Router> {
    let cors = cors_layer(&state.config.server)?;
    let body_limit = state.config.server.body_limit;

    let api_routes = Router::new()
        .route("/api/sendmessage", post(handlers::send_message))
        .route("/api/enhance", post(handlers::enhance))
        .route("/api/health", get(handlers::health))
        .fallback(handlers::not_found);

    Ok(api_routes
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(cors)
                .layer(DefaultBodyLimit::max(body_limit))
                .layer(middleware::from_fn(log_request)),
        )
        .with_state(state))
}

/// Handle to a running gateway. Dropping it does not stop the server.
pub struct ServerHandle {
    local_addr: SocketAddr,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    task: Mutex<Option<JoinHandle<std::io::Result<()>>>>,
}

impl ServerHandle {
    pub fn local_addr(&self) -> SocketAddr {
        self.local_addr
    }

    pub fn is_running(&self) -> bool {
        self.shutdown.lock().is_some()
    }

    /// Ask the server to stop accepting connections and drain in-flight requests.
    pub fn stop(&self) {
        if let Some(tx) = self.shutdown.lock().take() {
            let _ = tx.send(());
            tracing::info!("API server stopping");
        }
    }

    /// Wait for the serve task to finish.
    pub async fn wait(&self) -> Result<()> {
        let task = self.task.lock().take();
        if let Some(task) = task {
            task.await.context("API server task panicked")??;
            tracing::info!("API server stopped");
        }
        Ok(())
    }
}

pub async fn start_server(config: Arc<AppConfig>, providers: ProviderRegistry) -> Result<ServerHandle> {
    let addr = config.bind_addr();
    let state = AppState::new(config, providers);
    let app = router(state)?;

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {}", addr))?;
    let local_addr = listener.local_addr()?;

    tracing::info!(url = %format!("http://{}", local_addr), "API server listening on {}", addr);

    let (tx, rx) = oneshot::channel::<()>();

    let task = tokio::spawn(async move {
        axum::serve(
            listener,
            app.into_make_service_with_connect_info::<SocketAddr>(),
        )
        .with_graceful_shutdown(async {
            rx.await.ok();
        })
        .await
    });

    Ok(ServerHandle {
        local_addr,
        shutdown: Mutex::new(Some(tx)),
        task: Mutex::new(Some(task)),
    })
}
