//! HTTP server setup and request dispatch.
//!
//! # Responsibilities
//! - Own the user store and the live plan limits
//! - Build the Axum router: one route per (method, path), each with its guards
//! - Wire up middleware (tracing, request id, timeout, body limit)
//! - Give every failure, including framework ones, a `{ "error": ... }` body
//! - Apply reloaded configuration while serving
//! - Serve until Ctrl+C or the shutdown broadcast fires

use std::sync::Arc;
use std::time::Duration;

use arc_swap::ArcSwap;
use axum::{
    extract::DefaultBodyLimit,
    middleware::{from_fn_with_state, map_response},
    routing::{delete, get, patch, post, put},
    Router,
};
use tokio::net::TcpListener;
use tokio::sync::{broadcast, mpsc};
use tower::ServiceBuilder;
use tower_http::{
    request_id::{MakeRequestUuid, PropagateRequestIdLayer, SetRequestIdLayer},
    timeout::TimeoutLayer,
    trace::TraceLayer,
};

use crate::config::{LimitsConfig, ServiceConfig};
use crate::http::error::json_error_body;
use crate::http::guards;
use crate::http::handlers::{health, todos, users};
use crate::http::request::X_REQUEST_ID;
use crate::lifecycle;
use crate::store::UserStore;

/// Application state injected into guards and handlers.
#[derive(Clone)]
pub struct AppState {
    pub store: UserStore,
    /// Plan limits; swapped in place when the config file is reloaded.
    pub limits: Arc<ArcSwap<LimitsConfig>>,
}

impl AppState {
    pub fn new(store: UserStore, limits: LimitsConfig) -> Self {
        Self {
            store,
            limits: Arc::new(ArcSwap::from_pointee(limits)),
        }
    }
}

/// HTTP server for the to-do service.
pub struct HttpServer {
    router: Router,
    config: ServiceConfig,
    state: AppState,
}

impl HttpServer {
    /// Create a new HTTP server with an empty store.
    pub fn new(config: ServiceConfig) -> Self {
        let state = AppState::new(UserStore::new(), config.limits.clone());
        let router = build_router(&config, state.clone());
        Self {
            router,
            config,
            state,
        }
    }

    /// Run the server, accepting connections on the given listener.
    pub async fn run(
        self,
        listener: TcpListener,
        config_updates: mpsc::UnboundedReceiver<ServiceConfig>,
        shutdown: broadcast::Receiver<()>,
    ) -> Result<(), std::io::Error> {
        let addr = listener.local_addr()?;
        tracing::info!(address = %addr, "HTTP server starting");

        let reloader = tokio::spawn(apply_config_updates(
            self.config.clone(),
            self.state.clone(),
            config_updates,
        ));

        axum::serve(listener, self.router)
            .with_graceful_shutdown(lifecycle::wait_for_shutdown(shutdown))
            .await?;

        reloader.abort();
        tracing::info!(users = self.state.store.len(), "HTTP server stopped");
        Ok(())
    }

    /// Get a reference to the config.
    pub fn config(&self) -> &ServiceConfig {
        &self.config
    }

    /// Get a handle to the shared state.
    pub fn state(&self) -> &AppState {
        &self.state
    }
}

/// Build the Axum router with every route, its guards, and the middleware stack.
///
/// Guards listed in a `ServiceBuilder` run top to bottom.
#[allow(deprecated)]
pub fn build_router(config: &ServiceConfig, state: AppState) -> Router {
    let user_exists = from_fn_with_state(state.clone(), guards::user_exists);
    let pro_quota = from_fn_with_state(state.clone(), guards::pro_quota);
    let todo_exists = from_fn_with_state(state.clone(), guards::todo_exists);
    let user_by_id = from_fn_with_state(state.clone(), guards::user_by_id);

    Router::new()
        .route("/health", get(health::get_health))
        .route("/users", post(users::create_user))
        .route(
            "/users/{id}",
            get(users::get_user).route_layer(user_by_id.clone()),
        )
        .route(
            "/users/{id}/pro",
            patch(users::activate_pro).route_layer(user_by_id),
        )
        .route(
            "/todos",
            get(todos::list_todos).route_layer(user_exists.clone()),
        )
        .route(
            "/todos",
            post(todos::create_todo).route_layer(
                ServiceBuilder::new()
                    .layer(user_exists.clone())
                    .layer(pro_quota),
            ),
        )
        .route(
            "/todos/{id}",
            put(todos::update_todo).route_layer(todo_exists.clone()),
        )
        .route(
            "/todos/{id}",
            delete(todos::delete_todo).route_layer(
                ServiceBuilder::new()
                    .layer(user_exists)
                    .layer(todo_exists.clone()),
            ),
        )
        .route(
            "/todos/{id}/done",
            patch(todos::mark_done).route_layer(todo_exists),
        )
        .with_state(state)
        .layer(DefaultBodyLimit::max(config.limits.max_body_size))
        .layer(TimeoutLayer::new(Duration::from_secs(config.timeouts.request_secs)))
        .layer(map_response(json_error_body))
        .layer(TraceLayer::new_for_http())
        .layer(PropagateRequestIdLayer::new(X_REQUEST_ID))
        .layer(SetRequestIdLayer::new(X_REQUEST_ID, MakeRequestUuid))
}

/// Apply reloaded configs until the sender goes away.
///
/// Plan limits take effect immediately; anything else needs a restart.
async fn apply_config_updates(
    mut current: ServiceConfig,
    state: AppState,
    mut updates: mpsc::UnboundedReceiver<ServiceConfig>,
) {
    while let Some(next) = updates.recv().await {
        if next.listener != current.listener
            || next.timeouts != current.timeouts
            || next.observability != current.observability
        {
            tracing::warn!("Listener, timeout and logging changes take effect after a restart");
        }
        if next.limits.max_body_size != current.limits.max_body_size {
            tracing::warn!("limits.max_body_size changes take effect after a restart");
        }
        if next.limits.free_tier_todo_limit != current.limits.free_tier_todo_limit {
            tracing::info!(
                old = current.limits.free_tier_todo_limit,
                new = next.limits.free_tier_todo_limit,
                "Free plan task limit updated"
            );
        }

        state.limits.store(Arc::new(next.limits.clone()));
        current = next;
    }
}
