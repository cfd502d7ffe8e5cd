// Import modules
mod auth;
mod handlers;

use std::net::SocketAddr;
use std::sync::Arc;

use axum::{
    body::Body,
    http::Request,
    middleware::Next,
    response::{IntoResponse, Response},
    routing::{get, post},
    Router,
};
use tokio::sync::{oneshot, RwLock};
use tower::ServiceBuilder;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;

use crate::auth::AuthService;
use aukiolo::components::hours::Hours;
use aukiolo::components::suggestions::Suggestions;
use aukiolo::components::{ComponentManager, HoursHandle, SuggestionsHandle};
use aukiolo::config::Config;
use aukiolo::error::component_error;
use aukiolo::{shutdown, startup};

#[derive(Clone)]
pub struct AppState {
    /// Handle to the hours component
    pub hours: HoursHandle,
    /// Handle to the suggestions component
    pub suggestions: SuggestionsHandle,
    /// Auth service for JWT operations
    pub auth_service: Arc<AuthService>,
    /// Shared application config
    pub config: Arc<RwLock<Config>>,
}

#[tokio::main]
async fn main() -> miette::Result<()> {
    // Initialize logging
    startup::init_logging()?;

    info!("Starting operating hours API server");

    // Load configuration and apply the display locale
    let config = startup::load_config().await?;
    startup::apply_locale(&config).await;

    // Open storage and bring up the components
    let db = startup::build_db(&config).await;
    let component_manager = Arc::new(startup::build_components(Arc::clone(&config)).await);
    component_manager.init_all(Arc::clone(&db)).await?;

    let hours = hours_handle(&component_manager)
        .await
        .ok_or_else(|| component_error("Hours component is not enabled"))?;
    let suggestions = suggestions_handle(&component_manager)
        .await
        .ok_or_else(|| component_error("Suggestions component is not enabled"))?;

    let auth_config = auth::AuthConfig::default();
    info!(
        "Using admin credentials from environment: username={}",
        auth_config.admin_username
    );
    let auth_service = Arc::new(AuthService::new(auth_config));

    let state = AppState {
        hours,
        suggestions,
        auth_service: auth_service.clone(),
        config: Arc::clone(&config),
    };

    // Authentication middleware for the admin routes
    async fn auth_middleware(
        req: Request<Body>,
        next: Next,
        auth_service: Arc<AuthService>,
    ) -> Result<Response, Response> {
        // Extract parts to use with extract_token
        let (parts, body) = req.into_parts();

        match auth::extract_token(&parts) {
            Ok(token) => match auth_service.validate_token(&token) {
                // Review routes are admin-only; a valid non-admin token gets 403
                Ok(claims) if !claims.is_admin() => {
                    Err(auth::AuthError::Unauthorized.into_response())
                }
                Ok(claims) => {
                    // Reconstruct the request with auth data
                    let auth = auth::JwtAuth { claims };
                    let mut req = Request::from_parts(parts, body);
                    req.extensions_mut().insert(auth);

                    Ok(next.run(req).await)
                }
                Err(err) => Err(err.into_response()),
            },
            Err(err) => Err(err.into_response()),
        }
    }

    // Create middleware with auth service
    let auth_service_for_middleware = auth_service.clone();
    let auth_middleware = move |req: Request<Body>, next: Next| {
        auth_middleware(req, next, auth_service_for_middleware.clone())
    };

    // Review routes sit behind the JWT check
    let admin_routes = Router::new()
        .route(
            "/operating-time-suggestions",
            get(handlers::list_suggestions_handler),
        )
        .route(
            "/operating-time-suggestions/{id}/approve",
            post(handlers::approve_suggestion_handler),
        )
        .route(
            "/operating-time-suggestions/{id}/reject",
            post(handlers::reject_suggestion_handler),
        )
        .layer(axum::middleware::from_fn(auth_middleware));

    // Build the router
    let app = Router::new()
        .route("/api/health", get(handlers::health_handler))
        .route("/api/login", post(handlers::login_handler))
        .route(
            "/api/hospitals/{id}/hours",
            get(handlers::hospital_hours_handler),
        )
        .route(
            "/api/hospitals/{id}/status",
            get(handlers::hospital_status_handler),
        )
        .route(
            "/api/operating-time-suggestions",
            post(handlers::submit_suggestion_handler),
        )
        .nest("/api/admin", admin_routes)
        // Other middlewares
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(CorsLayer::permissive()),
        )
        .with_state(state);

    // Shut down components when the process is asked to stop
    let (shutdown_send, shutdown_recv) = oneshot::channel();
    let shutdown_components = Arc::clone(&component_manager);
    tokio::spawn(async move {
        shutdown::handle_signals(shutdown_send, shutdown_components).await;
    });

    // Bind to address and run server
    let port = {
        let config_read = config.read().await;
        config_read.listen_port
    };
    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .map_err(|e| component_error(&format!("Failed to bind {}: {}", addr, e)))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(async move {
            let _ = shutdown_recv.await;
        })
        .await
        .map_err(|e| component_error(&format!("Server error: {}", e)))?;

    info!("Server stopped");
    Ok(())
}

/// Helper to get the hours handle from the component manager
async fn hours_handle(manager: &ComponentManager) -> Option<HoursHandle> {
    let component = manager.get_component_by_name("hours")?;
    let hours = component.as_any().downcast_ref::<Hours>()?;
    hours.get_handle().await
}

/// Helper to get the suggestions handle from the component manager
async fn suggestions_handle(manager: &ComponentManager) -> Option<SuggestionsHandle> {
    let component = manager.get_component_by_name("suggestions")?;
    let suggestions = component.as_any().downcast_ref::<Suggestions>()?;
    suggestions.get_handle().await
}
