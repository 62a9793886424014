//! Demo Preview Service
//!
//! Lets the school-services admin UI run without its backend: a demo session
//! keyed by staff role, plus local business data, persisted in SQLite.

mod api;
mod bridge;
mod config;
mod data;
mod errors;
mod guard;
mod identity;
mod mode;
mod models;
mod session;
mod storage;

use std::sync::Arc;

use axum::{
    routing::{get, post, put},
    Router,
};
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use bridge::{ChangeFeed, SessionBridge};
use config::Config;
use data::LocalDataStore;
use session::{ResetFlag, SessionStore};
use storage::{SqliteStorage, StoragePort};

/// Application state shared across all handlers.
#[derive(Clone)]
pub struct AppState {
    pub sessions: Arc<SessionStore>,
    pub data: Arc<LocalDataStore>,
    pub bridge: Arc<SessionBridge>,
    pub feed: Arc<ChangeFeed>,
    pub config: Arc<Config>,
}

impl AppState {
    /// Wire the stores over one storage handle.
    pub fn new(storage: Arc<dyn StoragePort>, config: Config) -> Self {
        let sessions = Arc::new(SessionStore::new(
            Arc::clone(&storage),
            config.reset_notice_ttl,
        ));

        let mut data = LocalDataStore::new(Arc::clone(&storage));
        if config.flag_collection_resets {
            data = data.with_reset_flag(ResetFlag::new(storage, config.reset_notice_ttl));
        }

        let bridge = Arc::new(SessionBridge::new(Arc::clone(&sessions)));
        let feed = Arc::new(ChangeFeed::attach(&bridge));

        Self {
            sessions,
            data: Arc::new(data),
            bridge,
            feed,
            config: Arc::new(config),
        }
    }
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    // Load configuration
    let config = Config::from_env()?;

    // Initialize logging
    let env_filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));

    if config.log_json {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(env_filter)
            .with(tracing_subscriber::fmt::layer())
            .init();
    }

    tracing::info!("Starting Demo Preview Service");
    tracing::info!("Database path: {:?}", config.db_path);
    tracing::info!("Bind address: {}", config.bind_addr);
    tracing::info!("Exit policy: {:?}", config.exit_policy);

    // Initialize storage
    let pool = storage::init_database(&config.db_path).await?;
    let storage: Arc<dyn StoragePort> = Arc::new(SqliteStorage::new(pool));

    let bind_addr = config.bind_addr;
    let state = AppState::new(storage, config);

    match state.bridge.snapshot().await {
        Some(session) => tracing::info!(role = %session.role, "Resuming demo session"),
        None => tracing::info!("No demo session active"),
    }

    let app = create_router(state);

    let listener = tokio::net::TcpListener::bind(&bind_addr).await?;
    tracing::info!("Server listening on {}", bind_addr);

    axum::serve(listener, app).await?;

    Ok(())
}

/// Create the application router with all routes.
pub fn create_router(state: AppState) -> Router {
    // CORS configuration
    let cors = CorsLayer::new()
        .allow_origin(Any)
        .allow_methods(Any)
        .allow_headers(Any);

    let api_routes = Router::new()
        // Session
        .route(
            "/session",
            get(api::get_session)
                .post(api::sign_in)
                .delete(api::exit_demo),
        )
        .route("/session/role", put(api::switch_role))
        .route("/session/login-surface", post(api::enter_login_surface))
        .route("/session/watch", get(api::watch_session))
        .route("/mode", get(api::get_mode))
        // Identity
        .route("/profile", get(api::current_profile))
        .route("/profiles/{role}", get(api::profile_for_role))
        // Guard
        .route("/guard", get(api::get_guard))
        .route(
            "/reset-flag",
            get(api::get_reset_flag).delete(api::clear_reset_flag),
        )
        // Collections
        .route("/collections", axum::routing::delete(api::clear_collections))
        .route(
            "/collections/{id}",
            get(api::get_collection).put(api::put_collection),
        )
        // Records
        .route("/schools", get(api::list_schools).post(api::create_school))
        .route(
            "/schools/{id}/packing-status",
            get(api::get_packing_status).put(api::set_packing_status),
        )
        .route("/schools/{id}/packing-counts", get(api::list_packing_counts))
        .route(
            "/schools/{id}/outstanding",
            get(api::get_outstanding).put(api::set_outstanding),
        )
        .route("/packing-counts", post(api::set_packing_count))
        .route(
            "/training-visits",
            get(api::list_training_visits).post(api::add_training_visit),
        )
        .route(
            "/academic-queries",
            get(api::list_academic_queries).post(api::raise_academic_query),
        )
        .route(
            "/academic-queries/{id}/resolve",
            put(api::resolve_academic_query),
        );

    // Health check
    let health_routes = Router::new().route("/health", get(health_check));

    Router::new()
        .nest("/api", api_routes)
        .merge(health_routes)
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Health check endpoint.
async fn health_check() -> &'static str {
    "OK"
}
