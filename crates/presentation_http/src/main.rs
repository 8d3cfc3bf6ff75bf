//! Visage HTTP Server
//!
//! Main entry point for the profile service API.

use std::{sync::Arc, time::Duration};

use application::{
    ProfileUpdateService,
    ports::{AvatarStorage, ProfileStore, SessionProvider},
};
use domain::value_objects::UserId;
use infrastructure::{
    AppConfig, Environment, FsAvatarStorage, SqliteProfileStore, StoreBackedSessionProvider,
    TelemetryConfig, create_pool, init_telemetry,
};
use presentation_http::{EditSessionRegistry, SessionGuardLayer, middleware::RequestIdLayer, routes, state::AppState};
use tokio::{net::TcpListener, signal};
use tower_http::{
    cors::{Any, CorsLayer},
    trace::TraceLayer,
};
use tracing::{info, warn};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load configuration
    let (config, config_error) = match AppConfig::load() {
        Ok(config) => (config, None),
        Err(e) => (AppConfig::default(), Some(e.to_string())),
    };

    // Initialize tracing
    init_telemetry(&TelemetryConfig {
        log_format: config.server.log_format.clone(),
        default_directive: "visage_server=debug,tower_http=debug".to_string(),
    });

    if let Some(e) = config_error {
        warn!(error = %e, "Failed to load config, using defaults");
    }

    info!("Visage v{} starting...", env!("CARGO_PKG_VERSION"));
    info!(
        environment = %config.environment,
        host = %config.server.host,
        port = %config.server.port,
        database = %config.database.path,
        "Configuration loaded"
    );

    // Database pool and profile store
    let pool = create_pool(&config.database)
        .map_err(|e| anyhow::anyhow!("Failed to initialize database: {e}"))?;
    let profile_store = Arc::new(SqliteProfileStore::new(Arc::new(pool)));

    // Provision profile rows for every configured user
    for entry in &config.security.access_tokens {
        match UserId::parse(&entry.user_id) {
            Ok(user_id) => profile_store
                .ensure_exists(&user_id)
                .await
                .map_err(|e| anyhow::anyhow!("Failed to provision profile: {e}"))?,
            Err(e) => warn!(user_id = %entry.user_id, error = %e, "Skipping unparseable user ID"),
        }
    }

    // Adapters and services
    let avatar_storage: Arc<dyn AvatarStorage> = Arc::new(FsAvatarStorage::new(&config.storage));
    let store: Arc<dyn ProfileStore> = Arc::clone(&profile_store) as Arc<dyn ProfileStore>;
    let session: Arc<dyn SessionProvider> =
        Arc::new(StoreBackedSessionProvider::new(Arc::clone(&store)));

    let update_service = Arc::new(ProfileUpdateService::new(
        Arc::clone(&store),
        Arc::clone(&avatar_storage),
        Arc::clone(&session),
    ));

    let state = AppState {
        update_service,
        session,
        avatar_storage,
        profile_store: store,
        edit_sessions: Arc::new(EditSessionRegistry::new()),
        config: Arc::new(config.clone()),
    };

    // Build router
    let app = routes::create_router(state);

    // Configure CORS layer
    let cors_layer = if config.server.allowed_origins.is_empty()
        && config.environment == Environment::Development
    {
        // Development mode: allow all origins
        CorsLayer::new()
            .allow_origin(Any)
            .allow_methods(Any)
            .allow_headers(Any)
    } else {
        use axum::http::{HeaderValue, Method};
        let origins: Vec<HeaderValue> = config
            .server
            .allowed_origins
            .iter()
            .filter_map(|o| o.parse().ok())
            .collect();
        CorsLayer::new()
            .allow_origin(origins)
            .allow_methods([Method::GET, Method::POST, Method::PUT, Method::DELETE])
            .allow_headers(Any)
    };

    // Session guard
    let guard = SessionGuardLayer::new(&config.security.access_tokens);

    // Add middleware (order matters: first added = outermost)
    let app = app
        .layer(TraceLayer::new_for_http())
        .layer(RequestIdLayer::new())
        .layer(cors_layer)
        .layer(guard);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;

    info!("Server listening on http://{addr}");

    // Graceful shutdown configuration
    let shutdown_timeout = Duration::from_secs(config.server.shutdown_timeout_secs.unwrap_or(30));

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal(shutdown_timeout))
        .await?;

    info!("Server shutdown complete");

    Ok(())
}

/// Wait for shutdown signals (SIGINT, SIGTERM) and handle graceful shutdown
async fn shutdown_signal(timeout: Duration) {
    let ctrl_c = async {
        // Log error but continue waiting - this is a best-effort signal handler
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {e}");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            },
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {e}");
                std::future::pending::<()>().await;
            },
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            info!("Received Ctrl+C, initiating graceful shutdown...");
        }
        () = terminate => {
            info!("Received SIGTERM, initiating graceful shutdown...");
        }
    }

    info!("Waiting up to {timeout:?} for connections to close...");
    // The actual connection draining is handled by axum's graceful_shutdown
}
