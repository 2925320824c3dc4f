use social_api::{
    AppState, create_router, init_tracing,
    config::AppConfig,
    repository::{PostgresRepository, RepositoryState},
};
use std::sync::Arc;
use tokio::net::TcpListener;

/// main
///
/// Loads configuration, installs logging, connects and migrates the database, then serves
/// HTTP until Ctrl-C. Any startup failure is fatal.
#[tokio::main]
async fn main() {
    // 1. Configuration (fail-fast on missing secrets)
    dotenv::dotenv().ok();
    let config = AppConfig::load().expect("FATAL: invalid configuration");

    // 2. Logging
    init_tracing(config.env);
    tracing::info!("Application starting in {:?} mode", config.env);

    // 3. Database
    let postgres = PostgresRepository::connect(&config.db_url, config.db_max_connections)
        .await
        .expect("FATAL: Failed to connect to Postgres. Check DATABASE_URL.");
    postgres
        .migrate()
        .await
        .expect("FATAL: Failed to apply database migrations.");
    let repo = Arc::new(postgres) as RepositoryState;

    // 4. Router and Server Startup
    let port = config.port;
    let app = create_router(AppState {
        repo: repo.clone(),
        config,
    });

    let addr = format!("0.0.0.0:{port}");
    let listener = TcpListener::bind(&addr)
        .await
        .expect("FATAL: Failed to bind the HTTP listener.");

    tracing::info!("Listening on {addr}");
    tracing::info!("API Documentation (Swagger UI) available at: http://localhost:{port}/swagger-ui");

    if let Err(e) = axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
    {
        tracing::error!(error = %e, "server stopped with an error");
    }

    repo.close().await;
    tracing::info!("Shutdown complete");
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
